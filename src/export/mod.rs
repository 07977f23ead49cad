//! Export engine: renders one profile into a deployment-target artifact.
//!
//! Every format implements [`Renderer`]. [`ExportFormat`] is the closed set of
//! formats and maps each variant to its renderer with an exhaustive match, so
//! adding a format means adding a variant and a module.
//!
//! An export writes three files into the output directory:
//!
//! ```text
//! exports/
//! ├── <id>.<ext>     # primary artifact
//! ├── launch.ps1     # PowerShell launcher
//! └── launch.sh      # POSIX launcher (mode 755)
//! ```
//!
//! The launch scripts are not namespaced by profile, so exporting several
//! profiles into one directory leaves the last profile's launchers.

mod docker;
mod fields;
mod hyperv;
mod launch;
mod terraform;
mod vagrant;
mod vmware;
mod wsb;

pub use fields::{
    DEFAULT_CPU_CORES, DEFAULT_RAM_MB, DEFAULT_STORAGE_GB, NumberField, ProfileFields, UNKNOWN_ID,
};
pub use launch::{LAUNCH_PS1, LAUNCH_SH, LaunchCommands, write_launch_scripts};
pub use terraform::instance_type_for;
pub use vmware::guest_os_for;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::ValueEnum;
use serde::Serialize;
use tracing::{info, instrument};

use crate::error::{Result, TkError};
use crate::store::{ProfileDoc, ensure_safe_id};

/// Output of one renderer call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// Primary artifact text.
    pub content: String,
    /// Commands for the companion launch scripts.
    pub launch: LaunchCommands,
}

/// Contract shared by every export format.
pub trait Renderer {
    /// File name suffix after `<id>.`, e.g. `Dockerfile` or `tf`.
    fn extension(&self) -> &'static str;

    /// One-line summary written into the launch scripts.
    fn description(&self) -> &'static str;

    /// Renders the primary artifact and launch commands.
    ///
    /// Must not fail on missing fields; use placeholders instead.
    fn render(&self, fields: &ProfileFields) -> Rendered;
}

/// Supported export targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Container image definition (`<id>.Dockerfile`)
    Docker,
    /// VirtualBox VM via Vagrant (`<id>.Vagrantfile`)
    Vagrant,
    /// AWS instance via Terraform (`<id>.tf`)
    Terraform,
    /// Windows Sandbox config (`<id>.wsb`)
    Wsb,
    /// Hyper-V provisioning script (`<id>.hyperv.ps1`)
    Hyperv,
    /// VMware Workstation VM (`<id>.vmx`)
    Vmware,
}

impl ExportFormat {
    pub const ALL: [Self; 6] = [
        Self::Docker,
        Self::Vagrant,
        Self::Terraform,
        Self::Wsb,
        Self::Hyperv,
        Self::Vmware,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Docker => "docker",
            Self::Vagrant => "vagrant",
            Self::Terraform => "terraform",
            Self::Wsb => "wsb",
            Self::Hyperv => "hyperv",
            Self::Vmware => "vmware",
        }
    }

    pub fn renderer(self) -> &'static dyn Renderer {
        match self {
            Self::Docker => &docker::DockerRenderer,
            Self::Vagrant => &vagrant::VagrantRenderer,
            Self::Terraform => &terraform::TerraformRenderer,
            Self::Wsb => &wsb::WsbRenderer,
            Self::Hyperv => &hyperv::HypervRenderer,
            Self::Vmware => &vmware::VmwareRenderer,
        }
    }

    /// `<id>.<ext>` for this format.
    pub fn artifact_name(self, id: &str) -> String {
        format!("{id}.{}", self.renderer().extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExportFormat {
    type Err = TkError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.name() == wanted)
            .ok_or_else(|| TkError::UnknownFormat {
                name: s.to_string(),
                expected: Self::ALL.map(Self::name).join(", "),
            })
    }
}

/// Files written by one export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportPaths {
    pub id: String,
    pub format: ExportFormat,
    pub artifact: PathBuf,
    pub launch_ps1: PathBuf,
    pub launch_sh: PathBuf,
}

/// Renders a profile without touching the filesystem.
pub fn render_profile(doc: &ProfileDoc, format: ExportFormat) -> Result<(ProfileFields, Rendered)> {
    let fields = ProfileFields::extract(&doc.value)?;
    let rendered = format.renderer().render(&fields);
    Ok((fields, rendered))
}

/// Renders a profile and writes the artifact plus launch scripts.
///
/// Creates the output directory if needed and overwrites existing files.
#[instrument(skip_all, fields(format = %format, output_dir = %output_dir.display()))]
pub fn export_profile(doc: &ProfileDoc, format: ExportFormat, output_dir: &Path) -> Result<ExportPaths> {
    let (fields, rendered) = render_profile(doc, format)?;
    ensure_safe_id(&fields.id)?;

    std::fs::create_dir_all(output_dir)?;

    let artifact = output_dir.join(format.artifact_name(&fields.id));
    std::fs::write(&artifact, &rendered.content)?;

    let (launch_ps1, launch_sh) = write_launch_scripts(
        output_dir,
        &fields.id,
        &rendered.launch,
        format.renderer().description(),
    )?;

    info!(id = %fields.id, artifact = %artifact.display(), "Exported profile");
    Ok(ExportPaths {
        id: fields.id,
        format,
        artifact,
        launch_ps1,
        launch_sh,
    })
}

/// Loads a profile file and exports it.
pub fn export_file(profile_path: &Path, format: ExportFormat, output_dir: &Path) -> Result<ExportPaths> {
    let doc = ProfileDoc::load(profile_path)?;
    export_profile(&doc, format, output_dir)
}
