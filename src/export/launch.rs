//! Companion launch scripts written next to every export.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, ResultExt};

/// PowerShell launcher file name.
pub const LAUNCH_PS1: &str = "launch.ps1";
/// POSIX launcher file name.
pub const LAUNCH_SH: &str = "launch.sh";

/// Shell commands that bring up one exported environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommands {
    /// Body of `launch.sh`.
    pub posix: String,
    /// Body of `launch.ps1`.
    pub powershell: String,
}

impl LaunchCommands {
    /// Same command text for both shells.
    pub fn both(commands: impl Into<String>) -> Self {
        let commands = commands.into();
        Self {
            posix: commands.clone(),
            powershell: commands,
        }
    }
}

fn powershell_script(id: &str, description: &str, commands: &str) -> String {
    format!(
        "# Launch Script for {id}\n\
         # {description}\n\
         Write-Host \"Starting {id} environment...\" -ForegroundColor Cyan\n\
         {commands}\n"
    )
}

fn posix_script(id: &str, description: &str, commands: &str) -> String {
    format!(
        "#!/bin/bash\n\
         # Launch Script for {id}\n\
         # {description}\n\
         echo \"Starting {id} environment...\"\n\
         {commands}\n"
    )
}

/// Writes `launch.ps1` and `launch.sh` into `dir`, replacing existing ones.
///
/// Returns `(ps1, sh)` paths.
pub fn write_launch_scripts(
    dir: &Path,
    id: &str,
    commands: &LaunchCommands,
    description: &str,
) -> Result<(PathBuf, PathBuf)> {
    let ps1 = dir.join(LAUNCH_PS1);
    std::fs::write(&ps1, powershell_script(id, description, &commands.powershell))
        .with_context(|| format!("writing {}", ps1.display()))?;

    let sh = dir.join(LAUNCH_SH);
    std::fs::write(&sh, posix_script(id, description, &commands.posix))
        .with_context(|| format!("writing {}", sh.display()))?;

    mark_executable(&sh);
    Ok((ps1, sh))
}

#[cfg(unix)]
fn mark_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Err(e) = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)) {
        debug!(path = %path.display(), error = %e, "Could not mark launcher executable");
    }
}

#[cfg(not(unix))]
fn mark_executable(path: &Path) {
    debug!(path = %path.display(), "No permission bits on this platform");
}
