//! VMware Workstation VM definition (`<id>.vmx`).

use std::fmt::Write as _;

use super::{DEFAULT_CPU_CORES, DEFAULT_RAM_MB, LaunchCommands, ProfileFields, Rendered, Renderer};

/// OS target to VMware `guestOS` key. Checked in order, first match wins.
const GUEST_OS: &[(&str, &str)] = &[
    ("Windows XP", "winxppro"),
    ("Windows 7", "windows7-64"),
    ("Windows 8.1", "windows8-64"),
    ("Windows 8", "windows8-64"),
    ("Windows 10", "windows9-64"),
    ("Windows 11", "windows11-64"),
];

const DEFAULT_GUEST_OS: &str = "windows9-64";

/// VMware guest OS identifier for an OS target name.
pub fn guest_os_for(os_target: &str) -> &'static str {
    GUEST_OS
        .iter()
        .find(|(name, _)| *name == os_target)
        .map_or(DEFAULT_GUEST_OS, |(_, key)| key)
}

pub struct VmwareRenderer;

impl Renderer for VmwareRenderer {
    fn extension(&self) -> &'static str {
        "vmx"
    }

    fn description(&self) -> &'static str {
        "Starts the VMware Workstation VM"
    }

    fn render(&self, f: &ProfileFields) -> Rendered {
        let id = &f.id;
        let ram = f.ram_mb.or(DEFAULT_RAM_MB);
        let cpus = f.cpu_cores.or(DEFAULT_CPU_CORES);
        let vram = f.gpu_vram_mb.or(0);

        let mut content = format!(
            ".encoding = \"UTF-8\"\n\
             config.version = \"8\"\n\
             virtualHW.version = \"19\"\n\
             displayName = \"TestKit - {id}\"\n\
             guestOS = \"{guest}\"\n\
             memsize = \"{ram}\"\n\
             numvcpus = \"{cpus}\"\n\
             firmware = \"efi\"\n",
            guest = guest_os_for(&f.os_target),
        );

        if vram > 0 {
            let _ = writeln!(content, "svga.vramSize = \"{}\"", vram.saturating_mul(1024 * 1024));
            let _ = writeln!(content, "mks.enable3d = \"TRUE\"");
        }
        if let Some((width, height)) = f.resolution_dimensions() {
            let _ = writeln!(content, "svga.autodetect = \"FALSE\"");
            let _ = writeln!(content, "svga.maxWidth = \"{width}\"");
            let _ = writeln!(content, "svga.maxHeight = \"{height}\"");
        }

        let guestinfo = [
            ("profile_id", id.as_str()),
            ("make", f.make.as_str()),
            ("model", f.model.as_str()),
            ("os", f.os_target.as_str()),
            ("cpu_cores", f.cpu_cores.text.as_str()),
            ("ram_mb", f.ram_mb.text.as_str()),
            ("gpu_vram_mb", f.gpu_vram_mb.text.as_str()),
            ("resolution", f.screen_resolution.as_str()),
        ];
        for (key, value) in guestinfo {
            let _ = writeln!(content, "guestinfo.testkit.{key} = \"{value}\"");
        }

        let command = format!("vmrun -T ws start {id}.vmx");
        Rendered {
            content,
            launch: LaunchCommands::both(command),
        }
    }
}
