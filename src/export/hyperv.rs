//! Hyper-V provisioning script (`<id>.hyperv.ps1`).
//!
//! The script creates a Generation 2 VM sized from the profile and records the
//! profile fields as VM notes. Video resolution and GPU partitioning are only
//! configured when the profile has usable values for them.

use std::fmt::Write as _;

use super::{
    DEFAULT_CPU_CORES, DEFAULT_RAM_MB, DEFAULT_STORAGE_GB, LaunchCommands, ProfileFields, Rendered,
    Renderer,
};

const SWITCH_NAME: &str = "Default Switch";

pub struct HypervRenderer;

impl Renderer for HypervRenderer {
    fn extension(&self) -> &'static str {
        "hyperv.ps1"
    }

    fn description(&self) -> &'static str {
        "Creates and starts the Hyper-V VM"
    }

    fn render(&self, f: &ProfileFields) -> Rendered {
        let id = &f.id;
        let vm_name = format!("TestKit-{id}");
        let ram = f.ram_mb.or(DEFAULT_RAM_MB);
        let cpus = f.cpu_cores.or(DEFAULT_CPU_CORES);
        let disk = f.storage_gb.or(DEFAULT_STORAGE_GB);
        let vram = f.gpu_vram_mb.or(0);

        let mut content = format!(
            "# TestKit Profile: {make} {model}\n\
             # OS: {os}\n\
             # Requires an elevated PowerShell session with the Hyper-V module.\n\
             \n\
             $ErrorActionPreference = \"Stop\"\n\
             $VMName = \"{vm_name}\"\n\
             $VhdPath = Join-Path (Get-VMHost).VirtualHardDiskPath \"$VMName.vhdx\"\n\
             \n\
             New-VM -Name $VMName -Generation 2 -MemoryStartupBytes {ram}MB `\n\
             \x20   -NewVHDPath $VhdPath -NewVHDSizeBytes {disk}GB -SwitchName \"{SWITCH_NAME}\"\n\
             Set-VMProcessor -VMName $VMName -Count {cpus}\n\
             Set-VMMemory -VMName $VMName -DynamicMemoryEnabled $false -StartupBytes {ram}MB\n",
            make = f.make,
            model = f.model,
            os = f.os_target,
        );

        if let Some((width, height)) = f.resolution_dimensions() {
            let _ = writeln!(
                content,
                "Set-VMVideo -VMName $VMName -HorizontalResolution {width} -VerticalResolution {height} -ResolutionType Single"
            );
        }

        if vram > 0 {
            let _ = writeln!(content, "Add-VMGpuPartitionAdapter -VMName $VMName");
            let _ = writeln!(
                content,
                "Set-VM -VMName $VMName -GuestControlledCacheTypes $true -LowMemoryMappedIoSpace 1GB -HighMemoryMappedIoSpace {}MB",
                vram.max(1024)
            );
        }

        let _ = write!(
            content,
            "\n\
             Set-VM -VMName $VMName -Notes @\"\n\
             TESTKIT_PROFILE_ID={id}\n\
             TESTKIT_MAKE={make}\n\
             TESTKIT_MODEL={model}\n\
             TESTKIT_OS={os}\n\
             TESTKIT_CPU_CORES={cores}\n\
             TESTKIT_RAM_MB={ram_text}\n\
             TESTKIT_GPU_VRAM_MB={vram_text}\n\
             TESTKIT_RESOLUTION={res}\n\
             \"@\n\
             \n\
             Write-Host \"Created $VMName\" -ForegroundColor Green\n",
            make = f.make,
            model = f.model,
            os = f.os_target,
            cores = f.cpu_cores.text,
            ram_text = f.ram_mb.text,
            vram_text = f.gpu_vram_mb.text,
            res = f.screen_resolution,
        );

        Rendered {
            content,
            launch: LaunchCommands {
                posix: format!(
                    "powershell.exe -ExecutionPolicy Bypass -File {id}.hyperv.ps1\n\
                     powershell.exe -Command \"Start-VM -Name '{vm_name}'\""
                ),
                powershell: format!(".\\{id}.hyperv.ps1\nStart-VM -Name \"{vm_name}\""),
            },
        }
    }
}
