//! Windows Sandbox configuration (`<id>.wsb`).

use super::{DEFAULT_CPU_CORES, DEFAULT_RAM_MB, LaunchCommands, ProfileFields, Rendered, Renderer};

pub struct WsbRenderer;

impl Renderer for WsbRenderer {
    fn extension(&self) -> &'static str {
        "wsb"
    }

    fn description(&self) -> &'static str {
        "Launches Windows Sandbox"
    }

    fn render(&self, f: &ProfileFields) -> Rendered {
        let id = &f.id;
        let ram = f.ram_mb.or(DEFAULT_RAM_MB);
        let vgpu = if f.gpu_vram_mb.or(0) > 0 { "Enable" } else { "Disable" };

        let set_env = [
            ("TESTKIT_PROFILE_ID", id.clone()),
            ("TESTKIT_MAKE", f.make.clone()),
            ("TESTKIT_MODEL", f.model.clone()),
            ("TESTKIT_OS", f.os_target.clone()),
            ("TESTKIT_CPU_CORES", f.cpu_cores.text_or(DEFAULT_CPU_CORES)),
            ("TESTKIT_RAM_MB", f.ram_mb.text_or(DEFAULT_RAM_MB)),
            ("TESTKIT_GPU_VRAM_MB", f.gpu_vram_mb.text_or(0)),
            ("TESTKIT_RESOLUTION", f.screen_resolution.clone()),
        ]
        .iter()
        .map(|(name, value)| {
            format!("[Environment]::SetEnvironmentVariable('{name}', '{value}', 'Machine'); ")
        })
        .collect::<String>();

        let content = format!(
            "<Configuration>\n\
             \x20 <VGpu>{vgpu}</VGpu>\n\
             \x20 <MemoryInMB>{ram}</MemoryInMB>\n\
             \x20 <LogonCommand>\n\
             \x20   <Command>powershell -ExecutionPolicy Bypass -Command \"Write-Host 'TestKit Profile: {id}' -ForegroundColor Green; \
             {set_env}Write-Host 'Environment configured for testing.' -ForegroundColor Cyan\"</Command>\n\
             \x20 </LogonCommand>\n\
             </Configuration>\n"
        );

        Rendered {
            content,
            launch: LaunchCommands {
                posix: format!("cmd.exe /c start {id}.wsb"),
                powershell: format!("Start-Process \"{id}.wsb\""),
            },
        }
    }
}
