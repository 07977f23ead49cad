//! Container image definition (`<id>.Dockerfile`).

use super::{LaunchCommands, ProfileFields, Rendered, Renderer};

const BASE_IMAGE: &str = "mcr.microsoft.com/windows/servercore:ltsc2022";

pub struct DockerRenderer;

impl Renderer for DockerRenderer {
    fn extension(&self) -> &'static str {
        "Dockerfile"
    }

    fn description(&self) -> &'static str {
        "Builds and runs the Docker container"
    }

    fn render(&self, f: &ProfileFields) -> Rendered {
        let id = &f.id;
        let content = format!(
            "# TestKit Profile: {make} {model}\n\
             # OS: {os}\n\
             # Hardware: {cores} Cores, {ram}MB RAM\n\
             \n\
             FROM {BASE_IMAGE}\n\
             \n\
             # Set Environment Variables to simulate hardware specs\n\
             ENV TESTKIT_PROFILE_ID=\"{id}\"\n\
             ENV TESTKIT_MAKE=\"{make}\"\n\
             ENV TESTKIT_MODEL=\"{model}\"\n\
             ENV TESTKIT_OS=\"{os}\"\n\
             ENV TESTKIT_CPU_CORES=\"{cores}\"\n\
             ENV TESTKIT_RAM_MB=\"{ram}\"\n\
             ENV TESTKIT_GPU_VRAM_MB=\"{vram}\"\n\
             ENV TESTKIT_RESOLUTION=\"{res}\"\n\
             \n\
             RUN echo \"Initializing TestKit Environment for {id}\"\n",
            make = f.make,
            model = f.model,
            os = f.os_target,
            cores = f.cpu_cores.text,
            ram = f.ram_mb.text,
            vram = f.gpu_vram_mb.text,
            res = f.screen_resolution,
        );

        let image = format!("testkit-{id}");
        Rendered {
            content,
            launch: LaunchCommands::both(format!(
                "docker build -t {image} -f {id}.Dockerfile .\ndocker run -it --rm {image}"
            )),
        }
    }
}
