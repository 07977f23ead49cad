//! VirtualBox VM provisioning file (`<id>.Vagrantfile`).

use super::{DEFAULT_CPU_CORES, DEFAULT_RAM_MB, LaunchCommands, ProfileFields, Rendered, Renderer};

const BOX: &str = "generic/windows10";

pub struct VagrantRenderer;

impl Renderer for VagrantRenderer {
    fn extension(&self) -> &'static str {
        "Vagrantfile"
    }

    fn description(&self) -> &'static str {
        "Provisions and connects to the Vagrant VM"
    }

    fn render(&self, f: &ProfileFields) -> Rendered {
        let id = &f.id;
        let ram = f.ram_mb.text_or(DEFAULT_RAM_MB);
        let cpus = f.cpu_cores.text_or(DEFAULT_CPU_CORES);

        let content = format!(
            "# -*- mode: ruby -*-\n\
             # vi: set ft=ruby :\n\
             # TestKit Profile: {make} {model} ({os})\n\
             \n\
             Vagrant.configure(\"2\") do |config|\n\
             \x20 config.vm.box = \"{BOX}\"\n\
             \x20 config.vm.define \"{id}\" do |node|\n\
             \x20   node.vm.provider \"virtualbox\" do |vb|\n\
             \x20     vb.memory = \"{ram}\"\n\
             \x20     vb.cpus = \"{cpus}\"\n\
             \x20     vb.name = \"TestKit - {id}\"\n\
             \x20   end\n\
             \x20   node.vm.provision \"shell\", inline: <<-SHELL\n\
             \x20     echo \"Setting up TestKit Profile: {id}\"\n\
             \x20     setx TESTKIT_PROFILE_ID \"{id}\" /M\n\
             \x20     setx TESTKIT_MAKE \"{make}\" /M\n\
             \x20     setx TESTKIT_MODEL \"{model}\" /M\n\
             \x20     setx TESTKIT_OS \"{os}\" /M\n\
             \x20     setx TESTKIT_GPU_VRAM_MB \"{vram}\" /M\n\
             \x20     setx TESTKIT_RESOLUTION \"{res}\" /M\n\
             \x20   SHELL\n\
             \x20 end\n\
             end\n",
            make = f.make,
            model = f.model,
            os = f.os_target,
            vram = f.gpu_vram_mb.text,
            res = f.screen_resolution,
        );

        Rendered {
            content,
            launch: LaunchCommands::both("vagrant up\nvagrant ssh"),
        }
    }
}
