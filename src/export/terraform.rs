//! AWS instance definition (`<id>.tf`).

use super::{DEFAULT_CPU_CORES, DEFAULT_RAM_MB, LaunchCommands, ProfileFields, Rendered, Renderer};

/// RAM in whole GB to instance size.
const INSTANCE_TIERS: &[(u64, &str)] = &[
    (1, "t2.micro"),
    (2, "t2.small"),
    (4, "t2.medium"),
    (8, "t2.large"),
    (16, "t2.xlarge"),
];

const DEFAULT_INSTANCE_TYPE: &str = "t2.medium";
const DEFAULT_OS: &str = "windows-10";

/// Instance type for a RAM size, by floor GB (minimum 1).
///
/// Sizes not in the tier table, like 3 GB or 32 GB, get the default tier.
pub fn instance_type_for(ram_mb: u64) -> &'static str {
    let ram_gb = (ram_mb / 1024).max(1);
    INSTANCE_TIERS
        .iter()
        .find(|(gb, _)| *gb == ram_gb)
        .map_or(DEFAULT_INSTANCE_TYPE, |(_, tier)| tier)
}

pub struct TerraformRenderer;

impl Renderer for TerraformRenderer {
    fn extension(&self) -> &'static str {
        "tf"
    }

    fn description(&self) -> &'static str {
        "Initializes and applies Terraform configuration"
    }

    fn render(&self, f: &ProfileFields) -> Rendered {
        let id = &f.id;
        let resource = format!("testkit_{}", f.ident());
        let ram = f.ram_mb.text_or(DEFAULT_RAM_MB);
        let cpus = f.cpu_cores.text_or(DEFAULT_CPU_CORES);
        let os = if f.os_target.is_empty() {
            DEFAULT_OS
        } else {
            f.os_target.as_str()
        };
        let instance_type = instance_type_for(f.ram_mb.or(DEFAULT_RAM_MB));

        let content = format!(
            r#"# TestKit Profile: {id}
# Generated Terraform configuration for cloud deployment

terraform {{
  required_providers {{
    aws = {{
      source  = "hashicorp/aws"
      version = "~> 5.0"
    }}
  }}
}}

provider "aws" {{
  region = var.aws_region
}}

variable "aws_region" {{
  description = "AWS region for deployment"
  type        = string
  default     = "us-east-1"
}}

resource "aws_instance" "{resource}" {{
  ami           = data.aws_ami.windows.id
  instance_type = "{instance_type}"

  tags = {{
    Name               = "TestKit-{id}"
    TestKitProfileID   = "{id}"
    TestKitMake        = "{make}"
    TestKitModel       = "{model}"
    TestKitCPUCores    = "{cpus}"
    TestKitRAM_MB      = "{ram}"
    TestKitGPUVRAM_MB  = "{vram}"
    TestKitResolution  = "{res}"
    TestKitOS          = "{os}"
  }}

  user_data = <<-EOT
    <powershell>
    Write-Host "Initializing TestKit Profile: {id}"
    [Environment]::SetEnvironmentVariable("TESTKIT_PROFILE_ID", "{id}", "Machine")
    [Environment]::SetEnvironmentVariable("TESTKIT_CPU_CORES", "{cpus}", "Machine")
    [Environment]::SetEnvironmentVariable("TESTKIT_RAM_MB", "{ram}", "Machine")
    </powershell>
  EOT
}}

data "aws_ami" "windows" {{
  most_recent = true
  owners      = ["amazon"]

  filter {{
    name   = "name"
    values = ["Windows_Server-2019-English-Full-Base-*"]
  }}
}}

output "instance_id" {{
  value = aws_instance.{resource}.id
}}

output "public_ip" {{
  value = aws_instance.{resource}.public_ip
}}
"#,
            make = f.make,
            model = f.model,
            vram = f.gpu_vram_mb.text,
            res = f.screen_resolution,
        );

        Rendered {
            content,
            launch: LaunchCommands::both("terraform init\nterraform apply -auto-approve"),
        }
    }
}
