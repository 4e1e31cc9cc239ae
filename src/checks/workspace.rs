//! Configuration and manifest readability check

use super::trait_def::{Check, CheckContext, CheckResult};
use crate::core::config::ConveyorConfig;
use crate::core::error::ConveyorResult;
use crate::release::Manifest;

/// Validates conveyor.toml and the manifest's version field
pub struct WorkspaceCheck;

impl Check for WorkspaceCheck {
  fn name(&self) -> &str {
    "workspace"
  }

  fn description(&self) -> &str {
    "conveyor.toml parses and the manifest's version field is readable"
  }

  fn run(&self, ctx: &CheckContext) -> ConveyorResult<CheckResult> {
    let config = match ConveyorConfig::load(&ctx.root) {
      Ok(config) => config,
      Err(e) => {
        return Ok(CheckResult::error(
          self.name(),
          format!("Configuration problem: {}", e),
          Some("Run `conveyor init` to create conveyor.toml."),
        ));
      }
    };

    let manifest_path = ctx.root.join(&config.manifest.path);
    let manifest = match Manifest::load(&manifest_path) {
      Ok(manifest) => manifest,
      Err(e) => {
        return Ok(CheckResult::error(
          self.name(),
          format!("Manifest problem: {}", e),
          Some("Check `manifest.path` in conveyor.toml."),
        ));
      }
    };

    match manifest.version(&config.manifest.version_key) {
      Ok(version) => Ok(CheckResult::pass(
        self.name(),
        format!(
          "{} has {} = \"{}\"",
          config.manifest.path.display(),
          config.manifest.version_key,
          version
        ),
      )),
      Err(e) => Ok(CheckResult::error(
        self.name(),
        format!("Version field unreadable: {}", e),
        Some("Check `manifest.version_key` in conveyor.toml."),
      )),
    }
  }
}
