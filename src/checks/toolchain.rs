//! Runtime pin and packaging tool checks

use super::trait_def::{Check, CheckContext, CheckResult};
use crate::core::config::ConveyorConfig;
use crate::core::error::ConveyorResult;
use crate::provision;

/// Validates that the pinned runtime is available and matches the pin
pub struct RuntimeCheck;

impl Check for RuntimeCheck {
  fn name(&self) -> &str {
    "runtime"
  }

  fn description(&self) -> &str {
    "The pinned language runtime is installed and reports the pinned version"
  }

  fn run(&self, ctx: &CheckContext) -> ConveyorResult<CheckResult> {
    let Ok(config) = ConveyorConfig::load(&ctx.root) else {
      return Ok(CheckResult::warning(
        self.name(),
        "Skipped: no readable configuration",
        Some("Fix the workspace check first."),
      ));
    };

    match provision::ensure_runtime(&ctx.root, &config.runtime) {
      Ok(reported) => Ok(CheckResult::pass(self.name(), reported)),
      Err(e) => Ok(CheckResult::error(
        self.name(),
        e.to_string(),
        e.help_message(),
      )),
    }
  }
}

/// Validates that the packaging tool is available
pub struct PackagingToolCheck;

impl Check for PackagingToolCheck {
  fn name(&self) -> &str {
    "packaging-tool"
  }

  fn description(&self) -> &str {
    "The packaging tool used to build and publish is installed"
  }

  fn run(&self, ctx: &CheckContext) -> ConveyorResult<CheckResult> {
    let Ok(config) = ConveyorConfig::load(&ctx.root) else {
      return Ok(CheckResult::warning(
        self.name(),
        "Skipped: no readable configuration",
        Some("Fix the workspace check first."),
      ));
    };

    match provision::ensure_packaging_tool(&ctx.root, &config.packaging) {
      Ok(reported) => Ok(CheckResult::pass(self.name(), reported)),
      Err(e) => Ok(CheckResult::error(
        self.name(),
        e.to_string(),
        e.help_message(),
      )),
    }
  }
}
