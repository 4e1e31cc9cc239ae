//! Platform API reachability check (thorough mode only)

use super::trait_def::{Check, CheckContext, CheckResult};
use crate::core::config::ConveyorConfig;
use crate::core::error::ConveyorResult;
use crate::platform::PlatformClient;

/// Probes the configured platform API base URL
pub struct PlatformReachabilityCheck;

impl Check for PlatformReachabilityCheck {
  fn name(&self) -> &str {
    "platform-api"
  }

  fn description(&self) -> &str {
    "The platform API base URL answers HTTP requests"
  }

  fn is_expensive(&self) -> bool {
    true
  }

  fn run(&self, ctx: &CheckContext) -> ConveyorResult<CheckResult> {
    let Ok(config) = ConveyorConfig::load(&ctx.root) else {
      return Ok(CheckResult::warning(
        self.name(),
        "Skipped: no readable configuration",
        Some("Fix the workspace check first."),
      ));
    };

    let client = PlatformClient::new(&config.platform.api_base, &config.platform.repo, "")?;
    match client.ping() {
      Ok(status) => Ok(CheckResult::pass(
        self.name(),
        format!("{} answered with {}", config.platform.api_base, status),
      )),
      Err(e) => Ok(CheckResult::error(
        self.name(),
        e.to_string(),
        Some("Check `platform.api_base` in conveyor.toml and your network."),
      )),
    }
  }
}
