//! Secret presence check
//!
//! Presence only. Tokens are never validated before the steps that consume
//! them: an invalid registry token surfaces at publish, an invalid platform
//! token at asset upload or change request creation.

use super::trait_def::{Check, CheckContext, CheckResult};
use crate::core::error::ConveyorResult;

pub const REGISTRY_TOKEN_ENV: &str = "CONVEYOR_REGISTRY_TOKEN";
pub const PLATFORM_TOKEN_ENV: &str = "CONVEYOR_PLATFORM_TOKEN";

/// Warns when the token environment variables are unset
pub struct SecretsCheck;

impl Check for SecretsCheck {
  fn name(&self) -> &str {
    "secrets"
  }

  fn description(&self) -> &str {
    "Registry and platform token environment variables are set"
  }

  fn run(&self, _ctx: &CheckContext) -> ConveyorResult<CheckResult> {
    let missing: Vec<&str> = [REGISTRY_TOKEN_ENV, PLATFORM_TOKEN_ENV]
      .into_iter()
      .filter(|name| std::env::var(name).map(|v| v.is_empty()).unwrap_or(true))
      .collect();

    if missing.is_empty() {
      Ok(CheckResult::pass(self.name(), "Both tokens are present (not validated)"))
    } else {
      Ok(CheckResult::warning(
        self.name(),
        format!("Missing: {}", missing.join(", ")),
        Some("Export the tokens or pass --registry-token/--platform-token to `conveyor run`."),
      ))
    }
  }
}
