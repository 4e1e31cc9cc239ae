//! Check runner for executing health checks

use super::trait_def::{Check, CheckContext, CheckResult};
use crate::core::error::ConveyorResult;
use std::sync::Arc;

/// Check runner that executes multiple checks
pub struct CheckRunner {
  checks: Vec<Arc<dyn Check>>,
}

impl CheckRunner {
  /// Create a new check runner
  pub fn new() -> Self {
    Self { checks: Vec::new() }
  }

  /// Add a check to the runner
  pub fn add_check(&mut self, check: Arc<dyn Check>) {
    self.checks.push(check);
  }

  /// Run all checks and collect results
  pub fn run_all(&self, ctx: &CheckContext) -> ConveyorResult<Vec<CheckResult>> {
    let mut results = Vec::new();

    for check in &self.checks {
      // Skip expensive checks if not thorough mode
      if check.is_expensive() && !ctx.thorough {
        continue;
      }

      match check.run(ctx) {
        Ok(result) => results.push(result),
        Err(err) => {
          // If a check itself fails to run, create an error result
          results.push(CheckResult::error(
            check.name(),
            format!("Check failed to run: {}", err),
            Some("Check the logs for more details"),
          ));
        }
      }
    }

    Ok(results)
  }
}

impl Default for CheckRunner {
  fn default() -> Self {
    Self::new()
  }
}

/// Create a runner with all built-in checks registered
pub fn create_default_runner() -> CheckRunner {
  let mut runner = CheckRunner::new();
  runner.add_check(Arc::new(super::git::GitCheck));
  runner.add_check(Arc::new(super::workspace::WorkspaceCheck));
  runner.add_check(Arc::new(super::toolchain::RuntimeCheck));
  runner.add_check(Arc::new(super::toolchain::PackagingToolCheck));
  runner.add_check(Arc::new(super::secrets::SecretsCheck));
  runner.add_check(Arc::new(super::platform_api::PlatformReachabilityCheck));
  runner
}
