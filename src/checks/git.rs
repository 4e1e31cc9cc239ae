//! Git availability and repository validity check

use super::trait_def::{Check, CheckContext, CheckResult};
use crate::core::error::ConveyorResult;
use crate::core::vcs::SystemGit;
use std::process::Command;

/// Validates that system git is installed and the workspace is a repository
pub struct GitCheck;

impl Check for GitCheck {
  fn name(&self) -> &str {
    "git"
  }

  fn description(&self) -> &str {
    "System git is installed and the workspace is a git repository"
  }

  fn run(&self, ctx: &CheckContext) -> ConveyorResult<CheckResult> {
    let version = Command::new("git").arg("--version").output();

    let reported = match version {
      Ok(output) if output.status.success() => String::from_utf8_lossy(&output.stdout).trim().to_string(),
      _ => {
        return Ok(CheckResult::error(
          self.name(),
          "git is not installed or not on PATH",
          Some("Install git; every run starts by checking out the triggering tag."),
        ));
      }
    };

    match SystemGit::open(&ctx.root) {
      Ok(git) => Ok(CheckResult::pass(
        self.name(),
        format!("{} (repository at {})", reported, git.work_tree().display()),
      )),
      Err(e) => Ok(CheckResult::error(
        self.name(),
        format!("Not a git repository: {}", e),
        Some("Run conveyor from inside the repository that publishes releases."),
      )),
    }
  }
}
