//! Unified run context - build once, pass everywhere
//!
//! # Design
//!
//! RunContext eliminates redundant config loads and repository probes by
//! building all run-level data once in main.rs, then passing by reference
//! to all commands.
//!
//! # Architecture
//!
//! ```text
//! main.rs:
//!   RunContext::build() -> &RunContext
//!   |
//!   v
//! commands/plan.rs, run.rs, etc:
//!   fn execute(ctx: &RunContext)
//! ```

use crate::core::config::ConveyorConfig;
use crate::core::error::ConveyorResult;
use crate::core::vcs::SystemGit;
use std::path::{Path, PathBuf};

/// Unified run context containing all shared run-level data.
///
/// Built once at startup, passed by reference to all commands.
pub struct RunContext {
  /// Repository root directory (absolute path)
  pub root: PathBuf,

  /// Conveyor configuration (conveyor.toml)
  pub config: ConveyorConfig,

  /// Git backend for the repository
  pub git: SystemGit,
}

impl RunContext {
  /// Build run context from a root directory.
  ///
  /// Opens the git repository and loads conveyor.toml. Commands that can run
  /// before configuration exists (init, doctor) do not use a context.
  pub fn build(root: &Path) -> ConveyorResult<Self> {
    let git = SystemGit::open(root)?;
    let root = git.work_tree().to_path_buf();
    let config = ConveyorConfig::load(&root)?;

    Ok(Self { root, config, git })
  }

  /// Get repository root as Path reference (convenience)
  #[allow(dead_code)]
  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Resolve a config-relative path against the repository root
  pub fn resolve(&self, path: &Path) -> PathBuf {
    if path.is_absolute() {
      path.to_path_buf()
    } else {
      self.root.join(path)
    }
  }
}
