//! Init command: write a starter configuration

use crate::core::config::ConveyorConfig;
use crate::core::error::{ConveyorError, ConveyorResult};
use crate::core::vcs::SystemGit;
use std::env;

/// Run the init command to set up conveyor configuration
pub fn run_init(force: bool) -> ConveyorResult<()> {
  let current_dir = env::current_dir()?;

  // Prefer the repository root when run from a subdirectory
  let root = match SystemGit::open(&current_dir) {
    Ok(git) => git.work_tree().to_path_buf(),
    Err(_) => current_dir,
  };

  if ConveyorConfig::exists(&root) && !force {
    return Err(ConveyorError::with_help(
      "Configuration already exists",
      "Pass --force to overwrite conveyor.toml.",
    ));
  }

  let config_path = root.join("conveyor.toml");
  std::fs::write(&config_path, ConveyorConfig::starter_template("owner/name"))?;

  println!("📦 Wrote {}", config_path.display());
  println!();
  println!("Next steps:");
  println!("  1. Set `platform.repo` to your repository slug");
  println!("  2. Export CONVEYOR_REGISTRY_TOKEN and CONVEYOR_PLATFORM_TOKEN");
  println!("  3. Check the setup: conveyor doctor");
  println!("  4. Publish a release: conveyor run <TAG>");

  Ok(())
}
