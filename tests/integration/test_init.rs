//! Integration tests for `conveyor init`

use crate::helpers::{TestRepo, run_conveyor, run_conveyor_ok};
use anyhow::Result;

#[test]
fn test_init_writes_starter_config() -> Result<()> {
  let repo = TestRepo::new()?;

  run_conveyor_ok(&repo.path, &["init"])?;

  let config = repo.read_file("conveyor.toml")?;
  assert!(config.contains("[manifest]"));
  assert!(config.contains("[platform]"));
  assert!(config.contains("branch_pattern"));

  Ok(())
}

#[test]
fn test_init_refuses_overwrite_without_force() -> Result<()> {
  let repo = TestRepo::new()?;

  run_conveyor_ok(&repo.path, &["init"])?;
  let output = run_conveyor(&repo.path, &["init"])?;

  assert!(!output.status.success());
  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("--force"), "stderr: {}", stderr);

  // --force overwrites
  run_conveyor_ok(&repo.path, &["init", "--force"])?;

  Ok(())
}
