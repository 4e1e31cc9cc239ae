//! Integration tests for `conveyor plan`

use crate::helpers::{TestRepo, run_conveyor, run_conveyor_ok};
use anyhow::Result;

#[test]
fn test_plan_shows_steps_without_side_effects() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_config("http://127.0.0.1:9")?;

  let output = run_conveyor_ok(&repo.path, &["plan", "2.3.1"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("0.1.0 → 2.3.1"), "stdout: {}", stdout);
  assert!(stdout.contains("Build and publish"));
  assert!(stdout.contains("Propose version bump"));

  // Plan never mutates anything
  assert!(repo.read_file("Cargo.toml")?.contains("version = \"0.1.0\""));
  assert!(repo.remote_branches()?.is_empty());
  assert!(!repo.path.join(".conveyor/credentials.toml").exists());

  Ok(())
}

#[test]
fn test_plan_warns_on_non_semver_tag() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_config("http://127.0.0.1:9")?;

  let output = run_conveyor_ok(&repo.path, &["plan", "banana"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  // Warning only: the command still succeeds, the run would write it verbatim
  assert!(stdout.contains("not a semver"), "stdout: {}", stdout);
  assert!(stdout.contains("verbatim"));

  Ok(())
}

#[test]
fn test_plan_json_output() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_config("http://127.0.0.1:9")?;

  let output = run_conveyor_ok(&repo.path, &["plan", "2.3.1", "--json"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  let plan: serde_json::Value = serde_json::from_str(&stdout)?;
  assert_eq!(plan["tag"], "2.3.1");
  assert_eq!(plan["tag_is_semver"], true);
  assert_eq!(plan["tag_resolves_locally"], true);
  assert_eq!(plan["current_version"], "0.1.0");
  assert_eq!(plan["steps"].as_array().unwrap().len(), 8);

  Ok(())
}

#[test]
fn test_plan_without_config_fails_with_user_error() -> Result<()> {
  let repo = TestRepo::new()?;
  // No conveyor.toml written

  let output = run_conveyor(&repo.path, &["plan", "2.3.1"])?;

  assert!(!output.status.success());
  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("conveyor init"), "stderr: {}", stderr);

  Ok(())
}
