//! Integration tests for `conveyor doctor`

use crate::helpers::{TestRepo, run_conveyor_ok};
use anyhow::Result;

#[test]
fn test_doctor_json_reports_healthy_sandbox() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_config("http://127.0.0.1:9")?;

  let output = run_conveyor_ok(&repo.path, &["doctor", "--json"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  let results: serde_json::Value = serde_json::from_str(&stdout)?;
  let results = results.as_array().expect("array of check results");

  let by_name = |name: &str| {
    results
      .iter()
      .find(|r| r["check_name"] == name)
      .unwrap_or_else(|| panic!("missing check '{}'", name))
  };

  assert_eq!(by_name("git")["passed"], true);
  assert_eq!(by_name("workspace")["passed"], true);
  assert_eq!(by_name("runtime")["passed"], true);
  assert_eq!(by_name("packaging-tool")["passed"], true);

  // Expensive checks are skipped without --thorough
  assert!(results.iter().all(|r| r["check_name"] != "platform-api"));

  Ok(())
}

#[test]
fn test_doctor_flags_missing_config() -> Result<()> {
  let repo = TestRepo::new()?;
  // No conveyor.toml: workspace check fails, doctor (json mode) still reports

  let output = run_conveyor_ok(&repo.path, &["doctor", "--json"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  let results: serde_json::Value = serde_json::from_str(&stdout)?;
  let workspace = results
    .as_array()
    .unwrap()
    .iter()
    .find(|r| r["check_name"] == "workspace")
    .expect("workspace check");

  assert_eq!(workspace["passed"], false);

  Ok(())
}
