//! Integration tests for `conveyor run`
//!
//! The platform API is a wiremock server; the registry is the fake
//! packaging tool; the proposal push lands in a local bare remote.

use crate::helpers::{TestRepo, run_conveyor, run_conveyor_ok};
use anyhow::Result;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Start a wiremock server usable from the spawned conveyor process.
/// The runtime must stay alive for the server's lifetime.
fn start_mock_server() -> (tokio::runtime::Runtime, MockServer) {
  let rt = tokio::runtime::Runtime::new().expect("tokio runtime");
  let server = rt.block_on(MockServer::start());
  (rt, server)
}

fn mount_release_endpoints(rt: &tokio::runtime::Runtime, server: &MockServer) {
  rt.block_on(async {
    Mock::given(method("GET"))
      .and(path("/repos/acme/widget/releases/tags/2.3.1"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
        "id": 1,
        "tag_name": "2.3.1",
        "upload_url": format!("{}/upload/assets{{?name,label}}", server.uri()),
      })))
      .mount(server)
      .await;

    Mock::given(method("POST"))
      .and(path("/upload/assets"))
      .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 10})))
      .mount(server)
      .await;

    Mock::given(method("POST"))
      .and(path("/repos/acme/widget/pulls"))
      .respond_with(ResponseTemplate::new(201).set_body_json(json!({
        "number": 7,
        "html_url": "https://platform.example/acme/widget/pull/7",
      })))
      .mount(server)
      .await;
  });
}

fn run_args<'a>() -> Vec<&'a str> {
  vec![
    "run",
    "2.3.1",
    "--registry-token",
    "registry-secret",
    "--platform-token",
    "platform-secret",
  ]
}

#[test]
fn test_run_publishes_and_proposes_version_bump() -> Result<()> {
  let repo = TestRepo::new()?;
  let (rt, server) = start_mock_server();
  mount_release_endpoints(&rt, &server);
  repo.write_config(&server.uri())?;

  let output = run_conveyor_ok(&repo.path, &run_args())?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  // Manifest rewritten to the literal tag
  assert!(repo.read_file("Cargo.toml")?.contains("version = \"2.3.1\""));

  // Credentials were injected before publish
  let credentials = repo.read_file(".conveyor/credentials.toml")?;
  assert!(credentials.contains("registry-secret"));

  // The proposal branch exists on the remote and carries the new version
  let branches = repo.remote_branches()?;
  let proposal = branches
    .iter()
    .find(|b| b.starts_with("update-version-"))
    .expect("proposal branch pushed");
  assert!(repo.remote_file(proposal, "Cargo.toml")?.contains("version = \"2.3.1\""));

  // The run reports the opened change request
  assert!(stdout.contains("pull/7"), "stdout: {}", stdout);

  drop(server);
  Ok(())
}

#[test]
fn test_run_json_report_lists_artifacts_and_steps() -> Result<()> {
  let repo = TestRepo::new()?;
  let (rt, server) = start_mock_server();
  mount_release_endpoints(&rt, &server);
  repo.write_config(&server.uri())?;

  let mut args = run_args();
  args.push("--json");
  let output = run_conveyor_ok(&repo.path, &args)?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  // The JSON report is the last thing printed; find its opening brace
  let json_start = stdout.find("{\n").expect("json report");
  let report: serde_json::Value = serde_json::from_str(&stdout[json_start..])?;

  assert_eq!(report["event"]["tag"], "2.3.1");
  assert_eq!(report["steps"].as_array().unwrap().len(), 8);
  assert_eq!(report["artifacts"].as_array().unwrap().len(), 2);
  assert_eq!(report["change_request"]["number"], 7);

  drop(server);
  Ok(())
}

#[test]
fn test_run_conflict_stops_before_platform_steps() -> Result<()> {
  let repo = TestRepo::new()?;
  // The platform is never reached: any request would fail loudly
  repo.write_config("http://127.0.0.1:9")?;
  repo.touch_marker(".publish-conflict")?;

  let output = run_conveyor(&repo.path, &run_args())?;

  assert!(!output.status.success());
  assert_eq!(output.status.code(), Some(2));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("already exists"), "stderr: {}", stderr);

  // Steps 7-8 never executed: nothing was pushed
  assert!(repo.remote_branches()?.is_empty());

  Ok(())
}

#[test]
fn test_run_empty_artifact_set_still_proposes() -> Result<()> {
  let repo = TestRepo::new()?;
  let (rt, server) = start_mock_server();
  mount_release_endpoints(&rt, &server);
  repo.write_config(&server.uri())?;
  repo.touch_marker(".empty-build")?;

  let output = run_conveyor_ok(&repo.path, &run_args())?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  // Step 7 downgraded to a no-op, step 8 still ran
  assert!(stdout.contains("no artifacts to attach"), "stdout: {}", stdout);
  let branches = repo.remote_branches()?;
  assert!(branches.iter().any(|b| b.starts_with("update-version-")));

  // No asset upload was attempted
  let requests = rt.block_on(server.received_requests()).unwrap_or_default();
  assert!(
    !requests.iter().any(|r| r.url.path().contains("/upload/assets")),
    "unexpected upload requests"
  );

  drop(server);
  Ok(())
}

#[test]
fn test_run_runtime_mismatch_aborts_before_any_mutation() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write_config("http://127.0.0.1:9")?;

  // Pin a version the fake runtime does not report
  let config = repo.read_file("conveyor.toml")?;
  std::fs::write(
    repo.path.join("conveyor.toml"),
    config.replace("pinned = \"1.91.0\"", "pinned = \"9.9.9\""),
  )?;

  let output = run_conveyor(&repo.path, &run_args())?;

  assert!(!output.status.success());
  assert_eq!(output.status.code(), Some(3));

  // Nothing downstream executed: no credentials, no version rewrite
  assert!(!repo.path.join(".conveyor/credentials.toml").exists());
  assert!(repo.read_file("Cargo.toml")?.contains("version = \"0.1.0\""));
  assert!(repo.remote_branches()?.is_empty());

  Ok(())
}
