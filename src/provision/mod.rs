//! Environment provisioning: pinned runtime, packaging tool, credentials
//!
//! Provisioning failures are environment errors, not data errors - they
//! abort the run before any external system is touched. Probe-then-install
//! keeps the install path idempotent: re-running against an already
//! provisioned environment only probes.

use crate::core::config::{PackagingConfig, RuntimeConfig};
use crate::core::error::{ConveyorError, ConveyorResult, EnvironmentError, ResultExt};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Probe a tool by running `command probe_args` and capturing the first
/// line it reports. Returns None if the command could not be executed or
/// exited nonzero.
fn probe(root: &Path, command: &str, probe_args: &[String]) -> Option<String> {
  let output = Command::new(command)
    .current_dir(root)
    .args(probe_args)
    .output()
    .ok()?;

  if !output.status.success() {
    return None;
  }

  let stdout = String::from_utf8_lossy(&output.stdout);
  Some(stdout.lines().next().unwrap_or("").trim().to_string())
}

/// Run a configured install argv once
fn run_install(root: &Path, install: &[String]) -> ConveyorResult<()> {
  let (program, args) = install
    .split_first()
    .ok_or_else(|| ConveyorError::message("Empty install command"))?;

  let output = Command::new(program)
    .current_dir(root)
    .args(args)
    .output()
    .with_context(|| format!("Failed to execute install command '{}'", program))?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    return Err(ConveyorError::Environment(EnvironmentError::InstallFailed {
      command: install.join(" "),
      stderr: stderr.to_string(),
    }));
  }

  Ok(())
}

/// Probe the tool; if the probe fails and an install argv is configured,
/// install once and re-probe.
fn ensure_tool(root: &Path, command: &str, probe_args: &[String], install: &[String]) -> ConveyorResult<String> {
  if let Some(reported) = probe(root, command, probe_args) {
    return Ok(reported);
  }

  if !install.is_empty() {
    run_install(root, install)?;
    if let Some(reported) = probe(root, command, probe_args) {
      return Ok(reported);
    }
  }

  Err(ConveyorError::Environment(EnvironmentError::NotInstalled {
    command: command.to_string(),
    detail: "probe failed".to_string(),
  }))
}

/// Ensure the pinned runtime is present and reports the pinned version.
///
/// The probe output must contain the pinned version string; anything else
/// is a fatal environment mismatch (the packaging tool and manifest expect
/// exactly this runtime).
pub fn ensure_runtime(root: &Path, cfg: &RuntimeConfig) -> ConveyorResult<String> {
  let reported = ensure_tool(root, &cfg.command, &cfg.probe_args, &cfg.install)?;

  if !reported.contains(&cfg.pinned) {
    return Err(ConveyorError::Environment(EnvironmentError::VersionMismatch {
      command: cfg.command.clone(),
      pinned: cfg.pinned.clone(),
      reported,
    }));
  }

  Ok(reported)
}

/// Ensure the packaging tool is present. No version pin; idempotent.
pub fn ensure_packaging_tool(root: &Path, cfg: &PackagingConfig) -> ConveyorResult<String> {
  ensure_tool(root, &cfg.command, &cfg.probe_args, &cfg.install)
}

/// Inject the registry token into the packaging tool's configuration.
///
/// Renders `credentials_template` with the token and writes it to
/// `credentials_path`. No validation of the token occurs here; an invalid
/// token surfaces only at the publish step.
pub fn write_credentials(root: &Path, cfg: &PackagingConfig, token: &str) -> ConveyorResult<PathBuf> {
  let path = if cfg.credentials_path.is_absolute() {
    cfg.credentials_path.clone()
  } else {
    root.join(&cfg.credentials_path)
  };

  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("Failed to create credentials directory {}", parent.display()))?;
  }

  let rendered = cfg.credentials_template.replace("{token}", token);
  std::fs::write(&path, rendered).with_context(|| format!("Failed to write credentials {}", path.display()))?;

  // The file holds a live secret
  #[cfg(unix)]
  {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))
      .with_context(|| format!("Failed to restrict credentials {}", path.display()))?;
  }

  Ok(path)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::config::PackagingConfig;

  #[test]
  fn test_write_credentials_renders_token() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = PackagingConfig {
      credentials_path: PathBuf::from(".conveyor/credentials.toml"),
      credentials_template: "[registry]\ntoken = \"{token}\"\n".to_string(),
      ..PackagingConfig::default()
    };

    let path = write_credentials(dir.path(), &cfg, "s3cr3t").unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, "[registry]\ntoken = \"s3cr3t\"\n");
  }

  #[cfg(unix)]
  #[test]
  fn test_credentials_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let cfg = PackagingConfig::default();
    let path = write_credentials(dir.path(), &cfg, "tok").unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
  }

  #[test]
  fn test_probe_missing_command_is_none() {
    let dir = tempfile::tempdir().unwrap();
    assert!(probe(dir.path(), "definitely-not-a-real-binary", &["--version".to_string()]).is_none());
  }

  #[test]
  fn test_ensure_tool_reports_not_installed() {
    let dir = tempfile::tempdir().unwrap();
    let err = ensure_tool(dir.path(), "definitely-not-a-real-binary", &["--version".to_string()], &[]).unwrap_err();
    assert_eq!(err.exit_code().as_i32(), 3);
  }
}
