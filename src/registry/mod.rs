//! Build and publish through the packaging tool
//!
//! Conveyor never speaks the registry protocol itself: the configured
//! packaging tool builds the artifact set and uploads it under the new
//! version. Failures are classified from the tool's stderr into the three
//! fatal publish outcomes - build error, duplicate version, auth rejection.
//! No retry is attempted; the run is one-shot.

use crate::core::config::PackagingConfig;
use crate::core::error::{ConveyorError, ConveyorResult, PublishError, ResultExt};
use crate::release::ArtifactSet;
use std::path::Path;
use std::process::Command;

/// Stderr markers that indicate the registry already has this version
const CONFLICT_MARKERS: &[&str] = &["already exists", "already uploaded", "already been published", "409"];

/// Stderr markers that indicate the publish token was rejected
const AUTH_MARKERS: &[&str] = &["401", "403", "unauthorized", "forbidden", "authentication", "invalid token"];

/// Run the tool's build arguments, then collect the artifact set from the
/// configured artifact directory.
///
/// A successful build with an empty artifact directory is not an error
/// here: the attach step downgrades an empty set to a no-op.
pub fn build(root: &Path, cfg: &PackagingConfig) -> ConveyorResult<ArtifactSet> {
  let output = Command::new(&cfg.command)
    .current_dir(root)
    .args(&cfg.build_args)
    .output()
    .with_context(|| format!("Failed to execute '{}'", cfg.command))?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    return Err(ConveyorError::Publish(PublishError::BuildFailed {
      command: format!("{} {}", cfg.command, cfg.build_args.join(" ")),
      stderr: stderr.to_string(),
    }));
  }

  let artifact_dir = if cfg.artifact_dir.is_absolute() {
    cfg.artifact_dir.clone()
  } else {
    root.join(&cfg.artifact_dir)
  };

  ArtifactSet::collect(&artifact_dir)
}

/// Run the tool's publish arguments, classifying failure from stderr.
pub fn publish(root: &Path, cfg: &PackagingConfig, version: &str) -> ConveyorResult<()> {
  let output = Command::new(&cfg.command)
    .current_dir(root)
    .args(&cfg.publish_args)
    .output()
    .with_context(|| format!("Failed to execute '{}'", cfg.command))?;

  if output.status.success() {
    return Ok(());
  }

  let stderr = String::from_utf8_lossy(&output.stderr).to_string();
  Err(classify_publish_failure(
    &format!("{} {}", cfg.command, cfg.publish_args.join(" ")),
    version,
    stderr,
  ))
}

/// Map the tool's stderr onto the publish error taxonomy
fn classify_publish_failure(command: &str, version: &str, stderr: String) -> ConveyorError {
  let lower = stderr.to_lowercase();

  if CONFLICT_MARKERS.iter().any(|m| lower.contains(m)) {
    return ConveyorError::Publish(PublishError::DuplicateVersion {
      version: version.to_string(),
      stderr,
    });
  }

  if AUTH_MARKERS.iter().any(|m| lower.contains(m)) {
    return ConveyorError::Publish(PublishError::AuthRejected { stderr });
  }

  ConveyorError::Publish(PublishError::PublishFailed {
    command: command.to_string(),
    stderr,
  })
}
