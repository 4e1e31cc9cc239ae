//! The publish pipeline: eight typed steps, fail-fast, no compensation
//!
//! A run is a linear chain - each step blocks the next, any failure halts
//! everything downstream, and completed steps are never rolled back. The
//! pipeline records what actually executed so the final report (human or
//! JSON) reflects exactly how far the run got.

use crate::core::error::ConveyorResult;
use crate::platform::ChangeRequest;
use crate::release::ReleaseEvent;
use serde::Serialize;

/// The eight steps of a publish run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Step {
  AcquireSource,
  ProvisionRuntime,
  ProvisionTool,
  ConfigureCredentials,
  RewriteVersion,
  BuildAndPublish,
  AttachArtifacts,
  ProposeVersionBump,
}

impl Step {
  /// All steps in execution order
  pub const ALL: [Step; 8] = [
    Step::AcquireSource,
    Step::ProvisionRuntime,
    Step::ProvisionTool,
    Step::ConfigureCredentials,
    Step::RewriteVersion,
    Step::BuildAndPublish,
    Step::AttachArtifacts,
    Step::ProposeVersionBump,
  ];

  /// 1-based position in the chain
  pub fn number(self) -> usize {
    Step::ALL.iter().position(|s| *s == self).map(|i| i + 1).unwrap_or(0)
  }

  /// Human-readable title
  pub fn title(self) -> &'static str {
    match self {
      Step::AcquireSource => "Acquire source",
      Step::ProvisionRuntime => "Provision runtime",
      Step::ProvisionTool => "Provision packaging tool",
      Step::ConfigureCredentials => "Configure registry credentials",
      Step::RewriteVersion => "Rewrite version",
      Step::BuildAndPublish => "Build and publish",
      Step::AttachArtifacts => "Attach artifacts to release",
      Step::ProposeVersionBump => "Propose version bump",
    }
  }
}

/// Outcome of one executed step
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
  pub step: Step,
  /// One-line summary of what the step did
  pub detail: String,
}

/// What a completed run produced
#[derive(Debug, Serialize)]
pub struct RunReport {
  pub event: ReleaseEvent,
  pub steps: Vec<StepRecord>,
  /// Artifact digests, keyed by asset name (filled by the build step)
  pub artifacts: Vec<ArtifactRecord>,
  /// The proposal, once opened
  pub change_request: Option<ChangeRequest>,
}

/// Digest line for one artifact in the report
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactRecord {
  pub name: String,
  pub size: u64,
  pub sha256: String,
}

impl RunReport {
  pub fn new(event: &ReleaseEvent) -> Self {
    Self {
      event: event.clone(),
      steps: Vec::new(),
      artifacts: Vec::new(),
      change_request: None,
    }
  }

  /// Execute one step, printing its progress line and recording its
  /// outcome. Fail-fast: the error propagates untouched, so steps after a
  /// failure never execute and never appear in the report.
  pub fn step<T>(
    &mut self,
    step: Step,
    f: impl FnOnce() -> ConveyorResult<(T, String)>,
  ) -> ConveyorResult<T> {
    println!("[{}/8] {}...", step.number(), step.title());

    let (value, detail) = f()?;

    if !detail.is_empty() {
      println!("      {}", detail);
    }
    self.steps.push(StepRecord { step, detail });

    Ok(value)
  }

  /// Number of steps that completed
  pub fn completed(&self) -> usize {
    self.steps.len()
  }
}
