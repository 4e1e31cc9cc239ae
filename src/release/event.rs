//! The release event that triggers a publish run

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A "release published" trigger.
///
/// Immutable once received. The tag doubles as the target version
/// identifier; no well-formedness check is applied to it anywhere in the
/// run (an invalid tag propagates verbatim into the manifest and the
/// published package metadata).
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseEvent {
  /// The tag string carried by the trigger
  pub tag: String,

  /// When this process received the event. Captured once; the sole source
  /// for the proposal branch timestamp.
  pub received_at: DateTime<Utc>,
}

impl ReleaseEvent {
  /// Receive an event now
  pub fn new(tag: impl Into<String>) -> Self {
    Self {
      tag: tag.into(),
      received_at: Utc::now(),
    }
  }

  /// Construct with an explicit receipt time (deterministic tests)
  #[allow(dead_code)]
  pub fn at(tag: impl Into<String>, received_at: DateTime<Utc>) -> Self {
    Self {
      tag: tag.into(),
      received_at,
    }
  }

  /// Expand a proposal branch pattern for this event.
  ///
  /// `{timestamp}` expands to the receipt time at second resolution, which
  /// guarantees distinct branch names for runs triggered at different
  /// times. `{version}` expands to the tag.
  pub fn branch_name(&self, pattern: &str) -> String {
    let timestamp = self.received_at.format("%Y%m%d-%H%M%S").to_string();
    pattern
      .replace("{timestamp}", &timestamp)
      .replace("{version}", &self.tag)
  }

  /// Expand `{version}` in a commit message or title template
  pub fn expand(&self, template: &str) -> String {
    template.replace("{version}", &self.tag)
  }
}
