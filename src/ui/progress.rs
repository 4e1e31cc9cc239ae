//! Progress indicators for long-running operations
//!
//! Uses `linya` for allocation-free progress bars. Asset uploads are the
//! only operation slow enough to deserve one; everything else in a run is
//! a single subprocess or request.

use linya::{Bar, Progress};

/// Progress bar wrapper for sequential asset uploads
pub struct UploadProgress {
  progress: Progress,
  bar: Bar,
}

impl UploadProgress {
  /// Create a new progress bar for uploading `total` assets
  pub fn new(total: usize, label: impl Into<String>) -> Self {
    let mut progress = Progress::new();
    let bar = progress.bar(total, label.into());
    Self { progress, bar }
  }

  /// Increment progress by 1
  pub fn inc(&mut self) {
    self.progress.inc_and_draw(&self.bar, 1);
  }
}
