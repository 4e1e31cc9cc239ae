//! The artifact set produced by the build step
//!
//! Ordered (name-sorted) so registry upload and asset attachment see the
//! same sequence. Ephemeral: collected after the build, consumed by the
//! upload steps, discarded when the run ends.

use crate::core::error::{ConveyorResult, ResultExt};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// A single build output file
#[derive(Debug, Clone, Serialize)]
pub struct Artifact {
  /// Absolute path on disk
  pub path: PathBuf,

  /// File name, used as the asset name on the release entry
  pub name: String,

  /// Size in bytes
  pub size: u64,

  /// SHA-256 digest of the file contents (hex)
  pub digest: String,
}

/// Ordered collection of build outputs
#[derive(Debug, Clone, Default, Serialize)]
pub struct ArtifactSet {
  artifacts: Vec<Artifact>,
}

impl ArtifactSet {
  /// Collect all regular files from the artifact directory, sorted by name.
  ///
  /// A missing directory yields an empty set: the attach step treats an
  /// empty set as a no-op, not an error.
  pub fn collect(dir: &Path) -> ConveyorResult<Self> {
    if !dir.is_dir() {
      return Ok(Self::default());
    }

    let mut artifacts = Vec::new();
    let entries =
      std::fs::read_dir(dir).with_context(|| format!("Failed to read artifact directory {}", dir.display()))?;

    for entry in entries {
      let entry = entry.with_context(|| format!("Failed to read artifact directory {}", dir.display()))?;
      let path = entry.path();
      if !path.is_file() {
        continue;
      }

      let name = entry.file_name().to_string_lossy().to_string();
      let contents = std::fs::read(&path).with_context(|| format!("Failed to read artifact {}", path.display()))?;
      let digest = format!("{:x}", Sha256::digest(&contents));

      artifacts.push(Artifact {
        path,
        name,
        size: contents.len() as u64,
        digest,
      });
    }

    artifacts.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(Self { artifacts })
  }

  /// Artifacts in name order
  pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
    self.artifacts.iter()
  }

  pub fn len(&self) -> usize {
    self.artifacts.len()
  }

  pub fn is_empty(&self) -> bool {
    self.artifacts.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_collect_sorts_by_name() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("b.tar.gz"), b"bb").unwrap();
    std::fs::write(dir.path().join("a.tar.gz"), b"aa").unwrap();

    let set = ArtifactSet::collect(dir.path()).unwrap();
    let names: Vec<_> = set.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["a.tar.gz", "b.tar.gz"]);
  }

  #[test]
  fn test_collect_missing_dir_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let set = ArtifactSet::collect(&dir.path().join("nope")).unwrap();
    assert!(set.is_empty());
    assert_eq!(set.len(), 0);
  }

  #[test]
  fn test_collect_skips_subdirectories() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("nested")).unwrap();
    std::fs::write(dir.path().join("pkg.tar.gz"), b"data").unwrap();

    let set = ArtifactSet::collect(dir.path()).unwrap();
    assert_eq!(set.len(), 1);
  }

  #[test]
  fn test_digest_is_sha256_hex() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("pkg.tar.gz"), b"abc").unwrap();

    let set = ArtifactSet::collect(dir.path()).unwrap();
    let artifact = set.iter().next().unwrap();
    // sha256("abc")
    assert_eq!(
      artifact.digest,
      "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
    assert_eq!(artifact.size, 3);
  }
}
