//! Lossless manifest editing
//!
//! The version rewrite is the only file mutation a run performs. Editing
//! goes through `toml_edit` so the rest of the manifest (formatting,
//! comments, key order) survives byte-for-byte - the proposal commit must
//! contain the version change and nothing else.

use crate::core::error::{ConveyorError, ConveyorResult, ResultExt};
use std::path::{Path, PathBuf};
use toml_edit::DocumentMut;

/// The project manifest, held as a lossless TOML document
pub struct Manifest {
  path: PathBuf,
  doc: DocumentMut,
}

impl Manifest {
  /// Load the manifest from disk
  pub fn load(path: &Path) -> ConveyorResult<Self> {
    let content = std::fs::read_to_string(path)
      .with_context(|| format!("Failed to read manifest {}", path.display()))?;

    let doc: DocumentMut = content
      .parse()
      .with_context(|| format!("Failed to parse manifest {}", path.display()))?;

    Ok(Self {
      path: path.to_path_buf(),
      doc,
    })
  }

  /// Path this manifest was loaded from
  #[allow(dead_code)]
  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Read the version at a dotted key path (e.g. "package.version")
  pub fn version(&self, version_key: &str) -> ConveyorResult<String> {
    let mut item = self.doc.as_item();
    for segment in version_key.split('.') {
      let table = item
        .as_table_like()
        .ok_or_else(|| ConveyorError::message(format!("Manifest path '{}' is not a table", version_key)))?;
      item = table
        .get(segment)
        .ok_or_else(|| self.missing_key(version_key, segment))?;
    }

    item
      .as_str()
      .map(|s| s.to_string())
      .ok_or_else(|| ConveyorError::message(format!("Manifest field '{}' is not a string", version_key)))
  }

  /// Overwrite the version at a dotted key path with a literal string.
  ///
  /// No well-formedness check: the caller's string (the release tag) is
  /// written verbatim.
  pub fn set_version(&mut self, version_key: &str, value: &str) -> ConveyorResult<()> {
    let mut segments: Vec<&str> = version_key.split('.').collect();
    let leaf = segments
      .pop()
      .ok_or_else(|| ConveyorError::message("Empty manifest version key"))?;

    let path_display = self.path.display().to_string();
    let missing = |segment: &str| {
      ConveyorError::with_help(
        format!(
          "Manifest {} has no '{}' (while resolving '{}')",
          path_display, segment, version_key
        ),
        "Check `manifest.version_key` in conveyor.toml.",
      )
    };

    let mut item = self.doc.as_item_mut();
    for segment in &segments {
      let table = item
        .as_table_like_mut()
        .ok_or_else(|| ConveyorError::message(format!("Manifest path '{}' is not a table", version_key)))?;
      item = table.get_mut(segment).ok_or_else(|| missing(segment))?;
    }

    let table = item
      .as_table_like_mut()
      .ok_or_else(|| ConveyorError::message(format!("Manifest path '{}' is not a table", version_key)))?;

    if table.get(leaf).is_none() {
      return Err(missing(leaf));
    }
    table.insert(leaf, toml_edit::value(value));

    Ok(())
  }

  /// Write the document back to disk
  pub fn save(&self) -> ConveyorResult<()> {
    std::fs::write(&self.path, self.doc.to_string())
      .with_context(|| format!("Failed to write manifest {}", self.path.display()))?;
    Ok(())
  }

  fn missing_key(&self, version_key: &str, segment: &str) -> ConveyorError {
    ConveyorError::with_help(
      format!(
        "Manifest {} has no '{}' (while resolving '{}')",
        self.path.display(),
        segment,
        version_key
      ),
      "Check `manifest.version_key` in conveyor.toml.",
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn write_manifest(content: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Cargo.toml");
    std::fs::write(&path, content).unwrap();
    (dir, path)
  }

  #[test]
  fn test_read_version_dotted_key() {
    let (_dir, path) = write_manifest("[package]\nname = \"widget\"\nversion = \"0.1.0\"\n");
    let manifest = Manifest::load(&path).unwrap();
    assert_eq!(manifest.version("package.version").unwrap(), "0.1.0");
  }

  #[test]
  fn test_set_version_preserves_formatting_and_comments() {
    let content = "# top comment\n[package]\nname = \"widget\"  # inline\nversion = \"0.1.0\"\n\n[dependencies]\nserde = \"1\"\n";
    let (_dir, path) = write_manifest(content);

    let mut manifest = Manifest::load(&path).unwrap();
    manifest.set_version("package.version", "2.3.1").unwrap();
    manifest.save().unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("version = \"2.3.1\""));
    assert!(written.contains("# top comment"));
    assert!(written.contains("name = \"widget\"  # inline"));
    assert!(written.contains("[dependencies]"));
  }

  #[test]
  fn test_set_version_writes_non_semver_verbatim() {
    let (_dir, path) = write_manifest("[package]\nversion = \"0.1.0\"\n");
    let mut manifest = Manifest::load(&path).unwrap();
    manifest.set_version("package.version", "not-a-version").unwrap();
    manifest.save().unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("version = \"not-a-version\""));
  }

  #[test]
  fn test_missing_key_errors() {
    let (_dir, path) = write_manifest("[package]\nname = \"widget\"\n");
    let manifest = Manifest::load(&path).unwrap();
    assert!(manifest.version("package.version").is_err());

    let mut manifest = Manifest::load(&path).unwrap();
    assert!(manifest.set_version("package.version", "1.0.0").is_err());
    assert!(manifest.set_version("tool.poetry.version", "1.0.0").is_err());
  }
}
