//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A sandbox repository with a bare remote and fake tools
pub struct TestRepo {
  _root: TempDir,
  /// Working repository (where conveyor runs)
  pub path: PathBuf,
  /// Bare remote the proposal branch is pushed to
  pub remote: PathBuf,
  /// Directory holding the fake runtime and packaging tool scripts
  pub bin: PathBuf,
}

impl TestRepo {
  /// Create a repository with one committed manifest, a `2.3.1` tag, a bare
  /// `origin`, and executable fake tools.
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().join("repo");
    let remote = root.path().join("remote.git");
    let bin = root.path().join("bin");
    std::fs::create_dir_all(&path)?;
    std::fs::create_dir_all(&bin)?;

    // Bare remote
    git(root.path(), &["init", "--bare", "remote.git"])?;

    // Working repository with main as default branch
    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;
    git(&path, &["remote", "add", "origin", remote.to_str().unwrap()])?;

    // The manifest: the one file a run mutates
    std::fs::write(
      path.join("Cargo.toml"),
      "[package]\nname = \"widget\"\nversion = \"0.1.0\"\n",
    )?;

    git(&path, &["add", "."])?;
    git(&path, &["commit", "-m", "Initial manifest"])?;
    git(&path, &["tag", "2.3.1"])?;

    write_script(
      &bin.join("fake-runtime"),
      "#!/bin/sh\necho \"fakerust 1.91.0 (sandbox)\"\n",
    )?;

    // Fake packaging tool. Marker files in the repo root change behavior:
    //   .empty-build      -> build produces no artifacts
    //   .publish-conflict -> publish fails as a duplicate version
    write_script(
      &bin.join("fake-tool"),
      r#"#!/bin/sh
case "$1" in
  --version)
    echo "fake-tool 1.0.0"
    ;;
  build)
    mkdir -p dist
    if [ ! -f .empty-build ]; then
      printf 'tarball-bytes' > dist/widget-sdist.tar.gz
      printf 'wheel-bytes' > dist/widget-wheel.whl
    fi
    ;;
  publish)
    if [ ! -f .conveyor/credentials.toml ]; then
      echo "error: no credentials configured" >&2
      exit 1
    fi
    if [ -f .publish-conflict ]; then
      echo "error: version already exists in the registry" >&2
      exit 1
    fi
    ;;
esac
"#,
    )?;

    Ok(Self {
      _root: root,
      path,
      remote,
      bin,
    })
  }

  /// Write conveyor.toml pointing at the fake tools and the given platform
  /// API base URL (a wiremock server in tests that reach the platform).
  pub fn write_config(&self, api_base: &str) -> Result<()> {
    let config = format!(
      r#"[manifest]
path = "Cargo.toml"
version_key = "package.version"

[runtime]
command = "{runtime}"
pinned = "1.91.0"

[packaging]
command = "{tool}"
build_args = ["build"]
publish_args = ["publish"]
artifact_dir = "dist"
credentials_path = ".conveyor/credentials.toml"

[platform]
api_base = "{api_base}"
repo = "acme/widget"

[proposal]
remote = "origin"
base_branch = "main"
branch_pattern = "update-version-{{timestamp}}"
"#,
      runtime = self.bin.join("fake-runtime").display(),
      tool = self.bin.join("fake-tool").display(),
      api_base = api_base,
    );

    std::fs::write(self.path.join("conveyor.toml"), config)?;
    Ok(())
  }

  /// Drop a marker file the fake tool reacts to
  pub fn touch_marker(&self, name: &str) -> Result<()> {
    std::fs::write(self.path.join(name), "")?;
    Ok(())
  }

  /// Branches currently on the bare remote
  pub fn remote_branches(&self) -> Result<Vec<String>> {
    let output = git(
      &self.remote,
      &["for-each-ref", "refs/heads", "--format=%(refname:short)"],
    )?;
    Ok(
      String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(String::from)
        .collect(),
    )
  }

  /// Read a file from a branch on the bare remote
  pub fn remote_file(&self, branch: &str, file: &str) -> Result<String> {
    let output = git(&self.remote, &["show", &format!("{}:{}", branch, file)])?;
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
  }

  /// Read a file from the working repository
  pub fn read_file(&self, file: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(file))?)
  }
}

fn write_script(path: &Path, content: &str) -> Result<()> {
  std::fs::write(path, content)?;
  #[cfg(unix)]
  {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))?;
  }
  Ok(())
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run the conveyor CLI; callers assert on the returned Output
pub fn run_conveyor(cwd: &Path, args: &[&str]) -> Result<Output> {
  let conveyor_bin = env!("CARGO_BIN_EXE_conveyor");

  let output = Command::new(conveyor_bin)
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run conveyor")?;

  Ok(output)
}

/// Run the conveyor CLI and fail the test if it exits nonzero
pub fn run_conveyor_ok(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_conveyor(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "conveyor command failed: conveyor {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}
