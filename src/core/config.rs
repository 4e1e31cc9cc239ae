use crate::core::error::{ConfigError, ConveyorError, ConveyorResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for conveyor
/// Searched in order: conveyor.toml, .conveyor.toml, .config/conveyor.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConveyorConfig {
  pub manifest: ManifestConfig,
  #[serde(default)]
  pub runtime: RuntimeConfig,
  #[serde(default)]
  pub packaging: PackagingConfig,
  pub platform: PlatformConfig,
  #[serde(default)]
  pub proposal: ProposalConfig,
}

/// The project manifest: the one file a run mutates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestConfig {
  /// Path to the manifest file (relative to the repository root)
  #[serde(default = "default_manifest_path")]
  pub path: PathBuf,

  /// Dotted path to the version field inside the manifest
  #[serde(default = "default_version_key")]
  pub version_key: String,
}

fn default_manifest_path() -> PathBuf {
  PathBuf::from("Cargo.toml")
}

fn default_version_key() -> String {
  "package.version".to_string()
}

impl Default for ManifestConfig {
  fn default() -> Self {
    Self {
      path: default_manifest_path(),
      version_key: default_version_key(),
    }
  }
}

/// The pinned language runtime the packaging tool expects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
  /// Runtime binary to probe
  #[serde(default = "default_runtime_command")]
  pub command: String,

  /// Version string the probe output must contain
  #[serde(default = "default_runtime_pinned")]
  pub pinned: String,

  /// Arguments that make the runtime report its version
  #[serde(default = "default_probe_args")]
  pub probe_args: Vec<String>,

  /// Optional argv that installs the pinned runtime (run once if the probe fails)
  #[serde(default)]
  pub install: Vec<String>,
}

fn default_runtime_command() -> String {
  "rustc".to_string()
}

fn default_runtime_pinned() -> String {
  "1.91.0".to_string()
}

fn default_probe_args() -> Vec<String> {
  vec!["--version".to_string()]
}

impl Default for RuntimeConfig {
  fn default() -> Self {
    Self {
      command: default_runtime_command(),
      pinned: default_runtime_pinned(),
      probe_args: default_probe_args(),
      install: Vec::new(),
    }
  }
}

/// The packaging tool that builds and uploads artifacts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackagingConfig {
  /// Packaging tool binary
  #[serde(default = "default_packaging_command")]
  pub command: String,

  /// Arguments that make the tool report its version (provisioning probe)
  #[serde(default = "default_probe_args")]
  pub probe_args: Vec<String>,

  /// Optional argv that installs the tool (run once if the probe fails)
  #[serde(default)]
  pub install: Vec<String>,

  /// Arguments that build the artifact set
  #[serde(default = "default_build_args")]
  pub build_args: Vec<String>,

  /// Arguments that upload the artifact set to the registry
  #[serde(default = "default_publish_args")]
  pub publish_args: Vec<String>,

  /// Directory the build writes artifacts into (relative to the repository root)
  #[serde(default = "default_artifact_dir")]
  pub artifact_dir: PathBuf,

  /// Where to write the registry token (relative paths resolve against the
  /// repository root)
  #[serde(default = "default_credentials_path")]
  pub credentials_path: PathBuf,

  /// Credentials file contents; `{token}` is replaced with the injected token
  #[serde(default = "default_credentials_template")]
  pub credentials_template: String,
}

fn default_packaging_command() -> String {
  "cargo".to_string()
}

fn default_build_args() -> Vec<String> {
  vec![
    "package".to_string(),
    "--no-verify".to_string(),
    "--allow-dirty".to_string(),
  ]
}

fn default_publish_args() -> Vec<String> {
  vec![
    "publish".to_string(),
    "--no-verify".to_string(),
    "--allow-dirty".to_string(),
  ]
}

fn default_artifact_dir() -> PathBuf {
  PathBuf::from("target/package")
}

fn default_credentials_path() -> PathBuf {
  PathBuf::from(".conveyor/credentials.toml")
}

fn default_credentials_template() -> String {
  "[registry]\ntoken = \"{token}\"\n".to_string()
}

impl Default for PackagingConfig {
  fn default() -> Self {
    Self {
      command: default_packaging_command(),
      probe_args: default_probe_args(),
      install: Vec::new(),
      build_args: default_build_args(),
      publish_args: default_publish_args(),
      artifact_dir: default_artifact_dir(),
      credentials_path: default_credentials_path(),
      credentials_template: default_credentials_template(),
    }
  }
}

/// The hosting platform that owns releases and change requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
  /// REST API base URL
  #[serde(default = "default_api_base")]
  pub api_base: String,

  /// Repository slug ("owner/name")
  pub repo: String,
}

fn default_api_base() -> String {
  "https://api.github.com".to_string()
}

/// How the version-bump proposal is branched, committed, and titled
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalConfig {
  /// Remote to push the proposal branch to
  #[serde(default = "default_remote")]
  pub remote: String,

  /// Branch the change request targets
  #[serde(default = "default_base_branch")]
  pub base_branch: String,

  /// Branch name pattern; `{timestamp}` and `{version}` are expanded
  #[serde(default = "default_branch_pattern")]
  pub branch_pattern: String,

  /// Commit message; `{version}` is expanded
  #[serde(default = "default_commit_message")]
  pub commit_message: String,

  /// Change request title; `{version}` is expanded
  #[serde(default = "default_title")]
  pub title: String,

  /// Committer identity for the proposal commit
  #[serde(default = "default_author_name")]
  pub author_name: String,

  #[serde(default = "default_author_email")]
  pub author_email: String,
}

fn default_remote() -> String {
  "origin".to_string()
}

fn default_base_branch() -> String {
  "main".to_string()
}

fn default_branch_pattern() -> String {
  "update-version-{timestamp}".to_string()
}

fn default_commit_message() -> String {
  "Update version to {version}".to_string()
}

fn default_title() -> String {
  "Update version to {version}".to_string()
}

fn default_author_name() -> String {
  "conveyor-bot".to_string()
}

fn default_author_email() -> String {
  "conveyor-bot@users.noreply.invalid".to_string()
}

impl Default for ProposalConfig {
  fn default() -> Self {
    Self {
      remote: default_remote(),
      base_branch: default_base_branch(),
      branch_pattern: default_branch_pattern(),
      commit_message: default_commit_message(),
      title: default_title(),
      author_name: default_author_name(),
      author_email: default_author_email(),
    }
  }
}

impl ConveyorConfig {
  /// Find config file in search order: conveyor.toml, .conveyor.toml, .config/conveyor.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("conveyor.toml"),
      path.join(".conveyor.toml"),
      path.join(".config").join("conveyor.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from conveyor.toml (searches multiple locations)
  pub fn load(path: &Path) -> ConveyorResult<Self> {
    let config_path = Self::find_config_path(path).ok_or_else(|| {
      ConveyorError::Config(ConfigError::NotFound {
        workspace_root: path.to_path_buf(),
      })
    })?;

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: ConveyorConfig = toml_edit::de::from_str(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    config.validate()?;

    Ok(config)
  }

  /// Structural validation only. The release tag itself is never validated:
  /// whatever string triggers the run is written into the manifest verbatim.
  pub fn validate(&self) -> ConveyorResult<()> {
    if self.platform.repo.is_empty() {
      return Err(ConveyorError::Config(ConfigError::MissingField {
        field: "platform.repo".to_string(),
      }));
    }
    if !self.platform.repo.contains('/') {
      return Err(ConveyorError::with_help(
        format!("Invalid platform.repo '{}'", self.platform.repo),
        "Use the \"owner/name\" form, e.g. repo = \"acme/widget\".",
      ));
    }
    if self.manifest.version_key.is_empty() {
      return Err(ConveyorError::Config(ConfigError::MissingField {
        field: "manifest.version_key".to_string(),
      }));
    }
    Ok(())
  }

  /// Check if config exists at the given path
  pub fn exists(path: &Path) -> bool {
    Self::find_config_path(path).is_some()
  }

  /// Starter configuration written by `conveyor init`
  pub fn starter_template(repo: &str) -> String {
    format!(
      r#"# conveyor configuration
# `conveyor run <TAG>` publishes a release and proposes the version bump.

[manifest]
path = "Cargo.toml"
version_key = "package.version"

[runtime]
command = "rustc"
pinned = "1.91.0"
# install = ["rustup", "toolchain", "install", "1.91.0"]

[packaging]
command = "cargo"
build_args = ["package", "--no-verify", "--allow-dirty"]
publish_args = ["publish", "--no-verify", "--allow-dirty"]
artifact_dir = "target/package"

[platform]
api_base = "https://api.github.com"
repo = "{}"

[proposal]
remote = "origin"
base_branch = "main"
branch_pattern = "update-version-{{timestamp}}"
"#,
      repo
    )
  }
}
