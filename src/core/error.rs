//! Error types for conveyor with contextual messages and exit codes
//!
//! This module provides a unified error type that categorizes the failure
//! modes of a publish run. Every error is fatal: a run either completes all
//! steps or stops at whichever step raised. Where possible, errors include a
//! contextual help message to guide users toward resolution.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for conveyor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, missing files)
  User = 1,
  /// System error (git, network, I/O, registry, platform)
  System = 2,
  /// Environment provisioning failure (runtime/tool install or mismatch)
  Environment = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for conveyor
#[derive(Debug)]
pub enum ConveyorError {
  /// Configuration errors
  Config(ConfigError),

  /// Environment provisioning errors (runtime/packaging tool)
  Environment(EnvironmentError),

  /// Git operation errors
  Git(GitError),

  /// Registry publish errors (build, conflict, auth)
  Publish(PublishError),

  /// Platform API errors (auth, release lookup, assets, change request)
  Platform(PlatformError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ConveyorError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ConveyorError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    ConveyorError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ConveyorError::Message { message, context, help } => ConveyorError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ConveyorError::Config(_) => ExitCode::User,
      ConveyorError::Environment(_) => ExitCode::Environment,
      ConveyorError::Git(_) => ExitCode::System,
      ConveyorError::Publish(_) => ExitCode::System,
      ConveyorError::Platform(_) => ExitCode::System,
      ConveyorError::Io(_) => ExitCode::System,
      ConveyorError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ConveyorError::Config(e) => e.help_message(),
      ConveyorError::Environment(e) => e.help_message(),
      ConveyorError::Git(e) => e.help_message(),
      ConveyorError::Publish(e) => e.help_message(),
      ConveyorError::Platform(e) => e.help_message(),
      ConveyorError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for ConveyorError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConveyorError::Config(e) => write!(f, "{}", e),
      ConveyorError::Environment(e) => write!(f, "{}", e),
      ConveyorError::Git(e) => write!(f, "{}", e),
      ConveyorError::Publish(e) => write!(f, "{}", e),
      ConveyorError::Platform(e) => write!(f, "{}", e),
      ConveyorError::Io(e) => write!(f, "I/O error: {}", e),
      ConveyorError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ConveyorError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ConveyorError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ConveyorError {
  fn from(err: io::Error) -> Self {
    ConveyorError::Io(err)
  }
}

impl From<String> for ConveyorError {
  fn from(msg: String) -> Self {
    ConveyorError::message(msg)
  }
}

impl From<&str> for ConveyorError {
  fn from(msg: &str) -> Self {
    ConveyorError::message(msg)
  }
}

impl From<toml_edit::TomlError> for ConveyorError {
  fn from(err: toml_edit::TomlError) -> Self {
    ConveyorError::message(format!("TOML parse error: {}", err))
  }
}

impl From<toml_edit::de::Error> for ConveyorError {
  fn from(err: toml_edit::de::Error) -> Self {
    ConveyorError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<toml_edit::ser::Error> for ConveyorError {
  fn from(err: toml_edit::ser::Error) -> Self {
    ConveyorError::message(format!("TOML serialization error: {}", err))
  }
}

impl From<serde_json::Error> for ConveyorError {
  fn from(err: serde_json::Error) -> Self {
    ConveyorError::message(format!("JSON error: {}", err))
  }
}

impl From<std::string::FromUtf8Error> for ConveyorError {
  fn from(err: std::string::FromUtf8Error) -> Self {
    ConveyorError::message(format!("UTF-8 conversion error: {}", err))
  }
}

impl From<reqwest::Error> for ConveyorError {
  fn from(err: reqwest::Error) -> Self {
    ConveyorError::Platform(PlatformError::Network {
      message: err.to_string(),
    })
  }
}

/// Convert anyhow::Error to ConveyorError (for transition at test seams)
impl From<anyhow::Error> for ConveyorError {
  fn from(err: anyhow::Error) -> Self {
    ConveyorError::message(err.to_string())
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// conveyor.toml not found
  NotFound { workspace_root: PathBuf },

  /// Missing required field
  MissingField { field: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => Some("Run `conveyor init` to create a configuration file.".to_string()),
      ConfigError::MissingField { field } => Some(format!("Set `{}` in conveyor.toml.", field)),
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { workspace_root } => {
        write!(
          f,
          "No conveyor configuration found.\nExpected file: {}/conveyor.toml",
          workspace_root.display()
        )
      }
      ConfigError::MissingField { field } => {
        write!(f, "Missing required field in config: {}", field)
      }
    }
  }
}

/// Environment provisioning errors (runtime or packaging tool)
///
/// These are environment errors, not data errors: the run aborts before any
/// external system is touched.
#[derive(Debug)]
pub enum EnvironmentError {
  /// The probed tool could not be executed at all
  NotInstalled { command: String, detail: String },

  /// Install command ran but the probe still fails
  InstallFailed { command: String, stderr: String },

  /// Runtime probe succeeded but reported a different version than pinned
  VersionMismatch {
    command: String,
    pinned: String,
    reported: String,
  },
}

impl EnvironmentError {
  fn help_message(&self) -> Option<String> {
    match self {
      EnvironmentError::NotInstalled { command, .. } => Some(format!(
        "Install '{}' or configure an `install` command in conveyor.toml.",
        command
      )),
      EnvironmentError::InstallFailed { .. } => None,
      EnvironmentError::VersionMismatch { pinned, .. } => Some(format!(
        "Install version {} or update `runtime.pinned` in conveyor.toml.",
        pinned
      )),
    }
  }
}

impl fmt::Display for EnvironmentError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      EnvironmentError::NotInstalled { command, detail } => {
        write!(f, "'{}' is not available: {}", command, detail)
      }
      EnvironmentError::InstallFailed { command, stderr } => {
        write!(f, "Installing '{}' failed:\n{}", command, stderr)
      }
      EnvironmentError::VersionMismatch {
        command,
        pinned,
        reported,
      } => {
        write!(
          f,
          "'{}' version mismatch: pinned '{}', reported '{}'",
          command, pinned, reported
        )
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },

  /// Branch operation failed
  BranchError { message: String },

  /// Push failed
  PushFailed {
    remote: String,
    branch: String,
    reason: String,
  },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::PushFailed { reason, .. } => {
        if reason.contains("non-fast-forward") {
          Some("The remote has commits you don't have. The proposal branch name should be unique; check for clock skew.".to_string())
        } else if reason.contains("permission denied") || reason.contains("403") {
          Some("Check the platform token's push permissions. Run `conveyor doctor` to diagnose.".to_string())
        } else {
          None
        }
      }
      GitError::RepoNotFound { path } => Some(format!(
        "Run conveyor from inside the repository, or check the path: {}",
        path.display()
      )),
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
      GitError::BranchError { message } => {
        write!(f, "Branch operation failed: {}", message)
      }
      GitError::PushFailed { remote, branch, reason } => {
        write!(f, "Push to {}/{} failed: {}", remote, branch, reason)
      }
    }
  }
}

/// Registry publish errors, classified from the packaging tool's output
#[derive(Debug)]
pub enum PublishError {
  /// The build invocation failed
  BuildFailed { command: String, stderr: String },

  /// The registry already has this version
  DuplicateVersion { version: String, stderr: String },

  /// The registry rejected the publish token
  AuthRejected { stderr: String },

  /// Publish failed for another reason
  PublishFailed { command: String, stderr: String },
}

impl PublishError {
  fn help_message(&self) -> Option<String> {
    match self {
      PublishError::DuplicateVersion { version, .. } => Some(format!(
        "Version {} is already published. Registries do not allow re-publishing; cut a new release with a fresh tag.",
        version
      )),
      PublishError::AuthRejected { .. } => {
        Some("Check that the registry token is valid and not expired.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for PublishError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PublishError::BuildFailed { command, stderr } => {
        write!(f, "Build failed: {}\n{}", command, stderr)
      }
      PublishError::DuplicateVersion { version, .. } => {
        write!(f, "Version {} already exists in the registry", version)
      }
      PublishError::AuthRejected { stderr } => {
        write!(f, "Registry rejected the publish token:\n{}", stderr)
      }
      PublishError::PublishFailed { command, stderr } => {
        write!(f, "Publish failed: {}\n{}", command, stderr)
      }
    }
  }
}

/// Platform API errors
#[derive(Debug)]
pub enum PlatformError {
  /// Token rejected (401/403)
  AuthRejected { status: u16, operation: String },

  /// No release exists for the triggering tag
  ReleaseNotFound { tag: String },

  /// Asset upload failed
  AssetUpload { name: String, status: u16, body: String },

  /// Change request creation failed
  ChangeRequest { status: u16, body: String },

  /// Transport-level failure
  Network { message: String },
}

impl PlatformError {
  fn help_message(&self) -> Option<String> {
    match self {
      PlatformError::AuthRejected { .. } => {
        Some("Check that the platform token is valid and has repo scope.".to_string())
      }
      PlatformError::ReleaseNotFound { tag } => Some(format!(
        "No release with tag '{}' exists on the platform. Conveyor runs are triggered by a published release.",
        tag
      )),
      _ => None,
    }
  }
}

impl fmt::Display for PlatformError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PlatformError::AuthRejected { status, operation } => {
        write!(f, "Platform rejected the token ({}) during {}", status, operation)
      }
      PlatformError::ReleaseNotFound { tag } => {
        write!(f, "Release not found for tag '{}'", tag)
      }
      PlatformError::AssetUpload { name, status, body } => {
        write!(f, "Uploading asset '{}' failed ({}): {}", name, status, body)
      }
      PlatformError::ChangeRequest { status, body } => {
        write!(f, "Opening change request failed ({}): {}", status, body)
      }
      PlatformError::Network { message } => {
        write!(f, "Platform request failed: {}", message)
      }
    }
  }
}

/// Result type alias for conveyor
pub type ConveyorResult<T> = Result<T, ConveyorError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ConveyorResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ConveyorResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ConveyorError>,
{
  fn context(self, ctx: impl Into<String>) -> ConveyorResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ConveyorResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with colors and help text
pub fn print_error(error: &ConveyorError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
