//! Platform REST client: release lookup, asset upload, change requests
//!
//! This is the only place that interprets platform status codes. Blocking
//! requests only - within a run every network call is sequential, and the
//! underlying client's defaults provide whatever timeout behavior exists
//! (none is configured here).

use crate::core::error::{ConveyorError, ConveyorResult, PlatformError, ResultExt};
use crate::release::Artifact;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::Deserialize;
use serde_json::json;

const CONVEYOR_USER_AGENT: &str = concat!("conveyor/", env!("CARGO_PKG_VERSION"));

/// A release entry on the platform, resolved by tag
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseInfo {
  pub id: u64,
  pub tag_name: String,
  /// RFC 6570 template, e.g. ".../assets{?name,label}"
  pub upload_url: String,
}

/// An opened change request
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct ChangeRequest {
  pub number: u64,
  pub html_url: String,
}

/// Client for the hosting platform's REST API
pub struct PlatformClient {
  http: Client,
  api_base: String,
  repo: String,
  token: String,
}

impl PlatformClient {
  /// Create a client for a repository slug ("owner/name")
  pub fn new(api_base: &str, repo: &str, token: &str) -> ConveyorResult<Self> {
    let http = Client::builder()
      .build()
      .map_err(|e| ConveyorError::Platform(PlatformError::Network { message: e.to_string() }))?;

    Ok(Self {
      http,
      api_base: api_base.trim_end_matches('/').to_string(),
      repo: repo.to_string(),
      token: token.to_string(),
    })
  }

  /// Resolve the release entry for the triggering tag
  pub fn release_by_tag(&self, tag: &str) -> ConveyorResult<ReleaseInfo> {
    let url = format!("{}/repos/{}/releases/tags/{}", self.api_base, self.repo, tag);

    let response = self
      .http
      .get(&url)
      .header(AUTHORIZATION, format!("Bearer {}", self.token))
      .header(USER_AGENT, CONVEYOR_USER_AGENT)
      .send()
      .context("Failed to look up release")?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
      return Err(ConveyorError::Platform(PlatformError::ReleaseNotFound {
        tag: tag.to_string(),
      }));
    }
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
      return Err(ConveyorError::Platform(PlatformError::AuthRejected {
        status: status.as_u16(),
        operation: "release lookup".to_string(),
      }));
    }
    if !status.is_success() {
      let body = response.text().unwrap_or_default();
      return Err(ConveyorError::Platform(PlatformError::Network {
        message: format!("release lookup returned {}: {}", status, body),
      }));
    }

    let release: ReleaseInfo = response.json().context("Failed to decode release")?;
    Ok(release)
  }

  /// Attach one artifact to a release as a downloadable asset
  pub fn upload_asset(&self, release: &ReleaseInfo, artifact: &Artifact) -> ConveyorResult<()> {
    let url = format!("{}?name={}", strip_url_template(&release.upload_url), artifact.name);

    let contents =
      std::fs::read(&artifact.path).with_context(|| format!("Failed to read artifact {}", artifact.path.display()))?;

    let response = self
      .http
      .post(&url)
      .header(AUTHORIZATION, format!("Bearer {}", self.token))
      .header(USER_AGENT, CONVEYOR_USER_AGENT)
      .header(CONTENT_TYPE, "application/octet-stream")
      .body(contents)
      .send()
      .with_context(|| format!("Failed to upload asset '{}'", artifact.name))?;

    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
      return Err(ConveyorError::Platform(PlatformError::AuthRejected {
        status: status.as_u16(),
        operation: format!("asset upload '{}'", artifact.name),
      }));
    }
    if !status.is_success() {
      let body = response.text().unwrap_or_default();
      return Err(ConveyorError::Platform(PlatformError::AssetUpload {
        name: artifact.name.clone(),
        status: status.as_u16(),
        body,
      }));
    }

    Ok(())
  }

  /// Open a change request from `head` into `base`
  pub fn open_change_request(&self, head: &str, base: &str, title: &str, body: &str) -> ConveyorResult<ChangeRequest> {
    let url = format!("{}/repos/{}/pulls", self.api_base, self.repo);

    let response = self
      .http
      .post(&url)
      .header(AUTHORIZATION, format!("Bearer {}", self.token))
      .header(USER_AGENT, CONVEYOR_USER_AGENT)
      .json(&json!({
        "title": title,
        "head": head,
        "base": base,
        "body": body,
      }))
      .send()
      .context("Failed to open change request")?;

    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
      return Err(ConveyorError::Platform(PlatformError::AuthRejected {
        status: status.as_u16(),
        operation: "change request".to_string(),
      }));
    }
    if !status.is_success() {
      let body = response.text().unwrap_or_default();
      return Err(ConveyorError::Platform(PlatformError::ChangeRequest {
        status: status.as_u16(),
        body,
      }));
    }

    let change_request: ChangeRequest = response.json().context("Failed to decode change request")?;
    Ok(change_request)
  }

  /// Cheap reachability probe for doctor (HEAD against the API base)
  pub fn ping(&self) -> ConveyorResult<u16> {
    let response = self
      .http
      .get(&self.api_base)
      .header(USER_AGENT, CONVEYOR_USER_AGENT)
      .send()
      .context("Platform API unreachable")?;

    Ok(response.status().as_u16())
  }
}

/// Drop the `{...}` suffix from an RFC 6570 URL template
fn strip_url_template(url: &str) -> &str {
  match url.find('{') {
    Some(idx) => &url[..idx],
    None => url,
  }
}
