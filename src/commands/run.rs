//! Run command: execute the publish pipeline for a release tag
//!
//! The eight steps run strictly in order, each blocking the next. Any
//! failure halts the run at that step - there is no retry and no rollback
//! of already-completed steps. In particular, a failure while proposing
//! the version bump leaves the package published: the registry upload is
//! not compensated.

use crate::core::context::RunContext;
use crate::core::error::ConveyorResult;
use crate::pipeline::{ArtifactRecord, RunReport, Step};
use crate::platform::PlatformClient;
use crate::provision;
use crate::registry;
use crate::release::{Manifest, ReleaseEvent};
use crate::ui::progress::UploadProgress;

/// Tokens injected at the process edge (CLI flag or environment)
pub struct Secrets {
  pub registry_token: String,
  pub platform_token: String,
}

/// Run the publish pipeline
pub fn run_publish(ctx: &RunContext, tag: String, secrets: &Secrets, json: bool) -> ConveyorResult<()> {
  let event = ReleaseEvent::new(tag);
  let mut report = RunReport::new(&event);

  println!("🚚 Publishing release '{}'", event.tag);
  println!();

  // 1. Fetch the exact repository state associated with the trigger
  report.step(Step::AcquireSource, || {
    ctx.git.fetch_tags(&ctx.config.proposal.remote)?;
    ctx.git.checkout_ref(&event.tag)?;
    let sha = ctx.git.head_commit()?;
    Ok(((), format!("checked out '{}' at {}", event.tag, &sha[..sha.len().min(12)])))
  })?;

  // 2. Pinned runtime; mismatch is a fatal environment error
  report.step(Step::ProvisionRuntime, || {
    let reported = provision::ensure_runtime(&ctx.root, &ctx.config.runtime)?;
    Ok(((), reported))
  })?;

  // 3. Packaging tool; idempotent
  report.step(Step::ProvisionTool, || {
    let reported = provision::ensure_packaging_tool(&ctx.root, &ctx.config.packaging)?;
    Ok(((), reported))
  })?;

  // 4. Token into the tool's configuration; no validation here
  report.step(Step::ConfigureCredentials, || {
    let path = provision::write_credentials(&ctx.root, &ctx.config.packaging, &secrets.registry_token)?;
    Ok(((), format!("wrote {}", path.display())))
  })?;

  // 5. Literal overwrite; the tag is never validated
  let manifest_path = ctx.resolve(&ctx.config.manifest.path);
  report.step(Step::RewriteVersion, || {
    let mut manifest = Manifest::load(&manifest_path)?;
    let previous = manifest.version(&ctx.config.manifest.version_key)?;
    manifest.set_version(&ctx.config.manifest.version_key, &event.tag)?;
    manifest.save()?;
    Ok(((), format!("{}: {} → {}", ctx.config.manifest.path.display(), previous, event.tag)))
  })?;

  // 6. Build, then upload to the registry. One-shot: no retry.
  let artifacts = report.step(Step::BuildAndPublish, || {
    let artifacts = registry::build(&ctx.root, &ctx.config.packaging)?;
    registry::publish(&ctx.root, &ctx.config.packaging, &event.tag)?;
    let detail = format!("published {} artifact(s) as {}", artifacts.len(), event.tag);
    Ok((artifacts, detail))
  })?;

  for artifact in artifacts.iter() {
    report.artifacts.push(ArtifactRecord {
      name: artifact.name.clone(),
      size: artifact.size,
      sha256: artifact.digest.clone(),
    });
  }

  let client = PlatformClient::new(&ctx.config.platform.api_base, &ctx.config.platform.repo, &secrets.platform_token)?;

  // 7. No-op (not a failure) when the artifact set is empty
  report.step(Step::AttachArtifacts, || {
    if artifacts.is_empty() {
      return Ok(((), "no artifacts to attach".to_string()));
    }

    let release = client.release_by_tag(&event.tag)?;
    let mut progress = UploadProgress::new(artifacts.len(), format!("Uploading assets for {}", event.tag));
    for artifact in artifacts.iter() {
      client.upload_asset(&release, artifact)?;
      progress.inc();
    }
    Ok(((), format!("attached {} asset(s) to release {}", artifacts.len(), release.tag_name)))
  })?;

  // 8. Runs even though 1-7 already mutated external systems; a failure
  //    here leaves the package published with no proposal (accepted gap).
  let change_request = report.step(Step::ProposeVersionBump, || {
    let branch = event.branch_name(&ctx.config.proposal.branch_pattern);
    ctx.git.create_and_checkout_branch(&branch)?;
    ctx.git.commit_paths(
      &[ctx.config.manifest.path.as_path()],
      &event.expand(&ctx.config.proposal.commit_message),
      &ctx.config.proposal.author_name,
      &ctx.config.proposal.author_email,
    )?;
    ctx.git.push_to_remote(&ctx.config.proposal.remote, &branch)?;

    let change_request = client.open_change_request(
      &branch,
      &ctx.config.proposal.base_branch,
      &event.expand(&ctx.config.proposal.title),
      &event.expand("Automated version bump after publishing release {version}."),
    )?;
    let detail = format!("opened change request #{} from '{}'", change_request.number, branch);
    Ok((change_request, detail))
  })?;

  report.change_request = Some(change_request);

  println!();
  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
  } else {
    println!("✅ Release '{}' published ({} steps completed)", event.tag, report.completed());
    if let Some(cr) = &report.change_request {
      println!("   Version bump proposed: {}", cr.html_url);
    }
  }

  Ok(())
}
