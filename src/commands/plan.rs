//! Plan command: show what a run would do, without side effects

use crate::core::context::RunContext;
use crate::core::error::ConveyorResult;
use crate::pipeline::Step;
use crate::release::Manifest;
use serde::Serialize;

/// Everything `conveyor run <TAG>` would do, resolved but not executed
#[derive(Debug, Serialize)]
pub struct PublishPlan {
  pub tag: String,
  /// Whether the tag parses as semver. Informational only: the run writes
  /// the tag into the manifest verbatim either way.
  pub tag_is_semver: bool,
  /// Whether the tag currently resolves in the local repository
  pub tag_resolves_locally: bool,
  pub manifest_path: std::path::PathBuf,
  pub current_version: String,
  pub artifact_dir: std::path::PathBuf,
  pub packaging_command: String,
  pub platform_repo: String,
  pub base_branch: String,
  pub branch_pattern: String,
  pub steps: Vec<String>,
}

impl PublishPlan {
  /// Resolve a plan for a tag against the loaded configuration
  pub fn resolve(ctx: &RunContext, tag: &str) -> ConveyorResult<Self> {
    let manifest_path = ctx.resolve(&ctx.config.manifest.path);
    let manifest = Manifest::load(&manifest_path)?;
    let current_version = manifest.version(&ctx.config.manifest.version_key)?;

    Ok(Self {
      tag: tag.to_string(),
      tag_is_semver: semver::Version::parse(tag).is_ok(),
      tag_resolves_locally: ctx.git.ref_exists(tag)?,
      manifest_path: ctx.config.manifest.path.clone(),
      current_version,
      artifact_dir: ctx.config.packaging.artifact_dir.clone(),
      packaging_command: ctx.config.packaging.command.clone(),
      platform_repo: ctx.config.platform.repo.clone(),
      base_branch: ctx.config.proposal.base_branch.clone(),
      branch_pattern: ctx.config.proposal.branch_pattern.clone(),
      steps: Step::ALL.iter().map(|s| s.title().to_string()).collect(),
    })
  }
}

/// Run the plan command
pub fn run_plan(ctx: &RunContext, tag: String, json: bool) -> ConveyorResult<()> {
  let plan = PublishPlan::resolve(ctx, &tag)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&plan)?);
    return Ok(());
  }

  println!("📦 Publish plan for tag '{}'", plan.tag);
  println!();
  println!("  Manifest: {} ({} → {})", plan.manifest_path.display(), plan.current_version, plan.tag);
  println!("  Artifacts: {} (built by '{}')", plan.artifact_dir.display(), plan.packaging_command);
  println!("  Platform: {} (change request into '{}')", plan.platform_repo, plan.base_branch);
  println!("  Proposal branch: {}", plan.branch_pattern);
  println!();
  println!("  Steps:");
  for (idx, step) in plan.steps.iter().enumerate() {
    println!("    {}. {}", idx + 1, step);
  }
  println!();

  if !plan.tag_is_semver {
    println!("⚠️  Tag '{}' is not a semver string; it will be written to the manifest verbatim.", plan.tag);
  }
  if !plan.tag_resolves_locally {
    println!("⚠️  Tag '{}' does not resolve locally yet; the run will fetch tags first.", plan.tag);
  }

  println!("🔍 Plan only (no changes applied). Execute with: conveyor run {}", plan.tag);

  Ok(())
}
