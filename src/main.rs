mod checks;
mod commands;
mod core;
mod pipeline;
mod platform;
mod provision;
mod registry;
mod release;
mod ui;

use clap::{Parser, Subcommand};
use commands::Secrets;
use core::context::RunContext;
use core::error::{ConveyorError, print_error};

/// Publish a release and propose the version bump back to the main line
#[derive(Parser)]
#[command(name = "conveyor")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Write a starter conveyor.toml into the repository root
  Init {
    /// Overwrite an existing configuration
    #[arg(long)]
    force: bool,
  },

  /// Run environment health checks and diagnostics
  Doctor {
    /// Run thorough checks (includes network tests)
    #[arg(long)]
    thorough: bool,
    /// Output results in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Show what a run would do for a tag, without side effects
  Plan {
    /// The release tag that would trigger the run
    tag: String,
    /// Output plan in JSON format (useful for CI/automation)
    #[arg(long)]
    json: bool,
  },

  /// Execute the publish pipeline for a release tag
  Run {
    /// The release tag carried by the triggering event
    tag: String,
    /// Registry publish token
    #[arg(long, env = "CONVEYOR_REGISTRY_TOKEN", hide_env_values = true)]
    registry_token: String,
    /// Platform token for asset upload and the change request
    #[arg(long, env = "CONVEYOR_PLATFORM_TOKEN", hide_env_values = true)]
    platform_token: String,
    /// Output the run report in JSON format
    #[arg(long)]
    json: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();

  let result = match cli.command {
    // Init and doctor run before (or without) a complete setup
    Commands::Init { force } => commands::run_init(force),
    Commands::Doctor { thorough, json } => commands::run_doctor(thorough, json),

    // Plan and run need the full context (repository + configuration)
    Commands::Plan { tag, json } => with_context(|ctx| commands::run_plan(ctx, tag, json)),
    Commands::Run {
      tag,
      registry_token,
      platform_token,
      json,
    } => {
      let secrets = Secrets {
        registry_token,
        platform_token,
      };
      with_context(|ctx| commands::run_publish(ctx, tag, &secrets, json))
    }
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn with_context<F>(f: F) -> core::error::ConveyorResult<()>
where
  F: FnOnce(&RunContext) -> core::error::ConveyorResult<()>,
{
  let current_dir = std::env::current_dir()?;
  let ctx = RunContext::build(&current_dir)?;
  f(&ctx)
}

fn handle_error(err: ConveyorError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
