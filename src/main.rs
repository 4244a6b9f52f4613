use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use branch_relay::branch::BranchContext;
use branch_relay::config::RelayConfig;
use branch_relay::extract::find_issue_key;
use branch_relay::relay::{self, GitAction, RelayOutcome};

#[derive(Parser)]
#[command(name = "branch-relay")]
#[command(
    version,
    about = "Notifies an issue tracker when a commit or push happens on a branch carrying an issue key"
)]
struct Cli {
    /// Repository directory (defaults to the current directory)
    #[arg(long, global = true)]
    project_dir: Option<PathBuf>,

    /// Suppress outcome lines
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Relay a commit lifecycle event for the current branch (git post-commit hook)
    Commit,
    /// Relay a push lifecycle event for the current branch (git pre-push hook)
    Push,
    /// Print the issue key extracted from a branch name
    Extract { branch_name: String },
    /// Show the effective relay configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let project_dir = match cli.project_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    match &cli.command {
        Commands::Commit => run_relay(&project_dir, GitAction::Commit, cli.quiet).await,
        Commands::Push => run_relay(&project_dir, GitAction::Push, cli.quiet).await,
        Commands::Extract { branch_name } => cmd_extract(branch_name),
        Commands::Config => cmd_config(),
    }
}

/// Hook path: run one relay invocation and map every outcome, including
/// delivery failure, to a successful exit. A tracker outage must never stop a
/// developer from committing or pushing.
async fn run_relay(project_dir: &Path, action: GitAction, quiet: bool) -> Result<()> {
    let config = RelayConfig::from_env();

    let context = match BranchContext::discover(project_dir) {
        Ok(context) => context,
        Err(err) => {
            // Outside a repository there is nothing to notify about, and the
            // hook path still must not fail the invoking git command.
            if !quiet {
                eprintln!("{} {err:#}", console::style("⚠").yellow());
            }
            return Ok(());
        }
    };

    let outcome = relay::run(&config, action, &context).await;
    if !quiet {
        report(&outcome);
    }
    Ok(())
}

fn report(outcome: &RelayOutcome) {
    match outcome {
        RelayOutcome::SkippedIneligible(reason) => {
            println!(
                "{}",
                console::style(format!("Skipped tracker notification: {reason}")).dim()
            );
        }
        RelayOutcome::SkippedNoKey { branch_name } => {
            println!(
                "{}",
                console::style(format!("No issue key in branch '{branch_name}', nothing to notify")).dim()
            );
        }
        RelayOutcome::Delivered { event } => {
            println!(
                "{} Notified tracker: {} ({} on {})",
                console::style("✓").green(),
                console::style(&event.issue_key).bold(),
                event.action,
                event.branch_name
            );
        }
        RelayOutcome::DeliveryFailed { event, error } => {
            eprintln!(
                "{} Failed to notify tracker for {}: {error}",
                console::style("⚠").yellow(),
                event.issue_key
            );
        }
    }
}

/// Debug helper mirroring the relay's extraction step on an arbitrary branch
/// name. Unlike the hook path this exits non-zero when nothing matches.
fn cmd_extract(branch_name: &str) -> Result<()> {
    let config = RelayConfig::from_env();
    match find_issue_key(branch_name, config.extraction_prefix()) {
        Some(found) => {
            println!("{}", found.key);
            Ok(())
        }
        None => anyhow::bail!("no issue key found in '{branch_name}'"),
    }
}

fn cmd_config() -> Result<()> {
    let config = RelayConfig::from_env();
    println!("Relay Configuration");
    println!("===================");
    println!("  api_base_url    = \"{}\"", config.api_base_url);
    println!("  project_key     = \"{}\"", config.project_key);
    println!("  strict_prefix   = {}", config.strict_prefix);
    println!("  connect_timeout = {}s", config.connect_timeout.as_secs());
    println!("  total_timeout   = {}s", config.total_timeout.as_secs());
    println!("  enforce_timeout = {}", config.enforce_timeout);
    Ok(())
}
