//! git-publish - stacked review requests from a plain git branch
//!
//! CLI binary. Installed on the PATH it is also reachable as `git publish`,
//! which is how the commit-msg hook calls it.

use anyhow::Result;
use clap::{Parser, Subcommand};
use git_publish::config::Config;
use git_publish::types::Platform;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

/// Environment variable holding the log filter
const LOG_ENV: &str = "GIT_PUBLISH_LOG";

#[derive(Parser)]
#[command(name = "git-publish")]
#[command(about = "Publish every commit on top of the upstream as a stacked review request")]
#[command(version)]
struct Cli {
    /// Path inside the git repository (defaults to current directory)
    #[arg(short = 'C', long, global = true)]
    path: Option<PathBuf>,

    /// Ensure this commit message file carries a change identifier, then exit
    #[arg(short, long, value_name = "FILE")]
    message_file: Option<PathBuf>,

    /// Print every phase and push, not just the published entries
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Authentication management
    Auth {
        #[command(subcommand)]
        platform: AuthPlatform,
    },
}

#[derive(Subcommand)]
enum AuthPlatform {
    /// GitHub authentication
    Github {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// GitLab authentication
    Gitlab {
        #[command(subcommand)]
        action: AuthAction,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum AuthAction {
    /// Test authentication
    Test,
    /// Show authentication setup instructions
    Setup,
}

impl From<AuthAction> for cli::AuthAction {
    fn from(action: AuthAction) -> Self {
        match action {
            AuthAction::Test => Self::Test,
            AuthAction::Setup => Self::Setup,
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env();
    let path = cli.path.unwrap_or_else(|| PathBuf::from("."));

    if let Some(message_file) = cli.message_file {
        cli::run_message_file(&message_file, &config)?;
        return Ok(());
    }

    match cli.command {
        None => cli::run_publish(&path, &config, cli.verbose).await?,
        Some(Commands::Auth { platform }) => match platform {
            AuthPlatform::Github { action } => {
                cli::run_auth(&config, Platform::GitHub, action.into()).await?;
            }
            AuthPlatform::Gitlab { action } => {
                cli::run_auth(&config, Platform::GitLab, action.into()).await?;
            }
        },
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    init_logging();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            anstream::eprintln!("git-publish error: {e}");
            ExitCode::FAILURE
        }
    }
}
