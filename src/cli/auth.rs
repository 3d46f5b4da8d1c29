//! Auth command - test and explain token discovery

use crate::cli::style::{check, spinner_style, Stylize};
use anstream::println;
use git_publish::auth::{
    get_github_auth, get_gitlab_auth, test_github_auth, test_gitlab_auth, AuthConfig,
};
use git_publish::config::Config;
use git_publish::error::Result;
use git_publish::types::Platform;
use indicatif::ProgressBar;
use std::time::Duration;

/// What `git publish auth <platform>` should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    /// Resolve a token and check it against the API
    Test,
    /// Print setup instructions
    Setup,
}

/// Run an auth subcommand
pub async fn run_auth(config: &Config, platform: Platform, action: AuthAction) -> Result<()> {
    match action {
        AuthAction::Test => run_auth_test(config, platform).await,
        AuthAction::Setup => {
            print_setup(platform);
            Ok(())
        }
    }
}

async fn run_auth_test(config: &Config, platform: Platform) -> Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(format!("Testing {platform} authentication..."));

    let outcome = check_token(config, platform).await;
    spinner.finish_and_clear();
    let (auth, username) = outcome?;

    println!("{} Authenticated as {}", check(), username.accent());
    println!("  Token source: {}", format!("{:?}", auth.source).muted());
    println!("  Host: {}", auth.host.muted());
    Ok(())
}

async fn check_token(config: &Config, platform: Platform) -> Result<(AuthConfig, String)> {
    match platform {
        Platform::GitHub => {
            let auth = get_github_auth(config, None).await?;
            let username = test_github_auth(&auth).await?;
            Ok((auth, username))
        }
        Platform::GitLab => {
            let auth = get_gitlab_auth(config, None).await?;
            let username = test_gitlab_auth(&auth).await?;
            Ok((auth, username))
        }
    }
}

fn print_setup(platform: Platform) {
    let (var, alt_var, cli, cli_url, host_var) = match platform {
        Platform::GitHub => (
            "GITHUB_TOKEN",
            "GH_TOKEN",
            "gh",
            "https://cli.github.com/",
            "GH_HOST",
        ),
        Platform::GitLab => (
            "GITLAB_TOKEN",
            "GL_TOKEN",
            "glab",
            "https://gitlab.com/gitlab-org/cli",
            "GITLAB_HOST",
        ),
    };

    println!("{}", format!("{platform} authentication").emphasis());
    println!();
    println!("Tokens are looked up in this order:");
    println!("  1. {} or {} (a .env file is read too)", var.accent(), alt_var.accent());
    println!("  2. {} CLI: run {}", cli, format!("{cli} auth login").accent());
    println!("     Install: {cli_url}");
    println!("  3. git credential helper for the host");
    println!();
    println!("For a self-hosted instance set {} to its hostname.", host_var.accent());
}
