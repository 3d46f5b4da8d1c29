//! Publish command - turn the current stack into review requests

use crate::cli::progress::CliProgress;
use crate::cli::style::{check, Stylize};
use anstream::println;
use git_publish::change_id::{ensure_message_file, ChangeIdCodec};
use git_publish::config::Config;
use git_publish::error::Result;
use git_publish::platform::{create_platform_service, parse_repo_info};
use git_publish::publish::{prepare_publish, publish_stack, PublishOptions};
use git_publish::repo::{install_commit_msg_hook, GitRepository, HookStatus};
use std::path::Path;
use tracing::debug;

/// Run the publish command
pub async fn run_publish(path: &Path, config: &Config, verbose: bool) -> Result<()> {
    let repo = GitRepository::open(path)?;

    if install_commit_msg_hook(repo.git_dir())? == HookStatus::Installed {
        println!("{} Installed commit-msg hook", check());
    }

    // Everything that can fail on configuration happens before the stash.
    let target = prepare_publish(&repo, config)?;
    let platform_config = parse_repo_info(&target.remote_url, config)?;
    debug!(
        "Detected {} project {}",
        platform_config.platform,
        platform_config.namespace()
    );
    let platform = create_platform_service(&platform_config, config).await?;
    let codec = ChangeIdCodec::from_config(config);

    let progress = CliProgress::new(verbose);
    let result = publish_stack(
        &repo,
        platform.as_ref(),
        &target,
        &codec,
        PublishOptions::default(),
        &progress,
    )
    .await?;

    let created = result.created().count();
    let updated = result.updated().count();
    println!();
    println!(
        "{} {} onto {}: {} created, {} updated",
        "Published".success(),
        result.branch.accent(),
        target.tracking.name.accent(),
        created,
        updated
    );
    Ok(())
}

/// Run the `--message-file` mode used by the commit-msg hook
pub fn run_message_file(path: &Path, config: &Config) -> Result<()> {
    let codec = ChangeIdCodec::from_config(config);
    if let Some(change_id) = ensure_message_file(path, &codec)? {
        debug!("Tagged commit message with {change_id}");
    }
    Ok(())
}
