//! Styled progress output for the publish command

use crate::cli::style::{check, cross, hyperlink_url, Stream, Stylize, LINK};
use anstream::{eprintln, println};
use async_trait::async_trait;
use git_publish::publish::{Phase, ProgressCallback, PushStatus};
use git_publish::types::StackEntry;

/// Prints publish progress to stdout
///
/// Quiet mode only prints the per-entry summary and link; verbose mode also
/// prints phases, pushes and status messages.
pub struct CliProgress {
    verbose: bool,
}

impl CliProgress {
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_phase(&self, phase: Phase) {
        if self.verbose && phase != Phase::Complete {
            println!("{}...", phase.to_string().emphasis());
        }
    }

    async fn on_branch_push(&self, branch: &str, status: PushStatus) {
        match &status {
            PushStatus::Failed(_) => {
                eprintln!(
                    "  {} {} {}",
                    cross(),
                    branch.accent().for_stderr(),
                    status.to_string().error()
                );
            }
            PushStatus::Success if self.verbose => {
                println!("  {} Pushed {}", check(), branch.accent());
            }
            _ => {}
        }
    }

    async fn on_entry_published(&self, entry: &StackEntry) {
        let action = if entry.created { "created" } else { "updated" };
        println!(
            "{} {} {}",
            check(),
            entry.rewritten.summary().emphasis(),
            format!("(#{} {action})", entry.review.number).muted()
        );
        println!(
            "  {LINK} {}",
            hyperlink_url(Stream::Stdout, &entry.review.html_url)
        );
    }

    async fn on_message(&self, message: &str) {
        if self.verbose {
            println!("{}", message.muted());
        }
    }
}
