//! CLI commands
//!
//! Command implementations for the `git-publish` binary.

mod auth;
mod progress;
mod publish;
mod style;

pub use auth::{run_auth, AuthAction};
pub use publish::{run_message_file, run_publish};
