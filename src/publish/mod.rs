//! Stack publishing engine
//!
//! Turns the commits a main branch has on top of its upstream into a chain
//! of review requests:
//! 1. Prepare - check the branch and find its upstream (read-only)
//! 2. Rewrite - give each commit an identifier and stack it on the previous one
//! 3. Reconcile - create or update one review request per commit
//! 4. Execute - run the above across the stack inside a stash bracket

mod execute;
mod prepare;
mod progress;
mod reconcile;
mod rewrite;

pub use execute::{publish_stack, PublishOptions, PublishResult};
pub use prepare::{prepare_publish, PublishTarget};
pub use progress::{NoopProgress, Phase, ProgressCallback, PushStatus};
pub use reconcile::{reconcile_review, Reconciled};
pub use rewrite::{push_branch_at, rewrite_onto, RewrittenCommit};
