//! Commit graph walking
//!
//! Finds the linear run of commits a branch has on top of its upstream.

mod walker;

pub use walker::{collect_between, find_common_ancestor};
