//! Upstream module
//!
//! Talks to the GitHub Contents API for the one configured repository.

mod client;
mod error;
mod types;

pub use client::GithubClient;
pub use error::UpstreamError;
pub use types::{Contents, Entry, EntryKind};
