//! Request handler module
//!
//! Routes requests and bridges repository paths to the upstream Contents API.

pub mod index;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
