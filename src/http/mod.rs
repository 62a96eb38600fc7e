//! HTTP protocol layer module
//!
//! Response builders and request path handling, decoupled from the upstream
//! client and the listing renderer.

pub mod path;
pub mod response;

// Re-export commonly used types
pub use path::extract_repo_path;
pub use response::{
    build_400_response, build_405_response, build_error_response,
    build_health_response, build_html_response, build_options_response, build_redirect_response,
};
