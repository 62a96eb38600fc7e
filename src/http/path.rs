//! Request path extraction

use std::borrow::Cow;
use std::str::Utf8Error;

use percent_encoding::percent_decode_str;

/// Repository-relative path for a request URI path
///
/// Strips the leading run of slashes, then percent-decodes. `""` is the
/// repository root. Fails when the decoded bytes are not UTF-8.
pub fn extract_repo_path(uri_path: &str) -> Result<String, Utf8Error> {
    let trimmed = uri_path.trim_start_matches('/');
    percent_decode_str(trimmed).decode_utf8().map(Cow::into_owned)
}
