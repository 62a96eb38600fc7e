//! GitHub Contents API wire types
//!
//! `GET /repos/{owner}/{repo}/contents/{path}` answers with a JSON array for a
//! directory and a single JSON object for anything else.

use serde::Deserialize;

use super::error::UpstreamError;

/// One item of a directory listing, or the descriptor of a single file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Entry {
    /// Display label, e.g. `cat.png`
    pub name: String,
    /// Full repository-relative path, e.g. `images/cat.png`
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Size in bytes; GitHub reports 0 for directories
    #[serde(default)]
    pub size: Option<u64>,
    /// Raw content URL, only set for files
    #[serde(default)]
    pub download_url: Option<String>,
}

/// Maps to the `type` field of a contents entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Dir,
    File,
    Symlink,
    Submodule,
    #[serde(other)]
    Other,
}

/// Decoded upstream payload
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Contents {
    Directory(Vec<Entry>),
    File(Entry),
}

impl Contents {
    pub fn from_slice(body: &[u8]) -> Result<Self, UpstreamError> {
        serde_json::from_slice(body).map_err(UpstreamError::Payload)
    }
}
