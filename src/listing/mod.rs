//! Directory listing renderer
//!
//! Pure functions from a repository path and its entries to an HTML page.
//! No I/O happens here.

mod collate;
mod size;

pub use collate::locale_cmp;
pub use size::format_size;

use std::borrow::Cow;
use std::fmt::Write;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::github::{Entry, EntryKind};

/// Characters escaped inside one href path segment
const HREF_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'\\')
    .add(b'{')
    .add(b'}')
    .add(b'/');

/// Entries split by kind, each half in display order
#[derive(Debug)]
pub struct Listing<'a> {
    pub dirs: Vec<&'a Entry>,
    pub files: Vec<&'a Entry>,
}

impl<'a> Listing<'a> {
    /// Partition and sort; entries that are neither `dir` nor `file` are dropped
    pub fn from_entries(entries: &'a [Entry]) -> Self {
        let mut dirs: Vec<&Entry> = Vec::new();
        let mut files: Vec<&Entry> = Vec::new();
        for entry in entries {
            match entry.kind {
                EntryKind::Dir => dirs.push(entry),
                EntryKind::File => files.push(entry),
                EntryKind::Symlink | EntryKind::Submodule | EntryKind::Other => {}
            }
        }

        dirs.sort_by(|a, b| locale_cmp(&a.name, &b.name));
        files.sort_by(|a, b| locale_cmp(&a.name, &b.name));

        Self { dirs, files }
    }

    pub fn len(&self) -> usize {
        self.dirs.len() + self.files.len()
    }
}

/// Typical rendered length of one table row
const ROW_CAPACITY_HINT: usize = 128;

/// Path with its final segment removed; `""` is the repository root
///
/// Trailing slashes are ignored, so the parent of `a/b/` is `a`.
pub fn parent_path(path: &str) -> &str {
    path.trim_end_matches('/')
        .rsplit_once('/')
        .map_or("", |(parent, _)| parent)
}

/// Render the `Index of /{path}` page
pub fn render_index(path: &str, entries: &[Entry]) -> String {
    let listing = Listing::from_entries(entries);
    let mut rows = String::with_capacity((listing.len() + 1) * ROW_CAPACITY_HINT);

    if !path.is_empty() {
        push_row(&mut rows, "📁", &encode_href(parent_path(path)), "../", "");
    }

    for dir in &listing.dirs {
        let href = format!("{}/", encode_href(&dir.path));
        push_row(&mut rows, "📁", &href, &format!("{}/", dir.name), "");
    }

    for file in &listing.files {
        push_row(
            &mut rows,
            "🖼️",
            &encode_href(&file.path),
            &file.name,
            &format_size(file.size),
        );
    }

    let title = escape_html(path);
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Index of /{title}</title>
  <style>
    body {{ font-family: monospace; padding: 20px }}
    table {{ border-collapse: collapse }}
    td {{ padding: 2px 8px }}
    a {{ text-decoration: none }}
  </style>
</head>
<body>
<h2>Index of /{title}</h2>
<table>{rows}</table>
</body>
</html>"#
    )
}

fn push_row(rows: &mut String, icon: &str, href: &str, label: &str, size: &str) {
    let _ = write!(
        rows,
        r#"<tr><td>{icon}</td><td><a href="{}">{}</a></td><td>{size}</td></tr>"#,
        escape_html(href),
        escape_html(label),
    );
}

/// Site-absolute href for `path`, one percent-encoded segment at a time
///
/// Empty segments are dropped so the result never starts with `//`.
fn encode_href(path: &str) -> String {
    let mut href = String::with_capacity(path.len() + 1);
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        href.push('/');
        href.extend(utf8_percent_encode(segment, HREF_SEGMENT));
    }
    if href.is_empty() {
        href.push('/');
    }
    href
}

fn escape_html(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }
    let mut escaped = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, path: &str, kind: EntryKind, size: Option<u64>) -> Entry {
        Entry {
            name: name.to_string(),
            path: path.to_string(),
            kind,
            size,
            download_url: None,
        }
    }

    fn mixed_entries(prefix: &str) -> Vec<Entry> {
        let p = |name: &str| {
            if prefix.is_empty() {
                name.to_string()
            } else {
                format!("{prefix}/{name}")
            }
        };
        vec![
            entry("b.png", &p("b.png"), EntryKind::File, Some(2048)),
            entry("Docs", &p("Docs"), EntryKind::Dir, Some(0)),
            entry("a.png", &p("a.png"), EntryKind::File, Some(512)),
            entry("assets", &p("assets"), EntryKind::Dir, Some(0)),
            entry("C.gif", &p("C.gif"), EntryKind::File, None),
        ]
    }

    fn row_count(html: &str) -> usize {
        html.matches("<tr>").count()
    }

    #[test]
    fn test_partition_is_disjoint_and_complete() {
        let mut entries = mixed_entries("");
        entries.push(entry("link", "link", EntryKind::Symlink, Some(4)));
        entries.push(entry("vendor", "vendor", EntryKind::Submodule, Some(0)));

        let listing = Listing::from_entries(&entries);
        assert_eq!(listing.len(), 5);
        assert!(listing.dirs.iter().all(|e| e.kind == EntryKind::Dir));
        assert!(listing.files.iter().all(|e| e.kind == EntryKind::File));
        for e in entries.iter().filter(|e| matches!(e.kind, EntryKind::Dir | EntryKind::File)) {
            let in_dirs = listing.dirs.iter().any(|d| std::ptr::eq(*d, e));
            let in_files = listing.files.iter().any(|f| std::ptr::eq(*f, e));
            assert!(in_dirs ^ in_files, "{} must be in exactly one partition", e.name);
        }
    }

    #[test]
    fn test_partitions_sorted_by_locale() {
        let entries = mixed_entries("");
        let listing = Listing::from_entries(&entries);
        let dirs: Vec<&str> = listing.dirs.iter().map(|e| e.name.as_str()).collect();
        let files: Vec<&str> = listing.files.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(dirs, vec!["assets", "Docs"]);
        assert_eq!(files, vec!["a.png", "b.png", "C.gif"]);
    }

    #[test]
    fn test_parent_path() {
        assert_eq!(parent_path("a"), "");
        assert_eq!(parent_path("a/b"), "a");
        assert_eq!(parent_path("a/b/c"), "a/b");
        assert_eq!(parent_path("a/b/"), "a");
        assert_eq!(parent_path(""), "");
    }

    #[test]
    fn test_root_has_no_parent_row() {
        let html = render_index("", &mixed_entries(""));
        assert!(!html.contains("../"));
        assert_eq!(row_count(&html), 5);
        assert!(html.contains("<title>Index of /</title>"));
        assert!(html.contains("<h2>Index of /</h2>"));
    }

    #[test]
    fn test_nested_has_one_parent_row() {
        let html = render_index("photos/2024", &mixed_entries("photos/2024"));
        assert_eq!(html.matches("../").count(), 1);
        assert!(html.contains(r#"<a href="/photos">../</a>"#));
        assert_eq!(row_count(&html), 6);
        assert!(html.contains("<h2>Index of /photos/2024</h2>"));
    }

    #[test]
    fn test_top_level_parent_links_to_root() {
        let html = render_index("photos", &mixed_entries("photos"));
        assert!(html.contains(r#"<a href="/">../</a>"#));
    }

    #[test]
    fn test_rows_render_links_and_sizes() {
        let html = render_index("", &mixed_entries(""));
        assert!(html.contains(
            r#"<tr><td>📁</td><td><a href="/assets/">assets/</a></td><td></td></tr>"#
        ));
        assert!(html.contains(
            r#"<tr><td>🖼️</td><td><a href="/b.png">b.png</a></td><td>2.0 KB</td></tr>"#
        ));
        assert!(html.contains(
            r#"<tr><td>🖼️</td><td><a href="/a.png">a.png</a></td><td>512.0 B</td></tr>"#
        ));
        assert!(html.contains(
            r#"<tr><td>🖼️</td><td><a href="/C.gif">C.gif</a></td><td></td></tr>"#
        ));
    }

    #[test]
    fn test_directories_before_files() {
        let html = render_index("", &mixed_entries(""));
        let last_dir = html.find("/Docs/").unwrap();
        let first_file = html.find("/a.png").unwrap();
        assert!(last_dir < first_file);
    }

    #[test]
    fn test_unknown_kinds_produce_no_rows() {
        let entries = vec![
            entry("link", "link", EntryKind::Symlink, Some(4)),
            entry("odd", "odd", EntryKind::Other, None),
        ];
        assert_eq!(row_count(&render_index("", &entries)), 0);
    }

    #[test]
    fn test_names_are_escaped() {
        let entries = vec![entry(
            "<b>&\"x y#1?.png",
            "dir/<b>&\"x y#1?.png",
            EntryKind::File,
            Some(1),
        )];
        let html = render_index("dir", &entries);
        assert!(html.contains("&lt;b&gt;&amp;&quot;x y#1?.png"));
        assert!(html.contains(r#"href="/dir/%3Cb%3E&amp;%22x%20y%231%3F.png""#));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_encode_href() {
        assert_eq!(encode_href(""), "/");
        assert_eq!(encode_href("a/b c"), "/a/b%20c");
        assert_eq!(encode_href("ü.png"), "/%C3%BC.png");
        assert_eq!(encode_href("/evil.example/x"), "/evil.example/x");
        assert_eq!(encode_href("\\evil.example"), "/%5Cevil.example");
    }

    #[test]
    fn test_backslash_names_stay_on_site() {
        let entries = vec![entry("\\evil.example", "\\evil.example", EntryKind::Dir, Some(0))];
        let html = render_index("", &entries);
        assert!(html.contains(r#"<a href="/%5Cevil.example/">"#));
        assert!(!html.contains("href=\"/\\"));
    }
}
