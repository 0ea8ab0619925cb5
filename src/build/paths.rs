//! Path and URL conversion utilities.
//!
//! This module handles conversions between:
//! - Source file paths (relative paths within the content directory)
//! - URL paths (the URL at which a page will be served)
//! - Output file paths (where files are written in the output directory)
//!
//! Every page URL is directory-style (`/posts/kinds/`) and is written to
//! `<output>/posts/kinds/index.html`, so the mapping is a pure function of the
//! source path and the optional slug. URL segments are percent-encoded; output
//! paths use the decoded names.

use std::path::{Component, Path, PathBuf};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::util::slugify;

/// Characters kept as-is in a URL path segment.
const SEGMENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// URL of the archive page listing every article.
pub const ARCHIVE_URL: &str = "/";

/// URL of the page listing every tag.
pub const TAGS_URL: &str = "/tags/";

/// Convert a source path to a page URL.
///
/// The extension is dropped, `index` files become their directory, and a slug
/// from the front matter replaces the last segment.
///
/// # Examples
/// ```ignore
/// source_path_to_url("kinds.md", "/posts", None) => "/posts/kinds/"
/// source_path_to_url("haskell/index.md", "/posts", None) => "/posts/haskell/"
/// source_path_to_url("kinds.md", "/posts", Some("Kinds Explained")) => "/posts/kinds-explained/"
/// source_path_to_url("index.md", "/", None) => "/"
/// source_path_to_url("c#-tips.md", "/posts", None) => "/posts/c%23-tips/"
/// ```
pub fn source_path_to_url(path: &Path, url_prefix: &str, slug: Option<&str>) -> String {
    let stem = path.with_extension("");
    let mut segments: Vec<String> = stem
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().replace('\\', "/")),
            _ => None,
        })
        .collect();

    // Handle index files - they become the directory URL
    if segments.last().is_some_and(|s| s == "index") {
        segments.pop();
    }

    if let Some(slug) = slug.map(slugify).filter(|s| !s.is_empty()) {
        match segments.last_mut() {
            Some(last) => *last = slug,
            None => segments.push(slug),
        }
    }

    let mut url = url_prefix.trim_end_matches('/').to_string();
    url.push('/');
    for segment in segments {
        url.extend(utf8_percent_encode(&segment, SEGMENT_ENCODE_SET));
        url.push('/');
    }
    url
}

/// Convert a page URL to an output file path.
///
/// # Examples
/// ```ignore
/// url_to_output_path("/posts/kinds/", output_dir) => output_dir/posts/kinds/index.html
/// url_to_output_path("/", output_dir) => output_dir/index.html
/// ```
pub fn url_to_output_path(url_path: &str, output_dir: &Path) -> PathBuf {
    let mut path = output_dir.to_path_buf();
    for segment in url_path.split('/').filter(|s| !s.is_empty()) {
        path.push(percent_decode_str(segment).decode_utf8_lossy().as_ref());
    }
    path.join("index.html")
}

/// URL of the listing page for a tag key.
pub fn tag_url(key: &str) -> String {
    format!("{TAGS_URL}{}/", utf8_percent_encode(key, SEGMENT_ENCODE_SET))
}

/// Get the base path from a config file path (its parent directory).
pub fn base_path_from_config(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Rewrites links between articles to the URLs of their pages.
///
/// A link such as `../types/kinds.md#arity` written in `haskell/intro.md`
/// becomes `/posts/types/kinds/#arity`. Links that are absolute, carry a
/// scheme, point at non-Markdown files, or climb out of the content directory
/// are left as written. The target's own `slug` is not known while a single
/// document is being parsed, so links resolve to the file-derived URL.
#[derive(Debug, Clone, Copy)]
pub struct LinkResolver<'a> {
    /// Source path of the document containing the link
    pub source_path: &'a Path,
    /// URL prefix for article pages
    pub url_prefix: &'a str,
}

impl<'a> LinkResolver<'a> {
    pub fn new(source_path: &'a Path, url_prefix: &'a str) -> Self {
        Self {
            source_path,
            url_prefix,
        }
    }

    pub fn resolve(&self, destination: &str) -> String {
        if destination.is_empty()
            || destination.starts_with('#')
            || destination.starts_with('/')
            || has_scheme(destination)
        {
            return destination.to_string();
        }

        let (path, fragment) = match destination.split_once('#') {
            Some((path, fragment)) => (path, Some(fragment)),
            None => (destination, None),
        };
        if !is_markdown_path(path) {
            return destination.to_string();
        }

        let mut segments: Vec<String> = self
            .source_path
            .parent()
            .map(|parent| {
                parent
                    .components()
                    .filter_map(|c| match c {
                        Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        for part in path.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    if segments.pop().is_none() {
                        return destination.to_string();
                    }
                }
                part => segments.push(percent_decode_str(part).decode_utf8_lossy().into_owned()),
            }
        }

        let target = PathBuf::from(segments.join("/"));
        let mut url = source_path_to_url(&target, self.url_prefix, None);
        if let Some(fragment) = fragment {
            url.push('#');
            url.push_str(fragment);
        }
        url
    }
}

fn is_markdown_path(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("md") || e.eq_ignore_ascii_case("markdown"))
}

/// True for `https://…`, `mailto:…` and other `scheme:` prefixed links.
fn has_scheme(destination: &str) -> bool {
    match destination.split_once(':') {
        Some((scheme, _)) => {
            !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}
