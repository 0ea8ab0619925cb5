use std::collections::HashSet;
use std::path::PathBuf;

use super::document::Metadata;
use super::paths::tag_url;
use super::render::TagLink;
use crate::util::slugify;

/// An article that made it through the pipeline and was written to disk.
#[derive(Debug, Clone)]
pub struct Page {
    pub source_path: PathBuf,
    pub metadata: Metadata,
    /// The complete HTML document
    pub html: String,
    pub url: String,
    pub output_path: PathBuf,
}

/// Links for a page's tags, in the order written.
///
/// Spellings that slug to the same key are shown once, under the first
/// spelling.
pub fn tag_links(tags: &[String]) -> Vec<TagLink> {
    let mut seen = HashSet::new();
    tags.iter()
        .filter_map(|name| {
            let key = slugify(name);
            if !key.is_empty() && !seen.insert(key.clone()) {
                return None;
            }
            let url = (!key.is_empty()).then(|| tag_url(&key));
            Some(TagLink {
                name: name.clone(),
                url,
            })
        })
        .collect()
}
