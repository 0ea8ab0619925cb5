//! Site-wide indexes derived from the built pages.
//!
//! Pages are ordered newest first; undated pages come after every dated page,
//! and ties are broken by title and then by URL so the order is total. Tags
//! are grouped by their slug, so `Haskell` and `haskell` share one index.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::page::{Page, tag_links};
use super::render::TagLink;
use crate::util::slugify;

/// A page as it appears in listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexedPage {
    pub title: String,
    pub url: String,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub tags: Vec<TagLink>,
}

impl From<&Page> for IndexedPage {
    fn from(page: &Page) -> Self {
        Self {
            title: page.metadata.title.clone(),
            url: page.url.clone(),
            date: page.metadata.date,
            description: page.metadata.description.clone(),
            tags: tag_links(&page.metadata.tags),
        }
    }
}

/// Index order: date descending, undated last, then title, then URL.
pub fn compare_pages(a: &IndexedPage, b: &IndexedPage) -> Ordering {
    let by_date = match (a.date, b.date) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_date
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.url.cmp(&b.url))
}

/// All pages carrying one tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagIndex {
    /// Slug of the tag, shared by every spelling of it
    pub key: String,
    /// The first spelling met in index order
    pub name: String,
    pub url: String,
    pub pages: Vec<IndexedPage>,
}

/// A tag as listed on the tag overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagSummary {
    pub key: String,
    pub name: String,
    pub url: String,
    pub count: usize,
}

#[derive(Debug, Default)]
pub struct SiteIndex {
    /// Every page, in index order
    pub pages: Vec<IndexedPage>,
    /// Tag indexes by key
    pub tags: BTreeMap<String, TagIndex>,
}

impl SiteIndex {
    pub fn build<'p>(pages: impl IntoIterator<Item = &'p Page>) -> Self {
        let mut pages: Vec<IndexedPage> = pages.into_iter().map(IndexedPage::from).collect();
        pages.sort_by(compare_pages);

        let mut tags: BTreeMap<String, TagIndex> = BTreeMap::new();
        for page in &pages {
            // Links are already one per key; those without a URL have no key
            for tag in &page.tags {
                let Some(url) = &tag.url else {
                    continue;
                };
                let key = slugify(&tag.name);
                tags.entry(key.clone())
                    .or_insert_with(|| TagIndex {
                        key,
                        name: tag.name.clone(),
                        url: url.clone(),
                        pages: Vec::new(),
                    })
                    .pages
                    .push(page.clone());
            }
        }

        Self { pages, tags }
    }

    /// Tag overview entries, sorted by key.
    pub fn summaries(&self) -> Vec<TagSummary> {
        self.tags
            .values()
            .map(|tag| TagSummary {
                key: tag.key.clone(),
                name: tag.name.clone(),
                url: tag.url.clone(),
                count: tag.pages.len(),
            })
            .collect()
    }
}
