use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;
use tera::{Context, Tera};

use super::html::TocEntry;
use super::index::{IndexedPage, TagSummary};
use crate::util::escape_attr;

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("theme not found: {0}")]
    ThemeNotFound(String),
}

pub const PAGE_TEMPLATE: &str = "page.html";
pub const TAG_TEMPLATE: &str = "tag.html";
pub const TAGS_TEMPLATE: &str = "tags.html";
pub const ARCHIVE_TEMPLATE: &str = "archive.html";

/// Templates compiled into the binary. A theme may replace any of them.
const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("templates/base.html")),
    (PAGE_TEMPLATE, include_str!("templates/page.html")),
    (TAG_TEMPLATE, include_str!("templates/tag.html")),
    (TAGS_TEMPLATE, include_str!("templates/tags.html")),
    (ARCHIVE_TEMPLATE, include_str!("templates/archive.html")),
];

/// The template renderer, wrapping Tera.
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Create a renderer from the built-in templates, overridden by any
    /// template of the same name under `<theme>/templates`.
    pub fn new(theme_path: Option<&Path>) -> Result<Self, RenderError> {
        let mut tera = match theme_path {
            Some(theme_path) => {
                let templates_path = theme_path.join("templates");
                if !templates_path.is_dir() {
                    return Err(RenderError::ThemeNotFound(
                        theme_path.display().to_string(),
                    ));
                }
                let glob = templates_path.join("**/*.html");
                let glob_str = glob.to_string_lossy();
                // Inheritance is resolved once the built-ins are added
                Tera::parse(&glob_str)?
            }
            None => Tera::default(),
        };
        tera.set_escape_fn(escape_attr);

        let overridden: Vec<String> = tera.get_template_names().map(str::to_string).collect();
        let builtins = BUILTIN_TEMPLATES
            .iter()
            .filter(|(name, _)| !overridden.iter().any(|o| o == name))
            .copied();
        // Added in one batch so templates can extend each other
        tera.add_raw_templates(builtins)?;

        tracing::debug!(overridden = ?overridden, "Loaded templates");
        Ok(Self { tera })
    }

    /// Render an article page.
    pub fn render_page(&self, context: &PageContext) -> Result<String, RenderError> {
        let mut tera_context = Context::new();
        tera_context.insert("site", &context.site);
        tera_context.insert("page", &context.page);
        tera_context.insert("content", &context.content);
        tera_context.insert("toc", &context.toc);
        tera_context.insert("theme", &context.theme);
        tera_context.insert("quire", &context.quire);

        Ok(self.tera.render(PAGE_TEMPLATE, &tera_context)?)
    }

    /// Render the archive page listing every article.
    pub fn render_archive(&self, context: &ListingContext) -> Result<String, RenderError> {
        self.render_listing(ARCHIVE_TEMPLATE, context)
    }

    /// Render the listing page of a single tag.
    pub fn render_tag(&self, context: &ListingContext) -> Result<String, RenderError> {
        self.render_listing(TAG_TEMPLATE, context)
    }

    /// Render the overview of all tags.
    pub fn render_tags(&self, context: &ListingContext) -> Result<String, RenderError> {
        self.render_listing(TAGS_TEMPLATE, context)
    }

    fn render_listing(&self, template: &str, context: &ListingContext) -> Result<String, RenderError> {
        let tera_context = Context::from_serialize(context)?;
        Ok(self.tera.render(template, &tera_context)?)
    }
}

/// Build information exposed to templates as `quire.*`.
#[derive(Debug, Clone, Serialize)]
pub struct QuireContext {
    pub version: String,
}

impl Default for QuireContext {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Context passed to page templates.
#[derive(Debug, Serialize)]
pub struct PageContext {
    pub site: SiteContext,
    pub page: PageInfo,
    /// The rendered body
    pub content: String,
    /// Table of contents for the current page
    pub toc: Vec<TocEntry>,
    /// Theme settings from config, accessible as `theme.*` in templates
    pub theme: serde_json::Value,
    pub quire: QuireContext,
}

/// Site-level information.
#[derive(Debug, Clone, Serialize)]
pub struct SiteContext {
    pub name: String,
    pub url: Option<String>,
}

/// Information about the current page.
#[derive(Debug, Serialize)]
pub struct PageInfo {
    pub title: String,
    pub url: String,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub tags: Vec<TagLink>,
    /// Custom front matter fields (flattened to top level, e.g., `page.author`)
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// A tag as shown on a page. Tags whose name has nothing to slug get no page
/// and so no `url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagLink {
    pub name: String,
    pub url: Option<String>,
}

/// Context passed to the archive and tag listing templates.
#[derive(Debug, Serialize)]
pub struct ListingContext<'a> {
    pub site: &'a SiteContext,
    pub page: ListingInfo,
    /// Articles listed on this page, in index order
    pub pages: &'a [IndexedPage],
    /// All tags (only filled for the tag overview)
    pub tags: &'a [TagSummary],
    pub theme: &'a serde_json::Value,
    pub quire: &'a QuireContext,
}

#[derive(Debug, Serialize)]
pub struct ListingInfo {
    pub title: String,
    pub url: String,
}
