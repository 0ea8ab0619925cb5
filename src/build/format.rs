//! Pluggable content format system.
//!
//! A format turns the body text of a document into a [`Body`] tree. The
//! registry decides which files are documents at all: the content loader
//! skips any file whose extension no registered format claims.
//!
//! # Adding a New Format
//!
//! ```ignore
//! struct PlainTextFormat;
//!
//! impl ContentFormat for PlainTextFormat {
//!     fn name(&self) -> &'static str { "text" }
//!     fn extensions(&self) -> &[&'static str] { &["txt"] }
//!     fn parse(&self, content: &str, _ctx: &FormatContext) -> Body {
//!         vec![Block::Literal(content.to_string())]
//!     }
//! }
//!
//! registry.register(PlainTextFormat);
//! ```

use std::path::Path;

use super::markdown::{Body, parse_body};
use super::paths::LinkResolver;
use crate::config::MarkdownConfig;

/// Context available while parsing a document body.
pub struct FormatContext<'a> {
    /// Markdown-specific configuration (also used by other formats for consistency).
    pub markdown_config: &'a MarkdownConfig,
    /// Rewrites links between documents, when available
    pub links: Option<&'a LinkResolver<'a>>,
}

/// A content format that can parse files into a body tree.
pub trait ContentFormat: Send + Sync {
    /// The name of this format (e.g., "markdown").
    fn name(&self) -> &'static str;

    /// File extensions this format handles (lowercase, without dot).
    fn extensions(&self) -> &[&'static str];

    /// Parse body text into a tree. Parsing never fails; constructs a format
    /// cannot represent are kept as literal text.
    fn parse(&self, content: &str, ctx: &FormatContext) -> Body;
}

/// Markdown format implementation, backed by pulldown-cmark.
pub struct MarkdownFormat;

impl ContentFormat for MarkdownFormat {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn extensions(&self) -> &[&'static str] {
        &["md", "markdown"]
    }

    fn parse(&self, content: &str, ctx: &FormatContext) -> Body {
        parse_body(content, ctx.markdown_config, ctx.links)
    }
}

/// Registry of content formats.
pub struct FormatRegistry {
    formats: Vec<Box<dyn ContentFormat>>,
}

impl FormatRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            formats: Vec::new(),
        }
    }

    /// Create a registry with the default formats (Markdown).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(MarkdownFormat);
        registry
    }

    /// Register a new format.
    ///
    /// Later registrations take precedence for overlapping extensions.
    pub fn register<F: ContentFormat + 'static>(&mut self, format: F) {
        self.formats.push(Box::new(format));
    }

    /// Find the format for a file extension (case-insensitive).
    pub fn for_extension(&self, ext: &str) -> Option<&dyn ContentFormat> {
        let ext_lower = ext.to_lowercase();
        // Search in reverse so later registrations take precedence
        self.formats
            .iter()
            .rev()
            .find(|f| f.extensions().iter().any(|e| *e == ext_lower))
            .map(|f| f.as_ref())
    }

    /// Find the format for a file path based on its extension.
    pub fn for_path(&self, path: &Path) -> Option<&dyn ContentFormat> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.for_extension(ext))
    }

    /// Check if a path is a document (has a registered format).
    pub fn is_document(&self, path: &Path) -> bool {
        self.for_path(path).is_some()
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::markdown::Block;

    #[test]
    fn test_registry_default_formats() {
        let registry = FormatRegistry::with_defaults();

        assert!(registry.for_extension("md").is_some());
        assert!(registry.for_extension("markdown").is_some());
        assert!(registry.for_extension("MD").is_some()); // Case insensitive
        assert!(registry.for_extension("txt").is_none());
    }

    #[test]
    fn test_registry_is_document() {
        let registry = FormatRegistry::with_defaults();

        assert!(registry.is_document(Path::new("haskell/kinds.md")));
        assert!(registry.is_document(Path::new("notes.Markdown")));
        assert!(!registry.is_document(Path::new("diagram.png")));
        assert!(!registry.is_document(Path::new("README")));
    }

    #[test]
    fn test_empty_registry_claims_nothing() {
        let registry = FormatRegistry::new();
        assert!(!registry.is_document(Path::new("kinds.md")));
    }

    struct PlainTextFormat;
    impl ContentFormat for PlainTextFormat {
        fn name(&self) -> &'static str {
            "text"
        }
        fn extensions(&self) -> &[&'static str] {
            &["txt", "md"]
        }
        fn parse(&self, content: &str, _ctx: &FormatContext) -> Body {
            vec![Block::Literal(content.to_string())]
        }
    }

    #[test]
    fn test_later_registration_takes_precedence() {
        let mut registry = FormatRegistry::with_defaults();
        registry.register(PlainTextFormat);

        assert_eq!(registry.for_extension("txt").map(|f| f.name()), Some("text"));
        assert_eq!(registry.for_extension("md").map(|f| f.name()), Some("text"));
        assert_eq!(
            registry.for_extension("markdown").map(|f| f.name()),
            Some("markdown")
        );
    }

    #[test]
    fn test_markdown_format_parses_body() {
        let config = MarkdownConfig::default();
        let ctx = FormatContext {
            markdown_config: &config,
            links: None,
        };
        let body = MarkdownFormat.parse("# Kinds", &ctx);
        assert!(matches!(body[0], Block::Heading { level: 1, .. }));
    }
}
