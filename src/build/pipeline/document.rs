//! Document types for pipeline processing.

use std::path::{Path, PathBuf};

use crate::build::document::{Document, Metadata};
use crate::build::html::TocEntry;
use crate::build::markdown::Body;
use crate::build::page::Page;

use super::error::DocumentError;

/// A document being processed through the pipeline.
///
/// Wraps the original `Document` with state that evolves through the stages:
///
/// 1. After front matter: `metadata`, `body_text`, `url` and `output_path`
/// 2. After markup: `body`, `content` (HTML fragment) and `toc`
/// 3. After template: `output_html` = final page HTML
/// 4. After write: `page`
///
/// Once `failure` is set, later stages leave the document alone.
#[derive(Debug)]
pub struct ProcessingDocument {
    /// The original document
    pub doc: Document,

    pub metadata: Option<Metadata>,

    /// Body text following the front matter
    pub body_text: String,

    pub body: Body,

    /// Rendered body HTML (just the content, no page wrapper)
    pub content: String,

    /// Table of contents extracted during markup rendering
    pub toc: Vec<TocEntry>,

    pub url: String,

    /// Where the page will be written
    pub output_path: PathBuf,

    /// Final HTML output after template rendering
    pub output_html: Option<String>,

    /// The written page, set by the write stage
    pub page: Option<Page>,

    pub failure: Option<DocumentError>,
}

impl ProcessingDocument {
    /// Create a new processing document from a loaded document.
    pub fn new(doc: Document) -> Self {
        Self {
            doc,
            metadata: None,
            body_text: String::new(),
            body: Vec::new(),
            content: String::new(),
            toc: Vec::new(),
            url: String::new(),
            output_path: PathBuf::new(),
            output_html: None,
            page: None,
            failure: None,
        }
    }

    /// A document that failed before it could be loaded.
    pub fn failed(error: DocumentError) -> Self {
        let mut doc = Self::new(Document::new(error.path(), String::new()));
        doc.failure = Some(error);
        doc
    }

    pub fn source_path(&self) -> &Path {
        &self.doc.source_path
    }

    /// Whether the document is still moving through the pipeline.
    pub fn is_active(&self) -> bool {
        self.failure.is_none()
    }

    /// Record a failure; the document takes no further part in the build.
    pub fn fail(&mut self, error: DocumentError) {
        tracing::warn!(path = %self.source_path().display(), error = %error, "Document failed");
        self.failure = Some(error);
        self.output_html = None;
    }
}
