//! Pipeline context for sharing state across stages.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::build::format::FormatRegistry;
use crate::build::render::{QuireContext, Renderer, SiteContext};
use crate::config::MarkdownConfig;

use super::error::IndexFailure;

/// Shared context for pipeline stages.
///
/// Holds the resources and configuration stages need, plus the state the
/// write and index stages accumulate over the run.
pub struct PipelineContext<'a> {
    // === Output configuration ===
    /// Directory where output files are written
    pub output_dir: &'a Path,

    /// URL prefix for article pages
    pub url_prefix: &'a str,

    // === Site-level data ===
    /// Site metadata (name, URL)
    pub site: &'a SiteContext,

    /// Theme settings passed to templates
    pub theme_settings: &'a serde_json::Value,

    /// Markdown processing configuration
    pub markdown_config: &'a MarkdownConfig,

    // === Services ===
    /// Template renderer
    pub renderer: &'a Renderer,

    /// Content format registry for parsing different file types
    pub format_registry: &'a FormatRegistry,

    pub quire: QuireContext,

    // === Run state ===
    /// Output files written so far, mapped to the source that produced them
    pub outputs: BTreeMap<PathBuf, PathBuf>,

    /// URLs of index pages written
    pub index_written: Vec<String>,

    /// Index pages that could not be written
    pub index_failures: Vec<IndexFailure>,
}

impl<'a> PipelineContext<'a> {
    /// Create a new pipeline context.
    pub fn new(
        output_dir: &'a Path,
        url_prefix: &'a str,
        site: &'a SiteContext,
        theme_settings: &'a serde_json::Value,
        markdown_config: &'a MarkdownConfig,
        renderer: &'a Renderer,
        format_registry: &'a FormatRegistry,
    ) -> Self {
        Self {
            output_dir,
            url_prefix,
            site,
            theme_settings,
            markdown_config,
            renderer,
            format_registry,
            quire: QuireContext::default(),
            outputs: BTreeMap::new(),
            index_written: Vec::new(),
            index_failures: Vec::new(),
        }
    }

    /// Claim an output file for a source, returning the previous owner if the
    /// file is already taken.
    pub fn claim_output(&mut self, output: &Path, source: &Path) -> Result<(), PathBuf> {
        if let Some(other) = self.outputs.get(output) {
            return Err(other.clone());
        }
        self.outputs.insert(output.to_path_buf(), source.to_path_buf());
        Ok(())
    }
}
