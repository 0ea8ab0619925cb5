use std::path::{Path, PathBuf};

use crate::config::Config;

use super::format::FormatRegistry;
use super::page::Page;
use super::pipeline::{
    DocumentError, IndexFailure, Pipeline, PipelineContext, PipelineError, ProcessingDocument,
};
use super::render::{RenderError, Renderer, SiteContext};
use super::source::{ContentSource, SourceError};

#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("failed to create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// What a build produced.
#[derive(Debug)]
pub struct BuildReport {
    pub output_dir: PathBuf,
    /// Pages written, in load order
    pub succeeded: Vec<Page>,
    /// Documents that did not make it to the output, in load order
    pub failed: Vec<DocumentError>,
    /// URLs of the index pages written
    pub index_written: Vec<String>,
    pub index_failed: Vec<IndexFailure>,
}

impl BuildReport {
    /// Whether any document failed. Index page failures do not count.
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

pub struct Builder {
    config: Config,
    /// Base path for resolving relative paths (typically the config file's directory)
    base_path: PathBuf,
}

impl Builder {
    pub fn new(config: Config, base_path: PathBuf) -> Self {
        Self { config, base_path }
    }

    /// Run the whole pipeline once.
    ///
    /// Only problems that affect every document (a missing content directory,
    /// a broken theme, an unusable output directory) are errors here; per
    /// document failures end up in the report.
    pub fn build(&self) -> Result<BuildReport, BuildError> {
        // Step 1: Open the content directory
        let registry = FormatRegistry::with_defaults();
        let content_dir = self.resolve(&self.config.content.path);
        let source = ContentSource::new(&content_dir, &registry)?;

        // Step 2: Load renderer
        let theme_path = self.config.theme.path.as_deref().map(|p| self.resolve(p));
        let renderer = Renderer::new(theme_path.as_deref())?;

        // Step 3: Create output directory
        let output_dir = self.output_dir();
        std::fs::create_dir_all(&output_dir).map_err(|source| BuildError::OutputDir {
            path: output_dir.clone(),
            source,
        })?;

        // Step 4: Load documents
        let mut docs: Vec<ProcessingDocument> = source
            .documents()
            .map(|loaded| match loaded {
                Ok(doc) => ProcessingDocument::new(doc),
                Err(error) => ProcessingDocument::failed(error),
            })
            .collect();
        tracing::info!(
            documents = docs.len(),
            content = %source.root().display(),
            "Loaded documents"
        );

        // Step 5: Run the pipeline
        let site_context = SiteContext {
            name: self.config.site.name.clone(),
            url: self.config.site.url.clone(),
        };
        let mut ctx = PipelineContext::new(
            &output_dir,
            &self.config.content.url_prefix,
            &site_context,
            &self.config.theme.settings,
            &self.config.markdown,
            &renderer,
            &registry,
        );
        Pipeline::default_pipeline().run(&mut docs, &mut ctx)?;

        let index_written = std::mem::take(&mut ctx.index_written);
        let index_failed = std::mem::take(&mut ctx.index_failures);

        let mut succeeded = Vec::new();
        let mut failed = Vec::new();
        for doc in docs {
            match (doc.page, doc.failure) {
                (_, Some(error)) => failed.push(error),
                (Some(page), None) => succeeded.push(page),
                (None, None) => {}
            }
        }

        tracing::info!(
            succeeded = succeeded.len(),
            failed = failed.len(),
            index_pages = index_written.len(),
            "Build finished"
        );

        Ok(BuildReport {
            output_dir,
            succeeded,
            failed,
            index_written,
            index_failed,
        })
    }

    pub fn output_dir(&self) -> PathBuf {
        self.resolve(&self.config.site.output)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_relative() {
            self.base_path.join(path)
        } else {
            path.to_path_buf()
        }
    }
}
