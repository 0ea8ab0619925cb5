//! Build pipeline for document processing.
//!
//! The pipeline transforms documents through a series of stages:
//! 1. Front matter parsing (metadata, URL and output path)
//! 2. Markup rendering (body tree, HTML and TOC)
//! 3. Template rendering (page template wrapper)
//! 4. File writing (output to disk)
//!
//! A document that fails a stage keeps its error and is skipped by the stages
//! after it; the rest of the batch is unaffected. Build-wide stages run after
//! all documents are processed.

mod context;
mod document;
mod error;
mod stages;

pub use context::PipelineContext;
pub use document::ProcessingDocument;
pub use error::{DocumentError, IndexError, IndexFailure, PipelineError};

use stages::{FrontMatterStage, IndexStage, MarkupStage, TemplateStage, WriteStage};

/// A stage in the document processing pipeline.
///
/// Stages transform documents sequentially. Each stage receives all documents
/// and can modify them in place before passing to the next stage. Returning an
/// error aborts the run; a problem with one document belongs on that document
/// (see [`ProcessingDocument::fail`]).
pub trait Stage: Send + Sync {
    /// Unique name for this stage (used in logs).
    fn name(&self) -> &'static str;

    /// Process documents through this stage.
    ///
    /// Documents are passed by mutable reference so stages can transform
    /// their content in place. The `ctx` provides access to shared resources
    /// like the renderer and format registry.
    fn process(
        &self,
        docs: &mut [ProcessingDocument],
        ctx: &mut PipelineContext,
    ) -> Result<(), PipelineError>;
}

/// A stage that runs once after all documents are processed.
///
/// Use this for build-wide operations that need the whole batch, such as the
/// archive and tag listings.
pub trait FinalizeStage: Send + Sync {
    /// Unique name for this stage.
    fn name(&self) -> &'static str;

    /// Run finalization after all documents are processed and written.
    fn finalize(
        &self,
        docs: &[ProcessingDocument],
        ctx: &mut PipelineContext,
    ) -> Result<(), PipelineError>;
}

/// The document processing pipeline.
///
/// Orchestrates document transformation through a series of stages.
/// The default pipeline includes: front_matter → markup → template → write,
/// then the index finalize stage.
///
/// Stages run in the order they were added:
///
/// ```ignore
/// let mut pipeline = Pipeline::new();
/// pipeline.add_stage(FrontMatterStage).add_stage(MyCustomStage);
/// pipeline.add_finalize_stage(IndexStage);
/// ```
pub struct Pipeline {
    /// Document processing stages (run for each document batch)
    stages: Vec<Box<dyn Stage>>,
    /// Build-wide stages (run once after all documents)
    finalize_stages: Vec<Box<dyn FinalizeStage>>,
}

impl Pipeline {
    /// Create an empty pipeline with no stages.
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            finalize_stages: Vec::new(),
        }
    }

    /// Create the default pipeline with standard stages.
    ///
    /// Stages: front_matter → markup → template → write, then index
    pub fn default_pipeline() -> Self {
        let mut pipeline = Self::new();
        pipeline.add_stage(FrontMatterStage);
        pipeline.add_stage(MarkupStage);
        pipeline.add_stage(TemplateStage);
        pipeline.add_stage(WriteStage);
        pipeline.add_finalize_stage(IndexStage);
        pipeline
    }

    /// Add a stage to the end of the pipeline.
    pub fn add_stage<S: Stage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Add a finalize stage (runs after all documents are processed).
    pub fn add_finalize_stage<S: FinalizeStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.finalize_stages.push(Box::new(stage));
        self
    }

    /// Run the pipeline on a set of documents.
    pub fn run(
        &self,
        docs: &mut [ProcessingDocument],
        ctx: &mut PipelineContext,
    ) -> Result<(), PipelineError> {
        // Run each stage in sequence
        for stage in &self.stages {
            tracing::debug!(stage = stage.name(), "Running stage");
            stage.process(docs, ctx)?;
        }

        // Run finalize stages
        for stage in &self.finalize_stages {
            tracing::debug!(stage = stage.name(), "Running finalize stage");
            stage.finalize(docs, ctx)?;
        }

        Ok(())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::default_pipeline()
    }
}
