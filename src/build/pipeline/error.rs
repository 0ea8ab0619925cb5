//! Pipeline error types.

use std::path::{Path, PathBuf};

use crate::build::document::FrontMatterError;
use crate::build::render::RenderError;

/// Errors that can occur during pipeline processing.
///
/// These abort the whole run; problems with a single document are recorded
/// on that document as a [`DocumentError`] instead.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("stage '{stage}' failed: {message}")]
    Stage { stage: String, message: String },
}

impl PipelineError {
    /// Create a stage-specific error.
    pub fn stage(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Stage {
            stage: stage.into(),
            message: message.into(),
        }
    }
}

/// Why a single document did not make it to the output.
///
/// Paths are source paths relative to the content root, except for the
/// written file in `WriteFailure`.
#[derive(thiserror::Error, Debug)]
pub enum DocumentError {
    #[error("failed to read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed front matter in {}: {source}", path.display())]
    MalformedFrontMatter {
        path: PathBuf,
        source: FrontMatterError,
    },

    #[error("failed to render {}: {source}", path.display())]
    Template { path: PathBuf, source: RenderError },

    #[error("failed to write {}: {source}", output.display())]
    WriteFailure {
        path: PathBuf,
        output: PathBuf,
        source: std::io::Error,
    },

    #[error(
        "{} would be written to {}, which {} already claimed",
        path.display(),
        output.display(),
        other.display()
    )]
    OutputCollision {
        path: PathBuf,
        output: PathBuf,
        other: PathBuf,
    },
}

impl DocumentError {
    /// Source path of the document the error belongs to.
    pub fn path(&self) -> &Path {
        match self {
            Self::Unreadable { path, .. }
            | Self::MalformedFrontMatter { path, .. }
            | Self::Template { path, .. }
            | Self::WriteFailure { path, .. }
            | Self::OutputCollision { path, .. } => path,
        }
    }
}

/// Why an index page (archive, tag overview or tag listing) was not written.
#[derive(thiserror::Error, Debug)]
pub enum IndexError {
    #[error("failed to render index page: {0}")]
    Template(#[from] RenderError),

    #[error("failed to write {}: {source}", output.display())]
    WriteFailure {
        output: PathBuf,
        source: std::io::Error,
    },

    #[error("{} is already taken by {}", output.display(), other.display())]
    OutputCollision { output: PathBuf, other: PathBuf },
}

/// An index page that could not be produced.
#[derive(Debug)]
pub struct IndexFailure {
    pub url: String,
    pub error: IndexError,
}
