use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::document::Document;
use super::format::FormatRegistry;
use super::pipeline::DocumentError;

// =============================================================================
// Errors
// =============================================================================

#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("content path does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("content path is not a directory: {0}")]
    NotADirectory(PathBuf),
}

// =============================================================================
// Content source
// =============================================================================

/// The content directory of a site.
///
/// Only files with an extension claimed by the format registry are documents;
/// everything else, and anything hidden (leading `.`), is skipped.
pub struct ContentSource<'a> {
    root: PathBuf,
    registry: &'a FormatRegistry,
}

impl<'a> ContentSource<'a> {
    /// Open a content directory, checking that it exists.
    pub fn new(root: impl Into<PathBuf>, registry: &'a FormatRegistry) -> Result<Self, SourceError> {
        let root = root.into();
        if !root.exists() {
            return Err(SourceError::PathNotFound(root));
        }
        if !root.is_dir() {
            return Err(SourceError::NotADirectory(root));
        }
        Ok(Self { root, registry })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Iterate over the documents under the root.
    ///
    /// Files are read lazily, one per step, in file-name order, so calling
    /// this again yields the same sequence. A file that cannot be read is
    /// reported as an error item and the walk carries on.
    pub fn documents(&self) -> Documents<'_> {
        Documents {
            walker: WalkDir::new(&self.root)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter(),
            root: &self.root,
            registry: self.registry,
        }
    }
}

/// Iterator returned by [`ContentSource::documents`].
pub struct Documents<'a> {
    walker: walkdir::IntoIter,
    root: &'a Path,
    registry: &'a FormatRegistry,
}

impl Documents<'_> {
    fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(self.root).unwrap_or(path).to_path_buf()
    }
}

impl Iterator for Documents<'_> {
    type Item = Result<Document, DocumentError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    let path = self.relative(err.path().unwrap_or(self.root));
                    tracing::warn!(path = %path.display(), error = %err, "Failed to walk content directory");
                    return Some(Err(DocumentError::Unreadable {
                        path,
                        source: err.into(),
                    }));
                }
            };

            // Skip hidden files and directories
            if entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.') {
                if entry.file_type().is_dir() {
                    self.walker.skip_current_dir();
                }
                continue;
            }

            if !entry.file_type().is_file() || !self.registry.is_document(entry.path()) {
                continue;
            }

            let source_path = self.relative(entry.path());
            tracing::debug!(path = %source_path.display(), "Loading document");
            return Some(match std::fs::read_to_string(entry.path()) {
                Ok(raw) => Ok(Document::new(source_path, raw)),
                Err(source) => Err(DocumentError::Unreadable {
                    path: source_path,
                    source,
                }),
            });
        }
    }
}
