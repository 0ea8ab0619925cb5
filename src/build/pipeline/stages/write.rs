//! File writing stage.
//!
//! Writes the final HTML output to the filesystem.

use crate::build::page::Page;
use crate::build::pipeline::{
    DocumentError, PipelineContext, PipelineError, ProcessingDocument, Stage,
};

/// Stage that writes rendered documents to the output directory.
///
/// Each page goes to its `output_path`, creating parent directories as
/// needed. A document whose output path was already claimed by an earlier
/// document fails with [`DocumentError::OutputCollision`]; a failed write
/// fails only that document.
pub struct WriteStage;

impl Stage for WriteStage {
    fn name(&self) -> &'static str {
        "write"
    }

    fn process(
        &self,
        docs: &mut [ProcessingDocument],
        ctx: &mut PipelineContext,
    ) -> Result<(), PipelineError> {
        for doc in docs.iter_mut().filter(|d| d.is_active()) {
            let html = doc.output_html.take().ok_or_else(|| {
                PipelineError::stage(
                    "write",
                    format!(
                        "document '{}' has no output HTML (was template stage run?)",
                        doc.source_path().display()
                    ),
                )
            })?;

            let path = doc.doc.source_path.clone();
            let output = doc.output_path.clone();

            if let Err(other) = ctx.claim_output(&output, &path) {
                doc.fail(DocumentError::OutputCollision {
                    path,
                    output,
                    other,
                });
                continue;
            }

            if let Err(source) = write_file(&output, &html) {
                doc.fail(DocumentError::WriteFailure {
                    path,
                    output,
                    source,
                });
                continue;
            }

            tracing::info!(path = %path.display(), url = %doc.url, "Wrote page");
            doc.page = doc.metadata.clone().map(|metadata| Page {
                source_path: path,
                metadata,
                html,
                url: doc.url.clone(),
                output_path: output,
            });
        }

        Ok(())
    }
}

/// Write a file, creating its parent directories.
pub(crate) fn write_file(path: &std::path::Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)
}
