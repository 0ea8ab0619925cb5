//! Front matter stage.
//!
//! Splits each document into metadata and body text, and fixes the page's
//! URL and output path.

use crate::build::document::parse_front_matter;
use crate::build::paths::{source_path_to_url, url_to_output_path};
use crate::build::pipeline::{
    DocumentError, PipelineContext, PipelineError, ProcessingDocument, Stage,
};

/// Stage that parses the YAML front matter of each document.
///
/// A document without valid front matter fails with
/// [`DocumentError::MalformedFrontMatter`]; the rest of the batch carries on.
pub struct FrontMatterStage;

impl Stage for FrontMatterStage {
    fn name(&self) -> &'static str {
        "front_matter"
    }

    fn process(
        &self,
        docs: &mut [ProcessingDocument],
        ctx: &mut PipelineContext,
    ) -> Result<(), PipelineError> {
        for doc in docs.iter_mut().filter(|d| d.is_active()) {
            match parse_front_matter(&doc.doc.raw) {
                Ok((metadata, body_text)) => {
                    doc.url = source_path_to_url(
                        &doc.doc.source_path,
                        ctx.url_prefix,
                        metadata.slug.as_deref(),
                    );
                    doc.output_path = url_to_output_path(&doc.url, ctx.output_dir);
                    doc.metadata = Some(metadata);
                    doc.body_text = body_text;
                }
                Err(source) => {
                    let path = doc.doc.source_path.clone();
                    doc.fail(DocumentError::MalformedFrontMatter { path, source });
                }
            }
        }

        Ok(())
    }
}
