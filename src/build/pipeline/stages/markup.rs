//! Markup stage.
//!
//! Parses each body into a tree and renders the tree to an HTML fragment.

use crate::build::format::FormatContext;
use crate::build::html::render_html;
use crate::build::paths::LinkResolver;
use crate::build::pipeline::{PipelineContext, PipelineError, ProcessingDocument, Stage};

/// Stage that converts body text to HTML.
///
/// The format is picked by file extension. Parsing cannot fail, so this stage
/// never fails a document.
pub struct MarkupStage;

impl Stage for MarkupStage {
    fn name(&self) -> &'static str {
        "markup"
    }

    fn process(
        &self,
        docs: &mut [ProcessingDocument],
        ctx: &mut PipelineContext,
    ) -> Result<(), PipelineError> {
        for doc in docs.iter_mut().filter(|d| d.is_active()) {
            let format = ctx
                .format_registry
                .for_path(&doc.doc.source_path)
                .ok_or_else(|| {
                    PipelineError::stage(
                        "markup",
                        format!(
                            "no format registered for '{}'",
                            doc.doc.source_path.display()
                        ),
                    )
                })?;

            let links = LinkResolver::new(&doc.doc.source_path, ctx.url_prefix);
            let format_ctx = FormatContext {
                markdown_config: ctx.markdown_config,
                links: Some(&links),
            };
            tracing::debug!(
                path = %doc.doc.source_path.display(),
                format = format.name(),
                "Parsing body"
            );
            doc.body = format.parse(&doc.body_text, &format_ctx);

            let rendered = render_html(&doc.body, ctx.markdown_config.heading_offset);
            doc.content = rendered.html;
            doc.toc = rendered.toc;
        }

        Ok(())
    }
}
