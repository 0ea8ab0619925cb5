//! Index stage.
//!
//! Runs once all documents are written and derives the listing pages: the
//! archive, the tag overview and one page per tag.

use std::path::Path;

use crate::build::index::SiteIndex;
use crate::build::paths::{ARCHIVE_URL, TAGS_URL, url_to_output_path};
use crate::build::pipeline::{
    FinalizeStage, IndexError, IndexFailure, PipelineContext, PipelineError, ProcessingDocument,
};
use crate::build::render::{ListingContext, ListingInfo, RenderError};

use super::write::write_file;

/// Stage that writes the archive and tag pages.
///
/// Only documents that were written take part. A listing page that fails is
/// recorded in the context and the remaining pages are still written.
pub struct IndexStage;

impl FinalizeStage for IndexStage {
    fn name(&self) -> &'static str {
        "index"
    }

    fn finalize(
        &self,
        docs: &[ProcessingDocument],
        ctx: &mut PipelineContext,
    ) -> Result<(), PipelineError> {
        let index = SiteIndex::build(docs.iter().filter_map(|d| d.page.as_ref()));
        let summaries = index.summaries();
        tracing::info!(
            pages = index.pages.len(),
            tags = index.tags.len(),
            "Writing index pages"
        );

        let archive = ListingContext {
            site: ctx.site,
            page: ListingInfo {
                title: ctx.site.name.clone(),
                url: ARCHIVE_URL.to_string(),
            },
            pages: &index.pages,
            tags: &summaries,
            theme: ctx.theme_settings,
            quire: &ctx.quire,
        };
        let result = ctx.renderer.render_archive(&archive);
        write_listing(ctx, ARCHIVE_URL, result);

        let overview = ListingContext {
            site: ctx.site,
            page: ListingInfo {
                title: "Tags".to_string(),
                url: TAGS_URL.to_string(),
            },
            pages: &[],
            tags: &summaries,
            theme: ctx.theme_settings,
            quire: &ctx.quire,
        };
        let result = ctx.renderer.render_tags(&overview);
        write_listing(ctx, TAGS_URL, result);

        for tag in index.tags.values() {
            let listing = ListingContext {
                site: ctx.site,
                page: ListingInfo {
                    title: format!("Tagged \u{201c}{}\u{201d}", tag.name),
                    url: tag.url.clone(),
                },
                pages: &tag.pages,
                tags: &[],
                theme: ctx.theme_settings,
                quire: &ctx.quire,
            };
            let result = ctx.renderer.render_tag(&listing);
            write_listing(ctx, &tag.url, result);
        }

        Ok(())
    }
}

/// Write one rendered listing page, recording the outcome in the context.
fn write_listing(ctx: &mut PipelineContext, url: &str, rendered: Result<String, RenderError>) {
    let output = url_to_output_path(url, ctx.output_dir);
    let outcome = rendered
        .map_err(IndexError::from)
        .and_then(|html| write_index_page(ctx, &output, &html));

    match outcome {
        Ok(()) => {
            tracing::debug!(url, "Wrote index page");
            ctx.index_written.push(url.to_string());
        }
        Err(error) => {
            tracing::warn!(url, error = %error, "Index page failed");
            ctx.index_failures.push(IndexFailure {
                url: url.to_string(),
                error,
            });
        }
    }
}

fn write_index_page(ctx: &mut PipelineContext, output: &Path, html: &str) -> Result<(), IndexError> {
    // Pages take precedence over listings at the same location
    if let Some(other) = ctx.outputs.get(output) {
        return Err(IndexError::OutputCollision {
            output: output.to_path_buf(),
            other: other.clone(),
        });
    }
    write_file(output, html).map_err(|source| IndexError::WriteFailure {
        output: output.to_path_buf(),
        source,
    })?;
    ctx.outputs.insert(output.to_path_buf(), output.to_path_buf());
    Ok(())
}
