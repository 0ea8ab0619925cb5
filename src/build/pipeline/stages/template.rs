//! Page template rendering stage.
//!
//! Wraps rendered HTML content in the page template, adding the page header,
//! site chrome and table of contents.

use crate::build::page::tag_links;
use crate::build::pipeline::{
    DocumentError, PipelineContext, PipelineError, ProcessingDocument, Stage,
};
use crate::build::render::{PageContext, PageInfo};

/// Front matter keys that `page.*` already provides.
const RESERVED_KEYS: &[&str] = &["title", "url", "date", "description", "tags"];

/// Stage that applies the page template to rendered content.
///
/// After this stage, `doc.output_html` contains the complete HTML page. A
/// template error fails the document with [`DocumentError::Template`].
pub struct TemplateStage;

impl Stage for TemplateStage {
    fn name(&self) -> &'static str {
        "template"
    }

    fn process(
        &self,
        docs: &mut [ProcessingDocument],
        ctx: &mut PipelineContext,
    ) -> Result<(), PipelineError> {
        for doc in docs.iter_mut().filter(|d| d.is_active()) {
            let metadata = doc.metadata.as_ref().ok_or_else(|| {
                PipelineError::stage(
                    "template",
                    format!(
                        "document '{}' has no metadata (was front_matter stage run?)",
                        doc.source_path().display()
                    ),
                )
            })?;

            let page_info = PageInfo {
                title: metadata.title.clone(),
                url: doc.url.clone(),
                date: metadata.date,
                description: metadata.description.clone(),
                tags: tag_links(&metadata.tags),
                extra: metadata
                    .extra
                    .iter()
                    .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect(),
            };

            let page_context = PageContext {
                site: ctx.site.clone(),
                page: page_info,
                content: doc.content.clone(),
                toc: doc.toc.clone(),
                theme: ctx.theme_settings.clone(),
                quire: ctx.quire.clone(),
            };

            match ctx.renderer.render_page(&page_context) {
                Ok(html) => doc.output_html = Some(html),
                Err(source) => {
                    let path = doc.doc.source_path.clone();
                    doc.fail(DocumentError::Template { path, source });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::document::Document;
    use crate::build::pipeline::stages::{FrontMatterStage, MarkupStage};
    use crate::build::pipeline::test_support::TestSite;

    fn run(site: &TestSite, docs: &mut [ProcessingDocument]) {
        let mut ctx = site.context();
        FrontMatterStage.process(docs, &mut ctx).unwrap();
        MarkupStage.process(docs, &mut ctx).unwrap();
        TemplateStage.process(docs, &mut ctx).unwrap();
    }

    #[test]
    fn test_renders_full_page() {
        let site = TestSite::new();
        let mut docs = vec![ProcessingDocument::new(Document::new(
            "kinds.md",
            "---\ntitle: Kinds\ndate: 2024-02-01\ndescription: Types of types\ntags: [haskell]\n---\n# Heading\n\nSome *text*.",
        ))];

        run(&site, &mut docs);

        let html = docs[0].output_html.as_deref().unwrap();
        assert!(html.contains("<title>Kinds | Test Site</title>"));
        assert!(html.contains("<h1>Kinds</h1>"));
        assert!(html.contains("2024-02-01"));
        assert!(html.contains("<a href=\"/tags/haskell/\">haskell</a>"));
        assert!(html.contains("<p>Some <em>text</em>.</p>"));
    }

    #[test]
    fn test_extra_front_matter_reaches_templates() {
        let site = TestSite::with_page_template("{{ page.author }}|{{ page.title }}");
        let mut docs = vec![ProcessingDocument::new(Document::new(
            "kinds.md",
            "---\ntitle: Kinds\nauthor: Jane\n---\n",
        ))];

        run(&site, &mut docs);
        assert_eq!(docs[0].output_html.as_deref(), Some("Jane|Kinds"));
    }

    #[test]
    fn test_template_error_fails_the_document() {
        let site = TestSite::with_page_template("{{ page.missing_field }}");
        let mut docs = vec![ProcessingDocument::new(Document::new(
            "kinds.md",
            "---\ntitle: Kinds\n---\n",
        ))];

        run(&site, &mut docs);

        assert!(matches!(docs[0].failure, Some(DocumentError::Template { .. })));
        assert!(docs[0].output_html.is_none());
    }
}
