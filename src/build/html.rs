//! HTML output for a parsed [`Body`].

use std::collections::HashSet;

use serde::Serialize;

use super::markdown::{Block, Body, Inline};
use crate::util::{escape_attr, escape_text, escape_url, slugify};

/// A table of contents entry extracted from a heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// The heading text
    pub text: String,
    /// The heading id (for anchor links)
    pub id: String,
    /// The heading level as rendered (1-6)
    pub level: u8,
}

/// Result of rendering a body to HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBody {
    pub html: String,
    pub toc: Vec<TocEntry>,
}

/// Render a body tree to an HTML fragment.
///
/// Heading levels are shifted down by `heading_offset` (never past `h6`) and
/// every heading gets an id unique within the document.
pub fn render_html(body: &Body, heading_offset: u8) -> RenderedBody {
    let mut writer = HtmlWriter {
        out: String::new(),
        toc: Vec::new(),
        used_ids: HashSet::new(),
        heading_offset,
    };
    for block in body {
        writer.block(block);
    }
    RenderedBody {
        html: writer.out,
        toc: writer.toc,
    }
}

struct HtmlWriter {
    out: String,
    toc: Vec<TocEntry>,
    used_ids: HashSet<String>,
    heading_offset: u8,
}

impl HtmlWriter {
    fn block(&mut self, block: &Block) {
        match block {
            Block::Heading { level, content } => self.heading(*level, content),
            Block::Paragraph(content) => {
                self.out.push_str("<p>");
                self.inlines(content);
                self.out.push_str("</p>\n");
            }
            Block::CodeBlock { language, literal } => {
                match language {
                    Some(language) => {
                        self.out.push_str("<pre><code class=\"language-");
                        self.out.push_str(&escape_attr(language));
                        self.out.push_str("\">");
                    }
                    None => self.out.push_str("<pre><code>"),
                }
                self.out.push_str(&escape_text(literal));
                self.out.push_str("</code></pre>\n");
            }
            Block::List { start, tight, items } => {
                let tag = match start {
                    Some(1) => {
                        self.out.push_str("<ol>\n");
                        "ol"
                    }
                    Some(start) => {
                        self.out.push_str(&format!("<ol start=\"{start}\">\n"));
                        "ol"
                    }
                    None => {
                        self.out.push_str("<ul>\n");
                        "ul"
                    }
                };
                for item in items {
                    self.list_item(item, *tight);
                }
                self.out.push_str(&format!("</{tag}>\n"));
            }
            Block::BlockQuote(blocks) => {
                self.out.push_str("<blockquote>\n");
                for block in blocks {
                    self.block(block);
                }
                self.out.push_str("</blockquote>\n");
            }
            Block::Rule => self.out.push_str("<hr />\n"),
            Block::Literal(source) => {
                self.out.push_str("<pre class=\"literal\">");
                self.out.push_str(&escape_text(source));
                self.out.push_str("</pre>\n");
            }
        }
    }

    fn heading(&mut self, level: u8, content: &[Inline]) {
        let level = level.saturating_add(self.heading_offset).clamp(1, 6);
        let text = plain_text(content);

        // Generate a unique id from the heading text
        let base_id = match slugify(&text) {
            id if id.is_empty() => "section".to_string(),
            id => id,
        };
        let mut id = base_id.clone();
        let mut suffix = 1;
        while self.used_ids.contains(&id) {
            id = format!("{base_id}-{suffix}");
            suffix += 1;
        }
        self.used_ids.insert(id.clone());

        self.out.push_str(&format!("<h{level} id=\"{id}\">"));
        self.inlines(content);
        self.out.push_str(&format!(
            " <a class=\"header-anchor\" href=\"#{id}\" aria-label=\"Link to this heading\">#</a></h{level}>\n"
        ));

        self.toc.push(TocEntry { text, id, level });
    }

    fn list_item(&mut self, item: &[Block], tight: bool) {
        self.out.push_str("<li>");
        for block in item {
            match block {
                Block::Paragraph(content) if tight => self.inlines(content),
                block => {
                    if !self.out.ends_with('\n') {
                        self.out.push('\n');
                    }
                    self.block(block);
                }
            }
        }
        self.out.push_str("</li>\n");
    }

    fn inlines(&mut self, content: &[Inline]) {
        for inline in content {
            self.inline(inline);
        }
    }

    fn inline(&mut self, inline: &Inline) {
        match inline {
            Inline::Text(text) | Inline::Literal(text) => self.out.push_str(&escape_text(text)),
            Inline::Emphasis(content) => {
                self.out.push_str("<em>");
                self.inlines(content);
                self.out.push_str("</em>");
            }
            Inline::Strong(content) => {
                self.out.push_str("<strong>");
                self.inlines(content);
                self.out.push_str("</strong>");
            }
            Inline::Code(code) => {
                self.out.push_str("<code>");
                self.out.push_str(&escape_text(code));
                self.out.push_str("</code>");
            }
            Inline::Link {
                destination,
                title,
                content,
            } => {
                self.out.push_str("<a href=\"");
                self.out.push_str(&escape_url(destination));
                if !title.is_empty() {
                    self.out.push_str("\" title=\"");
                    self.out.push_str(&escape_attr(title));
                }
                self.out.push_str("\">");
                self.inlines(content);
                self.out.push_str("</a>");
            }
            Inline::SoftBreak => self.out.push('\n'),
            Inline::HardBreak => self.out.push_str("<br />\n"),
        }
    }
}

/// The text of a run of inlines with all markup removed.
fn plain_text(content: &[Inline]) -> String {
    let mut text = String::new();
    for inline in content {
        match inline {
            Inline::Text(s) | Inline::Code(s) | Inline::Literal(s) => text.push_str(s),
            Inline::Emphasis(inner) | Inline::Strong(inner) => text.push_str(&plain_text(inner)),
            Inline::Link { content, .. } => text.push_str(&plain_text(content)),
            Inline::SoftBreak | Inline::HardBreak => text.push(' '),
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::markdown::parse_body;
    use crate::config::MarkdownConfig;

    fn render(markdown: &str) -> RenderedBody {
        render_html(&parse_body(markdown, &MarkdownConfig::default(), None), 0)
    }

    #[test]
    fn test_heading_and_paragraph() {
        let rendered = render("# Heading\n\nSome *text*.");
        assert_eq!(
            rendered.html,
            "<h1 id=\"heading\">Heading <a class=\"header-anchor\" href=\"#heading\" \
             aria-label=\"Link to this heading\">#</a></h1>\n<p>Some <em>text</em>.</p>\n"
        );
        assert_eq!(
            rendered.toc,
            vec![TocEntry {
                text: "Heading".to_string(),
                id: "heading".to_string(),
                level: 1,
            }]
        );
    }

    #[test]
    fn test_heading_offset_shifts_and_clamps() {
        let body = parse_body("# Top\n\n###### Deep", &MarkdownConfig::default(), None);
        let rendered = render_html(&body, 1);
        assert!(rendered.html.starts_with("<h2 id=\"top\">"));
        assert!(rendered.html.contains("<h6 id=\"deep\">"));
        assert_eq!(rendered.toc[0].level, 2);
        assert_eq!(rendered.toc[1].level, 6);
    }

    #[test]
    fn test_duplicate_heading_ids_are_suffixed() {
        let rendered = render("## Kinds\n\n## Kinds\n\n## Kinds");
        let ids: Vec<_> = rendered.toc.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["kinds", "kinds-1", "kinds-2"]);
    }

    #[test]
    fn test_heading_id_uses_plain_text() {
        let rendered = render("## The `Type` of *Types*");
        assert_eq!(rendered.toc[0].id, "the-type-of-types");
        assert_eq!(rendered.toc[0].text, "The Type of Types");
        assert!(rendered.html.contains("The <code>Type</code> of <em>Types</em>"));
    }

    #[test]
    fn test_heading_without_usable_text_gets_fallback_id() {
        let rendered = render("## ???");
        assert_eq!(rendered.toc[0].id, "section");
    }

    #[test]
    fn test_text_is_escaped() {
        let rendered = render("Kinds & types: <T> \"quoted\"");
        assert_eq!(
            rendered.html,
            "<p>Kinds &amp; types: &lt;T&gt; \"quoted\"</p>\n"
        );
    }

    #[test]
    fn test_code_block_only_escapes_markup_characters() {
        let code = "f :: a -> \"b\" & 'c'\n  where  x = <y>\n";
        let rendered = render(&format!("```haskell\n{code}```\n"));
        assert_eq!(
            rendered.html,
            "<pre><code class=\"language-haskell\">f :: a -&gt; \"b\" &amp; 'c'\n  where  x = &lt;y&gt;\n</code></pre>\n"
        );
    }

    #[test]
    fn test_code_block_without_language() {
        let rendered = render("```\nplain\n```\n");
        assert_eq!(rendered.html, "<pre><code>plain\n</code></pre>\n");
    }

    #[test]
    fn test_tight_list() {
        let rendered = render("- one\n- two\n");
        assert_eq!(rendered.html, "<ul>\n<li>one</li>\n<li>two</li>\n</ul>\n");
    }

    #[test]
    fn test_loose_ordered_list_with_start() {
        let rendered = render("3. one\n\n4. two\n");
        assert_eq!(
            rendered.html,
            "<ol start=\"3\">\n<li>\n<p>one</p>\n</li>\n<li>\n<p>two</p>\n</li>\n</ol>\n"
        );
    }

    #[test]
    fn test_nested_tight_list() {
        let rendered = render("1. outer\n   - inner\n");
        assert_eq!(
            rendered.html,
            "<ol>\n<li>outer\n<ul>\n<li>inner</li>\n</ul>\n</li>\n</ol>\n"
        );
    }

    #[test]
    fn test_blockquote_and_rule() {
        let rendered = render("> quoted\n\n---\n");
        assert_eq!(
            rendered.html,
            "<blockquote>\n<p>quoted</p>\n</blockquote>\n<hr />\n"
        );
    }

    #[test]
    fn test_link_attributes_are_escaped() {
        let rendered = render("[GHC](https://example.org/?a=1&b=2 \"the \\\"compiler\\\"\")");
        assert_eq!(
            rendered.html,
            "<p><a href=\"https://example.org/?a=1&amp;b=2\" title=\"the &quot;compiler&quot;\">GHC</a></p>\n"
        );
    }

    #[test]
    fn test_literals_are_escaped_source() {
        let rendered = render("| a | b |\n|---|---|\n| 1 | 2 |\n\nx <span>y</span>");
        assert!(rendered
            .html
            .starts_with("<pre class=\"literal\">| a | b |\n|---|---|\n| 1 | 2 |</pre>\n"));
        assert!(rendered.html.ends_with("<p>x &lt;span&gt;y&lt;/span&gt;</p>\n"));
    }

    #[test]
    fn test_breaks() {
        let rendered = render("a\nb  \nc");
        assert_eq!(rendered.html, "<p>a\nb<br />\nc</p>\n");
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let markdown = "# A\n\n## A\n\n- x\n\n```rust\nfn main() {}\n```\n";
        assert_eq!(render(markdown), render(markdown));
    }
}
