//! Markdown parsing into a document body tree.
//!
//! `pulldown-cmark` tokenizes the text; its event stream is folded into
//! [`Block`] and [`Inline`] nodes. Constructs the tree has no node for
//! (tables, footnotes, images, raw HTML, ...) become `Literal` nodes holding
//! their exact source text, so an odd construct never costs the rest of the
//! document.

use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, LinkType, Options, Parser, Tag};

use super::paths::LinkResolver;
use crate::config::MarkdownConfig;

/// The parsed body of a document.
pub type Body = Vec<Block>;

/// A structural unit of content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading {
        /// 1 for `#`, up to 6
        level: u8,
        content: Vec<Inline>,
    },
    Paragraph(Vec<Inline>),
    CodeBlock {
        /// First word of a fenced block's info string
        language: Option<String>,
        /// The code exactly as written
        literal: String,
    },
    List {
        /// Set for ordered lists
        start: Option<u64>,
        /// Tight lists render their items without paragraph tags
        tight: bool,
        items: Vec<Vec<Block>>,
    },
    BlockQuote(Vec<Block>),
    Rule,
    /// Source text of a block construct that is passed through as-is
    Literal(String),
}

/// A unit of content within a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Emphasis(Vec<Inline>),
    Strong(Vec<Inline>),
    Code(String),
    Link {
        destination: String,
        title: String,
        content: Vec<Inline>,
    },
    SoftBreak,
    HardBreak,
    /// Source text of an inline construct that is passed through as-is
    Literal(String),
}

/// Parse Markdown body text into a [`Body`].
///
/// Never fails: anything that cannot be represented degrades to literal text.
/// When `links` is given, relative links to other Markdown files are rewritten
/// to page URLs.
pub fn parse_body(markdown: &str, config: &MarkdownConfig, links: Option<&LinkResolver>) -> Body {
    // Recognize the common extensions so they pass through as whole units
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    if config.smart_punctuation {
        options.insert(Options::ENABLE_SMART_PUNCTUATION);
    }

    let mut builder = TreeBuilder {
        source: markdown,
        events: Parser::new_ext(markdown, options).into_offset_iter(),
        links,
    };
    builder.blocks().blocks
}

/// Blocks collected from one container.
#[derive(Default)]
struct BlockRun {
    blocks: Vec<Block>,
    /// Whether the container held explicit paragraphs (a loose list item)
    loose: bool,
}

struct TreeBuilder<'a, 'l, I> {
    source: &'a str,
    events: I,
    links: Option<&'l LinkResolver<'l>>,
}

impl<'a, I> TreeBuilder<'a, '_, I>
where
    I: Iterator<Item = (Event<'a>, Range<usize>)>,
{
    /// Collect blocks up to the end of the enclosing container.
    ///
    /// Inline events met at block level (as in tight list items) are gathered
    /// into an implicit paragraph.
    fn blocks(&mut self) -> BlockRun {
        let mut run = BlockRun::default();
        let mut pending: Vec<Inline> = Vec::new();

        while let Some((event, range)) = self.events.next() {
            match event {
                Event::End(_) => break,
                Event::Start(tag) if is_inline_tag(&tag) => {
                    let inline = self.inline_container(tag, range);
                    push_inline(&mut pending, inline);
                }
                Event::Start(tag) => {
                    flush_paragraph(&mut pending, &mut run.blocks);
                    if matches!(tag, Tag::Paragraph) {
                        run.loose = true;
                    }
                    let block = self.block(tag, range);
                    run.blocks.push(block);
                }
                Event::Rule => {
                    flush_paragraph(&mut pending, &mut run.blocks);
                    run.blocks.push(Block::Rule);
                }
                event => {
                    let inline = self.leaf_inline(event, range);
                    push_inline(&mut pending, inline);
                }
            }
        }

        flush_paragraph(&mut pending, &mut run.blocks);
        run
    }

    fn block(&mut self, tag: Tag<'a>, range: Range<usize>) -> Block {
        match tag {
            Tag::Paragraph => Block::Paragraph(self.inlines()),
            Tag::Heading { level, .. } => Block::Heading {
                level: level as u8,
                content: self.inlines(),
            },
            Tag::BlockQuote(_) => Block::BlockQuote(self.blocks().blocks),
            Tag::CodeBlock(kind) => {
                let language = match kind {
                    CodeBlockKind::Fenced(info) => info.split_whitespace().next().map(str::to_string),
                    CodeBlockKind::Indented => None,
                };
                Block::CodeBlock {
                    language,
                    literal: self.code_text(),
                }
            }
            Tag::List(start) => self.list(start),
            _ => Block::Literal(self.skip(range).trim_end().to_string()),
        }
    }

    fn list(&mut self, start: Option<u64>) -> Block {
        let mut items = Vec::new();
        let mut loose = false;

        while let Some((event, _)) = self.events.next() {
            match event {
                Event::Start(Tag::Item) => {
                    let run = self.blocks();
                    loose |= run.loose;
                    items.push(run.blocks);
                }
                Event::End(_) => break,
                _ => {}
            }
        }

        Block::List {
            start,
            tight: !loose,
            items,
        }
    }

    /// Collect inline content up to the end of the enclosing element.
    fn inlines(&mut self) -> Vec<Inline> {
        let mut content = Vec::new();

        while let Some((event, range)) = self.events.next() {
            let inline = match event {
                Event::End(_) => break,
                Event::Start(tag) => self.inline_container(tag, range),
                event => self.leaf_inline(event, range),
            };
            push_inline(&mut content, inline);
        }

        content
    }

    fn inline_container(&mut self, tag: Tag<'a>, range: Range<usize>) -> Inline {
        match tag {
            Tag::Emphasis => Inline::Emphasis(self.inlines()),
            Tag::Strong => Inline::Strong(self.inlines()),
            Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            } => {
                let destination = match link_type {
                    LinkType::Email => format!("mailto:{dest_url}"),
                    _ => match self.links {
                        Some(links) => links.resolve(&dest_url),
                        None => dest_url.to_string(),
                    },
                };
                Inline::Link {
                    destination,
                    title: title.to_string(),
                    content: self.inlines(),
                }
            }
            _ => Inline::Literal(self.skip(range)),
        }
    }

    fn leaf_inline(&self, event: Event<'a>, range: Range<usize>) -> Inline {
        match event {
            Event::Text(text) => Inline::Text(text.to_string()),
            Event::Code(code) => Inline::Code(code.to_string()),
            Event::SoftBreak => Inline::SoftBreak,
            Event::HardBreak => Inline::HardBreak,
            _ => Inline::Literal(self.source_text(range)),
        }
    }

    /// The text of a code block, byte for byte.
    fn code_text(&mut self) -> String {
        let mut literal = String::new();
        while let Some((event, _)) = self.events.next() {
            match event {
                Event::Text(text) => literal.push_str(&text),
                Event::End(_) => break,
                _ => {}
            }
        }
        literal
    }

    /// Consume the rest of an element and return its source text.
    fn skip(&mut self, range: Range<usize>) -> String {
        let mut depth = 1usize;
        while depth > 0 {
            match self.events.next() {
                Some((Event::Start(_), _)) => depth += 1,
                Some((Event::End(_), _)) => depth -= 1,
                Some(_) => {}
                None => break,
            }
        }
        self.source_text(range)
    }

    fn source_text(&self, range: Range<usize>) -> String {
        self.source.get(range).unwrap_or_default().to_string()
    }
}

fn is_inline_tag(tag: &Tag) -> bool {
    matches!(
        tag,
        Tag::Emphasis | Tag::Strong | Tag::Strikethrough | Tag::Link { .. } | Tag::Image { .. }
    )
}

/// Append an inline node, merging adjacent text runs.
fn push_inline(content: &mut Vec<Inline>, inline: Inline) {
    if let (Some(Inline::Text(last)), Inline::Text(text)) = (content.last_mut(), &inline) {
        last.push_str(text);
        return;
    }
    content.push(inline);
}

fn flush_paragraph(pending: &mut Vec<Inline>, blocks: &mut Vec<Block>) {
    if !pending.is_empty() {
        blocks.push(Block::Paragraph(std::mem::take(pending)));
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn parse(markdown: &str) -> Body {
        parse_body(markdown, &MarkdownConfig::default(), None)
    }

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    #[test]
    fn test_heading_and_paragraph_with_emphasis() {
        let body = parse("# Heading\n\nSome *text*.");
        assert_eq!(
            body,
            vec![
                Block::Heading {
                    level: 1,
                    content: vec![text("Heading")],
                },
                Block::Paragraph(vec![
                    text("Some "),
                    Inline::Emphasis(vec![text("text")]),
                    text("."),
                ]),
            ]
        );
    }

    #[test]
    fn test_heading_levels() {
        let body = parse("## Two\n\n###### Six");
        assert!(matches!(body[0], Block::Heading { level: 2, .. }));
        assert!(matches!(body[1], Block::Heading { level: 6, .. }));
    }

    #[test]
    fn test_fenced_code_is_verbatim() {
        let code = "data Proxy (a :: k) = Proxy\n\n  -- *not* emphasis, <not> html\n    odd   spacing  \n";
        let markdown = format!("```haskell ghci\n{code}```\n");
        let body = parse(&markdown);
        assert_eq!(
            body,
            vec![Block::CodeBlock {
                language: Some("haskell".to_string()),
                literal: code.to_string(),
            }]
        );
    }

    #[test]
    fn test_indented_code_has_no_language() {
        let body = parse("Intro\n\n    :kind Maybe\n");
        assert_eq!(
            body[1],
            Block::CodeBlock {
                language: None,
                literal: ":kind Maybe\n".to_string(),
            }
        );
    }

    #[test]
    fn test_unordered_tight_list() {
        let body = parse("- one\n- *two*\n");
        assert_eq!(
            body,
            vec![Block::List {
                start: None,
                tight: true,
                items: vec![
                    vec![Block::Paragraph(vec![text("one")])],
                    vec![Block::Paragraph(vec![Inline::Emphasis(vec![text("two")])])],
                ],
            }]
        );
    }

    #[test]
    fn test_ordered_loose_list() {
        let body = parse("3. first\n\n4. second\n");
        match &body[0] {
            Block::List { start, tight, items } => {
                assert_eq!(*start, Some(3));
                assert!(!tight);
                assert_eq!(items.len(), 2);
                assert_eq!(items[1], vec![Block::Paragraph(vec![text("second")])]);
            }
            other => panic!("expected a list, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_list() {
        let body = parse("- outer\n  - inner\n");
        match &body[0] {
            Block::List { items, .. } => {
                assert_eq!(items[0].len(), 2);
                assert!(matches!(items[0][1], Block::List { .. }));
            }
            other => panic!("expected a list, got {other:?}"),
        }
    }

    #[test]
    fn test_blockquote() {
        let body = parse("> Types classify *values*.\n>\n> Kinds classify types.\n");
        assert_eq!(
            body,
            vec![Block::BlockQuote(vec![
                Block::Paragraph(vec![
                    text("Types classify "),
                    Inline::Emphasis(vec![text("values")]),
                    text("."),
                ]),
                Block::Paragraph(vec![text("Kinds classify types.")]),
            ])]
        );
    }

    #[test]
    fn test_inline_link_strong_and_code() {
        let body = parse("See **[GHC](https://www.haskell.org/ghc/ \"compiler\")** and `:kind`.");
        assert_eq!(
            body,
            vec![Block::Paragraph(vec![
                text("See "),
                Inline::Strong(vec![Inline::Link {
                    destination: "https://www.haskell.org/ghc/".to_string(),
                    title: "compiler".to_string(),
                    content: vec![text("GHC")],
                }]),
                text(" and "),
                Inline::Code(":kind".to_string()),
                text("."),
            ])]
        );
    }

    #[test]
    fn test_email_autolink() {
        let body = parse("<me@example.org>");
        match &body[0] {
            Block::Paragraph(content) => match &content[0] {
                Inline::Link { destination, .. } => {
                    assert_eq!(destination, "mailto:me@example.org")
                }
                other => panic!("expected a link, got {other:?}"),
            },
            other => panic!("expected a paragraph, got {other:?}"),
        }
    }

    #[test]
    fn test_links_are_resolved_when_resolver_given() {
        let resolver = LinkResolver::new(Path::new("haskell/intro.md"), "/posts");
        let body = parse_body(
            "Read [kinds](kinds.md#arity).",
            &MarkdownConfig::default(),
            Some(&resolver),
        );
        match &body[0] {
            Block::Paragraph(content) => match &content[1] {
                Inline::Link { destination, .. } => {
                    assert_eq!(destination, "/posts/haskell/kinds/#arity")
                }
                other => panic!("expected a link, got {other:?}"),
            },
            other => panic!("expected a paragraph, got {other:?}"),
        }
    }

    #[test]
    fn test_rule() {
        let body = parse("above\n\n---\n\nbelow");
        assert_eq!(body[1], Block::Rule);
        assert_eq!(body.len(), 3);
    }

    #[test]
    fn test_table_passes_through_as_literal() {
        let table = "| Type | Kind |\n|------|------|\n| Int  | *    |";
        let markdown = format!("Before\n\n{table}\n\nAfter *still* rendered.\n");
        let body = parse(&markdown);
        assert_eq!(body[1], Block::Literal(table.to_string()));
        assert_eq!(
            body[2],
            Block::Paragraph(vec![
                text("After "),
                Inline::Emphasis(vec![text("still")]),
                text(" rendered."),
            ])
        );
    }

    #[test]
    fn test_html_block_passes_through_as_literal() {
        let body = parse("<div class=\"note\">\nhello\n</div>\n\n# After\n");
        assert_eq!(
            body[0],
            Block::Literal("<div class=\"note\">\nhello\n</div>".to_string())
        );
        assert!(matches!(body[1], Block::Heading { level: 1, .. }));
    }

    #[test]
    fn test_image_and_inline_html_pass_through() {
        let body = parse("A ![diagram](kinds.png) and <span>raw</span> end");
        match &body[0] {
            Block::Paragraph(content) => {
                assert!(content.contains(&Inline::Literal("![diagram](kinds.png)".to_string())));
                assert!(content.contains(&Inline::Literal("<span>".to_string())));
                assert!(content.contains(&Inline::Literal("</span>".to_string())));
            }
            other => panic!("expected a paragraph, got {other:?}"),
        }
    }

    #[test]
    fn test_strikethrough_passes_through() {
        let body = parse("a ~~gone~~ b");
        assert_eq!(
            body,
            vec![Block::Paragraph(vec![
                text("a "),
                Inline::Literal("~~gone~~".to_string()),
                text(" b"),
            ])]
        );
    }

    #[test]
    fn test_footnotes_pass_through() {
        let body = parse("Claim[^1].\n\n[^1]: Source.\n");
        match &body[0] {
            Block::Paragraph(content) => {
                assert!(content.contains(&Inline::Literal("[^1]".to_string())));
            }
            other => panic!("expected a paragraph, got {other:?}"),
        }
        assert!(matches!(&body[1], Block::Literal(s) if s.starts_with("[^1]: Source.")));
    }

    #[test]
    fn test_unclosed_markup_degrades_to_text() {
        let body = parse("An *unclosed emphasis and a [broken link(\n\n# Still a heading");
        assert_eq!(
            body[0],
            Block::Paragraph(vec![text("An *unclosed emphasis and a [broken link(")])
        );
        assert!(matches!(body[1], Block::Heading { level: 1, .. }));
    }

    #[test]
    fn test_breaks() {
        let body = parse("line one\nline two  \nline three");
        assert_eq!(
            body,
            vec![Block::Paragraph(vec![
                text("line one"),
                Inline::SoftBreak,
                text("line two"),
                Inline::HardBreak,
                text("line three"),
            ])]
        );
    }

    #[test]
    fn test_smart_punctuation_is_configurable() {
        let config = MarkdownConfig {
            smart_punctuation: true,
            ..MarkdownConfig::default()
        };
        let body = parse_body("\"kind\" -- sort", &config, None);
        assert_eq!(
            body,
            vec![Block::Paragraph(vec![text("\u{201c}kind\u{201d} \u{2013} sort")])]
        );
    }

    #[test]
    fn test_empty_body() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n").is_empty());
    }

    #[test]
    fn test_parsing_is_deterministic() {
        let markdown = "# A\n\n- x\n- y\n\n```\ncode\n```\n\n> q\n";
        assert_eq!(parse(markdown), parse(markdown));
    }
}
