//! Markdown to block model

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use std::iter::Peekable;

use super::image::ImageSpec;

/// Inline content
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(String),
    Code(String),
    Emphasis(Vec<Inline>),
    Strong(Vec<Inline>),
    Strikethrough(Vec<Inline>),
    Link { href: String, title: String, children: Vec<Inline> },
    Image(ImageSpec),
    Html(String),
    SoftBreak,
    HardBreak,
}

/// Block-level content
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Vec<Inline>),
    Heading { level: u8, content: Vec<Inline> },
    /// A paragraph holding nothing but one image
    Image(ImageSpec),
    List { start: Option<u64>, items: Vec<Vec<Block>> },
    Code { lang: Option<String>, code: String },
    Table { header: Vec<Vec<Inline>>, rows: Vec<Vec<Vec<Inline>>> },
    Quote(Vec<Block>),
    Rule,
    Html(String),
}

/// Flatten nested inline content into plain text
pub fn plain_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        match inline {
            Inline::Text(t) | Inline::Code(t) => out.push_str(t),
            Inline::Emphasis(c) | Inline::Strong(c) | Inline::Strikethrough(c) => {
                out.push_str(&plain_text(c))
            }
            Inline::Link { children, .. } => out.push_str(&plain_text(children)),
            Inline::Image(spec) => out.push_str(&spec.alt),
            Inline::SoftBreak | Inline::HardBreak => out.push(' '),
            Inline::Html(_) => {}
        }
    }
    out
}

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
        | Options::ENABLE_GFM
}

/// Parse markdown into blocks
pub fn parse(markdown: &str) -> Vec<Block> {
    let mut events = Parser::new_ext(markdown, options()).peekable();
    parse_blocks(&mut events, BlockEnd::Document)
}

type Events<'a> = Peekable<Parser<'a>>;

/// Where a run of blocks stops
#[derive(Clone, Copy)]
enum BlockEnd {
    Document,
    Item,
    Quote,
}

impl BlockEnd {
    fn matches(self, tag: &TagEnd) -> bool {
        match self {
            BlockEnd::Document => false,
            BlockEnd::Item => matches!(tag, TagEnd::Item),
            BlockEnd::Quote => matches!(tag, TagEnd::BlockQuote { .. }),
        }
    }
}

fn parse_blocks(events: &mut Events, end: BlockEnd) -> Vec<Block> {
    let mut blocks = Vec::new();
    // Inline content that appears outside a paragraph (tight list items)
    let mut loose: Vec<Inline> = Vec::new();

    while let Some(event) = events.next() {
        match event {
            Event::End(tag) if end.matches(&tag) => break,
            Event::Start(Tag::Paragraph) => {
                flush_loose(&mut loose, &mut blocks);
                let content = parse_inlines(events, TagEnd::Paragraph);
                blocks.push(paragraph_block(content));
            }
            Event::Start(Tag::Heading { level, .. }) => {
                flush_loose(&mut loose, &mut blocks);
                let content = parse_inlines(events, TagEnd::Heading(level));
                blocks.push(Block::Heading {
                    level: level as u8,
                    content,
                });
            }
            Event::Start(Tag::BlockQuote { .. }) => {
                flush_loose(&mut loose, &mut blocks);
                let inner = parse_blocks(events, BlockEnd::Quote);
                blocks.push(Block::Quote(inner));
            }
            Event::Start(Tag::CodeBlock(kind)) => {
                flush_loose(&mut loose, &mut blocks);
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(str::to_string)
                        .filter(|l| !l.is_empty()),
                    CodeBlockKind::Indented => None,
                };
                let code = collect_text(events, TagEnd::CodeBlock);
                blocks.push(Block::Code { lang, code });
            }
            Event::Start(Tag::List(start)) => {
                flush_loose(&mut loose, &mut blocks);
                let mut items = Vec::new();
                while let Some(event) = events.next() {
                    match event {
                        Event::Start(Tag::Item) => {
                            items.push(parse_blocks(events, BlockEnd::Item));
                        }
                        Event::End(TagEnd::List { .. }) => break,
                        _ => {}
                    }
                }
                blocks.push(Block::List { start, items });
            }
            Event::Start(Tag::Table(_)) => {
                flush_loose(&mut loose, &mut blocks);
                blocks.push(parse_table(events));
            }
            Event::Start(Tag::HtmlBlock) => {
                flush_loose(&mut loose, &mut blocks);
                let html = collect_text(events, TagEnd::HtmlBlock);
                blocks.push(Block::Html(html));
            }
            Event::Rule => {
                flush_loose(&mut loose, &mut blocks);
                blocks.push(Block::Rule);
            }
            Event::Html(html) => {
                flush_loose(&mut loose, &mut blocks);
                blocks.push(Block::Html(html.to_string()));
            }
            Event::TaskListMarker(checked) => {
                loose.push(Inline::Text(if checked { "☑ " } else { "☐ " }.to_string()));
            }
            other => {
                if let Some(inline) = inline_from_event(other, events) {
                    loose.push(inline);
                }
            }
        }
    }

    flush_loose(&mut loose, &mut blocks);
    blocks
}

fn flush_loose(loose: &mut Vec<Inline>, blocks: &mut Vec<Block>) {
    if !loose.is_empty() {
        blocks.push(paragraph_block(std::mem::take(loose)));
    }
}

fn paragraph_block(content: Vec<Inline>) -> Block {
    let meaningful: Vec<&Inline> = content
        .iter()
        .filter(|i| !matches!(i, Inline::Text(t) if t.trim().is_empty()))
        .filter(|i| !matches!(i, Inline::SoftBreak))
        .collect();

    if let [Inline::Image(spec)] = meaningful.as_slice() {
        return Block::Image(spec.clone());
    }
    Block::Paragraph(content)
}

fn parse_inlines(events: &mut Events, end: TagEnd) -> Vec<Inline> {
    let mut inlines = Vec::new();
    while let Some(event) = events.next() {
        if let Event::End(tag) = &event {
            if *tag == end {
                break;
            }
        }
        if let Some(inline) = inline_from_event(event, events) {
            inlines.push(inline);
        }
    }
    inlines
}

fn inline_from_event(event: Event, events: &mut Events) -> Option<Inline> {
    match event {
        Event::Text(t) => Some(Inline::Text(t.to_string())),
        Event::Code(c) => Some(Inline::Code(c.to_string())),
        Event::InlineHtml(h) => Some(Inline::Html(h.to_string())),
        Event::SoftBreak => Some(Inline::SoftBreak),
        Event::HardBreak => Some(Inline::HardBreak),
        Event::Start(Tag::Emphasis) => {
            Some(Inline::Emphasis(parse_inlines(events, TagEnd::Emphasis)))
        }
        Event::Start(Tag::Strong) => Some(Inline::Strong(parse_inlines(events, TagEnd::Strong))),
        Event::Start(Tag::Strikethrough) => Some(Inline::Strikethrough(parse_inlines(
            events,
            TagEnd::Strikethrough,
        ))),
        Event::Start(Tag::Link {
            dest_url, title, ..
        }) => Some(Inline::Link {
            href: dest_url.to_string(),
            title: title.to_string(),
            children: parse_inlines(events, TagEnd::Link),
        }),
        Event::Start(Tag::Image {
            dest_url, title, ..
        }) => {
            let alt = plain_text(&parse_inlines(events, TagEnd::Image));
            let mut spec = ImageSpec::new(dest_url.to_string(), alt);
            if !title.is_empty() {
                spec.title = Some(title.to_string());
            }
            Some(Inline::Image(spec))
        }
        Event::FootnoteReference(name) => Some(Inline::Text(format!("[{}]", name))),
        _ => None,
    }
}

/// Concatenate raw text until the given end tag
fn collect_text(events: &mut Events, end: TagEnd) -> String {
    let mut text = String::new();
    for event in events.by_ref() {
        match event {
            Event::End(tag) if tag == end => break,
            Event::Text(t) | Event::Html(t) => text.push_str(&t),
            _ => {}
        }
    }
    text
}

fn parse_table(events: &mut Events) -> Block {
    let mut header = Vec::new();
    let mut rows = Vec::new();
    let mut current: Vec<Vec<Inline>> = Vec::new();

    while let Some(event) = events.next() {
        match event {
            Event::Start(Tag::TableCell) => {
                current.push(parse_inlines(events, TagEnd::TableCell));
            }
            Event::End(TagEnd::TableHead) => header = std::mem::take(&mut current),
            Event::End(TagEnd::TableRow) => rows.push(std::mem::take(&mut current)),
            Event::End(TagEnd::Table) => break,
            _ => {}
        }
    }

    Block::Table { header, rows }
}
