//! Project body rendering
//!
//! A body is split into markdown runs and MDX components, the markdown is
//! parsed into blocks, and every block or component becomes a node of the
//! render tree. The tree is serialized to HTML for the project pages.

pub mod blocks;
pub mod code;
pub mod heading;
pub mod image;
pub mod mdx;
pub mod node;
pub mod table;

pub use blocks::{Block, Inline};
pub use code::CodeHighlighter;
pub use heading::heading_slug;
pub use image::{render_image, ImageSpec, ResponsiveWidths};
pub use mdx::{Component, PropValue, Props, Segment};
pub use node::{Element, Node};
pub use table::{Align, RowCells, TableLayout, TableMode, TechRow, TechTable};

use std::cell::Cell;

use crate::config::{RenderConfig, ThemeMode};
use table::TablePalette;

/// Fence info string for YAML tech tables
const TECHTABLE_FENCE: &str = "techtable";

/// Per-render settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderContext {
    pub theme: ThemeMode,
    /// Viewport is at or above the wide breakpoint
    pub wide_viewport: bool,
    /// Render every image full-bleed
    pub full_bleed_images: bool,
    pub center_widen_factor: f64,
}

impl RenderContext {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            theme: config.theme,
            wide_viewport: false,
            full_bleed_images: false,
            center_widen_factor: config.center_widen_factor,
        }
    }

    /// Set the wide flag from a client-reported viewport width
    pub fn with_viewport(mut self, config: &RenderConfig, width_px: Option<u32>) -> Self {
        self.wide_viewport = width_px
            .map(|w| w >= config.wide_viewport_px)
            .unwrap_or(false);
        self
    }

    pub fn with_full_bleed_images(mut self, full_bleed: bool) -> Self {
        self.full_bleed_images = full_bleed;
        self
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(&RenderConfig::default())
    }
}

/// Renders project bodies to HTML
pub struct Renderer {
    highlighter: CodeHighlighter,
}

impl Renderer {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            highlighter: CodeHighlighter::new(&config.code_theme),
        }
    }

    /// Render a body into sibling nodes
    pub fn render_body(&self, body: &str, ctx: &RenderContext) -> Vec<Node> {
        let writer = BodyWriter {
            highlighter: &self.highlighter,
            ctx,
            images: Cell::new(0),
        };
        let mut nodes = Vec::new();
        for segment in mdx::split_body(body) {
            match segment {
                Segment::Markdown(markdown) => {
                    nodes.extend(writer.blocks(&blocks::parse(&markdown)))
                }
                Segment::Component(component) => nodes.extend(writer.component(&component)),
            }
        }
        nodes
    }

    /// Render a body to an HTML fragment
    pub fn render_html(&self, body: &str, ctx: &RenderContext) -> String {
        let root: Node = Element::new("div")
            .attr("class", "mdx-body")
            .style("text-align", "left")
            .children(self.render_body(body, ctx))
            .into();
        root.to_html()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(&RenderConfig::default())
    }
}

/// State for one body render
struct BodyWriter<'a> {
    highlighter: &'a CodeHighlighter,
    ctx: &'a RenderContext,
    /// Counter for scoped image class names, shared with table cells
    images: Cell<usize>,
}

impl BodyWriter<'_> {
    fn component(&self, component: &Component) -> Option<Node> {
        match component.name.as_str() {
            "TechTable" => self.tech_table(&TechTable::from_component(component)),
            "Image" | "img" => self.image(&ImageSpec::from_props(&component.props)),
            other => {
                tracing::debug!("Unknown component <{}> skipped", other);
                None
            }
        }
    }

    fn blocks(&self, blocks: &[Block]) -> Vec<Node> {
        blocks.iter().filter_map(|b| self.block(b)).collect()
    }

    fn block(&self, block: &Block) -> Option<Node> {
        match block {
            Block::Paragraph(content) => Some(
                Element::new("p")
                    .style("line-height", "175%")
                    .style("margin-top", "8px")
                    .style("margin-bottom", "12px")
                    .children(self.inlines(content))
                    .into(),
            ),
            Block::Heading { level, content } => Some(heading::render_heading(
                *level,
                &blocks::plain_text(content),
                self.inlines(content),
            )),
            Block::Image(spec) => self.image(spec),
            Block::List { start, items } => Some(self.list(*start, items)),
            Block::Code { lang, code } => self.code(lang.as_deref(), code),
            Block::Table { header, rows } => self.markdown_table(header, rows),
            Block::Quote(inner) => Some(
                Element::new("blockquote")
                    .style("margin", "16px 0")
                    .style("padding-left", "16px")
                    .style("border-left", "3px solid currentColor")
                    .style("opacity", "0.85")
                    .children(self.blocks(inner))
                    .into(),
            ),
            Block::Rule => Some(
                Element::new("hr")
                    .style("margin", "24px 0")
                    .style("border", "0")
                    .style("border-top", "1px solid currentColor")
                    .style("opacity", "0.2")
                    .into(),
            ),
            Block::Html(html) => Some(Node::Raw(html.clone())),
        }
    }

    fn list(&self, start: Option<u64>, items: &[Vec<Block>]) -> Node {
        let mut list = match start {
            Some(n) => {
                let ol = Element::new("ol");
                if n != 1 {
                    ol.attr("start", n.to_string())
                } else {
                    ol
                }
            }
            None => Element::new("ul"),
        };
        list = list
            .style("margin", "8px 0")
            .style("padding-left", "24px");

        for item in items {
            // Single-paragraph items render inline
            let children = match item.as_slice() {
                [Block::Paragraph(content)] => self.inlines(content),
                _ => self.blocks(item),
            };
            list = list.child(
                Element::new("li")
                    .style("line-height", "175%")
                    .style("margin-bottom", "4px")
                    .children(children),
            );
        }
        list.into()
    }

    fn code(&self, lang: Option<&str>, code: &str) -> Option<Node> {
        if lang == Some(TECHTABLE_FENCE) {
            match TechTable::from_yaml(code) {
                Ok(table) => return self.tech_table(&table),
                Err(e) => tracing::warn!("Invalid techtable block: {}", e),
            }
        }
        Some(self.highlighter.render(code, lang))
    }

    fn image(&self, spec: &ImageSpec) -> Option<Node> {
        let index = self.images.get();
        let class_name = format!("mdx-img-{}", index);
        let node = image::render_image(spec, self.ctx.full_bleed_images, &class_name, self.ctx.theme)?;
        self.images.set(index + 1);
        Some(node)
    }

    fn tech_table(&self, table: &TechTable) -> Option<Node> {
        if table.rows.is_empty() {
            tracing::debug!("Skipping tech table without rows");
            return None;
        }
        let layout = table::layout(table, self.ctx.wide_viewport, self.ctx.center_widen_factor);
        let palette = TablePalette::for_theme(self.ctx.theme);
        Some(table::render_table(
            &layout,
            table.hide_header,
            &palette,
            &|text: &str| self.cell_content(text),
        ))
    }

    /// Table cells hold inline markdown
    fn cell_content(&self, text: &str) -> Vec<Node> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        let parsed = blocks::parse(text);
        match parsed.as_slice() {
            [Block::Paragraph(content)] => self.inlines(content),
            _ => self.blocks(&parsed),
        }
    }

    fn markdown_table(&self, header: &[Vec<Inline>], rows: &[Vec<Vec<Inline>>]) -> Option<Node> {
        if header.is_empty() {
            tracing::debug!("Skipping table without header row");
            return None;
        }

        let th = header.iter().map(|cell| {
            Node::from(
                Element::new("th")
                    .style("padding", "8px 12px")
                    .style("text-align", "left")
                    .style("font-weight", "600")
                    .children(self.inlines(cell)),
            )
        });
        let body = rows.iter().map(|row| {
            let tds = row.iter().map(|cell| {
                Node::from(
                    Element::new("td")
                        .style("padding", "8px 12px")
                        .children(self.inlines(cell)),
                )
            });
            Node::from(Element::new("tr").children(tds))
        });

        Some(
            Element::new("div")
                .attr("class", "md-table")
                .style("overflow-x", "auto")
                .style("margin", "16px auto")
                .style("text-align", "center")
                .child(
                    Element::new("table")
                        .style("border-collapse", "collapse")
                        .style("margin", "0 auto")
                        .child(Element::new("thead").child(Element::new("tr").children(th)))
                        .child(Element::new("tbody").children(body)),
                )
                .into(),
        )
    }

    fn inlines(&self, inlines: &[Inline]) -> Vec<Node> {
        inlines.iter().filter_map(|i| self.inline(i)).collect()
    }

    fn inline(&self, inline: &Inline) -> Option<Node> {
        let node = match inline {
            Inline::Text(t) => Node::Text(t.clone()),
            Inline::Code(c) => Element::new("code").text(c.as_str()).into(),
            Inline::Emphasis(c) => Element::new("em").children(self.inlines(c)).into(),
            Inline::Strong(c) => Element::new("strong").children(self.inlines(c)).into(),
            Inline::Strikethrough(c) => Element::new("del").children(self.inlines(c)).into(),
            Inline::Link {
                href,
                title,
                children,
            } => {
                let mut link = link_element(href);
                if !title.is_empty() {
                    link = link.attr("title", title.as_str());
                }
                link.children(self.inlines(children)).into()
            }
            Inline::Image(spec) => {
                if spec.src.trim().is_empty() {
                    return None;
                }
                Element::new("img")
                    .attr("src", spec.src.as_str())
                    .attr("alt", spec.alt.as_str())
                    .style("display", "inline")
                    .style("max-width", "100%")
                    .into()
            }
            Inline::Html(h) => Node::Raw(h.clone()),
            Inline::SoftBreak => Node::Text("\n".to_string()),
            Inline::HardBreak => Element::new("br").into(),
        };
        Some(node)
    }
}

/// Internal and hash links stay in the page; anything else opens a new tab
fn link_element(href: &str) -> Element {
    let link = Element::new("a").attr("href", href);
    if href.starts_with('/') || href.starts_with('#') {
        link
    } else {
        link.attr("target", "_blank")
            .attr("rel", "noopener noreferrer")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(body: &str) -> String {
        Renderer::default().render_html(body, &RenderContext::default())
    }

    #[test]
    fn test_heading_anchor() {
        let html = render("## Models & Metrics\n");
        assert!(html.contains(r#"<h2 id="models-and-metrics""#));
        assert!(html.contains(r##"href="#models-and-metrics""##));
    }

    #[test]
    fn test_link_rules() {
        let html = render("[a](/work/x) [b](#top) [c](https://example.com)\n");
        assert!(html.contains(r#"<a href="/work/x">a</a>"#));
        assert!(html.contains(r##"<a href="#top">b</a>"##));
        assert!(html.contains(
            r#"<a href="https://example.com" target="_blank" rel="noopener noreferrer">c</a>"#
        ));
    }

    #[test]
    fn test_images_get_distinct_classes() {
        let html = render("![one](/1.png)\n\n<Image src=\"/2.png\" size=\"70%\" />\n\n<Image alt=\"no src\" />\n");
        assert!(html.contains(r#"class="mdx-img-0""#));
        assert!(html.contains(r#"class="mdx-img-1""#));
        assert!(!html.contains("mdx-img-2"));
        assert!(html.contains("width: 70%"));
        assert!(!html.contains("no src"));
    }

    #[test]
    fn test_cell_images_continue_body_numbering() {
        let body = "![body](/body.png)\n\n<TechTable>\n  <TechRow label=\"a\">![cell](/cell.png)</TechRow>\n</TechTable>\n";
        let html = render(body);
        assert_eq!(html.matches(r#"class="mdx-img-0""#).count(), 1);
        assert_eq!(html.matches(r#"class="mdx-img-1""#).count(), 1);
        assert!(html.contains("/cell.png"));
    }

    #[test]
    fn test_full_bleed_context() {
        let renderer = Renderer::default();
        let ctx = RenderContext::default().with_full_bleed_images(true);
        let html = renderer.render_html("<Image src=\"/w.png\" size=\"80\" />\n", &ctx);
        assert!(html.contains("width:100vw"));
        assert!(html.contains("width: 80vw"));
    }

    #[test]
    fn test_tech_table_component() {
        let body = r#"<TechTable>
  <TechRow label="DDPM" dataset="CIFAR-10" fid="3.17" />
  <TechRow label="GAN" dataset="CIFAR-10" fid="8.7">Prone to **mode collapse**</TechRow>
</TechTable>
"#;
        let html = render(body);
        assert!(html.contains("tech-table"));
        assert!(html.contains(">FID ↓<"));
        assert!(html.contains(">Details<"));
        assert!(html.contains("<strong>mode collapse</strong>"));
    }

    #[test]
    fn test_techtable_fence() {
        let body = "```techtable\ncolumns: [Model, Accuracy, Speed]\nrows:\n  - label: A\n    values: [\"92%\", \"10ms\"]\n```\n";
        let html = render(body);
        assert!(html.contains("<colgroup>"));
        assert!(html.contains(">92%<"));
        assert!(!html.contains("code-label"));
    }

    #[test]
    fn test_empty_tech_table_renders_nothing() {
        let nodes = Renderer::default().render_body("<TechTable columns={[\"A\"]}></TechTable>\n", &RenderContext::default());
        assert!(nodes.is_empty());
    }

    #[test]
    fn test_wide_viewport_widens_center_columns() {
        let config = RenderConfig::default();
        let body = r#"<TechTable columns={["A","B","C","D","E"]}>
  <TechRow label="x" values={["1","2","3","4"]} />
</TechTable>
"#;
        let renderer = Renderer::new(&config);
        let narrow = renderer.render_html(body, &RenderContext::new(&config).with_viewport(&config, Some(800)));
        let wide = renderer.render_html(body, &RenderContext::new(&config).with_viewport(&config, Some(1400)));
        assert!(narrow.contains("width:20.00%"));
        assert!(!wide.contains("width:20.00%"));
    }

    #[test]
    fn test_code_block_label() {
        let html = render("```python\nprint(1)\n```\n");
        assert!(html.contains(">Python<"));
    }

    #[test]
    fn test_gfm_table_and_list() {
        let html = render("| A | B |\n|---|---|\n| 1 | 2 |\n\n- one\n- two\n\n3. three\n");
        assert!(html.contains("md-table"));
        assert!(html.contains("<th"));
        assert!(html.contains("<ul"));
        assert!(html.contains(r#"<ol start="3""#));
    }
}
