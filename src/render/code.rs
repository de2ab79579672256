//! Code blocks with syntax highlighting

use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use super::node::{escape_html, Element, Node};

/// Syntax highlighter for fenced code blocks
pub struct CodeHighlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
}

impl CodeHighlighter {
    pub fn new(theme: &str) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
        }
    }

    /// Highlighted `<pre>` markup, or escaped plain text when the theme is
    /// unknown or highlighting fails
    pub fn highlight(&self, code: &str, lang: Option<&str>) -> String {
        let token = lang.unwrap_or("text");
        let class = format!("language-{}", escape_html(token));

        let syntax = self
            .syntax_set
            .find_syntax_by_token(token)
            .or_else(|| self.syntax_set.find_syntax_by_extension(token))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next());

        let Some(theme) = theme else {
            return plain_block(code, &class);
        };

        match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
            // syntect emits its own <pre style=...>
            Ok(highlighted) => format!(r#"<div class="{}">{}</div>"#, class, highlighted),
            Err(e) => {
                tracing::debug!("Highlighting {} failed: {}", token, e);
                plain_block(code, &class)
            }
        }
    }

    /// Labelled, highlighted code block. Without a language the block is a
    /// bare `<pre><code>`.
    pub fn render(&self, code: &str, lang: Option<&str>) -> Node {
        let Some(lang) = lang.filter(|l| !l.is_empty()) else {
            return Element::new("pre")
                .style("overflow-x", "auto")
                .child(Element::new("code").text(code))
                .into();
        };

        Element::new("div")
            .attr("class", "code-block")
            .style("margin", "16px 0")
            .style("border-radius", "8px")
            .style("overflow", "hidden")
            .child(
                Element::new("div")
                    .attr("class", "code-label")
                    .style("font-size", "0.75rem")
                    .style("padding", "4px 12px")
                    .style("opacity", "0.7")
                    .text(language_label(lang)),
            )
            .child(Node::Raw(self.highlight(code, Some(lang))))
            .into()
    }
}

impl Default for CodeHighlighter {
    fn default() -> Self {
        Self::new("base16-ocean.dark")
    }
}

fn plain_block(code: &str, class: &str) -> String {
    format!(
        r#"<pre><code class="{}">{}</code></pre>"#,
        class,
        escape_html(code)
    )
}

/// `python` -> `Python`
pub fn language_label(lang: &str) -> String {
    let mut chars = lang.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
