//! MDX component extraction
//!
//! Project bodies are markdown with a handful of JSX components mixed in
//! (`<TechTable>`, `<TechRow>`, `<Image>`). Components are lifted out of the
//! text before markdown parsing so that blank lines inside a component do
//! not break it apart. Fenced code blocks are left untouched.

use indexmap::IndexMap;

/// Component names recognized at the start of a line
const BLOCK_COMPONENTS: &[&str] = &["TechTable", "Image", "img"];

/// A JSX attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Text(String),
    List(Vec<String>),
    Flag(bool),
}

impl PropValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Display form used for table cells and passthrough attributes
    pub fn to_display(&self) -> String {
        match self {
            PropValue::Text(s) => s.clone(),
            PropValue::List(items) => items.join(", "),
            PropValue::Flag(b) => b.to_string(),
        }
    }

    pub fn to_list(&self) -> Vec<String> {
        match self {
            PropValue::List(items) => items.clone(),
            PropValue::Text(s) if s.is_empty() => Vec::new(),
            PropValue::Text(s) => vec![s.clone()],
            PropValue::Flag(_) => Vec::new(),
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            PropValue::Flag(b) => *b,
            PropValue::Text(s) => !s.is_empty() && s != "false",
            PropValue::List(_) => true,
        }
    }

    pub fn from_json(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::String(s) => PropValue::Text(s),
            Value::Bool(b) => PropValue::Flag(b),
            Value::Null => PropValue::Text(String::new()),
            Value::Number(n) => PropValue::Text(n.to_string()),
            Value::Array(items) => PropValue::List(
                items
                    .into_iter()
                    .map(|v| match v {
                        Value::String(s) => s,
                        other => other.to_string(),
                    })
                    .collect(),
            ),
            other => PropValue::Text(other.to_string()),
        }
    }

    pub fn from_yaml(value: &serde_yaml::Value) -> Self {
        use serde_yaml::Value;
        match value {
            Value::Bool(b) => PropValue::Flag(*b),
            Value::Sequence(items) => {
                PropValue::List(items.iter().map(yaml_scalar_to_string).collect())
            }
            other => PropValue::Text(yaml_scalar_to_string(other)),
        }
    }
}

fn yaml_scalar_to_string(value: &serde_yaml::Value) -> String {
    use serde_yaml::Value;
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

pub type Props = IndexMap<String, PropValue>;

/// A parsed JSX element
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Component {
    pub name: String,
    pub props: Props,
    /// Nested components (capitalized tags only)
    pub children: Vec<Component>,
    /// Remaining inner text, trimmed; None when empty
    pub text: Option<String>,
}

/// A piece of a document body
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Markdown(String),
    Component(Component),
}

/// Split a body into markdown runs and block-level components
pub fn split_body(body: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut markdown = String::new();
    let mut fence: Option<&str> = None;
    let mut pos = 0;

    while pos < body.len() {
        let line_end = body[pos..].find('\n').map(|i| pos + i + 1).unwrap_or(body.len());
        let line = &body[pos..line_end];
        let trimmed = line.trim_start();

        if let Some(marker) = fence {
            if trimmed.starts_with(marker) {
                fence = None;
            }
            markdown.push_str(line);
            pos = line_end;
            continue;
        }

        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            fence = Some(&trimmed[..3]);
            markdown.push_str(line);
            pos = line_end;
            continue;
        }

        if starts_block_component(trimmed) {
            let start = pos + (line.len() - trimmed.len());
            if let Some((component, consumed)) = parse_component(&body[start..]) {
                if !markdown.is_empty() {
                    segments.push(Segment::Markdown(std::mem::take(&mut markdown)));
                }
                segments.push(Segment::Component(component));

                // Skip trailing whitespace on the closing line
                let mut next = start + consumed;
                let tail_end = body[next..].find('\n').map(|i| next + i + 1).unwrap_or(body.len());
                if body[next..tail_end].trim().is_empty() {
                    next = tail_end;
                }
                pos = next;
                continue;
            }
            tracing::debug!("Unterminated component tag, treating as markdown: {}", trimmed.trim_end());
        }

        markdown.push_str(line);
        pos = line_end;
    }

    if !markdown.is_empty() {
        segments.push(Segment::Markdown(markdown));
    }
    segments
}

fn starts_block_component(line: &str) -> bool {
    let Some(rest) = line.strip_prefix('<') else {
        return false;
    };
    BLOCK_COMPONENTS.iter().any(|name| {
        rest.strip_prefix(name)
            .and_then(|after| after.chars().next())
            .map(|c| c.is_whitespace() || c == '/' || c == '>')
            .unwrap_or(false)
    })
}

/// Parse one element starting at `<`. Returns the element and the number of
/// bytes consumed.
pub fn parse_component(s: &str) -> Option<(Component, usize)> {
    let rest = s.strip_prefix('<')?;
    let name_len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '.'))
        .unwrap_or(rest.len());
    if name_len == 0 {
        return None;
    }
    let name = &rest[..name_len];
    let attrs_start = 1 + name_len;
    let (props, attrs_len, self_closing) = parse_attributes(&s[attrs_start..])?;
    let open_end = attrs_start + attrs_len;

    let mut component = Component {
        name: name.to_string(),
        props,
        ..Default::default()
    };

    if self_closing || name == "img" {
        return Some((component, open_end));
    }

    let (inner_len, close_len) = find_closing_tag(&s[open_end..], name)?;
    let inner = &s[open_end..open_end + inner_len];
    let (children, text) = parse_children(inner);
    component.children = children;
    component.text = text;

    Some((component, open_end + inner_len + close_len))
}

/// Locate `</name>` honoring nested elements of the same name.
/// Returns (inner length, closing tag length).
fn find_closing_tag(s: &str, name: &str) -> Option<(usize, usize)> {
    let open = format!("<{}", name);
    let close = format!("</{}>", name);
    let mut depth = 0usize;
    let mut i = 0;

    while i < s.len() {
        let rest = &s[i..];
        if rest.starts_with(&close) {
            if depth == 0 {
                return Some((i, close.len()));
            }
            depth -= 1;
            i += close.len();
        } else if rest.starts_with(&open)
            && rest[open.len()..]
                .chars()
                .next()
                .map(|c| c.is_whitespace() || c == '>' || c == '/')
                .unwrap_or(false)
        {
            // Self-closing nested tags don't change depth
            let (_, len, self_closing) = parse_attributes(&rest[open.len()..])?;
            if !self_closing {
                depth += 1;
            }
            i += open.len() + len;
        } else {
            i += rest.chars().next().map(char::len_utf8).unwrap_or(1);
        }
    }
    None
}

/// Split inner content into capitalized child components and leftover text
fn parse_children(inner: &str) -> (Vec<Component>, Option<String>) {
    let mut children = Vec::new();
    let mut text = String::new();
    let mut i = 0;

    while i < inner.len() {
        let rest = &inner[i..];
        let is_component = rest.starts_with('<')
            && rest[1..]
                .chars()
                .next()
                .map(|c| c.is_ascii_uppercase())
                .unwrap_or(false);

        if is_component {
            if let Some((child, consumed)) = parse_component(rest) {
                children.push(child);
                i += consumed;
                continue;
            }
        }

        let ch_len = rest.chars().next().map(char::len_utf8).unwrap_or(1);
        text.push_str(&rest[..ch_len]);
        i += ch_len;
    }

    let text = text.trim();
    let text = if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    };
    (children, text)
}

/// Parse JSX attributes up to and including the closing `>` or `/>`.
/// Returns (props, bytes consumed, self-closing).
pub fn parse_attributes(s: &str) -> Option<(Props, usize, bool)> {
    let bytes = s.as_bytes();
    let mut props = Props::new();
    let mut i = 0;

    loop {
        i = skip_whitespace(bytes, i);
        match bytes.get(i)? {
            b'>' => return Some((props, i + 1, false)),
            b'/' if bytes.get(i + 1) == Some(&b'>') => return Some((props, i + 2, true)),
            _ => {}
        }

        let start = i;
        while i < bytes.len() && is_name_byte(bytes[i]) {
            i += 1;
        }
        if i == start {
            return None;
        }
        let name = s[start..i].to_string();

        let j = skip_whitespace(bytes, i);
        if bytes.get(j) == Some(&b'=') {
            let value_start = skip_whitespace(bytes, j + 1);
            let (value, next) = parse_value(s, value_start)?;
            props.insert(name, value);
            i = next;
        } else {
            props.insert(name, PropValue::Flag(true));
        }
    }
}

fn parse_value(s: &str, start: usize) -> Option<(PropValue, usize)> {
    let bytes = s.as_bytes();
    match *bytes.get(start)? {
        quote @ (b'"' | b'\'') => {
            let end = s[start + 1..].find(quote as char)?;
            let value = s[start + 1..start + 1 + end].to_string();
            Some((PropValue::Text(value), start + end + 2))
        }
        b'{' => {
            let end = matching_brace(s, start)?;
            let expr = &s[start + 1..end];
            Some((parse_expression(expr), end + 1))
        }
        _ => {
            let mut end = start;
            while end < bytes.len()
                && !bytes[end].is_ascii_whitespace()
                && bytes[end] != b'>'
                && !(bytes[end] == b'/' && bytes.get(end + 1) == Some(&b'>'))
            {
                end += 1;
            }
            Some((PropValue::Text(s[start..end].to_string()), end))
        }
    }
}

/// Index of the `}` closing the `{` at `start`, skipping string literals
fn matching_brace(s: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string: Option<char> = None;
    let mut escaped = false;

    for (offset, c) in s[start..].char_indices() {
        if let Some(q) = in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                in_string = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => in_string = Some(c),
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Evaluate the literal subset of JS expressions used in attribute braces
fn parse_expression(expr: &str) -> PropValue {
    let expr = expr.trim();
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(expr) {
        return PropValue::from_json(value);
    }
    if expr.contains('\'') {
        let normalized = expr.replace('\'', "\"");
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&normalized) {
            return PropValue::from_json(value);
        }
    }
    PropValue::Text(expr.to_string())
}

fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':' | b'.')
}
