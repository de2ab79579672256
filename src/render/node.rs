//! Render tree and HTML serialization

/// Elements that never have children or a closing tag
const VOID_ELEMENTS: &[&str] = &["br", "col", "hr", "img", "input", "meta", "link"];

/// A node of the render tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    /// Pre-rendered markup emitted as-is (highlighted code, scoped CSS)
    Raw(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub style: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            style: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.push((property.into(), value.into()));
        self
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(nodes);
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_style(&self, property: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| v.as_str())
    }

    /// Direct element children with the given tag
    pub fn find_children<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter_map(move |n| match n {
            Node::Element(e) if e.tag == tag => Some(e),
            _ => None,
        })
    }

    /// Depth-first search for the first element with the given tag
    pub fn find(&self, tag: &str) -> Option<&Element> {
        if self.tag == tag {
            return Some(self);
        }
        self.children.iter().find_map(|n| match n {
            Node::Element(e) => e.find(tag),
            _ => None,
        })
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_html(value));
            out.push('"');
        }
        if !self.style.is_empty() {
            let style = self
                .style
                .iter()
                .map(|(k, v)| format!("{}:{}", k, v))
                .collect::<Vec<_>>()
                .join(";");
            out.push_str(" style=\"");
            out.push_str(&escape_html(&style));
            out.push('"');
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&self.tag.as_str()) {
            return;
        }

        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

impl Node {
    /// Concatenated text content of this subtree
    pub fn text_content(&self) -> String {
        match self {
            Node::Text(t) => t.clone(),
            Node::Raw(_) => String::new(),
            Node::Element(e) => e.children.iter().map(Node::text_content).collect(),
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(&escape_html(t)),
            Node::Raw(r) => out.push_str(r),
            Node::Element(e) => e.write_html(out),
        }
    }
}

impl From<Element> for Node {
    fn from(e: Element) -> Self {
        Node::Element(e)
    }
}

/// Serialize a list of sibling nodes
pub fn to_html(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        node.write_html(&mut out);
    }
    out
}

/// Simple HTML escaping
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_html() {
        let node: Node = Element::new("p")
            .attr("id", "a\"b")
            .style("line-height", "175%")
            .style("margin-top", "8px")
            .text("1 < 2")
            .into();
        assert_eq!(
            node.to_html(),
            r#"<p id="a&quot;b" style="line-height:175%;margin-top:8px">1 &lt; 2</p>"#
        );
    }

    #[test]
    fn test_void_and_raw() {
        let node: Node = Element::new("div")
            .child(Element::new("img").attr("src", "/a.png"))
            .child(Node::Raw("<b>x</b>".to_string()))
            .into();
        assert_eq!(node.to_html(), r#"<div><img src="/a.png"><b>x</b></div>"#);

        let cols: Node = Element::new("colgroup")
            .child(Element::new("col").style("width", "50.00%"))
            .into();
        assert_eq!(cols.to_html(), r#"<colgroup><col style="width:50.00%"></colgroup>"#);
    }

    #[test]
    fn test_text_content_and_find() {
        let el = Element::new("table").child(
            Element::new("tr")
                .child(Element::new("td").text("a"))
                .child(Element::new("td").text("b")),
        );
        assert_eq!(Node::Element(el.clone()).text_content(), "ab");
        assert_eq!(el.find("tr").unwrap().find_children("td").count(), 2);
    }
}
