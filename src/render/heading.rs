//! Heading anchors

use lazy_static::lazy_static;
use regex::Regex;

use super::node::{Element, Node};

lazy_static! {
    static ref REPEATED_HYPHENS: Regex = Regex::new(r"-{2,}").unwrap();
}

/// Anchor id for a heading's text.
///
/// `&` reads as "and"; the rest is transliterated to lowercase ASCII words
/// joined by single hyphens. Identical headings get identical ids.
pub fn heading_slug(text: &str) -> String {
    let with_and = text.replace('&', " and ");
    let slug = slug::slugify(with_and);
    REPEATED_HYPHENS.replace_all(&slug, "-").into_owned()
}

/// `<hN id=slug>` with a trailing self-link
pub fn render_heading(level: u8, text: &str, children: Vec<Node>) -> Node {
    let level = level.clamp(1, 6);
    let id = heading_slug(text);
    let mut heading = Element::new(format!("h{}", level))
        .attr("class", "heading-link")
        .style("margin-top", "24px")
        .style("margin-bottom", "12px")
        .children(children);

    if !id.is_empty() {
        heading = heading.child(
            Element::new("a")
                .attr("class", "heading-anchor")
                .attr("href", format!("#{}", id))
                .attr("aria-label", format!("Link to {}", text.trim()))
                .text("#"),
        );
        heading.attrs.insert(0, ("id".to_string(), id));
    }
    heading.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ampersand_becomes_and() {
        assert_eq!(heading_slug("Models & Metrics"), "models-and-metrics");
        assert_eq!(heading_slug("R&D"), "r-and-d");
    }

    #[test]
    fn test_punctuation_and_unicode() {
        assert_eq!(heading_slug("  Results -- FID / IS  "), "results-fid-is");
        assert_eq!(heading_slug("Café Überblick"), "cafe-uberblick");
        assert_eq!(heading_slug("???"), "");
    }

    #[test]
    fn test_duplicates_are_not_disambiguated() {
        assert_eq!(heading_slug("Results"), heading_slug("Results"));
    }

    #[test]
    fn test_render_heading() {
        let node = render_heading(2, "Models & Metrics", vec![Node::Text("Models & Metrics".into())]);
        let el = node.as_element().unwrap();
        assert_eq!(el.tag, "h2");
        assert_eq!(el.get_attr("id"), Some("models-and-metrics"));
        assert_eq!(
            el.find("a").unwrap().get_attr("href"),
            Some("#models-and-metrics")
        );
    }
}
