//! Responsive image figures

use super::mdx::Props;
use super::node::{Element, Node};
use crate::config::ThemeMode;

/// Attributes allowed through to the `<img>` element, keyed by their JSX
/// spelling with the HTML name they are emitted under
const PASSTHROUGH_ATTRS: &[(&str, &str)] = &[
    ("loading", "loading"),
    ("decoding", "decoding"),
    ("width", "width"),
    ("height", "height"),
    ("sizes", "sizes"),
    ("srcSet", "srcset"),
    ("srcset", "srcset"),
    ("className", "class"),
    ("class", "class"),
    ("id", "id"),
    ("role", "role"),
    ("aria-label", "aria-label"),
    ("aria-hidden", "aria-hidden"),
    ("aria-describedby", "aria-describedby"),
];

/// An image reference with its sizing hints
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageSpec {
    pub src: String,
    pub alt: String,
    /// Explicit caption
    pub title: Option<String>,
    /// Base width for every breakpoint
    pub size: Option<String>,
    pub size_mobile: Option<String>,
    pub size_tablet: Option<String>,
    pub size_desktop: Option<String>,
    /// Escape the content column and size against the viewport
    pub full_page: bool,
    /// Sanitized attributes forwarded to `<img>`
    pub attrs: Vec<(String, String)>,
}

/// Resolved widths per breakpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponsiveWidths {
    pub mobile: String,
    pub tablet: String,
    pub desktop: String,
}

impl ResponsiveWidths {
    /// Reinterpret percentages as viewport-width units
    pub fn to_viewport_units(&self) -> Self {
        let vw = |w: &str| match w.strip_suffix('%') {
            Some(n) => format!("{}vw", n),
            None => w.to_string(),
        };
        Self {
            mobile: vw(&self.mobile),
            tablet: vw(&self.tablet),
            desktop: vw(&self.desktop),
        }
    }
}

impl ImageSpec {
    pub fn new(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: alt.into(),
            ..Default::default()
        }
    }

    /// Build from `<Image .../>` props, dropping anything not on the allow-list
    pub fn from_props(props: &Props) -> Self {
        let text = |key: &str| {
            props
                .get(key)
                .map(|v| v.to_display())
                .filter(|s| !s.is_empty())
        };

        let mut spec = Self {
            src: text("src").unwrap_or_default(),
            alt: text("alt").unwrap_or_default(),
            title: text("title").or_else(|| text("caption")),
            size: text("size").or_else(|| text("widthPercent")),
            size_mobile: text("sizeMobile"),
            size_tablet: text("sizeTablet"),
            size_desktop: text("sizeDesktop"),
            full_page: props.get("fullPage").map(|v| v.is_truthy()).unwrap_or(false),
            attrs: Vec::new(),
        };

        for (key, value) in props {
            if let Some((_, html_name)) = PASSTHROUGH_ATTRS.iter().find(|(jsx, _)| jsx == key) {
                spec.attrs.push((html_name.to_string(), value.to_display()));
            }
        }
        spec
    }

    /// Caption: explicit title, else alt text
    pub fn caption(&self) -> Option<&str> {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .or_else(|| Some(self.alt.as_str()).filter(|a| !a.is_empty()))
    }

    /// Breakpoint widths: explicit > base > next smaller breakpoint > 100%
    pub fn widths(&self) -> ResponsiveWidths {
        let base = self.size.as_deref().and_then(to_percent);
        let mobile = self
            .size_mobile
            .as_deref()
            .and_then(to_percent)
            .or_else(|| base.clone())
            .unwrap_or_else(|| "100%".to_string());
        let tablet = self
            .size_tablet
            .as_deref()
            .and_then(to_percent)
            .or_else(|| base.clone())
            .unwrap_or_else(|| mobile.clone());
        let desktop = self
            .size_desktop
            .as_deref()
            .and_then(to_percent)
            .or(base)
            .unwrap_or_else(|| tablet.clone());
        ResponsiveWidths {
            mobile,
            tablet,
            desktop,
        }
    }
}

/// Normalize `"70%"`, `"70"` or `"70.5"` to a percent string
pub fn to_percent(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if value.ends_with('%') {
        return Some(value.to_string());
    }
    value.parse::<f64>().ok().map(|n| format!("{}%", n))
}

/// Render an image as a centered figure. Returns None when there is no source.
pub fn render_image(
    spec: &ImageSpec,
    full_bleed: bool,
    class_name: &str,
    theme: ThemeMode,
) -> Option<Node> {
    if spec.src.trim().is_empty() {
        tracing::debug!("Skipping image without src (alt: {:?})", spec.alt);
        return None;
    }

    let full_bleed = full_bleed || spec.full_page;
    let widths = if full_bleed {
        spec.widths().to_viewport_units()
    } else {
        spec.widths()
    };

    let css = format!(
        ".{cls} {{ margin: 1rem 0; text-align: center; }}\n\
         .{cls} .mdx-img-inner {{ width: {m}; max-width: 100vw; margin-left: auto; margin-right: auto; display: block; }}\n\
         .{cls} img {{ width: 100%; height: auto; display: block; margin-left: auto; margin-right: auto; }}\n\
         @media (min-width: 640px) {{ .{cls} .mdx-img-inner {{ width: {t}; }} }}\n\
         @media (min-width: 1024px) {{ .{cls} .mdx-img-inner {{ width: {d}; }} }}",
        cls = class_name,
        m = widths.mobile,
        t = widths.tablet,
        d = widths.desktop,
    );

    let figure = Element::new("figure").attr("class", class_name);
    let figure = if full_bleed {
        figure
            .style("position", "relative")
            .style("left", "50%")
            .style("transform", "translateX(-50%)")
            .style("width", "100vw")
            .style("margin", "1rem 0")
            .style("display", "block")
    } else {
        figure
            .style("width", "100%")
            .style("margin", "1rem auto")
            .style("text-align", "center")
            .style("display", "block")
    };

    let mut img = Element::new("img")
        .attr("src", spec.src.as_str())
        .attr("alt", spec.alt.as_str());
    for (name, value) in &spec.attrs {
        img = img.attr(name.as_str(), value.as_str());
    }

    let mut inner = Element::new("div").attr("class", "mdx-img-inner").child(img);
    if let Some(caption) = spec.caption() {
        let color = match theme {
            ThemeMode::Dark => "rgba(255,255,255,0.7)",
            ThemeMode::Light => "rgba(0,0,0,0.6)",
        };
        inner = inner.child(
            Element::new("figcaption")
                .style("margin-top", "0.5rem")
                .style("color", color)
                .style("font-size", "0.9rem")
                .style("text-align", "center")
                .text(caption),
        );
    }

    Some(
        figure
            .child(Element::new("style").child(Node::Raw(css)))
            .child(inner)
            .into(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::mdx::PropValue;

    fn props(pairs: &[(&str, PropValue)]) -> Props {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_base_size_applies_to_all_breakpoints() {
        let spec = ImageSpec {
            size: Some("70%".into()),
            ..ImageSpec::new("/a.png", "")
        };
        let w = spec.widths();
        assert_eq!(w.mobile, "70%");
        assert_eq!(w.tablet, "70%");
        assert_eq!(w.desktop, "70%");
    }

    #[test]
    fn test_breakpoint_fallback_chain() {
        let spec = ImageSpec {
            size_mobile: Some("90".into()),
            ..ImageSpec::new("/a.png", "")
        };
        let w = spec.widths();
        assert_eq!(w.mobile, "90%");
        assert_eq!(w.tablet, "90%");
        assert_eq!(w.desktop, "90%");

        let spec = ImageSpec {
            size: Some("60%".into()),
            size_desktop: Some("40%".into()),
            ..ImageSpec::new("/a.png", "")
        };
        let w = spec.widths();
        assert_eq!((w.mobile.as_str(), w.tablet.as_str(), w.desktop.as_str()), ("60%", "60%", "40%"));

        let w = ImageSpec::new("/a.png", "").widths();
        assert_eq!(w.desktop, "100%");
    }

    #[test]
    fn test_to_percent() {
        assert_eq!(to_percent("70%").as_deref(), Some("70%"));
        assert_eq!(to_percent(" 70 ").as_deref(), Some("70%"));
        assert_eq!(to_percent("62.5").as_deref(), Some("62.5%"));
        assert_eq!(to_percent("wide"), None);
        assert_eq!(to_percent(""), None);
    }

    #[test]
    fn test_missing_src_renders_nothing() {
        let spec = ImageSpec::new("", "alt text");
        assert!(render_image(&spec, false, "mdx-img-0", ThemeMode::Dark).is_none());
        let spec = ImageSpec::from_props(&props(&[("alt", PropValue::Text("x".into()))]));
        assert!(render_image(&spec, false, "mdx-img-0", ThemeMode::Dark).is_none());
    }

    #[test]
    fn test_sanitizes_props() {
        let spec = ImageSpec::from_props(&props(&[
            ("src", PropValue::Text("/b.png".into())),
            ("size", PropValue::Text("50".into())),
            ("fullPage", PropValue::Flag(true)),
            ("loading", PropValue::Text("lazy".into())),
            ("className", PropValue::Text("shot".into())),
            ("onClick", PropValue::Text("alert(1)".into())),
            ("title", PropValue::Text("Pipeline".into())),
        ]));
        assert!(spec.full_page);
        assert_eq!(spec.size.as_deref(), Some("50"));
        assert_eq!(
            spec.attrs,
            vec![
                ("loading".to_string(), "lazy".to_string()),
                ("class".to_string(), "shot".to_string())
            ]
        );

        let node = render_image(&spec, false, "mdx-img-1", ThemeMode::Dark).unwrap();
        let html = node.to_html();
        let img = node.as_element().unwrap().find("img").unwrap();
        assert_eq!(img.get_attr("loading"), Some("lazy"));
        assert_eq!(img.get_attr("onClick"), None);
        assert_eq!(img.get_attr("size"), None);
        assert_eq!(img.get_attr("title"), None);
        assert!(html.contains("<figcaption"));
        assert!(html.contains("Pipeline"));
    }

    #[test]
    fn test_full_bleed_uses_viewport_units() {
        let spec = ImageSpec {
            size: Some("80%".into()),
            ..ImageSpec::new("/c.png", "")
        };
        let node = render_image(&spec, true, "mdx-img-2", ThemeMode::Light).unwrap();
        let figure = node.as_element().unwrap();
        assert_eq!(figure.get_style("width"), Some("100vw"));
        assert_eq!(figure.get_style("transform"), Some("translateX(-50%)"));
        let html = node.to_html();
        assert!(html.contains("width: 80vw"));
        assert!(!html.contains("width: 80%"));
        // no caption without title or alt
        assert!(!html.contains("figcaption"));
    }

    #[test]
    fn test_caption_precedence() {
        let mut spec = ImageSpec::new("/d.png", "Alt text");
        assert_eq!(spec.caption(), Some("Alt text"));
        spec.title = Some("Title".into());
        assert_eq!(spec.caption(), Some("Title"));
        spec.title = Some(String::new());
        spec.alt.clear();
        assert_eq!(spec.caption(), None);
    }
}
