//! Tech comparison tables
//!
//! A `TechTable` is a list of rows, each with a label and either named
//! cells or positional values. Three layouts are possible:
//!
//! - explicit: `columns` given; row `values[i]` sits under `columns[i + 1]`
//! - auto: one column per named cell key (first-seen order), plus a
//!   trailing Details column when any row has free-form details
//! - two-column: no named cells at all; Label and Details only

use indexmap::IndexMap;
use std::collections::HashMap;

use super::mdx::{Component, PropValue, Props};
use super::node::{Element, Node};
use crate::config::ThemeMode;

const DEFAULT_LEFT_HEADER: &str = "Label";
const DETAILS_HEADER: &str = "Details";
/// Center widening only applies to tables this wide
const MIN_WIDEN_COLUMNS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "start" => Some(Align::Left),
            "center" | "centre" => Some(Align::Center),
            "right" | "end" => Some(Align::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }
}

/// Cell data of a row
#[derive(Debug, Clone, PartialEq)]
pub enum RowCells {
    /// Named cells, in declaration order
    Keyed(IndexMap<String, String>),
    /// Values for `columns[1..]`
    Positional(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TechRow {
    pub label: String,
    pub cells: RowCells,
    /// Free-form trailing content
    pub details: Option<String>,
    /// Per-column alignment overrides, keyed by `align_key`
    pub align: HashMap<String, Align>,
}

impl TechRow {
    /// Build a row from `<TechRow>` props. `values` selects positional
    /// cells; `alignXxx` props are alignment overrides; every other prop
    /// except `label`/`category` is a named cell.
    pub fn from_props(props: &Props, children: Option<String>) -> Self {
        let label = props
            .get("label")
            .or_else(|| props.get("category"))
            .map(PropValue::to_display)
            .unwrap_or_default();

        let mut keyed = IndexMap::new();
        let mut values = None;
        let mut align = HashMap::new();
        let mut details = children.filter(|c| !c.trim().is_empty());

        for (key, value) in props {
            match key.as_str() {
                "label" | "category" | "children" | "key" => {}
                "values" => values = Some(value.to_list()),
                "details" if details.is_none() => {
                    details = Some(value.to_display()).filter(|d| !d.trim().is_empty())
                }
                _ => {
                    if let Some(column) = alignment_target(key) {
                        if let Some(a) = value.as_text().and_then(Align::parse) {
                            align.insert(column, a);
                        }
                    } else if key != "details" {
                        keyed.insert(key.clone(), value.to_display());
                    }
                }
            }
        }

        let cells = match values {
            Some(v) => RowCells::Positional(v),
            None => RowCells::Keyed(keyed),
        };

        Self {
            label,
            cells,
            details,
            align,
        }
    }

    fn align_for(&self, column_key: &str, default: Align) -> Align {
        self.align.get(column_key).copied().unwrap_or(default)
    }

    fn label_align(&self) -> Align {
        self.align
            .get("label")
            .or_else(|| self.align.get("category"))
            .copied()
            .unwrap_or(Align::Center)
    }
}

/// Column key addressed by an `alignXxx` prop
fn alignment_target(key: &str) -> Option<String> {
    let rest = key.strip_prefix("align")?;
    if rest.chars().next()?.is_ascii_uppercase() {
        Some(align_key(rest))
    } else {
        None
    }
}

/// Normalized key used to match alignment overrides to columns:
/// alphanumerics only, first letter lowercased
pub fn align_key(name: &str) -> String {
    let cleaned: String = name.chars().filter(|c| c.is_alphanumeric()).collect();
    let mut chars = cleaned.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Display label for a named cell key: `topAccuracy` -> `Top Accuracy`
pub fn format_header(key: &str) -> String {
    if key.eq_ignore_ascii_case("fid") {
        return "FID ↓".to_string();
    }
    let mut out = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if i > 0 && c.is_uppercase() {
            out.push(' ');
        }
        if i == 0 {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
pub struct TechTable {
    pub left_header: String,
    pub hide_header: bool,
    /// Explicit headers; non-empty selects explicit mode
    pub columns: Vec<String>,
    /// Explicit column widths, e.g. `["20%", "40%", "40%"]`
    pub widths: Vec<String>,
    pub rows: Vec<TechRow>,
}

impl Default for TechTable {
    fn default() -> Self {
        Self {
            left_header: DEFAULT_LEFT_HEADER.to_string(),
            hide_header: false,
            columns: Vec::new(),
            widths: Vec::new(),
            rows: Vec::new(),
        }
    }
}

impl TechTable {
    pub fn from_props(props: &Props, rows: Vec<TechRow>) -> Self {
        Self {
            left_header: props
                .get("leftHeader")
                .map(PropValue::to_display)
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_LEFT_HEADER.to_string()),
            hide_header: props
                .get("hideHeader")
                .map(PropValue::is_truthy)
                .unwrap_or(false),
            columns: props.get("columns").map(PropValue::to_list).unwrap_or_default(),
            widths: props
                .get("widths")
                .or_else(|| props.get("columnWidths"))
                .map(PropValue::to_list)
                .unwrap_or_default(),
            rows,
        }
    }

    /// `<TechTable>` with `<TechRow>` children
    pub fn from_component(component: &Component) -> Self {
        let rows = component
            .children
            .iter()
            .filter(|c| c.name == "TechRow")
            .map(|c| TechRow::from_props(&c.props, c.text.clone()))
            .collect();
        Self::from_props(&component.props, rows)
    }

    /// YAML form used by ```` ```techtable ```` fences:
    ///
    /// ```yaml
    /// columns: [Model, Accuracy]
    /// rows:
    ///   - label: A
    ///     values: ["92%"]
    /// ```
    pub fn from_yaml(source: &str) -> Result<Self, serde_yaml::Error> {
        let raw: IndexMap<String, serde_yaml::Value> = serde_yaml::from_str(source)?;
        let mut props = Props::new();
        let mut rows = Vec::new();

        for (key, value) in &raw {
            if key == "rows" {
                let entries: Vec<IndexMap<String, serde_yaml::Value>> =
                    serde_yaml::from_value(value.clone())?;
                for entry in entries {
                    let row_props: Props = entry
                        .iter()
                        .map(|(k, v)| (k.clone(), PropValue::from_yaml(v)))
                        .collect();
                    rows.push(TechRow::from_props(&row_props, None));
                }
            } else {
                props.insert(key.clone(), PropValue::from_yaml(value));
            }
        }

        Ok(Self::from_props(&props, rows))
    }

    pub fn is_explicit(&self) -> bool {
        !self.columns.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableMode {
    Explicit,
    Auto,
    TwoColumn,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub text: String,
    pub align: Align,
}

/// Column headers, cell grid and widths, independent of styling
#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    pub mode: TableMode,
    pub headers: Vec<Cell>,
    pub rows: Vec<Vec<Cell>>,
    /// Percentages summing to 100, explicit mode only
    pub widths: Option<Vec<f64>>,
}

/// Compute the table layout. `widen_center` is the wide-viewport flag.
pub fn layout(table: &TechTable, widen_center: bool, widen_factor: f64) -> TableLayout {
    if table.is_explicit() {
        explicit_layout(table, widen_center, widen_factor)
    } else {
        auto_layout(table)
    }
}

fn explicit_layout(table: &TechTable, widen_center: bool, widen_factor: f64) -> TableLayout {
    let columns = &table.columns;
    let headers = columns
        .iter()
        .enumerate()
        .map(|(i, c)| Cell {
            text: c.clone(),
            align: if i == 0 { Align::Center } else { Align::Left },
        })
        .collect();

    let rows = table
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![Cell {
                text: row.label.clone(),
                align: row.label_align(),
            }];
            for (i, column) in columns.iter().enumerate().skip(1) {
                let text = match &row.cells {
                    RowCells::Positional(values) => values.get(i - 1).cloned().unwrap_or_default(),
                    RowCells::Keyed(_) => String::new(),
                };
                cells.push(Cell {
                    text,
                    align: row.align_for(&align_key(column), Align::Left),
                });
            }
            cells
        })
        .collect();

    TableLayout {
        mode: TableMode::Explicit,
        headers,
        rows,
        widths: Some(column_widths(
            columns.len(),
            &table.widths,
            widen_center,
            widen_factor,
        )),
    }
}

fn auto_layout(table: &TechTable) -> TableLayout {
    let mut keys: Vec<&str> = Vec::new();
    let mut has_details = false;
    for row in &table.rows {
        if let RowCells::Keyed(cells) = &row.cells {
            for key in cells.keys() {
                if !keys.contains(&key.as_str()) {
                    keys.push(key);
                }
            }
        }
        has_details |= row.details.is_some();
    }

    let left = Cell {
        text: table.left_header.clone(),
        align: Align::Center,
    };
    let details_header = Cell {
        text: DETAILS_HEADER.to_string(),
        align: Align::Left,
    };

    if keys.is_empty() {
        let rows = table
            .rows
            .iter()
            .map(|row| {
                vec![
                    Cell {
                        text: row.label.clone(),
                        align: row.label_align(),
                    },
                    Cell {
                        text: row.details.clone().unwrap_or_default(),
                        align: row.align_for("details", Align::Left),
                    },
                ]
            })
            .collect();
        return TableLayout {
            mode: TableMode::TwoColumn,
            headers: vec![left, details_header],
            rows,
            widths: None,
        };
    }

    let mut headers = vec![left];
    headers.extend(keys.iter().map(|k| Cell {
        text: format_header(k),
        align: Align::Left,
    }));
    if has_details {
        headers.push(details_header);
    }

    let rows = table
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![Cell {
                text: row.label.clone(),
                align: row.label_align(),
            }];
            for key in &keys {
                let text = match &row.cells {
                    RowCells::Keyed(named) => named.get(*key).cloned().unwrap_or_default(),
                    RowCells::Positional(_) => String::new(),
                };
                cells.push(Cell {
                    text,
                    align: row.align_for(&align_key(key), Align::Left),
                });
            }
            if has_details {
                cells.push(Cell {
                    text: row.details.clone().unwrap_or_default(),
                    align: row.align_for("details", Align::Left),
                });
            }
            cells
        })
        .collect();

    TableLayout {
        mode: TableMode::Auto,
        headers,
        rows,
        widths: None,
    }
}

/// Column width percentages for explicit mode.
///
/// Explicit widths are used when there is one per column and every one is a
/// percentage; otherwise each column gets an equal share. With
/// `widen_center` and at least five columns the three middle columns are
/// multiplied by `factor`. The result always sums to 100.
pub fn column_widths(count: usize, widths: &[String], widen_center: bool, factor: f64) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }

    let mut base = parse_percent_widths(widths, count)
        .unwrap_or_else(|| vec![100.0 / count as f64; count]);

    if widen_center && count >= MIN_WIDEN_COLUMNS {
        let mid = count / 2;
        for w in &mut base[mid - 1..=mid + 1] {
            *w *= factor;
        }
    }

    let total: f64 = base.iter().sum();
    if total <= 0.0 {
        return vec![100.0 / count as f64; count];
    }
    for w in &mut base {
        *w = *w * 100.0 / total;
    }
    base
}

fn parse_percent_widths(widths: &[String], count: usize) -> Option<Vec<f64>> {
    if widths.len() != count {
        if !widths.is_empty() {
            tracing::debug!(
                "Ignoring {} column widths for {} columns",
                widths.len(),
                count
            );
        }
        return None;
    }
    widths
        .iter()
        .map(|w| {
            w.trim()
                .strip_suffix('%')
                .and_then(|n| n.trim().parse::<f64>().ok())
                .filter(|n| n.is_finite() && *n >= 0.0)
        })
        .collect()
}

/// Theme colors for tables
#[derive(Debug, Clone, Copy)]
pub struct TablePalette {
    pub table_bg: &'static str,
    pub border: &'static str,
    pub header_bg: &'static str,
    pub header_text: &'static str,
    pub cell_text: &'static str,
    pub label_text: &'static str,
    pub shadow: &'static str,
    pub row_outline: &'static str,
}

impl TablePalette {
    pub fn for_theme(theme: ThemeMode) -> Self {
        match theme {
            ThemeMode::Dark => Self {
                table_bg: "rgba(30,32,38,0.96)",
                border: "rgba(255,255,255,0.02)",
                header_bg: "linear-gradient(90deg, rgba(255,255,255,0.12), rgba(255,255,255,0.04))",
                header_text: "white",
                cell_text: "rgba(255,255,255,0.92)",
                label_text: "white",
                shadow: "0 0 25px rgba(255,255,255,0.08)",
                row_outline: "1px solid rgba(255,255,255,0.03)",
            },
            ThemeMode::Light => Self {
                table_bg: "rgba(255,255,255,0.98)",
                border: "rgba(0,0,0,0.10)",
                header_bg: "linear-gradient(90deg, rgba(0,0,0,0.04), rgba(0,0,0,0.01))",
                header_text: "#222",
                cell_text: "#222",
                label_text: "#111",
                shadow: "0 0 25px rgba(0,0,0,0.06)",
                row_outline: "1px solid rgba(0,0,0,0.02)",
            },
        }
    }
}

/// Render a layout. `cell` turns cell text into content nodes.
pub fn render_table(
    layout: &TableLayout,
    hide_header: bool,
    palette: &TablePalette,
    cell: &dyn Fn(&str) -> Vec<Node>,
) -> Node {
    let border = format!("1px solid {}", palette.border);
    let last = layout.headers.len().saturating_sub(1);

    let mut table = Element::new("table")
        .attr("class", "tech-table")
        .style("border", border.as_str())
        .style("border-radius", "1rem")
        .style("overflow", "hidden")
        .style("backdrop-filter", "blur(6px)")
        .style("background-color", palette.table_bg)
        .style("box-shadow", palette.shadow)
        .style("margin", "0 auto")
        .style("max-width", "clamp(720px, 70vw, 1000px)")
        .style("width", "100%");

    if let Some(widths) = &layout.widths {
        let cols = widths
            .iter()
            .map(|w| Node::from(Element::new("col").style("width", format!("{:.2}%", w))));
        table = table.child(Element::new("colgroup").children(cols));
    }

    if !hide_header {
        let uppercase = layout.mode == TableMode::Auto;
        let ths = layout.headers.iter().enumerate().map(|(i, h)| {
            let th = Element::new("th")
                .style("padding", "0.75rem 1.25rem")
                .style("text-align", h.align.as_str())
                .style("font-weight", "600")
                .style(
                    "text-transform",
                    if uppercase && i > 0 { "uppercase" } else { "none" },
                )
                .style("border-right", if i == last { "0".to_string() } else { border.clone() });
            let th = if layout.mode == TableMode::Explicit {
                th.style("white-space", "nowrap")
            } else {
                th
            };
            Node::from(th.text(h.text.as_str()))
        });
        table = table.child(
            Element::new("thead").child(
                Element::new("tr")
                    .style("background", palette.header_bg)
                    .style("color", palette.header_text)
                    .style("border-bottom", border.as_str())
                    .children(ths),
            ),
        );
    }

    let trs = layout.rows.iter().map(|row| {
        let tds = row.iter().enumerate().map(|(i, c)| {
            let td = Element::new("td")
                .style("padding", "0.75rem 1.25rem")
                .style("text-align", c.align.as_str())
                .style("border-right", if i == last { "0".to_string() } else { border.clone() });
            let td = if i == 0 {
                td.style("vertical-align", "middle")
                    .style("color", palette.label_text)
                    .style("font-weight", "600")
                    .style("white-space", "nowrap")
            } else {
                td.style("color", palette.cell_text)
            };
            Node::from(td.children(cell(&c.text)))
        });
        Node::from(
            Element::new("tr")
                .style("transition", "background-color 160ms ease")
                .style("border-bottom", border.as_str())
                .style("outline", palette.row_outline)
                .children(tds),
        )
    });
    table = table.child(Element::new("tbody").children(trs));

    Element::new("div")
        .style("text-align", "center")
        .style("width", "100%")
        .child(table)
        .into()
}
