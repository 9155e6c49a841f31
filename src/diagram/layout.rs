//! Lenient read-side view of layout data
//!
//! Layout payloads are opaque to the pipeline; the workspace only needs
//! element positions and link endpoints to rebuild its graph. Both the
//! current `elements`/`links` shape and legacy `cells` are understood.
//! Entries that don't match are skipped.

use crate::graph::Position;
use serde_json::Value;

/// An element placed on the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutElement {
    pub id: String,
    pub iri: String,
    pub position: Option<Position>,
}

/// A link between two layout elements
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutLink {
    pub id: Option<String>,
    pub type_id: String,
    pub source: String,
    pub target: String,
}

/// Elements and links extracted from a layout payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutView {
    pub elements: Vec<LayoutElement>,
    pub links: Vec<LayoutLink>,
}

impl LayoutView {
    pub fn from_layout_data(data: &Value) -> Self {
        let mut view = Self::default();

        if let Some(elements) = data.get("elements").and_then(Value::as_array) {
            view.elements.extend(elements.iter().filter_map(element_from));
        }
        if let Some(links) = data.get("links").and_then(Value::as_array) {
            view.links.extend(links.iter().filter_map(link_from));
        }
        if let Some(cells) = data.get("cells").and_then(Value::as_array) {
            for cell in cells {
                match cell.get("type").and_then(Value::as_str) {
                    Some("element") => view.elements.extend(element_from(cell)),
                    Some("link") => view.links.extend(link_from(cell)),
                    _ => {}
                }
            }
        }

        view
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.links.is_empty()
    }
}

fn str_field<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|k| value.get(*k).and_then(Value::as_str))
}

/// An endpoint is either `{"@id": ..}`, `{"id": ..}` or a bare string.
fn endpoint(value: Option<&Value>) -> Option<String> {
    let value = value?;
    value
        .as_str()
        .or_else(|| str_field(value, &["@id", "id"]))
        .map(str::to_string)
}

fn element_from(value: &Value) -> Option<LayoutElement> {
    let id = str_field(value, &["@id", "id"])?;
    let iri = str_field(value, &["iri"])?;
    let position = value.get("position").and_then(|p| {
        Some(Position {
            x: p.get("x")?.as_f64()?,
            y: p.get("y")?.as_f64()?,
        })
    });
    Some(LayoutElement {
        id: id.to_string(),
        iri: iri.to_string(),
        position,
    })
}

fn link_from(value: &Value) -> Option<LayoutLink> {
    Some(LayoutLink {
        id: str_field(value, &["@id", "id"]).map(str::to_string),
        type_id: str_field(value, &["property", "typeId"])?.to_string(),
        source: endpoint(value.get("source"))?,
        target: endpoint(value.get("target"))?,
    })
}
