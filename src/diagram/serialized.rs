//! SerializedDiagram: the versioned wire format for stored diagrams
//!
//! Two shapes exist on disk. The current envelope carries a `@context`
//! marker next to `layoutData` and `linkTypeOptions`. The legacy shape is
//! bare layout data. Decoding looks only at the marker.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The reserved key that marks a value as a current envelope
pub const CONTEXT_MARKER: &str = "@context";

/// JSON-LD context written into every envelope we produce
pub const DIAGRAM_CONTEXT: &str = "https://ontodia.org/context/v1.json";

const DIAGRAM_TYPE: &str = "Diagram";
const LAYOUT_TYPE: &str = "Layout";
const LINK_TYPE_OPTIONS_TYPE: &str = "LinkTypeOptions";

/// Display options for one link type
///
/// Fields this crate does not interpret are kept in `extra`, and absent
/// optional fields stay absent on re-encode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkTypeOptions {
    #[serde(rename = "@type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// IRI of the link type these options apply to
    pub property: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(rename = "showLabel", default, skip_serializing_if = "Option::is_none")]
    pub show_label: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LinkTypeOptions {
    pub fn new(property: impl Into<String>, visible: bool) -> Self {
        Self {
            kind: Some(LINK_TYPE_OPTIONS_TYPE.to_string()),
            property: property.into(),
            visible: Some(visible),
            show_label: None,
            extra: Map::new(),
        }
    }

    /// Links are visible unless the options say otherwise.
    pub fn is_visible(&self) -> bool {
        self.visible.unwrap_or(true)
    }
}

/// A snapshot of editor state in the current envelope shape
///
/// Unknown top-level fields of an envelope are kept in `extra` so a stored
/// envelope round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedDiagram {
    #[serde(rename = "@context")]
    pub context: Value,
    #[serde(rename = "@type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(rename = "layoutData")]
    pub layout_data: Value,
    #[serde(rename = "linkTypeOptions", default)]
    pub link_type_options: Vec<LinkTypeOptions>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SerializedDiagram {
    /// Build a fresh envelope around raw layout data.
    ///
    /// Object layouts without a `@type` get `"@type": "Layout"`.
    pub fn new(layout_data: Value, link_type_options: Vec<LinkTypeOptions>) -> Self {
        let layout_data = match layout_data {
            Value::Object(mut map) => {
                map.entry("@type")
                    .or_insert_with(|| Value::String(LAYOUT_TYPE.to_string()));
                Value::Object(map)
            }
            other => other,
        };
        Self::wrap(layout_data, link_type_options)
    }

    /// Wrap legacy layout data as-is, with empty link-type options.
    pub fn from_legacy(layout_data: Value) -> Self {
        Self::wrap(layout_data, Vec::new())
    }

    fn wrap(layout_data: Value, link_type_options: Vec<LinkTypeOptions>) -> Self {
        Self {
            context: Value::String(DIAGRAM_CONTEXT.to_string()),
            kind: Some(DIAGRAM_TYPE.to_string()),
            layout_data,
            link_type_options,
            extra: Map::new(),
        }
    }

    /// Decode a parsed JSON value of either on-disk shape.
    ///
    /// A value carrying the context marker is taken as an envelope as-is.
    /// Anything else is treated as legacy layout data and wrapped, untouched,
    /// with empty link-type options. Shape beyond the marker is not validated.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        if has_context_marker(&value) {
            serde_json::from_value(value)
        } else {
            Ok(Self::from_legacy(value))
        }
    }

    /// Parse stored text of either shape.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        Self::from_value(serde_json::from_str(text)?)
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Options for one link type, if the diagram carries any
    pub fn link_type_options_for(&self, property: &str) -> Option<&LinkTypeOptions> {
        self.link_type_options.iter().find(|o| o.property == property)
    }
}

fn has_context_marker(value: &Value) -> bool {
    value
        .as_object()
        .map(|map| map.contains_key(CONTEXT_MARKER))
        .unwrap_or(false)
}
