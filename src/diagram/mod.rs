//! Serialized diagram wire format

mod layout;
mod serialized;

pub use layout::{LayoutElement, LayoutLink, LayoutView};
pub use serialized::{LinkTypeOptions, SerializedDiagram, CONTEXT_MARKER, DIAGRAM_CONTEXT};
