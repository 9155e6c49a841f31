//! Core graph data structures

mod edge;
mod model;
mod node;


pub use edge::{Edge, EdgeId};
pub use model::GraphModel;
pub use node::{Node, NodeId, NodeMetadata, Position, Properties, PropertyValue};
