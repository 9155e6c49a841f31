//! Node representation in the diagram graph

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier for a node
///
/// Serializes as a plain string. Freshly created nodes get a UUID; nodes
/// imported from a stored layout keep the element id the layout carried.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a new random NodeId
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create a NodeId from an existing identifier
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Typed property values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Array(Vec<PropertyValue>),
    Object(HashMap<String, PropertyValue>),
}

/// Properties collection
pub type Properties = HashMap<String, PropertyValue>;

/// Position of a node on the canvas
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Node metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeMetadata {
    /// When the node was created in this session
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Where the node came from ("layout" or "hydration")
    pub origin: Option<String>,
}

/// A node in the diagram graph, standing for one external resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier
    pub id: NodeId,
    /// IRI of the resource this node renders
    pub iri: String,
    /// Class IRIs of the resource
    pub types: Vec<String>,
    /// Display labels
    pub labels: Vec<String>,
    /// Resource properties as returned by the resolution provider
    pub properties: Properties,
    /// Canvas position, if laid out
    pub position: Option<Position>,
    /// Node metadata
    pub metadata: NodeMetadata,
}

impl Node {
    /// Create a new node for the given resource IRI
    pub fn new(iri: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            iri: iri.into(),
            types: Vec::new(),
            labels: Vec::new(),
            properties: HashMap::new(),
            position: None,
            metadata: NodeMetadata {
                created_at: Some(chrono::Utc::now()),
                ..Default::default()
            },
        }
    }

    /// Use a specific id instead of a random one
    pub fn with_id(mut self, id: NodeId) -> Self {
        self.id = id;
        self
    }

    /// Add a property to the node
    pub fn with_property(mut self, key: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Record where the node came from
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.metadata.origin = Some(origin.into());
        self
    }
}
