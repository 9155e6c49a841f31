//! Edge representation: a typed link between two diagram nodes

use super::node::NodeId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an edge
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(String);

impl EdgeId {
    /// Create a new random EdgeId
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EdgeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A directed link of a given link type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Unique identifier
    pub id: EdgeId,
    /// IRI of the link type (e.g., "ex:knows")
    pub type_id: String,
    /// Source node
    pub source: NodeId,
    /// Target node
    pub target: NodeId,
}

impl Edge {
    /// Create a new edge
    pub fn new(type_id: impl Into<String>, source: NodeId, target: NodeId) -> Self {
        Self {
            id: EdgeId::new(),
            type_id: type_id.into(),
            source,
            target,
        }
    }

    /// Use a specific id instead of a random one
    pub fn with_id(mut self, id: EdgeId) -> Self {
        self.id = id;
        self
    }

    /// True if this edge connects `a` and `b` in the given direction
    pub fn connects(&self, source: &NodeId, target: &NodeId) -> bool {
        &self.source == source && &self.target == target
    }
}
