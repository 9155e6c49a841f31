//! GraphModel: the live node/edge set behind a diagram

use super::edge::Edge;
use super::node::{Node, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The live diagram graph
///
/// Nodes are keyed by id; insertion order is kept so summaries and layouts
/// are deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphModel {
    nodes: HashMap<NodeId, Node>,
    order: Vec<NodeId>,
    edges: Vec<Edge>,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, replacing any node with the same id.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id.clone();
        if self.nodes.insert(id.clone(), node).is_none() {
            self.order.push(id.clone());
        }
        id
    }

    /// Append an edge. Endpoints are not checked here; callers that build
    /// edges from untrusted data validate first.
    pub fn add_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// First node (in insertion order) rendering the given IRI
    pub fn node_by_iri(&self, iri: &str) -> Option<&Node> {
        self.nodes().find(|n| n.iri == iri)
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Edges running from `source` to `target`
    pub fn edges_between<'a>(
        &'a self,
        source: &'a NodeId,
        target: &'a NodeId,
    ) -> impl Iterator<Item = &'a Edge> {
        self.edges.iter().filter(move |e| e.connects(source, target))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Drop every node and edge
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.order.clear();
        self.edges.clear();
    }
}
