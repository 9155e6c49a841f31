//! Workspace — the consumer of the resolved diagram
//!
//! The editor owns the live graph; the pipeline only drives it through the
//! `Workspace` contract. `DiagramWorkspace` is an in-memory implementation
//! over `GraphModel`, used by the CLI and tests.

use crate::diagram::{LayoutView, SerializedDiagram};
use crate::graph::{Edge, EdgeId, GraphModel, Node, NodeId, Position};
use crate::provider::{EntityRecord, ResolutionProvider};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// The mutation/query surface the pipeline needs from an editor
pub trait Workspace: Send {
    /// Replace the whole graph with `diagram` (or with nothing).
    ///
    /// With `validate_links`, links whose endpoints are not elements of the
    /// imported layout are dropped. The provider becomes the workspace's
    /// source for later lookups.
    fn import_layout(
        &mut self,
        diagram: Option<&SerializedDiagram>,
        validate_links: bool,
        provider: Arc<dyn ResolutionProvider>,
    );

    /// Create a node for an entity and return its id
    fn create_element(&mut self, entity: &EntityRecord) -> NodeId;

    fn add_link(&mut self, link: Edge);

    /// Recompute node positions for the whole diagram
    fn force_layout(&mut self);
}

/// Horizontal/vertical spacing of the grid layout
const GRID_SPACING: f64 = 160.0;

/// In-memory workspace over a `GraphModel`
#[derive(Default)]
pub struct DiagramWorkspace {
    model: GraphModel,
    provider: Option<Arc<dyn ResolutionProvider>>,
    layout_passes: usize,
    dropped_links: usize,
}

impl DiagramWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model(&self) -> &GraphModel {
        &self.model
    }

    /// The provider handed over by the last import
    pub fn provider(&self) -> Option<&Arc<dyn ResolutionProvider>> {
        self.provider.as_ref()
    }

    /// How many times `force_layout` has run
    pub fn layout_passes(&self) -> usize {
        self.layout_passes
    }

    /// Links dropped by validation during the last import
    pub fn dropped_links(&self) -> usize {
        self.dropped_links
    }
}

impl Workspace for DiagramWorkspace {
    fn import_layout(
        &mut self,
        diagram: Option<&SerializedDiagram>,
        validate_links: bool,
        provider: Arc<dyn ResolutionProvider>,
    ) {
        self.model.clear();
        self.dropped_links = 0;
        self.provider = Some(provider);

        let Some(diagram) = diagram else {
            debug!("imported empty diagram");
            return;
        };

        let view = LayoutView::from_layout_data(&diagram.layout_data);
        let mut ids: HashMap<&str, NodeId> = HashMap::new();
        for element in &view.elements {
            let mut node = Node::new(element.iri.clone())
                .with_id(NodeId::from_string(element.id.clone()))
                .with_origin("layout");
            node.position = element.position;
            ids.insert(element.id.as_str(), self.model.add_node(node));
        }

        for link in &view.links {
            let endpoints = (ids.get(link.source.as_str()), ids.get(link.target.as_str()));
            let (source, target) = match endpoints {
                (Some(s), Some(t)) => (s.clone(), t.clone()),
                _ if validate_links => {
                    warn!(
                        type_id = %link.type_id,
                        source = %link.source,
                        target = %link.target,
                        "dropping link with unknown endpoint"
                    );
                    self.dropped_links += 1;
                    continue;
                }
                _ => (
                    NodeId::from_string(link.source.clone()),
                    NodeId::from_string(link.target.clone()),
                ),
            };
            let mut edge = Edge::new(link.type_id.clone(), source, target);
            if let Some(id) = &link.id {
                edge = edge.with_id(EdgeId::from_string(id.clone()));
            }
            self.model.add_edge(edge);
        }

        debug!(
            nodes = self.model.node_count(),
            edges = self.model.edge_count(),
            dropped = self.dropped_links,
            "imported diagram"
        );
    }

    fn create_element(&mut self, entity: &EntityRecord) -> NodeId {
        let mut node = Node::new(entity.id.as_str()).with_origin("hydration");
        node.types = entity.types.clone();
        node.labels = entity.labels.clone();
        node.properties = entity.properties.clone();
        self.model.add_node(node)
    }

    fn add_link(&mut self, link: Edge) {
        self.model.add_edge(link);
    }

    fn force_layout(&mut self) {
        // Square-ish grid in insertion order
        let count = self.model.node_count();
        let columns = ((count as f64).sqrt().ceil() as usize).max(1);
        let ids: Vec<NodeId> = self.model.nodes().map(|n| n.id.clone()).collect();
        for (i, id) in ids.iter().enumerate() {
            if let Some(node) = self.model.node_mut(id) {
                node.position = Some(Position {
                    x: (i % columns) as f64 * GRID_SPACING,
                    y: (i / columns) as f64 * GRID_SPACING,
                });
            }
        }
        self.layout_passes += 1;
    }
}
