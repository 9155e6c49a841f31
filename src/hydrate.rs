//! Resource hydration
//!
//! Builds a diagram from bare resource IRIs in two strictly ordered
//! phases:
//!
//! 1. One `entity_info` batch; a node per IRI in input order, recorded in
//!    the identifier map; relayout.
//! 2. One `relation_info` batch over the same IRIs with no type filter;
//!    an edge per relation with endpoints resolved through the map;
//!    relayout.
//!
//! Phase 2 starts only after phase 1 has finished mutating the graph.
//! Nothing is rolled back on failure: nodes from phase 1 stay if phase 2
//! fails.

use crate::fragment::ResourceIri;
use crate::graph::{Edge, NodeId};
use crate::provider::{ProviderError, RelationTypeId, ResolutionProvider};
use crate::workspace::Workspace;
use std::collections::HashMap;
use thiserror::Error;
use tracing::info;

/// Mapping from resource IRI to the node created for it
pub type IdentifierMap = HashMap<ResourceIri, NodeId>;

/// Errors that abort a hydration attempt
#[derive(Debug, Error)]
pub enum HydrationError {
    #[error("entity lookup failed: {0}")]
    EntityLookup(#[source] ProviderError),

    #[error("relation lookup failed: {0}")]
    RelationLookup(#[source] ProviderError),

    #[error("provider returned no entity for {0}")]
    MissingEntity(ResourceIri),

    #[error("relation {type_id} references {iri}, which was not hydrated")]
    UnmappedEndpoint { type_id: RelationTypeId, iri: ResourceIri },
}

/// What a hydration run added to the workspace
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HydrationReport {
    /// Node created for each IRI
    pub nodes: IdentifierMap,
    /// Number of edges added
    pub edges_added: usize,
}

/// Populates a workspace from resource IRIs
#[derive(Debug, Default, Clone, Copy)]
pub struct ResourceHydrator;

impl ResourceHydrator {
    pub fn new() -> Self {
        Self
    }

    /// Hydrate `iris` into `workspace` using `provider`.
    ///
    /// An empty list is a no-op: no lookups, no relayout.
    pub async fn hydrate(
        &self,
        iris: &[ResourceIri],
        workspace: &mut dyn Workspace,
        provider: &dyn ResolutionProvider,
    ) -> Result<HydrationReport, HydrationError> {
        if iris.is_empty() {
            return Ok(HydrationReport::default());
        }

        let ids = self.hydrate_entities(iris, workspace, provider).await?;
        workspace.force_layout();
        info!(nodes = ids.len(), "hydrated entities");

        let edges_added = self.hydrate_relations(iris, &ids, workspace, provider).await?;
        workspace.force_layout();
        info!(edges = edges_added, "hydrated relations");

        Ok(HydrationReport {
            nodes: ids,
            edges_added,
        })
    }

    async fn hydrate_entities(
        &self,
        iris: &[ResourceIri],
        workspace: &mut dyn Workspace,
        provider: &dyn ResolutionProvider,
    ) -> Result<IdentifierMap, HydrationError> {
        let entities = provider
            .entity_info(iris)
            .await
            .map_err(HydrationError::EntityLookup)?;

        let mut ids = IdentifierMap::with_capacity(iris.len());
        for iri in iris {
            let entity = entities
                .get(iri)
                .ok_or_else(|| HydrationError::MissingEntity(iri.clone()))?;
            let node_id = workspace.create_element(entity);
            ids.insert(iri.clone(), node_id);
        }
        Ok(ids)
    }

    async fn hydrate_relations(
        &self,
        iris: &[ResourceIri],
        ids: &IdentifierMap,
        workspace: &mut dyn Workspace,
        provider: &dyn ResolutionProvider,
    ) -> Result<usize, HydrationError> {
        let relations = provider
            .relation_info(iris, &[])
            .await
            .map_err(HydrationError::RelationLookup)?;

        let resolve = |type_id: &RelationTypeId, iri: &ResourceIri| {
            ids.get(iri).cloned().ok_or_else(|| HydrationError::UnmappedEndpoint {
                type_id: type_id.clone(),
                iri: iri.clone(),
            })
        };

        for relation in &relations {
            let source = resolve(&relation.link_type_id, &relation.source_id)?;
            let target = resolve(&relation.link_type_id, &relation.target_id)?;
            workspace.add_link(Edge::new(relation.link_type_id.clone(), source, target));
        }
        Ok(relations.len())
    }
}
