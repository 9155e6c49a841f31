//! ResolutionProvider trait — the contract knowledge backends implement

use super::types::{EntityRecord, RelationRecord, RelationTypeId};
use crate::fragment::ResourceIri;
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

/// Errors from resolution provider calls
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("provider not available: {0}")]
    Unavailable(String),
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("response parse error: {0}")]
    ParseError(String),
}

/// Batch lookups against an external knowledge backend.
///
/// Abstracts over the backend (SPARQL endpoint, static file, mock) so the
/// hydrator doesn't depend on how entities are resolved.
#[async_trait]
pub trait ResolutionProvider: Send + Sync {
    /// Look up entity records for every id in one batch.
    async fn entity_info(
        &self,
        ids: &[ResourceIri],
    ) -> Result<HashMap<ResourceIri, EntityRecord>, ProviderError>;

    /// Look up relations among `ids`. An empty `type_filter` means every
    /// relation type.
    async fn relation_info(
        &self,
        ids: &[ResourceIri],
        type_filter: &[RelationTypeId],
    ) -> Result<Vec<RelationRecord>, ProviderError>;
}
