//! StaticProvider — answers from a fixed set of records
//!
//! Used by the CLI (`--resources file.json`) and in tests. The file format
//! is `{"entities": [EntityRecord...], "relations": [RelationRecord...]}`.

use super::traits::{ProviderError, ResolutionProvider};
use super::types::{EntityRecord, RelationRecord, RelationTypeId};
use crate::fragment::ResourceIri;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;

/// The records a `StaticProvider` serves
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderData {
    #[serde(default)]
    pub entities: Vec<EntityRecord>,
    #[serde(default)]
    pub relations: Vec<RelationRecord>,
}

/// One call made against a `StaticProvider`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    EntityInfo(Vec<ResourceIri>),
    RelationInfo {
        ids: Vec<ResourceIri>,
        type_filter: Vec<RelationTypeId>,
    },
}

/// Provider backed by in-memory records.
pub struct StaticProvider {
    entities: HashMap<ResourceIri, EntityRecord>,
    relations: Vec<RelationRecord>,
    entity_failure: Option<ProviderError>,
    relation_failure: Option<ProviderError>,
    calls: Mutex<Vec<ProviderCall>>,
}

impl StaticProvider {
    pub fn new(data: ProviderData) -> Self {
        Self {
            entities: data
                .entities
                .into_iter()
                .map(|e| (e.id.clone(), e))
                .collect(),
            relations: data.relations,
            entity_failure: None,
            relation_failure: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::new(ProviderData::default())
    }

    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(text)?))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ProviderError::Unavailable(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_json_str(&text).map_err(|e| ProviderError::ParseError(e.to_string()))
    }

    pub fn with_entity(mut self, entity: EntityRecord) -> Self {
        self.entities.insert(entity.id.clone(), entity);
        self
    }

    pub fn with_relation(mut self, relation: RelationRecord) -> Self {
        self.relations.push(relation);
        self
    }

    /// Make every `entity_info` call fail with `error`.
    pub fn with_entity_failure(mut self, error: ProviderError) -> Self {
        self.entity_failure = Some(error);
        self
    }

    /// Make every `relation_info` call fail with `error`.
    pub fn with_relation_failure(mut self, error: ProviderError) -> Self {
        self.relation_failure = Some(error);
        self
    }

    /// Calls received so far, oldest first
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: ProviderCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

#[async_trait]
impl ResolutionProvider for StaticProvider {
    async fn entity_info(
        &self,
        ids: &[ResourceIri],
    ) -> Result<HashMap<ResourceIri, EntityRecord>, ProviderError> {
        self.record(ProviderCall::EntityInfo(ids.to_vec()));
        if let Some(err) = &self.entity_failure {
            return Err(err.clone());
        }
        Ok(ids
            .iter()
            .filter_map(|id| self.entities.get(id).map(|e| (id.clone(), e.clone())))
            .collect())
    }

    async fn relation_info(
        &self,
        ids: &[ResourceIri],
        type_filter: &[RelationTypeId],
    ) -> Result<Vec<RelationRecord>, ProviderError> {
        self.record(ProviderCall::RelationInfo {
            ids: ids.to_vec(),
            type_filter: type_filter.to_vec(),
        });
        if let Some(err) = &self.relation_failure {
            return Err(err.clone());
        }
        let scope: HashSet<&ResourceIri> = ids.iter().collect();
        Ok(self
            .relations
            .iter()
            .filter(|r| scope.contains(&r.source_id) && scope.contains(&r.target_id))
            .filter(|r| type_filter.is_empty() || type_filter.contains(&r.link_type_id))
            .cloned()
            .collect())
    }
}
