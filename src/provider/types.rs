//! Records returned by a resolution provider

use crate::fragment::ResourceIri;
use crate::graph::Properties;
use serde::{Deserialize, Serialize};

/// Identifier of a relation (link) type
pub type RelationTypeId = String;

/// What the provider knows about one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: ResourceIri,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub properties: Properties,
}

impl EntityRecord {
    pub fn new(id: impl Into<ResourceIri>) -> Self {
        Self {
            id: id.into(),
            types: Vec::new(),
            labels: Vec::new(),
            properties: Properties::new(),
        }
    }

    pub fn with_type(mut self, class_iri: impl Into<String>) -> Self {
        self.types.push(class_iri.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }
}

/// A relation of some type between two entities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationRecord {
    pub link_type_id: RelationTypeId,
    pub source_id: ResourceIri,
    pub target_id: ResourceIri,
}

impl RelationRecord {
    pub fn new(
        link_type_id: impl Into<RelationTypeId>,
        source_id: impl Into<ResourceIri>,
        target_id: impl Into<ResourceIri>,
    ) -> Self {
        Self {
            link_type_id: link_type_id.into(),
            source_id: source_id.into(),
            target_id: target_id.into(),
        }
    }
}
