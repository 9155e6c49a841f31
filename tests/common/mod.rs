//! Shared helpers for pipeline integration tests
//!
//! `RecordingWorkspace` and `RecordingProvider` write into one shared
//! event log so tests can assert the interleaving of graph mutations and
//! provider calls.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use trellis::provider::RelationTypeId;
use trellis::{
    DiagramWorkspace, Edge, EntityRecord, NodeId, ProviderError, RelationRecord,
    ResolutionProvider, ResourceIri, SerializedDiagram, StaticProvider, Workspace,
};

/// One observable step of a pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Import { had_diagram: bool, validate_links: bool },
    EntityInfo(Vec<String>),
    CreateElement(String),
    ForceLayout,
    RelationInfo(Vec<String>),
    AddLink { type_id: String },
}

pub type EventLog = Arc<Mutex<Vec<Event>>>;

pub fn new_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn events(log: &EventLog) -> Vec<Event> {
    log.lock().unwrap().clone()
}

fn push(log: &EventLog, event: Event) {
    log.lock().unwrap().push(event);
}

/// A `DiagramWorkspace` that logs every call
pub struct RecordingWorkspace {
    pub inner: DiagramWorkspace,
    log: EventLog,
}

impl RecordingWorkspace {
    pub fn new(log: EventLog) -> Self {
        Self {
            inner: DiagramWorkspace::new(),
            log,
        }
    }
}

impl Workspace for RecordingWorkspace {
    fn import_layout(
        &mut self,
        diagram: Option<&SerializedDiagram>,
        validate_links: bool,
        provider: Arc<dyn ResolutionProvider>,
    ) {
        push(
            &self.log,
            Event::Import {
                had_diagram: diagram.is_some(),
                validate_links,
            },
        );
        self.inner.import_layout(diagram, validate_links, provider);
    }

    fn create_element(&mut self, entity: &EntityRecord) -> NodeId {
        push(&self.log, Event::CreateElement(entity.id.to_string()));
        self.inner.create_element(entity)
    }

    fn add_link(&mut self, link: Edge) {
        push(
            &self.log,
            Event::AddLink {
                type_id: link.type_id.clone(),
            },
        );
        self.inner.add_link(link);
    }

    fn force_layout(&mut self) {
        push(&self.log, Event::ForceLayout);
        self.inner.force_layout();
    }
}

/// A `StaticProvider` that logs each batch call before answering
pub struct RecordingProvider {
    inner: StaticProvider,
    log: EventLog,
}

impl RecordingProvider {
    pub fn new(inner: StaticProvider, log: EventLog) -> Self {
        Self { inner, log }
    }
}

fn names(ids: &[ResourceIri]) -> Vec<String> {
    ids.iter().map(|i| i.to_string()).collect()
}

#[async_trait]
impl ResolutionProvider for RecordingProvider {
    async fn entity_info(
        &self,
        ids: &[ResourceIri],
    ) -> Result<HashMap<ResourceIri, EntityRecord>, ProviderError> {
        push(&self.log, Event::EntityInfo(names(ids)));
        // Suspend like a network call would
        tokio::task::yield_now().await;
        self.inner.entity_info(ids).await
    }

    async fn relation_info(
        &self,
        ids: &[ResourceIri],
        type_filter: &[RelationTypeId],
    ) -> Result<Vec<RelationRecord>, ProviderError> {
        push(&self.log, Event::RelationInfo(names(ids)));
        tokio::task::yield_now().await;
        self.inner.relation_info(ids, type_filter).await
    }
}

/// Alice knows Bob
pub fn alice_knows_bob() -> StaticProvider {
    StaticProvider::empty()
        .with_entity(EntityRecord::new("ex:Alice").with_type("ex:Person").with_label("Alice"))
        .with_entity(EntityRecord::new("ex:Bob").with_type("ex:Person").with_label("Bob"))
        .with_relation(RelationRecord::new("ex:knows", "ex:Alice", "ex:Bob"))
}
