//! Load orchestration
//!
//! Resolves the initial diagram for a fragment with fixed precedence:
//! local store, then remote snapshot, then resource hydration. Each step
//! runs only after the previous one has definitively produced nothing.

use crate::diagram::SerializedDiagram;
use crate::fragment::FragmentReference;
use crate::hydrate::{HydrationError, HydrationReport, ResourceHydrator};
use crate::provider::ResolutionProvider;
use crate::remote::RemoteSnapshotClient;
use crate::storage::{LocalPersistenceStore, StorageResult};
use crate::workspace::Workspace;
use std::sync::Arc;
use tracing::{debug, info};

/// Where the initial diagram came from
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Imported from the local store under this key
    Local(String),
    /// Imported from the remote store under this key
    Cloud(String),
    /// Built from named resources
    Hydrated(HydrationReport),
    /// Nothing to load; the workspace was reset to an empty diagram
    Empty,
}

/// Sequences the snapshot sources and the hydration fallback
#[derive(Clone)]
pub struct DiagramLoader {
    local: LocalPersistenceStore,
    remote: RemoteSnapshotClient,
    hydrator: ResourceHydrator,
}

impl DiagramLoader {
    pub fn new(local: LocalPersistenceStore, remote: RemoteSnapshotClient) -> Self {
        Self {
            local,
            remote,
            hydrator: ResourceHydrator::new(),
        }
    }

    pub fn local(&self) -> &LocalPersistenceStore {
        &self.local
    }

    pub fn remote(&self) -> &RemoteSnapshotClient {
        &self.remote
    }

    /// Find a stored snapshot for `reference`: local first, and the remote
    /// store only when local produced nothing.
    pub async fn resolve_snapshot(
        &self,
        reference: &FragmentReference,
    ) -> Option<(LoadOutcome, SerializedDiagram)> {
        self.first_snapshot(reference.local_key(), reference.cloud_key())
            .await
    }

    async fn first_snapshot(
        &self,
        local_key: Option<&str>,
        cloud_key: Option<&str>,
    ) -> Option<(LoadOutcome, SerializedDiagram)> {
        if let Some(key) = local_key {
            if let Some(diagram) = self.local.load(key) {
                return Some((LoadOutcome::Local(key.to_string()), diagram));
            }
        }
        if let Some(key) = cloud_key {
            if let Some(diagram) = self.remote.load(key).await {
                return Some((LoadOutcome::Cloud(key.to_string()), diagram));
            }
        }
        None
    }

    /// Produce the initial diagram for `reference` in `workspace`.
    ///
    /// Whatever snapshot is found (possibly none) is imported with link
    /// validation. When there was no snapshot and the fragment names
    /// resources, they are hydrated. Only hydration failures are errors.
    pub async fn load(
        &self,
        reference: &FragmentReference,
        workspace: &mut dyn Workspace,
        provider: Arc<dyn ResolutionProvider>,
    ) -> Result<LoadOutcome, HydrationError> {
        debug!(%reference, "resolving initial diagram");
        let snapshot = self.resolve_snapshot(reference).await;

        workspace.import_layout(
            snapshot.as_ref().map(|(_, diagram)| diagram),
            true,
            provider.clone(),
        );

        if let Some((outcome, _)) = snapshot {
            info!(?outcome, "loaded diagram snapshot");
            return Ok(outcome);
        }

        match reference.named_resources() {
            Some(iris) => {
                let report = self
                    .hydrator
                    .hydrate(iris, workspace, provider.as_ref())
                    .await?;
                Ok(LoadOutcome::Hydrated(report))
            }
            None => Ok(LoadOutcome::Empty),
        }
    }

    /// Classify `location` (a URL or a bare fragment) and load it.
    pub async fn load_location(
        &self,
        location: &str,
        workspace: &mut dyn Workspace,
        provider: Arc<dyn ResolutionProvider>,
    ) -> Result<LoadOutcome, HydrationError> {
        let reference = FragmentReference::from_location(location);
        self.load(&reference, workspace, provider).await
    }

    /// Persist `diagram` locally and return the key to put in the fragment.
    pub fn save(&self, diagram: &SerializedDiagram) -> StorageResult<String> {
        let key = self.local.save(diagram)?;
        info!(key = %key, "saved diagram");
        Ok(key)
    }
}
