//! Trellis: diagram-state resolution and hydration
//!
//! Bootstraps a diagram editor's initial state from a URL fragment. The
//! fragment names one of three origins, tried with fixed precedence:
//!
//! - **Local**: `#<key>`, a diagram saved in a key-value store
//! - **Cloud**: `#!<key>`, a snapshot in a remote store
//! - **Resources**: `#r=<iri>;<iri>`, no snapshot; nodes and edges are
//!   hydrated from a knowledge backend
//!
//! # Example
//!
//! ```
//! use trellis::FragmentReference;
//!
//! let reference = FragmentReference::parse("#r=ex:Alice;ex:Bob");
//! assert_eq!(reference.named_resources().map(|iris| iris.len()), Some(2));
//! ```

pub mod config;
pub mod diagram;
pub mod fragment;
mod graph;
pub mod hydrate;
pub mod keygen;
pub mod loader;
pub mod notify;
pub mod provider;
pub mod remote;
pub mod storage;
pub mod workspace;

pub use config::{Config, ConfigError};
pub use diagram::{LinkTypeOptions, SerializedDiagram};
pub use fragment::{FragmentReference, ResourceIri};
pub use graph::{
    Edge, EdgeId, GraphModel, Node, NodeId, NodeMetadata, Position, Properties, PropertyValue,
};
pub use hydrate::{HydrationError, HydrationReport, IdentifierMap, ResourceHydrator};
pub use loader::{DiagramLoader, LoadOutcome};
pub use notify::{LogNotifier, Notice, Notifier, RecordingNotifier};
pub use provider::{EntityRecord, ProviderError, RelationRecord, ResolutionProvider, StaticProvider};
pub use remote::{HttpSnapshotFetcher, RemoteError, RemoteSnapshotClient, SnapshotFetcher};
pub use storage::{
    KeyValueStore, LocalPersistenceStore, MemoryStore, OpenStore, SqliteStore, StorageError,
    StorageResult,
};
pub use workspace::{DiagramWorkspace, Workspace};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
