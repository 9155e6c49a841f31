//! Storage backends for saved diagrams
//!
//! Diagrams are kept as JSON text in a `KeyValueStore`. `SqliteStore` is the
//! persistent backend; `MemoryStore` lives for the process.

mod local;
mod memory;
mod sqlite;
mod traits;

pub use local::LocalPersistenceStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{KeyValueStore, OpenStore, StorageError, StorageResult};
