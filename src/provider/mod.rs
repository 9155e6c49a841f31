//! External resolution providers
//!
//! The knowledge backend is a collaborator: the pipeline only needs its two
//! batch lookups. Query generation for any particular backend lives
//! elsewhere.

mod fixed;
mod traits;
mod types;

pub use fixed::{ProviderCall, ProviderData, StaticProvider};
pub use traits::{ProviderError, ResolutionProvider};
pub use types::{EntityRecord, RelationRecord, RelationTypeId};
