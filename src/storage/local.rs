//! Local persistence of serialized diagrams
//!
//! Local storage is untrusted: it may hold entries written by other
//! versions of the editor or by unrelated code. Reads therefore never fail;
//! a missing key produces a notice and anything undecodable is dropped
//! quietly.

use super::traits::{KeyValueStore, StorageResult};
use crate::diagram::SerializedDiagram;
use crate::fragment::{looks_prefixed, FragmentReference};
use crate::keygen::{generate_key, OsRandom, RandomSource};
use crate::notify::{LogNotifier, Notice, Notifier};
use std::sync::Arc;
use tracing::debug;

/// Reads and writes diagrams in a key-value store
#[derive(Clone)]
pub struct LocalPersistenceStore {
    store: Arc<dyn KeyValueStore>,
    random: Arc<dyn RandomSource>,
    notifier: Arc<dyn Notifier>,
}

impl LocalPersistenceStore {
    /// Use OS randomness for keys and report notices to the log.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            random: Arc::new(OsRandom),
            notifier: Arc::new(LogNotifier),
        }
    }

    pub fn with_random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Load the diagram stored under `key`.
    ///
    /// Returns `None` when the key is absent (with a notice, unless the key
    /// is really a cloud/resource reference) or the stored value does not
    /// decode.
    pub fn load(&self, key: &str) -> Option<SerializedDiagram> {
        let text = match self.store.get(key) {
            Ok(Some(text)) => text,
            Ok(None) => {
                if !looks_prefixed(key) {
                    self.notifier.notify(Notice::local_not_found(key));
                }
                return None;
            }
            Err(e) => {
                debug!(key, error = %e, "local store read failed");
                return None;
            }
        };

        let value: serde_json::Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(e) => {
                debug!(key, error = %e, "ignoring malformed local entry");
                return None;
            }
        };
        if value.is_null() {
            debug!(key, "ignoring null local entry");
            return None;
        }

        match SerializedDiagram::from_value(value) {
            Ok(diagram) => Some(diagram),
            Err(e) => {
                debug!(key, error = %e, "ignoring undecodable local entry");
                None
            }
        }
    }

    /// Load whatever a fragment's local key names. Other references load
    /// nothing and never touch the store.
    pub fn load_fragment(&self, reference: &FragmentReference) -> Option<SerializedDiagram> {
        reference.local_key().and_then(|key| self.load(key))
    }

    /// Store `diagram` under a fresh random key and return the key.
    ///
    /// No collision check is made; the key space makes one negligible.
    pub fn save(&self, diagram: &SerializedDiagram) -> StorageResult<String> {
        let key = generate_key(self.random.as_ref())?;
        let text = diagram.to_json_string()?;
        self.store.set(&key, &text)?;
        debug!(key = %key, bytes = text.len(), "saved diagram locally");
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::LinkTypeOptions;
    use crate::keygen::FixedRandom;
    use crate::notify::RecordingNotifier;
    use crate::storage::MemoryStore;
    use serde_json::json;

    fn setup() -> (Arc<MemoryStore>, Arc<RecordingNotifier>, LocalPersistenceStore) {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let local = LocalPersistenceStore::new(store.clone())
            .with_random(Arc::new(FixedRandom::constant(0.25)))
            .with_notifier(notifier.clone());
        (store, notifier, local)
    }

    fn sample_diagram() -> SerializedDiagram {
        SerializedDiagram::new(
            json!({ "elements": [{ "@id": "e1", "iri": "ex:Alice" }], "links": [] }),
            vec![LinkTypeOptions::new("ex:knows", true)],
        )
    }

    #[test]
    fn save_then_load_roundtrips() {
        let (_, notifier, local) = setup();
        let diagram = sample_diagram();

        let key = local.save(&diagram).unwrap();
        assert_eq!(key, "4000000000");
        assert_eq!(local.load(&key), Some(diagram));
        assert!(notifier.notices().is_empty());
    }

    #[test]
    fn missing_key_returns_none_with_notice() {
        let (_, notifier, local) = setup();

        assert_eq!(local.load("missing-key"), None);
        assert_eq!(notifier.notices(), vec![Notice::local_not_found("missing-key")]);
    }

    #[test]
    fn missing_prefixed_key_is_quiet() {
        let (_, notifier, local) = setup();

        assert_eq!(local.load("!abc"), None);
        assert_eq!(local.load("r=ex:a"), None);
        assert!(notifier.notices().is_empty());
    }

    #[test]
    fn corrupt_value_returns_none_quietly() {
        let (store, notifier, local) = setup();
        store.set("bad", "{not json").unwrap();
        store.set("null", "null").unwrap();

        assert_eq!(local.load("bad"), None);
        assert_eq!(local.load("null"), None);
        assert!(notifier.notices().is_empty());
    }

    #[test]
    fn broken_envelope_returns_none() {
        let (store, _, local) = setup();
        store.set("k", r#"{"@context": "x", "layoutData": {}, "linkTypeOptions": 5}"#).unwrap();

        assert_eq!(local.load("k"), None);
    }

    #[test]
    fn legacy_value_is_wrapped() {
        let (store, _, local) = setup();
        let legacy = json!({ "cells": [{ "id": "e1", "type": "element", "iri": "ex:Alice" }] });
        store.set("old", &legacy.to_string()).unwrap();

        let diagram = local.load("old").unwrap();
        assert!(diagram.link_type_options.is_empty());
        assert_eq!(diagram.layout_data, legacy);
    }

    #[test]
    fn fragment_gate_skips_non_local_references() {
        let (store, notifier, local) = setup();
        store.set("!abc", &sample_diagram().to_json_string().unwrap()).unwrap();

        assert!(local.load_fragment(&FragmentReference::parse("#!abc")).is_none());
        assert!(local.load_fragment(&FragmentReference::None).is_none());
        assert!(notifier.notices().is_empty());
    }
}
