use std::collections::HashMap;

use serde_json::Value;

use super::{EntityId, MetaStorage};
use crate::error::Result;

/// In-memory storage for testing and development.
/// Does NOT persist data.
#[derive(Debug, Default)]
pub struct InMemoryMetaStore {
    values: HashMap<(EntityId, String), Vec<Value>>,
}

impl InMemoryMetaStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetaStorage for InMemoryMetaStore {
    fn get_values(&self, entity: EntityId, key: &str) -> Result<Vec<Value>> {
        Ok(self
            .values
            .get(&(entity, key.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    fn set_single_value(&mut self, entity: EntityId, key: &str, value: Value) -> Result<()> {
        self.values.insert((entity, key.to_string()), vec![value]);
        Ok(())
    }

    fn add_value(&mut self, entity: EntityId, key: &str, value: Value) -> Result<()> {
        self.values
            .entry((entity, key.to_string()))
            .or_default()
            .push(value);
        Ok(())
    }

    fn delete_values(&mut self, entity: EntityId, key: &str) -> Result<()> {
        self.values.remove(&(entity, key.to_string()));
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;

    /// Wraps a store and counts every mutating call, so tests can assert
    /// that a code path performed zero persistence.
    #[derive(Debug, Default)]
    pub struct RecordingStore {
        pub inner: InMemoryMetaStore,
        pub writes: usize,
    }

    impl RecordingStore {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl MetaStorage for RecordingStore {
        fn get_values(&self, entity: EntityId, key: &str) -> Result<Vec<Value>> {
            self.inner.get_values(entity, key)
        }

        fn set_single_value(&mut self, entity: EntityId, key: &str, value: Value) -> Result<()> {
            self.writes += 1;
            self.inner.set_single_value(entity, key, value)
        }

        fn add_value(&mut self, entity: EntityId, key: &str, value: Value) -> Result<()> {
            self.writes += 1;
            self.inner.add_value(entity, key, value)
        }

        fn delete_values(&mut self, entity: EntityId, key: &str) -> Result<()> {
            self.writes += 1;
            self.inner.delete_values(entity, key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_single_value_overwrites_previous_values() {
        let mut store = InMemoryMetaStore::new();
        store.add_value(1, "box_color", json!("x")).unwrap();
        store.add_value(1, "box_color", json!("y")).unwrap();
        store.set_single_value(1, "box_color", json!("z")).unwrap();
        assert_eq!(store.get_values(1, "box_color").unwrap(), vec![json!("z")]);
    }

    #[test]
    fn values_are_scoped_per_entity() {
        let mut store = InMemoryMetaStore::new();
        store.set_single_value(1, "k", json!("one")).unwrap();
        store.set_single_value(2, "k", json!("two")).unwrap();
        assert_eq!(store.get_values(1, "k").unwrap(), vec![json!("one")]);
        assert_eq!(store.get_values(2, "k").unwrap(), vec![json!("two")]);
    }

    #[test]
    fn delete_values_clears_the_key() {
        let mut store = InMemoryMetaStore::new();
        store.add_value(1, "k", json!("a")).unwrap();
        store.delete_values(1, "k").unwrap();
        assert!(store.get_values(1, "k").unwrap().is_empty());
    }

    #[test]
    fn missing_key_reads_as_empty() {
        let store = InMemoryMetaStore::new();
        assert!(store.get_values(9, "absent").unwrap().is_empty());
    }
}
