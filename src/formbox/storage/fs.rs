use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{EntityId, MetaStorage};
use crate::error::{FormError, Result};

const DATA_FILENAME: &str = "meta.json";

type MetaMap = HashMap<EntityId, HashMap<String, Vec<Value>>>;

/// File-backed meta storage. All values live in a single `meta.json`
/// under the root directory, keyed by entity id and storage key.
///
/// Loads and saves the whole map per call; intended for small standalone
/// deployments and tooling, not high-traffic hosts.
pub struct FileMetaStore {
    root: PathBuf,
}

impl FileMetaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn data_file(&self) -> PathBuf {
        self.root.join(DATA_FILENAME)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(FormError::Io)?;
        }
        Ok(())
    }

    fn load(&self) -> Result<MetaMap> {
        let data_file = self.data_file();
        if !data_file.exists() {
            return Ok(MetaMap::new());
        }
        let content = fs::read_to_string(data_file).map_err(FormError::Io)?;
        let meta: MetaMap = serde_json::from_str(&content).map_err(FormError::Serialization)?;
        Ok(meta)
    }

    fn save(&self, meta: &MetaMap) -> Result<()> {
        self.ensure_dir()?;
        let content = serde_json::to_string_pretty(meta).map_err(FormError::Serialization)?;
        fs::write(self.data_file(), content).map_err(FormError::Io)?;
        Ok(())
    }

    fn mutate<F>(&mut self, entity: EntityId, key: &str, apply: F) -> Result<()>
    where
        F: FnOnce(&mut HashMap<String, Vec<Value>>, &str),
    {
        let mut meta = self.load()?;
        apply(meta.entry(entity).or_default(), key);
        self.save(&meta)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl MetaStorage for FileMetaStore {
    fn get_values(&self, entity: EntityId, key: &str) -> Result<Vec<Value>> {
        let meta = self.load()?;
        Ok(meta
            .get(&entity)
            .and_then(|keys| keys.get(key))
            .cloned()
            .unwrap_or_default())
    }

    fn set_single_value(&mut self, entity: EntityId, key: &str, value: Value) -> Result<()> {
        self.mutate(entity, key, |keys, key| {
            keys.insert(key.to_string(), vec![value]);
        })
    }

    fn add_value(&mut self, entity: EntityId, key: &str, value: Value) -> Result<()> {
        self.mutate(entity, key, |keys, key| {
            keys.entry(key.to_string()).or_default().push(value);
        })
    }

    fn delete_values(&mut self, entity: EntityId, key: &str) -> Result<()> {
        self.mutate(entity, key, |keys, key| {
            keys.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn values_survive_a_store_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = FileMetaStore::new(dir.path());
            store.set_single_value(7, "box_color", json!("teal")).unwrap();
            store.add_value(7, "box_size", json!("s")).unwrap();
            store.add_value(7, "box_size", json!("m")).unwrap();
        }
        let store = FileMetaStore::new(dir.path());
        assert_eq!(store.get_values(7, "box_color").unwrap(), vec![json!("teal")]);
        assert_eq!(
            store.get_values(7, "box_size").unwrap(),
            vec![json!("s"), json!("m")]
        );
    }

    #[test]
    fn missing_root_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileMetaStore::new(dir.path().join("never-created"));
        assert!(store.get_values(1, "k").unwrap().is_empty());
    }

    #[test]
    fn delete_values_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileMetaStore::new(dir.path());
        store.add_value(1, "k", json!("x")).unwrap();
        store.delete_values(1, "k").unwrap();
        let reopened = FileMetaStore::new(dir.path());
        assert!(reopened.get_values(1, "k").unwrap().is_empty());
    }
}
