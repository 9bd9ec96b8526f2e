//! # Meta Storage
//!
//! The persistence collaborator behind the metabox binder. The host CMS
//! owns the real store; this crate only assumes the [`MetaStorage`]
//! contract and ships two implementations:
//!
//! - [`fs::FileMetaStore`]: JSON-file-backed storage under a root
//!   directory, for standalone use.
//! - [`memory::InMemoryMetaStore`]: in-memory storage for testing.
//!
//! A key may hold several stored values; their order across calls is not
//! guaranteed by the contract, and the binder never relies on it.

use serde_json::Value;

use crate::error::Result;

pub mod fs;
pub mod memory;

/// Numeric identifier of the entity (post, page, …) the values hang off.
pub type EntityId = u64;

/// Abstract interface for per-entity, multi-value meta storage.
pub trait MetaStorage {
    /// All stored values for a key, empty when none exist.
    fn get_values(&self, entity: EntityId, key: &str) -> Result<Vec<Value>>;

    /// Overwrite the key with exactly one value.
    fn set_single_value(&mut self, entity: EntityId, key: &str, value: Value) -> Result<()>;

    /// Append one more value under the key.
    fn add_value(&mut self, entity: EntityId, key: &str, value: Value) -> Result<()>;

    /// Remove every stored value under the key.
    fn delete_values(&mut self, entity: EntityId, key: &str) -> Result<()>;
}
