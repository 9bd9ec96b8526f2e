//! Extensibility hooks around the metabox render and save paths.
//!
//! Hook points receive and return values explicitly — a hook that wants to
//! adjust a field or the data map returns the adjusted copy; nothing is
//! mutated through aliasing. Call order on save is fixed: `filter_data`,
//! then `before_update`, then persistence, then `after_update`.

use serde_json::{Map, Value};

use crate::node::Node;
use crate::storage::EntityId;

/// Observer/filter points keyed by metabox id. All methods default to
/// no-ops so implementors override only what they need.
pub trait MetaboxHooks {
    /// Called for each top-level field after values are bound on render.
    fn visit_field(&self, _metabox_id: &str, field: Node) -> Node {
        field
    }

    /// Last chance to adjust the data map before persistence.
    fn filter_data(&self, _metabox_id: &str, data: Map<String, Value>) -> Map<String, Value> {
        data
    }

    /// Observation point immediately before values are written.
    fn before_update(&self, _metabox_id: &str, _data: &Map<String, Value>, _entity: EntityId) {}

    /// Observation point immediately after values are written.
    fn after_update(&self, _metabox_id: &str, _data: &Map<String, Value>, _entity: EntityId) {}
}

/// The default: observe nothing, change nothing.
pub struct NoHooks;

impl MetaboxHooks for NoHooks {}
