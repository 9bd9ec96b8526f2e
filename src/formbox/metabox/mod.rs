//! # Metabox Field Binder
//!
//! A metabox is a named, per-entity-kind group of fields rendered and
//! persisted together. The binder works in two directions:
//!
//! - **Render** ([`render::run`]): walk the field tree, inject stored
//!   values, rewrite field names under the metabox's submission key, and
//!   append a security token field.
//! - **Save** ([`save::run`]): gate the submission (autosave, entity kind,
//!   token, capability, payload presence), clean and sanitize the data,
//!   fold in uploads, and write each field's value back to storage.
//!
//! Both paths are free functions generic over the collaborator traits, so
//! tests run against in-memory doubles. A binder context is transient:
//! built per render or per submission and discarded after.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::factory::NodeFactory;
use crate::helpers::strings::sanitize_key;
use crate::node::Node;
use crate::storage::EntityId;
use crate::upload::UploadedFile;

pub mod render;
pub mod save;

/// Capability checked against the entity before a save is accepted.
pub const EDIT_CAPABILITY: &str = "edit";

/// A metabox: identity, target entity kind, and its field tree.
///
/// `sanitize` is the field-specific cleaning hook run on every submission
/// after empty values are stripped; the default passes data through.
pub trait MetaboxDefinition {
    fn id(&self) -> &str;
    fn title(&self) -> &str;
    fn entity_kind(&self) -> &str;
    fn fields(&self, factory: &NodeFactory) -> Result<Vec<Node>>;

    fn sanitize(&self, data: Map<String, Value>) -> Map<String, Value> {
        data
    }
}

/// Top-level payload key all of a metabox's submitted fields arrive under.
pub fn payload_key(metabox_id: &str) -> String {
    format!("{}_metabox", metabox_id)
}

/// Payload key carrying the submission token.
pub fn token_field(metabox_id: &str) -> String {
    format!("{}_nonce", metabox_id)
}

/// Scope string the token is issued and verified against.
pub fn token_scope(metabox_id: &str) -> String {
    payload_key(metabox_id)
}

/// Storage key for one field: metabox id and field name, sanitized.
pub fn field_key(metabox_id: &str, field_name: &str) -> String {
    sanitize_key(&format!("{}_{}", metabox_id, field_name))
}

/// Why a submission was ignored. These are expected no-ops, not failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Autosave,
    EntityKindMismatch,
    NoPayload,
}

#[derive(Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved { fields_written: usize },
    Skipped(SkipReason),
}

impl SaveOutcome {
    pub fn was_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved { .. })
    }
}

/// One submitted request, as handed over by the hosting layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Submission {
    pub entity_id: EntityId,
    pub entity_kind: String,
    pub is_autosave: bool,
    /// The full submitted data: the metabox payload under
    /// [`payload_key`], the token under [`token_field`].
    pub payload: Map<String, Value>,
    pub files: Vec<UploadedFile>,
}

impl Submission {
    pub fn new(entity_id: EntityId, entity_kind: impl Into<String>, payload: Map<String, Value>) -> Self {
        Self {
            entity_id,
            entity_kind: entity_kind.into(),
            is_autosave: false,
            payload,
            files: Vec::new(),
        }
    }

    pub fn autosave(mut self) -> Self {
        self.is_autosave = true;
        self
    }

    pub fn with_files(mut self, files: Vec<UploadedFile>) -> Self {
        self.files = files;
        self
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::error::FormError;
    use crate::security::{Capabilities, TokenProvider};
    use crate::upload::UploadHandler;
    use serde_json::json;

    pub fn config(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {}", other),
        }
    }

    /// A metabox with a plain field and one fieldset-nested field.
    pub struct ColorBox;

    impl MetaboxDefinition for ColorBox {
        fn id(&self) -> &str {
            "box"
        }

        fn title(&self) -> &str {
            "Colors"
        }

        fn entity_kind(&self) -> &str {
            "post"
        }

        fn fields(&self, factory: &NodeFactory) -> Result<Vec<Node>> {
            Ok(vec![
                factory.make("input:text", &config(json!({"name": "color"})))?,
                factory.make(
                    "fieldset",
                    &config(json!({
                        "name": "details",
                        "children": [
                            {"class": "input:text", "config": {"name": "size"}}
                        ]
                    })),
                )?,
            ])
        }
    }

    /// Accepts exactly the token it was built with, for any scope match.
    pub struct StaticTokens {
        pub token: String,
        pub scope: String,
    }

    impl StaticTokens {
        pub fn for_metabox(metabox_id: &str) -> Self {
            Self {
                token: "tok-1".to_string(),
                scope: token_scope(metabox_id),
            }
        }
    }

    impl TokenProvider for StaticTokens {
        fn issue(&self, _scope: &str) -> String {
            self.token.clone()
        }

        fn verify(&self, token: &str, scope: &str) -> bool {
            token == self.token && scope == self.scope
        }
    }

    pub struct AllowAll;

    impl Capabilities for AllowAll {
        fn actor_can(&self, _capability: &str, _entity: EntityId) -> bool {
            true
        }
    }

    pub struct DenyAll;

    impl Capabilities for DenyAll {
        fn actor_can(&self, _capability: &str, _entity: EntityId) -> bool {
            false
        }
    }

    /// Fails the submission if any upload reaches it.
    pub struct NoUploads;

    impl UploadHandler for NoUploads {
        fn handle_upload(&mut self, file: &UploadedFile) -> Result<Value> {
            Err(FormError::Upload(format!("unexpected upload {}", file.name)))
        }
    }
}
