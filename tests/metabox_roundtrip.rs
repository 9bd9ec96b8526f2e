//! End-to-end: stored values flow into a rendered field tree, submitted
//! payloads flow back into storage, and gated submissions touch nothing.

use formbox::api::MetaboxApi;
use formbox::error::Result;
use formbox::factory::NodeFactory;
use formbox::hooks::NoHooks;
use formbox::metabox::{MetaboxDefinition, SaveOutcome, SkipReason, Submission};
use formbox::node::Node;
use formbox::security::{Capabilities, TokenProvider};
use formbox::storage::memory::InMemoryMetaStore;
use formbox::storage::{EntityId, MetaStorage};
use formbox::upload::{UploadHandler, UploadedFile};
use serde_json::{json, Map, Value};

struct ColorBox;

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
        let config: Map<String, Value> = match json!({"name": "color"}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        Ok(vec![factory.make("input:text", &config)?])
    }
}

struct FixedTokens;

impl TokenProvider for FixedTokens {
    fn issue(&self, _scope: &str) -> String {
        "valid-token".to_string()
    }

    fn verify(&self, token: &str, scope: &str) -> bool {
        token == "valid-token" && scope == "box_metabox"
    }
}

struct AllowAll;

impl Capabilities for AllowAll {
    fn actor_can(&self, _capability: &str, _entity: EntityId) -> bool {
        true
    }
}

struct NoUploads;

impl UploadHandler for NoUploads {
    fn handle_upload(&mut self, file: &UploadedFile) -> Result<Value> {
        panic!("unexpected upload {}", file.name);
    }
}

/// Counts mutating persistence calls so gated paths can prove they did
/// nothing.
#[derive(Default)]
struct CountingStore {
    inner: InMemoryMetaStore,
    writes: usize,
}

impl MetaStorage for CountingStore {
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

fn api_with(store: CountingStore) -> MetaboxApi<CountingStore, FixedTokens, AllowAll, NoUploads, NoHooks> {
    MetaboxApi::new(store, FixedTokens, AllowAll, NoUploads, NoHooks)
}

fn payload(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

#[test]
fn multi_value_fields_render_as_a_sequence() {
    let mut store = CountingStore::default();
    store.add_value(1, "box_color", json!("x")).unwrap();
    store.add_value(1, "box_color", json!("y")).unwrap();

    let api = api_with(store);
    let form = api.render(&ColorBox, 1).unwrap();

    let field = &form.children()[0];
    assert_eq!(field.value(), Some(&json!(["x", "y"])));
    assert_eq!(field.name(), Some("box_metabox[color]"));
}

#[test]
fn submitting_a_scalar_replaces_all_stored_values() {
    let mut store = CountingStore::default();
    store.add_value(1, "box_color", json!("x")).unwrap();
    store.add_value(1, "box_color", json!("y")).unwrap();

    let mut api = api_with(store);
    let submission = Submission::new(
        1,
        "post",
        payload(json!({
            "box_nonce": "valid-token",
            "box_metabox": {"color": "z"}
        })),
    );

    let outcome = api.save(&ColorBox, &submission).unwrap();
    assert!(outcome.was_saved());
    assert_eq!(
        api.storage().get_values(1, "box_color").unwrap(),
        vec![json!("z")]
    );
}

#[test]
fn omitting_a_field_deletes_its_stored_values() {
    let mut store = CountingStore::default();
    store.add_value(1, "box_color", json!("x")).unwrap();

    let mut api = api_with(store);
    let submission = Submission::new(
        1,
        "post",
        payload(json!({
            "box_nonce": "valid-token",
            "box_metabox": {"unrelated": "v"}
        })),
    );

    // "unrelated" has no matching field, so the only effect is clearing
    // the absent "color"
    api.save(&ColorBox, &submission).unwrap();
    assert!(api.storage().get_values(1, "box_color").unwrap().is_empty());
}

#[test]
fn autosave_submissions_perform_zero_persistence_calls() {
    let mut api = api_with(CountingStore::default());
    let submission = Submission::new(
        1,
        "post",
        payload(json!({
            "box_nonce": "valid-token",
            "box_metabox": {"color": "z"}
        })),
    )
    .autosave();

    let outcome = api.save(&ColorBox, &submission).unwrap();
    assert_eq!(outcome, SaveOutcome::Skipped(SkipReason::Autosave));
    assert_eq!(api.storage().writes, 0);
}

#[test]
fn rendered_forms_carry_a_verifiable_token() {
    let api = api_with(CountingStore::default());
    let form = api.render(&ColorBox, 1).unwrap();

    let token_field = form
        .children()
        .iter()
        .find(|node| node.name() == Some("box_nonce"))
        .expect("token control present");
    let token = token_field.value().and_then(Value::as_str).unwrap();
    assert!(FixedTokens.verify(token, "box_metabox"));
}

#[test]
fn render_save_render_round_trip() {
    let mut api = api_with(CountingStore::default());

    let submission = Submission::new(
        1,
        "post",
        payload(json!({
            "box_nonce": "valid-token",
            "box_metabox": {"color": "teal"}
        })),
    );
    api.save(&ColorBox, &submission).unwrap();

    let form = api.render(&ColorBox, 1).unwrap();
    let rendered = form.render();
    assert!(rendered.contains(r#"value="teal""#));
    assert!(rendered.contains(r#"name="box_metabox[color]""#));
}
