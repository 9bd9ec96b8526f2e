//! # API Facade
//!
//! [`MetaboxApi`] bundles the factory and the collaborator set behind one
//! entry point, so hosting code wires everything once and then only deals
//! with definitions and submissions. The facade holds no business logic:
//! it dispatches to the operation modules and returns their structured
//! results.
//!
//! Generic over every collaborator, so production hosts plug in their own
//! storage/token/upload backends and tests run entirely in memory.

use crate::error::Result;
use crate::factory::NodeFactory;
use crate::hooks::MetaboxHooks;
use crate::metabox::{self, MetaboxDefinition, SaveOutcome, Submission};
use crate::node::Node;
use crate::security::{Capabilities, TokenProvider};
use crate::storage::{EntityId, MetaStorage};
use crate::upload::UploadHandler;

pub struct MetaboxApi<S, T, C, U, H> {
    factory: NodeFactory,
    storage: S,
    tokens: T,
    capabilities: C,
    uploads: U,
    hooks: H,
}

impl<S, T, C, U, H> MetaboxApi<S, T, C, U, H>
where
    S: MetaStorage,
    T: TokenProvider,
    C: Capabilities,
    U: UploadHandler,
    H: MetaboxHooks,
{
    /// Wire the collaborator set with the default factory registry.
    pub fn new(storage: S, tokens: T, capabilities: C, uploads: U, hooks: H) -> Self {
        Self {
            factory: NodeFactory::with_defaults(),
            storage,
            tokens,
            capabilities,
            uploads,
            hooks,
        }
    }

    /// Swap in a custom factory registry (extra classes or handlers).
    pub fn with_factory(mut self, factory: NodeFactory) -> Self {
        self.factory = factory;
        self
    }

    pub fn factory(&self) -> &NodeFactory {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut NodeFactory {
        &mut self.factory
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Build the bound form tree for one entity.
    pub fn render(&self, metabox: &dyn MetaboxDefinition, entity_id: EntityId) -> Result<Node> {
        metabox::render::run(
            metabox,
            &self.factory,
            &self.storage,
            &self.tokens,
            &self.hooks,
            entity_id,
        )
    }

    /// Process one submission against a metabox definition.
    pub fn save(
        &mut self,
        metabox: &dyn MetaboxDefinition,
        submission: &Submission,
    ) -> Result<SaveOutcome> {
        metabox::save::run(
            metabox,
            &self.factory,
            &mut self.storage,
            &self.tokens,
            &self.capabilities,
            &mut self.uploads,
            &self.hooks,
            submission,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::NoHooks;
    use crate::metabox::fixtures::{config, AllowAll, ColorBox, NoUploads, StaticTokens};
    use crate::storage::memory::InMemoryMetaStore;
    use serde_json::json;

    #[test]
    fn render_and_save_round_trip_through_the_facade() {
        let mut api = MetaboxApi::new(
            InMemoryMetaStore::new(),
            StaticTokens::for_metabox("box"),
            AllowAll,
            NoUploads,
            NoHooks,
        );

        let submission = Submission::new(
            1,
            "post",
            config(json!({
                "box_nonce": "tok-1",
                "box_metabox": {"color": "teal"}
            })),
        );
        assert!(api.save(&ColorBox, &submission).unwrap().was_saved());

        let form = api.render(&ColorBox, 1).unwrap();
        assert_eq!(form.children()[0].value(), Some(&json!("teal")));
    }

    #[test]
    fn custom_factory_classes_are_available_to_definitions() {
        let mut api = MetaboxApi::new(
            InMemoryMetaStore::new(),
            StaticTokens::for_metabox("box"),
            AllowAll,
            NoUploads,
            NoHooks,
        );
        api.factory_mut()
            .register_class("swatch", || Node::control(crate::node::ControlKind::Text));
        let node = api.factory().make("swatch", &config(json!({"name": "c"}))).unwrap();
        assert_eq!(node.name(), Some("c"));
    }
}
