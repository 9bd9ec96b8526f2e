//! Render path: bind stored values into a field tree and prepare it for
//! submission.

use log::debug;
use serde_json::Value;

use super::{field_key, token_field, token_scope, MetaboxDefinition};
use crate::error::Result;
use crate::factory::NodeFactory;
use crate::hooks::MetaboxHooks;
use crate::node::{Control, ControlKind, Element, ElementTag, HasAttributes, HasChildren, HasValue, Named, Node};
use crate::security::TokenProvider;
use crate::storage::{EntityId, MetaStorage};

/// Build the bound form tree for one entity.
///
/// Every leaf field gets its stored value (scalar when exactly one value
/// exists, the full list when several do) and a rewritten name of the form
/// `{id}_metabox[{name}]`, so submitted data arrives nested under one
/// top-level key. Fieldsets are recursed into. A hidden token control is
/// appended last. The returned root is a `div` with id `{id}-form`;
/// rendering it to markup is the caller's choice.
pub fn run<S, T, H>(
    metabox: &dyn MetaboxDefinition,
    factory: &NodeFactory,
    storage: &S,
    tokens: &T,
    hooks: &H,
    entity_id: EntityId,
) -> Result<Node>
where
    S: MetaStorage,
    T: TokenProvider,
    H: MetaboxHooks,
{
    let mut form = Element::new(ElementTag::Div);
    form.set_attribute("id", Value::String(format!("{}-form", metabox.id())))?;

    for mut field in metabox.fields(factory)? {
        bind_field(metabox, storage, entity_id, &mut field)?;
        let field = hooks.visit_field(metabox.id(), field);
        form.append_child(field);
    }

    let mut token = Control::new(ControlKind::Hidden);
    token.set_name(&token_field(metabox.id()));
    token.set_value(Value::String(tokens.issue(&token_scope(metabox.id()))));
    form.append_child(Node::Control(token));

    Ok(Node::Element(form))
}

fn bind_field<S: MetaStorage>(
    metabox: &dyn MetaboxDefinition,
    storage: &S,
    entity_id: EntityId,
    field: &mut Node,
) -> Result<()> {
    if field.is_group() {
        for child in field.children_mut() {
            bind_field(metabox, storage, entity_id, child)?;
        }
        return Ok(());
    }

    let name = match field.name() {
        Some(name) => name.to_string(),
        None => {
            debug!("metabox {}: skipping unnamed field", metabox.id());
            return Ok(());
        }
    };

    let mut values = storage.get_values(entity_id, &field_key(metabox.id(), &name))?;
    match values.len() {
        0 => {}
        1 => {
            if let Some(value) = values.pop() {
                field.set_value(value)?;
            }
        }
        _ => field.set_value(Value::Array(values))?,
    }

    field.set_name(&format!("{}[{}]", super::payload_key(metabox.id()), name))?;
    Ok(())
}
