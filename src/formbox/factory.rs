//! # Node Factory
//!
//! Builds nodes from plain configuration maps. The factory is an explicit
//! registry object: callers populate it once at startup (or start from
//! [`NodeFactory::with_defaults`]) and pass it wherever trees are built —
//! there is no ambient global table. Later registrations for the same key
//! replace earlier ones.
//!
//! Each configuration key maps to an [`ArgumentHandler`] whose dispatch
//! mode controls the fan-out of the value onto the node:
//!
//! - `Single` — apply the value once.
//! - `KeyValue` — the value is a map; apply once per entry, in map order.
//! - `Repeated` — the value is a sequence; apply once per item, in order.
//!   Items shaped `{"class": …, "config": …}` are built recursively before
//!   the applier runs.
//!
//! Unknown configuration keys and unknown node classes are hard errors:
//! they indicate a bug in the calling code, not bad user input.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::{FormError, Result};
use crate::node::{ControlKind, ElementTag, Node};

/// A resolved item of a `Repeated` configuration value.
pub enum FactoryItem {
    /// The item was a `{"class", "config"}` map and has been built.
    Node(Node),
    /// Anything else passes through as raw configuration data.
    Value(Value),
}

/// How a configuration value is split across applier invocations.
pub enum ArgumentHandler {
    Single(fn(&mut Node, &Value) -> Result<()>),
    KeyValue(fn(&mut Node, &str, &Value) -> Result<()>),
    Repeated(fn(&mut Node, FactoryItem) -> Result<()>),
}

/// Registry of node constructors and configuration-key handlers.
pub struct NodeFactory {
    classes: BTreeMap<String, fn() -> Node>,
    handlers: BTreeMap<String, ArgumentHandler>,
}

impl NodeFactory {
    /// An empty registry. Most callers want [`NodeFactory::with_defaults`].
    pub fn new() -> Self {
        Self {
            classes: BTreeMap::new(),
            handlers: BTreeMap::new(),
        }
    }

    /// A registry populated with the standard node classes and the
    /// standard configuration keys.
    pub fn with_defaults() -> Self {
        let mut factory = Self::new();

        factory
            .register_class("div", || Node::element(ElementTag::Div))
            .register_class("span", || Node::element(ElementTag::Span))
            .register_class("label", || Node::element(ElementTag::Label))
            .register_class("fieldset", || Node::element(ElementTag::Fieldset))
            .register_class("input", || Node::control(ControlKind::Text))
            .register_class("input:text", || Node::control(ControlKind::Text))
            .register_class("input:email", || Node::control(ControlKind::Email))
            .register_class("input:number", || Node::control(ControlKind::Number))
            .register_class("input:url", || Node::control(ControlKind::Url))
            .register_class("input:password", || Node::control(ControlKind::Password))
            .register_class("input:checkbox", || Node::control(ControlKind::Checkbox))
            .register_class("input:hidden", || Node::control(ControlKind::Hidden))
            .register_class("textarea", || Node::control(ControlKind::Textarea))
            .register_class("select", || Node::control(ControlKind::Select))
            .register_class("component", Node::component);

        factory
            .register_handler(
                "attributes",
                ArgumentHandler::KeyValue(|node, name, value| {
                    node.set_attribute(name, value.clone())
                }),
            )
            .register_handler(
                "properties",
                ArgumentHandler::KeyValue(|node, name, value| {
                    node.set_property(name, value.clone())
                }),
            )
            .register_handler(
                "options",
                ArgumentHandler::KeyValue(|node, value, label| {
                    let label = label.as_str().ok_or_else(|| {
                        FormError::InvalidFactoryValue("option labels must be strings".to_string())
                    })?;
                    node.add_option(value, label)
                }),
            )
            .register_handler(
                "name",
                ArgumentHandler::Single(|node, value| node.set_name(expect_str("name", value)?)),
            )
            .register_handler(
                "label",
                ArgumentHandler::Single(|node, value| node.set_label(expect_str("label", value)?)),
            )
            .register_handler(
                "value",
                ArgumentHandler::Single(|node, value| node.set_value(value.clone())),
            )
            .register_handler(
                "text_content",
                ArgumentHandler::Single(|node, value| {
                    node.set_text_content(expect_str("text_content", value)?)
                }),
            )
            .register_handler(
                "children",
                ArgumentHandler::Repeated(|node, item| match item {
                    FactoryItem::Node(child) => node.append_child(child),
                    FactoryItem::Value(other) => Err(FormError::InvalidFactoryValue(format!(
                        "children must be class/config maps, got {}",
                        other
                    ))),
                }),
            );

        factory
    }

    pub fn register_class(&mut self, name: &str, constructor: fn() -> Node) -> &mut Self {
        self.classes.insert(name.to_string(), constructor);
        self
    }

    pub fn register_handler(&mut self, key: &str, handler: ArgumentHandler) -> &mut Self {
        self.handlers.insert(key.to_string(), handler);
        self
    }

    /// Instantiate `class` and apply every configuration key. Given the
    /// same registry state and config, the result is structurally
    /// identical on every call.
    pub fn make(&self, class: &str, config: &Map<String, Value>) -> Result<Node> {
        let constructor = self
            .classes
            .get(class)
            .ok_or_else(|| FormError::UnknownNodeClass(class.to_string()))?;
        let mut node = constructor();
        self.apply(&mut node, config)?;
        Ok(node)
    }

    /// Apply a configuration map to an existing node, key by key in map
    /// iteration order.
    pub fn apply(&self, node: &mut Node, config: &Map<String, Value>) -> Result<()> {
        for (key, value) in config {
            let handler = self
                .handlers
                .get(key)
                .ok_or_else(|| FormError::UnknownFactoryArgument(key.clone()))?;
            match handler {
                ArgumentHandler::Single(applier) => applier(node, value)?,
                ArgumentHandler::KeyValue(applier) => {
                    let entries = value.as_object().ok_or_else(|| {
                        FormError::InvalidFactoryValue(format!("\"{}\" expects a map", key))
                    })?;
                    for (entry_key, entry_value) in entries {
                        applier(node, entry_key, entry_value)?;
                    }
                }
                ArgumentHandler::Repeated(applier) => {
                    let items = value.as_array().ok_or_else(|| {
                        FormError::InvalidFactoryValue(format!("\"{}\" expects a sequence", key))
                    })?;
                    for item in items {
                        applier(node, self.resolve_item(item)?)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn resolve_item(&self, item: &Value) -> Result<FactoryItem> {
        if let Some(map) = item.as_object() {
            if let Some(class) = map.get("class").and_then(Value::as_str) {
                let empty = Map::new();
                let config = map.get("config").and_then(Value::as_object).unwrap_or(&empty);
                return Ok(FactoryItem::Node(self.make(class, config)?));
            }
        }
        Ok(FactoryItem::Value(item.clone()))
    }
}

impl Default for NodeFactory {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn expect_str<'a>(key: &str, value: &'a Value) -> Result<&'a str> {
    value.as_str().ok_or_else(|| {
        FormError::InvalidFactoryValue(format!("\"{}\" expects a string", key))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {}", other),
        }
    }

    #[test]
    fn builds_an_input_from_attributes_and_value() {
        let factory = NodeFactory::with_defaults();
        let node = factory
            .make(
                "input:text",
                &config(json!({"attributes": {"class": "a b"}, "value": "x"})),
            )
            .unwrap();
        assert!(node.render_attributes().contains(r#"class="a b""#));
        assert_eq!(node.attribute("value"), Some(&json!("x")));
    }

    #[test]
    fn unknown_configuration_key_is_a_hard_error() {
        let factory = NodeFactory::with_defaults();
        let err = factory
            .make("div", &config(json!({"no_such_key": 1})))
            .unwrap_err();
        assert!(matches!(err, FormError::UnknownFactoryArgument(key) if key == "no_such_key"));
    }

    #[test]
    fn unknown_class_is_a_hard_error() {
        let factory = NodeFactory::with_defaults();
        let err = factory.make("marquee", &Map::new()).unwrap_err();
        assert!(matches!(err, FormError::UnknownNodeClass(class) if class == "marquee"));
    }

    #[test]
    fn children_are_built_recursively_in_order() {
        let factory = NodeFactory::with_defaults();
        let node = factory
            .make(
                "fieldset",
                &config(json!({
                    "name": "address",
                    "children": [
                        {"class": "input:text", "config": {"name": "street"}},
                        {"class": "input:number", "config": {"name": "number"}}
                    ]
                })),
            )
            .unwrap();
        let names: Vec<_> = node.children().iter().filter_map(Node::name).collect();
        assert_eq!(names, ["street", "number"]);
    }

    #[test]
    fn select_options_apply_per_entry() {
        let factory = NodeFactory::with_defaults();
        let node = factory
            .make(
                "select",
                &config(json!({
                    "name": "size",
                    "options": {"s": "Small", "m": "Medium"}
                })),
            )
            .unwrap();
        let rendered = node.render();
        assert!(rendered.contains(r#"<option value="s">Small</option>"#));
        assert!(rendered.contains(r#"<option value="m">Medium</option>"#));
    }

    #[test]
    fn component_properties_dispatch_as_key_value_pairs() {
        let factory = NodeFactory::with_defaults();
        let node = factory
            .make(
                "component",
                &config(json!({
                    "name": "map",
                    "properties": {"lat": -33.45, "zoom": 12}
                })),
            )
            .unwrap();
        assert_eq!(node.property("lat"), Some(&json!(-33.45)));
        assert_eq!(node.property("zoom"), Some(&json!(12)));
    }

    #[test]
    fn later_registration_replaces_earlier_one() {
        let mut factory = NodeFactory::with_defaults();
        factory.register_class("div", || Node::element(ElementTag::Span));
        let node = factory.make("div", &Map::new()).unwrap();
        assert_eq!(node.render(), "<span></span>");
    }

    #[test]
    fn applying_an_attribute_map_to_a_component_fails_loudly() {
        let factory = NodeFactory::with_defaults();
        let err = factory
            .make("component", &config(json!({"attributes": {"class": "x"}})))
            .unwrap_err();
        assert!(matches!(err, FormError::UnsupportedAttribute { .. }));
    }
}
