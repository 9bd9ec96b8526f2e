//! # Node Model
//!
//! A form tree is built from three node variants, each composing a subset
//! of independent capabilities:
//!
//! - [`Element`] — a markup container (div, fieldset, …) with attributes,
//!   text content and owned children.
//! - [`Control`] — a leaf form control (input, textarea, select) with
//!   attributes, a name and a value; never has children.
//! - [`Component`] — a programmatic node with properties and text content;
//!   it carries a name/label/value but no global attributes.
//!
//! Capabilities are small single-purpose traits ([`HasAttributes`],
//! [`HasProperties`], [`HasChildren`], [`Named`], [`HasValue`]) implemented
//! per variant. The [`Node`] enum tags the variant and delegates, so callers
//! can ask a node for a capability without runtime type probing; asking for
//! a capability the variant does not declare is a hard error.
//!
//! Children are exclusively owned by their parent. A tree is built by one
//! render or submit call and discarded with it; nothing here is shared.

use serde_json::{Map, Value};

use crate::error::{FormError, Result};
use crate::helpers::strings::escape_attr;

pub mod component;
pub mod control;
pub mod element;

pub use component::Component;
pub use control::{Control, ControlKind};
pub use element::{Element, ElementTag};

/// Attribute names accepted by every attribute-bearing node in addition to
/// its own declared list. `data-*` and `aria-*` prefixes are also accepted.
pub const GLOBAL_ATTRIBUTES: &[&str] = &["id", "class", "style", "title"];

fn name_is_declared(declared: &[&str], name: &str) -> bool {
    declared.contains(&name)
        || GLOBAL_ATTRIBUTES.contains(&name)
        || name.starts_with("data-")
        || name.starts_with("aria-")
}

/// Insertion-ordered attribute storage with a declared-allowed name list.
#[derive(Debug, Clone)]
pub struct AttributeStore {
    owner: &'static str,
    declared: &'static [&'static str],
    values: Map<String, Value>,
}

impl AttributeStore {
    pub fn new(owner: &'static str, declared: &'static [&'static str]) -> Self {
        Self {
            owner,
            declared,
            values: Map::new(),
        }
    }

    /// Assign an attribute. Undeclared names are rejected loudly.
    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        if !name_is_declared(self.declared, name) {
            return Err(FormError::UnsupportedAttribute {
                node: self.owner.to_string(),
                name: name.to_string(),
            });
        }
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    /// Assign an attribute the owner is known to declare, bypassing the
    /// list check. Used by owners for their own fixed attributes (`type`,
    /// `name`, `value`).
    pub(crate) fn set_unchecked(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Render assigned attributes as ` key="escaped"` pairs in insertion
    /// order. Boolean true renders bare, boolean false and null are omitted.
    pub fn render(&self) -> String {
        self.render_except(&[])
    }

    pub fn render_except(&self, skip: &[&str]) -> String {
        let mut out = String::new();
        for (name, value) in &self.values {
            if skip.contains(&name.as_str()) {
                continue;
            }
            match value {
                Value::Bool(true) => {
                    out.push(' ');
                    out.push_str(name);
                }
                Value::Bool(false) | Value::Null => {}
                Value::String(s) => {
                    out.push_str(&format!(" {}=\"{}\"", name, escape_attr(s)));
                }
                Value::Number(n) => {
                    out.push_str(&format!(" {}=\"{}\"", name, n));
                }
                other => {
                    out.push_str(&format!(" {}=\"{}\"", name, escape_attr(&other.to_string())));
                }
            }
        }
        out
    }
}

/// Key/value storage for component configuration. Same contract as
/// attributes but never rendered to markup, and the namespace is open —
/// concrete components differ in which properties they consume.
#[derive(Debug, Clone, Default)]
pub struct PropertyStore {
    values: Map<String, Value>,
}

impl PropertyStore {
    pub fn set(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }
}

/// Attribute storage and rendering.
pub trait HasAttributes {
    fn attributes(&self) -> &AttributeStore;
    fn attributes_mut(&mut self) -> &mut AttributeStore;

    fn set_attribute(&mut self, name: &str, value: Value) -> Result<&mut Self>
    where
        Self: Sized,
    {
        self.attributes_mut().set(name, value)?;
        Ok(self)
    }

    fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes().get(name)
    }

    fn render_attributes(&self) -> String {
        self.attributes().render()
    }
}

/// Property storage, consumed programmatically.
pub trait HasProperties {
    fn properties(&self) -> &PropertyStore;
    fn properties_mut(&mut self) -> &mut PropertyStore;

    fn set_property(&mut self, name: &str, value: Value) -> &mut Self
    where
        Self: Sized,
    {
        self.properties_mut().set(name, value);
        self
    }

    fn property(&self, name: &str) -> Option<&Value> {
        self.properties().get(name)
    }
}

/// Ordered, exclusively-owned child storage.
pub trait HasChildren {
    fn append_child(&mut self, child: Node) -> &mut Self
    where
        Self: Sized;

    fn children(&self) -> &[Node];
    fn children_mut(&mut self) -> &mut [Node];
}

/// Name and label handling for form-bound nodes. When the node also has an
/// attribute store, the name lives in the `name` attribute so there is a
/// single source of truth.
pub trait Named {
    fn set_name(&mut self, name: &str);
    fn name(&self) -> Option<&str>;
    fn set_label(&mut self, label: &str);
    fn label(&self) -> &str;
}

/// Value binding for form-bound nodes.
pub trait HasValue {
    fn set_value(&mut self, value: Value);
    fn value(&self) -> Option<&Value>;
}

/// A unit in the declarative tree: the variant tags its capability set.
#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Control(Control),
    Component(Component),
}

impl Node {
    pub fn element(tag: ElementTag) -> Self {
        Node::Element(Element::new(tag))
    }

    pub fn control(kind: ControlKind) -> Self {
        Node::Control(Control::new(kind))
    }

    pub fn component() -> Self {
        Node::Component(Component::new())
    }

    /// Variant name used in capability errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Element(el) => el.tag().tag_name(),
            Node::Control(_) => "control",
            Node::Component(_) => "component",
        }
    }

    fn unsupported(&self, capability: &'static str) -> FormError {
        FormError::UnsupportedCapability {
            node: self.kind_name().to_string(),
            capability,
        }
    }

    /// Whether the binder should recurse into this node instead of binding
    /// it as a leaf field.
    pub fn is_group(&self) -> bool {
        matches!(self, Node::Element(el) if el.tag() == ElementTag::Fieldset)
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Node::Element(_) => None,
            Node::Control(control) => control.name(),
            Node::Component(component) => component.name(),
        }
    }

    pub fn set_name(&mut self, name: &str) -> Result<()> {
        match self {
            // elements that declare a name attribute (fieldset) accept it,
            // everything else fails the declared-list check
            Node::Element(el) => el.set_attribute("name", Value::String(name.to_string())).map(|_| ()),
            Node::Control(control) => {
                control.set_name(name);
                Ok(())
            }
            Node::Component(component) => {
                component.set_name(name);
                Ok(())
            }
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Node::Element(_) => None,
            Node::Control(control) => Some(control.label()),
            Node::Component(component) => Some(component.label()),
        }
    }

    pub fn set_label(&mut self, label: &str) -> Result<()> {
        match self {
            Node::Element(_) => Err(self.unsupported("labels")),
            Node::Control(control) => {
                control.set_label(label);
                Ok(())
            }
            Node::Component(component) => {
                component.set_label(label);
                Ok(())
            }
        }
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Node::Element(_) => None,
            Node::Control(control) => control.value(),
            Node::Component(component) => component.value(),
        }
    }

    pub fn set_value(&mut self, value: Value) -> Result<()> {
        match self {
            Node::Element(_) => Err(self.unsupported("values")),
            Node::Control(control) => {
                control.set_value(value);
                Ok(())
            }
            Node::Component(component) => {
                component.set_value(value);
                Ok(())
            }
        }
    }

    pub fn set_attribute(&mut self, name: &str, value: Value) -> Result<()> {
        match self {
            Node::Element(el) => el.set_attribute(name, value).map(|_| ()),
            Node::Control(control) => control.set_attribute(name, value).map(|_| ()),
            Node::Component(_) => Err(FormError::UnsupportedAttribute {
                node: "component".to_string(),
                name: name.to_string(),
            }),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        match self {
            Node::Element(el) => el.attribute(name),
            Node::Control(control) => control.attribute(name),
            Node::Component(_) => None,
        }
    }

    pub fn render_attributes(&self) -> String {
        match self {
            Node::Element(el) => el.render_attributes(),
            Node::Control(control) => control.render_attributes(),
            Node::Component(_) => String::new(),
        }
    }

    pub fn set_property(&mut self, name: &str, value: Value) -> Result<()> {
        match self {
            Node::Component(component) => {
                component.set_property(name, value);
                Ok(())
            }
            _ => Err(self.unsupported("properties")),
        }
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        match self {
            Node::Component(component) => component.property(name),
            _ => None,
        }
    }

    pub fn set_text_content(&mut self, text: &str) -> Result<()> {
        match self {
            Node::Element(el) => {
                el.set_text_content(text);
                Ok(())
            }
            Node::Component(component) => {
                component.set_text_content(text);
                Ok(())
            }
            Node::Control(_) => Err(self.unsupported("text content")),
        }
    }

    pub fn append_child(&mut self, child: Node) -> Result<()> {
        match self {
            Node::Element(el) => {
                el.append_child(child);
                Ok(())
            }
            _ => Err(self.unsupported("children")),
        }
    }

    pub fn add_option(&mut self, value: &str, label: &str) -> Result<()> {
        match self {
            Node::Control(control) if control.kind() == ControlKind::Select => {
                control.add_option(value, label);
                Ok(())
            }
            _ => Err(self.unsupported("options")),
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element(el) => el.children(),
            _ => &[],
        }
    }

    pub fn children_mut(&mut self) -> &mut [Node] {
        match self {
            Node::Element(el) => el.children_mut(),
            _ => &mut [],
        }
    }

    /// Render the node to markup. Components render their text content
    /// only; anything richer is a view concern.
    pub fn render(&self) -> String {
        match self {
            Node::Element(el) => el.render(),
            Node::Control(control) => control.render(),
            Node::Component(component) => component.render(),
        }
    }
}
