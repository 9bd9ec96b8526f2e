//! Programmatic components.
//!
//! Components take part in the form tree as named, valued nodes, but hold
//! configuration in properties rather than global attributes, and render
//! nothing beyond their text content. How a concrete component turns its
//! properties into UI is a presentation concern outside this crate.

use serde_json::Value;

use super::{HasProperties, HasValue, Named, PropertyStore};

#[derive(Debug, Clone, Default)]
pub struct Component {
    name: String,
    label: String,
    text_content: String,
    properties: PropertyStore,
    value: Option<Value>,
}

impl Component {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_text_content(&mut self, text: &str) -> &mut Self {
        self.text_content = text.to_string();
        self
    }

    pub fn text_content(&self) -> &str {
        &self.text_content
    }

    pub fn render(&self) -> String {
        self.text_content.clone()
    }
}

impl Named for Component {
    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn name(&self) -> Option<&str> {
        if self.name.is_empty() {
            None
        } else {
            Some(&self.name)
        }
    }

    fn set_label(&mut self, label: &str) {
        self.label = label.to_string();
    }

    fn label(&self) -> &str {
        &self.label
    }
}

impl HasProperties for Component {
    fn properties(&self) -> &PropertyStore {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut PropertyStore {
        &mut self.properties
    }
}

impl HasValue for Component {
    fn set_value(&mut self, value: Value) {
        self.value = Some(value);
    }

    fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }
}
