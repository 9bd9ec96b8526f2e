//! Leaf form controls.

use serde_json::Value;

use super::{AttributeStore, HasAttributes, HasValue, Named};
use crate::helpers::strings::escape_attr;

const INPUT_ATTRIBUTES: &[&str] = &[
    "accept",
    "alt",
    "autocomplete",
    "autofocus",
    "checked",
    "disabled",
    "form",
    "formaction",
    "formenctype",
    "formmethod",
    "formnovalidate",
    "formtarget",
    "height",
    "list",
    "max",
    "maxlength",
    "min",
    "multiple",
    "name",
    "pattern",
    "placeholder",
    "readonly",
    "required",
    "size",
    "src",
    "step",
    "type",
    "value",
    "width",
];

// "value" is declared on these too: it is where the bound value lives,
// even though rendering emits it as text content / option selection.
const TEXTAREA_ATTRIBUTES: &[&str] = &[
    "autocomplete",
    "autofocus",
    "cols",
    "dirname",
    "disabled",
    "form",
    "maxlength",
    "minlength",
    "name",
    "placeholder",
    "readonly",
    "required",
    "rows",
    "value",
    "wrap",
];

const SELECT_ATTRIBUTES: &[&str] = &[
    "autocomplete",
    "autofocus",
    "disabled",
    "form",
    "multiple",
    "name",
    "required",
    "size",
    "value",
];

/// The concrete control kinds the factory can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Text,
    Email,
    Number,
    Url,
    Password,
    Checkbox,
    Hidden,
    Textarea,
    Select,
}

impl ControlKind {
    /// The `type` attribute for input-tag kinds; `None` for kinds with
    /// their own tag.
    pub fn input_type(&self) -> Option<&'static str> {
        match self {
            ControlKind::Text => Some("text"),
            ControlKind::Email => Some("email"),
            ControlKind::Number => Some("number"),
            ControlKind::Url => Some("url"),
            ControlKind::Password => Some("password"),
            ControlKind::Checkbox => Some("checkbox"),
            ControlKind::Hidden => Some("hidden"),
            ControlKind::Textarea | ControlKind::Select => None,
        }
    }

    pub fn declared_attributes(&self) -> &'static [&'static str] {
        match self {
            ControlKind::Textarea => TEXTAREA_ATTRIBUTES,
            ControlKind::Select => SELECT_ATTRIBUTES,
            _ => INPUT_ATTRIBUTES,
        }
    }

    fn owner_name(&self) -> &'static str {
        match self {
            ControlKind::Textarea => "textarea",
            ControlKind::Select => "select",
            _ => "input",
        }
    }
}

/// A named, valued leaf control. Name and value live in the attribute
/// store; select options are kept alongside.
#[derive(Debug, Clone)]
pub struct Control {
    kind: ControlKind,
    attributes: AttributeStore,
    label: String,
    options: Vec<(String, String)>,
}

impl Control {
    pub fn new(kind: ControlKind) -> Self {
        let mut attributes = AttributeStore::new(kind.owner_name(), kind.declared_attributes());
        if let Some(input_type) = kind.input_type() {
            attributes.set_unchecked("type", Value::String(input_type.to_string()));
        }
        Self {
            kind,
            attributes,
            label: String::new(),
            options: Vec::new(),
        }
    }

    pub fn kind(&self) -> ControlKind {
        self.kind
    }

    /// Add a select option as a value/label pair, preserving order.
    pub fn add_option(&mut self, value: &str, label: &str) -> &mut Self {
        self.options.push((value.to_string(), label.to_string()));
        self
    }

    pub fn options(&self) -> &[(String, String)] {
        &self.options
    }

    fn value_text(&self) -> String {
        match self.value() {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }

    fn value_matches(&self, candidate: &str) -> bool {
        match self.value() {
            Some(Value::String(s)) => s == candidate,
            Some(Value::Number(n)) => n.to_string() == candidate,
            Some(Value::Array(items)) => items
                .iter()
                .any(|item| item.as_str().map(|s| s == candidate).unwrap_or(false)),
            _ => false,
        }
    }

    pub fn render(&self) -> String {
        match self.kind {
            ControlKind::Textarea => format!(
                "<textarea{}>{}</textarea>",
                self.attributes.render_except(&["value"]),
                escape_attr(&self.value_text())
            ),
            ControlKind::Select => {
                let mut out = format!("<select{}>", self.attributes.render_except(&["value"]));
                for (value, label) in &self.options {
                    let selected = if self.value_matches(value) {
                        " selected"
                    } else {
                        ""
                    };
                    out.push_str(&format!(
                        "<option value=\"{}\"{}>{}</option>",
                        escape_attr(value),
                        selected,
                        escape_attr(label)
                    ));
                }
                out.push_str("</select>");
                out
            }
            _ => format!("<input{}>", self.attributes.render()),
        }
    }
}

impl HasAttributes for Control {
    fn attributes(&self) -> &AttributeStore {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut AttributeStore {
        &mut self.attributes
    }
}

impl Named for Control {
    fn set_name(&mut self, name: &str) {
        self.attributes
            .set_unchecked("name", Value::String(name.to_string()));
    }

    fn name(&self) -> Option<&str> {
        self.attributes.get("name").and_then(Value::as_str)
    }

    fn set_label(&mut self, label: &str) {
        self.label = label.to_string();
    }

    fn label(&self) -> &str {
        &self.label
    }
}

impl HasValue for Control {
    fn set_value(&mut self, value: Value) {
        self.attributes.set_unchecked("value", value);
    }

    fn value(&self) -> Option<&Value> {
        self.attributes.get("value")
    }
}
