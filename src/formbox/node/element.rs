//! Markup container elements.

use super::{AttributeStore, HasAttributes, HasChildren, Node};

/// The container tags the tree builder knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementTag {
    Div,
    Span,
    Label,
    Fieldset,
}

impl ElementTag {
    pub fn tag_name(&self) -> &'static str {
        match self {
            ElementTag::Div => "div",
            ElementTag::Span => "span",
            ElementTag::Label => "label",
            ElementTag::Fieldset => "fieldset",
        }
    }

    /// Tag-specific attributes, on top of the global handful.
    pub fn declared_attributes(&self) -> &'static [&'static str] {
        match self {
            ElementTag::Label => &["for", "form"],
            ElementTag::Fieldset => &["disabled", "form", "name"],
            _ => &[],
        }
    }
}

/// A markup container: attributes, text content and owned children.
#[derive(Debug, Clone)]
pub struct Element {
    tag: ElementTag,
    attributes: AttributeStore,
    text_content: String,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: ElementTag) -> Self {
        Self {
            tag,
            attributes: AttributeStore::new(tag.tag_name(), tag.declared_attributes()),
            text_content: String::new(),
            children: Vec::new(),
        }
    }

    pub fn tag(&self) -> ElementTag {
        self.tag
    }

    pub fn set_text_content(&mut self, text: &str) -> &mut Self {
        self.text_content = text.to_string();
        self
    }

    pub fn text_content(&self) -> &str {
        &self.text_content
    }

    /// Open tag, text content, rendered children, close tag. Text content
    /// is emitted verbatim; only attribute values are escaped.
    pub fn render(&self) -> String {
        let mut out = format!("<{}{}>", self.tag.tag_name(), self.render_attributes());
        out.push_str(&self.text_content);
        for child in &self.children {
            out.push_str(&child.render());
        }
        out.push_str(&format!("</{}>", self.tag.tag_name()));
        out
    }
}

impl HasAttributes for Element {
    fn attributes(&self) -> &AttributeStore {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut AttributeStore {
        &mut self.attributes
    }
}

impl HasChildren for Element {
    fn append_child(&mut self, child: Node) -> &mut Self {
        self.children.push(child);
        self
    }

    fn children(&self) -> &[Node] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut [Node] {
        &mut self.children
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Control, ControlKind, Named};
    use serde_json::json;

    #[test]
    fn renders_nested_children_in_order() {
        let mut root = Element::new(ElementTag::Div);
        root.set_attribute("class", json!("row")).unwrap();

        let mut label = Element::new(ElementTag::Label);
        label.set_text_content("Color");

        let mut input = Control::new(ControlKind::Text);
        input.set_name("color");

        root.append_child(Node::Element(label));
        root.append_child(Node::Control(input));

        assert_eq!(
            root.render(),
            r#"<div class="row"><label>Color</label><input type="text" name="color"></div>"#
        );
    }

    #[test]
    fn text_content_precedes_children() {
        let mut el = Element::new(ElementTag::Span);
        el.set_text_content("lead ");
        el.append_child(Node::element(ElementTag::Span));
        assert_eq!(el.render(), "<span>lead <span></span></span>");
    }
}
