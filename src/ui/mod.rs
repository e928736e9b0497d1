//! Retained element tree the components render into.
//!
//! The host hands the view one mount [`Element`]. Every component creates its
//! own children under it and keeps the handles, so updates never search the
//! tree. Hosts either walk the tree or serialise it with [`Element::to_html`].

use std::sync::{Arc, Mutex, MutexGuard};

use crate::utils::escape_html;

const VOID_TAGS: &[&str] = &["input", "br", "hr"];

#[derive(Debug, Default)]
struct Node {
    tag: String,
    classes: Vec<String>,
    attrs: Vec<(String, String)>,
    styles: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<Element>,
}

/// Shared handle to one node. Clones point at the same node.
#[derive(Debug, Clone)]
pub struct Element {
    node: Arc<Mutex<Node>>,
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            node: Arc::new(Mutex::new(Node {
                tag: tag.to_string(),
                ..Node::default()
            })),
        }
    }

    fn node(&self) -> MutexGuard<'_, Node> {
        match self.node.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Appends a new child and returns its handle.
    pub fn create_child(&self, tag: &str) -> Element {
        let child = Element::new(tag);
        self.node().children.push(child.clone());
        child
    }

    pub fn create_child_with_class(&self, tag: &str, class: &str) -> Element {
        let child = self.create_child(tag);
        child.add_class(class);
        child
    }

    pub fn children(&self) -> Vec<Element> {
        self.node().children.clone()
    }

    /// Drops all children and text.
    pub fn empty(&self) {
        let mut node = self.node();
        node.children.clear();
        node.text = None;
    }

    pub fn add_class(&self, class: &str) {
        let mut node = self.node();
        if !node.classes.iter().any(|c| c == class) {
            node.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&self, class: &str) {
        self.node().classes.retain(|c| c != class);
    }

    pub fn toggle_class(&self, class: &str, on: bool) {
        if on {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.node().classes.iter().any(|c| c == class)
    }

    pub fn set_attr(&self, name: &str, value: impl Into<String>) {
        let value = value.into();
        let mut node = self.node();
        match node.attrs.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => node.attrs.push((name.to_string(), value)),
        }
    }

    pub fn attr(&self, name: &str) -> Option<String> {
        self.node()
            .attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    pub fn set_style(&self, property: &str, value: impl Into<String>) {
        let value = value.into();
        let mut node = self.node();
        match node.styles.iter_mut().find(|(p, _)| p == property) {
            Some(slot) => slot.1 = value,
            None => node.styles.push((property.to_string(), value)),
        }
    }

    pub fn style(&self, property: &str) -> Option<String> {
        self.node()
            .styles
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.clone())
    }

    pub fn set_text(&self, text: impl Into<String>) {
        self.node().text = Some(text.into());
    }

    pub fn clear_text(&self) {
        self.node().text = None;
    }

    pub fn text(&self) -> Option<String> {
        self.node().text.clone()
    }

    /// Elements under this one (inclusive) carrying `class`, in document order.
    pub fn find_by_class(&self, class: &str) -> Vec<Element> {
        let mut found = Vec::new();
        self.collect_by_class(class, &mut found);
        found
    }

    fn collect_by_class(&self, class: &str, found: &mut Vec<Element>) {
        if self.has_class(class) {
            found.push(self.clone());
        }
        for child in self.children() {
            child.collect_by_class(class, found);
        }
    }

    /// Serialises the subtree. Text and attribute values are escaped.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let (tag, children, text) = {
            let node = self.node();
            out.push('<');
            out.push_str(&node.tag);
            if !node.classes.is_empty() {
                out.push_str(&format!(" class=\"{}\"", escape_html(&node.classes.join(" "))));
            }
            for (name, value) in &node.attrs {
                out.push_str(&format!(" {}=\"{}\"", name, escape_html(value)));
            }
            if !node.styles.is_empty() {
                let style = node
                    .styles
                    .iter()
                    .map(|(p, v)| format!("{p}: {v}"))
                    .collect::<Vec<_>>()
                    .join("; ");
                out.push_str(&format!(" style=\"{}\"", escape_html(&style)));
            }
            out.push('>');
            (node.tag.clone(), node.children.clone(), node.text.clone())
        };

        if VOID_TAGS.contains(&tag.as_str()) {
            return;
        }
        if let Some(text) = text {
            out.push_str(&escape_html(&text));
        }
        for child in children {
            child.write_html(out);
        }
        out.push_str(&format!("</{tag}>"));
    }
}
