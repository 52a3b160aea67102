//! Arena-backed document.

use std::collections::BTreeMap;

use crate::element::{Content, Element};
use crate::mutation::{MutationKind, MutationRecord};
use crate::selector::Selector;

/// Stable handle to a node in a [`Document`].
///
/// Handles are never reused within one document, so a handle to a removed
/// node stays distinct from every node appended later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Element state stored in the arena.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementData {
    pub tag: String,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    style: BTreeMap<String, String>,
    checked: bool,
    value: String,
}

impl ElementData {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.style.get(property).map(String::as_str)
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

#[derive(Debug, Clone)]
enum NodeKind {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A mutable page document with a mutation journal.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    root: NodeId,
    journal: Vec<MutationRecord>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document holding only the `#document` root.
    pub fn new() -> Self {
        let root = NodeData {
            kind: NodeKind::Element(ElementData {
                tag: "#document".to_string(),
                ..Default::default()
            }),
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            journal: Vec::new(),
        }
    }

    /// Creates a document whose root holds `element`.
    pub fn from_element(element: Element) -> Self {
        let mut document = Self::new();
        let root = document.root;
        document.append(root, element);
        document.journal.clear();
        document
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    // =========================================================================
    // Tree construction
    // =========================================================================

    /// Appends a detached element subtree under `parent`.
    pub fn append(&mut self, parent: NodeId, element: Element) -> NodeId {
        let id = self.insert_subtree(Some(parent), Content::Element(element));
        self.nodes[parent.0].children.push(id);
        self.record(parent, MutationKind::ChildList);
        id
    }

    /// Inserts `element` under `parent` before `reference`, or last when
    /// `reference` is `None` or not a child of `parent`.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        element: Element,
        reference: Option<NodeId>,
    ) -> NodeId {
        let id = self.insert_subtree(Some(parent), Content::Element(element));
        let children = &mut self.nodes[parent.0].children;
        match reference.and_then(|r| children.iter().position(|child| *child == r)) {
            Some(position) => children.insert(position, id),
            None => children.push(id),
        }
        self.record(parent, MutationKind::ChildList);
        id
    }

    fn insert_subtree(&mut self, parent: Option<NodeId>, content: Content) -> NodeId {
        let id = NodeId(self.nodes.len());
        match content {
            Content::Text(text) => {
                self.nodes.push(NodeData {
                    kind: NodeKind::Text(text),
                    parent,
                    children: Vec::new(),
                });
            }
            Content::Element(element) => {
                let Element {
                    tag,
                    attributes,
                    classes,
                    style,
                    checked,
                    value,
                    children,
                } = element;
                self.nodes.push(NodeData {
                    kind: NodeKind::Element(ElementData {
                        tag,
                        attributes,
                        classes,
                        style,
                        checked,
                        value,
                    }),
                    parent,
                    children: Vec::new(),
                });
                for child in children {
                    let child_id = self.insert_subtree(Some(id), child);
                    self.nodes[id.0].children.push(child_id);
                }
            }
        }
        id
    }

    /// Detaches `id` (and its subtree) from its parent.
    ///
    /// The handle stays valid for reads; the subtree is no longer connected.
    pub fn remove(&mut self, id: NodeId) {
        let Some(parent) = self.nodes.get(id.0).and_then(|node| node.parent) else {
            return;
        };
        self.nodes[parent.0].children.retain(|child| *child != id);
        self.nodes[id.0].parent = None;
        self.record(parent, MutationKind::ChildList);
    }

    /// Copies the subtree rooted at `id` out as a detached [`Element`].
    pub fn export(&self, id: NodeId) -> Option<Element> {
        match self.export_content(id)? {
            Content::Element(element) => Some(element),
            Content::Text(_) => None,
        }
    }

    fn export_content(&self, id: NodeId) -> Option<Content> {
        let node = self.nodes.get(id.0)?;
        Some(match &node.kind {
            NodeKind::Text(text) => Content::Text(text.clone()),
            NodeKind::Element(data) => Content::Element(Element {
                tag: data.tag.clone(),
                attributes: data.attributes.clone(),
                classes: data.classes.clone(),
                style: data.style.clone(),
                checked: data.checked,
                value: data.value.clone(),
                children: node
                    .children
                    .iter()
                    .filter_map(|child| self.export_content(*child))
                    .collect(),
            }),
        })
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.nodes.get(id.0)?.kind {
            NodeKind::Element(data) => Some(data),
            NodeKind::Text(_) => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes.get_mut(id.0)?.kind {
            NodeKind::Element(data) => Some(data),
            NodeKind::Text(_) => None,
        }
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|data| data.tag.as_str())
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attribute(name)
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|data| data.has_class(class))
    }

    pub fn style(&self, id: NodeId, property: &str) -> Option<&str> {
        self.element(id)?.style(property)
    }

    pub fn is_checked(&self, id: NodeId) -> bool {
        self.element(id).is_some_and(ElementData::is_checked)
    }

    pub fn value(&self, id: NodeId) -> &str {
        self.element(id).map(ElementData::value).unwrap_or("")
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.nodes.get(id.0) else {
            return;
        };
        match &node.kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element(_) => {
                for child in &node.children {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0)?.parent
    }

    /// Element children of `id`, in order.
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(id.0)
            .map(|node| {
                node.children
                    .iter()
                    .copied()
                    .filter(|child| self.element(*child).is_some())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = &self.nodes[parent.0].children;
        let position = siblings.iter().position(|child| *child == id)?;
        siblings[position + 1..]
            .iter()
            .copied()
            .find(|sibling| self.element(*sibling).is_some())
    }

    /// `true` while `id` is attached (transitively) to the document root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(self.root, id)
    }

    /// `true` when `node` is `ancestor` or one of its descendants.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Element descendants of `scope` in document order, excluding `scope`.
    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self
            .nodes
            .get(scope.0)
            .map(|node| node.children.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(id) = stack.pop() {
            if self.element(id).is_none() {
                continue;
            }
            out.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        out
    }

    pub fn matches(&self, id: NodeId, selector: &Selector) -> bool {
        self.element(id).is_some_and(|data| selector.matches(data))
    }

    pub fn query_selector(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|id| self.matches(*id, selector))
    }

    pub fn query_selector_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|id| self.matches(*id, selector))
            .collect()
    }

    /// Nearest inclusive ancestor of `id` matching `selector`.
    pub fn closest(&self, id: NodeId, selector: &Selector) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node) = current {
            if self.matches(node, selector) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    pub fn get_element_by_id(&self, element_id: &str) -> Option<NodeId> {
        self.query_selector(self.root, &Selector::id(element_id))
    }

    // =========================================================================
    // Writes
    // =========================================================================

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> bool {
        let Some(data) = self.element_mut(id) else {
            return false;
        };
        if name == "class" {
            let classes: Vec<String> = value.split_whitespace().map(str::to_string).collect();
            if data.classes == classes {
                return false;
            }
            data.classes = classes;
        } else {
            if data.attribute(name) == Some(value) {
                return false;
            }
            data.attributes.insert(name.to_string(), value.to_string());
        }
        self.record(id, MutationKind::Attribute(name.to_string()));
        true
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> bool {
        let removed = self
            .element_mut(id)
            .is_some_and(|data| data.attributes.remove(name).is_some());
        if removed {
            self.record(id, MutationKind::Attribute(name.to_string()));
        }
        removed
    }

    /// Adds or removes `class`; returns `true` if the class list changed.
    pub fn toggle_class(&mut self, id: NodeId, class: &str, on: bool) -> bool {
        let Some(data) = self.element_mut(id) else {
            return false;
        };
        let present = data.has_class(class);
        if present == on {
            return false;
        }
        if on {
            data.classes.push(class.to_string());
        } else {
            data.classes.retain(|c| c != class);
        }
        self.record(id, MutationKind::Attribute("class".to_string()));
        true
    }

    /// Sets (`Some`) or clears (`None`) an inline style property.
    pub fn set_style(&mut self, id: NodeId, property: &str, value: Option<&str>) -> bool {
        let Some(data) = self.element_mut(id) else {
            return false;
        };
        let changed = match value {
            Some(value) if data.style(property) != Some(value) => {
                data.style.insert(property.to_string(), value.to_string());
                true
            }
            Some(_) => false,
            None => data.style.remove(property).is_some(),
        };
        if changed {
            self.record(id, MutationKind::Style(property.to_string()));
        }
        changed
    }

    pub fn set_checked(&mut self, id: NodeId, checked: bool) -> bool {
        let Some(data) = self.element_mut(id) else {
            return false;
        };
        if data.checked == checked {
            return false;
        }
        data.checked = checked;
        self.record(id, MutationKind::Property("checked"));
        true
    }

    pub fn set_value(&mut self, id: NodeId, value: &str) -> bool {
        let Some(data) = self.element_mut(id) else {
            return false;
        };
        if data.value == value {
            return false;
        }
        data.value = value.to_string();
        self.record(id, MutationKind::Property("value"));
        true
    }

    // =========================================================================
    // Mutation journal
    // =========================================================================

    fn record(&mut self, target: NodeId, kind: MutationKind) {
        self.journal.push(MutationRecord::new(target, kind));
    }

    /// Drains the mutation journal.
    pub fn take_mutations(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.journal)
    }

    pub fn pending_mutations(&self) -> usize {
        self.journal.len()
    }
}
