use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Handle to a node in a [`Document`]. Handles to freed nodes stay invalid
/// even after their slot is reused.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.index)
    }
}

#[derive(Clone, Debug, PartialEq)]
enum NodeKind {
    Element(String),
    Text(String),
}

#[derive(Clone, Debug)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
    styles: BTreeMap<String, String>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            attrs: BTreeMap::new(),
            classes: Vec::new(),
            styles: BTreeMap::new(),
        }
    }
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Arena-backed element tree standing in for the browser document.
///
/// Clearing a container frees the removed subtrees and their slots are
/// reused. Every accessor treats an unknown or freed [`NodeId`] as an empty
/// node, and every mutator ignores it.
#[derive(Clone, Debug)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<usize>,
    root: NodeId,
    body: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let root = NodeId {
            index: 0,
            generation: 0,
        };
        let mut doc = Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(Node::new(NodeKind::Element("html".to_string()))),
            }],
            free: Vec::new(),
            root,
            body: root,
        };
        let body = doc.element(root, "body");
        doc.body = body;
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// True while `node` refers to a live node of this document.
    pub fn contains(&self, node: NodeId) -> bool {
        self.node(node).is_some()
    }

    /// Live nodes, attached or not.
    pub fn node_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)?
            .node
            .as_ref()
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)?
            .node
            .as_mut()
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element(tag.to_ascii_lowercase()))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let node = Some(Node::new(kind));
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.node = node;
            return NodeId {
                index,
                generation: slot.generation,
            };
        }
        self.slots.push(Slot {
            generation: 0,
            node,
        });
        NodeId {
            index: self.slots.len() - 1,
            generation: 0,
        }
    }

    /// Frees `node` and everything below it.
    fn release(&mut self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let Some(slot) = self
                .slots
                .get_mut(id.index)
                .filter(|slot| slot.generation == id.generation)
            else {
                continue;
            };
            if let Some(freed) = slot.node.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(id.index);
                stack.extend(freed.children);
            }
        }
    }

    /// Creates an element and appends it to `parent`.
    pub fn element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let child = self.create_element(tag);
        self.append_child(parent, child);
        child
    }

    /// Creates an element with an `id` attribute and appends it to `parent`.
    pub fn element_with_id(&mut self, parent: NodeId, tag: &str, id: &str) -> NodeId {
        let child = self.element(parent, tag);
        self.set_attr(child, "id", id);
        child
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let child = self.create_text(text);
        self.append_child(parent, child);
        child
    }

    /// Moves `child` under `parent`. Ignored when either handle is stale or
    /// when `child` is `parent` or one of its ancestors.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.contains(child) || !self.contains(parent) || self.is_ancestor(child, parent) {
            return;
        }
        if let Some(previous) = self.parent(child)
            && let Some(node) = self.node_mut(previous)
        {
            node.children.retain(|id| *id != child);
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
    }

    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Removes and frees every child of `node`. Handles into the removed
    /// subtrees stop resolving.
    pub fn clear_children(&mut self, node: NodeId) {
        let Some(parent) = self.node_mut(node) else {
            return;
        };
        for child in std::mem::take(&mut parent.children) {
            self.release(child);
        }
    }

    /// Replaces all children of `node` with a single text node.
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        if !self.contains(node) {
            return;
        }
        self.clear_children(node);
        if !text.is_empty() {
            self.append_text(node, text);
        }
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.node(node)?.kind {
            NodeKind::Element(tag) => Some(tag.as_str()),
            NodeKind::Text(_) => None,
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?.parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.node(node)
            .map(|data| data.children.as_slice())
            .unwrap_or_default()
    }

    /// Element children only, skipping text nodes.
    pub fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        self.children(node)
            .iter()
            .copied()
            .filter(|child| self.tag(*child).is_some())
            .collect()
    }

    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let Some(data) = self.node(node) else {
            return;
        };
        match &data.kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element(_) => {
                for child in &data.children {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.node(node)?.attrs.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(data) = self.node_mut(node) {
            data.attrs.insert(name.to_string(), value.to_string());
        }
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) {
        if let Some(data) = self.node_mut(node) {
            data.attrs.remove(name);
        }
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.classes(node).iter().any(|value| value == class)
    }

    pub fn classes(&self, node: NodeId) -> &[String] {
        self.node(node)
            .map(|data| data.classes.as_slice())
            .unwrap_or_default()
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(data) = self.node_mut(node)
            && !data.classes.iter().any(|value| value == class)
        {
            data.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(data) = self.node_mut(node) {
            data.classes.retain(|value| value != class);
        }
    }

    pub fn toggle_class(&mut self, node: NodeId, class: &str, on: bool) {
        if on {
            self.add_class(node, class);
        } else {
            self.remove_class(node, class);
        }
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.node(node)?.styles.get(property).map(String::as_str)
    }

    pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(data) = self.node_mut(node) {
            data.styles.insert(property.to_string(), value.to_string());
        }
    }

    /// Pre-order descendants of `scope`, excluding `scope` itself.
    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        std::iter::once(self.root)
            .chain(self.descendants(self.root))
            .find(|node| self.attr(*node, "id") == Some(id))
    }

    pub fn find_by_class(&self, scope: NodeId, class: &str) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|node| self.has_class(*node, class))
    }

    pub fn select_by_class(&self, scope: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|node| self.has_class(*node, class))
            .collect()
    }

    pub fn select_by_tag(&self, scope: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|node| self.tag(*node) == Some(tag))
            .collect()
    }

    /// Anchors under `scope` whose `href` starts with `#`, in document order.
    pub fn same_page_anchors(&self, scope: NodeId) -> Vec<NodeId> {
        self.select_by_tag(scope, "a")
            .into_iter()
            .filter(|node| {
                self.attr(*node, "href")
                    .is_some_and(|href| href.starts_with('#'))
            })
            .collect()
    }

    /// Resolves a `#fragment` href to the element carrying that id.
    ///
    /// A bare `#`, an empty fragment, or one containing whitespace never
    /// resolves.
    pub fn resolve_fragment(&self, href: &str) -> Option<NodeId> {
        let fragment = href.strip_prefix('#')?;
        if fragment.is_empty() || fragment.chars().any(char::is_whitespace) {
            return None;
        }
        self.get_element_by_id(fragment)
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            if current == self.root {
                return true;
            }
            match self.parent(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node, &mut out);
        out
    }

    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(node) {
            self.write_html(*child, &mut out);
        }
        out
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        let Some(data) = self.node(node) else {
            return;
        };
        let tag = match &data.kind {
            NodeKind::Text(text) => {
                out.push_str(&escape_text(text));
                return;
            }
            NodeKind::Element(tag) => tag,
        };
        out.push('<');
        out.push_str(tag);
        if !data.classes.is_empty() {
            out.push_str(&format!(
                " class=\"{}\"",
                escape_attr(&data.classes.join(" "))
            ));
        }
        for (name, value) in &data.attrs {
            out.push_str(&format!(" {name}=\"{}\"", escape_attr(value)));
        }
        if !data.styles.is_empty() {
            let style = data
                .styles
                .iter()
                .map(|(name, value)| format!("{name}:{value}"))
                .collect::<Vec<_>>()
                .join(";");
            out.push_str(&format!(" style=\"{}\"", escape_attr(&style)));
        }
        out.push('>');
        for child in &data.children {
            self.write_html(*child, out);
        }
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
