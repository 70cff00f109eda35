// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! An arena-allocated DOM.
//!
//! Every node lives in a single `Vec` owned by the [`Dom`] and is addressed
//! by a [`NodeId`]. Nodes are linked to their parent, first and last child
//! and both siblings by id, so every navigation step is constant time.
//! Nothing here is reference-counted, so transform passes can freely
//! detach, move and re-insert nodes while holding `&mut Dom`.
//!
//! Nodes that are detached stay in the arena until the `Dom` itself is
//! dropped. A `Dom` lives for exactly one pipeline run, so this is fine.

use std::borrow::Cow;
use std::iter;

use html5ever::{LocalName, Namespace, QualName};
use tendril::StrTendril;

pub use self::sink::{parse_document, ArenaSink};

pub mod sink;

pub const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
pub const MATHML_NAMESPACE: &str = "http://www.w3.org/1998/Math/MathML";

/// Index of a node in its [`Dom`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// An attribute as the printer sees it.
///
/// `namespace` is the attribute's prefix (`xlink`, `xml`, `xmlns`) for
/// attributes adjusted in foreign content, and `None` otherwise. Keys are
/// not required to be unique on an element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub namespace: Option<String>,
    pub key: String,
    pub value: String,
}

impl Attribute {
    pub fn new<K: Into<String>, V: Into<String>>(key: K, value: V) -> Attribute {
        Attribute {
            namespace: None,
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn with_namespace<N, K, V>(namespace: N, key: K, value: V) -> Attribute
    where
        N: Into<String>,
        K: Into<String>,
        V: Into<String>,
    {
        Attribute {
            namespace: Some(namespace.into()),
            key: key.into(),
            value: value.into(),
        }
    }

    /// `namespace:key`, or just `key` when there is no namespace.
    pub fn sort_key(&self) -> Cow<'_, str> {
        match self.namespace {
            Some(ref ns) if !ns.is_empty() => Cow::Owned(format!("{}:{}", ns, self.key)),
            _ => Cow::Borrowed(&self.key),
        }
    }
}

/// The different kinds of nodes in the DOM.
#[derive(Clone, Debug)]
pub enum NodeData {
    /// The root of a parsed document.
    Document,

    /// A `DOCTYPE`. Public and system identifiers are not kept.
    Doctype { name: StrTendril },

    /// A text node.
    Text { contents: StrTendril },

    /// A comment.
    Comment { contents: StrTendril },

    /// An element with attributes.
    Element {
        name: QualName,
        attrs: Vec<Attribute>,

        /// Whether the parser flagged this node as a [HTML integration point].
        ///
        /// [HTML integration point]: https://html.spec.whatwg.org/multipage/#html-integration-point
        mathml_annotation_xml_integration_point: bool,
    },

    /// A processing instruction. HTML has no way to express these.
    ProcessingInstruction {
        target: StrTendril,
        contents: StrTendril,
    },

    /// A placeholder for content that could not be represented.
    Error,
}

impl NodeData {
    pub fn kind(&self) -> &'static str {
        match *self {
            NodeData::Document => "document",
            NodeData::Doctype { .. } => "doctype",
            NodeData::Text { .. } => "text",
            NodeData::Comment { .. } => "comment",
            NodeData::Element { .. } => "element",
            NodeData::ProcessingInstruction { .. } => "processing instruction",
            NodeData::Error => "error",
        }
    }
}

/// A DOM node.
///
/// The tree links are private; they only change through [`Dom`]'s
/// mutation methods.
#[derive(Clone, Debug)]
pub struct Node {
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
    /// Represents this node's data.
    pub data: NodeData,
}

impl Node {
    fn new(data: NodeData) -> Node {
        Node {
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            data,
        }
    }
}

/// The DOM itself; the result of parsing.
#[derive(Debug)]
pub struct Dom {
    nodes: Vec<Node>,

    /// Errors that occurred during parsing.
    pub errors: Vec<Cow<'static, str>>,
}

impl Default for Dom {
    fn default() -> Dom {
        Dom::new()
    }
}

impl Dom {
    /// An empty tree holding only a document node.
    pub fn new() -> Dom {
        Dom {
            nodes: vec![Node::new(NodeData::Document)],
            errors: Vec::new(),
        }
    }

    pub fn document(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0].data
    }

    /// Add a parentless node to the arena.
    pub fn create(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(data));
        id
    }

    /// Create a parentless HTML element.
    pub fn create_element(&mut self, local: &str, attrs: Vec<Attribute>) -> NodeId {
        let name = QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from(local));
        self.create(NodeData::Element {
            name,
            attrs,
            mathml_annotation_xml_integration_point: false,
        })
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.create(NodeData::Text {
            contents: StrTendril::from_slice(text),
        })
    }

    //§ navigation

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Child nodes of `id`, in document order.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        let node = &self.nodes[id.0];
        Children {
            dom: self,
            front: node.first_child,
            back: node.last_child,
        }
    }

    pub fn has_children(&self, id: NodeId) -> bool {
        self.nodes[id.0].first_child.is_some()
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].first_child
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].last_child
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].next_sibling
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].prev_sibling
    }

    /// Siblings before `id`, nearest first.
    pub fn preceding_siblings(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        iter::successors(self.prev_sibling(id), move |&s| self.prev_sibling(s))
    }

    /// The node after `id` in depth-first order, without leaving `root`.
    pub fn next(&self, id: NodeId, root: NodeId) -> Option<NodeId> {
        match self.first_child(id) {
            Some(child) => Some(child),
            None => self.next_skipping_children(id, root),
        }
    }

    /// Like [`Dom::next`], but does not descend into `id`.
    ///
    /// Call this before detaching `id` to keep walking the rest of the tree.
    pub fn next_skipping_children(&self, mut id: NodeId, root: NodeId) -> Option<NodeId> {
        loop {
            if id == root {
                return None;
            }
            if let Some(sibling) = self.next_sibling(id) {
                return Some(sibling);
            }
            id = self.parent(id)?;
        }
    }

    /// `root` and everything below it, in document order.
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        Descendants {
            dom: self,
            root,
            next: Some(root),
        }
    }

    //§ mutation

    /// Remove a node from its parent. The node keeps its own children.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.nodes[id.0].parent.take() else {
            return;
        };
        let prev = self.nodes[id.0].prev_sibling.take();
        let next = self.nodes[id.0].next_sibling.take();
        match prev {
            Some(prev) => self.nodes[prev.0].next_sibling = next,
            None => self.nodes[parent.0].first_child = next,
        }
        match next {
            Some(next) => self.nodes[next.0].prev_sibling = prev,
            None => self.nodes[parent.0].last_child = prev,
        }
    }

    /// Append a node to another node's children, detaching it first.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        let last = self.nodes[parent.0].last_child;
        {
            let node = &mut self.nodes[child.0];
            node.parent = Some(parent);
            node.prev_sibling = last;
        }
        match last {
            Some(last) => self.nodes[last.0].next_sibling = Some(child),
            None => self.nodes[parent.0].first_child = Some(child),
        }
        self.nodes[parent.0].last_child = Some(child);
    }

    pub fn append_children<I: IntoIterator<Item = NodeId>>(&mut self, parent: NodeId, children: I) {
        for child in children {
            self.append(parent, child);
        }
    }

    /// Insert `child` immediately before `sibling`. Does nothing if
    /// `sibling` has no parent.
    pub fn insert_before(&mut self, sibling: NodeId, child: NodeId) {
        if child == sibling {
            return;
        }
        let Some(parent) = self.parent(sibling) else {
            return;
        };
        self.detach(child);
        let prev = self.nodes[sibling.0].prev_sibling;
        {
            let node = &mut self.nodes[child.0];
            node.parent = Some(parent);
            node.prev_sibling = prev;
            node.next_sibling = Some(sibling);
        }
        self.nodes[sibling.0].prev_sibling = Some(child);
        match prev {
            Some(prev) => self.nodes[prev.0].next_sibling = Some(child),
            None => self.nodes[parent.0].first_child = Some(child),
        }
    }

    /// Detach every child of `id`, returning them in their former order.
    pub fn remove_all_children(&mut self, id: NodeId) -> Vec<NodeId> {
        let children: Vec<NodeId> = self.children(id).collect();
        for &child in &children {
            let node = &mut self.nodes[child.0];
            node.parent = None;
            node.prev_sibling = None;
            node.next_sibling = None;
        }
        let node = &mut self.nodes[id.0];
        node.first_child = None;
        node.last_child = None;
        children
    }

    /// Move all children of `node` to the end of `new_parent`'s children.
    pub fn reparent_children(&mut self, node: NodeId, new_parent: NodeId) {
        let children = self.remove_all_children(node);
        self.append_children(new_parent, children);
    }

    //§ elements

    pub fn element_name(&self, id: NodeId) -> Option<&QualName> {
        match self.nodes[id.0].data {
            NodeData::Element { ref name, .. } => Some(name),
            _ => None,
        }
    }

    /// Is `id` an element with this local name, in any namespace?
    pub fn is_element(&self, id: NodeId, local: &str) -> bool {
        self.element_name(id).map_or(false, |name| &*name.local == local)
    }

    /// Is `id` an element with this local name in the given namespace?
    pub fn is_element_ns(&self, id: NodeId, ns: &str, local: &str) -> bool {
        self.element_name(id)
            .map_or(false, |name| &*name.ns == ns && &*name.local == local)
    }

    /// The first element named `local` below `root` (depth-first), if any.
    pub fn find_element(&self, root: NodeId, local: &str) -> Option<NodeId> {
        self.descendants(root)
            .skip(1)
            .find(|&id| self.is_element(id, local))
    }

    /// Whether any ancestor of `id` is an element named `local`.
    pub fn is_descendant_of(&self, id: NodeId, local: &str) -> bool {
        let mut cur = self.parent(id);
        while let Some(p) = cur {
            if self.is_element(p, local) {
                return true;
            }
            cur = self.parent(p);
        }
        false
    }

    /// Whether the immediate parent of `id` is an element named `local`.
    pub fn is_child_of(&self, id: NodeId, local: &str) -> bool {
        self.parent(id).map_or(false, |p| self.is_element(p, local))
    }

    /// Attributes of an element; empty for any other node.
    pub fn attrs(&self, id: NodeId) -> &[Attribute] {
        match self.nodes[id.0].data {
            NodeData::Element { ref attrs, .. } => attrs,
            _ => &[],
        }
    }

    pub fn attrs_mut(&mut self, id: NodeId) -> Option<&mut Vec<Attribute>> {
        match self.nodes[id.0].data {
            NodeData::Element { ref mut attrs, .. } => Some(attrs),
            _ => None,
        }
    }

    /// The first un-namespaced attribute with this key.
    pub fn attribute(&self, id: NodeId, key: &str) -> Option<&Attribute> {
        self.attrs(id)
            .iter()
            .find(|a| a.namespace.is_none() && a.key == key)
    }

    pub fn attribute_value(&self, id: NodeId, key: &str) -> Option<&str> {
        self.attribute(id, key).map(|a| &*a.value)
    }

    pub fn has_attribute(&self, id: NodeId, key: &str) -> bool {
        self.attribute(id, key).is_some()
    }

    /// Overwrite the value of an attribute, adding it if missing.
    pub fn set_attribute(&mut self, id: NodeId, key: &str, value: &str) {
        let Some(attrs) = self.attrs_mut(id) else {
            return;
        };
        match attrs
            .iter_mut()
            .find(|a| a.namespace.is_none() && a.key == key)
        {
            Some(attr) => attr.value = value.to_owned(),
            None => attrs.push(Attribute::new(key, value)),
        }
    }

    /// Remove every un-namespaced attribute with this key.
    pub fn remove_attribute(&mut self, id: NodeId, key: &str) {
        if let Some(attrs) = self.attrs_mut(id) {
            attrs.retain(|a| a.namespace.is_some() || a.key != key);
        }
    }

    //§ text

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.nodes[id.0].data {
            NodeData::Text { ref contents } => Some(contents),
            _ => None,
        }
    }

    pub fn text_mut(&mut self, id: NodeId) -> Option<&mut StrTendril> {
        match self.nodes[id.0].data {
            NodeData::Text { ref mut contents } => Some(contents),
            _ => None,
        }
    }
}

/// Iterator over the children of a node. See [`Dom::children`].
pub struct Children<'a> {
    dom: &'a Dom,
    front: Option<NodeId>,
    back: Option<NodeId>,
}

impl<'a> Iterator for Children<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let cur = self.front?;
        if self.front == self.back {
            self.front = None;
            self.back = None;
        } else {
            self.front = self.dom.next_sibling(cur);
        }
        Some(cur)
    }
}

impl<'a> DoubleEndedIterator for Children<'a> {
    fn next_back(&mut self) -> Option<NodeId> {
        let cur = self.back?;
        if self.front == self.back {
            self.front = None;
            self.back = None;
        } else {
            self.back = self.dom.prev_sibling(cur);
        }
        Some(cur)
    }
}

/// Pre-order iterator over a subtree. See [`Dom::descendants`].
pub struct Descendants<'a> {
    dom: &'a Dom,
    root: NodeId,
    next: Option<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let cur = self.next?;
        self.next = self.dom.next(cur, self.root);
        Some(cur)
    }
}
