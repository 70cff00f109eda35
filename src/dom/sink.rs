// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Building a [`Dom`] from the html5ever tree builder.

use std::borrow::Cow;
use std::cell::{Cell, Ref, RefCell};

use html5ever::interface::{ElemName, ElementFlags, NodeOrText, QuirksMode};
use html5ever::tree_builder::TreeSink;
use html5ever::{Attribute as ParsedAttribute, LocalName, Namespace, ParseOpts, QualName};
use log::{debug, trace};
use tendril::{StrTendril, TendrilSink};

use super::{Attribute, Dom, NodeData, NodeId};

/// Parse a complete HTML document.
///
/// Parsing never fails: malformed input is repaired the way a browser
/// would, and each repair is recorded in [`Dom::errors`]. The tree always
/// has `html`, `head` and `body` elements.
pub fn parse_document(html: &str) -> Dom {
    let dom = html5ever::parse_document(ArenaSink::default(), ParseOpts::default()).one(html);
    trace!(
        "parsed {} bytes into {} nodes ({} parse errors)",
        html.len(),
        dom.len(),
        dom.errors.len()
    );
    dom
}

/// A [`TreeSink`] that writes into an arena [`Dom`].
///
/// Templates are not given a separate contents fragment; their children
/// are appended to the template element directly.
pub struct ArenaSink {
    dom: RefCell<Dom>,
    quirks_mode: Cell<QuirksMode>,
}

impl Default for ArenaSink {
    fn default() -> ArenaSink {
        ArenaSink {
            dom: RefCell::new(Dom::new()),
            quirks_mode: Cell::new(QuirksMode::NoQuirks),
        }
    }
}

impl ArenaSink {
    pub fn quirks_mode(&self) -> QuirksMode {
        self.quirks_mode.get()
    }

    fn create_node(&self, data: NodeData) -> NodeId {
        self.dom.borrow_mut().create(data)
    }

    fn new_text(&self, text: StrTendril) -> NodeId {
        self.create_node(NodeData::Text { contents: text })
    }
}

/// Borrowed name of an element, handed to the tree builder.
#[derive(Debug)]
pub struct ElementName<'a>(Ref<'a, QualName>);

impl ElemName for ElementName<'_> {
    fn ns(&self) -> &Namespace {
        &self.0.ns
    }

    fn local_name(&self) -> &LocalName {
        &self.0.local
    }
}

fn convert_attribute(attr: ParsedAttribute) -> Attribute {
    Attribute {
        namespace: attr.name.prefix.map(|p| p.to_string()),
        key: attr.name.local.to_string(),
        value: attr.value.to_string(),
    }
}

fn append_to_existing_text(dom: &mut Dom, prev: NodeId, text: &str) -> bool {
    match dom.text_mut(prev) {
        Some(contents) => {
            contents.push_slice(text);
            true
        },
        None => false,
    }
}

impl TreeSink for ArenaSink {
    type Output = Dom;
    fn finish(self) -> Dom {
        self.dom.into_inner()
    }

    type Handle = NodeId;

    type ElemName<'a>
        = ElementName<'a>
    where
        Self: 'a;

    fn parse_error(&self, msg: Cow<'static, str>) {
        debug!("parse error: {}", msg);
        self.dom.borrow_mut().errors.push(msg);
    }

    fn get_document(&self) -> NodeId {
        self.dom.borrow().document()
    }

    fn get_template_contents(&self, target: &NodeId) -> NodeId {
        *target
    }

    fn set_quirks_mode(&self, mode: QuirksMode) {
        self.quirks_mode.set(mode);
    }

    fn same_node(&self, x: &NodeId, y: &NodeId) -> bool {
        x == y
    }

    fn elem_name<'a>(&'a self, target: &'a NodeId) -> ElementName<'a> {
        ElementName(Ref::map(self.dom.borrow(), |dom| {
            match dom.node(*target).data {
                NodeData::Element { ref name, .. } => name,
                _ => panic!("not an element!"),
            }
        }))
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<ParsedAttribute>,
        flags: ElementFlags,
    ) -> NodeId {
        self.create_node(NodeData::Element {
            name,
            attrs: attrs.into_iter().map(convert_attribute).collect(),
            mathml_annotation_xml_integration_point: flags.mathml_annotation_xml_integration_point,
        })
    }

    fn create_comment(&self, text: StrTendril) -> NodeId {
        self.create_node(NodeData::Comment { contents: text })
    }

    fn create_pi(&self, target: StrTendril, data: StrTendril) -> NodeId {
        self.create_node(NodeData::ProcessingInstruction {
            target,
            contents: data,
        })
    }

    fn append(&self, parent: &NodeId, child: NodeOrText<NodeId>) {
        let child = match child {
            NodeOrText::AppendText(text) => {
                // Append to an existing Text node if we have one.
                let mut dom = self.dom.borrow_mut();
                if let Some(last) = dom.last_child(*parent) {
                    if append_to_existing_text(&mut dom, last, &text) {
                        return;
                    }
                }
                drop(dom);
                self.new_text(text)
            },
            NodeOrText::AppendNode(node) => node,
        };
        self.dom.borrow_mut().append(*parent, child);
    }

    fn append_before_sibling(&self, sibling: &NodeId, child: NodeOrText<NodeId>) {
        let prev = {
            let dom = self.dom.borrow();
            assert!(
                dom.parent(*sibling).is_some(),
                "append_before_sibling called on node without parent"
            );
            dom.prev_sibling(*sibling)
        };

        let child = match (child, prev) {
            // No previous node.
            (NodeOrText::AppendText(text), None) => self.new_text(text),

            // Look for a text node before the insertion point.
            (NodeOrText::AppendText(text), Some(prev)) => {
                let mut dom = self.dom.borrow_mut();
                if append_to_existing_text(&mut dom, prev, &text) {
                    return;
                }
                drop(dom);
                self.new_text(text)
            },

            // Any other kind of node.
            (NodeOrText::AppendNode(node), _) => node,
        };

        self.dom.borrow_mut().insert_before(*sibling, child);
    }

    fn append_based_on_parent_node(
        &self,
        element: &NodeId,
        prev_element: &NodeId,
        child: NodeOrText<NodeId>,
    ) {
        let has_parent = self.dom.borrow().parent(*element).is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        let doctype = self.create_node(NodeData::Doctype { name });
        let mut dom = self.dom.borrow_mut();
        let document = dom.document();
        dom.append(document, doctype);
    }

    fn add_attrs_if_missing(&self, target: &NodeId, attrs: Vec<ParsedAttribute>) {
        let mut dom = self.dom.borrow_mut();
        let existing = dom.attrs_mut(*target).expect("not an element");
        for attr in attrs.into_iter().map(convert_attribute) {
            let present = existing
                .iter()
                .any(|e| e.namespace == attr.namespace && e.key == attr.key);
            if !present {
                existing.push(attr);
            }
        }
    }

    fn remove_from_parent(&self, target: &NodeId) {
        self.dom.borrow_mut().detach(*target);
    }

    fn reparent_children(&self, node: &NodeId, new_parent: &NodeId) {
        self.dom.borrow_mut().reparent_children(*node, *new_parent);
    }

    fn is_mathml_annotation_xml_integration_point(&self, target: &NodeId) -> bool {
        match self.dom.borrow().node(*target).data {
            NodeData::Element {
                mathml_annotation_xml_integration_point,
                ..
            } => mathml_annotation_xml_integration_point,
            _ => panic!("not an element!"),
        }
    }
}
