// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Canonical HTML output.
//!
//! The printer emits a byte-for-byte reproducible rendering of a [`Dom`]:
//!
//! - comments are dropped, doctypes lose their identifiers;
//! - attributes are stably sorted by `namespace:key` and values are only
//!   quoted when an unquoted value would be misread;
//! - every non-void element gets an explicit end tag, and void elements
//!   never do (inside `<svg>`/`<math>` they are written self-closing);
//! - text directly inside `iframe`, `noscript`, `script` and `style` is
//!   written verbatim, everything else is escaped.

use std::borrow::Cow;
use std::io::{self, BufWriter, Write};

use log::warn;
use phf::phf_set;

use crate::dom::{Attribute, Dom, NodeData, NodeId, HTML_NAMESPACE, MATHML_NAMESPACE, SVG_NAMESPACE};
use crate::error::RenderError;

/// Elements that only have a start tag.
static VOID_ELEMENTS: phf::Set<&'static str> = phf_set! {
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
};

/// Characters that force a (escaped) attribute value into double quotes.
const NEEDS_QUOTES: &[char] = &[' ', '\t', '\r', '\n', '\x0c', '"', '\'', '=', '<', '>', '`'];

/// Serialize `node` and everything below it into `writer`.
///
/// Output goes through a [`BufWriter`] which is flushed before returning.
pub fn print<W: Write>(writer: W, dom: &Dom, node: NodeId) -> Result<(), RenderError> {
    let mut printer = Printer::new(BufWriter::new(writer), dom);
    printer.print(node)?;
    printer.writer.flush()?;
    Ok(())
}

/// [`print`] into a fresh `String`.
pub fn print_to_string(dom: &Dom, node: NodeId) -> Result<String, RenderError> {
    let mut out = Vec::new();
    print(&mut out, dom, node)?;
    String::from_utf8(out).map_err(|e| RenderError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Escape `&`, `'`, `<`, `>`, `"` and CR.
///
/// The same escaping is used for text and attribute values. Numeric
/// references are used for the quotes so the output matches other
/// canonicalizers byte for byte.
pub fn escape(text: &str) -> Cow<'_, str> {
    let first = match text.find(['&', '\'', '<', '>', '"', '\r']) {
        Some(i) => i,
        None => return Cow::Borrowed(text),
    };
    let mut out = String::with_capacity(text.len() + 8);
    out.push_str(&text[..first]);
    for c in text[first..].chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&#39;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\r' => out.push_str("&#13;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn needs_quotes(escaped: &str) -> bool {
    escaped.is_empty() || escaped.contains(NEEDS_QUOTES)
}

fn is_raw_text_element(local: &str) -> bool {
    matches!(local, "iframe" | "noscript" | "script" | "style")
}

enum SerializeOp {
    Open(NodeId),
    RawText(NodeId),
    Close(NodeId),
}

struct Printer<'a, W: Write> {
    writer: W,
    dom: &'a Dom,
}

impl<'a, W: Write> Printer<'a, W> {
    fn new(writer: W, dom: &'a Dom) -> Printer<'a, W> {
        Printer { writer, dom }
    }

    fn print(&mut self, node: NodeId) -> Result<(), RenderError> {
        let dom = self.dom;
        let mut ops = vec![SerializeOp::Open(node)];

        while let Some(op) = ops.pop() {
            match op {
                SerializeOp::Open(id) => match dom.data(id) {
                    NodeData::Error => return Err(RenderError::ErrorNode),

                    NodeData::Text { contents } => self.write_text(id, contents)?,

                    NodeData::Document => {
                        ops.extend(dom.children(id).rev().map(SerializeOp::Open));
                    },

                    NodeData::Comment { .. } => (),

                    NodeData::Doctype { name } => {
                        self.writer.write_all(b"<!doctype ")?;
                        self.writer.write_all(name.as_bytes())?;
                        self.writer.write_all(b">")?;
                    },

                    NodeData::Element { name, .. } => {
                        if !self.start_elem(id)? {
                            continue;
                        }
                        ops.push(SerializeOp::Close(id));
                        let raw = is_raw_text_element(&name.local);
                        for child in dom.children(id).rev() {
                            let is_text = matches!(dom.data(child), NodeData::Text { .. });
                            ops.push(if raw && is_text {
                                SerializeOp::RawText(child)
                            } else {
                                SerializeOp::Open(child)
                            });
                        }
                    },

                    other @ NodeData::ProcessingInstruction { .. } => {
                        return Err(RenderError::UnsupportedNode { kind: other.kind() });
                    },
                },

                SerializeOp::RawText(id) => {
                    if let Some(text) = dom.text(id) {
                        self.writer.write_all(text.as_bytes())?;
                    }
                },

                SerializeOp::Close(id) => self.end_elem(id)?,
            }
        }

        Ok(())
    }

    fn write_text(&mut self, id: NodeId, text: &str) -> Result<(), RenderError> {
        if text.is_empty() {
            return Ok(());
        }
        if text.starts_with(['\n', '\r']) && self.is_first_in_pre(id) {
            // The next parse drops one leading newline from <pre> and <textarea>.
            self.writer.write_all(b"\n")?;
        }
        self.writer.write_all(escape(text).as_bytes())?;
        Ok(())
    }

    /// Is `id` the first rendered child of a `pre` or `textarea`?
    fn is_first_in_pre(&self, id: NodeId) -> bool {
        let dom = self.dom;
        let Some(parent) = dom.parent(id) else {
            return false;
        };
        if !(dom.is_element(parent, "pre") || dom.is_element(parent, "textarea")) {
            return false;
        }
        dom.preceding_siblings(id).all(|sibling| match dom.data(sibling) {
            NodeData::Comment { .. } => true,
            NodeData::Text { contents } => contents.is_empty(),
            _ => false,
        })
    }

    /// Writes the start tag. Returns whether children and an end tag follow.
    fn start_elem(&mut self, id: NodeId) -> Result<bool, RenderError> {
        let dom = self.dom;
        let (name, attrs) = match dom.data(id) {
            NodeData::Element { name, attrs, .. } => (name, attrs),
            other => return Err(RenderError::NotAnElement { kind: other.kind() }),
        };
        let tag = tag_name(&name.ns, &name.local);

        self.writer.write_all(b"<")?;
        self.writer.write_all(tag.as_bytes())?;

        let mut sorted: Vec<&Attribute> = attrs.iter().collect();
        sorted.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        for attr in sorted {
            self.write_attr(attr)?;
        }

        if VOID_ELEMENTS.contains(&*name.local) {
            if dom.has_children(id) {
                return Err(RenderError::VoidElementWithChildren { name: tag });
            }
            if self.in_foreign_content(id) {
                self.writer.write_all(b" />")?;
            } else {
                self.writer.write_all(b">")?;
            }
            return Ok(false);
        }

        self.writer.write_all(b">")?;
        Ok(true)
    }

    fn end_elem(&mut self, id: NodeId) -> Result<(), RenderError> {
        let name = match self.dom.element_name(id) {
            Some(name) => name,
            None => {
                return Err(RenderError::NotAnElement {
                    kind: self.dom.data(id).kind(),
                })
            },
        };
        self.writer.write_all(b"</")?;
        self.writer.write_all(tag_name(&name.ns, &name.local).as_bytes())?;
        self.writer.write_all(b">")?;
        Ok(())
    }

    fn write_attr(&mut self, attr: &Attribute) -> io::Result<()> {
        self.writer.write_all(b" ")?;
        if let Some(ref ns) = attr.namespace {
            if !ns.is_empty() {
                self.writer.write_all(ns.as_bytes())?;
                self.writer.write_all(b":")?;
            }
        }
        self.writer.write_all(attr.key.to_lowercase().as_bytes())?;

        // Attributes without a value are written as just the name.
        if attr.value.is_empty() {
            return Ok(());
        }
        let value = escape(&attr.value);
        self.writer.write_all(b"=")?;
        if needs_quotes(&value) {
            self.writer.write_all(b"\"")?;
            self.writer.write_all(value.as_bytes())?;
            self.writer.write_all(b"\"")
        } else {
            self.writer.write_all(value.as_bytes())
        }
    }

    /// Whether the nearest `svg`/`math` ancestor-or-self is closer than
    /// the nearest HTML integration point.
    fn in_foreign_content(&self, id: NodeId) -> bool {
        let dom = self.dom;
        let mut cur = Some(id);
        while let Some(node) = cur {
            if let Some(name) = dom.element_name(node) {
                let ns = &*name.ns;
                let local = &*name.local;
                if is_html_integration_point(dom, node, ns, local) {
                    return false;
                }
                if (ns == SVG_NAMESPACE && local == "svg") || (ns == MATHML_NAMESPACE && local == "math") {
                    return true;
                }
            }
            cur = dom.parent(node);
        }
        false
    }
}

fn is_html_integration_point(dom: &Dom, node: NodeId, ns: &str, local: &str) -> bool {
    if ns == MATHML_NAMESPACE && local == "annotation-xml" {
        return dom.attribute_value(node, "encoding").map_or(false, |enc| {
            enc.eq_ignore_ascii_case("text/html") || enc.eq_ignore_ascii_case("application/xhtml+xml")
        });
    }
    ns == SVG_NAMESPACE
        && (local.eq_ignore_ascii_case("foreignobject")
            || local.eq_ignore_ascii_case("desc")
            || local.eq_ignore_ascii_case("title"))
}

fn tag_name(ns: &str, local: &str) -> String {
    match ns {
        HTML_NAMESPACE | SVG_NAMESPACE | MATHML_NAMESPACE => (),
        _ => warn!("element <{}> with unexpected namespace {:?}", local, ns),
    }
    local.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_document;
    use html5ever::{LocalName, Namespace, QualName};

    fn svg_element(dom: &mut Dom, local: &str) -> NodeId {
        dom.create(NodeData::Element {
            name: QualName::new(None, Namespace::from(SVG_NAMESPACE), LocalName::from(local)),
            attrs: vec![],
            mathml_annotation_xml_integration_point: false,
        })
    }

    fn render(dom: &Dom, node: NodeId) -> String {
        print_to_string(dom, node).unwrap()
    }

    #[test]
    fn escaping() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("a<b>&'\"\r"), "a&lt;b&gt;&amp;&#39;&#34;&#13;");
        assert!(matches!(escape("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn quoting() {
        assert!(needs_quotes(""));
        assert!(needs_quotes("a b"));
        assert!(needs_quotes("a=b"));
        assert!(needs_quotes("a`b"));
        assert!(needs_quotes("a\x0cb"));
        assert!(!needs_quotes("a&lt;b"));
        assert!(!needs_quotes("Вконтакте"));
    }

    #[test]
    fn duplicate_keys_keep_their_order() {
        let mut dom = Dom::new();
        let lemur = dom.create_element(
            "lemur",
            vec![
                Attribute::new("x", "4"),
                Attribute::new("x", "3"),
                Attribute::new("b", "5"),
            ],
        );
        assert_eq!(render(&dom, lemur), "<lemur b=5 x=4 x=3></lemur>");
        // Printing never reorders the tree itself.
        assert_eq!(dom.attrs(lemur)[0].key, "x");
    }

    #[test]
    fn foreign_void_element_self_closes() {
        let mut dom = Dom::new();
        let svg = svg_element(&mut dom, "svg");
        let link = svg_element(&mut dom, "link");
        dom.append(svg, link);
        assert_eq!(render(&dom, svg), "<svg><link /></svg>");

        let foreign_object = svg_element(&mut dom, "foreignObject");
        dom.append(svg, foreign_object);
        let html_link = dom.create_element("link", vec![Attribute::new("rel", "alternate")]);
        dom.append(foreign_object, html_link);
        assert_eq!(render(&dom, foreign_object), "<foreignobject><link rel=alternate></foreignobject>");
    }

    #[test]
    fn annotation_xml_needs_html_encoding() {
        let dom = parse_document(
            "<math><annotation-xml encoding=SVG1.1><link></annotation-xml>\
             <annotation-xml encoding=Text/HTML><link></annotation-xml></math>",
        );
        let math = dom.find_element(dom.document(), "math").unwrap();
        let out = render(&dom, math);
        assert!(out.contains("<annotation-xml encoding=SVG1.1><link /></annotation-xml>"), "{}", out);
        assert!(out.contains("<annotation-xml encoding=Text/HTML><link></annotation-xml>"), "{}", out);
    }

    #[test]
    fn void_element_with_children() {
        let mut dom = Dom::new();
        let br = dom.create_element("br", vec![]);
        let text = dom.create_text("oops");
        dom.append(br, text);
        match print_to_string(&dom, br) {
            Err(RenderError::VoidElementWithChildren { name }) => assert_eq!(name, "br"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn start_elem_rejects_other_nodes() {
        let mut dom = Dom::new();
        let text = dom.create_text("x");
        let mut printer = Printer::new(Vec::new(), &dom);
        match printer.start_elem(text) {
            Err(RenderError::NotAnElement { kind }) => assert_eq!(kind, "text"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn error_and_unsupported_nodes() {
        let mut dom = Dom::new();
        let p = dom.create_element("p", vec![]);
        let error = dom.create(NodeData::Error);
        dom.append(p, error);
        assert!(matches!(print_to_string(&dom, p), Err(RenderError::ErrorNode)));

        let pi = dom.create(NodeData::ProcessingInstruction {
            target: "xml".into(),
            contents: "version=1.0".into(),
        });
        match print_to_string(&dom, pi) {
            Err(RenderError::UnsupportedNode { kind }) => assert_eq!(kind, "processing instruction"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn pre_newline_after_comment() {
        let mut dom = Dom::new();
        let pre = dom.create_element("pre", vec![]);
        let comment = dom.create(NodeData::Comment { contents: "c".into() });
        let empty = dom.create_text("");
        let text = dom.create_text("\nfoo");
        dom.append_children(pre, vec![comment, empty, text]);
        assert_eq!(render(&dom, pre), "<pre>\n\nfoo</pre>");

        let b = dom.create_element("b", vec![]);
        dom.insert_before(text, b);
        assert_eq!(render(&dom, pre), "<pre><b></b>\nfoo</pre>");
    }

    #[test]
    fn raw_text_is_direct_children_only() {
        let mut dom = Dom::new();
        let noscript = dom.create_element("noscript", vec![]);
        let raw = dom.create_text("a<b");
        let p = dom.create_element("p", vec![]);
        let escaped = dom.create_text("a<b");
        dom.append(noscript, raw);
        dom.append(noscript, p);
        dom.append(p, escaped);
        assert_eq!(render(&dom, noscript), "<noscript>a<b<p>a&lt;b</p></noscript>");
    }
}
