// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Normalizes the tree before any other pass looks at it.
//!
//! - comments and `<noscript>` elements are dropped;
//! - duplicate attributes are dropped (first wins), as is `nonce`;
//! - TAB, CR and LF are stripped from `src` and `href`;
//! - only the first `<title>` in head survives, none in body (svg
//!   titles are left alone);
//! - the doctype becomes `<!doctype html>`;
//! - whitespace-only text outside `<body>` is dropped, except in `<title>`;
//! - `<%` and `%>` are escaped inside `<script>` and `<style>`;
//! - `<style amp-custom>` loses its other attributes, or is removed when empty.

use std::collections::HashSet;

use tendril::StrTendril;

use crate::amphtml::{Skeleton, AMP_CUSTOM};
use crate::dom::{Attribute, Dom, NodeData, NodeId};
use crate::error::PassError;
use crate::transformer::Context;

const WHITESPACE: &[char] = &[' ', '\t', '\r', '\n', '\x0c'];

pub(super) fn apply(ctx: &mut Context<'_>) -> Result<(), PassError> {
    let dom = &mut ctx.dom;
    let root = dom.document();

    let mut cur = Some(root);
    while let Some(id) = cur {
        let remove = match *dom.data(id) {
            NodeData::Comment { .. } => true,
            NodeData::Element { .. } if dom.is_element(id, "noscript") => true,
            NodeData::Element { .. } => {
                clean_attributes(dom, id);
                dom.is_element(id, "title") && is_extra_title(dom, id)
            },
            NodeData::Doctype { ref name } if &**name != "html" => {
                dom.node_mut(id).data = NodeData::Doctype {
                    name: StrTendril::from_slice("html"),
                };
                false
            },
            NodeData::Text { ref contents } => {
                let blank = contents.trim_start_matches(WHITESPACE).is_empty();
                if blank && !dom.is_descendant_of(id, "body") && !dom.is_child_of(id, "title") {
                    true
                } else {
                    escape_server_tags(dom, id);
                    false
                }
            },
            _ => false,
        };

        if remove {
            cur = dom.next_skipping_children(id, root);
            dom.detach(id);
        } else {
            cur = dom.next(id, root);
        }
    }

    let skeleton = Skeleton::find(dom)?;
    fix_style_amp_custom(dom, skeleton.head);
    Ok(())
}

fn clean_attributes(dom: &mut Dom, id: NodeId) {
    let Some(attrs) = dom.attrs_mut(id) else {
        return;
    };
    let mut seen = HashSet::new();
    attrs.retain(|a| seen.insert(a.sort_key().into_owned()));
    attrs.retain(|a| a.namespace.is_some() || a.key != "nonce");
    for attr in attrs.iter_mut() {
        if attr.namespace.is_none() && (attr.key == "src" || attr.key == "href") {
            attr.value.retain(|c| !matches!(c, '\t' | '\n' | '\r'));
        }
    }
}

/// One `<title>` in head, none in body. Titles inside svg don't count.
fn is_extra_title(dom: &Dom, id: NodeId) -> bool {
    if dom.is_descendant_of(id, "svg") {
        return false;
    }
    if dom.is_descendant_of(id, "head") {
        return dom
            .preceding_siblings(id)
            .any(|sibling| dom.is_element(sibling, "title"));
    }
    dom.is_descendant_of(id, "body")
}

/// Keep JSP/ASP delimiters from being read as markup.
fn escape_server_tags(dom: &mut Dom, id: NodeId) {
    let (open, close) = if dom.is_child_of(id, "script") {
        ("\\u003c%", "%\\u003e")
    } else if dom.is_child_of(id, "style") {
        ("\\3c %", "%\\3e ")
    } else {
        return;
    };
    if let Some(contents) = dom.text_mut(id) {
        if let Some(replaced) = replace_delimiters(contents, open, close) {
            *contents = StrTendril::from(replaced);
        }
    }
}

/// Replace `<%` and `%>` in one left-to-right scan, so that a replacement
/// is never matched again.
fn replace_delimiters(text: &str, open: &str, close: &str) -> Option<String> {
    if !text.contains("<%") && !text.contains("%>") {
        return None;
    }
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len() + 16);
    let (mut i, mut last) = (0, 0);
    while i + 1 < bytes.len() {
        let replacement = match (bytes[i], bytes[i + 1]) {
            (b'<', b'%') => open,
            (b'%', b'>') => close,
            _ => {
                i += 1;
                continue;
            },
        };
        out.push_str(&text[last..i]);
        out.push_str(replacement);
        i += 2;
        last = i;
    }
    out.push_str(&text[last..]);
    Some(out)
}

/// There can only be one `<style amp-custom>`, and only in head.
fn fix_style_amp_custom(dom: &mut Dom, head: NodeId) {
    let found = dom
        .children(head)
        .find(|&c| dom.is_element(c, "style") && dom.has_attribute(c, AMP_CUSTOM));
    let Some(style) = found else {
        return;
    };
    if !dom.has_children(style) {
        dom.detach(style);
    } else if let Some(attrs) = dom.attrs_mut(style) {
        *attrs = vec![Attribute::new(AMP_CUSTOM, "")];
    }
}
