// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Strips `<meta>` tags a cache has no business serving and moves the
//! rest of the body's `<meta>` tags into head. Ordering within head is
//! left to `reorderhead`.

use crate::amphtml::Skeleton;
use crate::dom::{Dom, NodeId};
use crate::error::PassError;
use crate::transformer::Context;

const KEPT_NAME_PREFIXES: &[&str] = &["amp-", "amp4ads-", "dc.", "i-amphtml-", "twitter:"];
const KEPT_NAMES: &[&str] = &["apple-itunes-app", "copyright", "referrer", "viewport"];
const KEPT_PROPERTY_PREFIXES: &[&str] = &["al:", "fb:", "og:"];

pub(super) fn apply(ctx: &mut Context<'_>) -> Result<(), PassError> {
    let dom = &mut ctx.dom;
    let skeleton = Skeleton::find(dom)?;

    let metas: Vec<NodeId> = dom
        .descendants(dom.document())
        .filter(|&id| dom.is_element(id, "meta"))
        .collect();
    for meta in metas {
        if should_strip(dom, meta) {
            dom.detach(meta);
        } else if dom.is_descendant_of(meta, "body") {
            dom.append(skeleton.head, meta);
        }
    }
    Ok(())
}

fn should_strip(dom: &Dom, meta: NodeId) -> bool {
    if dom.has_attribute(meta, "charset") {
        return false;
    }
    if let Some(equiv) = dom.attribute_value(meta, "http-equiv") {
        return equiv.eq_ignore_ascii_case("x-dns-prefetch-control");
    }
    if !["content", "itemprop", "name", "property"]
        .iter()
        .any(|key| dom.has_attribute(meta, key))
    {
        return false;
    }

    if let Some(name) = dom.attribute_value(meta, "name") {
        let name = name.to_lowercase();
        if KEPT_NAME_PREFIXES.iter().any(|p| name.starts_with(p))
            || KEPT_NAMES.contains(&name.as_str())
        {
            return false;
        }
    }
    if let Some(property) = dom.attribute_value(meta, "property") {
        let property = property.to_lowercase();
        if KEPT_PROPERTY_PREFIXES.iter().any(|p| property.starts_with(p)) {
            return false;
        }
    }
    // amp-subscriptions reads these.
    !(dom.has_attribute(meta, "itemprop") && !dom.has_attribute(meta, "name"))
}
