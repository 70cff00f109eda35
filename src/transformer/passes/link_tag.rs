// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Connection hints for `<link>` tags.
//!
//! - the first Google Fonts link gets a preconnect to the font host in
//!   front of it;
//! - Google Fonts stylesheets without a `display` parameter get
//!   `display=optional`;
//! - head gets a preconnect to the publisher's own origin.
//!
//! Hints that are already present are not added again.

use url::Url;

use crate::amphtml::Skeleton;
use crate::dom::{Attribute, Dom, NodeId};
use crate::error::PassError;
use crate::transformer::Context;

const GOOGLE_FONTS_ROOT: &str = "https://fonts.googleapis.com/";
const GOOGLE_FONTS_HOST: &str = "https://fonts.gstatic.com/";
const PRECONNECT: &str = "dns-prefetch preconnect";

pub(super) fn apply(ctx: &mut Context<'_>) -> Result<(), PassError> {
    let head = Skeleton::find(&ctx.dom)?.head;
    let origin = ctx
        .document_url
        .as_ref()
        .map(Url::origin)
        .filter(|origin| origin.is_tuple())
        .map(|origin| origin.ascii_serialization());

    let dom = &mut ctx.dom;
    let root = dom.document();
    let mut font_host_added = has_preconnect(dom, root, GOOGLE_FONTS_HOST);

    let mut cur = Some(root);
    while let Some(id) = cur {
        cur = dom.next(id, root);
        if !dom.is_element(id, "link") {
            continue;
        }
        let Some(href) = dom.attribute_value(id, "href").map(str::to_owned) else {
            continue;
        };
        if !font_host_added && href.starts_with(GOOGLE_FONTS_ROOT) {
            let link = dom.create_element(
                "link",
                vec![
                    Attribute::new("crossorigin", ""),
                    Attribute::new("href", GOOGLE_FONTS_HOST),
                    Attribute::new("rel", PRECONNECT),
                ],
            );
            dom.insert_before(id, link);
            font_host_added = true;
        }
        if is_google_font_css(&href) && lacks_display(&href) {
            dom.set_attribute(id, "href", &format!("{}&display=optional", href));
        }
    }

    if let Some(origin) = origin {
        if !has_preconnect(dom, head, &origin) {
            let link = dom.create_element(
                "link",
                vec![Attribute::new("href", &*origin), Attribute::new("rel", PRECONNECT)],
            );
            dom.append(head, link);
        }
    }
    Ok(())
}

fn is_google_font_css(href: &str) -> bool {
    let Some(path) = href.strip_prefix(GOOGLE_FONTS_ROOT) else {
        return false;
    };
    path.starts_with("css?") || path.starts_with("css2?")
}

fn lacks_display(href: &str) -> bool {
    match Url::parse(&href.to_lowercase()) {
        Ok(url) => !url
            .query_pairs()
            .any(|(key, value)| key == "display" && !value.is_empty()),
        Err(_) => false,
    }
}

/// Is there a preconnect `<link>` to `href` anywhere below `root`?
fn has_preconnect(dom: &Dom, root: NodeId, href: &str) -> bool {
    dom.descendants(root).any(|id| {
        dom.is_element(id, "link")
            && dom.attribute_value(id, "href") == Some(href)
            && dom
                .attribute_value(id, "rel")
                .map_or(false, |rel| rel.eq_ignore_ascii_case(PRECONNECT))
    })
}
