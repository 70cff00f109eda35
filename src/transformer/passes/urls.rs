// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Rewrites URL-valued attributes against the document's base URL.
//!
//! A URL is either made *absolute*, or *portable*: absolute unless it
//! points back into the page, in which case it becomes a bare fragment.
//! Nothing inside `<template>` is rewritten, since those are mustache
//! templates rendered client side.

use url::{Position, Url};

use crate::amphtml::{Skeleton, AMP_STORY};
use crate::dom::{Dom, NodeId};
use crate::error::PassError;
use crate::transformer::Context;

const ANY_TAG_ATTRS: &[&str] = &["src"];
const AMP_INSTALL_SERVICEWORKER_ATTRS: &[&str] =
    &["data-iframe-src", "data-no-service-worker-fallback-shell-url"];
const AMP_STORY_ATTRS: &[&str] = &[
    "background-audio",
    "bookend-config-src",
    "poster-landscape-src",
    "poster-square-src",
    "publisher-logo-src",
];
const AMP_STORY_PAGE_ATTRS: &[&str] = &["background-audio"];
const FORM_ATTRS: &[&str] = &["action", "action-xhr"];
const IMG_ATTRS: &[&str] = &["longdesc"];

pub(super) fn apply(ctx: &mut Context<'_>) -> Result<(), PassError> {
    let skeleton = Skeleton::find(&ctx.dom)?;
    let base = base_url(&ctx.dom, skeleton.head, ctx.document_url.as_ref())?;
    let base = base.as_ref();
    let target = base_target(&ctx.dom, skeleton.head);

    let dom = &mut ctx.dom;
    let root = dom.document();
    let mut cur = Some(root);
    while let Some(id) = cur {
        cur = dom.next(id, root);
        let Some(local) = dom.element_name(id).map(|name| name.local.clone()) else {
            continue;
        };
        if (*local).eq_ignore_ascii_case("amp-img") {
            continue;
        }

        rewrite_attrs(dom, id, base, ANY_TAG_ATTRS, false);
        match &*local {
            "form" => rewrite_attrs(dom, id, base, FORM_ATTRS, true),
            "img" => rewrite_attrs(dom, id, base, IMG_ATTRS, false),
            "amp-install-serviceworker" => {
                rewrite_attrs(dom, id, base, AMP_INSTALL_SERVICEWORKER_ATTRS, false)
            },
            AMP_STORY => rewrite_attrs(dom, id, base, AMP_STORY_ATTRS, false),
            "amp-story-page" => rewrite_attrs(dom, id, base, AMP_STORY_PAGE_ATTRS, false),
            _ => {},
        }

        let Some(href) = dom.attribute_value(id, "href").map(str::to_owned) else {
            continue;
        };
        let in_template = dom.is_descendant_of(id, "template");
        match &*local {
            // Every other URL has been resolved against it already.
            "base" => {
                dom.remove_attribute(id, "href");
                if dom.attrs(id).is_empty() {
                    cur = dom.next_skipping_children(id, root);
                    dom.detach(id);
                }
            },
            // Self-canonical documents would otherwise end up with `#`.
            "link" if dom.attribute_value(id, "rel") == Some("canonical") => {
                let href = rewrite_url(base, in_template, &href, true);
                dom.set_attribute(id, "href", &href);
            },
            "a" => {
                let href = rewrite_url(base, in_template, &href, false);
                if !href.starts_with('#') && !dom.attribute_value(id, "target").map_or(false, is_allowed_target) {
                    dom.set_attribute(id, "target", &target);
                }
                dom.set_attribute(id, "href", &href);
            },
            _ => {
                let href = rewrite_url(base, in_template, &href, false);
                dom.set_attribute(id, "href", &href);
            },
        }
    }
    Ok(())
}

/// The document URL, overridden by the first `<base href>` in head.
fn base_url(dom: &Dom, head: NodeId, document_url: Option<&Url>) -> Result<Option<Url>, PassError> {
    let href = dom
        .find_element(head, "base")
        .and_then(|base| dom.attribute_value(base, "href"))
        .map(str::trim)
        .filter(|href| !href.is_empty());
    let Some(href) = href else {
        return Ok(document_url.cloned());
    };
    match document_url {
        Some(document_url) => document_url
            .join(href)
            .map(Some)
            .map_err(|source| PassError::InvalidBaseUrl {
                href: href.to_owned(),
                source,
            }),
        None => Ok(Url::parse(href).ok()),
    }
}

/// Default `target` for links: `<base target>` if allowed, else `_top`.
fn base_target(dom: &Dom, head: NodeId) -> String {
    dom.find_element(head, "base")
        .and_then(|base| dom.attribute_value(base, "target"))
        .filter(|target| is_allowed_target(target))
        .unwrap_or("_top")
        .to_owned()
}

fn is_allowed_target(target: &str) -> bool {
    target.eq_ignore_ascii_case("_blank") || target.eq_ignore_ascii_case("_top")
}

fn rewrite_attrs(dom: &mut Dom, id: NodeId, base: Option<&Url>, keys: &[&str], absolute: bool) {
    if dom.is_descendant_of(id, "template") {
        return;
    }
    for &key in keys {
        if let Some(value) = dom.attribute_value(id, key) {
            let value = rewrite_url(base, false, value, absolute);
            dom.set_attribute(id, key, &value);
        }
    }
}

fn rewrite_url(base: Option<&Url>, in_template: bool, url: &str, absolute: bool) -> String {
    if in_template {
        return url.to_owned();
    }
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return url.to_owned();
    }
    // Protocol-relative says either scheme works, so take the secure one.
    if trimmed.starts_with("//") {
        return format!("https:{}", trimmed);
    }

    let parsed = match base {
        Some(base) => base.join(trimmed),
        None => Url::parse(trimmed),
    };
    let resolved = match parsed {
        Ok(u) if u.scheme() == "http" || u.scheme() == "https" => u,
        _ => return trimmed.to_owned(),
    };
    if absolute {
        return resolved.into();
    }

    // Links into the page that is already loaded stay on it.
    match base {
        Some(base) if resolved[..Position::AfterQuery] == base[..Position::AfterQuery] => {
            format!("#{}", resolved.fragment().unwrap_or(""))
        },
        _ => resolved.into(),
    }
}
