// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Puts the children of `<head>` in the order AMP caches serve them:
//!
//! 1. `<meta charset>`, then `<meta name=viewport>`
//! 2. the runtime CSS `<link>`, then `<style amp-runtime>`
//! 3. the amp-story CSS `<link>` and `<style amp-extension=amp-story>`
//! 4. remaining `<meta>` tags
//! 5. runtime scripts, then the viewer script
//! 6. render-delaying extension scripts, then the other extension scripts
//! 7. favicon links, then resource hints
//! 8. stylesheet links seen before `<style amp-custom>`, then the style itself
//! 9. anything else, in document order
//! 10. the boilerplate `<style>`, then its `<noscript>`
//!
//! Only one of each single-slot element is placed; later duplicates land
//! with everything else. Extension scripts are de-duplicated by extension
//! name and sorted by it.

use std::collections::BTreeMap;

use crate::amphtml::{
    extension_name, is_script_amp_extension, is_script_amp_runtime, is_script_amp_viewer,
    is_script_render_delaying, Skeleton, AMP4ADS_BOILERPLATE, AMP4EMAIL_BOILERPLATE,
    AMP_BOILERPLATE, AMP_CACHE_ROOT_URL, AMP_CUSTOM, AMP_RUNTIME, AMP_STORY,
};
use crate::dom::{Dom, NodeId};
use crate::error::PassError;
use crate::transformer::Context;

pub(super) fn apply(ctx: &mut Context<'_>) -> Result<(), PassError> {
    let dom = &mut ctx.dom;
    let head = Skeleton::find(dom)?.head;

    let mut nodes = HeadNodes::default();
    for child in dom.children(head) {
        nodes.register(dom, child);
    }
    let order = nodes.into_order(dom);

    dom.remove_all_children(head);
    dom.append_children(head, order);
    Ok(())
}

#[derive(Default)]
struct HeadNodes {
    meta_charset: Option<NodeId>,
    meta_viewport: Option<NodeId>,
    meta_other: Vec<NodeId>,
    link_runtime_css: Option<NodeId>,
    link_amp_story_css: Option<NodeId>,
    link_favicon: Vec<NodeId>,
    link_resource_hint: Vec<NodeId>,
    link_stylesheet_before_amp_custom: Vec<NodeId>,
    script_amp_runtime: Vec<NodeId>,
    script_amp_viewer: Option<NodeId>,
    script_render_delaying: Vec<NodeId>,
    script_non_render_delaying: Vec<NodeId>,
    style_amp_runtime: Option<NodeId>,
    style_amp_story: Option<NodeId>,
    style_amp_custom: Option<NodeId>,
    style_boilerplate: Option<NodeId>,
    noscript: Option<NodeId>,
    other: Vec<NodeId>,
}

/// Fill a single slot, or push `n` to `other` if it is taken.
fn first_only(slot: &mut Option<NodeId>, other: &mut Vec<NodeId>, n: NodeId) {
    match *slot {
        None => *slot = Some(n),
        Some(_) => other.push(n),
    }
}

impl HeadNodes {
    fn register(&mut self, dom: &Dom, n: NodeId) {
        let Some(name) = dom.element_name(n) else {
            self.other.push(n);
            return;
        };
        match &*name.local {
            "link" => self.register_link(dom, n),
            "meta" => self.register_meta(dom, n),
            "noscript" => first_only(&mut self.noscript, &mut self.other, n),
            "script" => self.register_script(dom, n),
            "style" => self.register_style(dom, n),
            _ => self.other.push(n),
        }
    }

    fn register_link(&mut self, dom: &Dom, n: NodeId) {
        let rel = dom.attribute_value(n, "rel").map(str::to_lowercase);
        match rel.as_deref() {
            Some("dns-prefetch preconnect") => self.link_resource_hint.push(n),
            Some("icon") | Some("icon shortcut") | Some("shortcut icon") => self.link_favicon.push(n),
            Some("stylesheet") => {
                let cached = dom
                    .attribute_value(n, "href")
                    .filter(|href| href.starts_with(AMP_CACHE_ROOT_URL));
                match cached {
                    Some(href) if href.ends_with("/v0.css") => {
                        first_only(&mut self.link_runtime_css, &mut self.other, n)
                    },
                    Some(href) if href.ends_with("/amp-story-1.0.css") => {
                        first_only(&mut self.link_amp_story_css, &mut self.other, n)
                    },
                    _ if self.style_amp_custom.is_none() => self.link_stylesheet_before_amp_custom.push(n),
                    _ => self.other.push(n),
                }
            },
            _ => self.other.push(n),
        }
    }

    fn register_meta(&mut self, dom: &Dom, n: NodeId) {
        if dom.has_attribute(n, "charset") {
            first_only(&mut self.meta_charset, &mut self.other, n);
        } else if dom.attribute_value(n, "name") == Some("viewport") {
            first_only(&mut self.meta_viewport, &mut self.other, n);
        } else {
            self.meta_other.push(n);
        }
    }

    fn register_script(&mut self, dom: &Dom, n: NodeId) {
        if is_script_amp_runtime(dom, n) {
            self.script_amp_runtime.push(n);
        } else if is_script_amp_viewer(dom, n) {
            first_only(&mut self.script_amp_viewer, &mut self.other, n);
        } else if is_script_amp_extension(dom, n) {
            if is_script_render_delaying(dom, n) {
                self.script_render_delaying.push(n);
            } else {
                self.script_non_render_delaying.push(n);
            }
        } else {
            self.other.push(n);
        }
    }

    fn register_style(&mut self, dom: &Dom, n: NodeId) {
        let slot = if [AMP_BOILERPLATE, AMP4ADS_BOILERPLATE, AMP4EMAIL_BOILERPLATE]
            .iter()
            .any(|key| dom.has_attribute(n, key))
        {
            &mut self.style_boilerplate
        } else if dom.has_attribute(n, AMP_CUSTOM) {
            &mut self.style_amp_custom
        } else if dom.has_attribute(n, AMP_RUNTIME) {
            &mut self.style_amp_runtime
        } else if dom.attribute_value(n, "amp-extension") == Some(AMP_STORY) {
            &mut self.style_amp_story
        } else {
            self.other.push(n);
            return;
        };
        first_only(slot, &mut self.other, n);
    }

    fn into_order(self, dom: &Dom) -> Vec<NodeId> {
        let mut order = Vec::new();
        order.extend(self.meta_charset);
        order.extend(self.meta_viewport);
        order.extend(self.link_runtime_css);
        order.extend(self.style_amp_runtime);
        order.extend(self.link_amp_story_css);
        order.extend(self.style_amp_story);
        order.extend(self.meta_other);
        order.extend(self.script_amp_runtime);
        order.extend(self.script_amp_viewer);
        order.extend(unique_extensions(dom, self.script_render_delaying));
        order.extend(unique_extensions(dom, self.script_non_render_delaying));
        order.extend(self.link_favicon);
        order.extend(self.link_resource_hint);
        order.extend(self.link_stylesheet_before_amp_custom);
        order.extend(self.style_amp_custom);
        order.extend(self.other);
        order.extend(self.style_boilerplate);
        order.extend(self.noscript);
        order
    }
}

/// One script per extension, the first seen, sorted by extension name.
fn unique_extensions(dom: &Dom, scripts: Vec<NodeId>) -> impl Iterator<Item = NodeId> {
    let mut unique = BTreeMap::new();
    for script in scripts {
        let key = extension_name(dom, script)
            .or_else(|| dom.attribute_value(script, "src"))
            .unwrap_or("")
            .to_owned();
        unique.entry(key).or_insert(script);
    }
    unique.into_values()
}
