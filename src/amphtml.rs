// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! AMP names and element predicates shared by the transform passes.

use crate::dom::{Dom, NodeId};
use crate::error::PassError;

pub const AMP_BOILERPLATE: &str = "amp-boilerplate";

pub const AMP_BOILERPLATE_CSS: &str = "body{-webkit-animation:-amp-start 8s steps(1,end) 0s 1 normal both;-moz-animation:-amp-start 8s steps(1,end) 0s 1 normal both;-ms-animation:-amp-start 8s steps(1,end) 0s 1 normal both;animation:-amp-start 8s steps(1,end) 0s 1 normal both}@-webkit-keyframes -amp-start{from{visibility:hidden}to{visibility:visible}}@-moz-keyframes -amp-start{from{visibility:hidden}to{visibility:visible}}@-ms-keyframes -amp-start{from{visibility:hidden}to{visibility:visible}}@-o-keyframes -amp-start{from{visibility:hidden}to{visibility:visible}}@keyframes -amp-start{from{visibility:hidden}to{visibility:visible}}";

pub const AMP_BOILERPLATE_NOSCRIPT_CSS: &str =
    "body{-webkit-animation:none;-moz-animation:none;-ms-animation:none;animation:none}";

pub const AMP4ADS_BOILERPLATE: &str = "amp4ads-boilerplate";

pub const AMP4EMAIL_BOILERPLATE: &str = "amp4email-boilerplate";

pub const AMP4ADS_AND_AMP4EMAIL_BOILERPLATE_CSS: &str = "body{visibility:hidden}";

pub const AMP_CACHE_SCHEME_AND_HOST: &str = "https://cdn.ampproject.org";

pub const AMP_CACHE_ROOT_URL: &str = "https://cdn.ampproject.org/";

pub const AMP_CUSTOM: &str = "amp-custom";

pub const AMP_CUSTOM_ELEMENT: &str = "custom-element";

pub const AMP_CUSTOM_TEMPLATE: &str = "custom-template";

pub const AMP_DYNAMIC_CSS_CLASSES: &str = "amp-dynamic-css-classes";

pub const AMP_EXPERIMENT: &str = "amp-experiment";

pub const AMP_RUNTIME: &str = "amp-runtime";

pub const AMP_STORY: &str = "amp-story";

/// Attribute on `<html>` naming who transformed the document.
pub const TRANSFORMED: &str = "transformed";

pub const TRANSFORMED_BY: &str = "google";

/// Set on `<html>` by server-side rendering when no boilerplate is needed.
pub const NO_BOILERPLATE: &str = "i-amphtml-no-boilerplate";

/// The `<html>`, `<head>` and `<body>` of a document.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Skeleton {
    pub html: NodeId,
    pub head: NodeId,
    pub body: NodeId,
}

impl Skeleton {
    pub fn find(dom: &Dom) -> Result<Skeleton, PassError> {
        let html = dom
            .find_element(dom.document(), "html")
            .ok_or(PassError::MissingElement("html"))?;
        let head = dom
            .find_element(html, "head")
            .ok_or(PassError::MissingElement("head"))?;
        let body = dom
            .find_element(html, "body")
            .ok_or(PassError::MissingElement("body"))?;
        Ok(Skeleton { html, head, body })
    }
}

/// `<script>` with a `custom-element` or `custom-template` attribute.
pub fn is_script_amp_extension(dom: &Dom, n: NodeId) -> bool {
    dom.is_element(n, "script")
        && (dom.has_attribute(n, AMP_CUSTOM_ELEMENT) || dom.has_attribute(n, AMP_CUSTOM_TEMPLATE))
}

/// The extension a script loads, e.g. `amp-ad` for `custom-element=amp-ad`.
pub fn extension_name(dom: &Dom, n: NodeId) -> Option<&str> {
    dom.attribute_value(n, AMP_CUSTOM_ELEMENT)
        .or_else(|| dom.attribute_value(n, AMP_CUSTOM_TEMPLATE))
}

/// `<script async src=https://cdn.ampproject.org/.../v0.js>`
pub fn is_script_amp_runtime(dom: &Dom, n: NodeId) -> bool {
    if !dom.is_element(n, "script") || is_script_amp_extension(dom, n) {
        return false;
    }
    match dom.attribute_value(n, "src") {
        Some(src) => {
            dom.has_attribute(n, "async")
                && src.starts_with(AMP_CACHE_ROOT_URL)
                && (src.ends_with("/v0.js") || src.ends_with("/amp4ads-v0.js"))
        },
        None => false,
    }
}

/// `<script async src=https://cdn.ampproject.org/v0/amp-viewer-integration-*.js>`
pub fn is_script_amp_viewer(dom: &Dom, n: NodeId) -> bool {
    if !dom.is_element(n, "script") || is_script_amp_extension(dom, n) {
        return false;
    }
    let prefix = format!("{}/v0/amp-viewer-integration-", AMP_CACHE_SCHEME_AND_HOST);
    dom.attribute_value(n, "src")
        .map_or(false, |src| src.starts_with(&prefix) && src.ends_with(".js"))
        && dom.has_attribute(n, "async")
}

/// Extensions that hold back the first render.
pub fn is_script_render_delaying(dom: &Dom, n: NodeId) -> bool {
    if !dom.is_element(n, "script") {
        return false;
    }
    matches!(
        dom.attribute_value(n, AMP_CUSTOM_ELEMENT),
        Some(AMP_DYNAMIC_CSS_CLASSES) | Some(AMP_EXPERIMENT) | Some(AMP_STORY)
    )
}
