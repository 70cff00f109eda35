// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Replaces whatever boilerplate the publisher wrote with the canonical one
//! for the document's AMP flavour.

use crate::amphtml::{
    Skeleton, AMP4ADS_AND_AMP4EMAIL_BOILERPLATE_CSS, AMP4ADS_BOILERPLATE, AMP4EMAIL_BOILERPLATE,
    AMP_BOILERPLATE, AMP_BOILERPLATE_CSS, AMP_BOILERPLATE_NOSCRIPT_CSS, AMP_CUSTOM, AMP_RUNTIME,
    NO_BOILERPLATE,
};
use crate::dom::{Attribute, Dom, NodeId};
use crate::error::PassError;
use crate::transformer::Context;

pub(super) fn apply(ctx: &mut Context<'_>) -> Result<(), PassError> {
    let dom = &mut ctx.dom;
    let skeleton = Skeleton::find(dom)?;

    strip(dom, skeleton.head);
    if dom.has_attribute(skeleton.html, NO_BOILERPLATE) {
        return Ok(());
    }

    let (boilerplate, css) = flavour(dom, skeleton.html);
    let style = boilerplate_style(dom, boilerplate, css);
    dom.append(skeleton.head, style);

    if boilerplate == AMP_BOILERPLATE {
        let noscript = dom.create_element("noscript", vec![]);
        let style = boilerplate_style(dom, boilerplate, AMP_BOILERPLATE_NOSCRIPT_CSS);
        dom.append(noscript, style);
        dom.append(skeleton.head, noscript);
    }
    Ok(())
}

/// Drop `<noscript>` and every `<style>` but amp-custom and amp-runtime.
fn strip(dom: &mut Dom, head: NodeId) {
    let mut cur = dom.first_child(head);
    while let Some(id) = cur {
        let remove = if dom.is_element(id, "style") {
            !dom.has_attribute(id, AMP_CUSTOM) && !dom.has_attribute(id, AMP_RUNTIME)
        } else {
            dom.is_element(id, "noscript")
        };
        if remove {
            cur = dom.next_skipping_children(id, head);
            dom.detach(id);
        } else {
            cur = dom.next(id, head);
        }
    }
}

/// Boilerplate attribute and CSS, by the flavour attribute on `<html>`.
/// The last flavour attribute wins.
fn flavour(dom: &Dom, html: NodeId) -> (&'static str, &'static str) {
    let mut found = (AMP_BOILERPLATE, AMP_BOILERPLATE_CSS);
    for attr in dom.attrs(html) {
        match &*attr.key {
            "amp4ads" | "\u{26a1}4ads" => found = (AMP4ADS_BOILERPLATE, AMP4ADS_AND_AMP4EMAIL_BOILERPLATE_CSS),
            "amp4email" | "\u{26a1}4email" => {
                found = (AMP4EMAIL_BOILERPLATE, AMP4ADS_AND_AMP4EMAIL_BOILERPLATE_CSS)
            },
            _ => {},
        }
    }
    found
}

fn boilerplate_style(dom: &mut Dom, boilerplate: &str, css: &str) -> NodeId {
    let style = dom.create_element("style", vec![Attribute::new(boilerplate, "")]);
    let text = dom.create_text(css);
    dom.append(style, text);
    style
}

#[cfg(test)]
mod tests {
    use super::super::{run_pass, Pass};
    use crate::amphtml::{AMP4ADS_AND_AMP4EMAIL_BOILERPLATE_CSS, AMP_BOILERPLATE_CSS, AMP_BOILERPLATE_NOSCRIPT_CSS};

    const RUNTIME: &str = "<script async src=https://cdn.ampproject.org/v0.js></script>";

    fn boilerplate(html: &str) -> String {
        run_pass(Pass::AmpBoilerplate, html, "")
    }

    fn canonical(html_attr: &str) -> String {
        format!(
            "<!doctype html><html {}><head>{}<style amp-boilerplate>{}</style><noscript><style amp-boilerplate>{}</style></noscript></head><body></body></html>",
            html_attr, RUNTIME, AMP_BOILERPLATE_CSS, AMP_BOILERPLATE_NOSCRIPT_CSS
        )
    }

    fn ads_or_email(html_attr: &str, boilerplate: &str) -> String {
        format!(
            "<!doctype html><html {}><head>{}<style {}>{}</style></head><body></body></html>",
            html_attr, RUNTIME, boilerplate, AMP4ADS_AND_AMP4EMAIL_BOILERPLATE_CSS
        )
    }

    #[test]
    fn keeps_boilerplate() {
        assert_eq!(boilerplate(&canonical("⚡")), canonical("⚡"));
    }

    #[test]
    fn adds_missing_boilerplate() {
        let input = format!("<!doctype html><html ⚡><head>{}</head><body></body></html>", RUNTIME);
        assert_eq!(boilerplate(&input), canonical("⚡"));
    }

    #[test]
    fn replaces_old_boilerplate() {
        let input = format!(
            "<!doctype html><html ⚡><head>{}<style>body {{opacity: 0}}</style><noscript><style>body {{opacity: 1}}</style></noscript></head><body></body></html>",
            RUNTIME
        );
        assert_eq!(boilerplate(&input), canonical("⚡"));
    }

    #[test]
    fn keeps_custom_and_runtime_styles() {
        let output = boilerplate("<head><style amp-runtime>a{}</style><style amp-custom>b{}</style><style>c{}</style></head>");
        assert!(output.starts_with("<html><head><style amp-runtime>a{}</style><style amp-custom>b{}</style><style amp-boilerplate>"));
    }

    #[test]
    fn flavours() {
        for (attr, expected) in [
            ("amp4ads", "amp4ads-boilerplate"),
            ("⚡4ads", "amp4ads-boilerplate"),
            ("amp4email", "amp4email-boilerplate"),
            ("⚡4email", "amp4email-boilerplate"),
        ] {
            let input = format!("<!doctype html><html {}><head>{}<style amp-boilerplate>x</style></head></html>", attr, RUNTIME);
            assert_eq!(boilerplate(&input), ads_or_email(attr, expected), "{}", attr);
        }
    }

    #[test]
    fn server_side_rendered() {
        let output = boilerplate(&format!(
            "<html i-amphtml-no-boilerplate><head>{}<style amp-boilerplate>x</style></head></html>",
            RUNTIME
        ));
        assert_eq!(
            output,
            format!("<html i-amphtml-no-boilerplate><head>{}</head><body></body></html>", RUNTIME)
        );
    }
}
