// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The individual transform passes.
//!
//! Every pass is idempotent: running the default pipeline over its own
//! output changes nothing. `linktag` and `transformedidentifier` are only
//! reachable through a `CUSTOM` request.

use phf::phf_map;

use super::Context;
use crate::error::PassError;

mod amp_boilerplate;
mod link_tag;
mod meta_tag;
mod node_cleanup;
mod reorder_head;
mod transformed_identifier;
mod urls;

/// A single named mutation of the document.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Pass {
    AmpBoilerplate,
    LinkTag,
    MetaTag,
    NodeCleanup,
    ReorderHead,
    TransformedIdentifier,
    Url,
}

/// Lowercase name to pass. Please keep alphabetical.
static PASSES: phf::Map<&'static str, Pass> = phf_map! {
    "ampboilerplate" => Pass::AmpBoilerplate,
    "linktag" => Pass::LinkTag,
    "metatag" => Pass::MetaTag,
    "nodecleanup" => Pass::NodeCleanup,
    "reorderhead" => Pass::ReorderHead,
    "transformedidentifier" => Pass::TransformedIdentifier,
    "url" => Pass::Url,
};

impl Pass {
    /// Case-insensitive lookup by name.
    pub fn lookup(name: &str) -> Option<Pass> {
        PASSES.get(name.to_ascii_lowercase().as_str()).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Pass::AmpBoilerplate => "ampboilerplate",
            Pass::LinkTag => "linktag",
            Pass::MetaTag => "metatag",
            Pass::NodeCleanup => "nodecleanup",
            Pass::ReorderHead => "reorderhead",
            Pass::TransformedIdentifier => "transformedidentifier",
            Pass::Url => "url",
        }
    }

    pub fn apply(self, ctx: &mut Context<'_>) -> Result<(), PassError> {
        match self {
            Pass::AmpBoilerplate => amp_boilerplate::apply(ctx),
            Pass::LinkTag => link_tag::apply(ctx),
            Pass::MetaTag => meta_tag::apply(ctx),
            Pass::NodeCleanup => node_cleanup::apply(ctx),
            Pass::ReorderHead => reorder_head::apply(ctx),
            Pass::TransformedIdentifier => transformed_identifier::apply(ctx),
            Pass::Url => urls::apply(ctx),
        }
    }
}

/// Parse `html`, run one pass over it and print the result.
#[cfg(test)]
fn run_pass(pass: Pass, html: &str, document_url: &str) -> String {
    use super::Request;
    use crate::dom::parse_document;
    use crate::serialize::print_to_string;

    let request = Request {
        html: html.to_owned(),
        document_url: document_url.to_owned(),
        ..Request::default()
    };
    let mut ctx = Context {
        dom: parse_document(html),
        document_url: ::url::Url::parse(document_url).ok(),
        request: &request,
    };
    pass.apply(&mut ctx).unwrap();
    print_to_string(&ctx.dom, ctx.dom.document()).unwrap()
}
