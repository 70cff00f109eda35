// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Stamps `<html>` with who transformed the document, and at which
//! transform version.

use crate::amphtml::{Skeleton, TRANSFORMED, TRANSFORMED_BY};
use crate::error::PassError;
use crate::transformer::Context;

pub(super) fn apply(ctx: &mut Context<'_>) -> Result<(), PassError> {
    let html = Skeleton::find(&ctx.dom)?.html;
    let value = match ctx.request.version {
        v if v > 0 => format!("{};v={}", TRANSFORMED_BY, v),
        _ => TRANSFORMED_BY.to_owned(),
    };
    ctx.dom.set_attribute(html, TRANSFORMED, &value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::dom::parse_document;
    use crate::serialize::print_to_string;
    use crate::transformer::{Context, Request};

    fn identify(html: &str, version: i64) -> String {
        let request = Request {
            version,
            ..Request::default()
        };
        let mut ctx = Context {
            dom: parse_document(html),
            document_url: None,
            request: &request,
        };
        super::apply(&mut ctx).unwrap();
        print_to_string(&ctx.dom, ctx.dom.document()).unwrap()
    }

    #[test]
    fn versioned() {
        assert_eq!(
            identify("<!doctype html><html ⚡><head></head><body></body></html>", 1),
            "<!doctype html><html transformed=\"google;v=1\" ⚡><head></head><body></body></html>"
        );
    }

    #[test]
    fn unversioned() {
        assert_eq!(
            identify("<html ⚡><head></head><body></body></html>", 0),
            "<html transformed=google ⚡><head></head><body></body></html>"
        );
    }

    #[test]
    fn replaces_existing_stamp() {
        let output = identify("<html transformed=bing ⚡>", 3);
        assert!(output.starts_with("<html transformed=\"google;v=3\" ⚡>"), "{}", output);
        assert_eq!(output.matches("transformed").count(), 1);
    }
}
