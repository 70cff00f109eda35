// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The transform pipeline: parse, run passes, print.
//!
//! ```text
//! Request ──parse──> Dom ──pass, pass, ...──> Dom ──print──> String
//! ```
//!
//! Which passes run is decided by the request's [`Config`]. All names are
//! resolved before the first pass runs, so a bad `CUSTOM` list never
//! leaves a half-transformed document behind.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use url::Url;

pub use self::passes::Pass;
use crate::amphtml::Skeleton;
use crate::dom::{parse_document, Dom};
use crate::error::Error;
use crate::serialize::print_to_string;

pub mod passes;

/// A named pipeline.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Config {
    /// Everything needed to produce a servable document.
    #[default]
    Default,
    /// Only the cleanup every other pipeline also starts with.
    None,
    /// Only head reordering, for validating already-transformed documents.
    Validation,
    /// The passes named in [`Request::transformers`].
    Custom,
}

impl Config {
    /// The fixed pass list of a named pipeline. Empty for `Custom`.
    pub fn pipeline(self) -> &'static [Pass] {
        match self {
            Config::Default => &[
                Pass::NodeCleanup,
                Pass::MetaTag,
                Pass::Url,
                Pass::AmpBoilerplate,
                Pass::ReorderHead,
            ],
            Config::None => &[Pass::NodeCleanup],
            Config::Validation => &[Pass::ReorderHead],
            Config::Custom => &[],
        }
    }
}

/// Input to [`process`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Request {
    pub html: String,
    /// URL the document was fetched from. May be empty.
    pub document_url: String,
    pub config: Config,
    /// Pass names for [`Config::Custom`], case-insensitive. Ignored otherwise.
    pub transformers: Vec<String>,
    /// Version written by `transformedidentifier`, normally the result of
    /// [`select_version`](crate::versions::select_version). Zero or less
    /// writes no version.
    pub version: i64,
}

impl Request {
    pub fn new<S: Into<String>>(html: S) -> Request {
        Request {
            html: html.into(),
            ..Request::default()
        }
    }
}

/// State shared by the passes of one pipeline run.
pub struct Context<'a> {
    pub dom: Dom,
    pub document_url: Option<Url>,
    pub request: &'a Request,
}

/// Executes resolved passes against a context.
pub trait Runner {
    fn run(&self, ctx: &mut Context<'_>, passes: &[Pass]) -> Result<(), Error>;
}

impl<R: Runner + ?Sized> Runner for &R {
    fn run(&self, ctx: &mut Context<'_>, passes: &[Pass]) -> Result<(), Error> {
        (**self).run(ctx, passes)
    }
}

/// Runs each pass in order, stopping at the first failure.
#[derive(Copy, Clone, Debug, Default)]
pub struct Sequential;

impl Runner for Sequential {
    fn run(&self, ctx: &mut Context<'_>, passes: &[Pass]) -> Result<(), Error> {
        for &pass in passes {
            debug!("running transformer {}", pass.name());
            pass.apply(ctx).map_err(|source| Error::Transform {
                pass: pass.name(),
                source,
            })?;
        }
        Ok(())
    }
}

/// Resolve the passes a request asks for.
pub fn resolve_passes(request: &Request) -> Result<Vec<Pass>, Error> {
    if request.config != Config::Custom {
        return Ok(request.config.pipeline().to_vec());
    }
    request
        .transformers
        .iter()
        .map(|name| {
            Pass::lookup(name).ok_or_else(|| {
                warn!("unknown transformer {:?} requested", name);
                Error::UnknownTransformer(name.clone())
            })
        })
        .collect()
}

fn parse_document_url(raw: &str) -> Result<Option<Url>, Error> {
    if raw.is_empty() {
        return Ok(None);
    }
    Url::parse(raw)
        .map(Some)
        .map_err(|source| Error::InvalidDocumentUrl {
            url: raw.to_owned(),
            source,
        })
}

/// Parses, transforms and prints documents.
#[derive(Clone, Debug, Default)]
pub struct Transformer<R = Sequential> {
    runner: R,
}

impl Transformer {
    pub fn new() -> Transformer {
        Transformer { runner: Sequential }
    }
}

impl<R: Runner> Transformer<R> {
    pub fn with_runner(runner: R) -> Transformer<R> {
        Transformer { runner }
    }

    /// Produce the canonical rendering of `request.html`.
    pub fn process(&self, request: &Request) -> Result<String, Error> {
        let dom = parse_document(&request.html);
        Skeleton::find(&dom).map_err(|e| Error::Parse(e.to_string()))?;

        let passes = resolve_passes(request)?;
        let document_url = parse_document_url(&request.document_url)?;

        let mut ctx = Context {
            dom,
            document_url,
            request,
        };
        self.runner.run(&mut ctx, &passes)?;

        let root = ctx.dom.document();
        Ok(print_to_string(&ctx.dom, root)?)
    }
}

/// [`Transformer::process`] with the sequential runner.
pub fn process(request: &Request) -> Result<String, Error> {
    Transformer::new().process(request)
}
