// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors returned by the printer, the checkers and the pipeline.

use std::io;

use thiserror::Error;

/// The tree could not be serialized.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot render an error node")]
    ErrorNode,

    #[error("cannot render a {kind} node as an element")]
    NotAnElement { kind: &'static str },

    #[error("void element <{name}> has child nodes")]
    VoidElementWithChildren { name: String },

    #[error("cannot render a {kind} node")]
    UnsupportedNode { kind: &'static str },

    #[error("write failed: {0}")]
    Io(#[from] io::Error),
}

/// Text that would not survive HTML preprocessing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidityError {
    #[error("invalid UTF-8 at byte position {position}")]
    InvalidUtf8 { position: usize },

    #[error("character U+{code_point:04X} at position {position} is not allowed")]
    DisallowedCharacter { code_point: u32, position: usize },
}

/// Malformed version ranges, or no version both sides accept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("malformed range [{min}, {max}] at index {index}")]
    MalformedRange { index: usize, min: i64, max: i64 },

    #[error("non-positive value in range [{min}, {max}] at index {index}")]
    NonPositive { index: usize, min: i64, max: i64 },

    #[error("overlapping or out-of-order range [{min}, {max}] at index {index}")]
    OutOfOrder { index: usize, min: i64, max: i64 },

    #[error("no version at all is supported by this transformer")]
    NoSupportedVersions,

    #[error("no requested version is supported")]
    Unsupported,
}

/// A transform pass gave up on the document.
#[derive(Debug, Error)]
pub enum PassError {
    #[error("required <{0}> element is missing")]
    MissingElement(&'static str),

    #[error("invalid base URL {href:?}: {source}")]
    InvalidBaseUrl {
        href: String,
        #[source]
        source: url::ParseError,
    },
}

/// Everything that can go wrong in [`process`](crate::transformer::process).
#[derive(Debug, Error)]
pub enum Error {
    #[error("could not parse document: {0}")]
    Parse(String),

    #[error("transformer {0:?} is unknown")]
    UnknownTransformer(String),

    #[error("invalid document URL {url:?}: {source}")]
    InvalidDocumentUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("transformer {pass} failed: {source}")]
    Transform {
        pass: &'static str,
        #[source]
        source: PassError,
    },

    #[error(transparent)]
    Render(#[from] RenderError),
}
