// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Canonicalizing HTML transforms for signed exchange packaging.
//!
//! A document is parsed with html5ever into an arena tree, run through a
//! configured pipeline of passes and printed back out in a canonical form.
//! Validity checking and transform version negotiation sit beside the
//! pipeline for callers that sign the output.

pub use crate::error::{Error, PassError, RenderError, ValidityError, VersionError};
pub use crate::serialize::{print, print_to_string};
pub use crate::transformer::{process, Config, Request, Transformer};
pub use crate::validity::validate_utf8_for_html;
pub use crate::versions::{select_version, VersionRange, SUPPORTED_VERSIONS};

pub mod amphtml;
pub mod dom;
pub mod error;
pub mod serialize;
pub mod transformer;
pub mod validity;
pub mod versions;
