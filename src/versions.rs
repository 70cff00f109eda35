// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Transform version negotiation.
//!
//! Callers send the version ranges they can accept, highest first; the
//! negotiator picks the highest version that both sides accept.

use std::cmp;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::error::VersionError;

/// An inclusive range of transform versions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRange {
    pub min: i64,
    pub max: i64,
}

impl VersionRange {
    pub const fn new(min: i64, max: i64) -> VersionRange {
        VersionRange { min, max }
    }

    fn overlaps(&self, other: &VersionRange) -> bool {
        self.max >= other.min && self.min <= other.max
    }

    /// Every value in `self` is above every value in `other`.
    fn is_above(&self, other: &VersionRange) -> bool {
        self.min > other.max
    }
}

/// Every transform version this build can produce, highest first.
///
/// Only finalized versions belong here. Add a new entry when a pipeline
/// version is frozen; never edit an existing one.
pub static SUPPORTED_VERSIONS: &[VersionRange] = &[VersionRange::new(1, 1)];

/// Check that `ranges` are well formed, positive and strictly descending.
pub fn validate_ranges(ranges: &[VersionRange]) -> Result<(), VersionError> {
    let mut last_min = i64::MAX;
    for (index, r) in ranges.iter().enumerate() {
        let (min, max) = (r.min, r.max);
        if min > max {
            return Err(VersionError::MalformedRange { index, min, max });
        }
        if min < 1 || max < 1 {
            return Err(VersionError::NonPositive { index, min, max });
        }
        if max >= last_min {
            return Err(VersionError::OutOfOrder { index, min, max });
        }
        last_min = min;
    }
    Ok(())
}

/// Picks versions against a fixed supported table.
#[derive(Clone, Debug)]
pub struct Negotiator<'a> {
    supported: &'a [VersionRange],
}

impl Default for Negotiator<'static> {
    fn default() -> Negotiator<'static> {
        Negotiator::new(SUPPORTED_VERSIONS)
    }
}

impl<'a> Negotiator<'a> {
    pub fn new(supported: &'a [VersionRange]) -> Negotiator<'a> {
        Negotiator { supported }
    }

    pub fn supported(&self) -> &'a [VersionRange] {
        self.supported
    }

    /// The highest version in both `requested` and the supported table.
    ///
    /// An empty request means "anything": the highest supported version
    /// is returned.
    pub fn select(&self, requested: &[VersionRange]) -> Result<i64, VersionError> {
        validate_ranges(requested)?;
        let supported = self.supported;
        let highest = supported.first().ok_or(VersionError::NoSupportedVersions)?;
        if requested.is_empty() {
            return Ok(highest.max);
        }

        let (mut r, mut s) = (0, 0);
        while r < requested.len() && s < supported.len() {
            let (req, sup) = (&requested[r], &supported[s]);
            if req.overlaps(sup) {
                let version = cmp::min(req.max, sup.max);
                trace!("selected transform version {} for {:?}", version, requested);
                return Ok(version);
            } else if req.is_above(sup) {
                r += 1;
            } else {
                s += 1;
            }
        }
        Err(VersionError::Unsupported)
    }
}

/// [`Negotiator::select`] against [`SUPPORTED_VERSIONS`].
pub fn select_version(requested: &[VersionRange]) -> Result<i64, VersionError> {
    Negotiator::default().select(requested)
}
