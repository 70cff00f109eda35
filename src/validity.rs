// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Checks that a document contains nothing the HTML preprocessor would
//! report as a parse error.
//!
//! See <https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream>.

use std::str;

use crate::error::ValidityError;

/// Whether `c` may appear in a document that is about to be signed.
///
/// Rejects controls other than TAB, LF, FF and CR, C1 controls and
/// noncharacters.
pub fn is_allowed(c: char) -> bool {
    let cp = u32::from(c);
    match cp {
        0x09 | 0x0A | 0x0C | 0x0D => true,
        0x00..=0x1F | 0x7F..=0x9F => false,
        0xD800..=0xDFFF => false,
        0xFDD0..=0xFDEF => false,
        _ if cp & 0xFFFE == 0xFFFE => false,
        _ => cp < 0x11_0000,
    }
}

/// Scans UTF-8 text with a pluggable character predicate.
pub struct Validator<F = fn(char) -> bool> {
    allowed: F,
}

impl Default for Validator {
    fn default() -> Validator {
        Validator { allowed: is_allowed }
    }
}

impl<F: Fn(char) -> bool> Validator<F> {
    pub fn new(allowed: F) -> Validator<F> {
        Validator { allowed }
    }

    /// Stops at the first problem. Positions are byte offsets.
    ///
    /// Characters before an invalid byte sequence are still checked, so a
    /// disallowed character wins over a later decoding error.
    pub fn validate<T: AsRef<[u8]>>(&self, text: T) -> Result<(), ValidityError> {
        let bytes = text.as_ref();
        let (valid, bad_byte) = match str::from_utf8(bytes) {
            Ok(s) => (s, None),
            Err(e) => {
                let end = e.valid_up_to();
                (str::from_utf8(&bytes[..end]).unwrap_or_default(), Some(end))
            },
        };

        if let Some((position, c)) = valid.char_indices().find(|&(_, c)| !(self.allowed)(c)) {
            return Err(ValidityError::DisallowedCharacter {
                code_point: u32::from(c),
                position,
            });
        }

        match bad_byte {
            Some(position) => Err(ValidityError::InvalidUtf8 { position }),
            None => Ok(()),
        }
    }
}

/// Validate `text` with [`is_allowed`].
pub fn validate_utf8_for_html<T: AsRef<[u8]>>(text: T) -> Result<(), ValidityError> {
    let validator: Validator = Validator::default();
    validator.validate(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinary_text() {
        assert_eq!(validate_utf8_for_html("<p>Beşiktaş\t❄\r\n\x0c</p>"), Ok(()));
        assert_eq!(validate_utf8_for_html(""), Ok(()));
    }

    #[test]
    fn replacement_character_is_allowed() {
        assert_eq!(validate_utf8_for_html("\u{FFFD}"), Ok(()));
        assert_eq!(validate_utf8_for_html(b"abc\xef\xbf\xbd"), Ok(()));
    }

    #[test]
    fn control_character() {
        let err = validate_utf8_for_html("<html>This i\u{3}s invalid</html>").unwrap_err();
        assert_eq!(
            err,
            ValidityError::DisallowedCharacter {
                code_point: 3,
                position: 12
            }
        );
        assert_eq!(err.to_string(), "character U+0003 at position 12 is not allowed");
    }

    #[test]
    fn invalid_utf8() {
        let err = validate_utf8_for_html(&b"<html>This i\xc0s invalid</html>"[..]).unwrap_err();
        assert_eq!(err, ValidityError::InvalidUtf8 { position: 12 });
        assert_eq!(err.to_string(), "invalid UTF-8 at byte position 12");

        let err = validate_utf8_for_html(b"\xff").unwrap_err();
        assert_eq!(err, ValidityError::InvalidUtf8 { position: 0 });
    }

    #[test]
    fn disallowed_character_before_invalid_byte() {
        let err = validate_utf8_for_html(b"a\x00b\xc0").unwrap_err();
        assert_eq!(
            err,
            ValidityError::DisallowedCharacter {
                code_point: 0,
                position: 1
            }
        );
    }

    #[test]
    fn code_point_classes() {
        for c in ['\u{0}', '\u{1F}', '\u{7F}', '\u{85}', '\u{9F}', '\u{FDD0}', '\u{FDEF}', '\u{FFFE}', '\u{FFFF}', '\u{1FFFE}', '\u{10FFFF}'] {
            assert!(!is_allowed(c), "U+{:04X} should be rejected", u32::from(c));
        }
        for c in ['\t', '\n', '\u{C}', '\r', ' ', '\u{A0}', '\u{FDCF}', '\u{FDF0}', '\u{FFFD}', '\u{10FFFD}'] {
            assert!(is_allowed(c), "U+{:04X} should be accepted", u32::from(c));
        }
    }

    #[test]
    fn multibyte_positions_are_byte_offsets() {
        let err = validate_utf8_for_html("❄\u{FFFF}").unwrap_err();
        assert_eq!(err.to_string(), "character U+FFFF at position 3 is not allowed");
    }

    #[test]
    fn custom_predicate() {
        let ascii_only = Validator::new(|c: char| c.is_ascii());
        assert_eq!(ascii_only.validate("plain"), Ok(()));
        assert_eq!(
            ascii_only.validate("naïve"),
            Err(ValidityError::DisallowedCharacter {
                code_point: 0xEF,
                position: 2
            })
        );
    }
}
