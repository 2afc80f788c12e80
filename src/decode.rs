//! Percent-decoding for connection-string components.
//!
//! Grounded on two sources: the donor driver's `percent_decode` helper (`percent_encoding` crate,
//! `percent_decode_str(..).decode_utf8()`) for the actual byte decoding, and the original
//! `mongoc_uri_unescape` for two details the donor driver's helper does not reproduce: `%` must be
//! followed by exactly two hex digits, and the decoded byte must be *printable* (`isprint` in the
//! "C" locale, i.e. `0x20..=0x7e`) or the whole string is rejected rather than silently passed
//! through.

use percent_encoding::percent_decode_str;

use crate::error::{Error, Result};

fn is_printable_byte(b: u8) -> bool {
    (0x20..=0x7e).contains(&b)
}

/// Validates that every `%` escape in `input` is well-formed (`%` followed by exactly two hex
/// digits) and decodes to a printable byte.
fn validate_escapes(input: &str) -> Result<()> {
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3);
            let decoded = hex.and_then(|h| {
                std::str::from_utf8(h)
                    .ok()
                    .and_then(|s| u8::from_str_radix(s, 16).ok())
            });
            match decoded {
                Some(byte) if is_printable_byte(byte) => {
                    i += 3;
                }
                _ => {
                    return Err(Error::invalid_percent_escape(format!(
                        "malformed or non-printable percent escape at byte offset {i} in {input:?}"
                    )));
                }
            }
        } else {
            i += 1;
        }
    }
    Ok(())
}

/// Percent-decodes `input`, returning owned, UTF-8-valid text.
///
/// Returns [`crate::error::ErrorKind::InvalidPercentEscape`] if a `%` escape is malformed or
/// decodes to a non-printable byte, and [`crate::error::ErrorKind::InvalidUtf8`] if the decoded
/// bytes are not valid UTF-8 (e.g. a `%` escape splits a multibyte codepoint).
pub(crate) fn percent_decode(input: &str) -> Result<String> {
    validate_escapes(input)?;
    percent_decode_str(input)
        .decode_utf8()
        .map(|cow| cow.into_owned())
        .map_err(|e| Error::invalid_utf8(format!("{e} while decoding {input:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_through_plain_text() {
        assert_eq!(percent_decode("localhost").unwrap(), "localhost");
    }

    #[test]
    fn decodes_printable_escape() {
        assert_eq!(percent_decode("p%40ss").unwrap(), "p@ss");
    }

    #[test]
    fn rejects_truncated_escape() {
        assert!(percent_decode("p%4").is_err());
    }

    #[test]
    fn rejects_non_hex_escape() {
        assert!(percent_decode("p%zz").is_err());
    }

    #[test]
    fn rejects_non_printable_escape() {
        // %00 decodes to a NUL byte, which is not printable.
        assert!(percent_decode("p%00ss").is_err());
    }

    #[test]
    fn printable_range_boundaries() {
        assert!(percent_decode("%20").is_ok()); // space, lowest printable byte
        assert!(percent_decode("%7e").is_ok()); // '~', highest printable byte
        assert!(percent_decode("%1f").is_err()); // unit separator, below range
        assert!(percent_decode("%7f").is_err()); // DEL, above range
    }

    #[test]
    fn preserves_multibyte_literal_text() {
        assert_eq!(percent_decode("café").unwrap(), "café");
    }
}
