//! Mini-grammar parsers for option values that are themselves `key:value` lists.
//!
//! Grounded on `mongoc_uri_parse_tags` and `mongoc_uri_parse_auth_mechanism_properties` in the
//! original C driver. Both share the same shape — comma-separated `key:value` pairs — but differ
//! in which characters terminate the value: tag sets terminate a value only at `,`, while
//! `authMechanismProperties` additionally terminates a field at `&` instead of `,` (grouped pairs
//! joined with `&`, mirroring how query-string-like option lists are itself delimited by `&`).

use crate::error::{Error, Result};
use crate::scan::scan_to;

/// Parses a `key:value,key:value,...` tag set (the value of `readPreferenceTags`), grounded on
/// `mongoc_uri_parse_tags`. Returns the pairs in source order; duplicate keys within a single tag
/// set are kept as separate entries, since the specification's tag sets are matched by exact
/// document equality rather than deduplicated.
pub(crate) fn parse_pair_list(input: &str, outer_delim: char) -> Result<Vec<(String, String)>> {
    if input.is_empty() {
        return Ok(Vec::new());
    }

    let mut pairs = Vec::new();
    let mut remaining = input;

    loop {
        let (key, after_key) = scan_to(remaining, ':', &[outer_delim]).ok_or_else(|| {
            Error::invalid_value(format!(
                "expected 'key:value' pair in {remaining:?} within {input:?}"
            ))
        })?;
        if key.is_empty() {
            return Err(Error::invalid_value(format!(
                "empty key in pair list {input:?}"
            )));
        }
        let rest = &after_key[1..];

        let (value, tail) = match scan_to(rest, outer_delim, &[]) {
            Some((value, tail)) => (value, Some(&tail[1..])),
            None => (rest, None),
        };

        pairs.push((key.to_string(), value.to_string()));

        match tail {
            Some(next) if !next.is_empty() => remaining = next,
            Some(_) => {
                return Err(Error::invalid_value(format!(
                    "trailing '{outer_delim}' with no following pair in {input:?}"
                )))
            }
            None => break,
        }
    }

    Ok(pairs)
}

/// Parses the `readPreferenceTags` grammar: `key:value,key:value`.
pub(crate) fn parse_tag_set(input: &str) -> Result<Vec<(String, String)>> {
    parse_pair_list(input, ',')
}

/// Parses the `authMechanismProperties` grammar: `key:value&key:value`.
pub(crate) fn parse_auth_mechanism_properties(input: &str) -> Result<Vec<(String, String)>> {
    parse_pair_list(input, '&')
}
