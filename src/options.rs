//! The options-string parser (§4.5 of the specification): splits the `key=value&key=value`
//! section of a connection string, classifies each key via [`crate::registry`], and routes it
//! into the appropriate [`OrderedDoc`].
//!
//! Grounded on `ClientOptions::parse_options`/`parse_option_pair` in the donor driver for the
//! overall split-then-dispatch shape, and on `mongoc_uri_parse_options` in the original C driver
//! for the rule that an unrecognized key is a warning, not a parse error.

use crate::error::{Error, Result};
use crate::decode::percent_decode;
use crate::registry::{classify, OptionClass};
use crate::scan::scan_to;
use crate::subdoc::{parse_auth_mechanism_properties, parse_tag_set};
use crate::value::{OptionValue, OrderedDoc};
use crate::warn::warn_sink;

pub(crate) const MAX_APP_NAME_BYTES: usize = 128;

/// The result of parsing the options-string section of a connection string.
pub(crate) struct ParsedOptions {
    pub(crate) options: OrderedDoc,
    pub(crate) credentials: OrderedDoc,
    /// Keys that were well-formed `key=value` pairs but did not match any entry in the registry.
    /// Collected rather than warned about inline so the caller can emit one batched diagnostic
    /// instead of one warning per key.
    pub(crate) unrecognized: Vec<String>,
}

/// Accepts the canonical `true`/`false` plus the original driver's deprecated aliases
/// (`1`/`yes`/`y`/`t` and `0`/`-1`/`no`/`n`/`f`), warning whenever an alias is used.
fn parse_bool(key: &str, value: &str) -> Result<bool> {
    let lower = value.to_ascii_lowercase();
    match lower.as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        "1" | "yes" | "y" | "t" => {
            warn_sink!("'{key}={value}' uses a deprecated boolean alias for 'true'");
            Ok(true)
        }
        "0" | "-1" | "no" | "n" | "f" => {
            warn_sink!("'{key}={value}' uses a deprecated boolean alias for 'false'");
            Ok(false)
        }
        other => Err(Error::invalid_value(format!(
            "'{key}' must be 'true' or 'false', got '{other}'"
        ))),
    }
}

fn parse_i32(key: &str, value: &str) -> Result<i32> {
    value.parse::<i32>().map_err(|_| {
        Error::invalid_value(format!("'{key}' must be an integer, got '{value}'"))
    })
}

/// Parses the full options-string section (the text after `?`, if any) into its constituent
/// options and credentials.
pub(crate) fn parse_options(section: &str) -> Result<ParsedOptions> {
    let mut options = OrderedDoc::new();
    let mut credentials = OrderedDoc::new();
    let mut unrecognized = Vec::new();

    if section.is_empty() {
        return Ok(ParsedOptions {
            options,
            credentials,
            unrecognized,
        });
    }

    for pair in section.split('&') {
        if pair.is_empty() {
            continue;
        }

        let (raw_key, raw_value) = scan_to(pair, '=', &[])
            .map(|(k, rest)| (k, &rest[1..]))
            .ok_or_else(|| Error::invalid_value(format!("option '{pair}' is missing '='")))?;

        let key = percent_decode(raw_key)?.to_ascii_lowercase();
        let value = percent_decode(raw_value)?;

        match classify(&key) {
            None => {
                unrecognized.push(key);
            }
            Some(OptionClass::Int32) => {
                options.set(&key, OptionValue::Int32(parse_i32(&key, &value)?));
            }
            Some(OptionClass::Bool) => {
                options.set(&key, OptionValue::Bool(parse_bool(&key, &value)?));
            }
            Some(OptionClass::Utf8) => {
                options.set(&key, OptionValue::Utf8(value));
            }
            Some(OptionClass::AppName) => {
                if value.len() > MAX_APP_NAME_BYTES {
                    return Err(Error::invalid_value(format!(
                        "appname must not exceed {MAX_APP_NAME_BYTES} bytes, got {}",
                        value.len()
                    )));
                }
                options.set(&key, OptionValue::Utf8(value));
            }
            Some(OptionClass::Credential) => {
                if key == "authmechanismproperties" {
                    let pairs = parse_auth_mechanism_properties(&value)?;
                    credentials.set(&key, OptionValue::Pairs(pairs));
                } else {
                    credentials.set(&key, OptionValue::Utf8(value));
                }
            }
            Some(OptionClass::WriteConcernW) => {
                options.set(&key, OptionValue::Utf8(value));
            }
            Some(OptionClass::ReadPreferenceTags) => {
                let tags = parse_tag_set(&value)?;
                options.set(&key, OptionValue::Pairs(tags));
            }
            Some(OptionClass::ReadConcernLevel) => {
                options.set(&key, OptionValue::Utf8(value));
            }
            Some(OptionClass::ReadPreference) => {
                options.set(&key, OptionValue::Utf8(value));
            }
        }
    }

    Ok(ParsedOptions {
        options,
        credentials,
        unrecognized,
    })
}
