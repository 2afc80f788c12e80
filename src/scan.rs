//! A small left-to-right text scanner used by the top-level parser and host-list builder to find
//! the next structural delimiter in a connection string without getting confused by the same
//! delimiter characters appearing, escaped, inside user-supplied text.
//!
//! Grounded on `scan_to_unichar` from the original `mongoc_uri_parse_*` family: it walks
//! codepoint-by-codepoint (never splitting a multibyte UTF-8 sequence), treats a backslash as an
//! escape that unconditionally consumes the following codepoint, and aborts the scan the moment
//! it crosses a codepoint in the caller-supplied inhibitor set.

/// Scans `input` for the first unescaped occurrence of `target`.
///
/// Returns `Some((prefix, rest))` where `prefix` is the text before `target` and `rest` is the
/// text starting at `target` (inclusive), or `None` if `target` was not found before either the
/// end of the input or an inhibitor codepoint.
///
/// A backslash (`\`) advances past the following codepoint unconditionally, so `target` and any
/// inhibitor appearing immediately after a backslash are treated as ordinary text.
///
/// `inhibitors` must contain only ASCII codepoints; multibyte inhibitors are never matched since
/// the grammar this scanner serves never needs them.
pub(crate) fn scan_to<'a>(
    input: &'a str,
    target: char,
    inhibitors: &[char],
) -> Option<(&'a str, &'a str)> {
    debug_assert!(inhibitors.iter().all(|c| c.is_ascii()));

    let mut chars = input.char_indices();
    while let Some((idx, c)) = chars.next() {
        if c == target {
            return Some((&input[..idx], &input[idx..]));
        }
        if c == '\\' {
            // Unconditionally skip the escaped codepoint, even if it is the target or an
            // inhibitor.
            chars.next();
            continue;
        }
        if inhibitors.contains(&c) {
            return None;
        }
    }
    None
}

/// Splits `input` at byte offset `at`, dropping the single delimiter byte located there.
/// Returns `(before, after)` where either half is `None` if it would be empty. Grounded on
/// `exclusive_split_at` in the donor driver's connection-string parser: an empty left or right
/// half collapses to `None` so callers can use `Option` rather than checking for `""`.
pub(crate) fn exclusive_split_at(input: &str, at: usize) -> (Option<&str>, Option<&str>) {
    let (left, right) = input.split_at(at);
    let left = if left.is_empty() { None } else { Some(left) };
    // `right` still has the delimiter as its first byte.
    let right = if right.len() > 1 {
        Some(&right[right.chars().next().map(char::len_utf8).unwrap_or(1)..])
    } else {
        None
    };
    (left, right)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_simple_target() {
        let (prefix, rest) = scan_to("host/path", '/', &[]).unwrap();
        assert_eq!(prefix, "host");
        assert_eq!(rest, "/path");
    }

    #[test]
    fn respects_backslash_escape() {
        // The escaped '/' is not a match; the real one further along is.
        assert_eq!(
            scan_to(r"ho\/st/tail", '/', &[]),
            Some((r"ho\/st", "/tail"))
        );
    }

    #[test]
    fn aborts_on_inhibitor() {
        assert_eq!(scan_to("a,b/c", '/', &[',']), None);
    }

    #[test]
    fn returns_none_when_absent() {
        assert_eq!(scan_to("no-delimiter-here", '?', &[]), None);
    }

    #[test]
    fn never_panics_on_trailing_backslash() {
        assert_eq!(scan_to(r"abc\", '/', &[]), None);
    }

    #[test]
    fn exclusive_split_drops_delimiter() {
        assert_eq!(exclusive_split_at("a@b", 1), (Some("a"), Some("b")));
        assert_eq!(exclusive_split_at("@b", 0), (None, Some("b")));
        assert_eq!(exclusive_split_at("a@", 1), (Some("a"), None));
        assert_eq!(exclusive_split_at("@", 0), (None, None));
    }

    #[test]
    fn scan_is_unicode_safe() {
        let (prefix, rest) = scan_to("héllo/wörld", '/', &[]).unwrap();
        assert_eq!(prefix, "héllo");
        assert_eq!(rest, "/wörld");
    }
}
