//! Endpoints and the host-list builder (§4.4 of the specification).
//!
//! The DNS/IPv4 and UNIX-socket branches are grounded on the donor driver's `ServerAddress::parse`
//! and `ConnectionString::parse`'s host-splitting loop. The IPv6 branch — which the donor driver
//! itself does not implement — is grounded on `mongoc_uri_parse_host6` in the original C driver,
//! which scans to the closing `]` and then looks for a trailing `:port`.

use std::fmt;

use crate::decode::percent_decode;
use crate::error::{Error, Result};
use crate::scan::scan_to;

/// The default port used when an endpoint supplies none.
pub const DEFAULT_PORT: u16 = 27017;

const MAX_HOSTNAME_LEN: usize = 255;
const MAX_DISPLAY_LEN: usize = 286;

/// The address family an [`Endpoint`] was parsed as, inferred purely from its textual form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde-impls", derive(serde::Serialize, serde::Deserialize))]
pub enum Family {
    /// A DNS name or IPv4 literal, with an optional port.
    Dns,
    /// A bracketed IPv6 literal, with an optional port.
    Ipv6,
    /// A UNIX domain socket path (text ending in `.sock`).
    Unix,
}

/// One potential server, as parsed out of the host-list section of a connection string.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde-impls", derive(serde::Serialize, serde::Deserialize))]
pub struct Endpoint {
    host: String,
    port: Option<u16>,
    family: Family,
}

impl Endpoint {
    /// The lowercased hostname, file path, or IPv6 literal identifying this endpoint.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The port this endpoint listens on, or [`DEFAULT_PORT`] if none was specified (UNIX sockets
    /// never have a port).
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// `true` if the connection string explicitly specified a port for this endpoint.
    pub fn has_explicit_port(&self) -> bool {
        self.port.is_some()
    }

    /// The address family this endpoint was inferred to be.
    pub fn family(&self) -> Family {
        self.family
    }

    /// The canonical display form: `host:port`, `[addr]:port`, or the raw UNIX socket path.
    pub fn display_form(&self) -> String {
        match self.family {
            Family::Dns => format!("{}:{}", self.host, self.port()),
            Family::Ipv6 => format!("[{}]:{}", self.host, self.port()),
            Family::Unix => self.host.clone(),
        }
    }

    fn parse_port(text: &str) -> Result<u16> {
        let port: u32 = text
            .parse()
            .map_err(|_| Error::invalid_port(format!("port must be numeric, got {text:?}")))?;
        if port == 0 || port > u16::MAX as u32 {
            return Err(Error::invalid_port(format!(
                "port must be in 1..=65535, got {port}"
            )));
        }
        Ok(port as u16)
    }

    fn check_lengths(host: &str, display: &str) -> Result<()> {
        if host.len() > MAX_HOSTNAME_LEN {
            return Err(Error::hostname_too_long(host));
        }
        if display.len() > MAX_DISPLAY_LEN {
            return Err(Error::invalid_host_syntax(format!(
                "endpoint display form exceeds {MAX_DISPLAY_LEN} bytes: {display:?}"
            )));
        }
        Ok(())
    }

    fn unix(path: &str) -> Result<Self> {
        let decoded = percent_decode(path)?;
        Self::check_lengths(&decoded, &decoded)?;
        Ok(Endpoint {
            host: decoded,
            port: None,
            family: Family::Unix,
        })
    }

    fn ipv6(text: &str) -> Result<Self> {
        let close = text.find(']').ok_or_else(|| {
            Error::invalid_host_syntax(format!("unterminated IPv6 literal: {text:?}"))
        })?;
        let addr = &text[1..close];
        let decoded_addr = percent_decode(addr)?.to_lowercase();
        let rest = &text[close + 1..];
        let port = match rest.strip_prefix(':') {
            Some(port_text) if !port_text.is_empty() => Some(Self::parse_port(port_text)?),
            Some(_) => {
                return Err(Error::invalid_port(
                    "':' in an IPv6 endpoint must be followed by a port",
                ))
            }
            None if rest.is_empty() => None,
            None => {
                return Err(Error::invalid_host_syntax(format!(
                    "unexpected text after IPv6 literal: {rest:?}"
                )))
            }
        };
        let endpoint = Endpoint {
            host: decoded_addr,
            port,
            family: Family::Ipv6,
        };
        Self::check_lengths(endpoint.host(), &endpoint.display_form())?;
        Ok(endpoint)
    }

    fn host_port(text: &str) -> Result<Self> {
        let (host_text, port_text) = match scan_to(text, ':', &[]) {
            Some((host, rest)) => (host, Some(&rest[1..])),
            None => (text, None),
        };
        if host_text.is_empty() {
            return Err(Error::invalid_host_syntax(format!(
                "hostname cannot be empty in {text:?}"
            )));
        }
        let decoded_host = percent_decode(host_text)?.to_lowercase();
        let port = port_text.map(Self::parse_port).transpose()?;
        let endpoint = Endpoint {
            host: decoded_host,
            port,
            family: Family::Dns,
        };
        Self::check_lengths(endpoint.host(), &endpoint.display_form())?;
        Ok(endpoint)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_form())
    }
}

/// Parses the comma-separated host-list section of a connection string (the text after userinfo
/// and before `/` or `?`) into an ordered, non-empty sequence of [`Endpoint`]s.
///
/// Grounded on `mongoc_uri_parse_hosts` from the original C driver: endpoints are split on `,`
/// except where a `.sock` suffix appears before the next `,`/`?`, in which case the path through
/// `.sock` is consumed as a single endpoint regardless of any `/` it contains.
pub(crate) fn parse_host_list(section: &str) -> Result<Vec<Endpoint>> {
    let mut hosts = Vec::new();
    let mut remaining = section;

    loop {
        if remaining.is_empty() {
            break;
        }

        if remaining.starts_with('[') {
            let close = remaining.find(']').ok_or_else(|| {
                Error::invalid_host_syntax(format!("unterminated IPv6 literal: {remaining:?}"))
            })?;
            let after_bracket = &remaining[close + 1..];
            let end = after_bracket
                .find(|c| c == ',' || c == '/' || c == '?')
                .map(|i| close + 1 + i)
                .unwrap_or(remaining.len());
            hosts.push(Endpoint::ipv6(&remaining[..end])?);
            remaining = &remaining[end..];
        } else if let Some(sock_rel) = find_unix_socket_endpoint(remaining) {
            hosts.push(Endpoint::unix(&remaining[..sock_rel])?);
            remaining = &remaining[sock_rel..];
        } else {
            let end = remaining
                .find(|c| c == ',' || c == '/' || c == '?')
                .unwrap_or(remaining.len());
            hosts.push(Endpoint::host_port(&remaining[..end])?);
            remaining = &remaining[end..];
        }

        if let Some(rest) = remaining.strip_prefix(',') {
            remaining = rest;
            if remaining.is_empty() {
                return Err(Error::invalid_host_syntax(
                    "trailing ',' with no following host",
                ));
            }
            continue;
        }
        break;
    }

    if hosts.is_empty() {
        return Err(Error::invalid_host_syntax("host list must not be empty"));
    }

    Ok(hosts)
}

/// If `text` begins with a path that is terminated by a literal `.sock` before the next `,` or
/// `?`, returns the byte offset just past that `.sock`.
fn find_unix_socket_endpoint(text: &str) -> Option<usize> {
    const SUFFIX: &str = ".sock";
    let sock_at = text.find(SUFFIX)?;
    let end = sock_at + SUFFIX.len();
    let boundary = text[..end]
        .find(|c| c == ',' || c == '?')
        .unwrap_or(usize::MAX);
    if boundary < end {
        return None;
    }
    Some(end)
}

/// Finds the byte offset in `text` where the host-list region ends, `text` being everything after
/// the scheme (and, if present, the literal userinfo prefix still attached). Mirrors the same
/// per-entry delimiter rules [`parse_host_list`] uses — IPv6 brackets, the `.sock` lookahead, and
/// the `,`/`/`/`?` terminator set — without allocating or validating any [`Endpoint`], so the
/// top-level parser can locate the boundary between the authority and the database/options
/// remainder even when an absolute UNIX-socket path's own `/` characters would otherwise be
/// mistaken for that boundary.
///
/// Grounded on `mongoc_uri_parse_hosts`, which detects a leading-`/` `.sock` path before treating
/// `/` as the host/database delimiter. Malformed input (e.g. an unterminated `[`) is not rejected
/// here; [`parse_host_list`] raises the real error once the caller slices this boundary out and
/// parses it for real.
pub(crate) fn find_hosts_region_end(text: &str) -> usize {
    let mut pos = 0;

    loop {
        let remaining = &text[pos..];
        if remaining.is_empty() {
            break;
        }

        let advance = if remaining.starts_with('[') {
            match remaining.find(']') {
                Some(close) => {
                    let after_bracket = &remaining[close + 1..];
                    after_bracket
                        .find(|c| c == ',' || c == '/' || c == '?')
                        .map(|i| close + 1 + i)
                        .unwrap_or(remaining.len())
                }
                None => remaining.len(),
            }
        } else if let Some(sock_rel) = find_unix_socket_endpoint(remaining) {
            sock_rel
        } else {
            remaining
                .find(|c| c == ',' || c == '/' || c == '?')
                .unwrap_or(remaining.len())
        };

        pos += advance;

        if text[pos..].starts_with(',') {
            pos += 1;
            continue;
        }
        break;
    }

    pos
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_dns_host_with_default_port() {
        let hosts = parse_host_list("localhost").unwrap();
        assert_eq!(hosts.len(), 1);
        assert_eq!(hosts[0].host(), "localhost");
        assert_eq!(hosts[0].port(), DEFAULT_PORT);
        assert_eq!(hosts[0].family(), Family::Dns);
        assert_eq!(hosts[0].display_form(), "localhost:27017");
    }

    #[test]
    fn parses_multiple_hosts_preserving_order() {
        let hosts = parse_host_list("a,b:27018,c").unwrap();
        assert_eq!(hosts.len(), 3);
        assert_eq!(hosts[0].display_form(), "a:27017");
        assert_eq!(hosts[1].display_form(), "b:27018");
        assert_eq!(hosts[2].display_form(), "c:27017");
    }

    #[test]
    fn lowercases_hostnames() {
        let hosts = parse_host_list("EXAMPLE.COM").unwrap();
        assert_eq!(hosts[0].host(), "example.com");
    }

    #[test]
    fn parses_ipv6_with_port() {
        let hosts = parse_host_list("[::1]:1234").unwrap();
        assert_eq!(hosts.len(), 1);
        assert_eq!(hosts[0].host(), "::1");
        assert_eq!(hosts[0].port(), 1234);
        assert_eq!(hosts[0].family(), Family::Ipv6);
        assert_eq!(hosts[0].display_form(), "[::1]:1234");
    }

    #[test]
    fn parses_ipv6_without_port() {
        let hosts = parse_host_list("[2001:db8::1]").unwrap();
        assert_eq!(hosts[0].port(), DEFAULT_PORT);
    }

    #[test]
    fn parses_unix_socket_path() {
        let hosts = parse_host_list("/tmp/mongodb-27017.sock").unwrap();
        assert_eq!(hosts.len(), 1);
        assert_eq!(hosts[0].family(), Family::Unix);
        assert_eq!(hosts[0].host(), "/tmp/mongodb-27017.sock");
        assert_eq!(hosts[0].display_form(), "/tmp/mongodb-27017.sock");
    }

    #[test]
    fn mixed_host_list() {
        let hosts = parse_host_list("a,[::1]:27018,/tmp/x.sock").unwrap();
        assert_eq!(hosts.len(), 3);
        assert_eq!(hosts[0].family(), Family::Dns);
        assert_eq!(hosts[1].family(), Family::Ipv6);
        assert_eq!(hosts[2].family(), Family::Unix);
    }

    #[test]
    fn rejects_zero_port() {
        assert!(parse_host_list("h:0").is_err());
    }

    #[test]
    fn rejects_out_of_range_port() {
        assert!(parse_host_list("h:70000").is_err());
    }

    #[test]
    fn rejects_non_numeric_port() {
        assert!(parse_host_list("h:notanumber").is_err());
    }

    #[test]
    fn rejects_empty_host_list() {
        assert!(parse_host_list("").is_err());
    }

    #[test]
    fn rejects_trailing_comma() {
        assert!(parse_host_list("a,").is_err());
    }

    #[test]
    fn rejects_hostname_too_long() {
        let long_host = "a".repeat(300);
        assert!(parse_host_list(&long_host).is_err());
    }

    #[test]
    fn hosts_region_end_stops_before_absolute_unix_socket_trailer() {
        let text = "/tmp/mongodb-27017.sock/mydb?ssl=true";
        let end = find_hosts_region_end(text);
        assert_eq!(&text[..end], "/tmp/mongodb-27017.sock");
        assert_eq!(&text[end..], "/mydb?ssl=true");
    }

    #[test]
    fn hosts_region_end_consumes_bare_unix_socket_with_no_remainder() {
        let text = "/tmp/mongodb-27017.sock";
        let end = find_hosts_region_end(text);
        assert_eq!(end, text.len());
    }

    #[test]
    fn hosts_region_end_handles_dns_host_then_absolute_socket() {
        let text = "a,/tmp/x.sock";
        let end = find_hosts_region_end(text);
        assert_eq!(&text[..end], text);
        assert_eq!(&text[end..], "");
    }

    #[test]
    fn hosts_region_end_stops_at_database_slash() {
        let text = "a,b:27018/mydb";
        let end = find_hosts_region_end(text);
        assert_eq!(&text[..end], "a,b:27018");
    }

    #[test]
    fn hosts_region_end_stops_at_bare_question_mark() {
        let text = "localhost?ssl=true";
        let end = find_hosts_region_end(text);
        assert_eq!(&text[..end], "localhost");
        assert_eq!(&text[end..], "?ssl=true");
    }
}
