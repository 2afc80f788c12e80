//! The `Configuration` aggregate (§4.8 of the specification): the fully assembled, typed result
//! of parsing a connection string, along with the typed accessors and mutators used to inspect
//! or programmatically adjust it afterward.
//!
//! Grounded on the donor driver's `ClientOptions` for the overall shape of a flat struct exposing
//! typed fields plus an escape hatch for raw option text, and on the original C driver's
//! `mongoc_uri_get_option_as_int32`/`mongoc_uri_get_option_as_int32_with_default` split for the
//! `get_int32_with_default`/`get_int32_raw` pair: the C driver's single `_as_int32` accessor
//! silently treats a stored `0` as "absent" at several call sites, which the specification's Open
//! Question resolves by exposing both behaviors explicitly rather than picking one silently.

use std::fmt;

use zeroize::Zeroizing;

use crate::auth::AuthMechanism;
use crate::concern::{ReadConcern, WriteConcern};
use crate::error::Result;
use crate::host::Endpoint;
use crate::read_preference::ReadPreference;
use crate::registry::{classify, OptionClass};
use crate::value::{OptionValue, OrderedDoc};

/// The fully assembled configuration produced by parsing a connection string.
///
/// Cloning a `Configuration` performs a full deep copy: every field owns its data, so there is no
/// shared mutable state between a clone and its source.
#[derive(Clone)]
pub struct Configuration {
    pub(crate) raw: String,
    pub(crate) hosts: Vec<Endpoint>,
    pub(crate) database: Option<String>,
    pub(crate) username: Option<String>,
    pub(crate) password: Option<Zeroizing<String>>,
    pub(crate) auth_mechanism: Option<AuthMechanism>,
    pub(crate) auth_source: Option<String>,
    pub(crate) auth_mechanism_properties: Vec<(String, String)>,
    pub(crate) options: OrderedDoc,
    pub(crate) read_preference: ReadPreference,
    pub(crate) read_concern: Option<ReadConcern>,
    pub(crate) write_concern: Option<WriteConcern>,
    pub(crate) direct_connection: bool,
    pub(crate) tls: bool,
}

impl Configuration {
    pub(crate) fn new(raw: String, hosts: Vec<Endpoint>, options: OrderedDoc) -> Self {
        Configuration {
            raw,
            hosts,
            database: None,
            username: None,
            password: None,
            auth_mechanism: None,
            auth_source: None,
            auth_mechanism_properties: Vec::new(),
            options,
            read_preference: ReadPreference::primary(),
            read_concern: None,
            write_concern: None,
            direct_connection: false,
            tls: false,
        }
    }

    /// The unmodified connection string this `Configuration` was parsed from.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn hosts(&self) -> &[Endpoint] {
        &self.hosts
    }

    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// The decoded password, if any. Exposed only as a borrow so that callers cannot accidentally
    /// retain an unscrubbed copy past this `Configuration`'s lifetime.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref().map(String::as_str)
    }

    pub fn auth_mechanism(&self) -> Option<AuthMechanism> {
        self.auth_mechanism
    }

    pub fn auth_source(&self) -> Option<&str> {
        self.auth_source.as_deref()
    }

    pub fn auth_mechanism_properties(&self) -> &[(String, String)] {
        &self.auth_mechanism_properties
    }

    pub fn read_preference(&self) -> &ReadPreference {
        &self.read_preference
    }

    pub fn read_concern(&self) -> Option<&ReadConcern> {
        self.read_concern.as_ref()
    }

    pub fn write_concern(&self) -> Option<&WriteConcern> {
        self.write_concern.as_ref()
    }

    pub fn direct_connection(&self) -> bool {
        self.direct_connection
    }

    pub fn tls(&self) -> bool {
        self.tls
    }

    pub fn app_name(&self) -> Option<&str> {
        self.get_utf8("appname")
    }

    pub fn replica_set(&self) -> Option<&str> {
        self.get_utf8("replicaset")
    }

    /// Reads a stored int32 option, treating a stored `0` the same as "absent" and returning
    /// `default` in either case. Mirrors the original driver's most common accessor, footgun
    /// included — present only for parity with options where `0` is never a meaningful value
    /// (e.g. `heartbeatFrequencyMS`).
    pub fn get_int32_with_default(&self, key: &str, default: i32) -> i32 {
        match self.options.get(&key.to_ascii_lowercase()).and_then(OptionValue::as_i32) {
            Some(0) | None => default,
            Some(v) => v,
        }
    }

    /// Reads a stored int32 option with no zero-as-absent sentinel: `Some(0)` means the
    /// connection string explicitly set the option to zero.
    pub fn get_int32_raw(&self, key: &str) -> Option<i32> {
        self.options.get(&key.to_ascii_lowercase()).and_then(OptionValue::as_i32)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.options.get(&key.to_ascii_lowercase()).and_then(OptionValue::as_bool)
    }

    /// Returns the stored bool, or `fallback` if the key is absent or not bool-classified.
    pub fn get_bool_with_default(&self, key: &str, fallback: bool) -> bool {
        self.get_bool(key).unwrap_or(fallback)
    }

    pub fn get_utf8(&self, key: &str) -> Option<&str> {
        self.options.get(&key.to_ascii_lowercase()).and_then(OptionValue::as_str)
    }

    /// Returns the stored string, or `fallback` if the key is absent or not utf8-classified.
    pub fn get_utf8_with_default<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        self.get_utf8(key).unwrap_or(fallback)
    }

    /// Returns every option key the connection string set, in insertion order, regardless of
    /// whether this `Configuration` exposes a typed accessor for it.
    pub fn option_keys(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(|(k, _)| k)
    }

    /// Sets the default database, independent of the other credential/auth fields (§4.8).
    pub fn set_database(&mut self, database: Option<String>) {
        self.database = database;
    }

    /// Sets the username, independent of password/auth-mechanism (§4.8).
    pub fn set_username(&mut self, username: Option<impl Into<String>>) {
        self.username = username.map(Into::into);
    }

    /// Sets the password, independent of username/auth-mechanism (§4.8).
    pub fn set_password(&mut self, password: Option<impl Into<String>>) {
        self.password = password.map(Into::into).map(Zeroizing::new);
    }

    /// Sets the auth source, independent of the auth mechanism (§4.8). Unlike the cross-option
    /// finalizer run during [`crate::parse`], this does not re-run the GSSAPI/X509
    /// force-`$external` rule — it is a direct field mutation, not a re-parse.
    pub fn set_auth_source(&mut self, source: Option<impl Into<String>>) {
        self.auth_source = source.map(Into::into);
    }

    /// Sets `appName`, re-running the same length predicate the options parser applies
    /// (§4.5's `MAX_APP_NAME_BYTES` handshake limit).
    pub fn set_appname(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if name.len() > crate::options::MAX_APP_NAME_BYTES {
            return Err(crate::error::Error::invalid_value(format!(
                "appname must not exceed {} bytes, got {}",
                crate::options::MAX_APP_NAME_BYTES,
                name.len()
            )));
        }
        self.options.set("appname", OptionValue::Utf8(name));
        Ok(())
    }

    pub(crate) fn set_credentials(
        &mut self,
        username: Option<String>,
        password: Option<String>,
    ) {
        self.username = username;
        self.password = password.map(Zeroizing::new);
    }

    pub(crate) fn set_auth(
        &mut self,
        mechanism: Option<AuthMechanism>,
        source: Option<String>,
        properties: Vec<(String, String)>,
    ) {
        self.auth_mechanism = mechanism;
        self.auth_source = source;
        self.auth_mechanism_properties = properties;
    }

    /// Sets an int32 option as if it had been supplied on the connection string, re-running the
    /// same key classification the parser uses so callers cannot desynchronize a key's stored
    /// shape from its registered class.
    pub fn set_int32(&mut self, key: &str, value: i32) -> Result<()> {
        let key = key.to_ascii_lowercase();
        Self::require_class(&key, OptionClass::Int32)?;
        self.options.set(&key, OptionValue::Int32(value));
        Ok(())
    }

    pub fn set_bool(&mut self, key: &str, value: bool) -> Result<()> {
        let key = key.to_ascii_lowercase();
        Self::require_class(&key, OptionClass::Bool)?;
        self.options.set(&key, OptionValue::Bool(value));
        Ok(())
    }

    pub fn set_utf8(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        let key = key.to_ascii_lowercase();
        match classify(&key) {
            Some(OptionClass::Utf8)
            | Some(OptionClass::AppName)
            | Some(OptionClass::ReadConcernLevel)
            | Some(OptionClass::ReadPreference)
            | Some(OptionClass::WriteConcernW) => {
                self.options.set(&key, OptionValue::Utf8(value.into()));
                Ok(())
            }
            _ => Err(crate::error::Error::invalid_value(format!(
                "'{key}' is not a UTF-8-classified option"
            ))),
        }
    }

    pub(crate) fn set_read_preference(&mut self, read_preference: ReadPreference) {
        self.read_preference = read_preference;
    }

    pub(crate) fn set_read_concern(&mut self, read_concern: Option<ReadConcern>) {
        self.read_concern = read_concern;
    }

    pub(crate) fn set_write_concern(&mut self, write_concern: Option<WriteConcern>) {
        self.write_concern = write_concern;
    }

    pub(crate) fn set_direct_connection(&mut self, value: bool) {
        self.direct_connection = value;
    }

    pub(crate) fn set_tls(&mut self, value: bool) {
        self.tls = value;
    }

    fn require_class(key: &str, expected: OptionClass) -> Result<()> {
        match classify(key) {
            Some(class) if class == expected => Ok(()),
            Some(_) => Err(crate::error::Error::invalid_value(format!(
                "'{key}' is not classified as the expected type"
            ))),
            None => Err(crate::error::Error::invalid_value(format!(
                "'{key}' is not a recognized option"
            ))),
        }
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("hosts", &self.hosts)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("auth_mechanism", &self.auth_mechanism)
            .field("auth_source", &self.auth_source)
            .field("read_preference", &self.read_preference)
            .field("read_concern", &self.read_concern)
            .field("write_concern", &self.write_concern)
            .field("direct_connection", &self.direct_connection)
            .field("tls", &self.tls)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::parse_host_list;

    fn base() -> Configuration {
        Configuration::new(
            "mongodb://localhost".to_string(),
            parse_host_list("localhost").unwrap(),
            OrderedDoc::new(),
        )
    }

    #[test]
    fn get_int32_with_default_treats_zero_as_absent() {
        let mut cfg = base();
        cfg.set_int32("maxidletimems", 0).unwrap();
        assert_eq!(cfg.get_int32_with_default("maxidletimems", 42), 42);
    }

    #[test]
    fn get_int32_raw_keeps_explicit_zero() {
        let mut cfg = base();
        cfg.set_int32("maxidletimems", 0).unwrap();
        assert_eq!(cfg.get_int32_raw("maxidletimems"), Some(0));
    }

    #[test]
    fn set_int32_on_wrong_class_is_rejected() {
        let mut cfg = base();
        assert!(cfg.set_int32("ssl", 1).is_err());
    }

    #[test]
    fn password_is_redacted_in_debug_output() {
        let mut cfg = base();
        cfg.set_credentials(Some("user".to_string()), Some("hunter2".to_string()));
        let debug = format!("{cfg:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn bool_and_utf8_fallbacks_apply_when_absent() {
        let cfg = base();
        assert!(!cfg.get_bool_with_default("ssl", false));
        assert_eq!(cfg.get_utf8_with_default("replicaset", "none"), "none");
    }

    #[test]
    fn named_mutators_set_their_fields_independently() {
        let mut cfg = base();
        cfg.set_username(Some("alice"));
        cfg.set_password(Some("s3cret"));
        cfg.set_auth_source(Some("admin"));
        cfg.set_appname("my-app").unwrap();
        assert_eq!(cfg.username(), Some("alice"));
        assert_eq!(cfg.password(), Some("s3cret"));
        assert_eq!(cfg.auth_source(), Some("admin"));
        assert_eq!(cfg.app_name(), Some("my-app"));
    }

    #[test]
    fn set_appname_rejects_over_length_limit() {
        let mut cfg = base();
        assert!(cfg.set_appname("a".repeat(200)).is_err());
    }

    #[test]
    fn clone_is_a_deep_copy() {
        let mut cfg = base();
        cfg.set_utf8("replicaset", "rs0").unwrap();
        let mut cloned = cfg.clone();
        cloned.set_utf8("replicaset", "rs1").unwrap();
        assert_eq!(cfg.replica_set(), Some("rs0"));
        assert_eq!(cloned.replica_set(), Some("rs1"));
    }
}
