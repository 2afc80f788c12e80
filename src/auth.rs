//! The recognized `authMechanism` values and the auth-source/credential rules each one imposes.
//!
//! Grounded on the donor driver's `client::auth::AuthMechanism` enum, its `FromStr` impl, its
//! `default_source` method, and the credential shape checks in `validate_credential`. Only the
//! mechanisms the specification's Configuration model actually stores (no wire-level SASL
//! handshake machinery, since that belongs to the out-of-scope authentication subsystem) are kept.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A recognized authentication mechanism, as may be supplied via the `authMechanism` connection
/// string option.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde-impls", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum AuthMechanism {
    /// `SCRAM-SHA-1`.
    ScramSha1,
    /// `SCRAM-SHA-256`.
    ScramSha256,
    /// `MONGODB-X509`, authenticating via client certificate rather than a password.
    MongoDbX509,
    /// `GSSAPI` (Kerberos).
    Gssapi,
    /// `PLAIN` (LDAP proxy authentication).
    Plain,
    /// `MONGODB-AWS`, authenticating via AWS IAM credentials.
    MongoDbAws,
}

const SCRAM_SHA_1_STR: &str = "SCRAM-SHA-1";
const SCRAM_SHA_256_STR: &str = "SCRAM-SHA-256";
const MONGODB_X509_STR: &str = "MONGODB-X509";
const GSSAPI_STR: &str = "GSSAPI";
const PLAIN_STR: &str = "PLAIN";
const MONGODB_AWS_STR: &str = "MONGODB-AWS";

/// The reserved authentication source used by mechanisms whose credentials are managed outside
/// the database proper.
pub const EXTERNAL_AUTH_SOURCE: &str = "$external";

impl AuthMechanism {
    /// Returns this mechanism's canonical string form, as sent over the wire and accepted back by
    /// [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMechanism::ScramSha1 => SCRAM_SHA_1_STR,
            AuthMechanism::ScramSha256 => SCRAM_SHA_256_STR,
            AuthMechanism::MongoDbX509 => MONGODB_X509_STR,
            AuthMechanism::Gssapi => GSSAPI_STR,
            AuthMechanism::Plain => PLAIN_STR,
            AuthMechanism::MongoDbAws => MONGODB_AWS_STR,
        }
    }

    /// Returns `true` if this mechanism always authenticates against `$external`, regardless of
    /// what the connection string's default database or explicit `authSource` say (§4.9 step 1 of
    /// the specification).
    pub fn forces_external_source(&self) -> bool {
        matches!(self, AuthMechanism::Gssapi | AuthMechanism::MongoDbX509)
    }

    /// The auth source this mechanism defaults to when none is explicitly provided, given the
    /// connection string's default database (if any).
    pub fn default_source<'a>(&self, default_database: Option<&'a str>) -> &'a str
    where
        'static: 'a,
    {
        match self {
            AuthMechanism::ScramSha1 | AuthMechanism::ScramSha256 => {
                default_database.unwrap_or("admin")
            }
            AuthMechanism::MongoDbX509 | AuthMechanism::Gssapi | AuthMechanism::MongoDbAws => {
                EXTERNAL_AUTH_SOURCE
            }
            AuthMechanism::Plain => default_database.unwrap_or(EXTERNAL_AUTH_SOURCE),
        }
    }

    /// Validates that the decoded username/password pair is acceptable for this mechanism,
    /// independent of the auth-source coercion performed by the cross-option finalizer.
    pub fn validate_credential(
        &self,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<()> {
        match self {
            AuthMechanism::ScramSha1 | AuthMechanism::ScramSha256 => {
                if username.is_none() {
                    return Err(Error::invalid_auth_combination(format!(
                        "no username provided for {} authentication",
                        self.as_str()
                    )));
                }
                Ok(())
            }
            AuthMechanism::MongoDbX509 => {
                if password.is_some() {
                    return Err(Error::invalid_auth_combination(
                        "a password cannot be specified with MONGODB-X509",
                    ));
                }
                Ok(())
            }
            AuthMechanism::Plain => {
                if username.is_none() || username == Some("") {
                    return Err(Error::invalid_auth_combination(
                        "username for PLAIN authentication must be non-empty",
                    ));
                }
                if password.is_none() {
                    return Err(Error::invalid_auth_combination(
                        "no password provided for PLAIN authentication",
                    ));
                }
                Ok(())
            }
            AuthMechanism::MongoDbAws => {
                if username.is_some() && password.is_none() {
                    return Err(Error::invalid_auth_combination(
                        "username cannot be provided without password for MONGODB-AWS \
                         authentication",
                    ));
                }
                Ok(())
            }
            AuthMechanism::Gssapi => Ok(()),
        }
    }
}

impl FromStr for AuthMechanism {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            SCRAM_SHA_1_STR => Ok(AuthMechanism::ScramSha1),
            SCRAM_SHA_256_STR => Ok(AuthMechanism::ScramSha256),
            MONGODB_X509_STR => Ok(AuthMechanism::MongoDbX509),
            GSSAPI_STR => Ok(AuthMechanism::Gssapi),
            PLAIN_STR => Ok(AuthMechanism::Plain),
            MONGODB_AWS_STR => Ok(AuthMechanism::MongoDbAws),
            other => Err(Error::invalid_value(format!(
                "'{other}' is not a recognized authMechanism"
            ))),
        }
    }
}

impl fmt::Display for AuthMechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_canonical_strings() {
        for mech in [
            AuthMechanism::ScramSha1,
            AuthMechanism::ScramSha256,
            AuthMechanism::MongoDbX509,
            AuthMechanism::Gssapi,
            AuthMechanism::Plain,
            AuthMechanism::MongoDbAws,
        ] {
            assert_eq!(AuthMechanism::from_str(mech.as_str()).unwrap(), mech);
        }
    }

    #[test]
    fn rejects_unknown_mechanism() {
        assert!(AuthMechanism::from_str("NOT-A-MECHANISM").is_err());
    }

    #[test]
    fn gssapi_and_x509_force_external() {
        assert!(AuthMechanism::Gssapi.forces_external_source());
        assert!(AuthMechanism::MongoDbX509.forces_external_source());
        assert!(!AuthMechanism::ScramSha1.forces_external_source());
    }

    #[test]
    fn x509_rejects_password() {
        assert!(AuthMechanism::MongoDbX509
            .validate_credential(Some("CN=client"), Some("secret"))
            .is_err());
        assert!(AuthMechanism::MongoDbX509
            .validate_credential(Some("CN=client"), None)
            .is_ok());
    }

    #[test]
    fn scram_requires_username() {
        assert!(AuthMechanism::ScramSha256
            .validate_credential(None, Some("secret"))
            .is_err());
    }

    #[test]
    fn plain_requires_username_and_password() {
        assert!(AuthMechanism::Plain
            .validate_credential(Some("u"), None)
            .is_err());
        assert!(AuthMechanism::Plain
            .validate_credential(Some(""), Some("p"))
            .is_err());
        assert!(AuthMechanism::Plain
            .validate_credential(Some("u"), Some("p"))
            .is_ok());
    }

    #[test]
    fn default_source_falls_back_to_database_or_admin() {
        assert_eq!(AuthMechanism::ScramSha1.default_source(Some("mydb")), "mydb");
        assert_eq!(AuthMechanism::ScramSha1.default_source(None), "admin");
        assert_eq!(AuthMechanism::Gssapi.default_source(Some("mydb")), "$external");
    }
}
