//! Contains the `Error` and `Result` types that this crate uses.

use thiserror::Error;

/// The result type for all methods that can return an error in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that can occur while parsing or mutating a connection-string [`Configuration`](crate::config::Configuration).
#[derive(Clone, Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The type of error that occurred.
    pub kind: ErrorKind,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    pub(crate) fn invalid_scheme(message: impl Into<String>) -> Self {
        ErrorKind::InvalidScheme {
            message: message.into(),
        }
        .into()
    }

    pub(crate) fn invalid_user_info(message: impl Into<String>) -> Self {
        ErrorKind::InvalidUserInfo {
            message: message.into(),
        }
        .into()
    }

    pub(crate) fn invalid_host_syntax(message: impl Into<String>) -> Self {
        ErrorKind::InvalidHostSyntax {
            message: message.into(),
        }
        .into()
    }

    pub(crate) fn invalid_port(message: impl Into<String>) -> Self {
        ErrorKind::InvalidPort {
            message: message.into(),
        }
        .into()
    }

    pub(crate) fn hostname_too_long(host: impl Into<String>) -> Self {
        ErrorKind::HostnameTooLong { host: host.into() }.into()
    }

    pub(crate) fn invalid_database(message: impl Into<String>) -> Self {
        ErrorKind::InvalidDatabase {
            message: message.into(),
        }
        .into()
    }

    pub(crate) fn invalid_percent_escape(message: impl Into<String>) -> Self {
        ErrorKind::InvalidPercentEscape {
            message: message.into(),
        }
        .into()
    }

    pub(crate) fn invalid_utf8(message: impl Into<String>) -> Self {
        ErrorKind::InvalidUtf8 {
            message: message.into(),
        }
        .into()
    }

    pub(crate) fn invalid_value(message: impl Into<String>) -> Self {
        ErrorKind::InvalidValue {
            message: message.into(),
        }
        .into()
    }

    pub(crate) fn invalid_auth_combination(message: impl Into<String>) -> Self {
        ErrorKind::InvalidAuthCombination {
            message: message.into(),
        }
        .into()
    }

    pub(crate) fn invalid_read_preference(message: impl Into<String>) -> Self {
        ErrorKind::InvalidReadPreference {
            message: message.into(),
        }
        .into()
    }

    pub(crate) fn invalid_write_concern(message: impl Into<String>) -> Self {
        ErrorKind::InvalidWriteConcern {
            message: message.into(),
        }
        .into()
    }

    pub(crate) fn unexpected_delimiter(message: impl Into<String>) -> Self {
        ErrorKind::UnexpectedDelimiter {
            message: message.into(),
        }
        .into()
    }

    /// Returns `true` if this error indicates the caller supplied a structurally or semantically
    /// invalid connection string, as opposed to e.g. an internal invariant violation.
    pub fn is_invalid_argument(&self) -> bool {
        !matches!(self.kind, ErrorKind::Internal { .. })
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::new(kind)
    }
}

/// The category of error produced while parsing or validating a connection string.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The connection string did not begin with the required `mongodb://` scheme.
    #[error("invalid connection string scheme: {message}")]
    InvalidScheme {
        /// A human-readable description of the problem.
        message: String,
    },

    /// The userinfo (username/password) section was malformed.
    #[error("invalid userinfo: {message}")]
    InvalidUserInfo {
        /// A human-readable description of the problem.
        message: String,
    },

    /// A host entry could not be parsed into an endpoint.
    #[error("invalid host syntax: {message}")]
    InvalidHostSyntax {
        /// A human-readable description of the problem.
        message: String,
    },

    /// A port number was missing, non-numeric, zero, or out of range.
    #[error("invalid port: {message}")]
    InvalidPort {
        /// A human-readable description of the problem.
        message: String,
    },

    /// A hostname exceeded the 255-byte limit.
    #[error("hostname exceeds 255 bytes: {host}")]
    HostnameTooLong {
        /// The offending host text.
        host: String,
    },

    /// The database name section was malformed or contained illegal characters.
    #[error("invalid database name: {message}")]
    InvalidDatabase {
        /// A human-readable description of the problem.
        message: String,
    },

    /// A `%HH` escape was malformed or decoded to a non-printable byte.
    #[error("invalid percent escape: {message}")]
    InvalidPercentEscape {
        /// A human-readable description of the problem.
        message: String,
    },

    /// Decoded bytes were not valid UTF-8.
    #[error("invalid UTF-8: {message}")]
    InvalidUtf8 {
        /// A human-readable description of the problem.
        message: String,
    },

    /// An option value did not match the type its key is registered under, or a sub-grammar
    /// (tag set, auth-mechanism-properties) was malformed.
    #[error("invalid option value: {message}")]
    InvalidValue {
        /// A human-readable description of the problem.
        message: String,
    },

    /// A combination of `authMechanism` and `authSource` (or credentials) is not permitted.
    #[error("invalid authentication combination: {message}")]
    InvalidAuthCombination {
        /// A human-readable description of the problem.
        message: String,
    },

    /// The assembled read preference is internally inconsistent.
    #[error("invalid read preference: {message}")]
    InvalidReadPreference {
        /// A human-readable description of the problem.
        message: String,
    },

    /// The assembled write concern is internally inconsistent.
    #[error("invalid write concern: {message}")]
    InvalidWriteConcern {
        /// A human-readable description of the problem.
        message: String,
    },

    /// A delimiter appeared somewhere the grammar does not allow.
    #[error("unexpected delimiter: {message}")]
    UnexpectedDelimiter {
        /// A human-readable description of the problem.
        message: String,
    },

    /// An internal invariant was violated. Indicates a bug in this crate rather than a malformed
    /// input.
    #[error("internal error: {message}")]
    Internal {
        /// A human-readable description of the problem.
        message: String,
    },
}
