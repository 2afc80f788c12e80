//! Read and write concern (§4.9 step 4 of the specification).
//!
//! Grounded on the donor driver's `concern.rs`: `WriteConcern` keeps the same three-field shape
//! and is built with `typed_builder::TypedBuilder` as the donor does, and `Acknowledgment`/
//! `ReadConcernLevel` keep the donor's variant shapes. The donor's `ReadConcernInternal` (carrying
//! `atClusterTime`/`afterClusterTime` for session machinery) is dropped, since this crate has no
//! session subsystem to populate those fields from.

use std::fmt;
use std::str::FromStr;

use typed_builder::TypedBuilder;

use crate::error::{Error, Result};
use crate::warn::warn_sink;

/// The level of durability a write must reach before the server acknowledges it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde-impls", derive(serde::Serialize, serde::Deserialize))]
pub enum Acknowledgment {
    /// Acknowledgment from this many voting nodes.
    Nodes(u32),
    /// Acknowledgment from a majority of voting nodes.
    Majority,
    /// A custom, server-side-defined write concern tag.
    Custom(String),
}

impl Acknowledgment {
    pub fn as_str(&self) -> std::borrow::Cow<'_, str> {
        match self {
            Acknowledgment::Nodes(n) => std::borrow::Cow::Owned(n.to_string()),
            Acknowledgment::Majority => std::borrow::Cow::Borrowed("majority"),
            Acknowledgment::Custom(tag) => std::borrow::Cow::Borrowed(tag),
        }
    }
}

impl FromStr for Acknowledgment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("majority") {
            return Ok(Acknowledgment::Majority);
        }
        if let Ok(n) = s.parse::<u32>() {
            return Ok(Acknowledgment::Nodes(n));
        }
        if s.is_empty() {
            return Err(Error::invalid_write_concern("'w' must not be empty"));
        }
        Ok(Acknowledgment::Custom(s.to_string()))
    }
}

impl fmt::Display for Acknowledgment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Write durability requirements for an operation, assembled from `safe`, `journal`, `w`, and
/// `wtimeoutMS` (§4.9 step 4).
#[derive(Clone, Debug, PartialEq, TypedBuilder)]
#[builder(field_defaults(default))]
#[cfg_attr(feature = "serde-impls", derive(serde::Serialize, serde::Deserialize))]
pub struct WriteConcern {
    #[builder(default)]
    pub w: Option<Acknowledgment>,
    #[builder(default)]
    pub w_timeout: Option<std::time::Duration>,
    #[builder(default)]
    pub journal: Option<bool>,
}

impl WriteConcern {
    /// Assembles and validates a write concern from the raw pieces the option parser collected.
    /// `journal=true` combined with an unacknowledged `w` (`0`) is a conflict the original driver
    /// only warns about rather than rejecting outright, so this mirrors that: the journal request
    /// is kept as supplied and left for the server to reject if it cares.
    pub(crate) fn assemble(
        safe: Option<bool>,
        journal: Option<bool>,
        w: Option<Acknowledgment>,
        w_timeout: Option<std::time::Duration>,
    ) -> Result<Option<Self>> {
        let w = match (w, safe) {
            (Some(w), _) => Some(w),
            (None, Some(false)) => Some(Acknowledgment::Nodes(0)),
            (None, Some(true)) => Some(Acknowledgment::Nodes(1)),
            (None, None) => None,
        };

        if let (Some(Acknowledgment::Nodes(0)), Some(true)) = (&w, journal) {
            warn_sink!("journal=true conflicts with an unacknowledged ('w=0') write concern");
        }

        // §3 invariant 7: w <= 1 makes wtimeoutMS meaningless, so it is dropped rather than kept
        // around unapplied.
        let w_timeout = match &w {
            Some(Acknowledgment::Nodes(n)) if *n <= 1 => {
                if w_timeout.is_some() {
                    warn_sink!("wtimeoutMS is not applied when w <= 1; dropping it");
                }
                None
            }
            _ => w_timeout,
        };

        if w.is_none() && w_timeout.is_none() && journal.is_none() {
            return Ok(None);
        }

        Ok(Some(
            WriteConcern::builder()
                .w(w)
                .w_timeout(w_timeout)
                .journal(journal)
                .build(),
        ))
    }
}

/// How durably data must be replicated before a read returns it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde-impls", derive(serde::Serialize, serde::Deserialize))]
pub enum ReadConcernLevel {
    Local,
    Majority,
    Linearizable,
    Available,
    Snapshot,
    /// Any level string not otherwise recognized, preserved verbatim for forward compatibility.
    Custom(String),
}

impl ReadConcernLevel {
    pub fn as_str(&self) -> &str {
        match self {
            ReadConcernLevel::Local => "local",
            ReadConcernLevel::Majority => "majority",
            ReadConcernLevel::Linearizable => "linearizable",
            ReadConcernLevel::Available => "available",
            ReadConcernLevel::Snapshot => "snapshot",
            ReadConcernLevel::Custom(s) => s,
        }
    }
}

impl FromStr for ReadConcernLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "local" => ReadConcernLevel::Local,
            "majority" => ReadConcernLevel::Majority,
            "linearizable" => ReadConcernLevel::Linearizable,
            "available" => ReadConcernLevel::Available,
            "snapshot" => ReadConcernLevel::Snapshot,
            other => ReadConcernLevel::Custom(other.to_string()),
        })
    }
}

/// The read concern level requested for an operation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde-impls", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadConcern {
    pub level: ReadConcernLevel,
}

impl ReadConcern {
    pub fn new(level: ReadConcernLevel) -> Self {
        ReadConcern { level }
    }
}
