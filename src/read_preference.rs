//! Read preference assembly (§4.9 step 2 of the specification).
//!
//! Grounded on the donor driver's `read_preference.rs` — the `Mode` enum, the constructor methods
//! per mode, and the `max_staleness` field all carry over directly. Two deviations: the donor's
//! `TagSet` is a `HashMap<String, String>`, but the specification's tag sets are ordered as parsed
//! (matching the original C driver, which never sorts or deduplicates them), so this crate defines
//! its own ordered `TagSet`; and `max_staleness` is modeled as a tri-state rather than a bare
//! `Option<Duration>` to carry the `-1` reset sentinel distinctly from "absent" (§4.9 step 3).

use std::time::Duration;

use crate::error::{Error, Result};
use crate::warn::warn_sink;

/// An ordered sequence of `(key, value)` pairs, matched by a server as a single tag set.
pub type TagSet = Vec<(String, String)>;

/// How a client should select which members of a replica set to read from.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-impls", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    Primary,
    Secondary(Vec<TagSet>),
    PrimaryPreferred(Vec<TagSet>),
    SecondaryPreferred(Vec<TagSet>),
    Nearest(Vec<TagSet>),
}

impl Mode {
    fn as_str(&self) -> &'static str {
        match self {
            Mode::Primary => "primary",
            Mode::Secondary(_) => "secondary",
            Mode::PrimaryPreferred(_) => "primaryPreferred",
            Mode::SecondaryPreferred(_) => "secondaryPreferred",
            Mode::Nearest(_) => "nearest",
        }
    }
}

/// The effective maximum replication lag a secondary may have before it is excluded from
/// selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde-impls", derive(serde::Serialize, serde::Deserialize))]
pub enum MaxStaleness {
    /// No staleness bound was configured.
    None,
    /// `maxStalenessSeconds=0` or a negative value other than `-1` was supplied; the original
    /// value is discarded with a warning and treated as [`MaxStaleness::None`] (§4.9 step 3).
    ResetToNone,
    /// A positive staleness bound, in seconds.
    Seconds(u32),
}

/// A fully assembled read preference.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-impls", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadPreference {
    mode: Mode,
    max_staleness: MaxStaleness,
}

impl ReadPreference {
    pub fn primary() -> Self {
        ReadPreference {
            mode: Mode::Primary,
            max_staleness: MaxStaleness::None,
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn mode_str(&self) -> &'static str {
        self.mode.as_str()
    }

    pub fn max_staleness(&self) -> MaxStaleness {
        self.max_staleness
    }

    pub fn max_staleness_duration(&self) -> Option<Duration> {
        match self.max_staleness {
            MaxStaleness::Seconds(s) => Some(Duration::from_secs(s as u64)),
            _ => None,
        }
    }

    /// Assembles a [`ReadPreference`] from a mode and its accumulated tag sets. A `primary` mode
    /// combined with tag sets is not fatal — the tags are dropped with a warning, per §3's
    /// invariant 6 ("warn-only, not fatal").
    pub(crate) fn assemble(mode_str: &str, tags: Vec<TagSet>) -> Result<Self> {
        let mode = match mode_str {
            "primary" => {
                if !tags.is_empty() {
                    warn_sink!(
                        "readPreferenceTags cannot be combined with the 'primary' read \
                         preference mode; dropping them"
                    );
                }
                Mode::Primary
            }
            "secondary" => Mode::Secondary(tags),
            "primarypreferred" => Mode::PrimaryPreferred(tags),
            "secondarypreferred" => Mode::SecondaryPreferred(tags),
            "nearest" => Mode::Nearest(tags),
            other => {
                return Err(Error::invalid_read_preference(format!(
                    "'{other}' is not a recognized readPreference mode"
                )))
            }
        };

        Ok(ReadPreference {
            mode,
            max_staleness: MaxStaleness::None,
        })
    }

    /// Applies a parsed `maxStalenessSeconds` value, normalizing per §4.9 step 3.
    pub(crate) fn with_max_staleness_raw(mut self, raw: i32) -> Result<Self> {
        if matches!(self.mode, Mode::Primary) && raw > 0 {
            return Err(Error::invalid_read_preference(
                "maxStalenessSeconds cannot be combined with the 'primary' read preference mode",
            ));
        }
        self.max_staleness = match raw {
            -1 => MaxStaleness::None,
            r if r < 0 => {
                crate::warn::warn_sink!(
                    "maxStalenessSeconds={r} is negative and not -1; treating as unset"
                );
                MaxStaleness::ResetToNone
            }
            0 => {
                crate::warn::warn_sink!("maxStalenessSeconds=0 is invalid; treating as unset");
                MaxStaleness::ResetToNone
            }
            r => MaxStaleness::Seconds(r as u32),
        };
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembles_primary_with_no_tags() {
        let rp = ReadPreference::assemble("primary", vec![]).unwrap();
        assert_eq!(rp.mode(), &Mode::Primary);
    }

    #[test]
    fn primary_with_tag_sets_drops_them_rather_than_failing() {
        let tags = vec![vec![("dc".to_string(), "east".to_string())]];
        let rp = ReadPreference::assemble("primary", tags).unwrap();
        assert_eq!(rp.mode(), &Mode::Primary);
    }

    #[test]
    fn secondary_preserves_tag_order() {
        let tags = vec![
            vec![("dc".to_string(), "east".to_string())],
            vec![("dc".to_string(), "west".to_string())],
        ];
        let rp = ReadPreference::assemble("secondary", tags.clone()).unwrap();
        assert_eq!(rp.mode(), &Mode::Secondary(tags));
    }

    #[test]
    fn rejects_unknown_mode() {
        assert!(ReadPreference::assemble("bogus", vec![]).is_err());
    }

    #[test]
    fn max_staleness_minus_one_means_none() {
        let rp = ReadPreference::assemble("secondary", vec![])
            .unwrap()
            .with_max_staleness_raw(-1)
            .unwrap();
        assert_eq!(rp.max_staleness(), MaxStaleness::None);
    }

    #[test]
    fn max_staleness_zero_resets_with_warning() {
        let rp = ReadPreference::assemble("secondary", vec![])
            .unwrap()
            .with_max_staleness_raw(0)
            .unwrap();
        assert_eq!(rp.max_staleness(), MaxStaleness::ResetToNone);
    }

    #[test]
    fn max_staleness_negative_non_reset_warns_and_resets() {
        let rp = ReadPreference::assemble("secondary", vec![])
            .unwrap()
            .with_max_staleness_raw(-5)
            .unwrap();
        assert_eq!(rp.max_staleness(), MaxStaleness::ResetToNone);
    }

    #[test]
    fn max_staleness_positive_is_kept() {
        let rp = ReadPreference::assemble("secondary", vec![])
            .unwrap()
            .with_max_staleness_raw(120)
            .unwrap();
        assert_eq!(rp.max_staleness(), MaxStaleness::Seconds(120));
        assert_eq!(
            rp.max_staleness_duration(),
            Some(Duration::from_secs(120))
        );
    }

    #[test]
    fn primary_rejects_positive_max_staleness() {
        let rp = ReadPreference::assemble("primary", vec![]).unwrap();
        assert!(rp.with_max_staleness_raw(120).is_err());
    }
}
