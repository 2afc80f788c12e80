//! The tagged-sum option value and the order-preserving map that stores *Options* and
//! *Credentials*.
//!
//! The donor driver stores parsed options directly as typed fields on `ClientOptions`; this crate
//! instead keeps the specification's "OrderedDoc" model (§3 GLOSSARY), grounded on the original
//! C driver's `mongoc_uri_t`, which retains parsed options as an ordered BSON document rather than
//! eagerly projecting them onto a struct, so that insertion order and duplicate-key
//! warn-and-replace semantics are observable independent of any specific option's type. No
//! example repo in the retrieval pack pulls in `indexmap`, so the map is a small hand-rolled
//! `Vec<(String, OptionValue)>` rather than reaching for an unground dependency.

use std::collections::HashSet;

use crate::warn::warn_sink;

/// The option that is exempt from the warn-and-replace duplicate-key rule: every occurrence of
/// `readPreferenceTags` in a connection string contributes an additional tag set rather than
/// overwriting the previous one (§4.5 of the specification).
pub(crate) const REPEATABLE_KEY: &str = "readpreferencetags";

/// A single stored option or credential value, tagged by the shape the key's [`OptionClass`][crate::registry::OptionClass]
/// dictates.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-impls", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum OptionValue {
    Int32(i32),
    Bool(bool),
    Utf8(String),
    /// An ordered list of `(key, value)` pairs, used for `readPreferenceTags` (ordered tag sets)
    /// and `authMechanismProperties`.
    Pairs(Vec<(String, String)>),
    /// A sequence of `readPreferenceTags` tag sets, one per repeated occurrence of the key.
    TagSetList(Vec<Vec<(String, String)>>),
}

impl OptionValue {
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            OptionValue::Int32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Utf8(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_pairs(&self) -> Option<&[(String, String)]> {
        match self {
            OptionValue::Pairs(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_tag_set_list(&self) -> Option<&[Vec<(String, String)>]> {
        match self {
            OptionValue::TagSetList(v) => Some(v),
            _ => None,
        }
    }
}

/// An insertion-ordered, case-insensitive map from option key to [`OptionValue`].
///
/// Setting a key that is already present replaces its value *in place* — the key keeps its
/// original position rather than moving to the end — except for [`REPEATABLE_KEY`], whose
/// repeated occurrences accumulate into a single [`OptionValue::TagSetList`] entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrderedDoc {
    entries: Vec<(String, OptionValue)>,
}

impl OrderedDoc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        let key = key.to_ascii_lowercase();
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    /// Inserts or replaces `key`'s value. If `key` is [`REPEATABLE_KEY`] and a `Pairs` value is
    /// being inserted, the new tag set is appended to the existing `TagSetList` rather than
    /// replacing it; any other duplicate insertion warns and replaces the prior value in place.
    pub fn set(&mut self, key: &str, value: OptionValue) {
        let key = key.to_ascii_lowercase();

        if key == REPEATABLE_KEY {
            if let OptionValue::Pairs(tags) = value {
                match self.position(&key) {
                    Some(idx) => {
                        if let OptionValue::TagSetList(list) = &mut self.entries[idx].1 {
                            list.push(tags);
                        }
                    }
                    None => {
                        self.entries.push((key, OptionValue::TagSetList(vec![tags])));
                    }
                }
                return;
            }
        }

        match self.position(&key) {
            Some(idx) => {
                warn_sink!("duplicate option '{key}' overwrites its previous value");
                self.entries[idx].1 = value;
            }
            None => self.entries.push((key, value)),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// All keys currently present, for diagnostics such as reporting unrecognized options.
    pub fn keys(&self) -> HashSet<&str> {
        self.entries.iter().map(|(k, _)| k.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn preserves_insertion_order() {
        let mut doc = OrderedDoc::new();
        doc.set("b", OptionValue::Utf8("2".into()));
        doc.set("a", OptionValue::Utf8("1".into()));
        let keys: Vec<&str> = doc.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn duplicate_key_replaces_in_place() {
        let mut doc = OrderedDoc::new();
        doc.set("a", OptionValue::Utf8("1".into()));
        doc.set("b", OptionValue::Utf8("2".into()));
        doc.set("a", OptionValue::Utf8("3".into()));
        let keys: Vec<&str> = doc.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(doc.get("a").unwrap().as_str(), Some("3"));
    }

    #[test]
    fn keys_are_case_insensitive() {
        let mut doc = OrderedDoc::new();
        doc.set("AppName", OptionValue::Utf8("x".into()));
        assert_eq!(doc.get("appname").unwrap().as_str(), Some("x"));
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn repeated_read_preference_tags_accumulate() {
        let mut doc = OrderedDoc::new();
        doc.set(
            "readPreferenceTags",
            OptionValue::Pairs(vec![("dc".into(), "east".into())]),
        );
        doc.set(
            "readPreferenceTags",
            OptionValue::Pairs(vec![("dc".into(), "west".into())]),
        );
        let list = doc.get("readpreferencetags").unwrap().as_tag_set_list().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0], vec![("dc".to_string(), "east".to_string())]);
        assert_eq!(list[1], vec![("dc".to_string(), "west".to_string())]);
    }

    #[test]
    fn empty_doc_reports_empty() {
        let doc = OrderedDoc::new();
        assert!(doc.is_empty());
        assert_eq!(doc.len(), 0);
    }

    #[test]
    fn get_on_missing_key_is_none() {
        let doc = OrderedDoc::new();
        assert!(doc.get("missing").is_none());
    }
}
