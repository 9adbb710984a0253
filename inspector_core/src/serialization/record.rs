// inspector_core/src/serialization/record.rs
use crate::reflect::host_ref::HostRef;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Persisted state of one object.
///
/// `keys` and `values` are parallel lists; a `None` value records null.
/// `references` holds the host objects that serialized values point at by
/// index. Hosts persist that list with their own machinery, so it is not
/// part of the serde representation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializedRecord {
    pub keys: Vec<String>,
    pub values: Vec<Option<String>>,
    #[serde(skip)]
    pub references: Vec<Option<HostRef>>,
}

impl SerializedRecord {
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
        self.values.clear();
        self.references.clear();
    }

    /// Appends one entry.
    pub fn push(&mut self, key: impl Into<String>, value: Option<String>) {
        self.keys.push(key.into());
        self.values.push(value);
    }

    /// Entries as `(key, value)` pairs. Stops at the shorter list.
    pub fn entries(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.keys
            .iter()
            .zip(&self.values)
            .map(|(key, value)| (key.as_str(), value.as_deref()))
    }

    /// Returns `Some(value)` if `key` is recorded.
    pub fn value_of(&self, key: &str) -> Option<Option<&str>> {
        self.entries().find(|(k, _)| *k == key).map(|(_, value)| value)
    }

    /// `(keys, values)` lengths when they disagree.
    pub fn length_mismatch(&self) -> Option<(usize, usize)> {
        (self.keys.len() != self.values.len()).then_some((self.keys.len(), self.values.len()))
    }
}

/// Stable identity of a serialized object across saves and restores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(pub Uuid);

impl InstanceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bookkeeping embedded in every object that persists through a record.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializedState {
    pub id: InstanceId,
    pub record: SerializedRecord,
    /// Set once the record has been applied to the live object.
    #[serde(skip)]
    pub restored: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_pair_keys_with_values() {
        let mut record = SerializedRecord::default();
        record.push("a", Some("1".into()));
        record.push("b", None);

        assert_eq!(record.value_of("a"), Some(Some("1")));
        assert_eq!(record.value_of("b"), Some(None));
        assert_eq!(record.value_of("c"), None);
        assert!(record.length_mismatch().is_none());

        record.keys.push("c".into());
        assert_eq!(record.length_mismatch(), Some((3, 2)));
        assert_eq!(record.entries().count(), 2);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let record: SerializedRecord = serde_json::from_str(r#"{"keys":["x"]}"#).unwrap();
        assert_eq!(record.keys, vec!["x".to_string()]);
        assert!(record.values.is_empty());
    }
}
