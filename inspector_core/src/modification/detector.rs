// inspector_core/src/modification/detector.rs
use crate::reflect::host_ref::{same_reference, HostRef};
use crate::serialization::record::{InstanceId, SerializedRecord};
use crate::serialization::serialized_object::SerializedObject;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
struct Snapshot {
    state: HashMap<String, Option<String>>,
    references: Vec<Option<HostRef>>,
}

/// Remembers the last record each object was restored from, so unchanged
/// objects can skip a restore.
#[derive(Debug, Default)]
pub struct ModificationDetector {
    snapshots: HashMap<InstanceId, Snapshot>,
}

impl ModificationDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the object's record differs from the last snapshot, or no
    /// snapshot exists.
    pub fn was_modified(&self, object: &dyn SerializedObject) -> bool {
        let state = object.serialized_state();
        self.was_record_modified(state.id, &state.record)
    }

    pub fn was_record_modified(&self, id: InstanceId, record: &SerializedRecord) -> bool {
        let Some(snapshot) = self.snapshots.get(&id) else {
            return true;
        };

        if snapshot.state.len() != record.keys.len() {
            return true;
        }
        for (index, key) in record.keys.iter().enumerate() {
            let value = record.values.get(index).and_then(|v| v.as_deref());
            match snapshot.state.get(key) {
                Some(stored) if stored.as_deref() == value => {}
                _ => return true,
            }
        }

        if snapshot.references.len() != record.references.len() {
            return true;
        }
        !snapshot
            .references
            .iter()
            .zip(&record.references)
            .all(|(stored, current)| same_reference(stored, current))
    }

    /// Replaces the snapshot with the object's current record.
    pub fn update(&mut self, object: &dyn SerializedObject) {
        let state = object.serialized_state();
        self.update_record(state.id, &state.record);
    }

    pub fn update_record(&mut self, id: InstanceId, record: &SerializedRecord) {
        let snapshot = self.snapshots.entry(id).or_default();
        snapshot.state.clear();
        for (index, key) in record.keys.iter().enumerate() {
            let value = record.values.get(index).cloned().flatten();
            snapshot.state.insert(key.clone(), value);
        }
        snapshot.references.clone_from(&record.references);
    }

    /// Drops the snapshot of a destroyed object.
    pub fn forget(&mut self, id: InstanceId) -> bool {
        self.snapshots.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
