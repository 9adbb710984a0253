// inspector_core/src/serialization/manager.rs
use crate::error::Result;
use crate::modification::detector::ModificationDetector;
use crate::serialization::helpers::RestoreOptions;
use crate::serialization::record::InstanceId;
use crate::serialization::serialized_object::{restore_object, save_object, SerializedObject};
use crate::serialization::serializer::{serializer_by_name, Serializer};
use crate::storage::inspector_config::InspectorSettings;
use crate::{inspector_debug, inspector_warn};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// An object shared between the host's threads.
pub type SharedObject = Arc<Mutex<dyn SerializedObject>>;

#[derive(Default)]
struct Queue {
    pending: Vec<SharedObject>,
    dirty: HashSet<InstanceId>,
}

/// Coordinates saving and restoring of [`SerializedObject`]s.
///
/// Hosts deserialize on worker threads but object state may only be touched
/// on the main thread, so restores are queued by `submit_deserialize` and
/// performed by `run_deserializations`, which the main thread calls once per
/// tick.
pub struct SerializationManager {
    queue: Mutex<Queue>,
    detector: Mutex<ModificationDetector>,
    serializer: Box<dyn Serializer>,
    options: RestoreOptions,
}

impl SerializationManager {
    pub fn new(serializer: Box<dyn Serializer>, options: RestoreOptions) -> Self {
        Self {
            queue: Mutex::new(Queue::default()),
            detector: Mutex::new(ModificationDetector::new()),
            serializer,
            options,
        }
    }

    pub fn from_settings(settings: &InspectorSettings) -> Result<Self> {
        let serializer = serializer_by_name(&settings.serializer)?;
        Ok(Self::new(serializer, RestoreOptions::from_settings(settings)))
    }

    pub fn serializer(&self) -> &dyn Serializer {
        self.serializer.as_ref()
    }

    fn queue(&self) -> MutexGuard<'_, Queue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn detector(&self) -> MutexGuard<'_, ModificationDetector> {
        self.detector.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Flags an object as edited so the next `submit_serialize` saves it.
    pub fn mark_dirty(&self, id: InstanceId) {
        self.queue().dirty.insert(id);
    }

    pub fn is_dirty(&self, id: InstanceId) -> bool {
        self.queue().dirty.contains(&id)
    }

    /// Saves `object` if it is dirty or always dirty. Returns whether it was saved.
    ///
    /// The dirty flag is consumed atomically, so concurrent requests for
    /// the same object save it once.
    pub fn submit_serialize(&self, object: &SharedObject) -> bool {
        let (id, always_dirty) = {
            let guard = lock_object(object);
            (guard.instance_id(), guard.always_dirty())
        };

        let was_dirty = self.queue().dirty.remove(&id);
        if !was_dirty && !always_dirty {
            return false;
        }

        let mut guard = lock_object(object);
        save_object(&mut *guard, self.serializer());
        inspector_debug!("Saved `{}` ({id}).", guard.reflected_type_name());
        true
    }

    /// Queues `object` for restoration on the next pump. Safe from any thread.
    pub fn submit_deserialize(&self, object: SharedObject) {
        self.queue().pending.push(object);
    }

    pub fn pending_count(&self) -> usize {
        self.queue().pending.len()
    }

    /// Restores every queued object that was never restored or whose record
    /// changed since its last restore. Returns how many were restored.
    ///
    /// Must be called from the main thread.
    pub fn run_deserializations(&self) -> usize {
        let pending = std::mem::take(&mut self.queue().pending);
        let mut restored = 0;

        for object in pending {
            let mut guard = lock_object(&object);
            let mut detector = self.detector();
            if guard.is_restored() && !detector.was_modified(&*guard) {
                continue;
            }

            let report = restore_object(&mut *guard, self.serializer(), &self.options);
            if !report.is_clean() {
                inspector_warn!(
                    "Restored `{}` ({}) with problems: {report:?}",
                    guard.reflected_type_name(),
                    guard.instance_id()
                );
            }
            detector.update(&*guard);
            restored += 1;
        }

        restored
    }

    /// Drops all bookkeeping for a destroyed object.
    pub fn forget(&self, id: InstanceId) {
        self.queue().dirty.remove(&id);
        self.detector().forget(id);
    }
}

fn lock_object(object: &SharedObject) -> MutexGuard<'_, dyn SerializedObject> {
    object.lock().unwrap_or_else(PoisonError::into_inner)
}
