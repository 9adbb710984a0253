// inspector_core/src/serialization/serialized_object.rs
use crate::reflect::reflect_field::Reflect;
use crate::serialization::helpers::{restore_state, save_state, RestoreOptions, RestoreReport};
use crate::serialization::record::{InstanceId, SerializedState};
use crate::serialization::serializer::Serializer;

/// An object that keeps its persisted form in an embedded [`SerializedState`].
///
/// Derived with `#[derive(Reflect)]` when a field is marked `#[reflect(state)]`.
pub trait SerializedObject: Reflect {
    fn as_reflect(&self) -> &dyn Reflect;
    fn as_reflect_mut(&mut self) -> &mut dyn Reflect;

    fn serialized_state(&self) -> &SerializedState;
    fn serialized_state_mut(&mut self) -> &mut SerializedState;

    /// Objects that mutate themselves outside the editor are saved on
    /// every serialization request.
    fn always_dirty(&self) -> bool {
        false
    }

    fn instance_id(&self) -> InstanceId {
        self.serialized_state().id
    }

    fn is_restored(&self) -> bool {
        self.serialized_state().restored
    }
}

/// Saves the live members of `object` into its embedded record.
pub fn save_object(object: &mut dyn SerializedObject, serializer: &dyn Serializer) {
    let record = save_state(object.as_reflect(), serializer);
    object.serialized_state_mut().record = record;
}

/// Applies the embedded record to the live members of `object`.
pub fn restore_object(
    object: &mut dyn SerializedObject,
    serializer: &dyn Serializer,
    options: &RestoreOptions,
) -> RestoreReport {
    // The record is not a member, so it can be moved out while restoring.
    let record = std::mem::take(&mut object.serialized_state_mut().record);
    let report = restore_state(object.as_reflect_mut(), &record, serializer, options);

    let state = object.serialized_state_mut();
    state.record = record;
    state.restored = true;
    report
}
