pub mod cycle;
pub mod helpers;
pub mod manager;
pub mod record;
pub mod reference;
pub mod serialized_object;
pub mod serializer;

pub use cycle::{CycleDetector, Pass};
pub use helpers::{restore_state, save_state, RestoreOptions, RestoreReport};
pub use manager::{SerializationManager, SharedObject};
pub use record::{InstanceId, SerializedRecord, SerializedState};
pub use reference::{ListReferenceOperator, ReferenceOperator};
pub use serialized_object::{restore_object, save_object, SerializedObject};
pub use serializer::{
    default_serializer, serializer_by_name, JsonSerializer, RonSerializer, Serializer, SerializerRegistration,
};
