// inspector_core/src/reflect/storage_type.rs
use crate::error::{InspectorError, Result};
use crate::reflect::reflect_field::{Reflect, ReflectField};
use crate::reflect::type_cache::{type_cache, TypeDescriptor};
use crate::reflect::type_info::TypeInfo;
use crate::reflect::value::Value;
use crate::serialization::cycle::CycleDetector;
use crate::serialization::reference::ReferenceOperator;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;
use strum_macros::Display;

/// Broad shape of a stored value. Editors are picked by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ValueKind {
    Bool,
    Integer,
    Float,
    Text,
    List,
    Map,
    Object,
    HostReference,
}

/// Static description of the type stored in a member.
///
/// The conversion pointers are monomorphised for the concrete type, so a
/// `StorageType` can read and write a slot that is only known as `dyn Any`.
#[derive(Clone, Copy)]
pub struct StorageType {
    pub type_id: TypeId,
    pub type_name: &'static str,
    pub kind: ValueKind,
    /// `Option<T>` and other types that accept `Value::Null`.
    pub nullable: bool,
    /// The host's own reference type, possibly wrapped in `Option`.
    pub host_reference: bool,
    /// Fixed length sequences.
    pub is_array: bool,
    /// Element storage for lists, arrays and maps.
    pub element: Option<fn() -> StorageType>,
    /// Type whose members describe the stored value. Wrappers point at the wrapped type.
    described_id: TypeId,
    describe: fn() -> TypeInfo,
    to_value: fn(&dyn Any, &mut dyn ReferenceOperator) -> Result<Value>,
    assign: fn(&mut dyn Any, Value, &mut dyn ReferenceOperator) -> Result<()>,
    instantiate: fn(&mut dyn Any, &mut CycleDetector) -> bool,
    reflect_mut: fn(&mut dyn Any) -> Option<&mut dyn Reflect>,
}

impl StorageType {
    pub fn of<T: ReflectField>(kind: ValueKind) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            kind,
            nullable: false,
            host_reference: false,
            is_array: false,
            element: None,
            described_id: TypeId::of::<T>(),
            describe: T::type_info,
            to_value: erased_to_value::<T>,
            assign: erased_assign::<T>,
            instantiate: erased_instantiate::<T>,
            reflect_mut: erased_reflect_mut::<T>,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn host_reference(mut self) -> Self {
        self.host_reference = true;
        self
    }

    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    pub fn with_element(mut self, element: fn() -> StorageType) -> Self {
        self.element = Some(element);
        self
    }

    /// Copies the flags that describe the wrapped type.
    pub fn inherit_flags(mut self, inner: &StorageType) -> Self {
        self.host_reference = inner.host_reference;
        self.is_array = inner.is_array;
        self.element = inner.element;
        self.described_id = inner.described_id;
        self.describe = inner.describe;
        self
    }

    pub fn is_collection(&self) -> bool {
        matches!(self.kind, ValueKind::List | ValueKind::Map)
    }

    /// Member layout of the stored type, from the process-wide cache.
    pub fn descriptor(&self) -> Arc<TypeDescriptor> {
        type_cache().get_or_build(self.described_id, self.describe)
    }

    /// Converts the value stored in `slot` into a `Value`.
    pub fn read(&self, slot: &dyn Any, refs: &mut dyn ReferenceOperator) -> Result<Value> {
        (self.to_value)(slot, refs)
    }

    /// Overwrites the value stored in `slot`.
    pub fn assign(&self, slot: &mut dyn Any, value: Value, refs: &mut dyn ReferenceOperator) -> Result<()> {
        (self.assign)(slot, value, refs)
    }

    /// Fills null references inside `slot` with default instances.
    pub fn instantiate(&self, slot: &mut dyn Any, detector: &mut CycleDetector) -> bool {
        (self.instantiate)(slot, detector)
    }

    /// Borrows the nested object stored in `slot`. `None` for non-objects
    /// and for null optional objects.
    pub fn reflect_mut<'a>(&self, slot: &'a mut dyn Any) -> Option<&'a mut dyn Reflect> {
        (self.reflect_mut)(slot)
    }
}

impl PartialEq for StorageType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl fmt::Debug for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageType")
            .field("type_name", &self.type_name)
            .field("kind", &self.kind)
            .field("nullable", &self.nullable)
            .field("host_reference", &self.host_reference)
            .field("is_array", &self.is_array)
            .finish()
    }
}

fn slot_mismatch<T>() -> InspectorError {
    InspectorError::TypeMismatch {
        expected: std::any::type_name::<T>(),
        found: "a slot of another type".to_string(),
    }
}

fn erased_to_value<T: ReflectField>(slot: &dyn Any, refs: &mut dyn ReferenceOperator) -> Result<Value> {
    slot.downcast_ref::<T>()
        .ok_or_else(slot_mismatch::<T>)?
        .to_value(refs)
}

fn erased_assign<T: ReflectField>(slot: &mut dyn Any, value: Value, refs: &mut dyn ReferenceOperator) -> Result<()> {
    let target = slot.downcast_mut::<T>().ok_or_else(slot_mismatch::<T>)?;
    *target = T::from_value(value, refs)?;
    Ok(())
}

fn erased_instantiate<T: ReflectField>(slot: &mut dyn Any, detector: &mut CycleDetector) -> bool {
    match slot.downcast_mut::<T>() {
        Some(target) => target.instantiate_references(detector),
        None => false,
    }
}

fn erased_reflect_mut<T: ReflectField>(slot: &mut dyn Any) -> Option<&mut dyn Reflect> {
    slot.downcast_mut::<T>()?.nested_reflect_mut()
}
