// inspector_core/src/reflect/object.rs
use crate::error::{InspectorError, Result};
use crate::inspector_warn;
use crate::reflect::filters::{INSPECTABLE_MEMBERS, SERIALIZABLE_MEMBERS};
use crate::reflect::reflect_field::{Reflect, ReflectField};
use crate::reflect::value::Value;
use crate::serialization::cycle::CycleDetector;
use crate::serialization::reference::ReferenceOperator;
use std::collections::BTreeMap;

/// Converts a nested object into a map of its serializable members.
pub fn object_to_value(object: &dyn Reflect, refs: &mut dyn ReferenceOperator) -> Result<Value> {
    let descriptor = object.descriptor();
    let mut map = BTreeMap::new();
    for member in descriptor.members_matching(&SERIALIZABLE_MEMBERS).iter() {
        map.insert(member.name().to_string(), member.read(object.as_any(), refs)?);
    }
    Ok(Value::Map(map))
}

/// Builds a nested object from a map produced by [`object_to_value`].
pub fn object_from_value<T: Reflect + ReflectField>(value: Value, refs: &mut dyn ReferenceOperator) -> Result<T> {
    let entries = match value {
        Value::Map(entries) => entries,
        other => {
            return Err(InspectorError::TypeMismatch {
                expected: "object",
                found: other.kind_name().to_string(),
            });
        }
    };

    let mut object = T::create_default().ok_or_else(|| InspectorError::NotConstructible {
        type_name: std::any::type_name::<T>().to_string(),
    })?;
    let descriptor = object.descriptor();
    for (key, item) in entries {
        match descriptor.member(&key) {
            Some(member) => member.write(object.as_any_mut(), item, refs)?,
            None => inspector_warn!(
                "Ignoring unknown member `{key}` of `{}`.",
                descriptor.type_name()
            ),
        }
    }
    Ok(object)
}

/// Replaces null `Option` members of `object` with default instances,
/// recursing into nested objects until the detector suspends instantiation.
pub fn instantiate_object_references(object: &mut dyn Reflect, detector: &mut CycleDetector) -> bool {
    if !detector.try_enter() {
        return false;
    }

    let descriptor = object.descriptor();
    let mut created = false;
    for member in descriptor.members_matching(&INSPECTABLE_MEMBERS).iter() {
        created |= member.instantiate(object.as_any_mut(), detector);
    }

    detector.exit();
    created
}
