// inspector_core/src/reflect/reflect_field.rs
use crate::error::{InspectorError, Result};
use crate::reflect::host_ref::HostRef;
use crate::reflect::storage_type::{StorageType, ValueKind};
use crate::reflect::type_cache::TypeDescriptor;
use crate::reflect::type_info::TypeInfo;
use crate::reflect::value::Value;
use crate::serialization::cycle::CycleDetector;
use crate::serialization::reference::ReferenceOperator;
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Object-safe view of a reflected struct.
pub trait Reflect: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    /// Cached descriptor of the concrete type.
    fn descriptor(&self) -> Arc<TypeDescriptor>;
    fn reflected_type_name(&self) -> &'static str;
}

/// Implemented by every type that can be stored in a reflected member.
pub trait ReflectField: Any + Send + Sync + Sized {
    fn storage() -> StorageType;

    /// Registration data used to build the type's descriptor.
    fn type_info() -> TypeInfo {
        TypeInfo::leaf::<Self>()
    }

    fn to_value(&self, refs: &mut dyn ReferenceOperator) -> Result<Value>;

    fn from_value(value: Value, refs: &mut dyn ReferenceOperator) -> Result<Self>;

    /// A fresh instance, or `None` when the type cannot be constructed.
    fn create_default() -> Option<Self> {
        None
    }

    /// Replaces null references reachable from `self` with default instances.
    /// Returns true when anything was created.
    fn instantiate_references(&mut self, _detector: &mut CycleDetector) -> bool {
        false
    }

    /// The value as a nested reflected object, if it is one.
    fn nested_reflect_mut(&mut self) -> Option<&mut dyn Reflect> {
        None
    }
}

/// Boxes a default instance. Used as the constructor of derived types.
pub fn boxed_default<T: Reflect + Default>() -> Box<dyn Reflect> {
    Box::new(T::default())
}

fn mismatch(expected: &'static str, found: &Value) -> InspectorError {
    InspectorError::TypeMismatch {
        expected,
        found: found.kind_name().to_string(),
    }
}

macro_rules! impl_integer_field {
    ($($ty:ty),* $(,)?) => {$(
        impl ReflectField for $ty {
            fn storage() -> StorageType {
                StorageType::of::<Self>(ValueKind::Integer)
            }

            fn to_value(&self, _refs: &mut dyn ReferenceOperator) -> Result<Value> {
                i64::try_from(*self)
                    .map(Value::Int)
                    .map_err(|_| InspectorError::OutOfRange {
                        value: self.to_string(),
                        target: "i64",
                    })
            }

            fn from_value(value: Value, _refs: &mut dyn ReferenceOperator) -> Result<Self> {
                let int = match value {
                    Value::Int(i) => i,
                    // Some formats write whole numbers with a fraction.
                    // `as` saturates, so the range is checked first.
                    Value::Float(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => f as i64,
                    Value::Float(f) if f.fract() == 0.0 => {
                        return Err(InspectorError::OutOfRange {
                            value: f.to_string(),
                            target: stringify!($ty),
                        });
                    }
                    other => return Err(mismatch("integer", &other)),
                };
                <$ty>::try_from(int).map_err(|_| InspectorError::OutOfRange {
                    value: int.to_string(),
                    target: stringify!($ty),
                })
            }

            fn create_default() -> Option<Self> {
                Some(0)
            }
        }
    )*};
}

impl_integer_field!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! impl_float_field {
    ($($ty:ty),* $(,)?) => {$(
        impl ReflectField for $ty {
            fn storage() -> StorageType {
                StorageType::of::<Self>(ValueKind::Float)
            }

            fn to_value(&self, _refs: &mut dyn ReferenceOperator) -> Result<Value> {
                Ok(Value::Float(*self as f64))
            }

            fn from_value(value: Value, _refs: &mut dyn ReferenceOperator) -> Result<Self> {
                match value {
                    Value::Float(f) => Ok(f as $ty),
                    Value::Int(i) => Ok(i as $ty),
                    other => Err(mismatch("float", &other)),
                }
            }

            fn create_default() -> Option<Self> {
                Some(0.0)
            }
        }
    )*};
}

impl_float_field!(f32, f64);

impl ReflectField for bool {
    fn storage() -> StorageType {
        StorageType::of::<Self>(ValueKind::Bool)
    }

    fn to_value(&self, _refs: &mut dyn ReferenceOperator) -> Result<Value> {
        Ok(Value::Bool(*self))
    }

    fn from_value(value: Value, _refs: &mut dyn ReferenceOperator) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(mismatch("bool", &other)),
        }
    }

    fn create_default() -> Option<Self> {
        Some(false)
    }
}

impl ReflectField for String {
    fn storage() -> StorageType {
        StorageType::of::<Self>(ValueKind::Text)
    }

    fn to_value(&self, _refs: &mut dyn ReferenceOperator) -> Result<Value> {
        Ok(Value::Text(self.clone()))
    }

    fn from_value(value: Value, _refs: &mut dyn ReferenceOperator) -> Result<Self> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(mismatch("text", &other)),
        }
    }

    fn create_default() -> Option<Self> {
        Some(String::new())
    }
}

impl ReflectField for HostRef {
    fn storage() -> StorageType {
        StorageType::of::<Self>(ValueKind::HostReference).host_reference()
    }

    fn to_value(&self, refs: &mut dyn ReferenceOperator) -> Result<Value> {
        Ok(Value::reference(refs.store_reference(self.clone())))
    }

    fn from_value(value: Value, refs: &mut dyn ReferenceOperator) -> Result<Self> {
        let index = value
            .as_reference()
            .ok_or_else(|| mismatch("object reference", &value))?;
        refs.retrieve_reference(index).ok_or_else(|| {
            InspectorError::Deserialize(format!("object reference #{index} could not be resolved"))
        })
    }
}

impl<T: ReflectField> ReflectField for Option<T> {
    fn storage() -> StorageType {
        let inner = T::storage();
        StorageType::of::<Self>(inner.kind)
            .nullable()
            .inherit_flags(&inner)
    }

    fn to_value(&self, refs: &mut dyn ReferenceOperator) -> Result<Value> {
        match self {
            Some(inner) => inner.to_value(refs),
            None => Ok(Value::Null),
        }
    }

    fn from_value(value: Value, refs: &mut dyn ReferenceOperator) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other, refs).map(Some),
        }
    }

    fn create_default() -> Option<Self> {
        Some(None)
    }

    fn instantiate_references(&mut self, detector: &mut CycleDetector) -> bool {
        let mut created = false;
        if self.is_none() {
            if detector.is_suspended() {
                return false;
            }
            match T::create_default() {
                Some(instance) => {
                    *self = Some(instance);
                    created = true;
                }
                None => return false,
            }
        }
        if let Some(inner) = self {
            created |= inner.instantiate_references(detector);
        }
        created
    }

    fn nested_reflect_mut(&mut self) -> Option<&mut dyn Reflect> {
        self.as_mut().and_then(|inner| inner.nested_reflect_mut())
    }
}

impl<T: ReflectField> ReflectField for Box<T> {
    fn storage() -> StorageType {
        let inner = T::storage();
        StorageType::of::<Self>(inner.kind).inherit_flags(&inner)
    }

    fn to_value(&self, refs: &mut dyn ReferenceOperator) -> Result<Value> {
        self.as_ref().to_value(refs)
    }

    fn from_value(value: Value, refs: &mut dyn ReferenceOperator) -> Result<Self> {
        T::from_value(value, refs).map(Box::new)
    }

    fn create_default() -> Option<Self> {
        T::create_default().map(Box::new)
    }

    fn instantiate_references(&mut self, detector: &mut CycleDetector) -> bool {
        self.as_mut().instantiate_references(detector)
    }

    fn nested_reflect_mut(&mut self) -> Option<&mut dyn Reflect> {
        self.as_mut().nested_reflect_mut()
    }
}

fn list_items(value: Value) -> Result<Vec<Value>> {
    match value {
        Value::List(items) => Ok(items),
        other => Err(mismatch("list", &other)),
    }
}

fn map_entries(value: Value) -> Result<BTreeMap<String, Value>> {
    match value {
        Value::Map(map) => Ok(map),
        other => Err(mismatch("map", &other)),
    }
}

impl<T: ReflectField> ReflectField for Vec<T> {
    fn storage() -> StorageType {
        StorageType::of::<Self>(ValueKind::List).with_element(T::storage)
    }

    fn to_value(&self, refs: &mut dyn ReferenceOperator) -> Result<Value> {
        self.iter()
            .map(|item| item.to_value(refs))
            .collect::<Result<Vec<_>>>()
            .map(Value::List)
    }

    fn from_value(value: Value, refs: &mut dyn ReferenceOperator) -> Result<Self> {
        list_items(value)?
            .into_iter()
            .map(|item| T::from_value(item, refs))
            .collect()
    }

    fn create_default() -> Option<Self> {
        Some(Vec::new())
    }

    fn instantiate_references(&mut self, detector: &mut CycleDetector) -> bool {
        let mut created = false;
        for item in self.iter_mut() {
            created |= item.instantiate_references(detector);
        }
        created
    }
}

impl<T: ReflectField, const N: usize> ReflectField for [T; N] {
    fn storage() -> StorageType {
        StorageType::of::<Self>(ValueKind::List)
            .array()
            .with_element(T::storage)
    }

    fn to_value(&self, refs: &mut dyn ReferenceOperator) -> Result<Value> {
        self.iter()
            .map(|item| item.to_value(refs))
            .collect::<Result<Vec<_>>>()
            .map(Value::List)
    }

    fn from_value(value: Value, refs: &mut dyn ReferenceOperator) -> Result<Self> {
        let items = list_items(value)?
            .into_iter()
            .map(|item| T::from_value(item, refs))
            .collect::<Result<Vec<T>>>()?;
        items.try_into().map_err(|items: Vec<T>| InspectorError::LengthMismatch {
            expected: N,
            found: items.len(),
        })
    }

    fn create_default() -> Option<Self> {
        let items = (0..N)
            .map(|_| T::create_default())
            .collect::<Option<Vec<T>>>()?;
        items.try_into().ok()
    }

    fn instantiate_references(&mut self, detector: &mut CycleDetector) -> bool {
        let mut created = false;
        for item in self.iter_mut() {
            created |= item.instantiate_references(detector);
        }
        created
    }
}

macro_rules! impl_string_map_field {
    ($($map:ident),*) => {$(
        impl<T: ReflectField> ReflectField for $map<String, T> {
            fn storage() -> StorageType {
                StorageType::of::<Self>(ValueKind::Map).with_element(T::storage)
            }

            fn to_value(&self, refs: &mut dyn ReferenceOperator) -> Result<Value> {
                let mut out = BTreeMap::new();
                for (key, item) in self.iter() {
                    out.insert(key.clone(), item.to_value(refs)?);
                }
                Ok(Value::Map(out))
            }

            fn from_value(value: Value, refs: &mut dyn ReferenceOperator) -> Result<Self> {
                map_entries(value)?
                    .into_iter()
                    .map(|(key, item)| T::from_value(item, refs).map(|v| (key, v)))
                    .collect()
            }

            fn create_default() -> Option<Self> {
                Some($map::new())
            }

            fn instantiate_references(&mut self, detector: &mut CycleDetector) -> bool {
                let mut created = false;
                for item in self.values_mut() {
                    created |= item.instantiate_references(detector);
                }
                created
            }
        }
    )*};
}

impl_string_map_field!(HashMap, BTreeMap);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialization::reference::ListReferenceOperator;

    #[test]
    fn integers_reject_out_of_range_values() {
        let mut refs = Vec::new();
        let mut op = ListReferenceOperator::new(&mut refs);
        assert_eq!(u8::from_value(Value::Int(200), &mut op).unwrap(), 200);
        assert!(matches!(
            u8::from_value(Value::Int(300), &mut op),
            Err(InspectorError::OutOfRange { .. })
        ));
        assert_eq!(i32::from_value(Value::Float(4.0), &mut op).unwrap(), 4);
        assert!(matches!(
            i64::from_value(Value::Float(1e20), &mut op),
            Err(InspectorError::OutOfRange { .. })
        ));
        assert!(matches!(
            u64::from_value(Value::Float(-1e20), &mut op),
            Err(InspectorError::OutOfRange { .. })
        ));
        assert!(i32::from_value(Value::Text("4".into()), &mut op).is_err());
    }

    #[test]
    fn option_maps_null() {
        let mut refs = Vec::new();
        let mut op = ListReferenceOperator::new(&mut refs);
        let none: Option<String> = None;
        assert_eq!(none.to_value(&mut op).unwrap(), Value::Null);
        assert_eq!(
            Option::<String>::from_value(Value::Text("x".into()), &mut op).unwrap(),
            Some("x".to_string())
        );
        assert!(Option::<HostRef>::storage().host_reference);
        assert!(Option::<HostRef>::storage().nullable);
    }

    #[test]
    fn arrays_check_their_length() {
        let mut refs = Vec::new();
        let mut op = ListReferenceOperator::new(&mut refs);
        let value = Value::List(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(<[i32; 2]>::from_value(value.clone(), &mut op).unwrap(), [1, 2]);
        assert!(matches!(
            <[i32; 3]>::from_value(value, &mut op),
            Err(InspectorError::LengthMismatch { expected: 3, found: 2 })
        ));
        assert!(<[i32; 3]>::storage().is_array);
    }

    #[test]
    fn host_references_go_through_the_operator() {
        let sprite = HostRef::new(7_u32);
        let mut refs = Vec::new();
        let value = {
            let mut op = ListReferenceOperator::new(&mut refs);
            sprite.to_value(&mut op).unwrap()
        };
        assert_eq!(value.as_reference(), Some(0));
        assert_eq!(refs.len(), 1);

        let mut op = ListReferenceOperator::new(&mut refs);
        let back = HostRef::from_value(value, &mut op).unwrap();
        assert!(back.ptr_eq(&sprite));
    }
}
