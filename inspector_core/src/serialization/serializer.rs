// inspector_core/src/serialization/serializer.rs
use crate::constants::DEFAULT_SERIALIZER;
use crate::error::{InspectorError, Result};
use crate::reflect::storage_type::StorageType;
use crate::reflect::value::Value;
use crate::serialization::reference::ReferenceOperator;
use once_cell::sync::Lazy;

/// Turns a member value into text and back.
///
/// Host references have already been replaced by reference entries when a
/// serializer sees the value; `refs` is passed along for serializers that
/// want to store references their own way.
pub trait Serializer: Send + Sync {
    fn name(&self) -> &'static str;

    fn serialize(&self, storage: &StorageType, value: &Value, refs: &mut dyn ReferenceOperator) -> Result<String>;

    fn deserialize(&self, storage: &StorageType, text: &str, refs: &mut dyn ReferenceOperator) -> Result<Value>;
}

/// Makes a serializer selectable by name.
///
/// ```ignore
/// inventory::submit! {
///     SerializerRegistration { name: "yaml", factory: yaml_serializer }
/// }
/// ```
pub struct SerializerRegistration {
    pub name: &'static str,
    pub factory: fn() -> Box<dyn Serializer>,
}

inventory::collect!(SerializerRegistration);

pub static REGISTERED_SERIALIZERS: Lazy<Vec<&'static SerializerRegistration>> = Lazy::new(|| {
    inventory::iter::<SerializerRegistration>.into_iter().collect()
});

/// Compact JSON. The default format.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn name(&self) -> &'static str {
        "json"
    }

    fn serialize(&self, _storage: &StorageType, value: &Value, _refs: &mut dyn ReferenceOperator) -> Result<String> {
        serde_json::to_string(value).map_err(|e| InspectorError::Serialize(e.to_string()))
    }

    fn deserialize(&self, _storage: &StorageType, text: &str, _refs: &mut dyn ReferenceOperator) -> Result<Value> {
        serde_json::from_str(text).map_err(|e| InspectorError::Deserialize(e.to_string()))
    }
}

/// Rusty Object Notation, the format settings files use.
#[derive(Debug, Default, Clone, Copy)]
pub struct RonSerializer;

impl Serializer for RonSerializer {
    fn name(&self) -> &'static str {
        "ron"
    }

    fn serialize(&self, _storage: &StorageType, value: &Value, _refs: &mut dyn ReferenceOperator) -> Result<String> {
        ron::to_string(value).map_err(|e| InspectorError::Serialize(e.to_string()))
    }

    fn deserialize(&self, _storage: &StorageType, text: &str, _refs: &mut dyn ReferenceOperator) -> Result<Value> {
        ron::from_str(text).map_err(|e| InspectorError::Deserialize(e.to_string()))
    }
}

/// Returns the serializer registered as `name`.
///
/// Built-in formats are always available; other formats come from
/// `SerializerRegistration`s.
pub fn serializer_by_name(name: &str) -> Result<Box<dyn Serializer>> {
    match name {
        "json" => Ok(Box::new(JsonSerializer)),
        "ron" => Ok(Box::new(RonSerializer)),
        _ => REGISTERED_SERIALIZERS
            .iter()
            .find(|registration| registration.name == name)
            .map(|registration| (registration.factory)())
            .ok_or_else(|| InspectorError::MissingSerializer(name.to_string())),
    }
}

pub fn default_serializer() -> Box<dyn Serializer> {
    serializer_by_name(DEFAULT_SERIALIZER).unwrap_or_else(|_| Box::new(JsonSerializer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::reflect_field::ReflectField;
    use crate::serialization::reference::ListReferenceOperator;
    use std::collections::BTreeMap;

    fn sample() -> Value {
        let mut map = BTreeMap::new();
        map.insert("hp".to_string(), Value::Int(10));
        map.insert("name".to_string(), Value::Text("orc".into()));
        map.insert("target".to_string(), Value::reference(2));
        Value::List(vec![Value::Map(map), Value::Null, Value::Float(0.5), Value::Bool(true)])
    }

    #[test]
    fn builtin_formats_keep_values_intact() {
        let storage = Vec::<i32>::storage();
        let mut references = Vec::new();
        let mut refs = ListReferenceOperator::new(&mut references);

        for name in ["json", "ron"] {
            let serializer = serializer_by_name(name).unwrap();
            let text = serializer.serialize(&storage, &sample(), &mut refs).unwrap();
            let back = serializer.deserialize(&storage, &text, &mut refs).unwrap();
            assert_eq!(back, sample(), "format {name}: {text}");
        }
    }

    #[test]
    fn unknown_serializer_is_an_error() {
        assert!(matches!(
            serializer_by_name("xml"),
            Err(InspectorError::MissingSerializer(name)) if name == "xml"
        ));
        assert_eq!(default_serializer().name(), "json");
    }
}
