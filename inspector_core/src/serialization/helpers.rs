// inspector_core/src/serialization/helpers.rs
use crate::constants::DEFAULT_MAX_INSTANTIATION_DEPTH;
use crate::reflect::filters::SERIALIZABLE_MEMBERS;
use crate::reflect::object::instantiate_object_references;
use crate::reflect::reflect_field::Reflect;
use crate::reflect::value::Value;
use crate::serialization::cycle::CycleDetector;
use crate::serialization::record::SerializedRecord;
use crate::serialization::reference::{ListReferenceOperator, ReferenceOperator};
use crate::serialization::serializer::Serializer;
use crate::storage::inspector_config::InspectorSettings;
use crate::{inspector_error, inspector_warn};

/// Tuning for [`restore_state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoreOptions {
    /// Fill null nested objects when restoring an empty record.
    pub auto_instantiate_references: bool,
    pub max_instantiation_depth: usize,
}

impl Default for RestoreOptions {
    fn default() -> Self {
        Self {
            auto_instantiate_references: false,
            max_instantiation_depth: DEFAULT_MAX_INSTANTIATION_DEPTH,
        }
    }
}

impl RestoreOptions {
    pub fn from_settings(settings: &InspectorSettings) -> Self {
        Self {
            auto_instantiate_references: settings.auto_instantiate_references,
            max_instantiation_depth: settings.max_instantiation_depth,
        }
    }
}

/// What happened while restoring one record.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RestoreReport {
    /// `(keys, values)` lengths when the record was malformed.
    pub length_mismatch: Option<(usize, usize)>,
    pub restored: Vec<String>,
    /// Keys with no matching member on the type.
    pub unknown_keys: Vec<String>,
    /// Keys whose value could not be parsed or assigned.
    pub failed_keys: Vec<String>,
    /// Host reference members left untouched because the record holds null.
    pub suppressed_null_references: Vec<String>,
    /// Set when an empty record triggered automatic instantiation.
    pub instantiated: bool,
}

impl RestoreReport {
    /// No malformed data and every entry was applied or deliberately skipped.
    pub fn is_clean(&self) -> bool {
        self.length_mismatch.is_none() && self.unknown_keys.is_empty() && self.failed_keys.is_empty()
    }
}

/// Captures every serializable member of `object` into a fresh record.
///
/// Members that fail to read or serialize are logged and left out; the
/// rest of the record is still produced.
pub fn save_state(object: &dyn Reflect, serializer: &dyn Serializer) -> SerializedRecord {
    let descriptor = object.descriptor();
    let mut record = SerializedRecord::default();
    let mut references = Vec::new();
    {
        let mut refs = ListReferenceOperator::new(&mut references);
        for member in descriptor.members_matching(&SERIALIZABLE_MEMBERS).iter() {
            let Some(storage) = member.storage() else { continue };

            let value = match member.read(object.as_any(), &mut refs) {
                Ok(value) => value,
                Err(e) => {
                    inspector_error!("Failed to read `{}` of `{}`: {e}", member.name(), descriptor.type_name());
                    continue;
                }
            };

            if value.is_null() {
                record.push(member.name(), None);
                continue;
            }

            match serializer.serialize(storage, &value, &mut refs) {
                Ok(text) => record.push(member.name(), Some(text)),
                Err(e) => {
                    inspector_error!("Failed to serialize `{}` of `{}`: {e}", member.name(), descriptor.type_name());
                }
            }
        }
    }
    record.references = references;
    record
}

/// Applies `record` to `object`.
///
/// Keys that do not match a member and values that fail to parse are
/// logged and skipped. A null value never overwrites a host reference
/// member, since the host may report destroyed objects as null. When the
/// record is empty and `options.auto_instantiate_references` is set, null
/// nested objects are created instead.
pub fn restore_state(
    object: &mut dyn Reflect,
    record: &SerializedRecord,
    serializer: &dyn Serializer,
    options: &RestoreOptions,
) -> RestoreReport {
    let descriptor = object.descriptor();
    let mut report = RestoreReport::default();

    if let Some((keys, values)) = record.length_mismatch() {
        inspector_warn!(
            "Record for `{}` has {keys} keys but {values} values; restoring the common prefix.",
            descriptor.type_name()
        );
        report.length_mismatch = Some((keys, values));
    }

    if record.is_empty() {
        if options.auto_instantiate_references {
            let mut detector = CycleDetector::new(options.max_instantiation_depth);
            report.instantiated = instantiate_object_references(object, &mut detector);
        }
        return report;
    }

    let mut references = record.references.clone();
    let mut refs = ListReferenceOperator::new(&mut references);

    for (key, text) in record.entries() {
        let Some(member) = descriptor.member(key) else {
            inspector_warn!("`{}` has no member named `{key}`.", descriptor.type_name());
            report.unknown_keys.push(key.to_string());
            continue;
        };
        let Some(storage) = member.storage() else {
            inspector_warn!("`{key}` of `{}` does not hold a value.", descriptor.type_name());
            report.unknown_keys.push(key.to_string());
            continue;
        };

        let value = match text {
            None => Value::Null,
            Some(text) => match serializer.deserialize(storage, text, &mut refs) {
                Ok(value) => value,
                Err(e) => {
                    inspector_error!("Failed to parse `{key}` of `{}`: {e}", descriptor.type_name());
                    report.failed_keys.push(key.to_string());
                    continue;
                }
            },
        };

        // A reference whose slot is empty points at a destroyed host object.
        let value = match value.as_reference() {
            Some(index) if storage.host_reference && refs.retrieve_reference(index).is_none() => Value::Null,
            _ => value,
        };
        if value.is_null() && storage.host_reference {
            report.suppressed_null_references.push(key.to_string());
            continue;
        }

        match member.write(object.as_any_mut(), value, &mut refs) {
            Ok(()) => report.restored.push(key.to_string()),
            Err(e) => {
                inspector_error!("Failed to restore `{key}` of `{}`: {e}", descriptor.type_name());
                report.failed_keys.push(key.to_string());
            }
        }
    }

    report
}
