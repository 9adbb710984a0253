// inspector_core/src/editor/editors.rs
use crate::constants::*;
use crate::editor::property_editor::{EditContext, MeasureContext, PropertyEditor};
use crate::metadata::items::{DropdownMetadata, ListMetadata, FOLDOUT_ANIMATION_STEP};
use crate::metadata::migration::migrate_metadata;
use crate::reflect::filters::INSPECTABLE_MEMBERS;
use crate::reflect::storage_type::{StorageType, ValueKind};
use crate::reflect::value::Value;

/// Editors every chain ends with, most specific first.
pub fn builtin_editors() -> Vec<Box<dyn PropertyEditor>> {
    vec![
        Box::new(HostReferenceEditor),
        Box::new(BoolEditor),
        Box::new(IntegerEditor),
        Box::new(FloatEditor),
        Box::new(TextEditor),
        Box::new(ListEditor),
        Box::new(MapEditor),
        Box::new(NestedObjectEditor),
    ]
}

fn read_only(label: &str, value: Value, ctx: &mut EditContext<'_>) -> Value {
    ctx.host.label(label, &value.to_string());
    value
}

/// Draws the foldout header and stores the new state.
fn foldout(label: &str, ctx: &mut EditContext<'_>) -> bool {
    let dropdown = ctx.metadata.get_item::<DropdownMetadata>();
    let expanded = ctx.host.foldout(label, dropdown.is_expanded());
    dropdown.set_expanded(expanded);
    expanded
}

/// Starts a cull zone around the children of an expanded foldout.
fn begin_children(ctx: &mut EditContext<'_>) {
    ctx.metadata.begin_cull_zone();
    ctx.metadata.get_item::<DropdownMetadata>();
    ctx.host.indent(1);
}

fn end_children(ctx: &mut EditContext<'_>) {
    ctx.host.indent(-1);
    ctx.metadata.end_cull_zone(ctx.log_evictions);
}

fn foldout_height(ctx: &mut MeasureContext<'_>, children: impl FnOnce(&mut MeasureContext<'_>) -> f32) -> f32 {
    let dropdown = ctx.metadata.get_item::<DropdownMetadata>();
    dropdown.advance(FOLDOUT_ANIMATION_STEP);
    let fraction = dropdown.visible_fraction();
    if fraction <= 0.0 {
        return FOLDOUT_HEADER_HEIGHT;
    }
    FOLDOUT_HEADER_HEIGHT + fraction * children(ctx)
}

/// Host references are shown, never edited; optional ones can be cleared.
pub struct HostReferenceEditor;

impl PropertyEditor for HostReferenceEditor {
    fn name(&self) -> &'static str {
        "host_reference"
    }

    fn can_edit(&self, storage: &StorageType) -> bool {
        storage.host_reference
    }

    fn edit(&self, label: &str, value: Value, storage: &StorageType, ctx: &mut EditContext<'_>) -> Value {
        let text = match value.as_reference() {
            Some(index) => format!("ref #{index}"),
            None => "None".to_string(),
        };
        ctx.host.label(label, &text);
        if storage.nullable && !value.is_null() && ctx.host.button(&format!("Clear {label}")) {
            return Value::Null;
        }
        value
    }
}

pub struct BoolEditor;

impl PropertyEditor for BoolEditor {
    fn name(&self) -> &'static str {
        "bool"
    }

    fn can_edit(&self, storage: &StorageType) -> bool {
        storage.kind == ValueKind::Bool
    }

    fn edit(&self, label: &str, value: Value, _storage: &StorageType, ctx: &mut EditContext<'_>) -> Value {
        match value {
            Value::Bool(b) => Value::Bool(ctx.host.toggle(label, b)),
            other => read_only(label, other, ctx),
        }
    }
}

pub struct IntegerEditor;

impl PropertyEditor for IntegerEditor {
    fn name(&self) -> &'static str {
        "integer"
    }

    fn can_edit(&self, storage: &StorageType) -> bool {
        storage.kind == ValueKind::Integer
    }

    fn edit(&self, label: &str, value: Value, _storage: &StorageType, ctx: &mut EditContext<'_>) -> Value {
        match value {
            Value::Int(i) => Value::Int(ctx.host.int_field(label, i)),
            other => read_only(label, other, ctx),
        }
    }
}

pub struct FloatEditor;

impl PropertyEditor for FloatEditor {
    fn name(&self) -> &'static str {
        "float"
    }

    fn can_edit(&self, storage: &StorageType) -> bool {
        storage.kind == ValueKind::Float
    }

    fn edit(&self, label: &str, value: Value, _storage: &StorageType, ctx: &mut EditContext<'_>) -> Value {
        match value {
            Value::Float(x) => Value::Float(ctx.host.float_field(label, x)),
            Value::Int(i) => Value::Float(ctx.host.float_field(label, i as f64)),
            other => read_only(label, other, ctx),
        }
    }
}

pub struct TextEditor;

impl PropertyEditor for TextEditor {
    fn name(&self) -> &'static str {
        "text"
    }

    fn can_edit(&self, storage: &StorageType) -> bool {
        storage.kind == ValueKind::Text
    }

    fn edit(&self, label: &str, value: Value, _storage: &StorageType, ctx: &mut EditContext<'_>) -> Value {
        match value {
            Value::Text(s) => Value::Text(ctx.host.text_field(label, &s)),
            other => read_only(label, other, ctx),
        }
    }
}

/// Vectors and arrays. Element metadata follows elements when the list is reordered.
pub struct ListEditor;

impl PropertyEditor for ListEditor {
    fn name(&self) -> &'static str {
        "list"
    }

    fn can_edit(&self, storage: &StorageType) -> bool {
        storage.kind == ValueKind::List
    }

    fn edit(&self, label: &str, value: Value, storage: &StorageType, ctx: &mut EditContext<'_>) -> Value {
        let Value::List(items) = value else {
            return read_only(label, value, ctx);
        };
        if !foldout(label, ctx) {
            return Value::List(items);
        }

        begin_children(ctx);
        let last_seen = std::mem::take(&mut ctx.metadata.get_item::<ListMetadata>().last_seen);
        if last_seen != items {
            migrate_metadata(ctx.metadata, &last_seen, &items);
        }

        let chain = ctx.chain;
        let element = storage.element.map(|element| element());
        let mut updated = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let label = format!("Element {index}");
            let item = match &element {
                Some(element) => chain.edit(&label, item, element, &mut ctx.child(index)),
                None => read_only(&label, item, ctx),
            };
            updated.push(item);
        }

        ctx.metadata.get_item::<ListMetadata>().last_seen = updated.clone();
        end_children(ctx);
        Value::List(updated)
    }

    fn height(&self, _label: &str, value: &Value, storage: &StorageType, ctx: &mut MeasureContext<'_>) -> f32 {
        let Value::List(items) = value else {
            return FIELD_HEIGHT;
        };
        let element = storage.element.map(|element| element());
        foldout_height(ctx, |ctx| {
            let chain = ctx.chain;
            items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    let height = match &element {
                        Some(element) => chain.height("", item, element, &mut ctx.child(index)),
                        None => FIELD_HEIGHT,
                    };
                    height + SPACING
                })
                .sum()
        })
    }
}

/// String keyed maps.
pub struct MapEditor;

impl PropertyEditor for MapEditor {
    fn name(&self) -> &'static str {
        "map"
    }

    fn can_edit(&self, storage: &StorageType) -> bool {
        storage.kind == ValueKind::Map
    }

    fn edit(&self, label: &str, value: Value, storage: &StorageType, ctx: &mut EditContext<'_>) -> Value {
        let Value::Map(entries) = value else {
            return read_only(label, value, ctx);
        };
        if !foldout(label, ctx) {
            return Value::Map(entries);
        }

        begin_children(ctx);
        let chain = ctx.chain;
        let element = storage.element.map(|element| element());
        let mut updated = std::collections::BTreeMap::new();
        for (key, item) in entries {
            let item = match &element {
                Some(element) => chain.edit(&key, item, element, &mut ctx.child(key.as_str())),
                None => read_only(&key, item, ctx),
            };
            updated.insert(key, item);
        }
        end_children(ctx);
        Value::Map(updated)
    }

    fn height(&self, _label: &str, value: &Value, storage: &StorageType, ctx: &mut MeasureContext<'_>) -> f32 {
        let Value::Map(entries) = value else {
            return FIELD_HEIGHT;
        };
        let element = storage.element.map(|element| element());
        foldout_height(ctx, |ctx| {
            let chain = ctx.chain;
            entries
                .iter()
                .map(|(key, item)| {
                    let height = match &element {
                        Some(element) => chain.height(key, item, element, &mut ctx.child(key.as_str())),
                        None => FIELD_HEIGHT,
                    };
                    height + SPACING
                })
                .sum()
        })
    }
}

/// Nested objects known only by value, such as list elements and
/// properties. Rows follow the member order of the nested type.
pub struct NestedObjectEditor;

impl PropertyEditor for NestedObjectEditor {
    fn name(&self) -> &'static str {
        "object"
    }

    fn can_edit(&self, storage: &StorageType) -> bool {
        storage.kind == ValueKind::Object
    }

    fn edit(&self, label: &str, value: Value, storage: &StorageType, ctx: &mut EditContext<'_>) -> Value {
        let descriptor = storage.descriptor();
        let Value::Map(mut entries) = value else {
            return read_only(label, value, ctx);
        };
        if descriptor.is_collection() || !foldout(label, ctx) {
            return Value::Map(entries);
        }

        begin_children(ctx);
        let chain = ctx.chain;
        for member in descriptor.members_matching(&INSPECTABLE_MEMBERS).iter() {
            let Some(member_storage) = member.storage() else { continue };
            let Some(current) = entries.remove(member.name()) else { continue };
            let updated = chain.edit(
                member.display_name(),
                current,
                member_storage,
                &mut ctx.child(member.name()),
            );
            entries.insert(member.name().to_string(), updated);
        }
        end_children(ctx);
        Value::Map(entries)
    }

    fn height(&self, _label: &str, value: &Value, storage: &StorageType, ctx: &mut MeasureContext<'_>) -> f32 {
        let descriptor = storage.descriptor();
        let Value::Map(entries) = value else {
            return FIELD_HEIGHT;
        };
        if descriptor.is_collection() {
            return FIELD_HEIGHT;
        }
        foldout_height(ctx, |ctx| {
            let chain = ctx.chain;
            let mut height = 0.0;
            for member in descriptor.members_matching(&INSPECTABLE_MEMBERS).iter() {
                let (Some(member_storage), Some(item)) = (member.storage(), entries.get(member.name())) else {
                    continue;
                };
                height += chain.height(member.display_name(), item, member_storage, &mut ctx.child(member.name()));
                height += SPACING;
            }
            height
        })
    }
}
