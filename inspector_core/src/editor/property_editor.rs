// inspector_core/src/editor/property_editor.rs
use crate::constants::FIELD_HEIGHT;
use crate::editor::editors::builtin_editors;
use crate::editor::host::EditorHost;
use crate::metadata::graph_metadata::{MetadataKey, MetadataNode};
use crate::reflect::storage_type::StorageType;
use crate::reflect::value::Value;
use crate::inspector_debug;
use once_cell::sync::Lazy;

/// Everything an editor needs while drawing one value.
pub struct EditContext<'a> {
    pub host: &'a mut dyn EditorHost,
    /// Metadata node of the value being edited.
    pub metadata: &'a mut MetadataNode,
    pub chain: &'a PropertyEditorChain,
    pub log_evictions: bool,
}

impl EditContext<'_> {
    /// Context for a nested value stored under `key`.
    pub fn child(&mut self, key: impl Into<MetadataKey>) -> EditContext<'_> {
        EditContext {
            host: &mut *self.host,
            metadata: self.metadata.enter(key),
            chain: self.chain,
            log_evictions: self.log_evictions,
        }
    }
}

/// Context of the measure pass, which has no host.
pub struct MeasureContext<'a> {
    pub metadata: &'a mut MetadataNode,
    pub chain: &'a PropertyEditorChain,
}

impl MeasureContext<'_> {
    pub fn child(&mut self, key: impl Into<MetadataKey>) -> MeasureContext<'_> {
        MeasureContext {
            metadata: self.metadata.enter(key),
            chain: self.chain,
        }
    }
}

/// Draws and edits values of the storage types it accepts.
pub trait PropertyEditor: Send + Sync {
    fn name(&self) -> &'static str;

    fn can_edit(&self, storage: &StorageType) -> bool;

    /// Draws `value` and returns it after user interaction.
    fn edit(&self, label: &str, value: Value, storage: &StorageType, ctx: &mut EditContext<'_>) -> Value;

    /// Height the editor will take for `value`.
    fn height(&self, _label: &str, _value: &Value, _storage: &StorageType, _ctx: &mut MeasureContext<'_>) -> f32 {
        FIELD_HEIGHT
    }

    /// Scene overlay, e.g. gizmos. Nothing by default.
    fn on_scene(&self, _label: &str, _value: &Value, _storage: &StorageType, _ctx: &mut EditContext<'_>) {}
}

/// One entry per editor contributed through `inventory`.
///
/// Higher priorities are asked first; all registered editors come before
/// the built-in ones.
pub struct PropertyEditorRegistration {
    pub name: &'static str,
    pub priority: i32,
    pub factory: fn() -> Box<dyn PropertyEditor>,
}

inventory::collect!(PropertyEditorRegistration);

pub static REGISTERED_EDITORS: Lazy<Vec<&'static PropertyEditorRegistration>> = Lazy::new(|| {
    let mut editors: Vec<_> = inventory::iter::<PropertyEditorRegistration>.into_iter().collect();
    editors.sort_by(|a, b| b.priority.cmp(&a.priority));
    editors
});

/// Ordered list of editors. The first one that accepts a storage type wins.
pub struct PropertyEditorChain {
    editors: Vec<Box<dyn PropertyEditor>>,
}

impl Default for PropertyEditorChain {
    fn default() -> Self {
        Self::with_registered()
    }
}

impl PropertyEditorChain {
    pub fn empty() -> Self {
        Self { editors: Vec::new() }
    }

    /// Built-in editors only.
    pub fn builtin() -> Self {
        Self { editors: builtin_editors() }
    }

    /// Registered editors by priority, followed by the built-in ones.
    pub fn with_registered() -> Self {
        let mut editors: Vec<Box<dyn PropertyEditor>> =
            REGISTERED_EDITORS.iter().map(|entry| (entry.factory)()).collect();
        editors.extend(builtin_editors());
        Self { editors }
    }

    /// Puts `editor` in front of every editor already in the chain.
    pub fn with_editor(mut self, editor: Box<dyn PropertyEditor>) -> Self {
        self.editors.insert(0, editor);
        self
    }

    /// Appends `editor` after every editor already in the chain.
    pub fn push(&mut self, editor: Box<dyn PropertyEditor>) {
        self.editors.push(editor);
    }

    pub fn editor_for(&self, storage: &StorageType) -> Option<&dyn PropertyEditor> {
        self.editors
            .iter()
            .find(|editor| editor.can_edit(storage))
            .map(|editor| editor.as_ref())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.editors.iter().map(|editor| editor.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.editors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.editors.is_empty()
    }

    /// Edits `value` with the first matching editor. Null optional values
    /// and values nobody can edit are shown read-only.
    pub fn edit(&self, label: &str, value: Value, storage: &StorageType, ctx: &mut EditContext<'_>) -> Value {
        if value.is_null() && storage.nullable && !storage.host_reference {
            ctx.host.label(label, "null");
            return value;
        }
        match self.editor_for(storage) {
            Some(editor) => editor.edit(label, value, storage, ctx),
            None => {
                inspector_debug!("No editor for {} ({}), drawing read-only", storage.type_name, storage.kind);
                ctx.host.label(label, &value.to_string());
                value
            }
        }
    }

    pub fn height(&self, label: &str, value: &Value, storage: &StorageType, ctx: &mut MeasureContext<'_>) -> f32 {
        if value.is_null() && storage.nullable && !storage.host_reference {
            return FIELD_HEIGHT;
        }
        match self.editor_for(storage) {
            Some(editor) => editor.height(label, value, storage, ctx),
            None => FIELD_HEIGHT,
        }
    }

    pub fn on_scene(&self, label: &str, value: &Value, storage: &StorageType, ctx: &mut EditContext<'_>) {
        if let Some(editor) = self.editor_for(storage) {
            editor.on_scene(label, value, storage, ctx);
        }
    }
}
