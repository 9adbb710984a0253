// inspector_core/src/editor/object_editor.rs
use crate::constants::*;
use crate::editor::host::EditorHost;
use crate::editor::property_editor::{EditContext, MeasureContext, PropertyEditorChain};
use crate::inspector_error;
use crate::metadata::graph_metadata::MetadataNode;
use crate::metadata::items::{DropdownMetadata, FOLDOUT_ANIMATION_STEP};
use crate::reflect::filters::{BUTTON_MEMBERS, INSPECTABLE_MEMBERS};
use crate::reflect::object::instantiate_object_references;
use crate::reflect::reflect_field::Reflect;
use crate::reflect::storage_type::ValueKind;
use crate::serialization::cycle::{CycleDetector, Pass};
use crate::serialization::reference::ListReferenceOperator;
use crate::storage::inspector_config::InspectorSettings;

/// What an edit pass did to the object. Member names of nested objects
/// are dotted paths, e.g. `stats.hp`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EditOutcome {
    pub changed: Vec<String>,
    pub invoked: Vec<String>,
    pub errors: Vec<String>,
    /// Null nested objects were created before drawing.
    pub instantiated: bool,
}

impl EditOutcome {
    pub fn is_changed(&self) -> bool {
        !self.changed.is_empty() || !self.invoked.is_empty() || self.instantiated
    }
}

/// Draws every inspectable member of an object through a property editor chain.
///
/// The three passes share one `CycleDetector`, so a self referential type
/// stops recursing at the same depth in all of them.
pub struct ObjectEditor {
    chain: PropertyEditorChain,
    auto_instantiate: bool,
    log_evictions: bool,
}

impl Default for ObjectEditor {
    fn default() -> Self {
        Self::new(PropertyEditorChain::default())
    }
}

fn qualify(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}

impl ObjectEditor {
    pub fn new(chain: PropertyEditorChain) -> Self {
        Self {
            chain,
            auto_instantiate: false,
            log_evictions: false,
        }
    }

    pub fn from_settings(settings: &InspectorSettings) -> Self {
        Self {
            chain: PropertyEditorChain::with_registered(),
            auto_instantiate: settings.auto_instantiate_references,
            log_evictions: settings.log_metadata_evictions,
        }
    }

    /// Create null nested objects before each pass.
    pub fn with_auto_instantiate(mut self, auto_instantiate: bool) -> Self {
        self.auto_instantiate = auto_instantiate;
        self
    }

    pub fn with_eviction_logging(mut self, log_evictions: bool) -> Self {
        self.log_evictions = log_evictions;
        self
    }

    pub fn chain(&self) -> &PropertyEditorChain {
        &self.chain
    }

    /// Draws `object` and writes back every value the user changed.
    ///
    /// Metadata of members that were not drawn this pass is evicted.
    pub fn edit(
        &self,
        object: &mut dyn Reflect,
        host: &mut dyn EditorHost,
        metadata: &mut MetadataNode,
        detector: &mut CycleDetector,
    ) -> EditOutcome {
        let previous = detector.set_pass(Pass::Edit);
        let mut outcome = EditOutcome::default();
        if self.auto_instantiate {
            outcome.instantiated = instantiate_object_references(object, detector);
        }
        self.edit_members(object, host, metadata, detector, "", &mut outcome);
        detector.set_pass(previous);
        outcome
    }

    fn edit_members(
        &self,
        object: &mut dyn Reflect,
        host: &mut dyn EditorHost,
        metadata: &mut MetadataNode,
        detector: &mut CycleDetector,
        path: &str,
        outcome: &mut EditOutcome,
    ) {
        metadata.begin_cull_zone();
        // The foldout of a nested object lives on its own node.
        metadata.try_get_item::<DropdownMetadata>();

        let descriptor = object.descriptor();
        let mut references = Vec::new();
        for member in descriptor.members_matching(&INSPECTABLE_MEMBERS).iter() {
            let Some(storage) = member.storage() else { continue };
            let qualified = qualify(path, member.name());
            let node = metadata.enter(member.name());

            if storage.kind == ValueKind::Object {
                if let Some(nested) = member.nested_mut(object.as_any_mut()) {
                    self.edit_nested(member.display_name(), nested, host, node, detector, &qualified, outcome);
                    continue;
                }
            }

            let mut refs = ListReferenceOperator::new(&mut references);
            let current = match member.read(object.as_any(), &mut refs) {
                Ok(value) => value,
                Err(e) => {
                    inspector_error!("Failed to read `{qualified}`: {e}");
                    outcome.errors.push(qualified);
                    continue;
                }
            };

            let mut ctx = EditContext {
                host: &mut *host,
                metadata: node,
                chain: &self.chain,
                log_evictions: self.log_evictions,
            };
            let updated = self.chain.edit(member.display_name(), current.clone(), storage, &mut ctx);
            if updated == current || !member.can_write() {
                continue;
            }

            match member.write(object.as_any_mut(), updated, &mut refs) {
                Ok(()) => outcome.changed.push(qualified),
                Err(e) => {
                    inspector_error!("Failed to write `{qualified}`: {e}");
                    outcome.errors.push(qualified);
                }
            }
        }

        for member in descriptor.members_matching(&BUTTON_MEMBERS).iter() {
            if !host.button(member.display_name()) {
                continue;
            }
            let qualified = qualify(path, member.name());
            match member.invoke(object.as_any_mut()) {
                Ok(()) => outcome.invoked.push(qualified),
                Err(e) => {
                    inspector_error!("Failed to invoke `{qualified}`: {e}");
                    outcome.errors.push(qualified);
                }
            }
        }

        metadata.end_cull_zone(self.log_evictions);
    }

    #[allow(clippy::too_many_arguments)]
    fn edit_nested(
        &self,
        label: &str,
        nested: &mut dyn Reflect,
        host: &mut dyn EditorHost,
        node: &mut MetadataNode,
        detector: &mut CycleDetector,
        path: &str,
        outcome: &mut EditOutcome,
    ) {
        let dropdown = node.get_item::<DropdownMetadata>();
        let expanded = host.foldout(label, dropdown.is_expanded());
        dropdown.set_expanded(expanded);
        if !expanded {
            return;
        }

        host.indent(1);
        if detector.try_enter() {
            self.edit_members(nested, host, node, detector, path, outcome);
            detector.exit();
        } else {
            host.label(label, "...");
        }
        host.indent(-1);
    }

    /// Total height of the rows `edit` would draw.
    pub fn measure(&self, object: &mut dyn Reflect, metadata: &mut MetadataNode, detector: &mut CycleDetector) -> f32 {
        let previous = detector.set_pass(Pass::Measure);
        if self.auto_instantiate {
            instantiate_object_references(object, detector);
        }
        let height = TOP_PADDING + self.measure_members(object, metadata, detector);
        detector.set_pass(previous);
        height
    }

    fn measure_members(&self, object: &mut dyn Reflect, metadata: &mut MetadataNode, detector: &mut CycleDetector) -> f32 {
        let descriptor = object.descriptor();
        let mut references = Vec::new();
        let mut height = 0.0;

        for member in descriptor.members_matching(&INSPECTABLE_MEMBERS).iter() {
            let Some(storage) = member.storage() else { continue };
            let node = metadata.enter(member.name());

            if storage.kind == ValueKind::Object {
                if let Some(nested) = member.nested_mut(object.as_any_mut()) {
                    height += self.measure_nested(nested, node, detector) + SPACING;
                    continue;
                }
            }

            let mut refs = ListReferenceOperator::new(&mut references);
            height += match member.read(object.as_any(), &mut refs) {
                Ok(value) => {
                    let mut ctx = MeasureContext {
                        metadata: node,
                        chain: &self.chain,
                    };
                    self.chain.height(member.display_name(), &value, storage, &mut ctx)
                }
                Err(_) => FIELD_HEIGHT,
            };
            height += SPACING;
        }

        let buttons = descriptor.members_matching(&BUTTON_MEMBERS).len();
        height + buttons as f32 * (BUTTON_HEIGHT + SPACING)
    }

    fn measure_nested(&self, nested: &mut dyn Reflect, node: &mut MetadataNode, detector: &mut CycleDetector) -> f32 {
        let dropdown = node.get_item::<DropdownMetadata>();
        dropdown.advance(FOLDOUT_ANIMATION_STEP);
        let fraction = dropdown.visible_fraction();
        if fraction <= 0.0 {
            return FOLDOUT_HEADER_HEIGHT;
        }
        if !detector.try_enter() {
            return FOLDOUT_HEADER_HEIGHT + fraction * FIELD_HEIGHT;
        }
        let content = self.measure_members(nested, node, detector);
        detector.exit();
        FOLDOUT_HEADER_HEIGHT + fraction * content
    }

    /// Gives every editor a chance to draw scene overlays.
    pub fn scene(
        &self,
        object: &mut dyn Reflect,
        host: &mut dyn EditorHost,
        metadata: &mut MetadataNode,
        detector: &mut CycleDetector,
    ) {
        let previous = detector.set_pass(Pass::Scene);
        self.scene_members(object, host, metadata, detector);
        detector.set_pass(previous);
    }

    fn scene_members(
        &self,
        object: &mut dyn Reflect,
        host: &mut dyn EditorHost,
        metadata: &mut MetadataNode,
        detector: &mut CycleDetector,
    ) {
        let descriptor = object.descriptor();
        let mut references = Vec::new();

        for member in descriptor.members_matching(&INSPECTABLE_MEMBERS).iter() {
            let Some(storage) = member.storage() else { continue };
            let node = metadata.enter(member.name());

            if storage.kind == ValueKind::Object {
                if let Some(nested) = member.nested_mut(object.as_any_mut()) {
                    if detector.try_enter() {
                        self.scene_members(nested, host, node, detector);
                        detector.exit();
                    }
                    continue;
                }
            }

            let mut refs = ListReferenceOperator::new(&mut references);
            if let Ok(value) = member.read(object.as_any(), &mut refs) {
                let mut ctx = EditContext {
                    host: &mut *host,
                    metadata: node,
                    chain: &self.chain,
                    log_evictions: self.log_evictions,
                };
                self.chain.on_scene(member.display_name(), &value, storage, &mut ctx);
            }
        }
    }
}
