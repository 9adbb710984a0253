// inspector_core/src/metadata/items.rs
use crate::metadata::graph_metadata::MetadataItem;
use crate::reflect::value::Value;

/// Fraction of the foldout animation advanced per measure pass.
pub const FOLDOUT_ANIMATION_STEP: f32 = 0.25;

/// Foldout state of a collapsible editor.
#[derive(Debug, Clone, PartialEq)]
pub struct DropdownMetadata {
    expanded: bool,
    /// 0.0 when fully collapsed, 1.0 when fully expanded.
    progress: f32,
}

impl Default for DropdownMetadata {
    // Foldouts start opened.
    fn default() -> Self {
        Self {
            expanded: true,
            progress: 1.0,
        }
    }
}

impl MetadataItem for DropdownMetadata {}

impl DropdownMetadata {
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded;
    }

    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
    }

    pub fn is_animating(&self) -> bool {
        self.progress != self.target()
    }

    /// Moves the animation one step toward the current state.
    pub fn advance(&mut self, step: f32) {
        let target = self.target();
        self.progress = if self.progress < target {
            (self.progress + step).min(target)
        } else {
            (self.progress - step).max(target)
        };
    }

    /// Share of the content height currently visible.
    pub fn visible_fraction(&self) -> f32 {
        self.progress
    }

    fn target(&self) -> f32 {
        if self.expanded { 1.0 } else { 0.0 }
    }
}

/// Element values seen the last time a list was drawn, used to migrate
/// per-element metadata when the list is reordered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListMetadata {
    pub last_seen: Vec<Value>,
}

impl MetadataItem for ListMetadata {}
