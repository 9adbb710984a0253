// inspector_core/src/editor/host.rs

/// Widgets the host GUI provides to property editors.
///
/// Each input widget receives the current value and returns the value
/// after user interaction, unchanged when the user did nothing.
pub trait EditorHost {
    /// Read-only row.
    fn label(&mut self, label: &str, text: &str);

    fn toggle(&mut self, label: &str, value: bool) -> bool;

    fn int_field(&mut self, label: &str, value: i64) -> i64;

    fn float_field(&mut self, label: &str, value: f64) -> f64;

    fn text_field(&mut self, label: &str, value: &str) -> String;

    /// Collapsible header. Returns the new expanded state.
    fn foldout(&mut self, label: &str, expanded: bool) -> bool;

    /// Returns `true` when clicked.
    fn button(&mut self, label: &str) -> bool;

    /// Shifts following rows right (positive) or back left (negative).
    fn indent(&mut self, delta: i32);
}
