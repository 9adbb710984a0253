// inspector_core/src/editor/text_host.rs
use crate::editor::host::EditorHost;
use crate::reflect::value::Value;
use std::collections::{HashMap, HashSet};

/// Headless host that renders every row as a line of text.
///
/// Scripted input can be queued per label with `respond` and `press`; each
/// response is consumed by the first widget with that label.
#[derive(Debug, Default)]
pub struct TextHost {
    lines: Vec<String>,
    depth: usize,
    responses: HashMap<String, Value>,
    presses: HashSet<String>,
}

impl TextHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next widget labelled `label` return `value`.
    pub fn respond(mut self, label: impl Into<String>, value: Value) -> Self {
        self.responses.insert(label.into(), value);
        self
    }

    /// Makes the next button labelled `label` report a click.
    pub fn press(mut self, label: impl Into<String>) -> Self {
        self.presses.insert(label.into());
        self
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }

    /// Drops rendered lines, keeping pending responses.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.depth = 0;
    }

    fn push(&mut self, line: String) {
        self.lines.push(format!("{}{line}", "  ".repeat(self.depth)));
    }
}

impl EditorHost for TextHost {
    fn label(&mut self, label: &str, text: &str) {
        self.push(format!("{label}: {text}"));
    }

    fn toggle(&mut self, label: &str, value: bool) -> bool {
        let value = match self.responses.remove(label) {
            Some(Value::Bool(b)) => b,
            _ => value,
        };
        self.push(format!("{label}: [{}]", if value { "x" } else { " " }));
        value
    }

    fn int_field(&mut self, label: &str, value: i64) -> i64 {
        let value = match self.responses.remove(label) {
            Some(Value::Int(i)) => i,
            _ => value,
        };
        self.push(format!("{label}: {value}"));
        value
    }

    fn float_field(&mut self, label: &str, value: f64) -> f64 {
        let value = match self.responses.remove(label) {
            Some(Value::Float(x)) => x,
            Some(Value::Int(i)) => i as f64,
            _ => value,
        };
        self.push(format!("{label}: {value}"));
        value
    }

    fn text_field(&mut self, label: &str, value: &str) -> String {
        let value = match self.responses.remove(label) {
            Some(Value::Text(s)) => s,
            _ => value.to_string(),
        };
        self.push(format!("{label}: {value:?}"));
        value
    }

    fn foldout(&mut self, label: &str, expanded: bool) -> bool {
        let expanded = match self.responses.remove(label) {
            Some(Value::Bool(b)) => b,
            _ => expanded,
        };
        self.push(format!("{} {label}", if expanded { "-" } else { "+" }));
        expanded
    }

    fn button(&mut self, label: &str) -> bool {
        self.push(format!("[{label}]"));
        self.presses.remove(label)
    }

    fn indent(&mut self, delta: i32) {
        self.depth = self.depth.saturating_add_signed(delta as isize);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn responses_are_consumed_once() {
        let mut host = TextHost::new()
            .respond("Speed", Value::Float(2.5))
            .press("Reset");

        assert_eq!(host.float_field("Speed", 1.0), 2.5);
        assert_eq!(host.float_field("Speed", 1.0), 1.0);
        assert!(host.button("Reset"));
        assert!(!host.button("Reset"));

        host.indent(1);
        host.label("Name", "orc");
        host.indent(-1);
        assert_eq!(
            host.render(),
            "Speed: 2.5\nSpeed: 1\n[Reset]\n[Reset]\n  Name: orc"
        );
    }
}
