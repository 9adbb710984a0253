pub mod editors;
pub mod field_name;
pub mod host;
pub mod object_editor;
pub mod property_editor;
pub mod text_host;

pub use field_name::parse_field_name;
pub use host::EditorHost;
pub use object_editor::{EditOutcome, ObjectEditor};
pub use property_editor::{
    EditContext, MeasureContext, PropertyEditor, PropertyEditorChain, PropertyEditorRegistration,
};
pub use text_host::TextHost;
