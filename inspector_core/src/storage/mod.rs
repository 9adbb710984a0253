pub mod inspector_config;
pub mod record_storage;

pub use inspector_config::{current_settings, InspectorSettings};
pub use record_storage::{load_record, save_record};
