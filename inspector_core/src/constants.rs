// inspector_core/src/constants.rs

/// Maximum nesting depth for automatic instantiation of null references.
pub const DEFAULT_MAX_INSTANTIATION_DEPTH: usize = 5;

/// Order assigned to members without an explicit `order` annotation.
pub const DEFAULT_MEMBER_ORDER: f64 = f64::MAX;

/// Key used inside a `Value::Map` to encode an object reference.
pub const REFERENCE_KEY: &str = "$ref";

/// Name of the serializer used when the settings do not name one.
pub const DEFAULT_SERIALIZER: &str = "json";

/// File name of the persisted inspector settings.
pub const SETTINGS_RON: &str = "inspector_settings.ron";

/// Base name of the rotated log files.
pub const LOG_BASENAME: &str = "inspector";

// Layout used by the measure pass.
pub const TOP_PADDING: f32 = 10.0;
pub const FIELD_HEIGHT: f32 = 30.0;
pub const SPACING: f32 = 5.0;
pub const FOLDOUT_HEADER_HEIGHT: f32 = 24.0;
pub const BUTTON_HEIGHT: f32 = 24.0;
