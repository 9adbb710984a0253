// inspector_core/src/storage/record_storage.rs
use crate::error::{InspectorError, Result};
use crate::inspector_info;
use crate::serialization::record::SerializedRecord;
use ron::ser::{to_string_pretty, PrettyConfig};
use std::fs;
use std::path::Path;

/// Writes the keys and values of `record` to a .ron file.
///
/// Host references are not written; the host persists them itself.
pub fn save_record(path: &Path, record: &SerializedRecord) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let ron = to_string_pretty(record, PrettyConfig::default())
        .map_err(|e| InspectorError::Serialize(e.to_string()))?;
    fs::write(path, ron)?;
    inspector_info!("Saved record to {}.", path.display());
    Ok(())
}

/// Reads a record written by [`save_record`]. The reference list comes back empty.
pub fn load_record(path: &Path) -> Result<SerializedRecord> {
    let txt = fs::read_to_string(path)?;
    ron::from_str(&txt).map_err(|e| InspectorError::Deserialize(e.to_string()))
}
