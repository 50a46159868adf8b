//! Settings persistence layer
//!
//! Loads and saves settings overrides as versioned JSON.

use crate::{SettingKey, SettingValue, SettingsRegistry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Serializable container for settings overrides
/// Uses BTreeMap for stable ordering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsOverridesData {
    /// Version of the settings format (for future migrations)
    pub version: u32,
    /// Overrides keyed by setting path
    pub overrides: BTreeMap<String, SettingValue>,
}

impl SettingsOverridesData {
    /// Current version of the settings format
    pub const CURRENT_VERSION: u32 = 1;

    /// Creates a new empty settings data
    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            overrides: BTreeMap::new(),
        }
    }

    /// Captures the overrides of a registry
    pub fn from_registry(registry: &SettingsRegistry) -> Self {
        let mut data = Self::new();
        for (key, value) in registry.export_overrides() {
            data.overrides.insert(key.as_str().to_string(), value);
        }
        data
    }

    /// Replaces the overrides of a registry with these
    pub fn apply_to(&self, registry: &mut SettingsRegistry) {
        let overrides = self
            .overrides
            .iter()
            .map(|(key, value)| (SettingKey::new(key.as_str()), value.clone()))
            .collect();
        registry.import_overrides(overrides);
    }
}

impl Default for SettingsOverridesData {
    fn default() -> Self {
        Self::new()
    }
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Errors that can occur during persistence operations
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to serialize settings: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize settings: {0}")]
    DeserializationFailed(String),

    #[error("Unsupported settings version: {0}")]
    UnsupportedVersion(u32),

    #[error("Settings file error: {0}")]
    Io(#[from] std::io::Error),
}

/// Serializes settings overrides to JSON bytes
pub fn serialize_overrides(data: &SettingsOverridesData) -> PersistenceResult<Vec<u8>> {
    serde_json::to_vec_pretty(data)
        .map_err(|e| PersistenceError::SerializationFailed(e.to_string()))
}

/// Deserializes settings overrides from JSON bytes
pub fn deserialize_overrides(bytes: &[u8]) -> PersistenceResult<SettingsOverridesData> {
    let data: SettingsOverridesData = serde_json::from_slice(bytes)
        .map_err(|e| PersistenceError::DeserializationFailed(e.to_string()))?;

    if data.version != SettingsOverridesData::CURRENT_VERSION {
        return Err(PersistenceError::UnsupportedVersion(data.version));
    }

    Ok(data)
}

/// Attempts to load settings from bytes, falling back to no overrides on error
pub fn load_overrides_safe(bytes: &[u8]) -> SettingsOverridesData {
    deserialize_overrides(bytes).unwrap_or_else(|err| {
        log::warn!("discarding stored settings: {}", err);
        SettingsOverridesData::new()
    })
}

/// Writes the overrides of a registry to a file
pub fn save_to_path(registry: &SettingsRegistry, path: &Path) -> PersistenceResult<()> {
    let bytes = serialize_overrides(&SettingsOverridesData::from_registry(registry))?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Reads overrides from a file into a registry
///
/// A missing file leaves the registry untouched.
pub fn load_from_path(registry: &mut SettingsRegistry, path: &Path) -> PersistenceResult<()> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err.into()),
    };
    deserialize_overrides(&bytes)?.apply_to(registry);
    Ok(())
}
