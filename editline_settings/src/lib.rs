//! # Edit Line Settings
//!
//! A typed settings registry for the edit line engine.
//!
//! ## Philosophy
//!
//! - **Typed settings**: All settings have explicit types, not stringly-typed
//! - **Layered**: Read-only defaults + host-supplied overrides
//! - **Deterministic**: Overrides are serializable with stable ordering
//!
//! ## Example
//!
//! ```ignore
//! use editline_settings::{create_default_registry, keys, EditLineConfig, SettingValue};
//!
//! let mut registry = create_default_registry();
//! registry.set_override(keys::ALLOW_LINE_DELETE, SettingValue::Boolean(false));
//!
//! let config = EditLineConfig::from_registry(&registry);
//! assert!(!config.allow_line_delete);
//! ```

pub mod config;
pub mod persistence;

pub use config::EditLineConfig;
pub use persistence::{PersistenceError, PersistenceResult, SettingsOverridesData};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Setting key (path-like identifier)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SettingKey(String);

impl SettingKey {
    /// Creates a new setting key
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks if this key starts with the given prefix
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SettingKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Setting value (strongly typed)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettingValue {
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Integer(i64),
    /// String value
    String(String),
}

impl SettingValue {
    /// Tries to get as boolean
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            SettingValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Tries to get as integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            SettingValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Tries to get as string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            SettingValue::String(v) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Returns true if both values have the same variant
    pub fn same_type(&self, other: &SettingValue) -> bool {
        core::mem::discriminant(self) == core::mem::discriminant(other)
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Boolean(v) => write!(f, "{}", v),
            SettingValue::Integer(v) => write!(f, "{}", v),
            SettingValue::String(v) => write!(f, "{}", v),
        }
    }
}

/// Settings registry
#[derive(Debug, Clone, Default)]
pub struct SettingsRegistry {
    /// Default settings (read-only)
    defaults: BTreeMap<SettingKey, SettingValue>,
    /// Host overrides
    overrides: BTreeMap<SettingKey, SettingValue>,
}

impl SettingsRegistry {
    /// Creates a new, empty settings registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a default setting
    pub fn register_default(&mut self, key: impl Into<SettingKey>, value: SettingValue) {
        self.defaults.insert(key.into(), value);
    }

    /// Sets an override
    ///
    /// An override whose type disagrees with the registered default is ignored
    /// and `false` is returned.
    pub fn set_override(&mut self, key: impl Into<SettingKey>, value: SettingValue) -> bool {
        let key = key.into();
        if let Some(default) = self.defaults.get(&key) {
            if !default.same_type(&value) {
                log::warn!("ignoring {} override for {}: wrong type", value, key);
                return false;
            }
        }
        self.overrides.insert(key, value);
        true
    }

    /// Removes an override, restoring the default
    pub fn remove_override(&mut self, key: &SettingKey) -> bool {
        self.overrides.remove(key).is_some()
    }

    /// Gets the effective setting value (override or default)
    pub fn get(&self, key: &SettingKey) -> Option<&SettingValue> {
        self.overrides.get(key).or_else(|| self.defaults.get(key))
    }

    /// Gets the default value for a setting
    pub fn get_default(&self, key: &SettingKey) -> Option<&SettingValue> {
        self.defaults.get(key)
    }

    /// Effective boolean value of a key
    pub fn get_boolean(&self, key: &str) -> Option<bool> {
        self.get(&SettingKey::new(key)).and_then(SettingValue::as_boolean)
    }

    /// Effective string value of a key
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.get(&SettingKey::new(key)).and_then(SettingValue::as_string)
    }

    /// Returns all default setting keys
    pub fn list_defaults(&self) -> Vec<SettingKey> {
        self.defaults.keys().cloned().collect()
    }

    /// Exports all overrides for persistence
    pub fn export_overrides(&self) -> BTreeMap<SettingKey, SettingValue> {
        self.overrides.clone()
    }

    /// Imports overrides (replaces existing overrides)
    pub fn import_overrides(&mut self, overrides: BTreeMap<SettingKey, SettingValue>) {
        self.overrides.clear();
        for (key, value) in overrides {
            self.set_override(key, value);
        }
    }

    /// Clears all overrides
    pub fn clear_overrides(&mut self) {
        self.overrides.clear();
    }
}

/// Setting keys read by the edit line
pub mod keys {
    /// Whether Ctrl-F10 may clear every field of the edited row
    pub const ALLOW_LINE_DELETE: &str = "editline.allow_line_delete";
    /// Modifier that, held while moving forward, copies the field above
    pub const COPY_DOWN_MODIFIER: &str = "editline.copy_down_modifier";
    /// Whether Return invites the host to re-sort its view
    pub const AUTO_SORT_ON_RETURN: &str = "editline.auto_sort_on_return";
}

/// Creates a settings registry with default settings
pub fn create_default_registry() -> SettingsRegistry {
    let mut registry = SettingsRegistry::new();

    registry.register_default(keys::ALLOW_LINE_DELETE, SettingValue::Boolean(true));
    registry.register_default(
        keys::COPY_DOWN_MODIFIER,
        SettingValue::String("ctrl".to_string()),
    );
    registry.register_default(keys::AUTO_SORT_ON_RETURN, SettingValue::Boolean(true));

    registry
}
