//! Typed configuration consumed by the edit line engine

use crate::{keys, SettingsRegistry};
use editline_types::Modifiers;
use serde::{Deserialize, Serialize};

/// Edit line behaviour switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditLineConfig {
    /// Ctrl-F10 clears every field of the edited row
    pub allow_line_delete: bool,
    /// Held while moving forward, copies the same field from the row above
    pub copy_down_modifier: Modifiers,
    /// Return invites the host to re-sort its view
    pub auto_sort_on_return: bool,
}

impl EditLineConfig {
    /// Reads the effective configuration from a registry
    ///
    /// Keys that are missing or unreadable keep their default.
    pub fn from_registry(registry: &SettingsRegistry) -> Self {
        let defaults = Self::default();

        let copy_down_modifier = match registry.get_string(keys::COPY_DOWN_MODIFIER) {
            Some(name) => Modifiers::from_name(name).unwrap_or_else(|| {
                log::warn!("unknown copy-down modifier {:?}, using default", name);
                defaults.copy_down_modifier
            }),
            None => defaults.copy_down_modifier,
        };

        Self {
            allow_line_delete: registry
                .get_boolean(keys::ALLOW_LINE_DELETE)
                .unwrap_or(defaults.allow_line_delete),
            copy_down_modifier,
            auto_sort_on_return: registry
                .get_boolean(keys::AUTO_SORT_ON_RETURN)
                .unwrap_or(defaults.auto_sort_on_return),
        }
    }
}

impl Default for EditLineConfig {
    fn default() -> Self {
        Self {
            allow_line_delete: true,
            copy_down_modifier: Modifiers::CTRL,
            auto_sort_on_return: true,
        }
    }
}
