//! Identifiers for surfaces, widgets and edit lines

use core::fmt;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a host surface (the window a grid is drawn in)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceId(Uuid);

impl SurfaceId {
    /// Creates a new unique surface ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a SurfaceId from an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID value
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SurfaceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface:{}", self.0)
    }
}

/// Unique identifier for an edit line instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineId(Uuid);

impl LineId {
    /// Creates a new unique line ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID value
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for LineId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line:{}", self.0)
    }
}

/// Toolkit handle of an on-screen input widget
///
/// Handles are allocated by the host's surface template, so an edit line
/// knows every handle before any widget exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WidgetHandle(pub u32);

impl WidgetHandle {
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for WidgetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
