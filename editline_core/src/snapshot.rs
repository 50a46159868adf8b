//! Serializable view of a line's state
//!
//! Hosts use snapshots for diagnostics and tests assert against them.

use crate::field::{FieldCache, FieldType};
use crate::line::EditLine;
use editline_types::{Colour, LineId, WidgetHandle};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconSnapshot {
    pub handle: WidgetHandle,
    pub column: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSnapshot {
    pub field_type: FieldType,
    pub column: usize,
    pub cache: FieldCache,
    pub icons: Vec<IconSnapshot>,
}

/// State of one edit line at a point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSnapshot {
    pub line: LineId,
    pub active: bool,
    pub complete: bool,
    pub row: Option<usize>,
    pub colour: Colour,
    pub fields: Vec<FieldSnapshot>,
}

impl LineSnapshot {
    pub(crate) fn capture(line: &EditLine, active: bool) -> Self {
        let fields = line
            .fields()
            .iter()
            .map(|field| FieldSnapshot {
                field_type: field.field_type(),
                column: field.column(),
                cache: field.cache().clone(),
                icons: field
                    .icons()
                    .iter()
                    .map(|icon| IconSnapshot {
                        handle: icon.handle(),
                        column: icon.column(),
                        text: icon.text().to_string(),
                    })
                    .collect(),
            })
            .collect();
        Self {
            line: line.id(),
            active,
            complete: line.is_complete(),
            row: line.row(),
            colour: line.colour(),
            fields,
        }
    }

    /// Handles of every icon, in declaration order
    pub fn handles(&self) -> Vec<WidgetHandle> {
        self.fields
            .iter()
            .flat_map(|field| field.icons.iter().map(|icon| icon.handle))
            .collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
