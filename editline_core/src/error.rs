//! Error types

use editline_types::{LineId, WidgetHandle};
use thiserror::Error;

/// Failure reported by the host windowing layer
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolkitError {
    #[error("Widget {handle} could not be created: {reason}")]
    CreateFailed { handle: WidgetHandle, reason: String },

    #[error("Toolkit created widget {actual} where the template expects {expected}")]
    HandleMismatch {
        expected: WidgetHandle,
        actual: WidgetHandle,
    },

    #[error("No such widget: {0}")]
    NoSuchWidget(WidgetHandle),
}

/// Edit line error
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EditLineError {
    #[error("Edit line is incomplete after an earlier failed declaration")]
    Incomplete,

    #[error("Could not allocate storage for the field at column {column}")]
    Allocation { column: usize },

    #[error("Fields cannot be declared once the line has been placed")]
    SetupClosed,

    #[error("Unknown edit line: {0}")]
    UnknownLine(LineId),

    #[error("Edit line is not active: {0}")]
    NotActive(LineId),

    #[error("Toolkit error: {0}")]
    Toolkit(#[from] ToolkitError),
}

/// Edit line result
pub type EditLineResult<T> = Result<T, EditLineError>;
