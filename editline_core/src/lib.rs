//! # Edit Line Core
//!
//! The in-place, multi-field edit line that overlays one row of a host's
//! scrollable transaction grid.
//!
//! ## Philosophy
//!
//! - **One live line**: At most one line in a session owns live widgets
//! - **Host owns the data**: Values flow to and from the client through callbacks only
//! - **Change-driven**: A value is sent to the client only when it actually changed
//! - **Bounded reentrancy**: Two transfer blocks per line, never more
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A widget toolkit (widgets are created through the [`Toolkit`] trait)
//! - A transaction validator
//! - A currency, date or account formatter (see [`Converters`])
//!
//! ## Design
//!
//! - [`EditSession`]: owns every line, the toolkit and the single active-line slot
//! - [`FieldSpec`]: per-kind declaration of a field and its icons
//! - [`TransferPool`]: the two reusable blocks carried through client callbacks
//! - [`EditLineClient`]: the callback set a grid implements

pub mod client;
pub mod convert;
mod editors;
pub mod error;
pub mod field;
pub mod geometry;
mod line;
pub mod navigate;
pub mod router;
pub mod session;
pub mod snapshot;
pub mod toolkit;
pub mod transfer;

pub use client::{EditLineClient, FakeClient, FakeGrid, ScrollAlign};
pub use convert::{AccountDirection, AccountLookup, Converters, SimpleConverters};
pub use error::{EditLineError, ToolkitError};
pub use field::{Field, FieldCache, FieldSpec, FieldType, Icon, IconRole, IconSpec};
pub use geometry::{ColumnLayout, FixedColumns};
pub use router::{KeyOutcome, KeyPress};
pub use session::{EditSession, IconFilter, LineTarget, RowTarget, SessionEvent, AUDIT_TRAIL_LIMIT};
pub use snapshot::LineSnapshot;
pub use toolkit::{Caret, FakeToolkit, Toolkit, WidgetTemplate};
pub use transfer::{TransferBlock, TransferPool, TransferValue, TRANSFER_POOL_SIZE};

pub use editline_settings::EditLineConfig;
pub use editline_types::{
    AccountId, AccountValue, Amount, Colour, Date, Extent, KeyCode, KeyEvent, LineId, Modifiers,
    SurfaceId, WidgetHandle,
};
