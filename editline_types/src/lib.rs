//! # Edit Line Types
//!
//! Value types shared by the edit line engine, its settings and its hosts.
//!
//! ## Philosophy
//!
//! - **Events, not bytes**: Keystrokes arrive as structured events with logical key codes
//! - **Handles are opaque**: Surfaces and widgets are identified, never dereferenced
//! - **Values are exact**: Money is fixed point, dates are calendar dates
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A widget toolkit
//! - A currency or date formatting library (conversions live behind host traits)

pub mod geometry;
pub mod ids;
pub mod key;
pub mod value;

pub use geometry::{Colour, Extent};
pub use ids::{LineId, SurfaceId, WidgetHandle};
pub use key::{KeyCode, KeyEvent, KeyState, Modifiers};
pub use value::{AccountId, AccountValue, Amount, Date};
