//! Client callbacks
//!
//! The grid that hosts an edit line owns the data. The engine reads and
//! writes values, asks for rows to be validated and hands placement decisions
//! back to the host, all through [`EditLineClient`]. Every callback defaults
//! to "not supported" so a host implements only what it needs.

pub mod fake;

pub use fake::{FakeClient, FakeGrid, FindRecord, PutRecord};

use crate::transfer::TransferBlock;
use editline_types::{KeyEvent, WidgetHandle};
use serde::{Deserialize, Serialize};

/// Where the host should scroll a field into view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScrollAlign {
    Left,
    Right,
}

/// Callbacks a grid implements for its edit line
pub trait EditLineClient {
    /// Fills `block` with the value of its field on its row
    ///
    /// Returning false leaves the field at its empty default.
    fn get_field(&mut self, _block: &mut TransferBlock) -> bool {
        false
    }

    /// Completes the partial text in `block`
    fn auto_complete(&mut self, _block: &mut TransferBlock) -> bool {
        false
    }

    /// Stores the value in `block`
    fn put_field(&mut self, _block: &TransferBlock) -> bool {
        false
    }

    /// Returns true if `row` holds data the line may show
    fn test_line(&mut self, _row: usize) -> bool {
        false
    }

    /// Asks the host to move the line to `row`
    ///
    /// The host may clamp or extend its grid; it returns the row the line
    /// should be placed on, or `None` to refuse.
    fn place_line(&mut self, _row: usize) -> Option<usize> {
        None
    }

    /// Scrolls the horizontal range of a field into view
    fn find_field(&mut self, _row: usize, _x_min: i32, _x_max: i32, _align: ScrollAlign) -> bool {
        false
    }

    /// First row with no data
    fn first_blank_line(&mut self) -> Option<usize> {
        None
    }

    /// Re-sorts the grid after the field under `handle` changed
    fn auto_sort(&mut self, _handle: WidgetHandle) -> bool {
        false
    }

    /// Applies the preset bound to `key` on `row`
    fn insert_preset(&mut self, _row: usize, _key: &KeyEvent) -> bool {
        false
    }
}
