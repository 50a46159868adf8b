//! Fake client implementation for testing
//!
//! A grid of values keyed by row and primary icon. The grid lives behind a
//! shared handle so a test keeps access to it while the edit line owns the
//! client.

use super::{EditLineClient, ScrollAlign};
use crate::transfer::{TransferBlock, TransferValue};
use editline_types::{KeyEvent, WidgetHandle};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A recorded Put
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutRecord {
    pub row: usize,
    pub field: WidgetHandle,
    pub value: TransferValue,
    pub key: Option<KeyEvent>,
}

/// A recorded scroll request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindRecord {
    pub row: usize,
    pub x_min: i32,
    pub x_max: i32,
    pub align: ScrollAlign,
}

/// Grid state shared between a [`FakeClient`] and the test driving it
#[derive(Debug, Default)]
pub struct FakeGrid {
    pub cells: HashMap<(usize, WidgetHandle), TransferValue>,
    /// Completion offered for a field when its text is a prefix of it
    pub completions: HashMap<WidgetHandle, String>,
    /// Rows at or beyond the limit fail `test_line` and are clamped on placement
    pub row_limit: Option<usize>,
    pub first_blank: Option<usize>,
    pub refuse_placement: bool,
    pub gets: Vec<(usize, WidgetHandle)>,
    pub puts: Vec<PutRecord>,
    pub placements: Vec<usize>,
    pub finds: Vec<FindRecord>,
    pub sorts: Vec<WidgetHandle>,
    pub presets: Vec<(usize, KeyEvent)>,
}

impl FakeGrid {
    pub fn set(&mut self, row: usize, field: WidgetHandle, value: TransferValue) {
        self.cells.insert((row, field), value);
    }

    pub fn value(&self, row: usize, field: WidgetHandle) -> Option<&TransferValue> {
        self.cells.get(&(row, field))
    }

    /// Puts recorded for one field
    pub fn puts_for(&self, field: WidgetHandle) -> Vec<&PutRecord> {
        self.puts.iter().filter(|put| put.field == field).collect()
    }

    /// Forgets every recorded callback, keeping the cells
    pub fn clear_history(&mut self) {
        self.gets.clear();
        self.puts.clear();
        self.placements.clear();
        self.finds.clear();
        self.sorts.clear();
        self.presets.clear();
    }
}

/// Fake client for testing
#[derive(Debug, Clone, Default)]
pub struct FakeClient {
    grid: Rc<RefCell<FakeGrid>>,
}

impl FakeClient {
    /// Creates a client over an empty grid, returning the shared grid too
    pub fn new() -> (Self, Rc<RefCell<FakeGrid>>) {
        let client = Self::default();
        let grid = Rc::clone(&client.grid);
        (client, grid)
    }

    /// Creates a client over an existing grid, so several lines can share one
    pub fn with_grid(grid: Rc<RefCell<FakeGrid>>) -> Self {
        Self { grid }
    }
}

impl EditLineClient for FakeClient {
    fn get_field(&mut self, block: &mut TransferBlock) -> bool {
        let mut grid = self.grid.borrow_mut();
        grid.gets.push((block.row(), block.field()));
        match grid.cells.get(&(block.row(), block.field())) {
            Some(value) => block.set_value(value.clone()),
            None => false,
        }
    }

    fn auto_complete(&mut self, block: &mut TransferBlock) -> bool {
        let grid = self.grid.borrow();
        let partial = block.value().as_text().unwrap_or("").to_string();
        match grid.completions.get(&block.field()) {
            Some(completion) if completion.starts_with(partial.as_str()) => {
                block.set_text(completion)
            }
            _ => false,
        }
    }

    fn put_field(&mut self, block: &TransferBlock) -> bool {
        let mut grid = self.grid.borrow_mut();
        grid.puts.push(PutRecord {
            row: block.row(),
            field: block.field(),
            value: block.value().clone(),
            key: block.key().cloned(),
        });
        grid.cells
            .insert((block.row(), block.field()), block.value().clone());
        true
    }

    fn test_line(&mut self, row: usize) -> bool {
        self.grid
            .borrow()
            .row_limit
            .map_or(true, |limit| row < limit)
    }

    fn place_line(&mut self, row: usize) -> Option<usize> {
        let mut grid = self.grid.borrow_mut();
        if grid.refuse_placement {
            return None;
        }
        let row = match grid.row_limit {
            Some(limit) => row.min(limit.saturating_sub(1)),
            None => row,
        };
        grid.placements.push(row);
        Some(row)
    }

    fn find_field(&mut self, row: usize, x_min: i32, x_max: i32, align: ScrollAlign) -> bool {
        self.grid.borrow_mut().finds.push(FindRecord {
            row,
            x_min,
            x_max,
            align,
        });
        true
    }

    fn first_blank_line(&mut self) -> Option<usize> {
        self.grid.borrow().first_blank
    }

    fn auto_sort(&mut self, handle: WidgetHandle) -> bool {
        self.grid.borrow_mut().sorts.push(handle);
        true
    }

    fn insert_preset(&mut self, row: usize, key: &KeyEvent) -> bool {
        self.grid.borrow_mut().presets.push((row, key.clone()));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::TransferPool;

    #[test]
    fn test_get_reads_cell() {
        let (mut client, grid) = FakeClient::new();
        grid.borrow_mut()
            .set(2, WidgetHandle(5), TransferValue::Text("rent".into()));

        let mut pool = TransferPool::new();
        let mut block = pool.claim().unwrap();
        block.prepare(2, WidgetHandle(5), TransferValue::Text(String::new()), 10, None);

        assert!(client.get_field(&mut block));
        assert_eq!(block.value().as_text(), Some("rent"));
        assert_eq!(grid.borrow().gets, vec![(2, WidgetHandle(5))]);
    }

    #[test]
    fn test_get_declines_missing_cell() {
        let (mut client, _grid) = FakeClient::new();
        let mut pool = TransferPool::new();
        let mut block = pool.claim().unwrap();
        block.prepare(0, WidgetHandle(1), TransferValue::Date(None), 0, None);
        assert!(!client.get_field(&mut block));
    }

    #[test]
    fn test_put_is_recorded_and_stored() {
        let (mut client, grid) = FakeClient::new();
        let mut pool = TransferPool::new();
        let mut block = pool.claim().unwrap();
        block.prepare(1, WidgetHandle(3), TransferValue::Text("x".into()), 10, None);

        assert!(client.put_field(&block));
        let grid = grid.borrow();
        assert_eq!(grid.puts.len(), 1);
        assert_eq!(
            grid.value(1, WidgetHandle(3)),
            Some(&TransferValue::Text("x".into()))
        );
    }

    #[test]
    fn test_clients_share_a_grid() {
        let (mut debit, grid) = FakeClient::new();
        let mut credit = FakeClient::with_grid(Rc::clone(&grid));

        let mut pool = TransferPool::new();
        let mut block = pool.claim().unwrap();
        block.prepare(1, WidgetHandle(3), TransferValue::Text("salary".into()), 10, None);
        assert!(debit.put_field(&block));
        block.prepare(1, WidgetHandle(3), TransferValue::Text(String::new()), 10, None);

        assert!(credit.get_field(&mut block));
        assert_eq!(block.value().as_text(), Some("salary"));
        assert_eq!(grid.borrow().puts_for(WidgetHandle(3)).len(), 1);
        assert!(grid.borrow().puts_for(WidgetHandle(4)).is_empty());
    }

    #[test]
    fn test_placement_is_clamped_to_limit() {
        let (mut client, grid) = FakeClient::new();
        grid.borrow_mut().row_limit = Some(3);
        assert_eq!(client.place_line(7), Some(2));
        assert!(client.test_line(2));
        assert!(!client.test_line(3));

        grid.borrow_mut().refuse_placement = true;
        assert_eq!(client.place_line(0), None);
    }

    #[test]
    fn test_default_callbacks_are_unsupported() {
        struct Bare;
        impl EditLineClient for Bare {}

        let mut bare = Bare;
        assert!(!bare.test_line(0));
        assert_eq!(bare.place_line(0), None);
        assert_eq!(bare.first_blank_line(), None);
        assert!(!bare.auto_sort(WidgetHandle(1)));
    }
}
