//! Transfer blocks
//!
//! Values cross the boundary between the engine and its client in transfer
//! blocks. Each line owns a pool of two, enough for one callback nested inside
//! another (a Put issued while the Get that fed it is still open).

use crate::field::FieldType;
use core::sync::atomic::{AtomicU64, Ordering};
use editline_types::{AccountValue, Amount, Date, KeyEvent, WidgetHandle};

/// Blocks per pool
pub const TRANSFER_POOL_SIZE: usize = 2;

static NEXT_POOL: AtomicU64 = AtomicU64::new(1);

/// Value carried by a block, one variant per field kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferValue {
    Display(String),
    Text(String),
    Currency(Amount),
    Date(Option<Date>),
    AccountIn(AccountValue),
    AccountOut(AccountValue),
}

impl TransferValue {
    /// Empty value of a field kind
    pub fn empty(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Display => TransferValue::Display(String::new()),
            FieldType::Text => TransferValue::Text(String::new()),
            FieldType::Currency => TransferValue::Currency(Amount::ZERO),
            FieldType::Date => TransferValue::Date(None),
            FieldType::AccountIn => TransferValue::AccountIn(AccountValue::EMPTY),
            FieldType::AccountOut => TransferValue::AccountOut(AccountValue::EMPTY),
        }
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            TransferValue::Display(_) => FieldType::Display,
            TransferValue::Text(_) => FieldType::Text,
            TransferValue::Currency(_) => FieldType::Currency,
            TransferValue::Date(_) => FieldType::Date,
            TransferValue::AccountIn(_) => FieldType::AccountIn,
            TransferValue::AccountOut(_) => FieldType::AccountOut,
        }
    }

    /// Text payload of display and text values
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TransferValue::Display(text) | TransferValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// One exchange between the engine and the client
#[derive(Debug)]
pub struct TransferBlock {
    pool: u64,
    slot: usize,
    row: usize,
    field: WidgetHandle,
    field_type: FieldType,
    value: TransferValue,
    text_capacity: usize,
    key: Option<KeyEvent>,
}

impl TransferBlock {
    fn blank(pool: u64, slot: usize) -> Self {
        Self {
            pool,
            slot,
            row: 0,
            field: WidgetHandle(0),
            field_type: FieldType::Display,
            value: TransferValue::Display(String::new()),
            text_capacity: 0,
            key: None,
        }
    }

    /// Row the exchange concerns
    pub fn row(&self) -> usize {
        self.row
    }

    /// Primary icon of the field the exchange concerns
    pub fn field(&self) -> WidgetHandle {
        self.field
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn value(&self) -> &TransferValue {
        &self.value
    }

    /// Capacity of the field's text buffer
    pub fn text_capacity(&self) -> usize {
        self.text_capacity
    }

    /// Keystroke that caused a Put, if any
    pub fn key(&self) -> Option<&KeyEvent> {
        self.key.as_ref()
    }

    /// Stores a value for the engine to read back
    ///
    /// Returns false, leaving the block unchanged, when the value's kind is
    /// not the field's. Text is cut to the field's capacity.
    pub fn set_value(&mut self, value: TransferValue) -> bool {
        if value.field_type() != self.field_type {
            log::debug!(
                "rejected {:?} value for {:?} field {}",
                value.field_type(),
                self.field_type,
                self.field
            );
            return false;
        }
        self.value = match value {
            TransferValue::Text(text) => TransferValue::Text(self.clip(&text)),
            TransferValue::Display(text) => TransferValue::Display(self.clip(&text)),
            other => other,
        };
        true
    }

    /// Stores text into a display or text field
    pub fn set_text(&mut self, text: &str) -> bool {
        let value = match self.field_type {
            FieldType::Display => TransferValue::Display(text.to_string()),
            FieldType::Text => TransferValue::Text(text.to_string()),
            _ => return false,
        };
        self.set_value(value)
    }

    fn clip(&self, text: &str) -> String {
        text.chars().take(self.text_capacity).collect()
    }

    pub(crate) fn prepare(
        &mut self,
        row: usize,
        field: WidgetHandle,
        value: TransferValue,
        text_capacity: usize,
        key: Option<KeyEvent>,
    ) {
        self.row = row;
        self.field = field;
        self.field_type = value.field_type();
        self.value = value;
        self.text_capacity = text_capacity;
        self.key = key;
    }

    fn reset(&mut self) {
        let (pool, slot) = (self.pool, self.slot);
        *self = Self::blank(pool, slot);
    }
}

/// Per-line pool of transfer blocks
#[derive(Debug)]
pub struct TransferPool {
    id: u64,
    slots: [Option<TransferBlock>; TRANSFER_POOL_SIZE],
}

impl TransferPool {
    pub fn new() -> Self {
        let id = NEXT_POOL.fetch_add(1, Ordering::Relaxed);
        Self {
            id,
            slots: [
                Some(TransferBlock::blank(id, 0)),
                Some(TransferBlock::blank(id, 1)),
            ],
        }
    }

    /// Takes a free block, or `None` when both are out
    pub fn claim(&mut self) -> Option<TransferBlock> {
        let block = self.slots.iter_mut().find_map(Option::take);
        if block.is_none() {
            log::warn!("transfer pool {} exhausted", self.id);
        }
        block
    }

    /// Returns a block to the pool
    ///
    /// A block from another pool, or one whose slot is already occupied, is
    /// dropped without effect.
    pub fn release(&mut self, mut block: TransferBlock) {
        if block.pool != self.id || block.slot >= TRANSFER_POOL_SIZE {
            log::debug!("ignored release of foreign transfer block");
            return;
        }
        let slot = &mut self.slots[block.slot];
        if slot.is_some() {
            log::debug!("ignored release into occupied transfer slot");
            return;
        }
        block.reset();
        *slot = Some(block);
    }

    /// Number of blocks currently free
    pub fn available(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

impl Default for TransferPool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_third_claim_fails() {
        let mut pool = TransferPool::new();
        let first = pool.claim();
        let second = pool.claim();
        assert!(first.is_some());
        assert!(second.is_some());
        assert!(pool.claim().is_none());
        assert_eq!(pool.available(), 0);
    }

    #[test]
    fn test_release_makes_block_claimable() {
        let mut pool = TransferPool::new();
        let first = pool.claim().unwrap();
        let _second = pool.claim().unwrap();
        pool.release(first);
        assert_eq!(pool.available(), 1);
        assert!(pool.claim().is_some());
    }

    #[test]
    fn test_foreign_release_is_ignored() {
        let mut pool = TransferPool::new();
        let mut other = TransferPool::new();
        let foreign = other.claim().unwrap();
        let _held = pool.claim().unwrap();

        pool.release(foreign);
        assert_eq!(pool.available(), 1);
    }

    #[test]
    fn test_released_block_is_reset() {
        let mut pool = TransferPool::new();
        let mut block = pool.claim().unwrap();
        block.prepare(4, WidgetHandle(9), TransferValue::Text(String::new()), 8, None);
        assert!(block.set_text("hello"));
        pool.release(block);

        let block = pool.claim().unwrap();
        assert_eq!(block.row(), 0);
        assert_eq!(block.value(), &TransferValue::Display(String::new()));
    }

    #[test]
    fn test_set_value_rejects_other_kind() {
        let mut pool = TransferPool::new();
        let mut block = pool.claim().unwrap();
        block.prepare(0, WidgetHandle(1), TransferValue::Date(None), 0, None);

        assert!(!block.set_value(TransferValue::Currency(Amount(5))));
        assert!(!block.set_text("x"));
        assert_eq!(block.value(), &TransferValue::Date(None));
    }

    #[test]
    fn test_text_is_clipped_to_capacity() {
        let mut pool = TransferPool::new();
        let mut block = pool.claim().unwrap();
        block.prepare(0, WidgetHandle(1), TransferValue::Text(String::new()), 3, None);

        assert!(block.set_text("ABCDEF"));
        assert_eq!(block.value().as_text(), Some("ABC"));
    }
}
