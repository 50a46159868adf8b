//! Field model
//!
//! A field is one logical column of a transaction row. It owns one icon per
//! on-screen widget (three for account fields) and a cached copy of the
//! value last exchanged with the client, used for change detection.

use editline_types::{AccountValue, Amount, Date, WidgetHandle};
use serde::{Deserialize, Serialize};

/// Kind of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    /// Read-only text
    Display,
    /// Free text, optionally auto-completed
    Text,
    /// Monetary amount
    Currency,
    /// Calendar date
    Date,
    /// Account money comes from
    AccountIn,
    /// Account money goes to
    AccountOut,
}

impl FieldType {
    /// Icon roles of this kind, in declaration order
    pub fn icon_roles(&self) -> &'static [IconRole] {
        match self {
            FieldType::Display => &[IconRole::Display],
            FieldType::Text => &[IconRole::Text],
            FieldType::Currency => &[IconRole::Currency],
            FieldType::Date => &[IconRole::Date],
            FieldType::AccountIn | FieldType::AccountOut => &[
                IconRole::AccountIdent,
                IconRole::AccountReconciled,
                IconRole::AccountName,
            ],
        }
    }

    pub fn is_account(&self) -> bool {
        matches!(self, FieldType::AccountIn | FieldType::AccountOut)
    }
}

/// What a single icon shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IconRole {
    Display,
    Text,
    Currency,
    Date,
    AccountIdent,
    AccountReconciled,
    AccountName,
}

impl IconRole {
    /// Returns true for roles that are normally created as writable widgets
    pub fn accepts_input(&self) -> bool {
        matches!(
            self,
            IconRole::Text | IconRole::Currency | IconRole::Date | IconRole::AccountIdent
        )
    }
}

/// Value last exchanged with the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldCache {
    Display,
    /// Text is tracked by checksum only; the icon buffer holds the text
    Text { checksum: u32 },
    Currency(Amount),
    Date(Option<Date>),
    AccountIn(AccountValue),
    AccountOut(AccountValue),
}

impl FieldCache {
    /// Empty default for a field kind
    pub fn empty(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Display => FieldCache::Display,
            FieldType::Text => FieldCache::Text { checksum: 0 },
            FieldType::Currency => FieldCache::Currency(Amount::ZERO),
            FieldType::Date => FieldCache::Date(None),
            FieldType::AccountIn => FieldCache::AccountIn(AccountValue::EMPTY),
            FieldType::AccountOut => FieldCache::AccountOut(AccountValue::EMPTY),
        }
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            FieldCache::Display => FieldType::Display,
            FieldCache::Text { .. } => FieldType::Text,
            FieldCache::Currency(_) => FieldType::Currency,
            FieldCache::Date(_) => FieldType::Date,
            FieldCache::AccountIn(_) => FieldType::AccountIn,
            FieldCache::AccountOut(_) => FieldType::AccountOut,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == FieldCache::empty(self.field_type())
    }
}

/// Declaration of a single icon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSpec {
    pub handle: WidgetHandle,
    pub text: String,
    pub capacity: usize,
}

impl IconSpec {
    pub fn new(handle: WidgetHandle, capacity: usize) -> Self {
        Self {
            handle,
            text: String::new(),
            capacity,
        }
    }

    /// Sets the initial buffer contents
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }
}

/// Declaration of a field, passed to `EditSession::declare_field`
///
/// Account fields declare their icons at `column`, `column + 1` and
/// `column + 2`; every other kind occupies `column` alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub(crate) field_type: FieldType,
    pub(crate) column: usize,
    pub(crate) icons: Vec<IconSpec>,
}

impl FieldSpec {
    pub fn display(column: usize, icon: IconSpec) -> Self {
        Self::single(FieldType::Display, column, icon)
    }

    pub fn text(column: usize, icon: IconSpec) -> Self {
        Self::single(FieldType::Text, column, icon)
    }

    pub fn currency(column: usize, icon: IconSpec) -> Self {
        Self::single(FieldType::Currency, column, icon)
    }

    pub fn date(column: usize, icon: IconSpec) -> Self {
        Self::single(FieldType::Date, column, icon)
    }

    pub fn account_in(
        column: usize,
        ident: IconSpec,
        reconciled: IconSpec,
        name: IconSpec,
    ) -> Self {
        Self::account(FieldType::AccountIn, column, ident, reconciled, name)
    }

    pub fn account_out(
        column: usize,
        ident: IconSpec,
        reconciled: IconSpec,
        name: IconSpec,
    ) -> Self {
        Self::account(FieldType::AccountOut, column, ident, reconciled, name)
    }

    fn single(field_type: FieldType, column: usize, icon: IconSpec) -> Self {
        Self {
            field_type,
            column,
            icons: vec![icon],
        }
    }

    fn account(
        field_type: FieldType,
        column: usize,
        ident: IconSpec,
        reconciled: IconSpec,
        name: IconSpec,
    ) -> Self {
        Self {
            field_type,
            column,
            icons: vec![ident, reconciled, name],
        }
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn column(&self) -> usize {
        self.column
    }
}

/// One on-screen widget of a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    pub(crate) handle: WidgetHandle,
    pub(crate) role: IconRole,
    pub(crate) buffer: String,
    pub(crate) capacity: usize,
    pub(crate) column: usize,
}

impl Icon {
    pub fn handle(&self) -> WidgetHandle {
        self.handle
    }

    pub fn role(&self) -> IconRole {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// Number of characters in the buffer, the caret index of its end
    pub fn len(&self) -> usize {
        self.buffer.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Replaces the buffer, stopping at the first control character or capacity
    pub(crate) fn set_text(&mut self, text: &str) {
        self.buffer.clear();
        self.buffer.extend(terminated(text).chars().take(self.capacity));
    }
}

/// A declared field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub(crate) cache: FieldCache,
    pub(crate) column: usize,
    pub(crate) icons: Vec<Icon>,
}

impl Field {
    pub fn field_type(&self) -> FieldType {
        self.cache.field_type()
    }

    pub fn cache(&self) -> &FieldCache {
        &self.cache
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn icons(&self) -> &[Icon] {
        &self.icons
    }

    /// The icon that values travel through and the caret lands in
    pub fn primary(&self) -> &Icon {
        &self.icons[0]
    }

    pub fn primary_handle(&self) -> WidgetHandle {
        self.icons[0].handle
    }

    /// First and last column occupied by the field's icons
    pub fn column_span(&self) -> (usize, usize) {
        let last = self.icons.iter().map(|icon| icon.column).max();
        (self.column, last.unwrap_or(self.column))
    }
}

/// Position of an icon inside a line's field list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct IconRef {
    pub handle: WidgetHandle,
    pub field: usize,
    pub icon: usize,
}

/// Text up to, not including, the first character below space
pub fn terminated(text: &str) -> &str {
    match text.char_indices().find(|(_, ch)| *ch < ' ') {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

/// Integrity sum of a text buffer
///
/// Wrapping sum of character codes up to the first control character.
pub fn text_checksum(text: &str) -> u32 {
    terminated(text)
        .chars()
        .fold(0u32, |sum, ch| sum.wrapping_add(ch as u32))
}
