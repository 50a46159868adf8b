//! A single edit line
//!
//! Owns the declared fields, the handle-ordered icon index and the transfer
//! pool, and performs every exchange with the line's client. Whether the line
//! is the active one is decided by the session.

use crate::client::EditLineClient;
use crate::convert::Converters;
use crate::error::{EditLineError, EditLineResult, ToolkitError};
use crate::field::{text_checksum, Field, FieldCache, FieldSpec, FieldType, Icon, IconRef};
use crate::geometry::{icon_extent, ColumnLayout};
use crate::toolkit::{Toolkit, WidgetTemplate};
use crate::transfer::{TransferPool, TransferValue};
use editline_types::{Colour, KeyEvent, LineId, SurfaceId, WidgetHandle};

/// How a value is requested from the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fetch {
    Plain,
    Complete,
}

pub(crate) struct EditLine {
    id: LineId,
    surface: SurfaceId,
    layout: Box<dyn ColumnLayout>,
    toolbar_height: i32,
    client: Box<dyn EditLineClient>,
    fields: Vec<Field>,
    icon_order: Vec<IconRef>,
    pool: TransferPool,
    row: Option<usize>,
    colour: Colour,
    complete: bool,
    placed: bool,
}

impl EditLine {
    pub fn new(
        surface: SurfaceId,
        layout: Box<dyn ColumnLayout>,
        toolbar_height: i32,
        client: Box<dyn EditLineClient>,
    ) -> Self {
        Self {
            id: LineId::new(),
            surface,
            layout,
            toolbar_height,
            client,
            fields: Vec::new(),
            icon_order: Vec::new(),
            pool: TransferPool::new(),
            row: None,
            colour: Colour::default(),
            complete: true,
            placed: false,
        }
    }

    pub fn id(&self) -> LineId {
        self.id
    }

    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    pub fn row(&self) -> Option<usize> {
        self.row
    }

    pub fn colour(&self) -> Colour {
        self.colour
    }

    pub fn set_colour(&mut self, colour: Colour) {
        self.colour = colour;
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    pub fn cache_mut(&mut self, index: usize) -> Option<&mut FieldCache> {
        self.fields.get_mut(index).map(|field| &mut field.cache)
    }

    pub fn client_mut(&mut self) -> &mut dyn EditLineClient {
        self.client.as_mut()
    }

    /// Icon handles in ascending order
    pub fn handles(&self) -> impl Iterator<Item = WidgetHandle> + '_ {
        self.icon_order.iter().map(|entry| entry.handle)
    }

    pub fn first_handle(&self) -> Option<WidgetHandle> {
        self.icon_order.first().map(|entry| entry.handle)
    }

    /// Field and icon index owning a handle
    pub fn locate(&self, handle: WidgetHandle) -> Option<(usize, usize)> {
        let start = self.icon_order.partition_point(|entry| entry.handle < handle);
        self.icon_order
            .get(start)
            .filter(|entry| entry.handle == handle)
            .map(|entry| (entry.field, entry.icon))
    }

    pub fn icon(&self, handle: WidgetHandle) -> Option<&Icon> {
        let (field, icon) = self.locate(handle)?;
        self.fields.get(field)?.icons.get(icon)
    }

    /// Leftmost and rightmost x of a field's icons
    pub fn field_x_range(&self, index: usize) -> (i32, i32) {
        let Some(field) = self.fields.get(index) else {
            return (0, 0);
        };
        let (first, last) = field.column_span();
        let (x_min, _) = self.layout.x_extent(first);
        let (_, x_max) = self.layout.x_extent(last);
        (x_min, x_max)
    }

    /// Adds a field
    ///
    /// An allocation failure marks the line incomplete, after which every
    /// declaration fails at once.
    pub fn declare(&mut self, spec: FieldSpec) -> EditLineResult<()> {
        if !self.complete {
            return Err(EditLineError::Incomplete);
        }
        if self.placed {
            return Err(EditLineError::SetupClosed);
        }

        let column = spec.column;
        let field = match self.build_field(spec) {
            Some(field) => field,
            None => {
                self.complete = false;
                log::error!("edit line {} is incomplete: field at column {}", self.id, column);
                return Err(EditLineError::Allocation { column });
            }
        };

        let index = self.fields.len();
        for (icon, entry) in field.icons.iter().enumerate() {
            let at = self.icon_order.partition_point(|other| other.handle <= entry.handle);
            self.icon_order.insert(
                at,
                IconRef {
                    handle: entry.handle,
                    field: index,
                    icon,
                },
            );
        }
        self.fields.push(field);
        Ok(())
    }

    fn build_field(&mut self, spec: FieldSpec) -> Option<Field> {
        self.fields.try_reserve(1).ok()?;
        self.icon_order.try_reserve(spec.icons.len()).ok()?;

        let roles = spec.field_type.icon_roles();
        let mut icons = Vec::new();
        icons.try_reserve(spec.icons.len()).ok()?;
        for (offset, (icon, role)) in spec.icons.into_iter().zip(roles).enumerate() {
            let mut buffer = String::new();
            buffer.try_reserve(icon.capacity).ok()?;
            let mut entry = Icon {
                handle: icon.handle,
                role: *role,
                buffer,
                capacity: icon.capacity,
                column: spec.column + offset,
            };
            entry.set_text(&icon.text);
            icons.push(entry);
        }

        let cache = match spec.field_type {
            FieldType::Text => FieldCache::Text {
                checksum: text_checksum(icons.first().map(Icon::text).unwrap_or("")),
            },
            other => FieldCache::empty(other),
        };
        Some(Field {
            cache,
            column: spec.column,
            icons,
        })
    }

    pub fn begin_placement(&mut self, row: usize, colour: Colour) {
        self.placed = true;
        self.row = Some(row);
        self.colour = colour;
    }

    pub fn clear_row(&mut self) {
        self.row = None;
    }

    /// Creates one widget per icon, in ascending handle order
    ///
    /// On failure the widgets created so far are removed again.
    pub fn create_widgets(&mut self, toolkit: &mut dyn Toolkit) -> Result<(), ToolkitError> {
        let row = self.row.unwrap_or(0);
        let mut created = Vec::with_capacity(self.icon_order.len());

        for entry in &self.icon_order {
            let icon = &self.fields[entry.field].icons[entry.icon];
            let template = WidgetTemplate {
                surface: self.surface,
                handle: icon.handle,
                extent: icon_extent(self.layout.as_ref(), icon.column, row, self.toolbar_height),
                colour: self.colour,
                role: icon.role,
                text: icon.buffer.clone(),
                capacity: icon.capacity,
            };
            let failure = match toolkit.create_widget(&template) {
                Ok(actual) if actual == icon.handle => {
                    created.push(actual);
                    continue;
                }
                Ok(actual) => {
                    created.push(actual);
                    ToolkitError::HandleMismatch {
                        expected: icon.handle,
                        actual,
                    }
                }
                Err(err) => err,
            };
            for handle in created {
                if let Err(err) = toolkit.delete_widget(self.surface, handle) {
                    log::warn!("could not remove partial widget {}: {}", handle, err);
                }
            }
            return Err(failure);
        }
        Ok(())
    }

    /// Deletes every widget of the line
    pub fn delete_widgets(&mut self, toolkit: &mut dyn Toolkit) {
        for entry in &self.icon_order {
            if let Err(err) = toolkit.delete_widget(self.surface, entry.handle) {
                log::warn!("could not delete widget {}: {}", entry.handle, err);
            }
        }
    }

    /// Fetches and shows every field for the current row
    pub fn load_content(&mut self, toolkit: &mut dyn Toolkit, converters: &dyn Converters) {
        let Some(row) = self.row else {
            return;
        };
        for index in 0..self.fields.len() {
            self.fetch_into_cache(index, row);
            self.render_field(index, toolkit, converters);
        }
    }

    /// Requests a value from the client
    ///
    /// Returns `None` when the client declines or no transfer block is free.
    pub fn request_value(
        &mut self,
        index: usize,
        row: usize,
        fetch: Fetch,
    ) -> Option<TransferValue> {
        let field = self.fields.get(index)?;
        let prefill = match (fetch, field.field_type()) {
            (Fetch::Complete, FieldType::Text) => {
                TransferValue::Text(field.primary().buffer.clone())
            }
            (_, kind) => TransferValue::empty(kind),
        };
        let (handle, capacity) = (field.primary_handle(), field.primary().capacity);

        let mut block = self.pool.claim()?;
        block.prepare(row, handle, prefill, capacity, None);
        let supplied = match fetch {
            Fetch::Plain => self.client.get_field(&mut block),
            Fetch::Complete => self.client.auto_complete(&mut block),
        };
        let value = supplied.then(|| block.value().clone());
        self.pool.release(block);
        value
    }

    /// Sends a value to the client, returning whether it was accepted
    pub fn send_value(
        &mut self,
        index: usize,
        row: usize,
        value: TransferValue,
        key: Option<&KeyEvent>,
    ) -> bool {
        let Some(field) = self.fields.get(index) else {
            return false;
        };
        let (handle, capacity) = (field.primary_handle(), field.primary().capacity);
        let Some(mut block) = self.pool.claim() else {
            return false;
        };
        block.prepare(row, handle, value, capacity, key.cloned());
        let accepted = self.client.put_field(&block);
        self.pool.release(block);
        accepted
    }

    /// Copies a field's value from the row above into `row`
    ///
    /// The Get for the row above stays open while the Put is issued, so both
    /// transfer blocks are in use at once.
    pub fn copy_from_above(&mut self, index: usize, row: usize, key: &KeyEvent) -> bool {
        let Some(above) = row.checked_sub(1) else {
            return false;
        };
        let Some(field) = self.fields.get(index) else {
            return false;
        };
        if field.field_type() == FieldType::Display {
            return false;
        }
        let (handle, capacity, kind) = (
            field.primary_handle(),
            field.primary().capacity,
            field.field_type(),
        );

        let Some(mut source) = self.pool.claim() else {
            return false;
        };
        source.prepare(above, handle, TransferValue::empty(kind), capacity, None);
        let mut copied = false;
        if self.client.get_field(&mut source) {
            if let Some(mut target) = self.pool.claim() {
                target.prepare(row, handle, source.value().clone(), capacity, Some(key.clone()));
                copied = self.client.put_field(&target);
                self.pool.release(target);
            }
        }
        self.pool.release(source);
        copied
    }

    /// Refreshes a field's cache and buffers from the client
    ///
    /// A declined Get leaves the field at its empty default.
    pub fn fetch_into_cache(&mut self, index: usize, row: usize) {
        let Some(kind) = self.fields.get(index).map(Field::field_type) else {
            return;
        };
        let value = self
            .request_value(index, row, Fetch::Plain)
            .unwrap_or_else(|| TransferValue::empty(kind));
        self.store_value(index, value);
    }

    /// Stores a value into a field's cache, and for text kinds its buffer
    pub fn store_value(&mut self, index: usize, value: TransferValue) {
        let Some(field) = self.fields.get_mut(index) else {
            return;
        };
        match (&mut field.cache, value) {
            (FieldCache::Display, TransferValue::Display(text)) => {
                field.icons[0].set_text(&text);
            }
            (FieldCache::Text { checksum }, TransferValue::Text(text)) => {
                field.icons[0].set_text(&text);
                *checksum = text_checksum(field.icons[0].text());
            }
            (FieldCache::Currency(cached), TransferValue::Currency(amount)) => *cached = amount,
            (FieldCache::Date(cached), TransferValue::Date(date)) => *cached = date,
            (FieldCache::AccountIn(cached), TransferValue::AccountIn(account))
            | (FieldCache::AccountOut(cached), TransferValue::AccountOut(account)) => {
                *cached = account
            }
            (cache, value) => {
                log::warn!(
                    "dropped {:?} value for {:?} field",
                    value.field_type(),
                    cache.field_type()
                );
            }
        }
    }

    /// Flips the reconciled flag of an account field and tells the client
    ///
    /// Returns false for other kinds and for an empty account.
    pub fn toggle_reconciled(&mut self, index: usize, row: usize) -> bool {
        let Some(field) = self.fields.get_mut(index) else {
            return false;
        };
        let value = match &mut field.cache {
            FieldCache::AccountIn(account) if account.account.is_some() => {
                account.reconciled = !account.reconciled;
                TransferValue::AccountIn(*account)
            }
            FieldCache::AccountOut(account) if account.account.is_some() => {
                account.reconciled = !account.reconciled;
                TransferValue::AccountOut(*account)
            }
            _ => return false,
        };
        self.send_value(index, row, value, None);
        true
    }

    /// Pushes a field's cached value into every one of its widgets
    pub fn render_field(
        &mut self,
        index: usize,
        toolkit: &mut dyn Toolkit,
        converters: &dyn Converters,
    ) {
        let surface = self.surface;
        let Some(field) = self.fields.get_mut(index) else {
            return;
        };
        let texts: Vec<String> = match field.cache {
            FieldCache::Display | FieldCache::Text { .. } => Vec::new(),
            FieldCache::Currency(amount) => vec![converters.format_amount(amount)],
            FieldCache::Date(date) => vec![converters.format_date(date)],
            FieldCache::AccountIn(account) | FieldCache::AccountOut(account) => vec![
                converters.account_ident(account.account),
                converters.reconcile_mark(account.reconciled),
                converters.account_name(account.account),
            ],
        };
        for (icon, text) in field.icons.iter_mut().zip(texts.iter()) {
            icon.set_text(text);
        }

        for icon in &field.icons {
            let shown = toolkit
                .set_widget_text(surface, icon.handle, &icon.buffer)
                .and_then(|()| toolkit.redraw_widget(surface, icon.handle));
            if let Err(err) = shown {
                log::warn!("could not show widget {}: {}", icon.handle, err);
            }
        }
    }

    /// Copies a widget's text into its icon buffer and returns the stored text
    pub fn sync_from_widget(
        &mut self,
        index: usize,
        icon: usize,
        toolkit: &dyn Toolkit,
    ) -> Option<String> {
        let surface = self.surface;
        let entry = self.fields.get_mut(index)?.icons.get_mut(icon)?;
        match toolkit.widget_text(surface, entry.handle) {
            Ok(text) => {
                entry.set_text(&text);
                Some(entry.buffer.clone())
            }
            Err(err) => {
                log::warn!("could not read widget {}: {}", entry.handle, err);
                None
            }
        }
    }

    /// Resets a field to empty and tells the client
    ///
    /// Returns false for display fields and fields that are already empty.
    pub fn clear_field(&mut self, index: usize, row: usize, key: &KeyEvent) -> bool {
        let Some(field) = self.fields.get_mut(index) else {
            return false;
        };
        let kind = field.field_type();
        if kind == FieldType::Display || field.cache.is_empty() {
            return false;
        }
        field.cache = FieldCache::empty(kind);
        for icon in &mut field.icons {
            icon.buffer.clear();
        }
        self.send_value(index, row, TransferValue::empty(kind), Some(key));
        true
    }

    #[cfg(test)]
    pub fn pool(&self) -> &TransferPool {
        &self.pool
    }
}
