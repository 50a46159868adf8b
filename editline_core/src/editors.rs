//! Content editors
//!
//! By the time a keystroke arrives here the toolkit has already applied it to
//! the widget. Each editor reads the widget back, converts it to the field's
//! value and sends a Put only when that value differs from the cache.

use crate::convert::{AccountDirection, AccountLookup, Converters};
use crate::field::{text_checksum, FieldCache, FieldType};
use crate::line::{EditLine, Fetch};
use crate::router::KeyOutcome;
use crate::toolkit::{Caret, Toolkit};
use crate::transfer::TransferValue;
use editline_types::{KeyCode, KeyEvent, Modifiers, WidgetHandle};

impl EditLine {
    pub(crate) fn edit_field(
        &mut self,
        index: usize,
        caret: WidgetHandle,
        row: usize,
        key: &KeyEvent,
        toolkit: &mut dyn Toolkit,
        converters: &mut dyn Converters,
    ) -> KeyOutcome {
        let Some(kind) = self.field(index).map(|field| field.field_type()) else {
            return KeyOutcome::Unhandled;
        };
        match kind {
            FieldType::Display => KeyOutcome::Unhandled,
            FieldType::Text => self.edit_text(index, row, key, toolkit),
            FieldType::Currency => self.edit_currency(index, row, key, toolkit, converters),
            FieldType::Date => self.edit_date(index, row, key, toolkit, converters),
            FieldType::AccountIn | FieldType::AccountOut => {
                let direction = if kind == FieldType::AccountIn {
                    AccountDirection::In
                } else {
                    AccountDirection::Out
                };
                self.edit_account(index, caret, row, key, direction, toolkit, converters)
            }
        }
    }

    /// Replaces a field's primary widget text and parks the caret at its end
    fn replace_text(&mut self, index: usize, text: &str, toolkit: &mut dyn Toolkit) {
        let surface = self.surface();
        let Some(handle) = self.field(index).map(|field| field.primary_handle()) else {
            return;
        };
        let placed = toolkit.set_widget_text(surface, handle, text).and_then(|()| {
            let length = toolkit.widget_text(surface, handle)?.chars().count();
            toolkit.set_caret(Caret::in_widget(surface, handle, length))
        });
        if let Err(err) = placed {
            log::warn!("could not replace text of {}: {}", handle, err);
        }
    }

    fn edit_text(
        &mut self,
        index: usize,
        row: usize,
        key: &KeyEvent,
        toolkit: &mut dyn Toolkit,
    ) -> KeyOutcome {
        let mut handled = key.is_editing();
        if key.is(KeyCode::F1, Modifiers::NONE) {
            handled = true;
            self.sync_from_widget(index, 0, toolkit);
            let completion = self.request_value(index, row, Fetch::Complete);
            if let Some(TransferValue::Text(text)) = completion {
                self.replace_text(index, &text, toolkit);
            }
        }

        let Some(text) = self.sync_from_widget(index, 0, toolkit) else {
            return KeyOutcome::consumed(handled);
        };
        let checksum = text_checksum(&text);
        let changed = match self.cache_mut(index) {
            Some(FieldCache::Text { checksum: cached }) if *cached != checksum => {
                *cached = checksum;
                true
            }
            _ => false,
        };
        if changed {
            self.send_value(index, row, TransferValue::Text(text), Some(key));
        }
        KeyOutcome::consumed(handled)
    }

    fn edit_currency(
        &mut self,
        index: usize,
        row: usize,
        key: &KeyEvent,
        toolkit: &mut dyn Toolkit,
        converters: &dyn Converters,
    ) -> KeyOutcome {
        let handled = key.is_editing();
        let Some(text) = self.sync_from_widget(index, 0, toolkit) else {
            return KeyOutcome::consumed(handled);
        };
        let amount = converters.parse_amount(&text);
        let changed = match self.cache_mut(index) {
            Some(FieldCache::Currency(cached)) if *cached != amount => {
                *cached = amount;
                true
            }
            _ => false,
        };
        if changed {
            self.send_value(index, row, TransferValue::Currency(amount), Some(key));
        }
        KeyOutcome::consumed(handled)
    }

    fn edit_date(
        &mut self,
        index: usize,
        row: usize,
        key: &KeyEvent,
        toolkit: &mut dyn Toolkit,
        converters: &dyn Converters,
    ) -> KeyOutcome {
        // Letters select a preset; the host rewrites the row itself.
        if key.is_alphabetic() {
            self.client_mut().insert_preset(row, key);
            return KeyOutcome::Handled;
        }

        let mut handled = key.is_editing();
        if key.is(KeyCode::F1, Modifiers::NONE) {
            handled = true;
            let today = converters.format_date(Some(converters.today()));
            self.replace_text(index, &today, toolkit);
        }

        let context = match row.checked_sub(1) {
            Some(above) => match self.request_value(index, above, Fetch::Plain) {
                Some(TransferValue::Date(date)) => date,
                _ => None,
            },
            None => None,
        };
        let Some(text) = self.sync_from_widget(index, 0, toolkit) else {
            return KeyOutcome::consumed(handled);
        };
        let date = converters.parse_date(&text, context);
        let changed = match self.cache_mut(index) {
            Some(FieldCache::Date(cached)) if *cached != date => {
                *cached = date;
                true
            }
            _ => false,
        };
        if changed {
            self.send_value(index, row, TransferValue::Date(date), Some(key));
        }
        KeyOutcome::consumed(handled)
    }

    #[allow(clippy::too_many_arguments)]
    fn edit_account(
        &mut self,
        index: usize,
        caret: WidgetHandle,
        row: usize,
        key: &KeyEvent,
        direction: AccountDirection,
        toolkit: &mut dyn Toolkit,
        converters: &mut dyn Converters,
    ) -> KeyOutcome {
        let handled = key.is_editing();
        let surface = self.surface();
        let Some(field) = self.field(index) else {
            return KeyOutcome::Unhandled;
        };
        let current = match field.cache() {
            FieldCache::AccountIn(value) | FieldCache::AccountOut(value) => *value,
            _ => return KeyOutcome::Unhandled,
        };
        let handles: Vec<WidgetHandle> = field.icons().iter().map(|icon| icon.handle()).collect();
        let &[ident, reconciled, name] = handles.as_slice() else {
            return KeyOutcome::Unhandled;
        };

        let lookup = AccountLookup {
            surface,
            direction,
            ident,
            reconciled,
            name,
            caret,
            key,
            current,
        };
        let value = converters.lookup_account(toolkit, &lookup);
        for icon in 0..handles.len() {
            self.sync_from_widget(index, icon, toolkit);
        }

        let changed = match self.cache_mut(index) {
            Some(FieldCache::AccountIn(cached)) | Some(FieldCache::AccountOut(cached))
                if *cached != value =>
            {
                *cached = value;
                true
            }
            _ => false,
        };
        if changed {
            let value = match direction {
                AccountDirection::In => TransferValue::AccountIn(value),
                AccountDirection::Out => TransferValue::AccountOut(value),
            };
            self.send_value(index, row, value, Some(key));
        }
        KeyOutcome::consumed(handled)
    }
}
