//! Keystroke routing
//!
//! Navigation keys come first: line delete, vertical moves, forward and
//! backward field moves. The F12 family is left for the host. Every other
//! keystroke goes to the content editor of the field holding the caret.

use crate::client::ScrollAlign;
use crate::convert::Converters;
use crate::field::Field;
use crate::geometry::row_offset;
use crate::navigate;
use crate::session::{EditSession, IconFilter, RowTarget};
use crate::toolkit::{Caret, Toolkit};
use editline_types::{KeyCode, KeyEvent, LineId, Modifiers, SurfaceId, WidgetHandle};

/// A keystroke delivered to a surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub surface: SurfaceId,
    pub key: KeyEvent,
}

impl KeyPress {
    pub fn new(surface: SurfaceId, key: KeyEvent) -> Self {
        Self { surface, key }
    }
}

/// Whether the engine consumed a keystroke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    /// The host should apply its own handling
    Unhandled,
}

impl KeyOutcome {
    pub(crate) fn consumed(handled: bool) -> Self {
        if handled {
            KeyOutcome::Handled
        } else {
            KeyOutcome::Unhandled
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Seek {
    First,
    Last,
    After(usize),
    Before(usize),
}

/// Caret position resolved against a line
#[derive(Debug, Clone, Copy)]
struct CaretField {
    field: usize,
    handle: WidgetHandle,
    caret: Caret,
}

impl<T: Toolkit, C: Converters> EditSession<T, C> {
    /// Routes a keystroke to the line it was delivered to
    pub fn process_keypress(&mut self, id: LineId, press: &KeyPress) -> KeyOutcome {
        let on_line = self
            .lines
            .get(&id)
            .map(|line| line.surface() == press.surface)
            .unwrap_or(false);
        if self.active != Some(id) || !on_line || !press.key.is_down() {
            return KeyOutcome::Unhandled;
        }

        let key = &press.key;
        let modifiers = key.modifiers;
        match key.code {
            KeyCode::F10 if modifiers == Modifiers::CTRL => self.clear_row_content(id, key),
            KeyCode::Up if modifiers.is_empty() => self.move_vertical(id, -1),
            KeyCode::Down if modifiers.is_empty() => self.move_vertical(id, 1),
            KeyCode::Enter => self.move_forward(id, key),
            KeyCode::Tab if modifiers.is_empty() || modifiers == Modifiers::CTRL => {
                self.move_forward(id, key)
            }
            KeyCode::Tab if modifiers == Modifiers::SHIFT => self.move_back(id),
            KeyCode::F12 if !modifiers.is_alt() => KeyOutcome::Unhandled,
            _ => self.edit_content(id, key),
        }
    }

    fn caret_field(&self, id: LineId) -> Option<CaretField> {
        let line = self.lines.get(&id)?;
        let caret = self.toolkit.caret()?;
        if caret.surface != line.surface() {
            return None;
        }
        let handle = caret.handle?;
        let (field, _) = line.locate(handle)?;
        Some(CaretField {
            field,
            handle,
            caret,
        })
    }

    fn seek_writable(&self, id: LineId, seek: Seek) -> Option<usize> {
        let line = self.lines.get(&id)?;
        let surface = line.surface();
        let toolkit = &self.toolkit;
        let writable = |field: &Field| toolkit.is_writable(surface, field.primary_handle());
        let fields = line.fields();
        match seek {
            Seek::First => navigate::first_writable(fields, writable),
            Seek::Last => navigate::last_writable(fields, writable),
            Seek::After(index) => navigate::next_writable_after(fields, index, writable),
            Seek::Before(index) => navigate::previous_writable_before(fields, index, writable),
        }
    }

    /// Caret to the end of a field's primary icon, then scroll it into view
    fn enter_field(&mut self, id: LineId, index: usize, align: ScrollAlign) {
        let Some(line) = self.lines.get_mut(&id) else {
            return;
        };
        let (Some(row), Some(field)) = (line.row(), line.field(index)) else {
            return;
        };
        let caret = Caret::in_widget(line.surface(), field.primary_handle(), field.primary().len());
        if let Err(err) = self.toolkit.set_caret(caret) {
            log::warn!("could not move caret: {}", err);
        }
        let (x_min, x_max) = line.field_x_range(index);
        line.client_mut().find_field(row, x_min, x_max, align);
    }

    /// Asks the host for a row and re-places the line there in its current colour
    fn relocate(&mut self, id: LineId, row: usize) -> Option<usize> {
        let accepted = self.lines.get_mut(&id)?.client_mut().place_line(row)?;
        let colour = self.current_colour(id);
        match self.place_line(id, RowTarget::Row(accepted), colour) {
            Ok(()) => Some(accepted),
            Err(err) => {
                log::warn!("could not move edit line to row {}: {}", accepted, err);
                None
            }
        }
    }

    fn move_vertical(&mut self, id: LineId, delta: isize) -> KeyOutcome {
        let Some(at) = self.caret_field(id) else {
            return KeyOutcome::Unhandled;
        };
        let Some(row) = self.row(id) else {
            return KeyOutcome::Unhandled;
        };
        self.refresh_fields(id, IconFilter::Only(at.handle), None);

        let Some(target) = row.checked_add_signed(delta) else {
            return KeyOutcome::Handled;
        };
        let Some(accepted) = self.relocate(id, target) else {
            return KeyOutcome::Handled;
        };

        let Some(line) = self.lines.get(&id) else {
            return KeyOutcome::Handled;
        };
        let length = line.icon(at.handle).map(|icon| icon.len()).unwrap_or(0);
        let caret = Caret {
            surface: line.surface(),
            handle: Some(at.handle),
            index: at.caret.index.min(length),
            y: at.caret.y.map(|y| y.saturating_add(row_offset(row, accepted))),
        };
        if let Err(err) = self.toolkit.set_caret(caret) {
            log::warn!("could not restore caret: {}", err);
        }
        KeyOutcome::Handled
    }

    fn move_forward(&mut self, id: LineId, key: &KeyEvent) -> KeyOutcome {
        let Some(at) = self.caret_field(id) else {
            return KeyOutcome::Unhandled;
        };
        let Some(row) = self.row(id) else {
            return KeyOutcome::Unhandled;
        };

        let copy_modifier = self.config.copy_down_modifier;
        if row > 0 && !copy_modifier.is_empty() && self.toolkit.modifier_held(copy_modifier) {
            if let Some(line) = self.lines.get_mut(&id) {
                line.copy_from_above(at.field, row, key);
            }
        }
        self.refresh_fields(id, IconFilter::Only(at.handle), None);

        if key.code == KeyCode::Enter && self.config.auto_sort_on_return {
            if let Some(line) = self.lines.get_mut(&id) {
                line.client_mut().auto_sort(at.handle);
            }
        }

        if let Some(next) = self.seek_writable(id, Seek::After(at.field)) {
            self.enter_field(id, next, ScrollAlign::Right);
            return KeyOutcome::Handled;
        }
        let Some(first) = self.seek_writable(id, Seek::First) else {
            return KeyOutcome::Handled;
        };

        let destination = match (key.code, self.lines.get_mut(&id)) {
            (KeyCode::Enter, Some(line)) => line.client_mut().first_blank_line(),
            _ => None,
        }
        .unwrap_or(row + 1);
        if self.relocate(id, destination).is_some() {
            self.enter_field(id, first, ScrollAlign::Left);
        }
        KeyOutcome::Handled
    }

    fn move_back(&mut self, id: LineId) -> KeyOutcome {
        let Some(at) = self.caret_field(id) else {
            return KeyOutcome::Unhandled;
        };
        let Some(row) = self.row(id) else {
            return KeyOutcome::Unhandled;
        };
        self.refresh_fields(id, IconFilter::Only(at.handle), None);

        if let Some(previous) = self.seek_writable(id, Seek::Before(at.field)) {
            self.enter_field(id, previous, ScrollAlign::Left);
            return KeyOutcome::Handled;
        }
        let Some(above) = row.checked_sub(1) else {
            return KeyOutcome::Handled;
        };
        if self.relocate(id, above).is_some() {
            if let Some(last) = self.seek_writable(id, Seek::Last) {
                self.enter_field(id, last, ScrollAlign::Right);
            }
        }
        KeyOutcome::Handled
    }

    /// Empties every field of the row, telling the client about each one
    fn clear_row_content(&mut self, id: LineId, key: &KeyEvent) -> KeyOutcome {
        if !self.config.allow_line_delete {
            return KeyOutcome::Unhandled;
        }
        let Some(line) = self.lines.get_mut(&id) else {
            return KeyOutcome::Unhandled;
        };
        let Some(row) = line.row() else {
            return KeyOutcome::Unhandled;
        };
        for index in 0..line.fields().len() {
            if line.clear_field(index, row, key) {
                line.render_field(index, &mut self.toolkit, &self.converters);
            }
        }
        log::debug!("cleared row {}", row);
        KeyOutcome::Handled
    }

    fn edit_content(&mut self, id: LineId, key: &KeyEvent) -> KeyOutcome {
        let Some(at) = self.caret_field(id) else {
            return KeyOutcome::Unhandled;
        };
        let Some(line) = self.lines.get_mut(&id) else {
            return KeyOutcome::Unhandled;
        };
        let Some(row) = line.row() else {
            return KeyOutcome::Unhandled;
        };
        line.edit_field(
            at.field,
            at.handle,
            row,
            key,
            &mut self.toolkit,
            &mut self.converters,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{FakeClient, FakeGrid};
    use crate::convert::SimpleConverters;
    use crate::field::{FieldSpec, IconSpec};
    use crate::geometry::{FixedColumns, LINE_HEIGHT};
    use crate::toolkit::FakeToolkit;
    use crate::transfer::TransferValue;
    use editline_settings::EditLineConfig;
    use editline_types::Colour;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Session = EditSession<FakeToolkit, SimpleConverters>;

    const DATE: WidgetHandle = WidgetHandle(1);
    const REFERENCE: WidgetHandle = WidgetHandle(2);
    const DESCRIPTION: WidgetHandle = WidgetHandle(3);

    struct Fixture {
        session: Session,
        surface: SurfaceId,
        id: LineId,
        grid: Rc<RefCell<FakeGrid>>,
    }

    impl Fixture {
        fn new(config: EditLineConfig) -> Self {
            let mut session = EditSession::new(FakeToolkit::new(), SimpleConverters::new(), config);
            let surface = SurfaceId::new();
            let (client, grid) = FakeClient::new();
            let id = session.create_line(
                surface,
                Box::new(FixedColumns::new(vec![100, 50, 200], 4)),
                0,
                Box::new(client),
            );
            session
                .declare_field(id, FieldSpec::date(0, IconSpec::new(DATE, 10)))
                .unwrap();
            session
                .declare_field(id, FieldSpec::display(1, IconSpec::new(REFERENCE, 8)))
                .unwrap();
            session
                .declare_field(id, FieldSpec::text(2, IconSpec::new(DESCRIPTION, 20)))
                .unwrap();
            Self {
                session,
                surface,
                id,
                grid,
            }
        }

        fn place(&mut self, row: usize) {
            self.session
                .place_line(self.id, RowTarget::Row(row), Colour::BLACK)
                .unwrap();
        }

        fn press(&mut self, key: KeyEvent) -> KeyOutcome {
            let press = KeyPress::new(self.surface, key);
            self.session.process_keypress(self.id, &press)
        }

        fn caret_handle(&self) -> Option<WidgetHandle> {
            self.session.toolkit().caret().and_then(|caret| caret.handle)
        }
    }

    #[test]
    fn test_inactive_line_ignores_keys() {
        let mut fixture = Fixture::new(EditLineConfig::default());
        assert_eq!(fixture.press(KeyEvent::typed('a')), KeyOutcome::Unhandled);
    }

    #[test]
    fn test_tab_skips_display_field() {
        let mut fixture = Fixture::new(EditLineConfig::default());
        fixture.place(2);
        fixture.session.toolkit_mut().focus(fixture.surface, DATE);

        let outcome = fixture.press(KeyEvent::pressed(KeyCode::Tab, Modifiers::NONE));
        assert_eq!(outcome, KeyOutcome::Handled);
        assert_eq!(fixture.caret_handle(), Some(DESCRIPTION));
        assert_eq!(fixture.session.row(fixture.id), Some(2));

        let grid = fixture.grid.borrow();
        let finds = &grid.finds;
        assert_eq!(finds.len(), 1);
        assert_eq!(finds[0].align, ScrollAlign::Right);
        assert_eq!((finds[0].x_min, finds[0].x_max), (158, 358));
    }

    #[test]
    fn test_tab_from_last_field_moves_to_next_row() {
        let mut fixture = Fixture::new(EditLineConfig::default());
        fixture.place(2);
        fixture.session.toolkit_mut().focus(fixture.surface, DESCRIPTION);

        fixture.press(KeyEvent::pressed(KeyCode::Tab, Modifiers::NONE));
        assert_eq!(fixture.session.row(fixture.id), Some(3));
        assert_eq!(fixture.caret_handle(), Some(DATE));
        assert_eq!(fixture.grid.borrow().placements, vec![3]);
        assert!(fixture.grid.borrow().sorts.is_empty());
    }

    #[test]
    fn test_return_without_blank_line_support_moves_down() {
        let mut fixture = Fixture::new(EditLineConfig::default());
        fixture.place(4);
        fixture.session.toolkit_mut().focus(fixture.surface, DESCRIPTION);

        fixture.press(KeyEvent::pressed(KeyCode::Enter, Modifiers::NONE));
        assert_eq!(fixture.session.row(fixture.id), Some(5));
        assert_eq!(fixture.grid.borrow().sorts, vec![DESCRIPTION]);
    }

    #[test]
    fn test_return_with_auto_sort_disabled() {
        let config = EditLineConfig {
            auto_sort_on_return: false,
            ..EditLineConfig::default()
        };
        let mut fixture = Fixture::new(config);
        fixture.place(0);
        fixture.session.toolkit_mut().focus(fixture.surface, DESCRIPTION);

        fixture.press(KeyEvent::pressed(KeyCode::Enter, Modifiers::NONE));
        assert!(fixture.grid.borrow().sorts.is_empty());
    }

    #[test]
    fn test_shift_tab_moves_back_to_previous_row() {
        let mut fixture = Fixture::new(EditLineConfig::default());
        fixture.place(3);
        fixture.session.toolkit_mut().focus(fixture.surface, DATE);

        fixture.press(KeyEvent::pressed(KeyCode::Tab, Modifiers::SHIFT));
        assert_eq!(fixture.session.row(fixture.id), Some(2));
        assert_eq!(fixture.caret_handle(), Some(DESCRIPTION));
    }

    #[test]
    fn test_up_at_top_row_stays_put() {
        let mut fixture = Fixture::new(EditLineConfig::default());
        fixture.place(0);
        fixture.session.toolkit_mut().focus(fixture.surface, DESCRIPTION);

        let outcome = fixture.press(KeyEvent::pressed(KeyCode::Up, Modifiers::NONE));
        assert_eq!(outcome, KeyOutcome::Handled);
        assert_eq!(fixture.session.row(fixture.id), Some(0));
        assert!(fixture.grid.borrow().placements.is_empty());
    }

    #[test]
    fn test_down_keeps_caret_column() {
        let mut fixture = Fixture::new(EditLineConfig::default());
        fixture.grid.borrow_mut().set(
            3,
            DESCRIPTION,
            TransferValue::Text("Electricity".into()),
        );
        fixture.place(2);
        fixture
            .session
            .toolkit_mut()
            .set_caret(Caret {
                surface: fixture.surface,
                handle: Some(DESCRIPTION),
                index: 0,
                y: Some(200),
            })
            .unwrap();

        fixture.press(KeyEvent::pressed(KeyCode::Down, Modifiers::NONE));
        assert_eq!(fixture.session.row(fixture.id), Some(3));
        let caret = fixture.session.toolkit().caret().unwrap();
        assert_eq!(caret.handle, Some(DESCRIPTION));
        assert_eq!(caret.index, 0);
        assert_eq!(caret.y, Some(200 + LINE_HEIGHT));
    }

    #[test]
    fn test_f12_family_is_left_to_host() {
        let mut fixture = Fixture::new(EditLineConfig::default());
        fixture.place(0);
        fixture.session.toolkit_mut().focus(fixture.surface, DESCRIPTION);

        for modifiers in [
            Modifiers::NONE,
            Modifiers::SHIFT,
            Modifiers::CTRL,
            Modifiers::CTRL.with(Modifiers::SHIFT),
        ] {
            assert_eq!(
                fixture.press(KeyEvent::pressed(KeyCode::F12, modifiers)),
                KeyOutcome::Unhandled
            );
        }
    }

    #[test]
    fn test_line_delete_disabled_is_unhandled() {
        let config = EditLineConfig {
            allow_line_delete: false,
            ..EditLineConfig::default()
        };
        let mut fixture = Fixture::new(config);
        fixture
            .grid
            .borrow_mut()
            .set(0, DESCRIPTION, TransferValue::Text("Gas".into()));
        fixture.place(0);
        fixture.session.toolkit_mut().focus(fixture.surface, DESCRIPTION);

        let outcome = fixture.press(KeyEvent::pressed(KeyCode::F10, Modifiers::CTRL));
        assert_eq!(outcome, KeyOutcome::Unhandled);
        assert!(fixture.grid.borrow().puts.is_empty());
    }

    #[test]
    fn test_line_delete_puts_only_non_empty_fields() {
        let mut fixture = Fixture::new(EditLineConfig::default());
        fixture
            .grid
            .borrow_mut()
            .set(0, DESCRIPTION, TransferValue::Text("Gas".into()));
        fixture.place(0);
        fixture.session.toolkit_mut().focus(fixture.surface, DESCRIPTION);

        let outcome = fixture.press(KeyEvent::pressed(KeyCode::F10, Modifiers::CTRL));
        assert_eq!(outcome, KeyOutcome::Handled);
        let grid = fixture.grid.borrow();
        assert_eq!(grid.puts.len(), 1);
        assert_eq!(grid.puts[0].value, TransferValue::Text(String::new()));
        assert_eq!(fixture.session.toolkit().text(fixture.surface, DESCRIPTION), "");
    }
}
