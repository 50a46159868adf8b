//! Edit session
//!
//! Owns every edit line of an application together with the toolkit and the
//! converters they share, and enforces that at most one line is active.
//!
//! ## Philosophy
//!
//! - **Single active line**: Placing any line tears the previous one down first
//! - **Observable**: Every activation change lands in an audit trail
//! - **Fail whole**: A placement either creates every widget or none

use crate::client::{EditLineClient, ScrollAlign};
use crate::convert::Converters;
use crate::error::{EditLineError, EditLineResult};
use crate::field::{FieldSpec, IconRole};
use crate::geometry::ColumnLayout;
use crate::line::EditLine;
use crate::snapshot::LineSnapshot;
use crate::toolkit::{Caret, Toolkit};
use editline_settings::EditLineConfig;
use editline_types::{Colour, LineId, SurfaceId, WidgetHandle};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Most recent session events kept in the audit trail
pub const AUDIT_TRAIL_LIMIT: usize = 256;

/// Row to place a line on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowTarget {
    Row(usize),
    /// The row the active line is already on, keeping its colour
    Current,
}

/// Line addressed by a refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTarget {
    Line(LineId),
    /// Whichever line is active
    Active,
}

/// Fields addressed by a refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconFilter {
    All,
    /// Only the field whose primary icon is this one
    Only(WidgetHandle),
}

impl IconFilter {
    fn admits(&self, governing: WidgetHandle) -> bool {
        match self {
            IconFilter::All => true,
            IconFilter::Only(handle) => *handle == governing,
        }
    }
}

/// Activation audit event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    Activated {
        line: LineId,
        row: usize,
        timestamp: u64,
    },
    Deactivated {
        line: LineId,
        timestamp: u64,
    },
    PlacementFailed {
        line: LineId,
        row: usize,
        timestamp: u64,
    },
}

/// Coordinator of all edit lines
pub struct EditSession<T: Toolkit, C: Converters> {
    pub(crate) toolkit: T,
    pub(crate) converters: C,
    pub(crate) config: EditLineConfig,
    pub(crate) lines: HashMap<LineId, EditLine>,
    pub(crate) active: Option<LineId>,
    audit_trail: Vec<SessionEvent>,
    next_timestamp: u64,
}

impl<T: Toolkit, C: Converters> EditSession<T, C> {
    pub fn new(toolkit: T, converters: C, config: EditLineConfig) -> Self {
        Self {
            toolkit,
            converters,
            config,
            lines: HashMap::new(),
            active: None,
            audit_trail: Vec::new(),
            next_timestamp: 0,
        }
    }

    /// Creates an inactive line with no fields
    pub fn create_line(
        &mut self,
        surface: SurfaceId,
        layout: Box<dyn ColumnLayout>,
        toolbar_height: i32,
        client: Box<dyn EditLineClient>,
    ) -> LineId {
        let line = EditLine::new(surface, layout, toolbar_height, client);
        let id = line.id();
        log::debug!("created edit line {} on {}", id, surface);
        self.lines.insert(id, line);
        id
    }

    /// Declares the next field of a line
    pub fn declare_field(&mut self, id: LineId, spec: FieldSpec) -> EditLineResult<()> {
        self.lines
            .get_mut(&id)
            .ok_or(EditLineError::UnknownLine(id))?
            .declare(spec)
    }

    /// Places a line on a row, making it the active line
    ///
    /// Whatever line was active, this one included, is torn down first.
    /// `colour` is ignored for [`RowTarget::Current`], which keeps the colour
    /// the widgets have now.
    pub fn place_line(
        &mut self,
        id: LineId,
        target: RowTarget,
        colour: Colour,
    ) -> EditLineResult<()> {
        let line = self.lines.get(&id).ok_or(EditLineError::UnknownLine(id))?;
        let (row, colour) = match target {
            RowTarget::Row(row) => (row, colour),
            RowTarget::Current => match (self.active == Some(id), line.row()) {
                (true, Some(row)) => (row, self.current_colour(id)),
                _ => return Err(EditLineError::NotActive(id)),
            },
        };

        self.deactivate();
        self.activate(id, row, colour)
    }

    fn activate(&mut self, id: LineId, row: usize, colour: Colour) -> EditLineResult<()> {
        let line = self
            .lines
            .get_mut(&id)
            .ok_or(EditLineError::UnknownLine(id))?;
        line.begin_placement(row, colour);

        let created = line.create_widgets(&mut self.toolkit);
        if let Err(err) = created {
            line.clear_row();
            log::error!("could not place edit line {} on row {}: {}", id, row, err);
            self.toolkit.report_error(&err);
            let timestamp = self.tick();
            self.record(SessionEvent::PlacementFailed {
                line: id,
                row,
                timestamp,
            });
            return Err(err.into());
        }

        self.active = Some(id);
        line.load_content(&mut self.toolkit, &self.converters);
        let timestamp = self.tick();
        self.record(SessionEvent::Activated {
            line: id,
            row,
            timestamp,
        });
        log::debug!("edit line {} active on row {}", id, row);
        Ok(())
    }

    /// Tears down the active line, if any
    pub(crate) fn deactivate(&mut self) {
        let Some(previous) = self.active.take() else {
            return;
        };
        if let Some(line) = self.lines.get_mut(&previous) {
            line.delete_widgets(&mut self.toolkit);
            line.clear_row();
        }
        let timestamp = self.tick();
        self.record(SessionEvent::Deactivated {
            line: previous,
            timestamp,
        });
    }

    /// Re-reads fields from the client and redraws them
    ///
    /// Does nothing unless the line is active on a row the client accepts.
    /// A field is refreshed when any of its icons passes `only`, and skipped
    /// when any of them is `avoid`.
    pub fn refresh_line(
        &mut self,
        target: LineTarget,
        only: IconFilter,
        avoid: Option<WidgetHandle>,
    ) {
        let id = match target {
            LineTarget::Line(id) => id,
            LineTarget::Active => match self.active {
                Some(id) => id,
                None => return,
            },
        };
        self.refresh_fields(id, only, avoid);
    }

    pub(crate) fn refresh_fields(
        &mut self,
        id: LineId,
        only: IconFilter,
        avoid: Option<WidgetHandle>,
    ) {
        if self.active != Some(id) {
            return;
        }
        let Some(line) = self.lines.get_mut(&id) else {
            return;
        };
        let Some(row) = line.row() else {
            return;
        };
        if !line.client_mut().test_line(row) {
            log::debug!("row {} rejected for refresh", row);
            return;
        }

        for index in 0..line.fields().len() {
            let Some(field) = line.field(index) else {
                continue;
            };
            let governing = field.primary_handle();
            let admitted = only.admits(governing);
            let avoided = avoid == Some(governing);
            if !admitted || avoided {
                continue;
            }
            line.fetch_into_cache(index, row);
            line.render_field(index, &mut self.toolkit, &self.converters);
        }
    }

    /// Colour the active line's widgets are drawn in
    pub(crate) fn current_colour(&self, id: LineId) -> Colour {
        let Some(line) = self.lines.get(&id) else {
            return Colour::default();
        };
        if self.active != Some(id) {
            return line.colour();
        }
        line.first_handle()
            .and_then(|handle| self.toolkit.widget_colour(line.surface(), handle).ok())
            .unwrap_or_else(|| line.colour())
    }

    /// Changes a line's colour, recolouring live widgets
    pub fn set_line_colour(&mut self, id: LineId, colour: Colour) -> EditLineResult<()> {
        let active = self.active == Some(id);
        let line = self
            .lines
            .get_mut(&id)
            .ok_or(EditLineError::UnknownLine(id))?;
        line.set_colour(colour);
        if !active {
            return Ok(());
        }
        let surface = line.surface();
        let handles: Vec<WidgetHandle> = line.handles().collect();
        let mut failure = None;
        for handle in handles {
            let recoloured = self
                .toolkit
                .set_widget_colour(surface, handle, colour)
                .and_then(|()| self.toolkit.redraw_widget(surface, handle));
            if let Err(err) = recoloured {
                log::warn!("could not recolour widget {}: {}", handle, err);
                failure.get_or_insert(err);
            }
        }
        match failure {
            Some(err) => {
                self.toolkit.report_error(&err);
                Err(err.into())
            }
            None => Ok(()),
        }
    }

    /// Handles a click on an account field's reconciliation mark
    ///
    /// Toggles the flag, redraws the field and Puts the new value. Returns
    /// false when the line is inactive, `handle` is not a reconciliation mark
    /// or the field has no account yet.
    pub fn toggle_reconciled(&mut self, id: LineId, handle: WidgetHandle) -> bool {
        if self.active != Some(id) {
            return false;
        }
        let Some(line) = self.lines.get_mut(&id) else {
            return false;
        };
        let Some(row) = line.row() else {
            return false;
        };
        let role = line.icon(handle).map(|icon| icon.role());
        let is_mark = role == Some(IconRole::AccountReconciled);
        let Some((field, _)) = line.locate(handle).filter(|_| is_mark) else {
            return false;
        };
        if !line.toggle_reconciled(field, row) {
            return false;
        }
        line.render_field(field, &mut self.toolkit, &self.converters);
        true
    }

    /// Puts the caret at the end of an icon of the active line and scrolls it into view
    ///
    /// Returns false when the line is not active or does not own `handle`.
    pub fn put_caret_at_end(&mut self, id: LineId, handle: WidgetHandle) -> EditLineResult<bool> {
        if self.active != Some(id) {
            return Ok(false);
        }
        let line = self
            .lines
            .get_mut(&id)
            .ok_or(EditLineError::UnknownLine(id))?;
        let (Some(row), Some((field, _))) = (line.row(), line.locate(handle)) else {
            return Ok(false);
        };
        let index = line.icon(handle).map(|icon| icon.len()).unwrap_or(0);
        self.toolkit
            .set_caret(Caret::in_widget(line.surface(), handle, index))?;
        let (x_min, x_max) = line.field_x_range(field);
        line.client_mut()
            .find_field(row, x_min, x_max, ScrollAlign::Left);
        Ok(true)
    }

    /// Forgets a line
    ///
    /// Widgets are left to the host, which destroys them with the surface.
    pub fn delete_line(&mut self, id: LineId) -> bool {
        if self.lines.remove(&id).is_none() {
            return false;
        }
        if self.active == Some(id) {
            self.active = None;
            let timestamp = self.tick();
            self.record(SessionEvent::Deactivated {
                line: id,
                timestamp,
            });
        }
        true
    }

    /// Row of a line, set only while it is active
    pub fn row(&self, id: LineId) -> Option<usize> {
        self.lines.get(&id).and_then(EditLine::row)
    }

    pub fn is_active(&self, id: LineId) -> bool {
        self.active == Some(id)
    }

    /// Returns false for unknown lines and after a failed declaration
    pub fn is_complete(&self, id: LineId) -> bool {
        self.lines.get(&id).map(EditLine::is_complete).unwrap_or(false)
    }

    pub fn active_line(&self) -> Option<LineId> {
        self.active
    }

    /// Line drawn on a surface
    pub fn line_for_surface(&self, surface: SurfaceId) -> Option<LineId> {
        if let Some(active) = self.active {
            if self.lines.get(&active).map(EditLine::surface) == Some(surface) {
                return Some(active);
            }
        }
        self.lines
            .values()
            .find(|line| line.surface() == surface)
            .map(EditLine::id)
    }

    pub fn snapshot(&self, id: LineId) -> Option<LineSnapshot> {
        let line = self.lines.get(&id)?;
        Some(LineSnapshot::capture(line, self.active == Some(id)))
    }

    /// Activation history, oldest first, capped at [`AUDIT_TRAIL_LIMIT`] events
    pub fn audit_trail(&self) -> &[SessionEvent] {
        &self.audit_trail
    }

    pub fn clear_audit_trail(&mut self) {
        self.audit_trail.clear();
    }

    pub fn toolkit(&self) -> &T {
        &self.toolkit
    }

    pub fn toolkit_mut(&mut self) -> &mut T {
        &mut self.toolkit
    }

    pub fn converters(&self) -> &C {
        &self.converters
    }

    pub fn converters_mut(&mut self) -> &mut C {
        &mut self.converters
    }

    pub fn config(&self) -> &EditLineConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EditLineConfig) {
        self.config = config;
    }

    fn record(&mut self, event: SessionEvent) {
        if self.audit_trail.len() >= AUDIT_TRAIL_LIMIT {
            let excess = self.audit_trail.len() + 1 - AUDIT_TRAIL_LIMIT;
            self.audit_trail.drain(..excess);
        }
        self.audit_trail.push(event);
    }

    fn tick(&mut self) -> u64 {
        let timestamp = self.next_timestamp;
        self.next_timestamp += 1;
        timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{FakeClient, FakeGrid};
    use crate::convert::SimpleConverters;
    use crate::error::ToolkitError;
    use crate::field::IconSpec;
    use crate::geometry::FixedColumns;
    use crate::toolkit::FakeToolkit;
    use crate::transfer::TransferValue;
    use editline_types::{AccountId, AccountValue};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Session = EditSession<FakeToolkit, SimpleConverters>;

    fn session() -> Session {
        EditSession::new(
            FakeToolkit::new(),
            SimpleConverters::new(),
            EditLineConfig::default(),
        )
    }

    fn text_line(session: &mut Session, surface: SurfaceId) -> (LineId, Rc<RefCell<FakeGrid>>) {
        let (client, grid) = FakeClient::new();
        let id = session.create_line(
            surface,
            Box::new(FixedColumns::new(vec![100, 100], 0)),
            0,
            Box::new(client),
        );
        session
            .declare_field(id, FieldSpec::text(0, IconSpec::new(WidgetHandle(1), 10)))
            .unwrap();
        session
            .declare_field(id, FieldSpec::currency(1, IconSpec::new(WidgetHandle(2), 12)))
            .unwrap();
        (id, grid)
    }

    #[test]
    fn test_placement_creates_widgets_and_loads_values() {
        let mut session = session();
        let surface = SurfaceId::new();
        let (id, grid) = text_line(&mut session, surface);
        grid.borrow_mut()
            .set(2, WidgetHandle(1), TransferValue::Text("Rent".into()));

        session.place_line(id, RowTarget::Row(2), Colour::BLACK).unwrap();

        assert!(session.is_active(id));
        assert_eq!(session.row(id), Some(2));
        assert_eq!(session.toolkit().widget_count(surface), 2);
        assert_eq!(session.toolkit().text(surface, WidgetHandle(1)), "Rent");
        assert_eq!(session.toolkit().text(surface, WidgetHandle(2)), "0.00");
    }

    #[test]
    fn test_only_one_line_is_active() {
        let mut session = session();
        let first_surface = SurfaceId::new();
        let second_surface = SurfaceId::new();
        let (first, _) = text_line(&mut session, first_surface);
        let (second, _) = text_line(&mut session, second_surface);

        session.place_line(first, RowTarget::Row(0), Colour::BLACK).unwrap();
        session.place_line(second, RowTarget::Row(4), Colour::BLACK).unwrap();

        assert!(!session.is_active(first));
        assert!(session.is_active(second));
        assert_eq!(session.row(first), None);
        assert_eq!(session.toolkit().widget_count(first_surface), 0);
        assert_eq!(session.toolkit().widget_count(second_surface), 2);
    }

    #[test]
    fn test_replacing_same_line_tears_down_first() {
        let mut session = session();
        let surface = SurfaceId::new();
        let (id, _) = text_line(&mut session, surface);

        session.place_line(id, RowTarget::Row(0), Colour::BLACK).unwrap();
        session.toolkit_mut().clear_history();
        session.place_line(id, RowTarget::Row(1), Colour::BLACK).unwrap();

        assert_eq!(session.toolkit().deleted(), &[WidgetHandle(1), WidgetHandle(2)]);
        assert_eq!(session.toolkit().created(), &[WidgetHandle(1), WidgetHandle(2)]);
        assert_eq!(session.toolkit().widget_count(surface), 2);
    }

    #[test]
    fn test_failed_placement_leaves_nothing_behind() {
        let mut session = session();
        let surface = SurfaceId::new();
        let (id, _) = text_line(&mut session, surface);
        session.toolkit_mut().fail_creation_of(WidgetHandle(2));

        let result = session.place_line(id, RowTarget::Row(0), Colour::BLACK);

        assert!(matches!(result, Err(EditLineError::Toolkit(_))));
        assert!(!session.is_active(id));
        assert_eq!(session.row(id), None);
        assert_eq!(session.toolkit().widget_count(surface), 0);
        assert_eq!(session.toolkit().reported_errors().len(), 1);
        assert!(matches!(
            session.audit_trail().last(),
            Some(SessionEvent::PlacementFailed { row: 0, .. })
        ));
    }

    #[test]
    fn test_handle_mismatch_fails_placement() {
        let mut session = session();
        let surface = SurfaceId::new();
        let (id, _) = text_line(&mut session, surface);
        session
            .toolkit_mut()
            .remap_creation_of(WidgetHandle(1), WidgetHandle(40));

        let result = session.place_line(id, RowTarget::Row(0), Colour::BLACK);
        assert_eq!(
            result,
            Err(EditLineError::Toolkit(crate::error::ToolkitError::HandleMismatch {
                expected: WidgetHandle(1),
                actual: WidgetHandle(40),
            }))
        );
        assert_eq!(session.toolkit().widget_count(surface), 0);
    }

    #[test]
    fn test_current_placement_requires_active_line() {
        let mut session = session();
        let (id, _) = text_line(&mut session, SurfaceId::new());
        assert_eq!(
            session.place_line(id, RowTarget::Current, Colour::BLACK),
            Err(EditLineError::NotActive(id))
        );
    }

    #[test]
    fn test_declaration_closes_after_placement() {
        let mut session = session();
        let (id, _) = text_line(&mut session, SurfaceId::new());
        session.place_line(id, RowTarget::Row(0), Colour::BLACK).unwrap();
        assert_eq!(
            session.declare_field(id, FieldSpec::date(2, IconSpec::new(WidgetHandle(3), 10))),
            Err(EditLineError::SetupClosed)
        );
    }

    #[test]
    fn test_refresh_skips_rejected_row() {
        let mut session = session();
        let surface = SurfaceId::new();
        let (id, grid) = text_line(&mut session, surface);
        session.place_line(id, RowTarget::Row(5), Colour::BLACK).unwrap();

        grid.borrow_mut().clear_history();
        grid.borrow_mut().row_limit = Some(5);
        session.refresh_line(LineTarget::Active, IconFilter::All, None);
        assert!(grid.borrow().gets.is_empty());

        grid.borrow_mut().row_limit = None;
        session.refresh_line(LineTarget::Line(id), IconFilter::All, Some(WidgetHandle(2)));
        assert_eq!(grid.borrow().gets, vec![(5, WidgetHandle(1))]);
    }

    fn account_line(session: &mut Session, surface: SurfaceId) -> (LineId, Rc<RefCell<FakeGrid>>) {
        let (client, grid) = FakeClient::new();
        let id = session.create_line(
            surface,
            Box::new(FixedColumns::new(vec![60, 20, 120], 0)),
            0,
            Box::new(client),
        );
        session
            .declare_field(
                id,
                FieldSpec::account_in(
                    0,
                    IconSpec::new(WidgetHandle(1), 4),
                    IconSpec::new(WidgetHandle(2), 1),
                    IconSpec::new(WidgetHandle(3), 20),
                ),
            )
            .unwrap();
        (id, grid)
    }

    #[test]
    fn test_refresh_filters_on_primary_icon() {
        let mut session = session();
        let surface = SurfaceId::new();
        let (id, grid) = account_line(&mut session, surface);
        session.place_line(id, RowTarget::Row(2), Colour::BLACK).unwrap();
        grid.borrow_mut().clear_history();

        session.refresh_line(LineTarget::Active, IconFilter::Only(WidgetHandle(3)), None);
        assert!(grid.borrow().gets.is_empty());

        session.refresh_line(LineTarget::Active, IconFilter::All, Some(WidgetHandle(2)));
        assert_eq!(grid.borrow().gets, vec![(2, WidgetHandle(1))]);

        grid.borrow_mut().clear_history();
        session.refresh_line(LineTarget::Active, IconFilter::Only(WidgetHandle(1)), None);
        assert_eq!(grid.borrow().gets, vec![(2, WidgetHandle(1))]);
    }

    #[test]
    fn test_toggle_reconciled_needs_active_mark_with_account() {
        let mut session = session();
        let surface = SurfaceId::new();
        let (id, grid) = account_line(&mut session, surface);
        assert!(!session.toggle_reconciled(id, WidgetHandle(2)));

        session.place_line(id, RowTarget::Row(0), Colour::BLACK).unwrap();
        assert!(!session.toggle_reconciled(id, WidgetHandle(2)));
        assert!(grid.borrow().puts.is_empty());

        grid.borrow_mut().set(
            1,
            WidgetHandle(1),
            TransferValue::AccountIn(AccountValue::new(AccountId(9), false)),
        );
        session.place_line(id, RowTarget::Row(1), Colour::BLACK).unwrap();
        assert!(!session.toggle_reconciled(id, WidgetHandle(1)));
        assert!(session.toggle_reconciled(id, WidgetHandle(2)));

        let grid = grid.borrow();
        assert_eq!(grid.puts.len(), 1);
        assert_eq!(
            grid.puts[0].value,
            TransferValue::AccountIn(AccountValue::new(AccountId(9), true))
        );
        assert_eq!(grid.puts[0].key, None);
        assert_eq!(session.toolkit().text(surface, WidgetHandle(2)), "*");
    }

    #[test]
    fn test_set_line_colour_recolours_past_a_failed_widget() {
        let mut session = session();
        let surface = SurfaceId::new();
        let (id, _) = text_line(&mut session, surface);
        session.place_line(id, RowTarget::Row(0), Colour::BLACK).unwrap();
        session.toolkit_mut().delete_widget(surface, WidgetHandle(1)).unwrap();

        let result = session.set_line_colour(id, Colour::RED);

        assert_eq!(
            result,
            Err(EditLineError::Toolkit(ToolkitError::NoSuchWidget(WidgetHandle(1))))
        );
        assert_eq!(session.toolkit().widget(surface, WidgetHandle(2)).unwrap().colour, Colour::RED);
        assert_eq!(session.toolkit().reported_errors().len(), 1);
    }

    #[test]
    fn test_delete_active_line_clears_slot() {
        let mut session = session();
        let surface = SurfaceId::new();
        let (id, _) = text_line(&mut session, surface);
        session.place_line(id, RowTarget::Row(0), Colour::BLACK).unwrap();
        session.toolkit_mut().clear_history();

        assert!(session.delete_line(id));
        assert_eq!(session.active_line(), None);
        assert!(session.toolkit().deleted().is_empty());
        assert!(!session.delete_line(id));
    }

    #[test]
    fn test_line_for_surface_prefers_active() {
        let mut session = session();
        let surface = SurfaceId::new();
        let (first, _) = text_line(&mut session, surface);
        let (second, _) = text_line(&mut session, surface);
        session.place_line(second, RowTarget::Row(0), Colour::BLACK).unwrap();

        assert_eq!(session.line_for_surface(surface), Some(second));
        assert!(session.line_for_surface(SurfaceId::new()).is_none());
        assert_ne!(first, second);
    }

    #[test]
    fn test_set_line_colour_recolours_widgets() {
        let mut session = session();
        let surface = SurfaceId::new();
        let (id, _) = text_line(&mut session, surface);
        session.place_line(id, RowTarget::Row(0), Colour::BLACK).unwrap();

        session.set_line_colour(id, Colour::RED).unwrap();
        let widget = session.toolkit().widget(surface, WidgetHandle(2)).unwrap();
        assert_eq!(widget.colour, Colour::RED);
    }

    #[test]
    fn test_put_caret_at_end() {
        let mut session = session();
        let surface = SurfaceId::new();
        let (id, grid) = text_line(&mut session, surface);
        grid.borrow_mut()
            .set(0, WidgetHandle(1), TransferValue::Text("Food".into()));
        session.place_line(id, RowTarget::Row(0), Colour::BLACK).unwrap();

        assert!(session.put_caret_at_end(id, WidgetHandle(1)).unwrap());
        let caret = session.toolkit().caret().unwrap();
        assert_eq!(caret.handle, Some(WidgetHandle(1)));
        assert_eq!(caret.index, 4);
        assert_eq!(grid.borrow().finds.len(), 1);
        assert!(!session.put_caret_at_end(id, WidgetHandle(99)).unwrap());
    }

    #[test]
    fn test_audit_trail_records_activation_order() {
        let mut session = session();
        let (first, _) = text_line(&mut session, SurfaceId::new());
        let (second, _) = text_line(&mut session, SurfaceId::new());
        session.place_line(first, RowTarget::Row(0), Colour::BLACK).unwrap();
        session.place_line(second, RowTarget::Row(1), Colour::BLACK).unwrap();

        let trail = session.audit_trail();
        assert_eq!(trail.len(), 3);
        assert!(matches!(trail[0], SessionEvent::Activated { line, .. } if line == first));
        assert!(matches!(trail[1], SessionEvent::Deactivated { line, .. } if line == first));
        assert!(matches!(trail[2], SessionEvent::Activated { line, row: 1, .. } if line == second));
    }

    #[test]
    fn test_audit_trail_keeps_only_recent_events() {
        let mut session = session();
        let (id, _) = text_line(&mut session, SurfaceId::new());
        for row in 0..AUDIT_TRAIL_LIMIT {
            session.place_line(id, RowTarget::Row(row), Colour::BLACK).unwrap();
        }

        let trail = session.audit_trail();
        assert_eq!(trail.len(), AUDIT_TRAIL_LIMIT);
        let last_row = AUDIT_TRAIL_LIMIT - 1;
        assert!(matches!(
            trail.last(),
            Some(SessionEvent::Activated { row, .. }) if *row == last_row
        ));
        // Timestamps keep counting across dropped events.
        let oldest = (AUDIT_TRAIL_LIMIT - 1) as u64;
        assert!(matches!(
            trail.first(),
            Some(SessionEvent::Deactivated { timestamp, .. }) if *timestamp == oldest
        ));

        session.clear_audit_trail();
        assert!(session.audit_trail().is_empty());
        session.place_line(id, RowTarget::Row(3), Colour::BLACK).unwrap();
        assert_eq!(session.audit_trail().len(), 2);
    }
}
