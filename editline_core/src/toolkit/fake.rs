//! Fake toolkit implementation for testing
//!
//! Keeps widgets in memory and logs every creation and deletion so tests can
//! assert on exactly what an edit line did to the surface.

use super::{Caret, Toolkit, WidgetTemplate};
use crate::error::ToolkitError;
use crate::field::IconRole;
use editline_types::{Colour, Extent, Modifiers, SurfaceId, WidgetHandle};
use std::collections::{HashMap, HashSet};

/// An in-memory widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeWidget {
    pub text: String,
    pub colour: Colour,
    pub extent: Extent,
    pub role: IconRole,
    pub capacity: usize,
    pub redraws: usize,
}

/// Fake toolkit for testing
#[derive(Debug, Default)]
pub struct FakeToolkit {
    widgets: HashMap<(SurfaceId, WidgetHandle), FakeWidget>,
    caret: Option<Caret>,
    held: Modifiers,
    read_only: HashSet<WidgetHandle>,
    failing: HashSet<WidgetHandle>,
    remapped: HashMap<WidgetHandle, WidgetHandle>,
    created: Vec<WidgetHandle>,
    deleted: Vec<WidgetHandle>,
    errors: Vec<ToolkitError>,
}

impl FakeToolkit {
    /// Creates a new fake toolkit with no widgets
    pub fn new() -> Self {
        Self::default()
    }

    pub fn widget(&self, surface: SurfaceId, handle: WidgetHandle) -> Option<&FakeWidget> {
        self.widgets.get(&(surface, handle))
    }

    /// Widget contents, empty if the widget does not exist
    pub fn text(&self, surface: SurfaceId, handle: WidgetHandle) -> &str {
        self.widget(surface, handle)
            .map(|widget| widget.text.as_str())
            .unwrap_or("")
    }

    /// Number of live widgets on a surface
    pub fn widget_count(&self, surface: SurfaceId) -> usize {
        self.widgets.keys().filter(|(s, _)| *s == surface).count()
    }

    /// Simulates the user typing: replaces widget text and parks the caret at its end
    pub fn type_into(&mut self, surface: SurfaceId, handle: WidgetHandle, text: &str) {
        if let Some(widget) = self.widgets.get_mut(&(surface, handle)) {
            widget.text = text.chars().take(widget.capacity).collect();
            let index = widget.text.chars().count();
            self.caret = Some(Caret {
                surface,
                handle: Some(handle),
                index,
                y: Some(widget.extent.y0),
            });
        }
    }

    /// Places the caret at the end of a widget
    pub fn focus(&mut self, surface: SurfaceId, handle: WidgetHandle) {
        if let Some(widget) = self.widgets.get(&(surface, handle)) {
            self.caret = Some(Caret {
                surface,
                handle: Some(handle),
                index: widget.text.chars().count(),
                y: Some(widget.extent.y0),
            });
        }
    }

    /// Sets the physically held modifiers
    pub fn hold(&mut self, modifiers: Modifiers) {
        self.held = modifiers;
    }

    /// Makes a widget refuse the caret
    pub fn mark_read_only(&mut self, handle: WidgetHandle) {
        self.read_only.insert(handle);
    }

    /// Makes creation of a widget fail
    pub fn fail_creation_of(&mut self, handle: WidgetHandle) {
        self.failing.insert(handle);
    }

    /// Makes creation of `handle` yield `actual` instead
    pub fn remap_creation_of(&mut self, handle: WidgetHandle, actual: WidgetHandle) {
        self.remapped.insert(handle, actual);
    }

    /// Handles passed to successful creations, in order
    pub fn created(&self) -> &[WidgetHandle] {
        &self.created
    }

    /// Handles of deleted widgets, in order
    pub fn deleted(&self) -> &[WidgetHandle] {
        &self.deleted
    }

    /// Errors shown to the user
    pub fn reported_errors(&self) -> &[ToolkitError] {
        &self.errors
    }

    /// Forgets creation and deletion history
    pub fn clear_history(&mut self) {
        self.created.clear();
        self.deleted.clear();
    }

    fn widget_mut(
        &mut self,
        surface: SurfaceId,
        handle: WidgetHandle,
    ) -> Result<&mut FakeWidget, ToolkitError> {
        self.widgets
            .get_mut(&(surface, handle))
            .ok_or(ToolkitError::NoSuchWidget(handle))
    }
}

impl Toolkit for FakeToolkit {
    fn create_widget(&mut self, template: &WidgetTemplate) -> Result<WidgetHandle, ToolkitError> {
        if self.failing.contains(&template.handle) {
            return Err(ToolkitError::CreateFailed {
                handle: template.handle,
                reason: "simulated failure".to_string(),
            });
        }
        let actual = self
            .remapped
            .get(&template.handle)
            .copied()
            .unwrap_or(template.handle);
        if self.widgets.contains_key(&(template.surface, actual)) {
            return Err(ToolkitError::CreateFailed {
                handle: actual,
                reason: "handle already in use".to_string(),
            });
        }
        self.widgets.insert(
            (template.surface, actual),
            FakeWidget {
                text: template.text.chars().take(template.capacity).collect(),
                colour: template.colour,
                extent: template.extent,
                role: template.role,
                capacity: template.capacity,
                redraws: 0,
            },
        );
        self.created.push(actual);
        Ok(actual)
    }

    fn delete_widget(
        &mut self,
        surface: SurfaceId,
        handle: WidgetHandle,
    ) -> Result<(), ToolkitError> {
        self.widgets
            .remove(&(surface, handle))
            .ok_or(ToolkitError::NoSuchWidget(handle))?;
        self.deleted.push(handle);
        Ok(())
    }

    fn widget_text(
        &self,
        surface: SurfaceId,
        handle: WidgetHandle,
    ) -> Result<String, ToolkitError> {
        self.widget(surface, handle)
            .map(|widget| widget.text.clone())
            .ok_or(ToolkitError::NoSuchWidget(handle))
    }

    fn set_widget_text(
        &mut self,
        surface: SurfaceId,
        handle: WidgetHandle,
        text: &str,
    ) -> Result<(), ToolkitError> {
        let widget = self.widget_mut(surface, handle)?;
        widget.text = text.chars().take(widget.capacity).collect();
        Ok(())
    }

    fn widget_colour(
        &self,
        surface: SurfaceId,
        handle: WidgetHandle,
    ) -> Result<Colour, ToolkitError> {
        self.widget(surface, handle)
            .map(|widget| widget.colour)
            .ok_or(ToolkitError::NoSuchWidget(handle))
    }

    fn set_widget_colour(
        &mut self,
        surface: SurfaceId,
        handle: WidgetHandle,
        colour: Colour,
    ) -> Result<(), ToolkitError> {
        self.widget_mut(surface, handle)?.colour = colour;
        Ok(())
    }

    fn redraw_widget(
        &mut self,
        surface: SurfaceId,
        handle: WidgetHandle,
    ) -> Result<(), ToolkitError> {
        self.widget_mut(surface, handle)?.redraws += 1;
        Ok(())
    }

    fn is_writable(&self, surface: SurfaceId, handle: WidgetHandle) -> bool {
        !self.read_only.contains(&handle)
            && self
                .widget(surface, handle)
                .map(|widget| widget.role.accepts_input())
                .unwrap_or(false)
    }

    fn caret(&self) -> Option<Caret> {
        self.caret
    }

    fn set_caret(&mut self, mut caret: Caret) -> Result<(), ToolkitError> {
        if let Some(handle) = caret.handle {
            let widget = self
                .widget(caret.surface, handle)
                .ok_or(ToolkitError::NoSuchWidget(handle))?;
            caret.index = caret.index.min(widget.text.chars().count());
            if caret.y.is_none() {
                caret.y = Some(widget.extent.y0);
            }
        }
        self.caret = Some(caret);
        Ok(())
    }

    fn modifier_held(&self, modifiers: Modifiers) -> bool {
        !modifiers.is_empty() && self.held.contains(modifiers)
    }

    fn report_error(&mut self, error: &ToolkitError) {
        self.errors.push(error.clone());
    }
}
