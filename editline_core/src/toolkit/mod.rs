//! Toolkit adapter traits
//!
//! The edit line never draws. Everything it shows goes through a [`Toolkit`]:
//! widgets are created from templates whose handles the host allocated up
//! front, and the caret and modifier state are read back from it.
//!
//! ## Philosophy
//!
//! - **Explicit, not implicit**: All windowing interactions go through one trait
//! - **Minimal surface**: Only what an in-place row editor needs
//! - **Deterministic**: [`FakeToolkit`] records everything for tests

pub mod fake;

pub use fake::{FakeToolkit, FakeWidget};

use crate::error::ToolkitError;
use crate::field::IconRole;
use editline_types::{Colour, Extent, Modifiers, SurfaceId, WidgetHandle};

/// Everything needed to create one widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetTemplate {
    pub surface: SurfaceId,
    /// Handle the host allocated; creation must yield exactly this one
    pub handle: WidgetHandle,
    pub extent: Extent,
    pub colour: Colour,
    pub role: IconRole,
    /// Initial contents
    pub text: String,
    pub capacity: usize,
}

/// Text caret position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caret {
    pub surface: SurfaceId,
    /// Widget holding the caret, `None` when the surface has it but no widget does
    pub handle: Option<WidgetHandle>,
    /// Character index inside the widget
    pub index: usize,
    /// Vertical position, `None` to let the toolkit derive it from the widget
    pub y: Option<i32>,
}

impl Caret {
    /// Caret at `index` inside a widget
    pub fn in_widget(surface: SurfaceId, handle: WidgetHandle, index: usize) -> Self {
        Self {
            surface,
            handle: Some(handle),
            index,
            y: None,
        }
    }
}

/// Windowing layer used by edit lines
pub trait Toolkit {
    /// Creates a widget and returns the handle it was given
    fn create_widget(&mut self, template: &WidgetTemplate) -> Result<WidgetHandle, ToolkitError>;

    /// Removes a widget from its surface
    fn delete_widget(
        &mut self,
        surface: SurfaceId,
        handle: WidgetHandle,
    ) -> Result<(), ToolkitError>;

    /// Current contents of a widget
    fn widget_text(&self, surface: SurfaceId, handle: WidgetHandle) -> Result<String, ToolkitError>;

    /// Replaces the contents of a widget
    fn set_widget_text(
        &mut self,
        surface: SurfaceId,
        handle: WidgetHandle,
        text: &str,
    ) -> Result<(), ToolkitError>;

    fn widget_colour(
        &self,
        surface: SurfaceId,
        handle: WidgetHandle,
    ) -> Result<Colour, ToolkitError>;

    fn set_widget_colour(
        &mut self,
        surface: SurfaceId,
        handle: WidgetHandle,
        colour: Colour,
    ) -> Result<(), ToolkitError>;

    /// Marks a widget for redraw
    fn redraw_widget(
        &mut self,
        surface: SurfaceId,
        handle: WidgetHandle,
    ) -> Result<(), ToolkitError>;

    /// Returns true if the widget can take the caret and be typed into
    fn is_writable(&self, surface: SurfaceId, handle: WidgetHandle) -> bool;

    /// Current caret position, `None` if no surface has it
    fn caret(&self) -> Option<Caret>;

    fn set_caret(&mut self, caret: Caret) -> Result<(), ToolkitError>;

    /// Returns true if every modifier in `modifiers` is physically held
    fn modifier_held(&self, modifiers: Modifiers) -> bool;

    /// Shows a failure to the user
    fn report_error(&mut self, error: &ToolkitError);
}
