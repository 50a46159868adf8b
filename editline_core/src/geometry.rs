//! Row geometry
//!
//! Rows are laid out top-down below the host's toolbar, one fixed-height
//! slot per row. Horizontal placement comes from the host's column layout.

use editline_types::Extent;

/// Height of one grid row
pub const LINE_HEIGHT: i32 = 56;
/// Height of an edit icon inside its row
pub const ICON_HEIGHT: i32 = 48;
/// Space between the top of a row and its icons
pub const LINE_GUTTER: i32 = (LINE_HEIGHT - ICON_HEIGHT) / 2;

/// Horizontal extents of the host's columns
pub trait ColumnLayout {
    /// Left and right edge of a column
    fn x_extent(&self, column: usize) -> (i32, i32);
}

/// Columns of fixed widths separated by a constant gap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedColumns {
    widths: Vec<i32>,
    gap: i32,
}

impl FixedColumns {
    pub fn new(widths: Vec<i32>, gap: i32) -> Self {
        Self { widths, gap }
    }
}

impl ColumnLayout for FixedColumns {
    fn x_extent(&self, column: usize) -> (i32, i32) {
        let x0 = self
            .widths
            .iter()
            .take(column)
            .fold(0i32, |x, width| x.saturating_add(*width).saturating_add(self.gap));
        let width = self.widths.get(column).copied().unwrap_or(0);
        (x0, x0.saturating_add(width))
    }
}

/// Top of a row's slot
pub fn row_top(row: usize, toolbar_height: i32) -> i32 {
    let row = i32::try_from(row).unwrap_or(i32::MAX);
    toolbar_height.saturating_add(row.saturating_mul(LINE_HEIGHT))
}

/// Extent of an icon in `column` on `row`
pub fn icon_extent(
    layout: &dyn ColumnLayout,
    column: usize,
    row: usize,
    toolbar_height: i32,
) -> Extent {
    let (x0, x1) = layout.x_extent(column);
    let y0 = row_top(row, toolbar_height).saturating_add(LINE_GUTTER);
    Extent::new(x0, y0, x1, y0.saturating_add(ICON_HEIGHT))
}

/// Vertical distance between two rows
pub fn row_offset(from: usize, to: usize) -> i32 {
    row_top(to, 0).saturating_sub(row_top(from, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_columns() {
        let layout = FixedColumns::new(vec![100, 200, 50], 4);
        assert_eq!(layout.x_extent(0), (0, 100));
        assert_eq!(layout.x_extent(1), (104, 304));
        assert_eq!(layout.x_extent(2), (308, 358));
    }

    #[test]
    fn test_column_beyond_layout_has_no_width() {
        let layout = FixedColumns::new(vec![100], 0);
        let (x0, x1) = layout.x_extent(3);
        assert_eq!(x0, x1);
    }

    #[test]
    fn test_icon_extent_for_row() {
        let layout = FixedColumns::new(vec![100, 200], 0);
        let extent = icon_extent(&layout, 1, 2, 40);
        assert_eq!(extent.x0, 100);
        assert_eq!(extent.y0, 40 + 2 * LINE_HEIGHT + LINE_GUTTER);
        assert_eq!(extent.height(), ICON_HEIGHT);
    }

    #[test]
    fn test_row_offset() {
        assert_eq!(row_offset(3, 4), LINE_HEIGHT);
        assert_eq!(row_offset(4, 3), -LINE_HEIGHT);
    }
}
