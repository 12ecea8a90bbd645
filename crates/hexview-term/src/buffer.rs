// SPDX-License-Identifier: MIT
//
// FrameBuffer: the 2D grid of cells that represents one frame.
//
// The application paints into a FrameBuffer, the diff renderer compares it
// against the previous one and emits only the changed cells. Painting is
// always clipped to the grid; writes outside it are silently dropped.
//
// Text painting keeps the grid one-character-per-column: zero-width
// characters are skipped and double-width characters are replaced with
// `?`, so every column of the hex layout stays where the view put it.

use unicode_width::UnicodeWidthChar;

use crate::cell::{Cell, Style};

/// Stand-in for characters that would take more than one column.
const WIDE_PLACEHOLDER: char = '?';

/// A 2D grid of terminal cells.
///
/// Flat `Vec<Cell>` with row-major indexing: `index = y * width + x`.
///
/// # Examples
///
/// ```
/// use hexview_term::buffer::FrameBuffer;
/// use hexview_term::cell::Cell;
///
/// let mut buf = FrameBuffer::new(80, 24);
/// assert_eq!(buf.width(), 80);
/// assert_eq!(buf.height(), 24);
///
/// buf.set(5, 3, Cell::new('X'));
/// assert_eq!(buf.get(5, 3).map(|c| c.ch), Some('X'));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    // ─── Construction ────────────────────────────────────────────────────

    /// Create a buffer filled with empty cells.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        let size = usize::from(width) * usize::from(height);
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; size],
        }
    }

    // ─── Dimensions ──────────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    const fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    // ─── Cell Access ─────────────────────────────────────────────────────

    /// The cell at `(x, y)`, or `None` out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            self.cells.get(self.index(x, y))
        } else {
            None
        }
    }

    /// Write a cell. Returns `true` if the position was in bounds.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let idx = self.index(x, y);
        self.cells[idx] = cell;
        true
    }

    /// One row of cells as a slice. Empty for `y` out of bounds.
    #[must_use]
    pub fn row(&self, y: u16) -> &[Cell] {
        if y >= self.height {
            return &[];
        }
        let start = self.index(0, y);
        &self.cells[start..start + usize::from(self.width)]
    }

    /// The characters of one row as a `String`. Handy in tests.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        self.row(y).iter().map(|c| c.ch).collect()
    }

    // ─── Clear & Resize ──────────────────────────────────────────────────

    /// Reset every cell to empty.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Resize the buffer, clearing all content.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let size = usize::from(width) * usize::from(height);
        self.cells.clear();
        self.cells.resize(size, Cell::EMPTY);
    }

    // ─── Painting ────────────────────────────────────────────────────────

    /// Fill a whole row with spaces in `style`.
    pub fn fill_row(&mut self, y: u16, style: Style) {
        if y >= self.height {
            return;
        }
        let start = self.index(0, y);
        let end = start + usize::from(self.width);
        self.cells[start..end].fill(Cell::styled(' ', style));
    }

    /// Paint a string starting at `(x, y)`, clipped to the buffer width.
    ///
    /// Returns the number of columns consumed.
    pub fn paint_text(&mut self, x: u16, y: u16, text: &str, style: Style) -> u16 {
        if y >= self.height {
            return 0;
        }

        let mut col = x;
        for ch in text.chars() {
            if col >= self.width {
                break;
            }
            let ch = match ch.width() {
                Some(0) | None => continue,
                Some(1) => ch,
                Some(_) => WIDE_PLACEHOLDER,
            };
            self.set(col, y, Cell::styled(ch, style));
            col += 1;
        }

        col.saturating_sub(x)
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FrameBuffer({}x{})", self.width, self.height)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::CellColor;
    use pretty_assertions::assert_eq;

    // -- construction ---------------------------------------------------------

    #[test]
    fn new_buffer_is_empty() {
        let buf = FrameBuffer::new(10, 3);
        assert_eq!(buf.row_text(0), " ".repeat(10));
        assert!(buf.get(9, 2).is_some_and(|c| c.is_empty()));
    }

    #[test]
    fn zero_size_buffer() {
        let buf = FrameBuffer::new(0, 0);
        assert_eq!(buf.get(0, 0), None);
        assert!(buf.row(0).is_empty());
    }

    // -- access ---------------------------------------------------------------

    #[test]
    fn set_out_of_bounds_is_ignored() {
        let mut buf = FrameBuffer::new(4, 2);
        assert!(!buf.set(4, 0, Cell::new('x')));
        assert!(!buf.set(0, 2, Cell::new('x')));
        assert!(buf.set(3, 1, Cell::new('x')));
        assert_eq!(buf.row_text(1), "   x");
    }

    #[test]
    fn clear_resets_cells() {
        let mut buf = FrameBuffer::new(4, 1);
        buf.set(0, 0, Cell::new('a'));
        buf.clear();
        assert_eq!(buf.row_text(0), "    ");
    }

    #[test]
    fn resize_changes_dimensions_and_clears() {
        let mut buf = FrameBuffer::new(4, 1);
        buf.set(0, 0, Cell::new('a'));
        buf.resize(6, 2);
        assert_eq!(buf.width(), 6);
        assert_eq!(buf.height(), 2);
        assert_eq!(buf.row_text(0), "      ");
    }

    // -- painting -------------------------------------------------------------

    #[test]
    fn paint_text_writes_and_reports_width() {
        let mut buf = FrameBuffer::new(10, 1);
        let n = buf.paint_text(2, 0, "abc", Style::DEFAULT);
        assert_eq!(n, 3);
        assert_eq!(buf.row_text(0), "  abc     ");
    }

    #[test]
    fn paint_text_clips_at_right_edge() {
        let mut buf = FrameBuffer::new(5, 1);
        let n = buf.paint_text(3, 0, "hello", Style::DEFAULT);
        assert_eq!(n, 2);
        assert_eq!(buf.row_text(0), "   he");
    }

    #[test]
    fn paint_text_below_buffer_is_noop() {
        let mut buf = FrameBuffer::new(5, 1);
        assert_eq!(buf.paint_text(0, 1, "x", Style::DEFAULT), 0);
    }

    #[test]
    fn paint_text_replaces_wide_chars() {
        let mut buf = FrameBuffer::new(4, 1);
        buf.paint_text(0, 0, "a\u{4e16}b", Style::DEFAULT);
        assert_eq!(buf.row_text(0), "a?b ");
    }

    #[test]
    fn paint_text_skips_zero_width() {
        let mut buf = FrameBuffer::new(4, 1);
        buf.paint_text(0, 0, "a\u{200b}b", Style::DEFAULT);
        assert_eq!(buf.row_text(0), "ab  ");
    }

    #[test]
    fn paint_text_applies_style() {
        let mut buf = FrameBuffer::new(4, 1);
        let style = Style::new(CellColor::WHITE, CellColor::RED);
        buf.paint_text(0, 0, "x", style);
        assert_eq!(buf.get(0, 0).map(|c| c.style()), Some(style));
    }

    #[test]
    fn fill_row_paints_background() {
        let mut buf = FrameBuffer::new(3, 2);
        let style = Style::new(CellColor::BLACK, CellColor::CYAN);
        buf.fill_row(1, style);
        assert!(buf.row(1).iter().all(|c| c.bg == CellColor::CYAN));
        assert!(buf.row(0).iter().all(|c| c.is_empty()));
    }
}
