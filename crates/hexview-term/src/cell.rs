// SPDX-License-Identifier: MIT
//
// Cell: one character position on screen.
//
// A cell holds an ASCII-or-Unicode character, a foreground and background
// color, and a set of SGR attributes. The view paints a grid of these into
// a `FrameBuffer`; the diff renderer compares grids and emits escape codes
// only for the cells that changed.
//
// `Style` bundles the three presentation fields so painting code can pass
// one value around ("text", "cursor", "selection", ...) instead of three.

use crate::color::CellColor;

// ─── Text Attributes ─────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Text attributes stored as a compact bitfield.
    ///
    /// Each flag maps to one SGR parameter:
    ///
    /// ```
    /// use hexview_term::cell::Attr;
    ///
    /// let style = Attr::BOLD | Attr::INVERSE;
    /// assert!(style.contains(Attr::BOLD));
    /// assert!(!style.contains(Attr::DIM));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        /// SGR 1: increased intensity.
        const BOLD      = 1 << 0;
        /// SGR 2: decreased intensity.
        const DIM       = 1 << 1;
        /// SGR 4: single underline.
        const UNDERLINE = 1 << 2;
        /// SGR 7: swap foreground and background.
        const INVERSE   = 1 << 3;
    }
}

// ─── Style ───────────────────────────────────────────────────────────────────

/// Presentation of a cell without its character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Style {
    pub fg: CellColor,
    pub bg: CellColor,
    pub attrs: Attr,
}

impl Style {
    /// Terminal defaults: default colors, no attributes.
    pub const DEFAULT: Self = Self {
        fg: CellColor::Default,
        bg: CellColor::Default,
        attrs: Attr::empty(),
    };

    #[inline]
    #[must_use]
    pub const fn new(fg: CellColor, bg: CellColor) -> Self {
        Self {
            fg,
            bg,
            attrs: Attr::empty(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn with_attrs(self, attrs: Attr) -> Self {
        Self { attrs, ..self }
    }

    #[inline]
    #[must_use]
    pub const fn bold(self) -> Self {
        self.with_attrs(Attr::BOLD)
    }
}

// ─── Cell ────────────────────────────────────────────────────────────────────

/// A single terminal cell.
///
/// Every cell occupies exactly one column. The hex view only ever paints
/// single-width characters into the grid; anything wider is replaced by
/// the buffer before it gets here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Character to display.
    pub ch: char,
    /// Foreground (text) color.
    pub fg: CellColor,
    /// Background color.
    pub bg: CellColor,
    /// Text attributes (bold, dim, ...).
    pub attrs: Attr,
}

impl Cell {
    /// An empty cell: space character, default colors, no attributes.
    pub const EMPTY: Self = Self {
        ch: ' ',
        fg: CellColor::Default,
        bg: CellColor::Default,
        attrs: Attr::empty(),
    };

    /// Create a cell with a character and default styling.
    #[inline]
    #[must_use]
    pub const fn new(ch: char) -> Self {
        Self { ch, ..Self::EMPTY }
    }

    /// Create a cell with a character and a style.
    #[inline]
    #[must_use]
    pub const fn styled(ch: char, style: Style) -> Self {
        Self {
            ch,
            fg: style.fg,
            bg: style.bg,
            attrs: style.attrs,
        }
    }

    /// The cell's presentation, without the character.
    #[inline]
    #[must_use]
    pub const fn style(self) -> Style {
        Style {
            fg: self.fg,
            bg: self.bg,
            attrs: self.attrs,
        }
    }

    /// Whether this cell is visually empty (space, default colors, no styling).
    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cell_is_space_with_defaults() {
        let cell = Cell::EMPTY;
        assert_eq!(cell.ch, ' ');
        assert!(cell.is_empty());
        assert_eq!(Cell::default(), Cell::EMPTY);
    }

    #[test]
    fn new_cell_is_not_empty() {
        assert!(!Cell::new('A').is_empty());
    }

    #[test]
    fn styled_cell_carries_style() {
        let style = Style::new(CellColor::BLACK, CellColor::CYAN).bold();
        let cell = Cell::styled('x', style);
        assert_eq!(cell.fg, CellColor::BLACK);
        assert_eq!(cell.bg, CellColor::CYAN);
        assert_eq!(cell.attrs, Attr::BOLD);
        assert_eq!(cell.style(), style);
    }

    #[test]
    fn colored_space_is_not_empty() {
        let cell = Cell::styled(' ', Style::new(CellColor::Default, CellColor::BLUE));
        assert!(!cell.is_empty());
    }

    #[test]
    fn attr_flags_combine() {
        let a = Attr::BOLD | Attr::UNDERLINE;
        assert!(a.contains(Attr::BOLD));
        assert!(!a.contains(Attr::INVERSE));
        assert!(Attr::default().is_empty());
    }
}
