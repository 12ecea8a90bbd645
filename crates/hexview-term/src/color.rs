// SPDX-License-Identifier: MIT
//
// Terminal colors.
//
// A hex dump only needs the classic palette: the eight base colors plus
// their bright variants, with an escape hatch to the 256-color table.
// Everything is resolved to a `CellColor` before it lands in a cell, so
// the diff renderer compares plain integers in its hot loop.

use std::fmt;

// ─── CellColor ───────────────────────────────────────────────────────────────

/// Compact color stored in a [`Cell`](crate::cell::Cell).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellColor {
    /// ANSI 256-color palette index. Indices 0-15 are the base and
    /// bright colors and get the short SGR encodings.
    Ansi256(u8),

    /// Terminal default color (inherits the user's terminal theme).
    #[default]
    Default,
}

impl CellColor {
    pub const BLACK: Self = Self::Ansi256(0);
    pub const RED: Self = Self::Ansi256(1);
    pub const GREEN: Self = Self::Ansi256(2);
    pub const YELLOW: Self = Self::Ansi256(3);
    pub const BLUE: Self = Self::Ansi256(4);
    pub const MAGENTA: Self = Self::Ansi256(5);
    pub const CYAN: Self = Self::Ansi256(6);
    pub const WHITE: Self = Self::Ansi256(7);

    /// The bright variant of a base color (index + 8).
    ///
    /// Colors that are already bright, extended palette entries, and
    /// `Default` are returned unchanged.
    #[must_use]
    pub const fn bright(self) -> Self {
        match self {
            Self::Ansi256(idx) if idx < 8 => Self::Ansi256(idx + 8),
            other => other,
        }
    }
}

impl fmt::Debug for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ansi256(idx) => write!(f, "ansi({idx})"),
            Self::Default => write!(f, "default"),
        }
    }
}

impl fmt::Display for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
