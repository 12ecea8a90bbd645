//! Byte grouping for the hex area.
//!
//! A view mode decides how the 16 bytes of a row are grouped for display and
//! in which order the bytes of a group are printed. It never changes which
//! bytes are on screen or where the cursor is.

use std::fmt;

/// Hex area column where the first byte of a row starts.
pub const HEX_COLUMN: u16 = 10;

/// Column of the ASCII area.
pub const ASCII_COLUMN: u16 = 60;

/// Bytes per row.
pub const ROW_BYTES: u64 = 16;

/// How bytes are grouped in the hex area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewMode {
    /// Single bytes.
    #[default]
    Bytes8,

    /// 16-bit words, bytes in file order.
    Words16,

    /// 16-bit words, bytes of each word reversed.
    Words16Swapped,

    /// 32-bit words, bytes in file order.
    Words32,

    /// 32-bit words, bytes of each word reversed.
    Words32Swapped,
}

impl ViewMode {
    /// Every mode, in key order (`1` through `5`).
    pub const ALL: [Self; 5] = [
        Self::Bytes8,
        Self::Words16,
        Self::Words16Swapped,
        Self::Words32,
        Self::Words32Swapped,
    ];

    /// The mode bound to the digit key `n` (1-based).
    #[must_use]
    pub const fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Bytes8),
            2 => Some(Self::Words16),
            3 => Some(Self::Words16Swapped),
            4 => Some(Self::Words32),
            5 => Some(Self::Words32Swapped),
            _ => None,
        }
    }

    /// Bytes per group: 1, 2 or 4.
    #[must_use]
    pub const fn group_width(self) -> u8 {
        match self {
            Self::Bytes8 => 1,
            Self::Words16 | Self::Words16Swapped => 2,
            Self::Words32 | Self::Words32Swapped => 4,
        }
    }

    /// Whether the bytes inside a group are displayed in reverse.
    #[must_use]
    pub const fn is_swapped(self) -> bool {
        matches!(self, Self::Words16Swapped | Self::Words32Swapped)
    }

    /// Short name for the status line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bytes8 => "8-bit",
            Self::Words16 => "16-bit",
            Self::Words16Swapped => "16-bit swapped",
            Self::Words32 => "32-bit",
            Self::Words32Swapped => "32-bit swapped",
        }
    }

    /// Screen column of the byte at row offset `col` (0..16) in the hex
    /// area.
    ///
    /// Each group takes two digits per byte and then as many spaces as it
    /// has bytes, and the second half of the row is shifted one column
    /// further. In swapped modes the byte is drawn at its mirrored slot
    /// inside the group.
    #[must_use]
    pub const fn hex_x(self, col: u8) -> u16 {
        let width = self.group_width();
        let group = col / width;
        let mut slot = col % width;
        if self.is_swapped() {
            slot = width - 1 - slot;
        }
        let gap = if col >= 8 { 1 } else { 0 };
        HEX_COLUMN + group as u16 * 3 * width as u16 + slot as u16 * 2 + gap
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
