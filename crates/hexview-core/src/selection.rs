//! Rubber-band selection of an inclusive byte range.
//!
//! A selection is anchored where it was activated and stretched by cursor
//! motion. Until it has been stretched it grows toward whichever side the
//! cursor went. After that, the endpoint the cursor was sitting on follows
//! the cursor, so moving back past the anchor flips the range around it.

use crate::navigation::Motion;

/// Inclusive selection range. `start <= end` whenever it is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    range: Option<(u64, u64)>,
}

impl Selection {
    #[must_use]
    pub const fn new() -> Self {
        Self { range: None }
    }

    /// Start selecting at `addr`.
    pub const fn activate(&mut self, addr: u64) {
        self.range = Some((addr, addr));
    }

    /// Stop selecting and forget the range.
    pub const fn deactivate(&mut self) {
        self.range = None;
    }

    /// Activate at `addr` when inactive, deactivate otherwise. Returns
    /// whether the selection is now active.
    pub const fn toggle(&mut self, addr: u64) -> bool {
        if self.range.is_some() {
            self.deactivate();
            false
        } else {
            self.activate(addr);
            true
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.range.is_some()
    }

    /// The selected range as `(start, end)`, both inclusive.
    #[inline]
    #[must_use]
    pub const fn range(&self) -> Option<(u64, u64)> {
        self.range
    }

    #[must_use]
    pub fn contains(&self, addr: u64) -> bool {
        self.range
            .is_some_and(|(start, end)| start <= addr && addr <= end)
    }

    /// Number of selected bytes, 0 when inactive.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.range.map_or(0, |(start, end)| end - start + 1)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.range.is_none()
    }

    /// Follow the cursor from `old` to `new`. No-op when inactive.
    pub fn on_cursor_moved(&mut self, old: u64, new: u64) {
        let Some((mut start, mut end)) = self.range else {
            return;
        };

        if start == end {
            if new < start {
                start = new;
            } else if new > end {
                end = new;
            }
        } else if old == start {
            start = new;
        } else if old == end {
            end = new;
        }

        if start > end {
            std::mem::swap(&mut start, &mut end);
        }
        self.range = Some((start, end));
    }

    /// [`on_cursor_moved`](Self::on_cursor_moved) for a navigation result.
    pub fn follow(&mut self, motion: Option<Motion>) {
        if let Some(Motion { from, to }) = motion {
            self.on_cursor_moved(from, to);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
