//! Cursor and viewport navigation in byte offsets.
//!
//! The [`Navigator`] holds the top-of-page address, the cursor's row and
//! column inside the page, and the view mode. The cursor's address is always
//! `top + row * 16 + col`, and every operation keeps it inside `[0, len]`.
//! On a non-empty file the cursor never rests past the last byte.
//!
//! # Scrolling
//!
//! `top` need not be a multiple of 16: rolling shifts it one byte at a time
//! so multi-byte groups can be realigned against the data. Scrolling moves
//! it in whole lines from wherever it is, and it never goes past `max_top`,
//! the top that shows the file's final line on the bottom row.
//!
//! Each mutating operation returns a [`Motion`] when the cursor or the
//! viewport changed, or `None` when it was a no-op.

use std::io::{Read, Seek};

use tracing::trace;

use crate::error::NavError;
use crate::paged_file::PagedFile;
use crate::view_mode::{ROW_BYTES, ViewMode};
use crate::word;

/// A cursor move, as seen by the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Motion {
    pub from: u64,
    pub to: u64,
}

/// Cursor and viewport state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    /// File length.
    len: u64,

    /// Visible rows. Always at least 1.
    page_rows: u64,

    /// Address of the first byte on screen.
    top: u64,

    /// Cursor row inside the page.
    row: u64,

    /// Cursor column, 0..16.
    col: u64,

    mode: ViewMode,
}

impl Navigator {
    /// A navigator at the start of a file of `len` bytes.
    #[must_use]
    pub fn new(len: u64, page_rows: u16) -> Self {
        Self {
            len,
            page_rows: u64::from(page_rows.max(1)),
            top: 0,
            row: 0,
            col: 0,
            mode: ViewMode::default(),
        }
    }

    // -- accessors ----------------------------------------------------------

    /// The cursor's address.
    #[inline]
    #[must_use]
    pub const fn address(&self) -> u64 {
        self.top + self.row * ROW_BYTES + self.col
    }

    #[inline]
    #[must_use]
    pub const fn top(&self) -> u64 {
        self.top
    }

    #[inline]
    #[must_use]
    pub const fn row(&self) -> u64 {
        self.row
    }

    #[inline]
    #[must_use]
    pub const fn col(&self) -> u64 {
        self.col
    }

    #[inline]
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.len
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    #[must_use]
    pub const fn page_rows(&self) -> u64 {
        self.page_rows
    }

    #[inline]
    #[must_use]
    pub const fn view_mode(&self) -> ViewMode {
        self.mode
    }

    /// Bytes on one page.
    #[inline]
    #[must_use]
    pub const fn page_bytes(&self) -> u64 {
        self.page_rows * ROW_BYTES
    }

    /// The last valid byte, or 0 for an empty file.
    #[inline]
    #[must_use]
    pub const fn last(&self) -> u64 {
        self.len.saturating_sub(1)
    }

    /// The highest `top`: the one that puts the file's last line on the
    /// bottom row, or 0 when the file fits on one page.
    #[inline]
    #[must_use]
    pub const fn max_top(&self) -> u64 {
        self.len
            .next_multiple_of(ROW_BYTES)
            .saturating_sub(self.page_bytes())
    }

    /// Whether `addr` is on the current page.
    #[inline]
    #[must_use]
    pub const fn is_visible(&self, addr: u64) -> bool {
        addr >= self.top && addr < self.top + self.page_bytes()
    }

    // -- line and character motions -------------------------------------------

    /// One line up, scrolling at the first row.
    pub fn move_up(&mut self) -> Option<Motion> {
        let addr = self.address();
        if addr < ROW_BYTES {
            return None;
        }
        self.track(|nav| nav.scroll_to(addr - ROW_BYTES))
    }

    /// One line down, scrolling at the last row. Clamps to the last byte.
    pub fn move_down(&mut self) -> Option<Motion> {
        let target = (self.address() + ROW_BYTES).min(self.last());
        self.track(|nav| nav.scroll_to(target))
    }

    /// One byte left, wrapping to the end of the previous line.
    pub fn move_left(&mut self) -> Option<Motion> {
        let addr = self.address();
        if addr == 0 {
            return None;
        }
        self.track(|nav| nav.scroll_to(addr - 1))
    }

    /// One byte right, wrapping to the start of the next line.
    pub fn move_right(&mut self) -> Option<Motion> {
        let addr = self.address();
        if addr >= self.last() {
            return None;
        }
        self.track(|nav| nav.scroll_to(addr + 1))
    }

    /// Shift the page one byte toward the start of the file. The cursor
    /// keeps its row and column.
    pub fn roll_left(&mut self) -> Option<Motion> {
        if self.top == 0 {
            return None;
        }
        self.track(|nav| nav.top -= 1)
    }

    /// Shift the page one byte toward the end of the file.
    pub fn roll_right(&mut self) -> Option<Motion> {
        if self.top >= self.max_top() {
            return None;
        }
        self.track(|nav| {
            nav.top += 1;
            nav.clamp_cursor();
        })
    }

    // -- pages --------------------------------------------------------------

    /// Scroll back `page_rows - 1` lines. At the top of the file the cursor
    /// moves to the first row instead.
    pub fn page_up(&mut self) -> Option<Motion> {
        let step = self.page_step();
        self.track(|nav| {
            if nav.top == 0 {
                nav.row = 0;
            } else {
                nav.top = nav.top.saturating_sub(step);
            }
        })
    }

    /// Scroll forward `page_rows - 1` lines. At the end of the file the
    /// cursor moves to the last row instead.
    pub fn page_down(&mut self) -> Option<Motion> {
        let step = self.page_step();
        let max_top = self.max_top();
        self.track(|nav| {
            if nav.top >= max_top {
                nav.row = nav.page_rows - 1;
            } else {
                nav.top = (nav.top + step).min(max_top);
            }
            nav.clamp_cursor();
        })
    }

    /// First byte of the file.
    pub fn move_home(&mut self) -> Option<Motion> {
        self.track(|nav| {
            nav.top = 0;
            nav.row = 0;
            nav.col = 0;
        })
    }

    /// Last byte of the file, with the last line on the bottom row.
    pub fn move_end(&mut self) -> Option<Motion> {
        let last = self.last();
        let max_top = self.max_top();
        self.track(|nav| {
            nav.top = max_top;
            nav.place(last);
        })
    }

    // -- within the line or the screen ----------------------------------------

    /// Column 0 of the cursor's line.
    pub fn move_line_start(&mut self) -> Option<Motion> {
        self.track(|nav| nav.col = 0)
    }

    /// Column 15 of the cursor's line, or the last byte if the line is short.
    pub fn move_line_end(&mut self) -> Option<Motion> {
        self.track(|nav| {
            nav.col = ROW_BYTES - 1;
            nav.clamp_cursor();
        })
    }

    /// First row of the page.
    pub fn move_screen_top(&mut self) -> Option<Motion> {
        self.track(|nav| nav.row = 0)
    }

    /// Middle row of the page.
    pub fn move_screen_middle(&mut self) -> Option<Motion> {
        self.track(|nav| {
            nav.row = nav.page_rows / 2;
            nav.clamp_cursor();
        })
    }

    /// Last row of the page.
    pub fn move_screen_bottom(&mut self) -> Option<Motion> {
        self.track(|nav| {
            nav.row = nav.page_rows - 1;
            nav.clamp_cursor();
        })
    }

    // -- words --------------------------------------------------------------

    /// `w`: start of the next word.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::Io`] if reading the file fails.
    pub fn move_word<R: Read + Seek>(
        &mut self,
        file: &mut PagedFile<R>,
    ) -> Result<Option<Motion>, NavError> {
        let target = word::word_forward(file, self.address())?;
        Ok(self.track(|nav| nav.scroll_to(target)))
    }

    /// `b`: start of the previous word.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::Io`] if reading the file fails.
    pub fn move_word_back<R: Read + Seek>(
        &mut self,
        file: &mut PagedFile<R>,
    ) -> Result<Option<Motion>, NavError> {
        let target = word::word_backward(file, self.address())?;
        Ok(self.track(|nav| nav.scroll_to(target)))
    }

    // -- jumps --------------------------------------------------------------

    /// Put `addr` under the cursor.
    ///
    /// The cursor stays on its current row when possible, and the page keeps
    /// its alignment: the column becomes `addr`'s offset from the page's
    /// 16-byte phase. Near either end of the file the page is clamped and
    /// the row adjusts instead.
    pub fn jump_address(&mut self, addr: u64) -> Option<Motion> {
        let addr = addr.min(self.last());
        let max_top = self.max_top();
        self.track(|nav| {
            let phase = nav.top % ROW_BYTES;
            let col = (addr + ROW_BYTES - phase) % ROW_BYTES;
            nav.top = addr.saturating_sub(nav.row * ROW_BYTES + col).min(max_top);
            nav.place(addr);
        })
    }

    /// Jump `delta` bytes forward.
    ///
    /// # Errors
    ///
    /// [`NavError::InvalidAddress`] if the target lies past the end of the
    /// file. Nothing moves in that case.
    pub fn plus_offset(&mut self, delta: u64) -> Result<Option<Motion>, NavError> {
        let addr = self.address();
        match addr.checked_add(delta) {
            Some(target) if target <= self.len => Ok(self.jump_address(target)),
            _ => Err(NavError::InvalidAddress(format!("{addr:#x} + {delta:#x}"))),
        }
    }

    /// Jump `delta` bytes back.
    ///
    /// # Errors
    ///
    /// [`NavError::InvalidAddress`] if the target lies before offset 0.
    pub fn minus_offset(&mut self, delta: u64) -> Result<Option<Motion>, NavError> {
        let addr = self.address();
        addr.checked_sub(delta)
            .map(|target| self.jump_address(target))
            .ok_or_else(|| NavError::InvalidAddress(format!("{addr:#x} - {delta:#x}")))
    }

    /// Put the cursor on `addr`, moving the page only if `addr` is off it.
    /// A new page is positioned with `addr` about half a page down.
    pub fn recenter_on(&mut self, addr: u64) -> Option<Motion> {
        let addr = addr.min(self.last());
        let max_top = self.max_top();
        self.track(|nav| {
            if !nav.is_visible(addr) {
                let above = (nav.page_rows / 2) * ROW_BYTES;
                nav.top = addr.saturating_sub(above).min(max_top);
                trace!(addr, top = nav.top, "recenter");
            }
            nav.place(addr);
        })
    }

    // -- mode and geometry --------------------------------------------------

    /// Switch the byte grouping. Addresses are unaffected. Returns whether
    /// the mode changed.
    pub fn select_view(&mut self, mode: ViewMode) -> bool {
        if self.mode == mode {
            return false;
        }
        self.mode = mode;
        true
    }

    /// Adopt a new page height, keeping the cursor on the same byte.
    pub fn resize(&mut self, page_rows: u16) {
        let addr = self.address();
        self.page_rows = u64::from(page_rows.max(1));
        self.top = self.top.min(self.max_top());
        self.scroll_to(addr);
    }

    // -- internals ----------------------------------------------------------

    /// Lines moved by a page command, in bytes.
    const fn page_step(&self) -> u64 {
        let lines = if self.page_rows > 1 { self.page_rows - 1 } else { 1 };
        lines * ROW_BYTES
    }

    /// Run `f` and report what it changed.
    fn track(&mut self, f: impl FnOnce(&mut Self)) -> Option<Motion> {
        let (top, from) = (self.top, self.address());
        f(self);
        debug_assert!(self.address() <= self.len, "cursor past end of file");
        let to = self.address();
        (top != self.top || from != to).then_some(Motion { from, to })
    }

    /// Set row and column for `addr`, which must be on the current page.
    fn place(&mut self, addr: u64) {
        debug_assert!(self.is_visible(addr) || self.len == 0);
        let offset = addr.saturating_sub(self.top);
        self.row = offset / ROW_BYTES;
        self.col = offset % ROW_BYTES;
    }

    /// Pull the cursor back onto the last byte if it went past it.
    fn clamp_cursor(&mut self) {
        if self.address() > self.last() {
            self.place(self.last());
        }
    }

    /// Move the cursor to `addr`, scrolling by whole lines only as far as
    /// needed to make it visible.
    fn scroll_to(&mut self, addr: u64) {
        let page = self.page_bytes();
        if addr < self.top {
            let lines = (self.top - addr).div_ceil(ROW_BYTES);
            self.top = self.top.saturating_sub(lines * ROW_BYTES);
        } else if addr >= self.top + page {
            let lines = (addr - (self.top + page) + 1).div_ceil(ROW_BYTES);
            self.top = (self.top + lines * ROW_BYTES).min(self.max_top());
        }
        self.place(addr);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    /// 1000-byte file, 4 rows: max_top = 1008 - 64 = 944.
    fn nav() -> Navigator {
        Navigator::new(1000, 4)
    }

    fn assert_valid(nav: &Navigator) {
        assert!(nav.row() < nav.page_rows());
        assert!(nav.col() < 16);
        assert!(nav.address() <= nav.len());
        assert!(nav.top() <= nav.max_top());
        if !nav.is_empty() {
            assert!(nav.address() <= nav.last());
        }
    }

    // -- geometry -------------------------------------------------------------

    #[test]
    fn max_top_shows_partial_last_line() {
        assert_eq!(nav().max_top(), 944);
        assert_eq!(Navigator::new(64, 4).max_top(), 0);
        assert_eq!(Navigator::new(65, 4).max_top(), 16);
        assert_eq!(Navigator::new(10, 4).max_top(), 0);
        assert_eq!(Navigator::new(0, 4).max_top(), 0);
    }

    #[test]
    fn zero_rows_become_one() {
        assert_eq!(Navigator::new(100, 0).page_rows(), 1);
    }

    // -- left / right ---------------------------------------------------------

    #[test]
    fn right_wraps_to_next_line() {
        let mut n = nav();
        n.jump_address(15);
        let m = n.move_right().unwrap();
        assert_eq!(m, Motion { from: 15, to: 16 });
        assert_eq!((n.row(), n.col()), (1, 0));
    }

    #[test]
    fn left_at_origin_is_noop() {
        let mut n = nav();
        assert_eq!(n.move_left(), None);
    }

    #[test]
    fn left_wraps_and_scrolls() {
        let mut n = nav();
        n.page_down();
        let top = n.top();
        n.move_screen_top();
        n.move_line_start();
        let m = n.move_left().unwrap();
        assert_eq!(m.to, top - 1);
        assert_eq!(n.top(), top - 16);
        assert_eq!((n.row(), n.col()), (0, 15));
    }

    #[test]
    fn right_stops_at_last_byte() {
        let mut n = nav();
        n.move_end();
        assert_eq!(n.address(), 999);
        assert_eq!(n.move_right(), None);
    }

    // -- up / down ------------------------------------------------------------

    #[test]
    fn down_scrolls_one_line_at_bottom_row() {
        let mut n = nav();
        n.move_screen_bottom();
        let m = n.move_down().unwrap();
        assert_eq!(m, Motion { from: 48, to: 64 });
        assert_eq!(n.top(), 16);
        assert_eq!(n.row(), 3);
    }

    #[test]
    fn down_clamps_to_last_byte() {
        let mut n = nav();
        n.jump_address(990);
        let m = n.move_down().unwrap();
        assert_eq!(m.to, 999);
        assert_eq!(n.move_down(), None);
    }

    #[test]
    fn up_scrolls_at_first_row() {
        let mut n = nav();
        n.page_down();
        n.move_screen_top();
        let before = n.address();
        n.move_up().unwrap();
        assert_eq!(n.address(), before - 16);
        assert_eq!(n.row(), 0);
    }

    #[test]
    fn up_on_first_line_is_noop() {
        let mut n = nav();
        n.move_right();
        assert_eq!(n.move_up(), None);
    }

    // -- roll -----------------------------------------------------------------

    #[test]
    fn roll_shifts_top_by_one_byte() {
        let mut n = nav();
        n.jump_address(20);
        assert_eq!(n.top(), 16);
        let m = n.roll_right().unwrap();
        assert_eq!(m, Motion { from: 20, to: 21 });
        assert_eq!(n.top(), 17);
        assert_eq!((n.row(), n.col()), (0, 4));
        n.roll_left().unwrap();
        assert_eq!(n.top(), 16);
    }

    #[test]
    fn roll_left_at_zero_is_noop() {
        assert_eq!(nav().roll_left(), None);
    }

    #[test]
    fn roll_right_stops_at_max_top() {
        let mut n = nav();
        n.move_end();
        assert_eq!(n.roll_right(), None);
    }

    #[test]
    fn scroll_keeps_roll_phase() {
        let mut n = nav();
        n.roll_right();
        n.roll_right();
        n.move_screen_bottom();
        n.move_down().unwrap();
        assert_eq!(n.top(), 18);
    }

    #[test]
    fn roll_right_reclamps_cursor() {
        // 40 bytes, 2 rows: max_top = 48 - 32 = 16.
        let mut n = Navigator::new(40, 2);
        n.page_down();
        n.move_end();
        assert_eq!(n.top(), 16);
        n.roll_left();
        n.move_screen_bottom();
        n.move_line_end();
        assert_eq!(n.address(), 39);
        n.roll_right().unwrap();
        assert_eq!(n.address(), 39);
        assert_valid(&n);
    }

    // -- pages ----------------------------------------------------------------

    #[test]
    fn page_down_moves_rows_minus_one() {
        let mut n = nav();
        n.page_down().unwrap();
        assert_eq!(n.top(), 48);
        assert_eq!(n.address(), 48);
    }

    #[test]
    fn page_down_at_end_moves_to_bottom_row() {
        let mut n = nav();
        n.move_end();
        n.move_screen_top();
        n.page_down().unwrap();
        assert_eq!(n.row(), 3);
        assert_eq!(n.top(), 944);
        assert_eq!(n.page_down(), None);
    }

    #[test]
    fn page_up_at_start_moves_to_top_row() {
        let mut n = nav();
        n.move_screen_bottom();
        n.page_up().unwrap();
        assert_eq!(n.address(), 0);
        assert_eq!(n.page_up(), None);
    }

    #[test]
    fn page_up_clamps_at_zero() {
        let mut n = nav();
        n.jump_address(20);
        assert_eq!(n.top(), 16);
        n.page_up().unwrap();
        assert_eq!(n.top(), 0);
        assert_eq!(n.address(), 4);
    }

    #[test]
    fn one_row_pages_still_move() {
        let mut n = Navigator::new(100, 1);
        n.page_down().unwrap();
        assert_eq!(n.top(), 16);
    }

    // -- home / end -----------------------------------------------------------

    #[test]
    fn home_is_idempotent() {
        let mut n = nav();
        n.jump_address(500);
        assert!(n.move_home().is_some());
        let once = n.clone();
        assert_eq!(n.move_home(), None);
        assert_eq!(n, once);
        assert_eq!(n.address(), 0);
    }

    #[test]
    fn end_puts_last_line_on_bottom_row() {
        let mut n = nav();
        n.move_end().unwrap();
        assert_eq!(n.top(), 944);
        assert_eq!((n.row(), n.col()), (3, 7));
    }

    #[test]
    fn end_on_short_file() {
        let mut n = Navigator::new(10, 4);
        n.move_end().unwrap();
        assert_eq!(n.top(), 0);
        assert_eq!((n.row(), n.col()), (0, 9));
    }

    // -- line / screen --------------------------------------------------------

    #[test]
    fn line_start_and_end() {
        let mut n = nav();
        n.jump_address(37);
        n.move_line_start().unwrap();
        assert_eq!(n.address(), 32);
        n.move_line_end().unwrap();
        assert_eq!(n.address(), 47);
    }

    #[test]
    fn line_end_on_partial_last_line() {
        let mut n = nav();
        n.jump_address(993);
        n.move_line_end().unwrap();
        assert_eq!(n.address(), 999);
    }

    #[test]
    fn screen_rows() {
        let mut n = nav();
        n.jump_address(5);
        n.move_screen_middle().unwrap();
        assert_eq!(n.address(), 37);
        n.move_screen_bottom().unwrap();
        assert_eq!(n.address(), 53);
        n.move_screen_top().unwrap();
        assert_eq!(n.address(), 5);
    }

    #[test]
    fn screen_bottom_on_short_file_clamps() {
        let mut n = Navigator::new(20, 4);
        n.move_screen_bottom().unwrap();
        assert_eq!(n.address(), 19);
    }

    // -- jumps ----------------------------------------------------------------

    #[test]
    fn jump_keeps_row() {
        let mut n = nav();
        n.move_screen_middle();
        n.jump_address(500).unwrap();
        assert_eq!(n.address(), 500);
        assert_eq!(n.row(), 2);
        assert_eq!(n.top(), 500 - 32 - 4);
    }

    #[test]
    fn jump_near_end_clamps_top() {
        let mut n = nav();
        n.jump_address(990).unwrap();
        assert_eq!(n.top(), 944);
        assert_eq!(n.address(), 990);
    }

    #[test]
    fn jump_past_end_parks_on_last() {
        let mut n = nav();
        n.jump_address(5000).unwrap();
        assert_eq!(n.address(), 999);
    }

    #[test]
    fn jump_on_short_file_keeps_top_zero() {
        let mut n = Navigator::new(30, 4);
        n.jump_address(25).unwrap();
        assert_eq!(n.top(), 0);
        assert_eq!((n.row(), n.col()), (1, 9));
    }

    #[test]
    fn jump_keeps_roll_phase() {
        let mut n = nav();
        n.roll_right();
        n.roll_right();
        n.roll_right();
        n.jump_address(500);
        assert_eq!(n.top() % 16, 3);
        assert_eq!(n.address(), 500);
    }

    #[test]
    fn offsets() {
        let mut n = nav();
        n.plus_offset(0x100).unwrap();
        assert_eq!(n.address(), 0x100);
        n.minus_offset(0x10).unwrap();
        assert_eq!(n.address(), 0xf0);
    }

    #[test]
    fn offset_to_len_parks_on_last() {
        let mut n = nav();
        n.plus_offset(1000).unwrap();
        assert_eq!(n.address(), 999);
    }

    #[test]
    fn offset_out_of_file_is_error_without_motion() {
        let mut n = nav();
        n.jump_address(10);
        let before = n.clone();
        assert!(matches!(n.plus_offset(991), Err(NavError::InvalidAddress(_))));
        assert!(matches!(n.minus_offset(11), Err(NavError::InvalidAddress(_))));
        assert!(matches!(n.plus_offset(u64::MAX), Err(NavError::InvalidAddress(_))));
        assert_eq!(n, before);
    }

    #[test]
    fn recenter_off_page() {
        let mut n = nav();
        let m = n.recenter_on(500).unwrap();
        assert_eq!(m, Motion { from: 0, to: 500 });
        assert_eq!(n.top(), 500 - 32);
        assert_eq!(n.address(), 500);
    }

    #[test]
    fn recenter_on_page_only_moves_cursor() {
        let mut n = nav();
        n.recenter_on(40).unwrap();
        assert_eq!(n.top(), 0);
        assert_eq!(n.address(), 40);
        assert_eq!(n.recenter_on(40), None);
    }

    #[test]
    fn recenter_near_end_clamps() {
        let mut n = nav();
        n.recenter_on(998);
        assert_eq!(n.top(), 944);
        assert_eq!(n.address(), 998);
    }

    // -- words ----------------------------------------------------------------

    #[test]
    fn word_motion_scrolls_only_off_page() {
        let mut bytes = vec![0u8; 200];
        bytes[10..13].copy_from_slice(b"abc");
        bytes[150..153].copy_from_slice(b"xyz");
        let mut file =
            PagedFile::from_reader(Cursor::new(bytes), 200, 64).unwrap();
        let mut n = Navigator::new(200, 4);

        n.move_word(&mut file).unwrap().unwrap();
        assert_eq!(n.address(), 10);
        assert_eq!(n.top(), 0);

        n.move_word(&mut file).unwrap().unwrap();
        assert_eq!(n.address(), 150);
        assert_eq!(n.top(), 96);
        assert_eq!(n.row(), 3);

        n.move_word_back(&mut file).unwrap().unwrap();
        assert_eq!(n.address(), 10);
        assert_eq!(n.top(), 0);
    }

    // -- mode / resize --------------------------------------------------------

    #[test]
    fn select_view_reports_change() {
        let mut n = nav();
        n.jump_address(77);
        assert!(n.select_view(ViewMode::Words32));
        assert!(!n.select_view(ViewMode::Words32));
        assert_eq!(n.view_mode(), ViewMode::Words32);
        assert_eq!(n.address(), 77);
    }

    #[test]
    fn resize_keeps_cursor_byte() {
        let mut n = nav();
        n.jump_address(60);
        n.move_screen_bottom();
        let addr = n.address();
        n.resize(2);
        assert_eq!(n.address(), addr);
        assert_valid(&n);
        n.resize(40);
        assert_eq!(n.address(), addr);
        assert_valid(&n);
    }

    // -- empty file -----------------------------------------------------------

    #[test]
    fn empty_file_motions_are_noops() {
        let mut n = Navigator::new(0, 4);
        assert_eq!(n.move_right(), None);
        assert_eq!(n.move_down(), None);
        assert_eq!(n.page_down(), None);
        assert_eq!(n.move_end(), None);
        assert_eq!(n.jump_address(10), None);
        assert_eq!(n.address(), 0);
    }

    // -- invariant ------------------------------------------------------------

    #[test]
    fn invariant_holds_under_mixed_motions() {
        for len in [0u64, 1, 15, 16, 17, 63, 64, 65, 1000] {
            let mut n = Navigator::new(len, 4);
            let mut step = 0u64;
            for _ in 0..400 {
                step = step.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
                match (step >> 33) % 14 {
                    0 => {
                        let _ = n.move_up();
                    }
                    1 => {
                        let _ = n.move_down();
                    }
                    2 => {
                        let _ = n.move_left();
                    }
                    3 => {
                        let _ = n.move_right();
                    }
                    4 => {
                        let _ = n.roll_left();
                    }
                    5 => {
                        let _ = n.roll_right();
                    }
                    6 => {
                        let _ = n.page_up();
                    }
                    7 => {
                        let _ = n.page_down();
                    }
                    8 => {
                        let _ = n.move_end();
                    }
                    9 => {
                        let _ = n.jump_address((step >> 20) % (len + 50));
                    }
                    10 => {
                        let _ = n.move_line_end();
                    }
                    11 => {
                        let _ = n.move_screen_bottom();
                    }
                    12 => {
                        let _ = n.recenter_on((step >> 24) % (len + 10));
                    }
                    _ => n.resize(u16::try_from((step >> 40) % 6).unwrap()),
                }
                assert_valid(&n);
            }
        }
    }
}
