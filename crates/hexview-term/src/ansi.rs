// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. The
// decision of *when* to emit belongs to `CellWriter`; this module only
// knows the byte encodings.
//
// Cursor positions are 0-indexed in our API and converted to the 1-indexed
// coordinates the terminal expects.

use std::io::{self, Write};

use crate::cell::Attr;
use crate::color::CellColor;

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to `(x, y)` (CUP).
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
}

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

/// Cursor shapes used by the viewer: the terminal's own default while
/// browsing, a bar while typing into a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorShape {
    #[default]
    Default,
    SteadyBlock,
    SteadyBar,
}

/// Set the cursor shape (DECSCUSR).
#[inline]
pub fn set_cursor_shape(w: &mut impl Write, shape: CursorShape) -> io::Result<()> {
    let n: u8 = match shape {
        CursorShape::Default => 0,
        CursorShape::SteadyBlock => 2,
        CursorShape::SteadyBar => 6,
    };
    write!(w, "\x1b[{n} q")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the entire screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// Reset all SGR attributes (SGR 0).
///
/// The stateful writer must forget its tracked colors after this.
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

// ─── Colors ──────────────────────────────────────────────────────────────────

/// Set the foreground color.
///
/// Base colors use SGR 30-37, bright colors 90-97, the rest `38;5;N`.
pub fn fg(w: &mut impl Write, color: CellColor) -> io::Result<()> {
    match color {
        CellColor::Default => w.write_all(b"\x1b[39m"),
        CellColor::Ansi256(idx) if idx < 8 => write!(w, "\x1b[{}m", 30 + u16::from(idx)),
        CellColor::Ansi256(idx) if idx < 16 => write!(w, "\x1b[{}m", 82 + u16::from(idx)),
        CellColor::Ansi256(idx) => write!(w, "\x1b[38;5;{idx}m"),
    }
}

/// Set the background color. Same scheme as [`fg`] with 40-47, 100-107
/// and `48;5;N`.
pub fn bg(w: &mut impl Write, color: CellColor) -> io::Result<()> {
    match color {
        CellColor::Default => w.write_all(b"\x1b[49m"),
        CellColor::Ansi256(idx) if idx < 8 => write!(w, "\x1b[{}m", 40 + u16::from(idx)),
        CellColor::Ansi256(idx) if idx < 16 => write!(w, "\x1b[{}m", 92 + u16::from(idx)),
        CellColor::Ansi256(idx) => write!(w, "\x1b[48;5;{idx}m"),
    }
}

// ─── Text Attributes ─────────────────────────────────────────────────────────

/// Emit all set attributes as one semicolon-separated SGR sequence.
/// Writes nothing for an empty set.
pub fn attrs(w: &mut impl Write, attr: Attr) -> io::Result<()> {
    if attr.is_empty() {
        return Ok(());
    }

    let codes: Vec<&str> = [
        (Attr::BOLD, "1"),
        (Attr::DIM, "2"),
        (Attr::UNDERLINE, "4"),
        (Attr::INVERSE, "7"),
    ]
    .into_iter()
    .filter(|(flag, _)| attr.contains(*flag))
    .map(|(_, code)| code)
    .collect();

    write!(w, "\x1b[{}m", codes.join(";"))
}

// ─── Synchronized Output ─────────────────────────────────────────────────────

/// Begin synchronized output (DEC mode 2026). The terminal holds the
/// frame until [`end_sync`].
#[inline]
pub fn begin_sync(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2026h")
}

/// End synchronized output.
#[inline]
pub fn end_sync(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?2026l")
}

// ─── Alternate Screen ───────────────────────────────────────────────────────

/// Enter the alternate screen buffer (DEC mode 1049).
#[inline]
pub fn enter_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049h")
}

/// Leave the alternate screen and restore the shell's content.
#[inline]
pub fn exit_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049l")
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn emit<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    // -- cursor ---------------------------------------------------------------

    #[test]
    fn cursor_to_is_one_based() {
        assert_eq!(emit(|w| cursor_to(w, 0, 0)), "\x1b[1;1H");
        assert_eq!(emit(|w| cursor_to(w, 10, 20)), "\x1b[21;11H");
    }

    #[test]
    fn cursor_to_max_does_not_overflow() {
        assert_eq!(
            emit(|w| cursor_to(w, u16::MAX, u16::MAX)),
            "\x1b[65536;65536H"
        );
    }

    #[test]
    fn cursor_visibility() {
        assert_eq!(emit(|w| cursor_hide(w)), "\x1b[?25l");
        assert_eq!(emit(|w| cursor_show(w)), "\x1b[?25h");
    }

    #[test]
    fn cursor_shapes() {
        assert_eq!(emit(|w| set_cursor_shape(w, CursorShape::Default)), "\x1b[0 q");
        assert_eq!(emit(|w| set_cursor_shape(w, CursorShape::SteadyBar)), "\x1b[6 q");
    }

    // -- colors ---------------------------------------------------------------

    #[test]
    fn fg_encodings() {
        assert_eq!(emit(|w| fg(w, CellColor::Default)), "\x1b[39m");
        assert_eq!(emit(|w| fg(w, CellColor::BLACK)), "\x1b[30m");
        assert_eq!(emit(|w| fg(w, CellColor::WHITE)), "\x1b[37m");
        assert_eq!(emit(|w| fg(w, CellColor::BLUE.bright())), "\x1b[94m");
        assert_eq!(emit(|w| fg(w, CellColor::Ansi256(208))), "\x1b[38;5;208m");
    }

    #[test]
    fn bg_encodings() {
        assert_eq!(emit(|w| bg(w, CellColor::Default)), "\x1b[49m");
        assert_eq!(emit(|w| bg(w, CellColor::CYAN)), "\x1b[46m");
        assert_eq!(emit(|w| bg(w, CellColor::Ansi256(15))), "\x1b[107m");
        assert_eq!(emit(|w| bg(w, CellColor::Ansi256(17))), "\x1b[48;5;17m");
    }

    // -- attributes -----------------------------------------------------------

    #[test]
    fn attrs_empty_writes_nothing() {
        assert_eq!(emit(|w| attrs(w, Attr::empty())), "");
    }

    #[test]
    fn attrs_single_and_combined() {
        assert_eq!(emit(|w| attrs(w, Attr::BOLD)), "\x1b[1m");
        assert_eq!(
            emit(|w| attrs(w, Attr::BOLD | Attr::UNDERLINE | Attr::INVERSE)),
            "\x1b[1;4;7m"
        );
    }

    // -- screen ---------------------------------------------------------------

    #[test]
    fn screen_sequences() {
        assert_eq!(emit(|w| clear_screen(w)), "\x1b[2J");
        assert_eq!(emit(|w| reset(w)), "\x1b[0m");
        assert_eq!(emit(|w| begin_sync(w)), "\x1b[?2026h");
        assert_eq!(emit(|w| end_sync(w)), "\x1b[?2026l");
        assert_eq!(emit(|w| enter_alt_screen(w)), "\x1b[?1049h");
        assert_eq!(emit(|w| exit_alt_screen(w)), "\x1b[?1049l");
    }
}
