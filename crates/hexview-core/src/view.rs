//! Painting a [`Viewer`] into a frame buffer.
//!
//! ```text
//! 00000000  48 65 6C 6C 6F 2C 20 77  6F 72 6C 64 21 0A 00 00   Hello, world!...
//! 00000010  ...
//!  file.bin                          Select  8-bit  0000000C/00000010  81%
//! /pattern
//! ```
//!
//! Every row but the last two is a data row: the address, the hex area
//! grouped by view mode, and the ASCII column. Below them are the status
//! line and the message line, which doubles as the prompt.

use std::io::{Read, Seek};

use hexview_term::ansi::CursorShape;
use hexview_term::buffer::FrameBuffer;
use hexview_term::cell::{Cell, Style};
use hexview_term::color::CellColor;

use crate::view_mode::{ASCII_COLUMN, ROW_BYTES};
use crate::viewer::Viewer;

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

/// Data rows.
pub const TEXT: Style = Style::new(CellColor::BLACK, CellColor::CYAN);

/// The byte under the cursor.
pub const CURSOR: Style = Style::new(CellColor::WHITE, CellColor::BLACK).bold();

/// Selected bytes.
pub const SELECTED: Style = Style::new(CellColor::WHITE, CellColor::BLACK);

/// Non-printable bytes in the ASCII column.
pub const INVISIBLE: Style = Style::new(CellColor::BLUE, CellColor::CYAN).bold();

pub const STATUS: Style = Style::new(CellColor::WHITE, CellColor::BLACK);

pub const ERROR: Style = Style::new(CellColor::WHITE, CellColor::RED).bold();

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Paint the whole screen.
pub fn render<R: Read + Seek>(viewer: &Viewer<R>, frame: &mut FrameBuffer) {
    let height = frame.height();
    if height == 0 {
        return;
    }

    let data_rows = height.saturating_sub(2);
    for y in 0..data_rows {
        frame.fill_row(y, TEXT);
        render_row(viewer, frame, y);
    }

    if height >= 2 {
        render_status_line(viewer, frame, height - 2);
    }
    render_message_line(viewer, frame, height - 1);
}

/// Where the hardware cursor goes: on the prompt while one is open,
/// hidden otherwise.
#[must_use]
pub fn cursor<R: Read + Seek>(viewer: &Viewer<R>, height: u16) -> Option<(u16, u16, CursorShape)> {
    let shape = viewer.mode().cursor_shape()?;
    let y = height.checked_sub(1)?;
    let x = u16::try_from(viewer.command_line().cursor() + 1).unwrap_or(u16::MAX);
    Some((x, y, shape))
}

fn render_row<R: Read + Seek>(viewer: &Viewer<R>, frame: &mut FrameBuffer, y: u16) {
    let nav = viewer.navigator();
    let row_addr = nav.top() + u64::from(y) * ROW_BYTES;
    if u64::from(y) >= nav.page_rows() || row_addr >= viewer.len() {
        return;
    }

    let upper = viewer.options().uppercase;
    frame.paint_text(0, y, &hex_number(row_addr, 8, upper), TEXT);

    let mode = nav.view_mode();
    // Hex x position of each byte drawn, and whether it is selected.
    let mut drawn: Vec<(u16, bool)> = Vec::with_capacity(16);
    for col in 0..16u8 {
        let addr = row_addr + u64::from(col);
        let Some(byte) = viewer.visible_byte(addr) else {
            break;
        };

        let selected = viewer.selection().contains(addr);
        let highlight = if addr == nav.address() {
            Some(CURSOR)
        } else if selected {
            Some(SELECTED)
        } else {
            None
        };

        let x = mode.hex_x(col);
        drawn.push((x, selected));
        frame.paint_text(
            x,
            y,
            &hex_number(u64::from(byte), 2, upper),
            highlight.unwrap_or(TEXT),
        );

        if viewer.options().ascii {
            let (ch, style) = if byte.is_ascii_graphic() || byte == b' ' {
                (char::from(byte), TEXT)
            } else {
                ('.', INVISIBLE)
            };
            frame.set(
                ASCII_COLUMN + u16::from(col),
                y,
                Cell::styled(ch, highlight.unwrap_or(style)),
            );
        }
    }

    // Separators between two selected neighbours join them into one band.
    drawn.sort_unstable_by_key(|&(x, _)| x);
    for pair in drawn.windows(2) {
        if let &[(left, true), (right, true)] = pair {
            for x in left + 2..right {
                frame.set(x, y, Cell::styled(' ', SELECTED));
            }
        }
    }
}

fn hex_number(value: u64, width: usize, upper: bool) -> String {
    if upper {
        format!("{value:0width$X}")
    } else {
        format!("{value:0width$x}")
    }
}

/// ` name ... [Select  ]mode  offset/len  pct% `
fn render_status_line<R: Read + Seek>(viewer: &Viewer<R>, frame: &mut FrameBuffer, y: u16) {
    frame.fill_row(y, STATUS);

    let nav = viewer.navigator();
    let len = viewer.len();
    let addr = nav.address();
    let percent = if len == 0 { 0 } else { (addr + 1) * 100 / len };
    let select = if viewer.selection().is_active() { "Select  " } else { "" };
    let right = format!(
        "{select}{}  {addr:08X}/{len:08X} {percent:3}% ",
        nav.view_mode().name()
    );

    let width = usize::from(frame.width());
    let right_len = right.chars().count();
    let room = width.saturating_sub(right_len + 2);
    let name = truncate(viewer.name(), room);

    frame.paint_text(1, y, &name, STATUS);
    #[allow(clippy::cast_possible_truncation)]
    let right_x = width.saturating_sub(right_len) as u16;
    frame.paint_text(right_x, y, &right, STATUS);
}

/// Cut `s` to `max` characters, ending in `...` when shortened.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    if max <= 3 {
        return s.chars().take(max).collect();
    }
    let mut out: String = s.chars().take(max - 3).collect();
    out.push_str("...");
    out
}

fn render_message_line<R: Read + Seek>(viewer: &Viewer<R>, frame: &mut FrameBuffer, y: u16) {
    frame.fill_row(y, Style::DEFAULT);

    if let Some(prompt) = viewer.mode().prompt() {
        let x = frame.paint_text(0, y, &prompt.to_string(), Style::DEFAULT);
        frame.paint_text(x, y, viewer.command_line().input(), Style::DEFAULT);
    } else if let Some(msg) = viewer.message() {
        let style = if msg.is_error { ERROR } else { Style::DEFAULT };
        frame.paint_text(0, y, &msg.text, style);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
