// SPDX-License-Identifier: MIT
//
// Terminal input parser.
//
// Turns raw stdin bytes into key events. Only the legacy encodings are
// decoded, because the viewer never switches the terminal into any of the
// extended keyboard, mouse or paste protocols:
//
// - CSI sequences (arrows, Home/End, PageUp/PageDown, Insert/Delete, F-keys),
//   including the xterm `1;<mod>` modifier parameter
// - SS3 sequences (application-mode arrows and F1-F4)
// - C0 control bytes as Ctrl+letter
// - Alt+key (ESC followed by a printable byte)
// - UTF-8 multi-byte characters
//
// Sequences can be split across reads, so the parser keeps unconsumed bytes
// between calls to `advance`. A lone ESC stays pending until the caller
// decides no more bytes are coming and calls `flush`.

use bitflags::bitflags;

// ─── Key Types ──────────────────────────────────────────────────────────────

/// A key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key with no modifiers.
    #[inline]
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// Ctrl + character.
    #[inline]
    #[must_use]
    pub const fn ctrl(ch: char) -> Self {
        Self {
            code: KeyCode::Char(ch),
            modifiers: Modifiers::CTRL,
        }
    }

    /// A printable character with no modifiers.
    #[inline]
    #[must_use]
    pub const fn char(ch: char) -> Self {
        Self::plain(KeyCode::Char(ch))
    }
}

/// Identity of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A Unicode character.
    Char(char),
    // ── Named keys ──────────────────────────────────────────────
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    Insert,
    // ── Navigation ──────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    /// F1 through F20.
    F(u8),
}

bitflags! {
    /// Keyboard modifier flags, in xterm's `param = 1 + bitmask` order.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
    }
}

// ─── Parser ─────────────────────────────────────────────────────────────────

/// Incremental key parser.
///
/// Feed bytes with [`advance`](Parser::advance). A bare `ESC` (0x1B) might
/// be the Escape key or the start of a sequence; it is held back until more
/// bytes arrive or [`flush`](Parser::flush) is called.
pub struct Parser {
    buf: Vec<u8>,
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(64),
        }
    }

    /// Feed raw bytes and return every complete key.
    pub fn advance(&mut self, data: &[u8]) -> Vec<KeyEvent> {
        self.buf.extend_from_slice(data);
        let mut keys = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            match try_parse(&self.buf[pos..]) {
                Parsed::Key(key, consumed) => {
                    keys.push(key);
                    pos += consumed;
                }
                Parsed::Incomplete => break,
                Parsed::Skip(n) => pos += n,
            }
        }

        self.buf.drain(..pos);
        keys
    }

    /// Whether bytes are waiting for the rest of a sequence.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Resolve pending bytes as literal keys: a lone ESC becomes Escape,
    /// anything else its plain or Ctrl meaning.
    pub fn flush(&mut self) -> Vec<KeyEvent> {
        let keys = self
            .buf
            .iter()
            .filter_map(|&byte| match byte {
                0x1B => Some(KeyEvent::plain(KeyCode::Escape)),
                0x7F => Some(KeyEvent::plain(KeyCode::Backspace)),
                b @ 0x01..=0x1A => Some(KeyEvent::ctrl(char::from(b + b'a' - 1))),
                b @ 0x20..=0x7E => Some(KeyEvent::char(char::from(b))),
                _ => None,
            })
            .collect();
        self.buf.clear();
        keys
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Stateless Parsing ──────────────────────────────────────────────────────

enum Parsed {
    /// A key, consuming `usize` bytes.
    Key(KeyEvent, usize),
    /// Need more bytes.
    Incomplete,
    /// Unrecognized input, skip `usize` bytes.
    Skip(usize),
}

fn try_parse(buf: &[u8]) -> Parsed {
    let Some(&first) = buf.first() else {
        return Parsed::Skip(0);
    };

    match first {
        0x1B => parse_escape(buf),
        0x00 => Parsed::Key(KeyEvent::ctrl('@'), 1),
        0x08 | 0x7F => Parsed::Key(KeyEvent::plain(KeyCode::Backspace), 1),
        0x09 => Parsed::Key(KeyEvent::plain(KeyCode::Tab), 1),
        0x0A | 0x0D => Parsed::Key(KeyEvent::plain(KeyCode::Enter), 1),
        b @ 0x01..=0x1A => Parsed::Key(KeyEvent::ctrl(char::from(b + b'a' - 1)), 1),
        b @ 0x20..=0x7E => Parsed::Key(KeyEvent::char(char::from(b)), 1),
        0xC0..=0xFF => parse_utf8(buf),
        _ => Parsed::Skip(1),
    }
}

fn parse_escape(buf: &[u8]) -> Parsed {
    if buf.len() < 2 {
        return Parsed::Incomplete;
    }

    match buf[1] {
        b'[' => parse_csi(buf),
        b'O' => parse_ss3(buf),
        0x1B => Parsed::Key(
            KeyEvent {
                code: KeyCode::Escape,
                modifiers: Modifiers::ALT,
            },
            2,
        ),
        b @ 0x20..=0x7E => Parsed::Key(
            KeyEvent {
                code: KeyCode::Char(char::from(b)),
                modifiers: Modifiers::ALT,
            },
            2,
        ),
        // Escape followed by something we don't pair with it.
        _ => Parsed::Key(KeyEvent::plain(KeyCode::Escape), 1),
    }
}

// ── CSI ────────────────────────────────────────────────────────────────────

fn parse_csi(buf: &[u8]) -> Parsed {
    // Parameter bytes 0x30-0x3F, intermediates 0x20-0x2F, final 0x40-0x7E.
    let mut end = 2;
    while end < buf.len() {
        let b = buf[end];
        if (0x40..=0x7E).contains(&b) {
            break;
        }
        if !(0x20..=0x3F).contains(&b) {
            return Parsed::Skip(end + 1);
        }
        end += 1;
    }
    if end >= buf.len() {
        return Parsed::Incomplete;
    }

    let final_byte = buf[end];
    let params = parse_params(&buf[2..end]);
    let consumed = end + 1;
    let modifiers = params.get(1).map_or(Modifiers::empty(), |&p| decode_modifiers(p));

    let code = if final_byte == b'~' {
        match params.first().copied().unwrap_or(0) {
            1 | 7 => KeyCode::Home,
            2 => KeyCode::Insert,
            3 => KeyCode::Delete,
            4 | 8 => KeyCode::End,
            5 => KeyCode::PageUp,
            6 => KeyCode::PageDown,
            n @ 11..=15 => KeyCode::F(fkey(n - 10)),
            n @ 17..=21 => KeyCode::F(fkey(n - 11)),
            n @ 23..=26 => KeyCode::F(fkey(n - 12)),
            n @ 28..=29 => KeyCode::F(fkey(n - 13)),
            n @ 31..=34 => KeyCode::F(fkey(n - 14)),
            _ => return Parsed::Skip(consumed),
        }
    } else {
        match final_byte {
            b'A' => KeyCode::Up,
            b'B' => KeyCode::Down,
            b'C' => KeyCode::Right,
            b'D' => KeyCode::Left,
            b'H' => KeyCode::Home,
            b'F' => KeyCode::End,
            b'P' => KeyCode::F(1),
            b'Q' => KeyCode::F(2),
            b'R' => KeyCode::F(3),
            b'S' => KeyCode::F(4),
            b'Z' => {
                return Parsed::Key(
                    KeyEvent {
                        code: KeyCode::Tab,
                        modifiers: Modifiers::SHIFT,
                    },
                    consumed,
                );
            }
            _ => return Parsed::Skip(consumed),
        }
    };

    Parsed::Key(KeyEvent { code, modifiers }, consumed)
}

// ── SS3 ────────────────────────────────────────────────────────────────────

fn parse_ss3(buf: &[u8]) -> Parsed {
    if buf.len() < 3 {
        return Parsed::Incomplete;
    }

    let code = match buf[2] {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'P' => KeyCode::F(1),
        b'Q' => KeyCode::F(2),
        b'R' => KeyCode::F(3),
        b'S' => KeyCode::F(4),
        _ => return Parsed::Skip(3),
    };

    Parsed::Key(KeyEvent::plain(code), 3)
}

// ── UTF-8 ──────────────────────────────────────────────────────────────────

fn parse_utf8(buf: &[u8]) -> Parsed {
    let expected = utf8_char_len(buf[0]);
    if expected == 0 {
        return Parsed::Skip(1);
    }
    if buf.len() < expected {
        return Parsed::Incomplete;
    }

    std::str::from_utf8(&buf[..expected])
        .ok()
        .and_then(|s| s.chars().next())
        .map_or(Parsed::Skip(1), |ch| Parsed::Key(KeyEvent::char(ch), expected))
}

// ─── Helpers ────────────────────────────────────────────────────────────────

/// Semicolon-separated numeric CSI parameters. Missing values read as 0.
fn parse_params(raw: &[u8]) -> Vec<u16> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(|&b| b == b';')
        .map(|part| {
            part.iter()
                .take_while(|b| b.is_ascii_digit())
                .fold(0u16, |acc, &b| {
                    acc.saturating_mul(10).saturating_add(u16::from(b - b'0'))
                })
        })
        .collect()
}

/// Decode the xterm modifier parameter (`1 + bitmask`).
#[allow(clippy::cast_possible_truncation)]
const fn decode_modifiers(param: u16) -> Modifiers {
    let val = if param > 0 { param - 1 } else { 0 };
    Modifiers::from_bits_truncate(val as u8)
}

/// Function key number; callers pass values in 1..=20.
#[allow(clippy::cast_possible_truncation)]
const fn fkey(n: u16) -> u8 {
    n as u8
}

/// Byte length of a UTF-8 character from its lead byte, 0 if invalid.
const fn utf8_char_len(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 0,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
