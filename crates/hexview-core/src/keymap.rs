//! Normal-mode key bindings.
//!
//! A [`Keymap`] maps `(KeyCode, Modifiers)` to an [`Op`]. The viewer looks
//! every normal-mode key up here and runs the resulting operation; keys
//! without a binding are ignored.
//!
//! `Z` is a prefix: the viewer waits for a second `Z` before quitting.

use std::collections::HashMap;

use hexview_term::input::{KeyCode, KeyEvent, Modifiers};

use crate::search::{SearchDirection, SearchKind};
use crate::view_mode::ViewMode;

/// A normal-mode operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    RollLeft,
    RollRight,
    PageUp,
    PageDown,
    Home,
    End,
    LineStart,
    LineEnd,
    ScreenTop,
    ScreenMiddle,
    ScreenBottom,
    WordForward,
    WordBack,
    View(ViewMode),
    ToggleSelect,
    /// Esc: drop the selection.
    LeaveSelect,
    /// Open a search prompt.
    Search(SearchKind, SearchDirection),
    SearchNext,
    SearchPrev,
    CommandLine,
    /// First half of `ZZ`.
    QuitPrefix,
}

/// Lookup table from keys to operations.
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: HashMap<(KeyCode, Modifiers), Op>,
}

impl Keymap {
    /// The default bindings.
    #[must_use]
    pub fn new() -> Self {
        let mut map = Self {
            bindings: HashMap::new(),
        };

        // Motion.
        for (code, op) in [
            (KeyCode::Up, Op::MoveUp),
            (KeyCode::Down, Op::MoveDown),
            (KeyCode::Left, Op::MoveLeft),
            (KeyCode::Right, Op::MoveRight),
            (KeyCode::PageUp, Op::PageUp),
            (KeyCode::PageDown, Op::PageDown),
            (KeyCode::Home, Op::Home),
            (KeyCode::End, Op::End),
            (KeyCode::Escape, Op::LeaveSelect),
        ] {
            map.bind(KeyEvent::plain(code), op);
        }

        for (ch, op) in [
            ('k', Op::MoveUp),
            ('j', Op::MoveDown),
            ('h', Op::MoveLeft),
            ('l', Op::MoveRight),
            ('<', Op::RollLeft),
            (',', Op::RollLeft),
            ('>', Op::RollRight),
            ('.', Op::RollRight),
            ('g', Op::Home),
            ('G', Op::End),
            ('0', Op::LineStart),
            ('^', Op::LineStart),
            ('$', Op::LineEnd),
            ('H', Op::ScreenTop),
            ('M', Op::ScreenMiddle),
            ('L', Op::ScreenBottom),
            ('w', Op::WordForward),
            ('b', Op::WordBack),
            ('v', Op::ToggleSelect),
            ('V', Op::ToggleSelect),
            ('n', Op::SearchNext),
            ('N', Op::SearchPrev),
            (':', Op::CommandLine),
            ('Z', Op::QuitPrefix),
        ] {
            map.bind(KeyEvent::char(ch), op);
        }

        for (ch, op) in [
            ('b', Op::PageUp),
            ('f', Op::PageDown),
            ('v', Op::ToggleSelect),
            ('g', Op::SearchNext),
        ] {
            map.bind(KeyEvent::ctrl(ch), op);
        }

        // Search prompts.
        for (ch, kind, direction) in [
            ('/', SearchKind::Text, SearchDirection::Forward),
            ('?', SearchKind::Text, SearchDirection::Backward),
            ('\\', SearchKind::Hex, SearchDirection::Forward),
            ('|', SearchKind::Hex, SearchDirection::Backward),
        ] {
            map.bind(KeyEvent::char(ch), Op::Search(kind, direction));
        }

        // View modes 1 through 5.
        for (n, mode) in (1u32..).zip(ViewMode::ALL) {
            if let Some(digit) = char::from_digit(n, 10) {
                map.bind(KeyEvent::char(digit), Op::View(mode));
            }
        }

        map
    }

    /// Bind `key` to `op`, returning the previous binding.
    pub fn bind(&mut self, key: KeyEvent, op: Op) -> Option<Op> {
        self.bindings.insert(Self::normalize(key), op)
    }

    /// The operation bound to `key`.
    #[must_use]
    pub fn lookup(&self, key: KeyEvent) -> Option<Op> {
        self.bindings.get(&Self::normalize(key)).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Shift is already folded into the character.
    fn normalize(key: KeyEvent) -> (KeyCode, Modifiers) {
        let mut modifiers = key.modifiers;
        if matches!(key.code, KeyCode::Char(_)) {
            modifiers.remove(Modifiers::SHIFT);
        }
        (key.code, modifiers)
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
