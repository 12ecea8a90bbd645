//! Viewer modes.
//!
//! The viewer is always in exactly one [`Mode`]. Selecting is not a mode of
//! its own: the selection stays active while prompts come and go.
//!
//! | Mode            | Prompt        | Keys go to            |
//! |-----------------|---------------|-----------------------|
//! | Normal          | none          | the keymap            |
//! | Command         | `:`           | the command line      |
//! | Search          | `/ ? \ \|`    | the command line      |

use std::fmt;

use hexview_term::ansi::CursorShape;

use crate::search::{SearchDirection, SearchKind};

/// The current input mode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Keys are viewer commands.
    #[default]
    Normal,
    /// Typing a `:` command.
    Command,
    /// Typing a search pattern.
    Search(SearchKind, SearchDirection),
}

impl Mode {
    /// The prompt character, if this mode reads a line of input.
    #[must_use]
    pub const fn prompt(self) -> Option<char> {
        match self {
            Self::Normal => None,
            Self::Command => Some(':'),
            Self::Search(kind, direction) => Some(kind.prompt(direction)),
        }
    }

    /// Whether keys are going to the command line.
    #[must_use]
    pub const fn is_prompt(self) -> bool {
        !matches!(self, Self::Normal)
    }

    /// Hardware cursor shape. Prompts show a bar; the hex grid draws its
    /// own cursor.
    #[must_use]
    pub const fn cursor_shape(self) -> Option<CursorShape> {
        match self {
            Self::Normal => None,
            Self::Command | Self::Search(..) => Some(CursorShape::SteadyBar),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => f.write_str("NORMAL"),
            Self::Command => f.write_str("COMMAND"),
            Self::Search(SearchKind::Text, _) => f.write_str("SEARCH"),
            Self::Search(SearchKind::Hex, _) => f.write_str("HEX SEARCH"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
