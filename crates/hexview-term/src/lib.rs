// SPDX-License-Identifier: MIT
//
// hexview-term: terminal layer for hexview.
//
// Raw termios and ANSI escape sequences, no TUI framework underneath.
// The application paints a grid of cells, the diff renderer sends only
// what changed since the last frame, and the event loop turns stdin bytes
// into key events.

pub mod ansi;
pub mod buffer;
pub mod cell;
pub mod color;
pub mod diff;
pub mod event_loop;
pub mod input;
pub mod output;
pub mod reader;
pub mod terminal;
