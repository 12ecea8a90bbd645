// SPDX-License-Identifier: MIT
//
// hexview: a terminal hex viewer for files of any size.
//
// This is the binary that wires the two crates together:
//
//   hexview-term → terminal control, rendering, input parsing, event loop
//   hexview-core → paged file, navigation, selection, search, painting
//
// `HexApp` implements hexview-term's App trait around a core `Viewer`.
// Each keypress flows through:
//
//   stdin → parser → on_key → Viewer::dispatch → navigator/selection/search
//   paint → view::render → framebuffer → diff renderer → terminal
//
// Layout:
//
//   ┌──────────────────────────────┐
//   │ address  hex area   ascii    │  ← h - 2 rows
//   ├──────────────────────────────┤
//   │ status line                  │  ← 1 row
//   ├──────────────────────────────┤
//   │ prompt / message line        │  ← 1 row
//   └──────────────────────────────┘

mod logging;

use std::env;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::PathBuf;
use std::process;

use hexview_core::options::{OPTS_ENV, Options};
use hexview_core::view;
use hexview_core::{Outcome, Viewer};

use hexview_term::ansi::CursorShape;
use hexview_term::buffer::FrameBuffer;
use hexview_term::event_loop::{Action, App, EventLoop};
use hexview_term::input::KeyEvent;
use hexview_term::terminal::Size;

use tracing::info;

const USAGE: &str = "usage: hexview <filename>";

// ─── Arguments ──────────────────────────────────────────────────────────────

/// What the command line asked for.
#[derive(Debug, PartialEq, Eq)]
enum Args {
    View(PathBuf),
    Help,
    Version,
}

/// Exactly one file path, or `-h`/`--help`, or `-V`/`--version`. A `--`
/// ends option parsing.
fn parse_args(args: impl IntoIterator<Item = String>) -> Option<Args> {
    let mut path = None;
    let mut options_done = false;

    for arg in args {
        if !options_done {
            match arg.as_str() {
                "-h" | "--help" => return Some(Args::Help),
                "-V" | "--version" => return Some(Args::Version),
                "--" => {
                    options_done = true;
                    continue;
                }
                s if s.starts_with('-') && s.len() > 1 => return None,
                _ => {}
            }
        }
        if path.replace(PathBuf::from(arg)).is_some() {
            return None;
        }
    }

    path.map(Args::View)
}

/// Data rows for a terminal of `size`: everything but the status and
/// message lines.
fn page_rows(size: Size) -> u16 {
    size.rows.saturating_sub(2).max(1)
}

// ─── App ────────────────────────────────────────────────────────────────────

struct HexApp<R = File> {
    viewer: Viewer<R>,

    /// Screen height at the last paint, for placing the prompt cursor.
    height: u16,
}

impl<R: Read + Seek> App for HexApp<R> {
    fn on_key(&mut self, key: KeyEvent) -> Action {
        match self.viewer.dispatch(key) {
            Outcome::Redraw => Action::Redraw,
            Outcome::Unchanged => Action::Continue,
            Outcome::Quit => Action::Quit,
        }
    }

    fn on_resize(&mut self, size: Size) {
        self.height = size.rows;
        self.viewer.resize(page_rows(size));
    }

    fn paint(&mut self, frame: &mut FrameBuffer) {
        self.height = frame.height();
        view::render(&self.viewer, frame);
    }

    fn cursor(&self) -> Option<(u16, u16, CursorShape)> {
        view::cursor(&self.viewer, self.height)
    }
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() {
    let path = match parse_args(env::args().skip(1)) {
        Some(Args::View(path)) => path,
        Some(Args::Help) => {
            println!("{USAGE}");
            return;
        }
        Some(Args::Version) => {
            println!("hexview {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        None => {
            eprintln!("{USAGE}");
            process::exit(1);
        }
    };

    if let Err(e) = logging::init() {
        eprintln!("hexview: {}: {e}", logging::LOG_ENV);
    }

    let (options, opts_error) = Options::from_env();
    let mut event_loop = EventLoop::new();
    let size = event_loop.size();

    // Open before touching the terminal so errors land on a normal screen.
    let mut viewer = Viewer::open(&path, options, page_rows(size)).unwrap_or_else(|e| {
        eprintln!("hexview: {}: {e}", path.display());
        process::exit(1);
    });
    info!(path = %path.display(), len = viewer.len(), "viewing");

    if let Some(err) = opts_error {
        viewer.set_error(format!("{OPTS_ENV}: {err}"));
    }

    let mut app = HexApp {
        viewer,
        height: size.rows,
    };
    if let Err(e) = event_loop.run(&mut app) {
        eprintln!("hexview: {e}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use hexview_term::input::KeyCode;

    use super::*;

    fn args(list: &[&str]) -> Option<Args> {
        parse_args(list.iter().map(ToString::to_string))
    }

    fn app(bytes: &[u8]) -> HexApp<Cursor<Vec<u8>>> {
        let viewer = Viewer::from_reader(
            Cursor::new(bytes.to_vec()),
            bytes.len() as u64,
            "test",
            Options::default(),
            4,
        )
        .unwrap();
        HexApp { viewer, height: 6 }
    }

    // ── Arguments ─────────────────────────────────────────────────────────

    #[test]
    fn one_path() {
        assert_eq!(args(&["a.bin"]), Some(Args::View("a.bin".into())));
    }

    #[test]
    fn missing_or_extra_path_is_usage_error() {
        assert_eq!(args(&[]), None);
        assert_eq!(args(&["a", "b"]), None);
        assert_eq!(args(&["-x", "a"]), None);
    }

    #[test]
    fn help_and_version() {
        assert_eq!(args(&["-h"]), Some(Args::Help));
        assert_eq!(args(&["a", "--version"]), Some(Args::Version));
    }

    #[test]
    fn double_dash_allows_dash_names() {
        assert_eq!(args(&["--", "-odd"]), Some(Args::View("-odd".into())));
        assert_eq!(args(&["-"]), Some(Args::View("-".into())));
    }

    #[test]
    fn page_rows_leave_room_for_two_lines() {
        assert_eq!(page_rows(Size { cols: 80, rows: 24 }), 22);
        assert_eq!(page_rows(Size { cols: 80, rows: 1 }), 1);
    }

    // ── App ───────────────────────────────────────────────────────────────

    #[test]
    fn outcomes_map_to_actions() {
        let mut a = app(b"0123456789");
        assert_eq!(a.on_key(KeyEvent::char('l')), Action::Redraw);
        assert_eq!(a.on_key(KeyEvent::char('k')), Action::Continue);
        assert_eq!(a.on_key(KeyEvent::char('Z')), Action::Continue);
        assert_eq!(a.on_key(KeyEvent::char('Z')), Action::Quit);
    }

    #[test]
    fn prompt_cursor_follows_paint_height() {
        let mut a = app(b"abc");
        a.on_key(KeyEvent::char(':'));
        let mut frame = FrameBuffer::new(80, 10);
        a.paint(&mut frame);
        assert_eq!(a.cursor(), Some((1, 9, CursorShape::SteadyBar)));
        a.on_key(KeyEvent::plain(KeyCode::Escape));
        assert_eq!(a.cursor(), None);
    }

    #[test]
    fn resize_updates_page() {
        let mut a = app(&[0u8; 4096]);
        a.on_resize(Size { cols: 80, rows: 40 });
        assert_eq!(a.viewer.navigator().page_rows(), 38);
        assert_eq!(a.height, 40);
    }
}
