// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Event loop: read keys, let the application react, repaint on request.
//
// The loop is single-threaded and blocking. Each iteration waits on stdin
// with `poll()`, parses what arrived, hands each key to the application,
// and repaints only when a handler returned `Action::Redraw` (or the
// terminal was resized). An idle viewer costs nothing.
//
// # Escape timeout
//
// While the parser holds a lone ESC, the loop waits only `ESC_TIMEOUT`
// for more bytes. If none arrive, the ESC is flushed as the Escape key.
// Otherwise the loop waits `IDLE_TIMEOUT`, long enough to be idle and
// short enough to notice a resize even if the signal is missed.
//
// # SIGWINCH
//
// The handler only sets an atomic flag. The signal also interrupts
// `poll()`, so the loop picks up the new size on the next iteration.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, trace};

use crate::ansi::{self, CursorShape};
use crate::buffer::FrameBuffer;
use crate::diff::DiffRenderer;
use crate::input::{KeyEvent, Parser};
use crate::reader::StdinReader;
use crate::terminal::{Size, Terminal};

/// How long a lone ESC may wait for the rest of a sequence.
const ESC_TIMEOUT: Duration = Duration::from_millis(25);

/// Poll timeout with nothing pending.
const IDLE_TIMEOUT: Duration = Duration::from_millis(500);

// ─── SIGWINCH ────────────────────────────────────────────────────────────────

static SIGWINCH_RECEIVED: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
fn install_sigwinch_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        // No SA_RESTART: poll() must return EINTR so the loop sees the resize.
        sa.sa_flags = 0;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
fn install_sigwinch_handler() {}

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application wants after handling a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Nothing visible changed.
    Continue,
    /// State changed; repaint.
    Redraw,
    /// Leave the loop.
    Quit,
}

/// Application interface for the [`EventLoop`].
///
/// Only [`paint`](App::paint) is required.
pub trait App {
    /// Handle one key.
    fn on_key(&mut self, _key: KeyEvent) -> Action {
        Action::Continue
    }

    /// The terminal was resized. The frame buffer is already resized and a
    /// repaint follows.
    fn on_resize(&mut self, _size: Size) {}

    /// Paint the whole screen into a cleared buffer.
    fn paint(&mut self, buf: &mut FrameBuffer);

    /// Where to show the hardware cursor after painting, or `None` to
    /// keep it hidden.
    fn cursor(&self) -> Option<(u16, u16, CursorShape)> {
        None
    }
}

/// Result of delivering a batch of keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Flow {
    quit: bool,
    redraw: bool,
}

/// Hand keys to the application until one of them quits.
fn deliver(app: &mut impl App, keys: &[KeyEvent]) -> Flow {
    let mut flow = Flow::default();
    for &key in keys {
        trace!(?key, "key");
        match app.on_key(key) {
            Action::Continue => {}
            Action::Redraw => flow.redraw = true,
            Action::Quit => {
                flow.quit = true;
                break;
            }
        }
    }
    flow
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// The terminal event loop.
///
/// ```no_run
/// use hexview_term::buffer::FrameBuffer;
/// use hexview_term::event_loop::{Action, App, EventLoop};
/// use hexview_term::input::{KeyCode, KeyEvent};
///
/// struct Quitter;
///
/// impl App for Quitter {
///     fn on_key(&mut self, key: KeyEvent) -> Action {
///         if key.code == KeyCode::Char('q') {
///             return Action::Quit;
///         }
///         Action::Continue
///     }
///
///     fn paint(&mut self, _buf: &mut FrameBuffer) {}
/// }
///
/// EventLoop::new().run(&mut Quitter)?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct EventLoop {
    terminal: Terminal,
    parser: Parser,
    reader: StdinReader,
    renderer: DiffRenderer,
}

impl EventLoop {
    #[must_use]
    pub fn new() -> Self {
        Self {
            terminal: Terminal::new(),
            parser: Parser::new(),
            reader: StdinReader::new(),
            renderer: DiffRenderer::new(),
        }
    }

    /// The current terminal size.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    /// Enter full-screen mode and run until the application quits or stdin
    /// closes. The terminal is restored on every exit path.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup, input, or output fails.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<()> {
        self.terminal.enter()?;
        install_sigwinch_handler();

        let result = self.run_inner(app);

        self.terminal.leave()?;
        result
    }

    fn run_inner(&mut self, app: &mut impl App) -> io::Result<()> {
        let size = self.terminal.size();
        let mut frame = FrameBuffer::new(size.cols, size.rows);
        let mut dirty = true;

        loop {
            if dirty {
                self.draw(app, &mut frame)?;
                dirty = false;
            }

            let timeout = if self.parser.has_pending() {
                ESC_TIMEOUT
            } else {
                IDLE_TIMEOUT
            };

            let keys = match self.reader.read_timeout(timeout)? {
                Some([]) => {
                    debug!("stdin closed");
                    return Ok(());
                }
                Some(bytes) => self.parser.advance(bytes),
                None if self.parser.has_pending() => self.parser.flush(),
                None => Vec::new(),
            };

            let flow = deliver(app, &keys);
            if flow.quit {
                return Ok(());
            }
            dirty |= flow.redraw;

            if SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed) {
                let new_size = self.terminal.refresh_size();
                debug!(cols = new_size.cols, rows = new_size.rows, "resize");
                frame.resize(new_size.cols, new_size.rows);
                self.renderer.force_redraw();
                app.on_resize(new_size);
                dirty = true;
            }
        }
    }

    fn draw(&mut self, app: &mut impl App, frame: &mut FrameBuffer) -> io::Result<()> {
        frame.clear();
        app.paint(frame);
        let stats = self.renderer.render(frame);
        trace!(
            rendered = stats.cells_rendered,
            skipped = stats.cells_skipped,
            bytes = stats.bytes_written,
            "frame"
        );
        self.renderer.flush()?;

        let mut lock = io::stdout().lock();
        if let Some((x, y, shape)) = app.cursor() {
            ansi::cursor_to(&mut lock, x, y)?;
            ansi::set_cursor_shape(&mut lock, shape)?;
            ansi::cursor_show(&mut lock)?;
        } else {
            ansi::cursor_hide(&mut lock)?;
        }
        lock.flush()
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
