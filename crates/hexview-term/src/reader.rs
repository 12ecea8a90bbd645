// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Stdin reader: wait for input with a timeout, then read what is there.
//
// The viewer is single-threaded. The event loop calls `read_timeout`, which
// `poll()`s stdin's file descriptor and returns either the bytes that
// arrived or `None` when the timeout expired. The timeout doubles as the
// Escape-key disambiguation delay: if a lone ESC is pending and nothing
// follows within it, the parser flushes it as the Escape key.

use std::io;
use std::time::Duration;

/// Bytes read per call. A keypress is 1-6 bytes.
const READ_BUF_SIZE: usize = 1024;

/// Reads raw bytes from stdin.
pub struct StdinReader {
    buf: [u8; READ_BUF_SIZE],
}

impl StdinReader {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buf: [0; READ_BUF_SIZE],
        }
    }

    /// Wait up to `timeout` for input.
    ///
    /// Returns `Ok(Some(bytes))` when input arrived, `Ok(None)` when the
    /// timeout expired or the wait was interrupted by a signal, and
    /// `Ok(Some(&[]))` on end of file.
    ///
    /// # Errors
    ///
    /// Returns the OS error if `poll` or `read` fails.
    #[cfg(unix)]
    pub fn read_timeout(&mut self, timeout: Duration) -> io::Result<Option<&[u8]>> {
        let timeout_ms = i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX);

        let ready = unsafe {
            let mut pfd = libc::pollfd {
                fd: libc::STDIN_FILENO,
                events: libc::POLLIN,
                revents: 0,
            };
            libc::poll(&raw mut pfd, 1, timeout_ms)
        };

        if ready < 0 {
            let err = io::Error::last_os_error();
            // SIGWINCH interrupts poll; the loop checks the resize flag next.
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(None);
            }
            return Err(err);
        }
        if ready == 0 {
            return Ok(None);
        }

        let n = unsafe {
            libc::read(
                libc::STDIN_FILENO,
                self.buf.as_mut_ptr().cast(),
                self.buf.len(),
            )
        };
        if n < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(None);
            }
            return Err(err);
        }

        #[allow(clippy::cast_sign_loss)]
        Ok(Some(&self.buf[..n as usize]))
    }

    /// Blocking fallback without a timeout.
    ///
    /// # Errors
    ///
    /// Returns the error from reading stdin.
    #[cfg(not(unix))]
    pub fn read_timeout(&mut self, _timeout: Duration) -> io::Result<Option<&[u8]>> {
        use std::io::Read;
        let n = io::stdin().lock().read(&mut self.buf)?;
        Ok(Some(&self.buf[..n]))
    }
}

impl Default for StdinReader {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
