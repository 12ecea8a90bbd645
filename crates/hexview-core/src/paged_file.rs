//! Paged random access into a file that may not fit in memory.
//!
//! A [`PagedFile`] keeps one contiguous window `[low, high)` of the file in
//! a buffer. Reads inside the window are served from memory. A read outside
//! it reloads the window (a "page fault") and then answers. The window never
//! holds bytes that disagree with the file: a failed reload leaves it empty
//! rather than stale.
//!
//! # Window placement
//!
//! | Request            | New window                                     |
//! |--------------------|------------------------------------------------|
//! | `byte_at(addr)`    | centered on `addr`, clamped into the file       |
//! | `slice(start, end)`| current `low` if that covers, else from `start` |
//! | `find(pat, from)`  | from the scan position, advancing forward       |
//!
//! The source is generic over `Read + Seek`, so tests run against an
//! in-memory cursor and the viewer runs against a [`File`].

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use memchr::memmem;
use tracing::{debug, trace};

use crate::error::PagedFileError;

/// I/O block size. Cache sizes chosen by the viewer are multiples of this.
pub const BLOCK_SIZE: u64 = 4096;

/// Default cache size when nothing else is configured.
pub const DEFAULT_CACHE_SIZE: u64 = 16 * BLOCK_SIZE;

/// Round a requested cache size so it is a whole number of blocks and
/// holds at least three pages of `page_bytes`.
#[must_use]
pub const fn cache_size_for(requested: u64, page_bytes: u64) -> u64 {
    let min = page_bytes.saturating_mul(3);
    let size = if requested > min { requested } else { min };
    let size = if size == 0 { BLOCK_SIZE } else { size };
    size.div_ceil(BLOCK_SIZE).saturating_mul(BLOCK_SIZE)
}

// ---------------------------------------------------------------------------
// PagedFile
// ---------------------------------------------------------------------------

/// A read-only file viewed through a sliding cache window.
#[derive(Debug)]
pub struct PagedFile<R> {
    source: R,

    /// Total length of the file in bytes.
    len: u64,

    /// Target window size.
    cache_size: u64,

    /// Offset of `buf[0]` in the file. The window is `[low, low + buf.len())`.
    low: u64,

    buf: Vec<u8>,

    /// Page faults since the file was opened.
    reloads: u64,
}

impl PagedFile<File> {
    /// Open `path` and load the first window.
    ///
    /// # Errors
    ///
    /// Returns [`PagedFileError::Io`] if the file cannot be opened, stat'ed
    /// or read.
    pub fn open(path: impl AsRef<Path>, cache_size: u64) -> Result<Self, PagedFileError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        debug!(path = %path.display(), len, cache_size, "open");
        Self::from_reader(file, len, cache_size)
    }

    /// Release the file handle and the cache buffer.
    pub fn close(self) {
        debug!(reloads = self.reloads, "close");
    }
}

impl<R: Read + Seek> PagedFile<R> {
    /// Wrap a source of `len` bytes and load `[0, min(len, cache_size))`.
    ///
    /// A `cache_size` of zero is treated as one block.
    ///
    /// # Errors
    ///
    /// Returns [`PagedFileError::Io`] if the initial read fails.
    pub fn from_reader(source: R, len: u64, cache_size: u64) -> Result<Self, PagedFileError> {
        let cache_size = if cache_size == 0 { BLOCK_SIZE } else { cache_size };
        let mut file = Self {
            source,
            len,
            cache_size,
            low: 0,
            buf: Vec::new(),
            reloads: 0,
        };
        file.load(0, cache_size)?;
        Ok(file)
    }

    // -- accessors ----------------------------------------------------------

    /// File length in bytes.
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

    /// The resident window as `(low, high)`.
    #[inline]
    #[must_use]
    pub fn window(&self) -> (u64, u64) {
        (self.low, self.high())
    }

    #[inline]
    #[must_use]
    pub const fn cache_size(&self) -> u64 {
        self.cache_size
    }

    /// Number of page faults since the file was opened. The initial load
    /// does not count.
    #[inline]
    #[must_use]
    pub const fn reloads(&self) -> u64 {
        self.reloads
    }

    // -- reads --------------------------------------------------------------

    /// The byte at `addr`, reloading the window around it if needed.
    ///
    /// # Errors
    ///
    /// [`PagedFileError::OutOfRange`] if `addr >= len`, or
    /// [`PagedFileError::Io`] if the reload fails.
    pub fn byte_at(&mut self, addr: u64) -> Result<u8, PagedFileError> {
        if addr >= self.len {
            return Err(self.out_of_range(addr));
        }
        if !self.covers(addr, addr + 1) {
            let low = addr
                .saturating_sub(self.cache_size / 2)
                .min(self.len.saturating_sub(self.cache_size));
            self.fault(low, self.cache_size)?;
        }
        Ok(self.buf[self.index(addr)])
    }

    /// The bytes in `[start, end)`.
    ///
    /// If the range is not resident, the window is reloaded at its current
    /// `low` when a full window from there would cover the range, and
    /// anchored at `start` otherwise. Ranges longer than the cache size get
    /// a window of their own length.
    ///
    /// # Errors
    ///
    /// [`PagedFileError::OutOfRange`] if `start > end` or `end > len`, or
    /// [`PagedFileError::Io`] if the reload fails.
    pub fn slice(&mut self, start: u64, end: u64) -> Result<&[u8], PagedFileError> {
        if start > end {
            return Err(self.out_of_range(start));
        }
        if end > self.len {
            return Err(self.out_of_range(end));
        }
        if start == end {
            return Ok(&[]);
        }

        if !self.covers(start, end) {
            let span = end - start;
            if span > self.cache_size {
                self.fault(start, span)?;
            } else if start >= self.low && end <= self.low + self.cache_size {
                self.fault(self.low, self.cache_size)?;
            } else {
                let low = start.min(self.len.saturating_sub(self.cache_size));
                self.fault(low, self.cache_size)?;
            }
        }

        let (from, to) = (self.index(start), self.index(end));
        Ok(&self.buf[from..to])
    }

    /// Offset of the first occurrence of `pattern` at or after `from`.
    ///
    /// The scan walks forward window by window. Each new window starts
    /// `pattern.len()` bytes before the end of the previous one, so a match
    /// straddling the boundary is still found. The scan stops at the end of
    /// the file and never wraps around.
    ///
    /// # Errors
    ///
    /// Returns [`PagedFileError::Io`] if a reload fails.
    pub fn find(&mut self, pattern: &[u8], from: u64) -> Result<Option<u64>, PagedFileError> {
        let plen = pattern.len() as u64;
        if pattern.is_empty() || from.checked_add(plen).is_none_or(|end| end > self.len) {
            return Ok(None);
        }

        let finder = memmem::Finder::new(pattern);
        let want = self.cache_size.max(2 * plen);
        let mut pos = from;

        loop {
            let need = self.len.min(pos + 2 * plen);
            if !self.covers(pos, need) {
                self.fault(pos, want)?;
            }

            let hay = &self.buf[self.index(pos)..];
            if let Some(i) = finder.find(hay) {
                let at = pos + i as u64;
                trace!(at, "find hit");
                return Ok(Some(at));
            }

            let high = self.high();
            if high >= self.len {
                return Ok(None);
            }
            pos = high - plen;
        }
    }

    // -- window management --------------------------------------------------

    #[inline]
    fn high(&self) -> u64 {
        self.low + self.buf.len() as u64
    }

    #[inline]
    fn covers(&self, start: u64, end: u64) -> bool {
        start >= self.low && end <= self.high()
    }

    #[allow(clippy::cast_possible_truncation)]
    #[inline]
    const fn index(&self, addr: u64) -> usize {
        (addr - self.low) as usize
    }

    const fn out_of_range(&self, addr: u64) -> PagedFileError {
        PagedFileError::OutOfRange {
            addr,
            len: self.len,
        }
    }

    /// A reload after the initial load.
    fn fault(&mut self, low: u64, want: u64) -> Result<(), PagedFileError> {
        self.reloads += 1;
        self.load(low, want)?;
        trace!(low, high = self.high(), reloads = self.reloads, "page fault");
        Ok(())
    }

    /// Read up to `want` bytes starting at `low` into the window.
    ///
    /// On failure the window is left empty at `low`.
    fn load(&mut self, low: u64, want: u64) -> Result<(), PagedFileError> {
        let want = want.min(self.len.saturating_sub(low));
        self.low = low;
        self.buf.clear();

        let result = self
            .source
            .seek(SeekFrom::Start(low))
            .and_then(|_| (&mut self.source).take(want).read_to_end(&mut self.buf));

        match result {
            Ok(n) if n as u64 == want => Ok(()),
            Ok(n) => {
                self.buf.clear();
                Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("short read at {low:#x}: {n} of {want} bytes"),
                )
                .into())
            }
            Err(e) => {
                self.buf.clear();
                Err(e.into())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
