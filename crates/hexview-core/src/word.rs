//! Word motions over raw bytes.
//!
//! | Motion            | Key | Description                          |
//! |-------------------|-----|--------------------------------------|
//! | [`word_forward`]  | `w` | Forward to start of next word        |
//! | [`word_backward`] | `b` | Backward to start of previous word   |
//!
//! A **word** is a run of ASCII letters, digits and `_`. Every other byte is
//! **space**. This finds strings embedded in binary data: `w` hops from one
//! identifier-like run to the next, skipping whatever lies between.

use std::io::{Read, Seek};

use crate::error::PagedFileError;
use crate::paged_file::PagedFile;

// ---------------------------------------------------------------------------
// Byte classification
// ---------------------------------------------------------------------------

/// Byte class for word boundary detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteClass {
    /// ASCII letters, digits, underscore.
    Word,
    /// Everything else.
    Space,
}

/// Classify a byte for word motions.
#[must_use]
pub const fn classify(b: u8) -> ByteClass {
    if b.is_ascii_alphanumeric() || b == b'_' {
        ByteClass::Word
    } else {
        ByteClass::Space
    }
}

fn is_word<R: Read + Seek>(file: &mut PagedFile<R>, addr: u64) -> Result<bool, PagedFileError> {
    Ok(classify(file.byte_at(addr)?) == ByteClass::Word)
}

// ---------------------------------------------------------------------------
// Motions
// ---------------------------------------------------------------------------

/// `w`: forward to the start of the next word.
///
/// 1. Skip the rest of the current word, if on one.
/// 2. Skip space.
/// 3. Land on the first byte of the next word.
///
/// Stays put when there is no next word.
///
/// # Errors
///
/// Returns an error if a window reload fails.
pub fn word_forward<R: Read + Seek>(
    file: &mut PagedFile<R>,
    addr: u64,
) -> Result<u64, PagedFileError> {
    let len = file.len();
    if addr.saturating_add(1) >= len {
        return Ok(addr);
    }

    let mut idx = addr;
    if is_word(file, idx)? {
        while idx < len && is_word(file, idx)? {
            idx += 1;
        }
    }
    while idx < len && !is_word(file, idx)? {
        idx += 1;
    }

    Ok(if idx >= len { addr } else { idx })
}

/// `b`: backward to the start of the previous word.
///
/// 1. Step back one byte.
/// 2. Skip space backward.
/// 3. Skip backward through the word to its start.
///
/// Lands on offset 0 when only space precedes `addr`.
///
/// # Errors
///
/// Returns an error if a window reload fails.
pub fn word_backward<R: Read + Seek>(
    file: &mut PagedFile<R>,
    addr: u64,
) -> Result<u64, PagedFileError> {
    let addr = addr.min(file.len());
    if addr == 0 {
        return Ok(0);
    }

    let mut idx = addr - 1;
    while !is_word(file, idx)? {
        if idx == 0 {
            return Ok(0);
        }
        idx -= 1;
    }
    while idx > 0 && is_word(file, idx - 1)? {
        idx -= 1;
    }

    Ok(idx)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn file(bytes: &[u8]) -> PagedFile<Cursor<Vec<u8>>> {
        PagedFile::from_reader(Cursor::new(bytes.to_vec()), bytes.len() as u64, 8).unwrap()
    }

    // -- classify -------------------------------------------------------------

    #[test]
    fn classify_word_bytes() {
        for b in [b'a', b'Z', b'0', b'9', b'_'] {
            assert_eq!(classify(b), ByteClass::Word);
        }
    }

    #[test]
    fn classify_space_bytes() {
        for b in [0x00, b' ', b'.', b'\n', 0x7f, 0xe9, 0xff] {
            assert_eq!(classify(b), ByteClass::Space);
        }
    }

    // -- w --------------------------------------------------------------------

    #[test]
    fn w_skips_to_next_word() {
        let mut f = file(b"ELF\x00\x00\x01main\x00");
        assert_eq!(word_forward(&mut f, 0).unwrap(), 6);
        assert_eq!(word_forward(&mut f, 1).unwrap(), 6);
    }

    #[test]
    fn w_from_space() {
        let mut f = file(b"..abc");
        assert_eq!(word_forward(&mut f, 0).unwrap(), 2);
    }

    #[test]
    fn w_across_windows() {
        let mut bytes = vec![0u8; 100];
        bytes[0..3].copy_from_slice(b"abc");
        bytes[90..93].copy_from_slice(b"xyz");
        let mut f = file(&bytes);
        assert_eq!(word_forward(&mut f, 0).unwrap(), 90);
    }

    #[test]
    fn w_without_next_word_stays() {
        let mut f = file(b"abc...");
        assert_eq!(word_forward(&mut f, 1).unwrap(), 1);
        assert_eq!(word_forward(&mut f, 5).unwrap(), 5);
    }

    #[test]
    fn w_on_empty_file() {
        let mut f = file(b"");
        assert_eq!(word_forward(&mut f, 0).unwrap(), 0);
    }

    // -- b --------------------------------------------------------------------

    #[test]
    fn b_to_word_start() {
        let mut f = file(b"foo..bar");
        assert_eq!(word_backward(&mut f, 7).unwrap(), 5);
        assert_eq!(word_backward(&mut f, 5).unwrap(), 0);
    }

    #[test]
    fn b_from_space_after_word() {
        let mut f = file(b"foo....");
        assert_eq!(word_backward(&mut f, 6).unwrap(), 0);
    }

    #[test]
    fn b_only_space_lands_on_zero() {
        let mut f = file(b"\x00\x00\x00ab");
        assert_eq!(word_backward(&mut f, 3).unwrap(), 0);
    }

    #[test]
    fn b_at_start_stays() {
        let mut f = file(b"abc");
        assert_eq!(word_backward(&mut f, 0).unwrap(), 0);
    }

    #[test]
    fn b_from_one_past_end() {
        let mut f = file(b"..abc");
        assert_eq!(word_backward(&mut f, 5).unwrap(), 2);
    }
}
