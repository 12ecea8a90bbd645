//! Search: text and hex pattern search over the paged file.
//!
//! Forward search (`/`, `\`) scans with [`PagedFile::find`]. Backward search
//! (`?`, `|`) walks window-sized chunks from the cursor toward offset 0 and
//! takes the last match in each. Neither wraps around the file.
//!
//! # Repeating
//!
//! A [`SearchRequest`] with no pattern, an empty pattern, or `repeat` set
//! reuses the most recent pattern of the same kind. A repeated search starts
//! one byte past the cursor (forward) or one byte before it (backward), so
//! `n` does not find the match the cursor already sits on.
//!
//! # History
//!
//! Text and hex patterns have separate histories, most recent first and
//! without duplicates. The prompts browse them with Up/Down.

use std::collections::VecDeque;
use std::io::{Read, Seek};

use memchr::memmem;
use tracing::debug;

use crate::error::SearchError;
use crate::paged_file::PagedFile;

/// Default number of patterns kept per history.
pub const DEFAULT_HISTORY: usize = 50;

// ---------------------------------------------------------------------------
// Direction and kind
// ---------------------------------------------------------------------------

/// Search direction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum SearchDirection {
    #[default]
    Forward,
    Backward,
}

impl SearchDirection {
    /// The opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

/// What the user types at the prompt.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum SearchKind {
    /// Literal bytes, typed as text.
    #[default]
    Text,
    /// Hex digits, decoded to bytes.
    Hex,
}

impl SearchKind {
    /// The prompt character for this kind and direction.
    #[must_use]
    pub const fn prompt(self, direction: SearchDirection) -> char {
        match (self, direction) {
            (Self::Text, SearchDirection::Forward) => '/',
            (Self::Text, SearchDirection::Backward) => '?',
            (Self::Hex, SearchDirection::Forward) => '\\',
            (Self::Hex, SearchDirection::Backward) => '|',
        }
    }

    /// Turn prompt input into a pattern.
    ///
    /// # Errors
    ///
    /// [`SearchError::MalformedHexPattern`] for bad hex input.
    pub fn pattern(self, input: &str) -> Result<Vec<u8>, SearchError> {
        match self {
            Self::Text => Ok(input.as_bytes().to_vec()),
            Self::Hex => parse_hex(input),
        }
    }

    /// Render a pattern the way the user would type it.
    #[must_use]
    pub fn display(self, pattern: &[u8]) -> String {
        match self {
            Self::Text => String::from_utf8_lossy(pattern).into_owned(),
            Self::Hex => hex::encode_upper(pattern),
        }
    }
}

/// Decode a hex pattern. Whitespace is ignored; anything else must be pairs
/// of hex digits.
///
/// # Errors
///
/// [`SearchError::MalformedHexPattern`] if the digit count is odd or a
/// non-hex character is present.
pub fn parse_hex(input: &str) -> Result<Vec<u8>, SearchError> {
    let digits: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(&digits).map_err(|_| SearchError::MalformedHexPattern(input.trim().to_string()))
}

// ---------------------------------------------------------------------------
// Request and match
// ---------------------------------------------------------------------------

/// One search invocation.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SearchRequest {
    /// The pattern, or `None` to reuse the last one.
    pub pattern: Option<Vec<u8>>,
    /// Start one byte away from the cursor.
    pub repeat: bool,
}

impl SearchRequest {
    /// A fresh search for `pattern`. An empty pattern repeats.
    #[must_use]
    pub fn new(pattern: impl Into<Vec<u8>>) -> Self {
        Self {
            pattern: Some(pattern.into()),
            repeat: false,
        }
    }

    /// Repeat the last pattern.
    #[must_use]
    pub const fn repeat() -> Self {
        Self {
            pattern: None,
            repeat: true,
        }
    }

    fn is_repeat(&self) -> bool {
        self.repeat || self.pattern.as_ref().is_none_or(Vec::is_empty)
    }
}

/// A found pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchMatch {
    pub offset: u64,
    pub len: u64,
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Most-recent-first pattern history without duplicates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct History {
    entries: VecDeque<Vec<u8>>,
    depth: usize,
}

impl History {
    #[must_use]
    pub const fn new(depth: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            depth,
        }
    }

    /// Record `pattern` as the most recent entry.
    pub fn push(&mut self, pattern: &[u8]) {
        if pattern.is_empty() || self.depth == 0 {
            return;
        }
        self.entries.retain(|p| p != pattern);
        self.entries.push_front(pattern.to_vec());
        self.entries.truncate(self.depth);
    }

    /// The most recent entry.
    #[must_use]
    pub fn latest(&self) -> Option<&[u8]> {
        self.entries.front().map(Vec::as_slice)
    }

    /// Entry `n`, 0 being the most recent.
    #[must_use]
    pub fn get(&self, n: usize) -> Option<&[u8]> {
        self.entries.get(n).map(Vec::as_slice)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Change the depth, dropping the oldest entries if needed.
    pub fn set_depth(&mut self, depth: usize) {
        self.depth = depth;
        self.entries.truncate(depth);
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY)
    }
}

// ---------------------------------------------------------------------------
// SearchEngine
// ---------------------------------------------------------------------------

/// Search state that outlives a single prompt: directions, the kind of the
/// last search, and both histories.
#[derive(Clone, Debug, Default)]
pub struct SearchEngine {
    /// Direction of the last text search.
    direction: SearchDirection,
    /// Direction used by [`find_hex`](Self::find_hex).
    hex_direction: SearchDirection,
    last_kind: SearchKind,
    text_history: History,
    hex_history: History,
}

impl SearchEngine {
    #[must_use]
    pub fn new(history_depth: usize) -> Self {
        Self {
            text_history: History::new(history_depth),
            hex_history: History::new(history_depth),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn direction(&self) -> SearchDirection {
        self.direction
    }

    #[must_use]
    pub const fn hex_direction(&self) -> SearchDirection {
        self.hex_direction
    }

    pub const fn set_hex_direction(&mut self, direction: SearchDirection) {
        self.hex_direction = direction;
    }

    #[must_use]
    pub const fn last_kind(&self) -> SearchKind {
        self.last_kind
    }

    #[must_use]
    pub const fn history(&self, kind: SearchKind) -> &History {
        match kind {
            SearchKind::Text => &self.text_history,
            SearchKind::Hex => &self.hex_history,
        }
    }

    /// Resize both histories.
    pub fn set_history_depth(&mut self, depth: usize) {
        self.text_history.set_depth(depth);
        self.hex_history.set_depth(depth);
    }

    // -- text ---------------------------------------------------------------

    /// Text search toward the end of the file, starting at `from`.
    ///
    /// # Errors
    ///
    /// [`SearchError::EmptyHistory`] when repeating with no history, or
    /// [`SearchError::Io`] if reading fails.
    pub fn find_forward<R: Read + Seek>(
        &mut self,
        file: &mut PagedFile<R>,
        request: &SearchRequest,
        from: u64,
    ) -> Result<Option<SearchMatch>, SearchError> {
        self.run(file, SearchKind::Text, SearchDirection::Forward, request, from)
    }

    /// Text search toward the start of the file. A match must end at or
    /// before `from`.
    ///
    /// # Errors
    ///
    /// [`SearchError::EmptyHistory`] when repeating with no history, or
    /// [`SearchError::Io`] if reading fails.
    pub fn find_backward<R: Read + Seek>(
        &mut self,
        file: &mut PagedFile<R>,
        request: &SearchRequest,
        from: u64,
    ) -> Result<Option<SearchMatch>, SearchError> {
        self.run(file, SearchKind::Text, SearchDirection::Backward, request, from)
    }

    // -- hex ----------------------------------------------------------------

    /// Hex search in the current hex direction. Spaces in `hex_string` are
    /// ignored; an empty string repeats the last hex search.
    ///
    /// # Errors
    ///
    /// [`SearchError::MalformedHexPattern`] for bad input,
    /// [`SearchError::EmptyHistory`] when repeating with no history, or
    /// [`SearchError::Io`] if reading fails.
    pub fn find_hex<R: Read + Seek>(
        &mut self,
        file: &mut PagedFile<R>,
        hex_string: &str,
        from: u64,
        repeat: bool,
    ) -> Result<Option<SearchMatch>, SearchError> {
        let request = SearchRequest {
            pattern: Some(parse_hex(hex_string)?),
            repeat,
        };
        self.run(file, SearchKind::Hex, self.hex_direction, &request, from)
    }

    // -- repeat -------------------------------------------------------------

    /// `n`: the last search again, same kind and direction.
    ///
    /// # Errors
    ///
    /// As for [`find_forward`](Self::find_forward).
    pub fn search_next<R: Read + Seek>(
        &mut self,
        file: &mut PagedFile<R>,
        from: u64,
    ) -> Result<Option<SearchMatch>, SearchError> {
        let direction = self.last_direction();
        self.repeat_last(file, direction, from)
    }

    /// `N`: the last search again in the opposite direction. The stored
    /// direction is left as it was.
    ///
    /// # Errors
    ///
    /// As for [`find_forward`](Self::find_forward).
    pub fn search_prev<R: Read + Seek>(
        &mut self,
        file: &mut PagedFile<R>,
        from: u64,
    ) -> Result<Option<SearchMatch>, SearchError> {
        let direction = self.last_direction();
        let found = self.repeat_last(file, direction.opposite(), from);
        self.set_direction(self.last_kind, direction);
        found
    }

    // -- internals ----------------------------------------------------------

    const fn last_direction(&self) -> SearchDirection {
        match self.last_kind {
            SearchKind::Text => self.direction,
            SearchKind::Hex => self.hex_direction,
        }
    }

    const fn set_direction(&mut self, kind: SearchKind, direction: SearchDirection) {
        match kind {
            SearchKind::Text => self.direction = direction,
            SearchKind::Hex => self.hex_direction = direction,
        }
    }

    const fn history_mut(&mut self, kind: SearchKind) -> &mut History {
        match kind {
            SearchKind::Text => &mut self.text_history,
            SearchKind::Hex => &mut self.hex_history,
        }
    }

    fn repeat_last<R: Read + Seek>(
        &mut self,
        file: &mut PagedFile<R>,
        direction: SearchDirection,
        from: u64,
    ) -> Result<Option<SearchMatch>, SearchError> {
        let kind = self.last_kind;
        self.run(file, kind, direction, &SearchRequest::repeat(), from)
    }

    fn run<R: Read + Seek>(
        &mut self,
        file: &mut PagedFile<R>,
        kind: SearchKind,
        direction: SearchDirection,
        request: &SearchRequest,
        from: u64,
    ) -> Result<Option<SearchMatch>, SearchError> {
        let repeat = request.is_repeat();
        let pattern = match &request.pattern {
            Some(p) if !p.is_empty() => p.clone(),
            _ => self
                .history(kind)
                .latest()
                .ok_or(SearchError::EmptyHistory)?
                .to_vec(),
        };

        self.last_kind = kind;
        self.set_direction(kind, direction);

        let found = match (direction, repeat) {
            (SearchDirection::Forward, false) => file.find(&pattern, from)?,
            (SearchDirection::Forward, true) => match from.checked_add(1) {
                Some(start) => file.find(&pattern, start)?,
                None => None,
            },
            (SearchDirection::Backward, false) => rfind(file, &pattern, from)?,
            (SearchDirection::Backward, true) => match from.checked_sub(1) {
                Some(start) => rfind(file, &pattern, start)?,
                None => None,
            },
        };

        self.history_mut(kind).push(&pattern);
        debug!(?kind, ?direction, repeat, from, ?found, "search");

        Ok(found.map(|offset| SearchMatch {
            offset,
            len: pattern.len() as u64,
        }))
    }
}

/// Offset of the last occurrence of `pattern` that ends at or before `from`.
///
/// Walks backward in chunks of at least one cache window. Consecutive
/// chunks overlap by `pattern.len() - 1` bytes so no candidate is skipped.
fn rfind<R: Read + Seek>(
    file: &mut PagedFile<R>,
    pattern: &[u8],
    from: u64,
) -> Result<Option<u64>, SearchError> {
    let plen = pattern.len() as u64;
    let end = from.saturating_add(1).min(file.len());
    if pattern.is_empty() || end < plen {
        return Ok(None);
    }

    let finder = memmem::FinderRev::new(pattern);
    let chunk = file.cache_size().max(2 * plen);
    let mut hi = end;

    loop {
        let lo = hi.saturating_sub(chunk);
        let hay = file.slice(lo, hi)?;
        if let Some(i) = finder.rfind(hay) {
            return Ok(Some(lo + i as u64));
        }
        if lo == 0 {
            return Ok(None);
        }
        hi = lo + plen - 1;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn file(bytes: &[u8], cache_size: u64) -> PagedFile<Cursor<Vec<u8>>> {
        PagedFile::from_reader(Cursor::new(bytes.to_vec()), bytes.len() as u64, cache_size)
            .unwrap()
    }

    fn at(m: Option<SearchMatch>) -> Option<u64> {
        m.map(|m| m.offset)
    }

    // -- hex parsing ----------------------------------------------------------

    #[test]
    fn hex_decodes_with_spaces() {
        assert_eq!(parse_hex("4142").unwrap(), b"AB");
        assert_eq!(parse_hex(" 41 42 ").unwrap(), b"AB");
        assert_eq!(parse_hex("dead BEEF").unwrap(), [0xde, 0xad, 0xbe, 0xef]);
        assert!(parse_hex("").unwrap().is_empty());
    }

    #[test]
    fn hex_rejects_odd_and_garbage() {
        assert!(matches!(parse_hex("414"), Err(SearchError::MalformedHexPattern(_))));
        assert!(matches!(parse_hex("4g"), Err(SearchError::MalformedHexPattern(_))));
        assert!(matches!(parse_hex("0x41"), Err(SearchError::MalformedHexPattern(_))));
    }

    #[test]
    fn find_hex_matches_bytes() {
        let mut f = file(b"xxABxx", 48);
        let mut engine = SearchEngine::default();
        let m = engine.find_hex(&mut f, "4142", 0, false).unwrap().unwrap();
        assert_eq!(m, SearchMatch { offset: 2, len: 2 });
        assert!(matches!(
            engine.find_hex(&mut f, "414", 0, false),
            Err(SearchError::MalformedHexPattern(_))
        ));
    }

    #[test]
    fn find_hex_backward() {
        let mut f = file(b"\x01\x02..\x01\x02", 48);
        let mut engine = SearchEngine::default();
        engine.set_hex_direction(SearchDirection::Backward);
        let m = engine.find_hex(&mut f, "01 02", 5, false).unwrap();
        assert_eq!(at(m), Some(4));
    }

    // -- forward --------------------------------------------------------------

    #[test]
    fn forward_from_cursor_includes_cursor() {
        let mut f = file(b"abcabc", 48);
        let mut engine = SearchEngine::default();
        let m = engine.find_forward(&mut f, &SearchRequest::new("abc"), 0).unwrap();
        assert_eq!(at(m), Some(0));
        assert_eq!(engine.direction(), SearchDirection::Forward);
    }

    #[test]
    fn repeat_forward_skips_current_match() {
        let mut f = file(b"abcabc", 48);
        let mut engine = SearchEngine::default();
        engine.find_forward(&mut f, &SearchRequest::new("abc"), 0).unwrap();
        let m = engine.find_forward(&mut f, &SearchRequest::repeat(), 0).unwrap();
        assert_eq!(at(m), Some(3));
        let m = engine.find_forward(&mut f, &SearchRequest::repeat(), 3).unwrap();
        assert_eq!(m, None);
    }

    #[test]
    fn empty_pattern_means_repeat() {
        let mut f = file(b"abcabc", 48);
        let mut engine = SearchEngine::default();
        engine.find_forward(&mut f, &SearchRequest::new("bc"), 0).unwrap();
        let m = engine.find_forward(&mut f, &SearchRequest::new(""), 1).unwrap();
        assert_eq!(at(m), Some(4));
    }

    #[test]
    fn no_wraparound_from_last_address() {
        let mut f = file(b"abcabc", 48);
        let mut engine = SearchEngine::default();
        let m = engine.find_forward(&mut f, &SearchRequest::new("a"), 5).unwrap();
        assert_eq!(m, None);
    }

    #[test]
    fn repeat_without_history_is_error() {
        let mut f = file(b"abc", 48);
        let mut engine = SearchEngine::default();
        assert!(matches!(
            engine.find_forward(&mut f, &SearchRequest::repeat(), 0),
            Err(SearchError::EmptyHistory)
        ));
        assert!(matches!(engine.search_next(&mut f, 0), Err(SearchError::EmptyHistory)));
    }

    #[test]
    fn forward_across_many_windows() {
        let mut bytes = vec![0u8; 20_000];
        bytes[17_000..17_005].copy_from_slice(b"magic");
        let mut f = file(&bytes, 4096);
        let mut engine = SearchEngine::default();
        let m = engine.find_forward(&mut f, &SearchRequest::new("magic"), 10).unwrap();
        assert_eq!(at(m), Some(17_000));
    }

    // -- backward -------------------------------------------------------------

    #[test]
    fn backward_nearest_match_ending_at_cursor() {
        let mut f = file(b"abcabc", 48);
        let mut engine = SearchEngine::default();
        let m = engine.find_backward(&mut f, &SearchRequest::new("abc"), 5).unwrap();
        assert_eq!(at(m), Some(3));
        assert_eq!(engine.direction(), SearchDirection::Backward);
    }

    #[test]
    fn backward_match_must_end_by_cursor() {
        let mut f = file(b"abcabc", 48);
        let mut engine = SearchEngine::default();
        let m = engine.find_backward(&mut f, &SearchRequest::new("abc"), 4).unwrap();
        assert_eq!(at(m), Some(0));
    }

    #[test]
    fn repeat_backward_moves_past_current_match() {
        let mut f = file(b"abcabc", 48);
        let mut engine = SearchEngine::default();
        engine.find_backward(&mut f, &SearchRequest::new("abc"), 5).unwrap();
        let m = engine.search_next(&mut f, 3).unwrap();
        assert_eq!(at(m), Some(0));
        assert_eq!(engine.search_next(&mut f, 0).unwrap(), None);
    }

    #[test]
    fn backward_across_chunks() {
        let mut bytes = vec![b'.'; 500];
        bytes[30..34].copy_from_slice(b"WXYZ");
        bytes[46..50].copy_from_slice(b"WXYZ");
        let mut f = file(&bytes, 48);
        let mut engine = SearchEngine::default();
        let m = engine.find_backward(&mut f, &SearchRequest::new("WXYZ"), 499).unwrap();
        assert_eq!(at(m), Some(46));
        let m = engine.search_next(&mut f, 46).unwrap();
        assert_eq!(at(m), Some(30));
        assert_eq!(engine.search_next(&mut f, 30).unwrap(), None);
    }

    #[test]
    fn backward_pattern_longer_than_cache() {
        let mut bytes = vec![0u8; 400];
        let pat: Vec<u8> = (1..=100).collect();
        bytes[50..150].copy_from_slice(&pat);
        let mut f = file(&bytes, 48);
        let mut engine = SearchEngine::default();
        let m = engine.find_backward(&mut f, &SearchRequest::new(pat), 399).unwrap();
        assert_eq!(at(m), Some(50));
    }

    // -- next / prev ----------------------------------------------------------

    #[test]
    fn prev_reverses_without_changing_direction() {
        let mut f = file(b"ab..ab..ab", 48);
        let mut engine = SearchEngine::default();
        engine.find_forward(&mut f, &SearchRequest::new("ab"), 4).unwrap();
        let m = engine.search_prev(&mut f, 4).unwrap();
        assert_eq!(at(m), Some(0));
        assert_eq!(engine.direction(), SearchDirection::Forward);
        let m = engine.search_next(&mut f, 0).unwrap();
        assert_eq!(at(m), Some(4));
    }

    #[test]
    fn next_follows_last_kind() {
        let mut f = file(b"AB..AB", 48);
        let mut engine = SearchEngine::default();
        engine.find_forward(&mut f, &SearchRequest::new("zz"), 0).unwrap();
        engine.find_hex(&mut f, "4142", 0, false).unwrap();
        assert_eq!(engine.last_kind(), SearchKind::Hex);
        let m = engine.search_next(&mut f, 0).unwrap();
        assert_eq!(at(m), Some(4));
    }

    // -- history --------------------------------------------------------------

    #[test]
    fn history_is_recent_first_and_unique() {
        let mut h = History::new(3);
        h.push(b"a");
        h.push(b"b");
        h.push(b"a");
        assert_eq!(h.latest(), Some(&b"a"[..]));
        assert_eq!(h.get(1), Some(&b"b"[..]));
        assert_eq!(h.len(), 2);
        h.push(b"c");
        h.push(b"d");
        assert_eq!(h.len(), 3);
        assert_eq!(h.get(2), Some(&b"a"[..]));
        h.set_depth(1);
        assert_eq!(h.len(), 1);
        h.push(b"");
        assert_eq!(h.latest(), Some(&b"d"[..]));
    }

    #[test]
    fn histories_are_per_kind() {
        let mut f = file(b"AB", 48);
        let mut engine = SearchEngine::new(10);
        engine.find_forward(&mut f, &SearchRequest::new("AB"), 0).unwrap();
        engine.find_hex(&mut f, "41", 0, false).unwrap();
        assert_eq!(engine.history(SearchKind::Text).latest(), Some(&b"AB"[..]));
        assert_eq!(engine.history(SearchKind::Hex).latest(), Some(&b"A"[..]));
    }

    #[test]
    fn not_found_is_still_recorded() {
        let mut f = file(b"abc", 48);
        let mut engine = SearchEngine::default();
        assert_eq!(engine.find_forward(&mut f, &SearchRequest::new("zz"), 0).unwrap(), None);
        assert_eq!(engine.history(SearchKind::Text).latest(), Some(&b"zz"[..]));
    }

    // -- kinds ----------------------------------------------------------------

    #[test]
    fn prompts_and_display() {
        assert_eq!(SearchKind::Text.prompt(SearchDirection::Backward), '?');
        assert_eq!(SearchKind::Hex.prompt(SearchDirection::Forward), '\\');
        assert_eq!(SearchKind::Hex.display(b"\x0a\xff"), "0AFF");
        assert_eq!(SearchKind::Text.display(b"hi"), "hi");
        assert_eq!(SearchKind::Hex.pattern("0aff").unwrap(), [0x0a, 0xff]);
    }
}
