//! # hexview-core: Viewer core for hexview
//!
//! This crate holds everything between the terminal and the file:
//!
//! - **[`paged_file`]**: `PagedFile`, a sliding cache window over a large file
//! - **[`navigation`]**: `Navigator`, cursor and viewport in byte offsets
//! - **[`selection`]**: `Selection`, the anchored rubber-band range
//! - **[`search`]**: `SearchEngine`, text and hex search with history
//! - **[`viewer`]**: `Viewer`, the session that owns all of the above
//! - **[`view`]**: paints a `Viewer` into a frame buffer
//!
//! The remaining modules are small helpers for the session: view modes,
//! word classes, the `:` command line, `:set` options, and the keymap.

pub mod command;
pub mod error;
pub mod keymap;
pub mod mode;
pub mod navigation;
pub mod options;
pub mod paged_file;
pub mod search;
pub mod selection;
pub mod view;
pub mod view_mode;
pub mod viewer;
pub mod word;

pub use error::{NavError, PagedFileError, SearchError};
pub use paged_file::PagedFile;
pub use viewer::{Outcome, Viewer};
