//! Viewer options: the `:set` system.
//!
//! Parses `:set` directives and applies them to [`Options`]. The same
//! syntax is read from the `HEXVIEW_OPTS` environment variable at startup.
//!
//! # Supported syntax
//!
//! | Syntax             | Effect                        |
//! |--------------------|-------------------------------|
//! | `:set option`      | Enable boolean / show numeric |
//! | `:set nooption`    | Disable boolean               |
//! | `:set option!`     | Toggle boolean                |
//! | `:set option?`     | Query current value           |
//! | `:set option=N`    | Assign numeric value          |
//! | `:set option+=N`   | Add to numeric value          |
//! | `:set option-=N`   | Subtract from numeric value   |
//! | `:set option^=N`   | Multiply numeric value        |
//! | `:set`             | Show changed options          |
//! | `:set all`         | Show all options              |
//!
//! # Option names
//!
//! | Full name    | Abbrev  | Type    | Default | Meaning                    |
//! |--------------|---------|---------|---------|----------------------------|
//! | `uppercase`  | `upper` | bool    | true    | Upper-case hex digits      |
//! | `ascii`      |:       | bool    | true    | Show the ASCII column      |
//! | `cachesize`  | `cs`    | integer | 65536   | Page cache bytes           |
//! | `history`    | `hi`    | integer | 50      | Search history depth       |

use crate::command::parse_number;
use crate::paged_file::DEFAULT_CACHE_SIZE;
use crate::search::DEFAULT_HISTORY;

/// Environment variable holding startup `:set` arguments.
pub const OPTS_ENV: &str = "HEXVIEW_OPTS";

// ---------------------------------------------------------------------------
// Directives
// ---------------------------------------------------------------------------

/// A parsed `:set` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetDirective {
    /// `:set option`: enable a boolean option.
    On(String),

    /// `:set nooption`: disable a boolean option.
    Off(String),

    /// `:set option!`: toggle a boolean option.
    Toggle(String),

    /// `:set option?`: query the current value.
    Query(String),

    /// `:set option=value`.
    Assign(String, String),

    /// `:set option+=value`.
    Add(String, String),

    /// `:set option-=value`.
    Subtract(String, String),

    /// `:set option^=value`.
    Multiply(String, String),

    /// `:set` with no arguments.
    ShowChanged,

    /// `:set all`.
    ShowAll,
}

/// Full name for `name` or its abbreviation.
#[must_use]
pub fn canonical(name: &str) -> Option<&'static str> {
    match name {
        "uppercase" | "upper" => Some("uppercase"),
        "ascii" => Some("ascii"),
        "cachesize" | "cs" => Some("cachesize"),
        "history" | "hi" => Some("history"),
        _ => None,
    }
}

/// Returns `true` if `name` is a known boolean option.
#[must_use]
pub fn is_bool_option(name: &str) -> bool {
    matches!(canonical(name), Some("uppercase" | "ascii"))
}

/// Returns `true` if `name` is a known numeric option.
#[must_use]
pub fn is_numeric_option(name: &str) -> bool {
    matches!(canonical(name), Some("cachesize" | "history"))
}

/// Parse the full `:set` arguments string into directives.
#[must_use]
pub fn parse_set(args: &str) -> Vec<SetDirective> {
    let trimmed = args.trim();
    if trimmed.is_empty() {
        return vec![SetDirective::ShowChanged];
    }
    trimmed.split_whitespace().map(parse_set_arg).collect()
}

/// Parse a single `:set` argument into a directive.
#[must_use]
pub fn parse_set_arg(arg: &str) -> SetDirective {
    if arg == "all" {
        return SetDirective::ShowAll;
    }

    if let Some(eq_pos) = arg.find('=') {
        let value = arg[eq_pos + 1..].to_string();
        let lhs = &arg[..eq_pos];
        if let Some(name) = lhs.strip_suffix('+') {
            return SetDirective::Add(name.to_string(), value);
        }
        if let Some(name) = lhs.strip_suffix('-') {
            return SetDirective::Subtract(name.to_string(), value);
        }
        if let Some(name) = lhs.strip_suffix('^') {
            return SetDirective::Multiply(name.to_string(), value);
        }
        return SetDirective::Assign(lhs.to_string(), value);
    }

    if let Some(name) = arg.strip_suffix('?') {
        return SetDirective::Query(name.to_string());
    }

    if let Some(name) = arg.strip_suffix('!') {
        return SetDirective::Toggle(name.to_string());
    }

    // `noascii` is Off("ascii"), but only for real boolean names.
    if let Some(name) = arg.strip_prefix("no") {
        if is_bool_option(name) {
            return SetDirective::Off(name.to_string());
        }
    }

    if is_numeric_option(arg) {
        return SetDirective::Query(arg.to_string());
    }

    SetDirective::On(arg.to_string())
}

/// Format a boolean option for display: `name` or `noname`.
#[must_use]
pub fn format_bool(name: &str, value: bool) -> String {
    if value {
        name.to_string()
    } else {
        format!("no{name}")
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Option values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub uppercase: bool,
    pub ascii: bool,
    /// Requested cache size. The viewer rounds it to whole blocks and at
    /// least three pages when opening a file.
    pub cache_size: u64,
    pub history: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            uppercase: true,
            ascii: true,
            cache_size: DEFAULT_CACHE_SIZE,
            history: DEFAULT_HISTORY,
        }
    }
}

impl Options {
    /// Defaults with `HEXVIEW_OPTS` applied on top. A bad value is
    /// reported as the error message; the options are still usable.
    #[must_use]
    pub fn from_env() -> (Self, Option<String>) {
        let mut opts = Self::default();
        let err = std::env::var(OPTS_ENV)
            .ok()
            .and_then(|args| opts.set(&args).err());
        (opts, err)
    }

    /// Apply `:set` arguments. Returns the text to show, if any.
    ///
    /// # Errors
    ///
    /// Returns the message for the first bad argument. Directives before it
    /// have already been applied.
    pub fn set(&mut self, args: &str) -> Result<Option<String>, String> {
        let mut shown = Vec::new();
        for directive in parse_set(args) {
            if let Some(text) = self.apply(&directive)? {
                shown.push(text);
            }
        }
        Ok((!shown.is_empty()).then(|| shown.join("  ")))
    }

    /// Apply one directive.
    ///
    /// # Errors
    ///
    /// Returns a message for unknown options, bad values, and boolean
    /// operations on numeric options (or the reverse).
    pub fn apply(&mut self, directive: &SetDirective) -> Result<Option<String>, String> {
        match directive {
            SetDirective::ShowChanged => Ok(Some(self.describe(true))),
            SetDirective::ShowAll => Ok(Some(self.describe(false))),
            SetDirective::Query(name) => self.format(known(name)?).map(Some),
            SetDirective::On(name) => self.set_bool(name, |_| true),
            SetDirective::Off(name) => self.set_bool(name, |_| false),
            SetDirective::Toggle(name) => self.set_bool(name, |v| !v),
            SetDirective::Assign(name, value) => self.set_number(name, value, |_, n| Some(n)),
            SetDirective::Add(name, value) => {
                self.set_number(name, value, |old, n| Some(old.saturating_add(n)))
            }
            SetDirective::Subtract(name, value) => {
                self.set_number(name, value, |old, n| Some(old.saturating_sub(n)))
            }
            SetDirective::Multiply(name, value) => {
                self.set_number(name, value, |old, n| old.checked_mul(n))
            }
        }
    }

    fn set_bool(&mut self, name: &str, f: impl FnOnce(bool) -> bool) -> Result<Option<String>, String> {
        let slot = match known(name)? {
            "uppercase" => &mut self.uppercase,
            "ascii" => &mut self.ascii,
            _ => return Err(format!("Invalid argument: {name}")),
        };
        *slot = f(*slot);
        Ok(None)
    }

    fn set_number(
        &mut self,
        name: &str,
        value: &str,
        f: impl FnOnce(u64, u64) -> Option<u64>,
    ) -> Result<Option<String>, String> {
        let full = known(name)?;
        if !is_numeric_option(full) {
            return Err(format!("Invalid argument: {name}={value}"));
        }
        let n = parse_number(value).ok_or_else(|| format!("Number required: {name}={value}"))?;
        let invalid = || format!("Invalid argument: {name}={value}");

        match full {
            "cachesize" => {
                let new = f(self.cache_size, n).filter(|&v| v > 0).ok_or_else(invalid)?;
                self.cache_size = new;
            }
            _ => {
                let new = f(self.history as u64, n)
                    .and_then(|v| usize::try_from(v).ok())
                    .ok_or_else(invalid)?;
                self.history = new;
            }
        }
        Ok(None)
    }

    fn format(&self, full: &str) -> Result<String, String> {
        Ok(match full {
            "uppercase" => format_bool(full, self.uppercase),
            "ascii" => format_bool(full, self.ascii),
            "cachesize" => format!("{full}={}", self.cache_size),
            "history" => format!("{full}={}", self.history),
            _ => return Err(format!("Unknown option: {full}")),
        })
    }

    /// All options, or only those that differ from the defaults.
    fn describe(&self, changed_only: bool) -> String {
        let defaults = Self::default();
        let rows = [
            ("uppercase", self.uppercase != defaults.uppercase),
            ("ascii", self.ascii != defaults.ascii),
            ("cachesize", self.cache_size != defaults.cache_size),
            ("history", self.history != defaults.history),
        ];
        rows.iter()
            .filter(|(_, changed)| !changed_only || *changed)
            .filter_map(|(name, _)| self.format(name).ok())
            .collect::<Vec<_>>()
            .join("  ")
    }
}

fn known(name: &str) -> Result<&'static str, String> {
    canonical(name).ok_or_else(|| format!("Unknown option: {name}"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- parse_set_arg --------------------------------------------------------

    #[test]
    fn parse_boolean_forms() {
        assert_eq!(parse_set_arg("ascii"), SetDirective::On("ascii".into()));
        assert_eq!(parse_set_arg("noascii"), SetDirective::Off("ascii".into()));
        assert_eq!(parse_set_arg("upper!"), SetDirective::Toggle("upper".into()));
        assert_eq!(parse_set_arg("ascii?"), SetDirective::Query("ascii".into()));
    }

    #[test]
    fn parse_no_prefix_only_for_bools() {
        assert_eq!(parse_set_arg("nohistory"), SetDirective::On("nohistory".into()));
    }

    #[test]
    fn parse_numeric_forms() {
        assert_eq!(parse_set_arg("hi"), SetDirective::Query("hi".into()));
        assert_eq!(
            parse_set_arg("cs=8192"),
            SetDirective::Assign("cs".into(), "8192".into())
        );
        assert_eq!(
            parse_set_arg("hi+=5"),
            SetDirective::Add("hi".into(), "5".into())
        );
        assert_eq!(
            parse_set_arg("hi-=5"),
            SetDirective::Subtract("hi".into(), "5".into())
        );
        assert_eq!(
            parse_set_arg("cs^=2"),
            SetDirective::Multiply("cs".into(), "2".into())
        );
    }

    #[test]
    fn parse_empty_and_all() {
        assert_eq!(parse_set(""), vec![SetDirective::ShowChanged]);
        assert_eq!(parse_set("all"), vec![SetDirective::ShowAll]);
        assert_eq!(parse_set("noascii hi=3").len(), 2);
    }

    // -- apply ----------------------------------------------------------------

    #[test]
    fn booleans() {
        let mut o = Options::default();
        o.set("noascii upper!").unwrap();
        assert!(!o.ascii);
        assert!(!o.uppercase);
        o.set("ascii").unwrap();
        assert!(o.ascii);
    }

    #[test]
    fn numbers() {
        let mut o = Options::default();
        o.set("hi=10").unwrap();
        assert_eq!(o.history, 10);
        o.set("hi+=5 hi-=3").unwrap();
        assert_eq!(o.history, 12);
        o.set("hi-=100").unwrap();
        assert_eq!(o.history, 0);
        o.set("cs=0x1000 cs^=4").unwrap();
        assert_eq!(o.cache_size, 0x4000);
    }

    #[test]
    fn queries() {
        let mut o = Options::default();
        assert_eq!(o.set("ascii?").unwrap().as_deref(), Some("ascii"));
        assert_eq!(o.set("hi").unwrap().as_deref(), Some("history=50"));
        assert_eq!(o.set("").unwrap().as_deref(), Some(""));
        o.set("noupper").unwrap();
        assert_eq!(o.set("").unwrap().as_deref(), Some("nouppercase"));
        let all = o.set("all").unwrap().unwrap();
        assert!(all.contains("cachesize=65536"));
        assert!(all.contains("ascii"));
    }

    #[test]
    fn errors() {
        let mut o = Options::default();
        assert_eq!(o.set("frob").unwrap_err(), "Unknown option: frob");
        assert!(o.set("hi=abc").unwrap_err().starts_with("Number required"));
        assert!(o.set("ascii=1").unwrap_err().starts_with("Invalid argument"));
        assert!(o.set("nocs").unwrap_err().starts_with("Unknown option"));
        assert!(o.set("cs!").unwrap_err().starts_with("Invalid argument"));
        assert!(o.set("cs=0").unwrap_err().starts_with("Invalid argument"));
        assert_eq!(o, Options::default());
    }

    #[test]
    fn earlier_directives_stick_on_error() {
        let mut o = Options::default();
        assert!(o.set("noascii frob").is_err());
        assert!(!o.ascii);
    }
}
