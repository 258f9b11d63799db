//! Offset/limit page windows for listing endpoints.
//!
//! Listing endpoints accept loosely typed `start` and `count` query values.
//! This crate turns them into a [`PageWindow`] whose bounds are always valid:
//! `count` falls back to [`DEFAULT_PAGE_SIZE`] whenever it lies outside
//! `1..=MAX_PAGE_SIZE`, and a negative `start` becomes `0`. Normalisation is
//! silent; callers cannot tell a clamped window from a requested one.
//!
//! ```
//! use pagination::PageWindow;
//!
//! let window = PageWindow::parse(Some("-5"), Some("50"));
//! assert_eq!(window.offset(), 0);
//! assert_eq!(window.limit(), 10);
//! ```

use serde::Deserialize;

/// Largest number of items a single page may hold.
pub const MAX_PAGE_SIZE: i64 = 10;

/// Page size used when the requested size is missing or out of range.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Normalised offset/limit pair.
///
/// ## Invariants
/// - `offset >= 0`.
/// - `1 <= limit <= MAX_PAGE_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageWindow {
    offset: i64,
    limit: i64,
}

impl PageWindow {
    /// Build a window from already-parsed values, clamping out-of-range input.
    ///
    /// # Examples
    /// ```
    /// use pagination::{DEFAULT_PAGE_SIZE, PageWindow};
    ///
    /// assert_eq!(PageWindow::clamped(3, 0).limit(), DEFAULT_PAGE_SIZE);
    /// assert_eq!(PageWindow::clamped(3, 4).offset(), 3);
    /// ```
    #[must_use]
    pub const fn clamped(start: i64, count: i64) -> Self {
        let limit = if count < 1 || count > MAX_PAGE_SIZE {
            DEFAULT_PAGE_SIZE
        } else {
            count
        };
        let offset = if start < 0 { 0 } else { start };
        Self { offset, limit }
    }

    /// Build a window from raw query-string values.
    ///
    /// Missing or non-numeric values parse as `0`, which then goes through the
    /// same clamping as [`PageWindow::clamped`].
    #[must_use]
    pub fn parse(start: Option<&str>, count: Option<&str>) -> Self {
        Self::clamped(parse_or_zero(start), parse_or_zero(count))
    }

    /// Number of items to skip.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        self.offset
    }

    /// Maximum number of items to return.
    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.limit
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::clamped(0, DEFAULT_PAGE_SIZE)
    }
}

fn parse_or_zero(value: Option<&str>) -> i64 {
    value
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .unwrap_or(0)
}

/// Raw `start`/`count` query parameters as received from a client.
///
/// Both fields stay as strings so malformed numbers reach the clamping
/// policy instead of failing extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PageParams {
    /// Requested offset.
    #[serde(default)]
    pub start: Option<String>,
    /// Requested page size.
    #[serde(default)]
    pub count: Option<String>,
}

impl PageParams {
    /// Collect `start` and `count` from raw query pairs.
    ///
    /// The first occurrence of each key wins; repeats and unrelated keys
    /// are ignored.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageParams;
    ///
    /// let params = PageParams::from_pairs([("count", "5"), ("count", "6"), ("x", "1")]);
    /// assert_eq!(params.count.as_deref(), Some("5"));
    /// assert_eq!(params.start, None);
    /// ```
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "start" => &mut params.start,
                "count" => &mut params.count,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        params
    }
}

impl From<&PageParams> for PageWindow {
    fn from(params: &PageParams) -> Self {
        Self::parse(params.start.as_deref(), params.count.as_deref())
    }
}
