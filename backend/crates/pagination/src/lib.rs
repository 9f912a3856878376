//! Opaque cursor and pagination envelope primitives shared by backend
//! endpoints.
//!
//! Cursors encode a position in a stable, newest-first listing as an opaque
//! base64 token so clients cannot depend on (or tamper with) the underlying
//! offset representation. The [`Page`] envelope pairs a window of items with
//! the token for the next window, if any.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Query parameter name carrying a cursor token in listing URLs.
pub const CURSOR_PARAM: &str = "cursor";

/// Largest window a single page may return.
pub const MAX_PAGE_SIZE: usize = 100;

/// Default window applied when the caller does not request a size.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Errors raised while decoding a cursor token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    /// Token is not valid URL-safe base64.
    #[error("cursor token is not valid base64: {message}")]
    Encoding {
        /// Decoder detail, safe to echo back to clients.
        message: String,
    },
    /// Token decoded but the payload is not a cursor.
    #[error("cursor payload is malformed: {message}")]
    Payload {
        /// Decoder detail, safe to echo back to clients.
        message: String,
    },
}

impl CursorError {
    /// Helper for base64 decoding failures.
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
        }
    }

    /// Helper for payload deserialisation failures.
    pub fn payload(message: impl Into<String>) -> Self {
        Self::Payload {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct CursorPayload {
    #[serde(rename = "o")]
    offset: u64,
}

/// Opaque position in a stable listing.
///
/// # Examples
/// ```
/// use pagination::Cursor;
///
/// let token = Cursor::at_offset(40).encode();
/// let cursor = Cursor::decode(&token).expect("round-trips");
/// assert_eq!(cursor.offset(), 40);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor(CursorPayload);

impl Cursor {
    /// Cursor pointing at the start of the listing.
    #[must_use]
    pub const fn start() -> Self {
        Self(CursorPayload { offset: 0 })
    }

    /// Cursor pointing at the given zero-based offset.
    #[must_use]
    pub const fn at_offset(offset: u64) -> Self {
        Self(CursorPayload { offset })
    }

    /// Zero-based offset this cursor points at.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.0.offset
    }

    /// Render the cursor as an opaque URL-safe token.
    #[must_use]
    pub fn encode(&self) -> String {
        // CursorPayload serialisation cannot fail: it is a plain integer field.
        let json = serde_json::to_vec(&self.0).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Parse an opaque token back into a cursor.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError`] when the token is not base64 or does not
    /// contain a cursor payload.
    pub fn decode(token: &str) -> Result<Self, CursorError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token.trim())
            .map_err(|err| CursorError::encoding(err.to_string()))?;
        let payload: CursorPayload =
            serde_json::from_slice(&bytes).map_err(|err| CursorError::payload(err.to_string()))?;
        Ok(Self(payload))
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::start()
    }
}

/// One window of a listing plus the token for the next window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// Build a page directly from a window and an optional continuation token.
    #[must_use]
    pub const fn new(items: Vec<T>, next_cursor: Option<String>) -> Self {
        Self { items, next_cursor }
    }

    /// Items in this window.
    #[must_use]
    pub fn items(&self) -> &[T] {
        self.items.as_slice()
    }

    /// Consume the page, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Token for the next window, when more items remain.
    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref()
    }

    /// Map each item in the window, keeping the continuation token.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
        }
    }
}

/// Slice one window out of an already-ordered listing.
///
/// The requested size is clamped to [`MAX_PAGE_SIZE`]; a size of zero falls
/// back to [`DEFAULT_PAGE_SIZE`]. The continuation token is present only when
/// items remain beyond the returned window.
///
/// # Examples
/// ```
/// use pagination::{Cursor, paginate};
///
/// let page = paginate((0..45).collect::<Vec<_>>(), &Cursor::start(), 20);
/// assert_eq!(page.items().len(), 20);
/// assert!(page.next_cursor().is_some());
/// ```
#[must_use]
pub fn paginate<T>(items: Vec<T>, cursor: &Cursor, size: usize) -> Page<T> {
    let window = match size {
        0 => DEFAULT_PAGE_SIZE,
        oversized if oversized > MAX_PAGE_SIZE => MAX_PAGE_SIZE,
        sized => sized,
    };
    let total = items.len() as u64;
    let offset = cursor.offset().min(total);
    let window_items: Vec<T> = items
        .into_iter()
        .skip(usize::try_from(offset).unwrap_or(usize::MAX))
        .take(window)
        .collect();
    let consumed = offset.saturating_add(window_items.len() as u64);
    let next_cursor = (consumed < total).then(|| Cursor::at_offset(consumed).encode());
    Page::new(window_items, next_cursor)
}

/// Append a continuation token to a listing URL.
///
/// # Examples
/// ```
/// use pagination::{Cursor, next_link};
/// use url::Url;
///
/// let base = Url::parse("https://api.example.test/v1/transactions").expect("valid url");
/// let link = next_link(&base, &Cursor::at_offset(20).encode());
/// assert!(link.query().is_some());
/// ```
#[must_use]
pub fn next_link(base: &Url, token: &str) -> Url {
    let mut link = base.clone();
    link.query_pairs_mut().append_pair(CURSOR_PARAM, token);
    link
}
