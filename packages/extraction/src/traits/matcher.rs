//! Selector matching over fetched HTML.

use crate::error::SelectResult;

/// Locates an element in an HTML document and returns its text.
///
/// Implementations are pure: the same `(html, selector)` pair always yields
/// the same answer.
pub trait SelectorMatcher: Send + Sync {
    /// Returns `Ok(None)` when nothing matches and an error when the
    /// selector itself is malformed.
    fn select_text(&self, html: &str, selector: &str) -> SelectResult<Option<String>>;
}
