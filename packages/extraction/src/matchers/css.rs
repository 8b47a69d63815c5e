//! CSS selector matcher backed by the `scraper` crate.

use scraper::{Html, Selector};

use crate::error::{SelectError, SelectResult};
use crate::traits::matcher::SelectorMatcher;

/// Matches CSS selectors against an HTML document.
///
/// Only the first matching element is used. Its descendant text nodes are
/// concatenated and whitespace runs are collapsed to a single space, so
/// `<p>  Hello\n <b>World</b> </p>` yields `"Hello World"`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CssMatcher;

impl CssMatcher {
    pub fn new() -> Self {
        Self
    }

    fn parse_selector(selector: &str) -> SelectResult<Selector> {
        Selector::parse(selector).map_err(|e| SelectError::InvalidSelector {
            selector: selector.to_string(),
            reason: e.to_string(),
        })
    }

    fn normalize_whitespace(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

impl SelectorMatcher for CssMatcher {
    fn select_text(&self, html: &str, selector: &str) -> SelectResult<Option<String>> {
        let selector = Self::parse_selector(selector)?;
        let document = Html::parse_document(html);

        Ok(document
            .select(&selector)
            .next()
            .map(|el| Self::normalize_whitespace(&el.text().collect::<String>())))
    }
}
