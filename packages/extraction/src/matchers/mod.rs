//! Selector matcher implementations.

mod css;

pub use css::CssMatcher;

pub use crate::traits::matcher::SelectorMatcher;
