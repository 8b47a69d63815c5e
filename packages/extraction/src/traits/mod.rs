//! Core trait abstractions for the fetch-and-extract worker.

pub mod fetcher;
pub mod matcher;
