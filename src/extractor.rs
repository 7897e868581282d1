//! The content extraction seam.
//!
//! Anything that turns a parsed [`Document`] into an [`Article`] (or fails)
//! can stand in for the default [`Readability`](crate::readability::Readability)
//! heuristic.

use thiserror::Error;

use crate::fetcher::Document;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Document has no <body> element")]
    NoBody,
    #[error("No readable content found")]
    NoContent,
}

pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Primary readable content of a page, markup stripped.
///
/// Neither field is whitespace-normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub body: String,
}

pub trait ContentExtractor {
    fn extract(&self, document: &Document) -> Result<Article>;
}
