//! Fetch one web page, keep its readable article text, and write it out as a
//! single whitespace-collapsed line.
//!
//! ```text
//! URL ──► Fetcher ──► Document ──► ContentExtractor ──► Article ──► normalize ──► text.txt
//! ```
//!
//! ```rust,ignore
//! use webpage_text::{Config, Pipeline};
//!
//! let pipeline = Pipeline::new(Config::default().with_output_path("text.txt"))?;
//! pipeline.run("https://example.com/article").await?;
//! ```

pub mod config;
pub mod extractor;
pub mod fetcher;
pub mod pipeline;
pub mod readability;
pub mod text;

pub use config::Config;
pub use extractor::{Article, ContentExtractor, ExtractionError};
pub use fetcher::{Document, FetchError, Fetcher};
pub use pipeline::{Pipeline, PipelineError};
pub use readability::Readability;
pub use text::WriteError;
