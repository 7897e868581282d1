use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

use crate::config::Config;
use crate::extractor::{ContentExtractor, ExtractionError};
use crate::fetcher::{FetchError, Fetcher};
use crate::readability::Readability;
use crate::text::{self, WriteError};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("InvalidInputError: {0}")]
    InvalidInput(FetchError),
    #[error("FetchError: {0}")]
    Fetch(FetchError),
    #[error("ExtractionError: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("WriteError: {0}")]
    Write(#[from] WriteError),
}

impl From<FetchError> for PipelineError {
    fn from(err: FetchError) -> Self {
        if err.is_invalid_input() {
            PipelineError::InvalidInput(err)
        } else {
            PipelineError::Fetch(err)
        }
    }
}

impl PipelineError {
    /// Process exit status for this kind of failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            PipelineError::InvalidInput(_) => 2,
            PipelineError::Fetch(_) => 3,
            PipelineError::Extraction(_) => 4,
            PipelineError::Write(_) => 5,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Fetch, extract, normalize and write, in that order, stopping at the first
/// failure. Nothing is written unless fetch and extraction both succeed.
pub struct Pipeline<E = Readability> {
    config: Config,
    fetcher: Fetcher,
    extractor: E,
}

impl Pipeline<Readability> {
    pub fn new(config: Config) -> Result<Self> {
        Self::with_extractor(config, Readability::default())
    }
}

impl<E: ContentExtractor> Pipeline<E> {
    pub fn with_extractor(config: Config, extractor: E) -> Result<Self> {
        let fetcher = Fetcher::new(&config)?;
        Ok(Self {
            config,
            fetcher,
            extractor,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs one extraction and returns the path written.
    pub async fn run(&self, url: &str) -> Result<PathBuf> {
        let document = self.fetcher.fetch(url).await?;

        let article = self.extractor.extract(&document)?;
        drop(document);

        let mut output = text::normalize(&article.title, &article.body);
        if self.config.trim {
            output = output.trim().to_string();
        }

        text::write_text(&output, &self.config.output_path)?;

        info!(url, path = %self.config.output_path.display(), "done");
        Ok(self.config.output_path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::Article;
    use crate::fetcher::Document;
    use std::path::Path;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SCENARIO_A: &str = "<html><head><title>Hi</title></head><body><article><p>Hello   world.\n\nBye.</p></article></body></html>";

    fn config_in(tmp: &TempDir) -> Config {
        Config::default()
            .with_output_path(tmp.path().join("text.txt"))
            .with_timeout(5)
    }

    async fn serve(body: &str, content_type: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), content_type))
            .mount(&server)
            .await;
        server
    }

    fn read(path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    #[tokio::test]
    async fn article_is_written_with_title_prefix() {
        let tmp = TempDir::new().unwrap();
        let server = serve(SCENARIO_A, "text/html").await;
        let pipeline = Pipeline::new(config_in(&tmp)).unwrap();

        let written = pipeline.run(&format!("{}/page", server.uri())).await.unwrap();

        assert_eq!(written, tmp.path().join("text.txt"));
        assert_eq!(read(&written), "Hi Hello world. Bye.");
    }

    #[tokio::test]
    async fn unreachable_host_is_fetch_error_and_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let pipeline = Pipeline::new(config_in(&tmp)).unwrap();
        let err = pipeline.run(&format!("http://{addr}/page")).await.unwrap_err();

        assert!(matches!(err, PipelineError::Fetch(_)));
        assert_eq!(err.exit_code(), 3);
        assert!(!tmp.path().join("text.txt").exists());
    }

    #[tokio::test]
    async fn empty_page_is_extraction_error_and_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let server = serve("<html><head><title>Empty</title></head><body></body></html>", "text/html").await;
        let pipeline = Pipeline::new(config_in(&tmp)).unwrap();

        let err = pipeline.run(&format!("{}/page", server.uri())).await.unwrap_err();

        assert!(matches!(err, PipelineError::Extraction(ExtractionError::NoContent)));
        assert_eq!(err.exit_code(), 4);
        assert!(!tmp.path().join("text.txt").exists());
    }

    #[tokio::test]
    async fn failure_leaves_existing_file_untouched() {
        let tmp = TempDir::new().unwrap();
        let output = tmp.path().join("text.txt");
        std::fs::write(&output, "previous run").unwrap();

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let pipeline = Pipeline::new(config_in(&tmp)).unwrap();
        let err = pipeline.run(&format!("{}/page", server.uri())).await.unwrap_err();

        assert!(matches!(err, PipelineError::Fetch(FetchError::Status { status: 500, .. })));
        assert_eq!(read(&output), "previous run");
    }

    #[tokio::test]
    async fn malformed_url_is_invalid_input() {
        let tmp = TempDir::new().unwrap();
        let pipeline = Pipeline::new(config_in(&tmp)).unwrap();

        let err = pipeline.run("not a url").await.unwrap_err();

        assert!(matches!(err, PipelineError::InvalidInput(FetchError::InvalidUrl(_))));
        assert_eq!(err.exit_code(), 2);
        assert!(!tmp.path().join("text.txt").exists());
    }

    #[tokio::test]
    async fn non_html_response_is_fetch_error() {
        let tmp = TempDir::new().unwrap();
        let server = serve("{\"title\": \"json\"}", "application/json").await;
        let pipeline = Pipeline::new(config_in(&tmp)).unwrap();

        let err = pipeline.run(&format!("{}/page", server.uri())).await.unwrap_err();

        assert!(matches!(err, PipelineError::Fetch(FetchError::NotHtml(_))));
    }

    #[tokio::test]
    async fn unwritable_destination_is_write_error() {
        let tmp = TempDir::new().unwrap();
        let server = serve(SCENARIO_A, "text/html").await;
        let config = config_in(&tmp).with_output_path(tmp.path().join("no-such-dir").join("text.txt"));
        let pipeline = Pipeline::new(config).unwrap();

        let err = pipeline.run(&format!("{}/page", server.uri())).await.unwrap_err();

        assert!(matches!(err, PipelineError::Write(_)));
        assert_eq!(err.exit_code(), 5);
    }

    #[tokio::test]
    async fn trim_removes_stray_edge_space() {
        let tmp = TempDir::new().unwrap();
        let server = serve(
            "<html><body><article>\n  <p>Untitled page body.</p>\n</article></body></html>",
            "text/html",
        )
        .await;

        let untrimmed = Pipeline::new(config_in(&tmp)).unwrap();
        let written = untrimmed.run(&format!("{}/page", server.uri())).await.unwrap();
        assert_eq!(read(&written), " Untitled page body. ");

        let trimmed = Pipeline::new(config_in(&tmp).with_trim(true)).unwrap();
        let written = trimmed.run(&format!("{}/page", server.uri())).await.unwrap();
        assert_eq!(read(&written), "Untitled page body.");
    }

    struct Fixed;

    impl ContentExtractor for Fixed {
        fn extract(&self, document: &Document) -> crate::extractor::Result<Article> {
            Ok(Article {
                title: document.url().host_str().unwrap_or_default().to_string(),
                body: "fixed\tbody".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn extractor_is_pluggable() {
        let tmp = TempDir::new().unwrap();
        let server = serve(SCENARIO_A, "text/html").await;
        let pipeline = Pipeline::with_extractor(config_in(&tmp), Fixed).unwrap();

        let written = pipeline.run(&format!("{}/page", server.uri())).await.unwrap();

        assert_eq!(read(&written), "127.0.0.1 fixed body");
    }
}
