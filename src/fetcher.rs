use base64::Engine;
use reqwest::header::CONTENT_TYPE;
use scraper::Html;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::{ParseError, Url};

use crate::config::Config;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("UrlError, can't parse given URL: {0}")]
    InvalidUrl(#[from] ParseError),
    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
    #[error("Malformed data URL, expected data:text/html;base64,...")]
    DataUrl,
    #[error("Base64Error when decoding data URL: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("ReqwestError: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status} when fetching {url}")]
    Status { status: u16, url: String },
    #[error("Not an HTML document, content type is {0}")]
    NotHtml(String),
}

impl FetchError {
    /// Errors raised before any request is attempted.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            FetchError::InvalidUrl(_)
                | FetchError::UnsupportedScheme(_)
                | FetchError::DataUrl
                | FetchError::Base64(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;

const HTML_MEDIA_TYPES: [&str; 2] = ["text/html", "application/xhtml+xml"];

/// A fetched page parsed into a navigable tree.
pub struct Document {
    url: Url,
    html: Html,
}

impl Document {
    pub fn parse(url: Url, source: &str) -> Self {
        Self {
            url,
            html: Html::parse_document(source),
        }
    }

    /// Final URL of the page, after redirects.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn html(&self) -> &Html {
        &self.html
    }
}

/// Resolves a URL into a [`Document`] with exactly one request and no retries.
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client })
    }

    pub async fn fetch(&self, url: &str) -> Result<Document> {
        let url = Url::parse(url)?;

        match url.scheme() {
            "http" | "https" => self.fetch_http(url).await,
            "data" => Self::parse_data_url(url),
            other => Err(FetchError::UnsupportedScheme(other.to_string())),
        }
    }

    async fn fetch_http(&self, url: Url) -> Result<Document> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        match response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            Some(content_type) if !is_html_media_type(content_type) => {
                return Err(FetchError::NotHtml(content_type.to_string()));
            }
            Some(_) => {}
            None => warn!(url = %url, "response has no content type, parsing it as HTML"),
        }

        let final_url = response.url().clone();
        let source = response.text().await?;

        info!(url = %final_url, status = status.as_u16(), bytes = source.len(), "fetched page");

        Ok(Document::parse(final_url, &source))
    }

    fn parse_data_url(url: Url) -> Result<Document> {
        // data:text/html;base64,PGh0bWw+...
        let (meta, data) = url.path().split_once(',').ok_or(FetchError::DataUrl)?;

        let mut params = meta.split(';');
        let media_type = params.next().unwrap_or_default();
        let is_base64 = params.any(|p| p.eq_ignore_ascii_case("base64"));

        if !is_base64 || !is_html_media_type(media_type) {
            return Err(FetchError::DataUrl);
        }

        let bytes = base64::engine::general_purpose::STANDARD.decode(data)?;
        let source = String::from_utf8_lossy(&bytes);

        debug!(bytes = bytes.len(), "decoded data URL");

        Ok(Document::parse(url, &source))
    }
}

fn is_html_media_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    HTML_MEDIA_TYPES.contains(&essence.as_str())
}
