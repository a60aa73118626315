use std::time::Instant;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::{info, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::settings::Settings;

/// Raw page HTML plus the URL it came from.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub url: Url,
    pub html: String,
}

pub fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw.trim()).map_err(|source| Error::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}

/// Single-page download capability.
pub trait Fetch {
    fn fetch(&self, url: &Url) -> Result<SourceDocument>;
}

/// Blocking HTTP fetcher: one GET, no retries, default redirect following.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(settings: &Settings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let ua = HeaderValue::from_str(&settings.user_agent).map_err(|e| {
            Error::Config(config::ConfigError::Message(format!(
                "user_agent is not a valid header value: {}",
                e
            )))
        })?;
        headers.insert(USER_AGENT, ua);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(settings.timeout())
            .build()?;

        Ok(HttpFetcher { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<SourceDocument> {
        info!(%url, "Fetching page");
        let start = Instant::now();

        let resp = self.client.get(url.clone()).send()?;
        let status = resp.status();
        if status.is_client_error() || status.is_server_error() {
            warn!(%url, %status, "Page request rejected");
            return Err(Error::HttpStatus {
                status,
                url: url.to_string(),
            });
        }

        let html = resp.text()?;
        info!(
            %url,
            %status,
            bytes = html.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Fetched page"
        );

        Ok(SourceDocument {
            url: url.clone(),
            html,
        })
    }
}
