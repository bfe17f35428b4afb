use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{config::ProviderConfig, error::ImageError, model::ImageResult};

use super::{ImageProvider, truncate_body};

pub const DEFAULT_BASE_URL: &str = "https://api.giphy.com/v1";

#[derive(Debug, Clone)]
pub struct GiphyProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl GiphyProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    pub fn from_config(cfg: &ProviderConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;

        Ok(Self {
            api_key: cfg.api_key.clone(),
            base_url: cfg
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            http,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct GiphyOriginal {
    url: String,
}

#[derive(Debug, Deserialize)]
struct GiphyImages {
    original: GiphyOriginal,
}

#[derive(Debug, Deserialize)]
struct GiphyData {
    images: GiphyImages,
}

#[derive(Debug, Deserialize)]
struct GiphyTranslateResponse {
    data: GiphyData,
}

#[async_trait]
impl ImageProvider for GiphyProvider {
    #[instrument(skip(self), fields(provider = "giphy"))]
    async fn search(&self, term: &str) -> Result<ImageResult, ImageError> {
        let url = format!("{}/gifs/translate", self.base_url);
        debug!(%url, term, "requesting image");

        let res = self
            .http
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("s", term)])
            .send()
            .await
            .map_err(|e| ImageError::Transport(e.without_url().to_string()))?;

        let status = res.status();
        if !status.is_success() {
            return Err(ImageError::Rejected(status.as_u16()));
        }

        let body = res
            .text()
            .await
            .map_err(|e| ImageError::Transport(format!("failed to read body: {}", e.without_url())))?;

        let parsed: GiphyTranslateResponse = serde_json::from_str(&body)
            .map_err(|e| ImageError::MalformedResponse(format!("{e}: {}", truncate_body(&body))))?;

        Ok(ImageResult { url: parsed.data.images.original.url })
    }
}
