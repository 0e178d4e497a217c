use std::time::Duration;

use catalog_core::{FetchOutcome, Provider};
use catalog_logging::{catalog_debug, catalog_warn};
use futures_util::StreamExt;
use reqwest::StatusCode;
use url::Url;

use crate::records::{parse_products, parse_providers};
use crate::{FailureKind, FetchError};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// API origin; endpoints are appended below its path.
    pub base_url: Url,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Upper bound for one provider's fetch inside a batch.
    pub batch_timeout: Duration,
    pub max_bytes: u64,
}

impl FetchSettings {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            batch_timeout: Duration::from_secs(15),
            max_bytes: 2 * 1024 * 1024,
        }
    }
}

/// Network capability the engine runs batches against.
#[async_trait::async_trait]
pub trait CatalogFetcher: Send + Sync {
    async fn fetch_providers(&self) -> Result<Vec<Provider>, FetchError>;

    /// Never fails: 404 is `NotFound`, anything else that goes wrong is
    /// `Failure`.
    async fn fetch_products(&self, provider_code: &str) -> FetchOutcome;
}

#[derive(Debug, Clone)]
pub struct ReqwestCatalogFetcher {
    settings: FetchSettings,
    client: reqwest::Client,
}

impl ReqwestCatalogFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.settings.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                FetchError::new(
                    FailureKind::InvalidUrl,
                    format!("{} cannot carry a path", self.settings.base_url),
                )
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Body of a successful GET, or `None` on 404.
    async fn get_body(&self, url: Url) -> Result<Option<Vec<u8>>, FetchError> {
        catalog_debug!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(Some(bytes))
    }
}

#[async_trait::async_trait]
impl CatalogFetcher for ReqwestCatalogFetcher {
    async fn fetch_providers(&self) -> Result<Vec<Provider>, FetchError> {
        let url = self.endpoint(&["api", "providers"])?;
        match self.get_body(url).await? {
            Some(bytes) => parse_providers(&bytes),
            None => Err(FetchError::new(
                FailureKind::HttpStatus(StatusCode::NOT_FOUND.as_u16()),
                StatusCode::NOT_FOUND.to_string(),
            )),
        }
    }

    async fn fetch_products(&self, provider_code: &str) -> FetchOutcome {
        let body = match self.endpoint(&["api", "products", provider_code]) {
            Ok(url) => self.get_body(url).await,
            Err(err) => Err(err),
        };
        let result = body.and_then(|body| match body {
            Some(bytes) => parse_products(provider_code, &bytes).map(Some),
            None => Ok(None),
        });

        match result {
            Ok(Some(products)) => FetchOutcome::Success(products),
            Ok(None) => FetchOutcome::NotFound,
            Err(err) => {
                catalog_warn!("Products for {} failed: {}", provider_code, err);
                FetchOutcome::Failure(err.to_string())
            }
        }
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
