use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::NaiveDate;
use reqwest::{Client, Url};
use tracing::debug;

use crate::models::error::{FetchError, FetchErrorClass};

/// One round trip to the rates provider for a single date.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn fetch(&self, date: NaiveDate, deadline: Duration) -> Result<Bytes, FetchError>;
}

pub struct HttpUpstream {
    client: Client,
    base_url: String,
}

impl HttpUpstream {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url_for(&self, date: NaiveDate) -> Result<Url, FetchError> {
        let raw = format!("{}/{}", self.base_url, date.format("%Y-%m-%d"));
        Url::parse(&raw).map_err(|e| {
            FetchError::new(
                FetchErrorClass::UrlBuild,
                format!("failed to parse url {}: {}", raw, e),
            )
        })
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn fetch(&self, date: NaiveDate, deadline: Duration) -> Result<Bytes, FetchError> {
        let url = self.url_for(date)?;

        let req = self
            .client
            .get(url)
            .timeout(deadline)
            .build()
            .map_err(|e| {
                FetchError::new(
                    FetchErrorClass::RequestBuild,
                    format!("failed to build HTTP request: {}", e),
                )
            })?;

        debug!("GET {}", req.url());
        let res = self
            .client
            .execute(req)
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|e| {
                FetchError::new(
                    FetchErrorClass::Transport,
                    format!("failed to do HTTP request for {}: {}", date, e),
                )
            })?;

        res.bytes().await.map_err(|e| {
            FetchError::new(
                FetchErrorClass::BodyRead,
                format!("failed to read HTTP response body for {}: {}", date, e),
            )
        })
    }
}
