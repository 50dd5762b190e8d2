//! HTTP catalog client.
//!
//! Implements [`Catalog`] against the remote movie API.
//!
//! Features:
//! - Token-bucket rate limiting via [`governor`].
//! - Per-endpoint response caching (lists, detail and search have separate TTLs).
//! - Unwrapping of the `data` envelope used by the `v1/api` endpoints.
//! - Every failure is logged and reported as "no data".

use std::num::NonZeroU32;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use marquee_common::{Error, MovieDetailResponse, MovieList};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::{cache::ResponseCache, Catalog};
use crate::config::CatalogConfig;

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

const NEW_MOVIES_PATH: &str = "/danh-sach/phim-moi-cap-nhat";
const CATEGORY_PATH: &str = "/v1/api/danh-sach";
const GENRE_PATH: &str = "/v1/api/the-loai";
const SEARCH_PATH: &str = "/v1/api/tim-kiem";
const DETAIL_PATH: &str = "/phim";

/// Which cache lifetime a request uses.
#[derive(Debug, Clone, Copy)]
enum Endpoint {
    List,
    Detail,
    Search,
}

// ---------------------------------------------------------------------------
// Client implementation
// ---------------------------------------------------------------------------

/// Catalog backed by the remote HTTP API.
pub struct HttpCatalog {
    client: reqwest::Client,
    api_base: String,
    cache: ResponseCache,
    list_ttl: Duration,
    detail_ttl: Duration,
    search_ttl: Duration,
    rate_limiter: governor::RateLimiter<
        governor::state::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl HttpCatalog {
    pub fn new(config: &CatalogConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("marquee/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        let per_second = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = RateLimiter::direct(Quota::per_second(per_second));

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            cache: ResponseCache::new(config.cache_max_entries),
            list_ttl: Duration::from_secs(config.list_ttl_secs),
            detail_ttl: Duration::from_secs(config.detail_ttl_secs),
            search_ttl: Duration::from_secs(config.search_ttl_secs),
            rate_limiter,
        })
    }

    /// Number of responses currently cached.
    pub fn cached_responses(&self) -> usize {
        self.cache.len()
    }

    fn ttl(&self, endpoint: Endpoint) -> Duration {
        match endpoint {
            Endpoint::List => self.list_ttl,
            Endpoint::Detail => self.detail_ttl,
            Endpoint::Search => self.search_ttl,
        }
    }

    /// Fetch and decode `url`, serving from cache when fresh.
    ///
    /// Only bodies that decode successfully are cached.
    async fn fetch<T: DeserializeOwned>(
        &self,
        url: &str,
        endpoint: Endpoint,
    ) -> marquee_common::Result<T> {
        if let Some(body) = self.cache.get(url) {
            debug!(url = %url, "Catalog cache hit");
            return decode(&body);
        }

        self.rate_limiter.until_ready().await;
        debug!(url = %url, "Catalog request");

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::upstream(format!("request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::upstream(format!("returned HTTP {status}")));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| Error::upstream(format!("failed to read body: {e}")))?;
        let body: Value = serde_json::from_slice(&bytes)?;
        let decoded = decode(&body)?;

        self.cache.insert(url, body, self.ttl(endpoint));
        Ok(decoded)
    }

    async fn list(&self, url: String, endpoint: Endpoint) -> Option<MovieList> {
        match self.fetch::<MovieList>(&url, endpoint).await {
            Ok(list) => Some(list),
            Err(e) => {
                warn!(url = %url, "Catalog list request failed: {}", e);
                None
            }
        }
    }
}

/// Decode a body, unwrapping a top-level `data` object when present.
fn decode<T: DeserializeOwned>(body: &Value) -> marquee_common::Result<T> {
    let payload = match body.get("data") {
        Some(data @ Value::Object(_)) => data,
        _ => body,
    };
    Ok(T::deserialize(payload)?)
}

#[async_trait]
impl Catalog for HttpCatalog {
    async fn new_movies(&self, page: u32) -> Option<MovieList> {
        let url = format!("{}{NEW_MOVIES_PATH}?page={page}", self.api_base);
        self.list(url, Endpoint::List).await
    }

    async fn by_category(&self, slug: &str, page: u32) -> Option<MovieList> {
        let url = format!(
            "{}{CATEGORY_PATH}/{}?page={page}",
            self.api_base,
            urlencoding::encode(slug)
        );
        self.list(url, Endpoint::List).await
    }

    async fn by_genre(&self, slug: &str, page: u32) -> Option<MovieList> {
        let url = format!(
            "{}{GENRE_PATH}/{}?page={page}",
            self.api_base,
            urlencoding::encode(slug)
        );
        self.list(url, Endpoint::List).await
    }

    async fn search(&self, keyword: &str, limit: u32, page: u32) -> Option<MovieList> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return None;
        }
        let url = format!(
            "{}{SEARCH_PATH}?keyword={}&limit={limit}&page={page}",
            self.api_base,
            urlencoding::encode(keyword)
        );
        self.list(url, Endpoint::Search).await
    }

    async fn detail(&self, slug: &str) -> Option<MovieDetailResponse> {
        let url = format!(
            "{}{DETAIL_PATH}/{}",
            self.api_base,
            urlencoding::encode(slug)
        );
        match self.fetch::<MovieDetailResponse>(&url, Endpoint::Detail).await {
            Ok(resp) if resp.movie.is_some() => Some(resp),
            Ok(resp) => {
                debug!(slug = %slug, msg = %resp.msg, "Movie not found");
                None
            }
            Err(e) => {
                warn!(url = %url, "Catalog detail request failed: {}", e);
                None
            }
        }
    }
}
