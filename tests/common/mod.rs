//! Shared test harness for integration tests.
//!
//! Provides [`FakeCatalog`], an in-memory [`Catalog`] that records every call,
//! and [`TestHarness`] which wraps it in a full [`AppContext`].

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use marquee::catalog::Catalog;
use marquee::config::Config;
use marquee::server::{create_router, AppContext};
use marquee_common::{Movie, MovieDetailResponse, MovieList};

/// Build a list movie with the given slug.
pub fn movie(slug: &str) -> Movie {
    serde_json::from_value(serde_json::json!({
        "_id": format!("id-{slug}"),
        "name": format!("Phim {slug}"),
        "slug": slug,
        "thumb_url": format!("upload/{slug}.jpg"),
        "year": 2024
    }))
    .unwrap()
}

/// Build a detail response with `episodes` episodes on one server.
pub fn detail(slug: &str, episodes: usize) -> MovieDetailResponse {
    let data: Vec<_> = (1..=episodes)
        .map(|i| {
            serde_json::json!({
                "name": format!("Tập {i}"),
                "slug": format!("tap-{i}"),
                "link_m3u8": format!("https://cdn.test/{slug}/{i}/index.m3u8")
            })
        })
        .collect();

    serde_json::from_value(serde_json::json!({
        "status": true,
        "msg": "",
        "movie": {
            "_id": format!("id-{slug}"),
            "name": format!("Phim {slug}"),
            "slug": slug,
            "content": "<p>Nội dung</p>",
            "category": [{ "name": "Hành Động", "slug": "hanh-dong" }]
        },
        "episodes": [{ "server_name": "Vietsub #1", "server_data": data }]
    }))
    .unwrap()
}

/// In-memory catalog keyed by list source and page.
#[derive(Default)]
pub struct FakeCatalog {
    pub lists: Mutex<HashMap<String, Vec<Movie>>>,
    pub details: Mutex<HashMap<String, MovieDetailResponse>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page for a key such as `new:1`, `category:phim-bo:1` or `search:avengers:1`.
    pub fn with_list(self, key: &str, movies: Vec<Movie>) -> Self {
        self.lists.lock().unwrap().insert(key.to_string(), movies);
        self
    }

    pub fn with_detail(self, response: MovieDetailResponse) -> Self {
        let slug = response
            .movie
            .as_ref()
            .map(|m| m.summary.slug.clone())
            .unwrap_or_default();
        self.details.lock().unwrap().insert(slug, response);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn list(&self, key: String) -> Option<MovieList> {
        self.calls.lock().unwrap().push(key.clone());
        self.lists.lock().unwrap().get(&key).map(|items| MovieList {
            items: items.clone(),
            ..Default::default()
        })
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn new_movies(&self, page: u32) -> Option<MovieList> {
        self.list(format!("new:{page}"))
    }

    async fn by_category(&self, slug: &str, page: u32) -> Option<MovieList> {
        self.list(format!("category:{slug}:{page}"))
    }

    async fn by_genre(&self, slug: &str, page: u32) -> Option<MovieList> {
        self.list(format!("genre:{slug}:{page}"))
    }

    async fn search(&self, keyword: &str, limit: u32, page: u32) -> Option<MovieList> {
        let mut list = self.list(format!("search:{keyword}:{page}"))?;
        list.items.truncate(limit as usize);
        Some(list)
    }

    async fn detail(&self, slug: &str) -> Option<MovieDetailResponse> {
        self.calls.lock().unwrap().push(format!("detail:{slug}"));
        self.details.lock().unwrap().get(slug).cloned()
    }
}

/// Router plus the catalog behind it.
pub struct TestHarness {
    pub catalog: Arc<FakeCatalog>,
    pub router: Router,
}

impl TestHarness {
    pub fn new(catalog: FakeCatalog) -> Self {
        Self::with_config(catalog, Config::default())
    }

    pub fn with_config(catalog: FakeCatalog, config: Config) -> Self {
        let catalog = Arc::new(catalog);
        let ctx = AppContext::new(config, catalog.clone());
        Self {
            catalog,
            router: create_router(ctx, None),
        }
    }

    /// Issue a GET and return status and body text.
    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let response = self
            .router
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    pub async fn get_json(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let (status, body) = self.get(uri).await;
        let json = serde_json::from_str(&body).unwrap_or(serde_json::Value::Null);
        (status, json)
    }
}
