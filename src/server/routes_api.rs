use crate::catalog::{fetch_page, ListSource};
use crate::listing::FIRST_INCREMENTAL_PAGE;
use crate::playback::{parse_episode_number, plan_watch, WatchPlan};
use crate::server::routes_pages::WatchQuery;
use crate::server::AppContext;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use marquee_common::Movie;
use serde::{Deserialize, Serialize};

pub fn api_routes() -> Router<AppContext> {
    Router::new()
        .route("/health", get(health))
        .route("/more", get(load_more))
        .route("/suggest", get(suggest))
        .route("/watch/:slug", get(watch_plan))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Deserialize)]
struct MoreQuery {
    source: String,
    slug: Option<String>,
    page: Option<u32>,
}

#[derive(Debug, Serialize)]
struct MoreResponse {
    items: Vec<Movie>,
    page: u32,
    has_more: bool,
}

/// One page for a browser-side incremental loader.
async fn load_more(
    State(ctx): State<AppContext>,
    Query(params): Query<MoreQuery>,
) -> Result<Json<MoreResponse>, (StatusCode, String)> {
    let source = ListSource::from_query(&params.source, params.slug.as_deref())
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let page = params.page.unwrap_or(FIRST_INCREMENTAL_PAGE);
    if page == 0 {
        return Err((
            StatusCode::BAD_REQUEST,
            "Page numbers start at 1".to_string(),
        ));
    }

    let items = fetch_page(
        ctx.catalog.as_ref(),
        &source,
        page,
        ctx.config.catalog.search_page_size,
    )
    .await;
    tracing::debug!(source = %source, page, items = items.len(), "Loaded more");

    Ok(Json(MoreResponse {
        has_more: !items.is_empty(),
        items,
        page,
    }))
}

#[derive(Deserialize)]
struct SuggestQuery {
    keyword: Option<String>,
}

#[derive(Debug, Serialize)]
struct SuggestResponse {
    keyword: String,
    movies: Vec<Movie>,
}

/// Dropdown suggestions; the browser debounces keystrokes before calling this.
async fn suggest(
    State(ctx): State<AppContext>,
    Query(params): Query<SuggestQuery>,
) -> Json<SuggestResponse> {
    let keyword = params.keyword.unwrap_or_default().trim().to_string();
    if keyword.is_empty() {
        return Json(SuggestResponse {
            keyword,
            movies: Vec::new(),
        });
    }

    let limit = ctx.config.search.suggestion_limit;
    let mut movies = ctx
        .catalog
        .search(&keyword, limit, 1)
        .await
        .map(|l| l.items)
        .unwrap_or_default();
    movies.truncate(limit as usize);

    Json(SuggestResponse { keyword, movies })
}

async fn watch_plan(
    State(ctx): State<AppContext>,
    Path(slug): Path<String>,
    Query(params): Query<WatchQuery>,
) -> Result<Json<WatchPlan>, StatusCode> {
    let response = ctx
        .catalog
        .detail(&slug)
        .await
        .ok_or(StatusCode::NOT_FOUND)?;
    let episode_number = parse_episode_number(params.tap.as_deref());

    plan_watch(&response, episode_number, &ctx.config.player)
        .map(|(_, plan)| Json(plan))
        .ok_or(StatusCode::NOT_FOUND)
}
