use crate::catalog::ListSource;
use crate::playback::{parse_episode_number, plan_watch};
use crate::server::render::{json_script, Page};
use crate::server::AppContext;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use marquee_common::text::title_from_slug;
use serde::Deserialize;

/// Movies shown in the "New & Popular" row (after the hero).
const POPULAR_ROW_LEN: usize = 19;

pub fn page_routes() -> Router<AppContext> {
    Router::new()
        .route("/", get(home))
        .route("/danh-sach/:slug", get(category))
        .route("/the-loai/:slug", get(genre))
        .route("/phim/:slug", get(detail))
        .route("/xem-phim/:slug", get(watch))
        .route("/tim-kiem", get(search))
}

fn page(ctx: &AppContext) -> Page<'_> {
    Page {
        site_name: &ctx.config.server.site_name,
        image_base: &ctx.config.catalog.image_base,
    }
}

async fn home(State(ctx): State<AppContext>) -> Html<String> {
    let catalog = ctx.catalog.as_ref();
    let (new, series, single, animation) = futures::join!(
        catalog.new_movies(1),
        catalog.by_category("phim-bo", 1),
        catalog.by_category("phim-le", 1),
        catalog.by_category("hoat-hinh", 1),
    );

    let new = new.map(|l| l.items).unwrap_or_default();
    let series = series.map(|l| l.items).unwrap_or_default();
    let single = single.map(|l| l.items).unwrap_or_default();
    let animation = animation.map(|l| l.items).unwrap_or_default();

    let popular: Vec<_> = new.iter().skip(1).take(POPULAR_ROW_LEN).cloned().collect();

    Html(page(&ctx).home(
        new.first(),
        &[
            ("Mới & Phổ Biến", "/danh-sach/phim-moi", popular.as_slice()),
            ("Phim Bộ Cực Cuốn", "/danh-sach/phim-bo", series.as_slice()),
            ("Phim Lẻ Đáng Xem", "/danh-sach/phim-le", single.as_slice()),
            ("Thế Giới Hoạt Hình", "/danh-sach/hoat-hinh", animation.as_slice()),
        ],
    ))
}

async fn category(State(ctx): State<AppContext>, Path(slug): Path<String>) -> Html<String> {
    let movies = ctx
        .catalog
        .by_category(&slug, 1)
        .await
        .map(|l| l.items)
        .unwrap_or_default();

    let title = slug.replace('-', " ");
    Html(page(&ctx).listing(&title, &ListSource::Category(slug), &movies, false))
}

async fn genre(State(ctx): State<AppContext>, Path(slug): Path<String>) -> Html<String> {
    let movies = ctx
        .catalog
        .by_genre(&slug, 1)
        .await
        .map(|l| l.items)
        .unwrap_or_default();

    let title = format!("Thể loại: {}", title_from_slug(&slug));
    Html(page(&ctx).listing(&title, &ListSource::Genre(slug), &movies, true))
}

async fn detail(State(ctx): State<AppContext>, Path(slug): Path<String>) -> Response {
    let view = page(&ctx);
    let Some(response) = ctx.catalog.detail(&slug).await else {
        return (StatusCode::NOT_FOUND, Html(view.not_found())).into_response();
    };
    let Some(movie) = response.movie.as_ref() else {
        return (StatusCode::NOT_FOUND, Html(view.not_found())).into_response();
    };

    let has_episodes = !response.primary_episodes().is_empty();
    Html(view.detail(movie, has_episodes)).into_response()
}

#[derive(Deserialize)]
pub(crate) struct WatchQuery {
    pub(crate) tap: Option<String>,
}

async fn watch(
    State(ctx): State<AppContext>,
    Path(slug): Path<String>,
    Query(params): Query<WatchQuery>,
) -> Response {
    let view = page(&ctx);
    let response = ctx.catalog.detail(&slug).await;
    let episode_number = parse_episode_number(params.tap.as_deref());

    let Some((playlist, plan)) = response
        .as_ref()
        .and_then(|r| plan_watch(r, episode_number, &ctx.config.player))
    else {
        return (StatusCode::NOT_FOUND, Html(view.not_found())).into_response();
    };
    let Some(movie) = response.as_ref().and_then(|r| r.movie.as_ref()) else {
        return (StatusCode::NOT_FOUND, Html(view.not_found())).into_response();
    };

    match json_script(&plan) {
        Ok(plan_json) => Html(view.watch(movie, &playlist, &plan_json)).into_response(),
        Err(e) => {
            tracing::error!(slug = %slug, "Failed to serialize watch plan: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[derive(Deserialize)]
struct SearchQuery {
    keyword: Option<String>,
}

async fn search(State(ctx): State<AppContext>, Query(params): Query<SearchQuery>) -> Html<String> {
    let keyword = params
        .keyword
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty());

    let movies = match keyword {
        Some(keyword) => ctx
            .catalog
            .search(keyword, ctx.config.catalog.search_page_size, 1)
            .await
            .map(|l| l.items)
            .unwrap_or_default(),
        None => Vec::new(),
    };

    Html(page(&ctx).search(keyword, &movies))
}
