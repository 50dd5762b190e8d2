//! JSON endpoint integration tests.

mod common;

use axum::http::StatusCode;
use common::{detail, movie, FakeCatalog, TestHarness};

#[tokio::test]
async fn test_health_check() {
    let harness = TestHarness::new(FakeCatalog::new());

    let (status, _) = harness.get("/health").await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = harness.get_json("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_more_defaults_to_second_page() {
    let catalog = FakeCatalog::new().with_list("genre:hanh-dong:2", vec![movie("a"), movie("b")]);
    let harness = TestHarness::new(catalog);

    let (status, json) = harness
        .get_json("/api/more?source=genre&slug=hanh-dong")
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["page"], 2);
    assert_eq!(json["has_more"], true);
    assert_eq!(json["items"].as_array().unwrap().len(), 2);
    assert_eq!(json["items"][0]["slug"], "a");
    assert_eq!(harness.catalog.calls(), ["genre:hanh-dong:2"]);
}

#[tokio::test]
async fn test_more_empty_page_ends_loading() {
    let harness = TestHarness::new(FakeCatalog::new());

    let (status, json) = harness
        .get_json("/api/more?source=category&slug=phim-le&page=7")
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["page"], 7);
    assert_eq!(json["has_more"], false);
    assert!(json["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_more_new_movies() {
    let catalog = FakeCatalog::new().with_list("new:3", vec![movie("x")]);
    let harness = TestHarness::new(catalog);

    let (_, json) = harness.get_json("/api/more?source=new&page=3").await;
    assert_eq!(json["items"][0]["slug"], "x");
}

#[tokio::test]
async fn test_more_rejects_bad_input() {
    let harness = TestHarness::new(FakeCatalog::new());

    let (status, _) = harness.get("/api/more?source=bogus&slug=x").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = harness.get("/api/more?source=genre").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = harness
        .get("/api/more?source=genre&slug=hanh-dong&page=0")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("start at 1"));

    assert!(harness.catalog.calls().is_empty());
}

#[tokio::test]
async fn test_suggest_blank_keyword_skips_catalog() {
    let harness = TestHarness::new(FakeCatalog::new());

    for uri in ["/api/suggest", "/api/suggest?keyword=", "/api/suggest?keyword=%20%20"] {
        let (status, json) = harness.get_json(uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["keyword"], "");
        assert!(json["movies"].as_array().unwrap().is_empty());
    }

    assert!(harness.catalog.calls().is_empty());
}

#[tokio::test]
async fn test_suggest_limits_results() {
    let movies = (0..8).map(|i| movie(&format!("m{i}"))).collect();
    let catalog = FakeCatalog::new().with_list("search:avengers:1", movies);
    let harness = TestHarness::new(catalog);

    let (status, json) = harness.get_json("/api/suggest?keyword=%20avengers%20").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["keyword"], "avengers");
    assert_eq!(json["movies"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_suggest_catalog_failure_is_empty() {
    let harness = TestHarness::new(FakeCatalog::new());

    let (status, json) = harness.get_json("/api/suggest?keyword=nothing").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["movies"].as_array().unwrap().is_empty());
    assert_eq!(harness.catalog.calls(), ["search:nothing:1"]);
}

#[tokio::test]
async fn test_watch_plan_selects_episode() {
    let catalog = FakeCatalog::new().with_detail(detail("ten-phim", 3));
    let harness = TestHarness::new(catalog);

    let (status, json) = harness.get_json("/api/watch/ten-phim?tap=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["index"], 1);
    assert_eq!(
        json["manifest_url"],
        "https://cdn.test/ten-phim/2/index.m3u8"
    );
    assert_eq!(json["previous"], 1);
    assert_eq!(json["next"], 3);
    assert_eq!(json["episodes"].as_array().unwrap().len(), 3);
    assert_eq!(json["player"]["autoplay"], true);
}

#[tokio::test]
async fn test_watch_plan_clamps_out_of_range_tap() {
    let catalog = FakeCatalog::new().with_detail(detail("ten-phim", 3));
    let harness = TestHarness::new(catalog);

    for tap in ["99", "0", "-4", "abc"] {
        let (status, json) = harness
            .get_json(&format!("/api/watch/ten-phim?tap={tap}"))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["index"], 0, "tap={tap}");
    }
}

#[tokio::test]
async fn test_watch_plan_unknown_movie() {
    let harness = TestHarness::new(FakeCatalog::new());

    let (status, _) = harness.get("/api/watch/ten-phim").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
