//! Debounced search suggestions.
//!
//! Each keystroke restarts the debounce timer by aborting the pending lookup
//! task. Results are published on a [`tokio::sync::watch`] channel; a result
//! for a keyword that has since been replaced is dropped.

use marquee_common::Movie;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::catalog::Catalog;

/// What the suggestion dropdown shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SuggestionState {
    /// Panel closed.
    Idle,
    /// Waiting for the debounce or the lookup.
    Loading { keyword: String },
    /// Lookup finished; `movies` may be empty.
    Ready { keyword: String, movies: Vec<Movie> },
}

/// Full search page for `keyword`, or `None` when it is blank.
pub fn search_url(keyword: &str) -> Option<String> {
    let keyword = keyword.trim();
    (!keyword.is_empty()).then(|| format!("/tim-kiem?keyword={}", urlencoding::encode(keyword)))
}

/// Watch page for a movie slug.
pub fn watch_url(slug: &str) -> String {
    format!("/xem-phim/{}", urlencoding::encode(slug))
}

pub struct SuggestionEngine {
    catalog: Arc<dyn Catalog>,
    debounce: Duration,
    limit: u32,
    keyword: String,
    generation: Arc<AtomicU64>,
    pending: Option<JoinHandle<()>>,
    state: Arc<watch::Sender<SuggestionState>>,
}

impl SuggestionEngine {
    pub fn new(catalog: Arc<dyn Catalog>, debounce: Duration, limit: u32) -> Self {
        let (tx, _rx) = watch::channel(SuggestionState::Idle);
        Self {
            catalog,
            debounce,
            limit,
            keyword: String::new(),
            generation: Arc::new(AtomicU64::new(0)),
            pending: None,
            state: Arc::new(tx),
        }
    }

    /// Observe state changes.
    pub fn subscribe(&self) -> watch::Receiver<SuggestionState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SuggestionState {
        self.state.borrow().clone()
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// The input text changed.
    pub fn input(&mut self, keyword: &str) {
        self.keyword = keyword.to_string();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.cancel_pending();

        let trimmed = keyword.trim().to_string();
        if trimmed.is_empty() {
            self.state.send_replace(SuggestionState::Ready {
                keyword: trimmed,
                movies: Vec::new(),
            });
            return;
        }

        self.state.send_replace(SuggestionState::Loading {
            keyword: trimmed.clone(),
        });

        let catalog = Arc::clone(&self.catalog);
        let current = Arc::clone(&self.generation);
        let state = Arc::clone(&self.state);
        let debounce = self.debounce;
        let limit = self.limit;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;

            tracing::debug!(keyword = %trimmed, "Looking up suggestions");
            let mut movies = catalog
                .search(&trimmed, limit, 1)
                .await
                .map(|list| list.items)
                .unwrap_or_default();
            movies.truncate(limit as usize);

            let ready = SuggestionState::Ready {
                keyword: trimmed.clone(),
                movies,
            };
            if !publish_if_current(&state, &current, generation, ready) {
                tracing::debug!(keyword = %trimmed, "Dropping superseded suggestions");
            }
        }));
    }

    /// Explicit submit or "view all results": URL of the full search page.
    ///
    /// Clears the input and closes the panel when a URL is returned.
    pub fn submit(&mut self) -> Option<String> {
        let url = search_url(&self.keyword)?;
        self.clear();
        Some(url)
    }

    /// A suggestion was picked: URL of its watch page.
    pub fn choose(&mut self, movie: &Movie) -> String {
        self.clear();
        watch_url(&movie.slug)
    }

    /// Clear the input and dismiss the panel.
    pub fn clear(&mut self) {
        self.keyword.clear();
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.cancel_pending();
        self.state.send_replace(SuggestionState::Idle);
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

/// Publish `next` only while `generation` is still current.
///
/// The check runs under the channel's write lock; `clear` and `input` bump the
/// generation before publishing, so their state always lands last.
fn publish_if_current(
    state: &watch::Sender<SuggestionState>,
    current: &AtomicU64,
    generation: u64,
    next: SuggestionState,
) -> bool {
    state.send_if_modified(|value| {
        if current.load(Ordering::SeqCst) != generation {
            return false;
        }
        *value = next;
        true
    })
}

impl Drop for SuggestionEngine {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use marquee_common::{MovieDetailResponse, MovieList};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingCatalog {
        searches: Mutex<Vec<(String, u32)>>,
    }

    impl RecordingCatalog {
        fn searches(&self) -> Vec<(String, u32)> {
            self.searches.lock().unwrap().clone()
        }
    }

    fn movie(slug: &str) -> Movie {
        Movie {
            id: slug.to_string(),
            name: slug.to_string(),
            slug: slug.to_string(),
            original_name: String::new(),
            thumb_url: String::new(),
            poster_url: String::new(),
            year: None,
        }
    }

    #[async_trait]
    impl Catalog for RecordingCatalog {
        async fn new_movies(&self, _page: u32) -> Option<MovieList> {
            None
        }

        async fn by_category(&self, _slug: &str, _page: u32) -> Option<MovieList> {
            None
        }

        async fn by_genre(&self, _slug: &str, _page: u32) -> Option<MovieList> {
            None
        }

        async fn search(&self, keyword: &str, limit: u32, _page: u32) -> Option<MovieList> {
            self.searches
                .lock()
                .unwrap()
                .push((keyword.to_string(), limit));
            Some(MovieList {
                items: (0..8).map(|i| movie(&format!("{keyword}-{i}"))).collect(),
                ..MovieList::default()
            })
        }

        async fn detail(&self, _slug: &str) -> Option<MovieDetailResponse> {
            None
        }
    }

    fn engine(catalog: &Arc<RecordingCatalog>) -> SuggestionEngine {
        SuggestionEngine::new(
            Arc::clone(catalog) as Arc<dyn Catalog>,
            Duration::from_millis(500),
            5,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_issues_one_lookup_for_final_keyword() {
        let catalog = Arc::new(RecordingCatalog::default());
        let mut engine = engine(&catalog);
        let rx = engine.subscribe();

        for keyword in ["a", "av", "ave", "aven", "avengers"] {
            engine.input(keyword);
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(catalog.searches(), vec![("avengers".to_string(), 5)]);
        let state = rx.borrow().clone();
        match state {
            SuggestionState::Ready { keyword, movies } => {
                assert_eq!(keyword, "avengers");
                assert_eq!(movies.len(), 5);
            }
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn test_superseded_result_is_not_published() {
        let (tx, rx) = watch::channel(SuggestionState::Idle);
        let current = AtomicU64::new(1);

        // Generation moved on (input cleared) before the lookup finished.
        current.fetch_add(1, Ordering::SeqCst);
        let stale = SuggestionState::Ready {
            keyword: "matrix".to_string(),
            movies: Vec::new(),
        };
        assert!(!publish_if_current(&tx, &current, 1, stale));
        assert_eq!(*rx.borrow(), SuggestionState::Idle);

        let fresh = SuggestionState::Ready {
            keyword: "matrix".to_string(),
            movies: Vec::new(),
        };
        assert!(publish_if_current(&tx, &current, 2, fresh.clone()));
        assert_eq!(*rx.borrow(), fresh);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_until_debounce_elapses() {
        let catalog = Arc::new(RecordingCatalog::default());
        let mut engine = engine(&catalog);

        engine.input("matrix");
        tokio::time::sleep(Duration::from_millis(499)).await;
        assert_eq!(
            engine.state(),
            SuggestionState::Loading {
                keyword: "matrix".to_string()
            }
        );
        assert!(catalog.searches().is_empty());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(catalog.searches().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_input_is_immediately_empty() {
        let catalog = Arc::new(RecordingCatalog::default());
        let mut engine = engine(&catalog);

        engine.input("abc");
        engine.input("   ");
        assert_eq!(
            engine.state(),
            SuggestionState::Ready {
                keyword: String::new(),
                movies: Vec::new()
            }
        );

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(catalog.searches().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_encodes_and_clears() {
        let catalog = Arc::new(RecordingCatalog::default());
        let mut engine = engine(&catalog);

        engine.input("  người nhện ");
        let url = engine.submit().unwrap();
        assert_eq!(url, "/tim-kiem?keyword=ng%C6%B0%E1%BB%9Di%20nh%E1%BB%87n");
        assert_eq!(engine.keyword(), "");
        assert_eq!(engine.state(), SuggestionState::Idle);

        // The pending lookup was cancelled.
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(catalog.searches().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_blank_does_nothing() {
        let catalog = Arc::new(RecordingCatalog::default());
        let mut engine = engine(&catalog);
        engine.input("  ");
        assert_eq!(engine.submit(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_choose_navigates_to_watch_page() {
        let catalog = Arc::new(RecordingCatalog::default());
        let mut engine = engine(&catalog);
        engine.input("ten");
        assert_eq!(engine.choose(&movie("ten-phim")), "/xem-phim/ten-phim");
        assert_eq!(engine.state(), SuggestionState::Idle);
    }

    #[test]
    fn test_search_url() {
        assert_eq!(search_url(""), None);
        assert_eq!(
            search_url("fast & furious").as_deref(),
            Some("/tim-kiem?keyword=fast%20%26%20furious")
        );
    }
}
