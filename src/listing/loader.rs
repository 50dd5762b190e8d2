//! Incremental ("load more") pagination.
//!
//! The loader owns the page counter. The counter only advances after a
//! non-empty page for the current counter value has been applied, so a late
//! or duplicated completion can never skip or repeat a page. The first empty
//! page marks the source exhausted for good.

use marquee_common::Movie;

use crate::catalog::{fetch_page, Catalog, ListSource};

/// Page the browser loader requests first; page 1 is rendered with the page itself.
pub const FIRST_INCREMENTAL_PAGE: u32 = 2;

#[derive(Debug, Clone)]
pub struct IncrementalLoader {
    source: ListSource,
    next_page: u32,
    page_size: u32,
    items: Vec<Movie>,
    exhausted: bool,
}

impl IncrementalLoader {
    pub fn new(source: ListSource, start_page: u32, page_size: u32) -> Self {
        Self {
            source,
            next_page: start_page.max(1),
            page_size,
            items: Vec::new(),
            exhausted: false,
        }
    }

    /// Page to request next, or `None` once exhausted.
    pub fn begin(&self) -> Option<u32> {
        (!self.exhausted).then_some(self.next_page)
    }

    /// Apply the result of fetching `page`.
    ///
    /// Returns false when the completion was ignored because it does not
    /// belong to the current counter or the source is already exhausted.
    pub fn complete(&mut self, page: u32, items: Vec<Movie>) -> bool {
        if self.exhausted || page != self.next_page {
            tracing::debug!(
                source = %self.source,
                page,
                expected = self.next_page,
                "Ignoring stale page completion"
            );
            return false;
        }

        if items.is_empty() {
            tracing::debug!(source = %self.source, page, "Source exhausted");
            self.exhausted = true;
        } else {
            self.items.extend(items);
            self.next_page += 1;
        }
        true
    }

    /// The sentinel scrolled into view: fetch the next page if there is one.
    ///
    /// Returns the number of movies appended.
    pub async fn on_sentinel_visible(&mut self, catalog: &dyn Catalog) -> usize {
        let Some(page) = self.begin() else {
            return 0;
        };
        let items = fetch_page(catalog, &self.source, page, self.page_size).await;
        let appended = items.len();
        if self.complete(page, items) {
            appended
        } else {
            0
        }
    }

    pub fn source(&self) -> &ListSource {
        &self.source
    }

    pub fn next_page(&self) -> u32 {
        self.next_page
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn items(&self) -> &[Movie] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Movie> {
        self.items
    }
}
