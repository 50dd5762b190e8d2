//! Remote movie catalog access.
//!
//! Every [`Catalog`] call returns `None` when no data is available, whatever
//! the cause. Pages turn that into an empty or "not found" state.

pub mod cache;
pub mod client;

pub use cache::ResponseCache;
pub use client::HttpCatalog;

use async_trait::async_trait;
use marquee_common::{Error, Movie, MovieDetailResponse, MovieList};
use std::fmt;

/// Read-only access to the movie catalog.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Recently updated movies.
    async fn new_movies(&self, page: u32) -> Option<MovieList>;

    /// Movies in a category such as `phim-bo`.
    async fn by_category(&self, slug: &str, page: u32) -> Option<MovieList>;

    /// Movies in a genre such as `hanh-dong`.
    async fn by_genre(&self, slug: &str, page: u32) -> Option<MovieList>;

    /// Keyword search. A blank keyword yields `None` without a request.
    async fn search(&self, keyword: &str, limit: u32, page: u32) -> Option<MovieList>;

    /// Full record with episode servers; `None` when the slug is unknown.
    async fn detail(&self, slug: &str) -> Option<MovieDetailResponse>;
}

/// A paginated result set the incremental loader can walk.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListSource {
    New,
    Category(String),
    Genre(String),
    Search(String),
}

impl ListSource {
    /// Build from the `source` / `slug` query pair used by `/api/more`.
    pub fn from_query(source: &str, slug: Option<&str>) -> Result<Self, Error> {
        let slug = slug.map(str::trim).filter(|s| !s.is_empty());
        match (source, slug) {
            ("new", _) => Ok(Self::New),
            ("category", Some(slug)) => Ok(Self::Category(slug.to_string())),
            ("genre", Some(slug)) => Ok(Self::Genre(slug.to_string())),
            ("search", Some(keyword)) => Ok(Self::Search(keyword.to_string())),
            ("category" | "genre" | "search", None) => Err(Error::invalid_input(format!(
                "source '{}' requires a slug",
                source
            ))),
            (other, _) => Err(Error::invalid_input(format!("unknown source '{}'", other))),
        }
    }

    /// Query-string name of this source kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Category(_) => "category",
            Self::Genre(_) => "genre",
            Self::Search(_) => "search",
        }
    }

    /// Slug or keyword, if the source has one.
    pub fn slug(&self) -> Option<&str> {
        match self {
            Self::New => None,
            Self::Category(s) | Self::Genre(s) | Self::Search(s) => Some(s),
        }
    }
}

impl fmt::Display for ListSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slug() {
            Some(slug) => write!(f, "{}:{}", self.kind(), slug),
            None => f.write_str(self.kind()),
        }
    }
}

/// Fetch one page of `source`; no data becomes an empty page.
///
/// `page_size` only applies to search, the other endpoints have a fixed size.
pub async fn fetch_page(
    catalog: &dyn Catalog,
    source: &ListSource,
    page: u32,
    page_size: u32,
) -> Vec<Movie> {
    let list = match source {
        ListSource::New => catalog.new_movies(page).await,
        ListSource::Category(slug) => catalog.by_category(slug, page).await,
        ListSource::Genre(slug) => catalog.by_genre(slug, page).await,
        ListSource::Search(keyword) => catalog.search(keyword, page_size, page).await,
    };
    list.map(|l| l.items).unwrap_or_default()
}

/// Category links shown in the header and the genre sidebar.
pub const CATEGORIES: &[(&str, &str)] = &[
    ("phim-bo", "Phim Bộ"),
    ("phim-le", "Phim Lẻ"),
    ("hoat-hinh", "Hoạt Hình"),
    ("tv-shows", "TV Shows"),
];

/// Genre links shown in the genre sidebar.
pub const GENRES: &[(&str, &str)] = &[
    ("hanh-dong", "Hành Động"),
    ("tinh-cam", "Tình Cảm"),
    ("hai-huoc", "Hài Hước"),
    ("co-trang", "Cổ Trang"),
    ("tam-ly", "Tâm Lý"),
    ("the-thao", "Thể Thao"),
    ("kinh-di", "Kinh Dị"),
    ("khoa-hoc-vien-tuong", "Khoa Học Viễn Tưởng"),
];
