//! Catalog data model.
//!
//! These types mirror the JSON served by the remote movie catalog. The catalog
//! is loose about nulls and missing fields, so every non-identifying field is
//! defaulted rather than rejected.

use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Summary of a movie as it appears in list responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    /// Catalog identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Display name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// URL slug used by the detail and watch routes.
    pub slug: String,
    /// Original-language name.
    #[serde(rename = "origin_name", default, deserialize_with = "null_as_default")]
    pub original_name: String,
    /// Thumbnail path (relative to the image domain, or absolute).
    #[serde(default, deserialize_with = "null_as_default")]
    pub thumb_url: String,
    /// Poster path (relative to the image domain, or absolute).
    #[serde(default, deserialize_with = "null_as_default")]
    pub poster_url: String,
    /// Release year, if known.
    #[serde(default)]
    pub year: Option<u16>,
}

/// Paging information attached to list responses.
///
/// Advisory only: incremental loaders detect exhaustion from empty pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub total_items: u64,
    #[serde(default)]
    pub total_items_per_page: u32,
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub total_pages: u32,
}

/// Query echo some list endpoints nest their pagination under.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// One page of movies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<Movie>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<ListParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_image: Option<String>,
}

impl MovieList {
    /// Pagination from either the top level or the nested `params` block.
    pub fn pagination(&self) -> Option<Pagination> {
        self.pagination
            .or_else(|| self.params.as_ref().and_then(|p| p.pagination))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A name/slug pair used for categories and countries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
}

/// Full movie record returned by the detail endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub summary: Movie,
    /// Synopsis; may contain HTML markup.
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    /// Classification such as `series`, `single`, `hoathinh`.
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub trailer_url: String,
    /// Runtime label, e.g. `"45 phút/tập"`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub time: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub episode_current: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub episode_total: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quality: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lang: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notify: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub showtimes: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub actor: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub director: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: Vec<NamedRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub country: Vec<NamedRef>,
}

/// A single playable episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub filename: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub link_embed: String,
    /// HLS manifest URL.
    #[serde(default, deserialize_with = "null_as_default")]
    pub link_m3u8: String,
}

/// A named mirror holding episodes in broadcast order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeServer {
    #[serde(default, deserialize_with = "null_as_default")]
    pub server_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub server_data: Vec<Episode>,
}

/// Body of the detail endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDetailResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub msg: String,
    #[serde(default)]
    pub movie: Option<MovieDetail>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub episodes: Vec<EpisodeServer>,
}

impl MovieDetailResponse {
    /// Episodes of the first server, or an empty slice.
    pub fn primary_episodes(&self) -> &[Episode] {
        self.episodes
            .first()
            .map(|server| server.server_data.as_slice())
            .unwrap_or(&[])
    }
}
