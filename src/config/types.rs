use marquee_player::PlayerConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub player: PlayerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory served for any path no route matches (player assets, CSS).
    #[serde(default)]
    pub static_dir: Option<PathBuf>,

    /// Shown in page titles and the header.
    #[serde(default = "default_site_name")]
    pub site_name: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3000
}
fn default_site_name() -> String {
    "Marquee".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
            site_name: default_site_name(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Base URL of the remote catalog API.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Base URL relative image paths are resolved against.
    #[serde(default = "default_image_base")]
    pub image_base: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Cache lifetime for paginated lists (new, category, genre).
    #[serde(default = "default_list_ttl")]
    pub list_ttl_secs: u64,

    #[serde(default = "default_detail_ttl")]
    pub detail_ttl_secs: u64,

    #[serde(default = "default_search_ttl")]
    pub search_ttl_secs: u64,

    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: usize,

    /// Outgoing request budget.
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,

    /// Result page size on the search page.
    #[serde(default = "default_search_page_size")]
    pub search_page_size: u32,
}

fn default_api_base() -> String {
    "https://phimapi.com".to_string()
}
fn default_image_base() -> String {
    "https://phimimg.com".to_string()
}
fn default_timeout() -> u64 {
    30
}
fn default_list_ttl() -> u64 {
    3600
}
fn default_detail_ttl() -> u64 {
    86400
}
fn default_search_ttl() -> u64 {
    300
}
fn default_cache_max_entries() -> usize {
    512
}
fn default_requests_per_second() -> u32 {
    8
}
fn default_search_page_size() -> u32 {
    24
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            image_base: default_image_base(),
            timeout_secs: default_timeout(),
            list_ttl_secs: default_list_ttl(),
            detail_ttl_secs: default_detail_ttl(),
            search_ttl_secs: default_search_ttl(),
            cache_max_entries: default_cache_max_entries(),
            requests_per_second: default_requests_per_second(),
            search_page_size: default_search_page_size(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before a lookup is issued.
    #[serde(default = "default_debounce")]
    pub debounce_ms: u64,

    /// Maximum movies shown in the suggestion dropdown.
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: u32,
}

fn default_debounce() -> u64 {
    500
}
fn default_suggestion_limit() -> u32 {
    5
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce(),
            suggestion_limit: default_suggestion_limit(),
        }
    }
}
