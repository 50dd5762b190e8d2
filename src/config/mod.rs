mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./marquee.toml",
        "./config.toml",
        "~/.config/marquee/config.toml",
        "/etc/marquee/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if let Some(dir) = &config.server.static_dir {
        if !dir.is_dir() {
            tracing::warn!("Static directory does not exist: {:?}", dir);
        }
    }

    let catalog = &config.catalog;
    for (name, base) in [
        ("api_base", &catalog.api_base),
        ("image_base", &catalog.image_base),
    ] {
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            anyhow::bail!("catalog.{} must be an http(s) URL, got '{}'", name, base);
        }
    }

    for (name, secs) in [
        ("timeout_secs", catalog.timeout_secs),
        ("list_ttl_secs", catalog.list_ttl_secs),
        ("detail_ttl_secs", catalog.detail_ttl_secs),
        ("search_ttl_secs", catalog.search_ttl_secs),
    ] {
        if secs == 0 {
            anyhow::bail!("catalog.{} must be greater than 0", name);
        }
    }

    if catalog.cache_max_entries == 0 {
        anyhow::bail!("catalog.cache_max_entries must be greater than 0");
    }
    if catalog.requests_per_second == 0 {
        anyhow::bail!("catalog.requests_per_second must be greater than 0");
    }
    if catalog.search_page_size == 0 {
        anyhow::bail!("catalog.search_page_size must be greater than 0");
    }

    if config.search.debounce_ms == 0 {
        anyhow::bail!("search.debounce_ms must be greater than 0");
    }
    if config.search.suggestion_limit == 0 {
        anyhow::bail!("search.suggestion_limit must be greater than 0");
    }

    config
        .player
        .validate()
        .context("Invalid [player] configuration")?;

    Ok(())
}
