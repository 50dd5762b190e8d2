//! Remote HLS manifest probing for the `probe-stream` command.

use anyhow::{Context, Result};
use marquee_player::manifest::parse_master;
use marquee_player::quality::quality_options;
use marquee_player::{MasterPlaylist, QualityOption};
use serde::Serialize;
use std::time::Duration;

/// What the player would see when attaching to a stream.
#[derive(Debug, Clone, Serialize)]
pub struct StreamReport {
    pub url: String,
    pub playlist: MasterPlaylist,
    /// Quality menu entries the player would offer.
    pub qualities: Vec<QualityOption>,
}

/// Fetch and parse a manifest.
pub async fn probe_stream(url: &str, timeout: Duration) -> Result<StreamReport> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("marquee/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    tracing::debug!(url, "Probing stream");

    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch {}", url))?;

    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("{} returned HTTP {}", url, status);
    }

    let text = response.text().await.context("Failed to read manifest")?;
    let playlist = parse_master(&text).with_context(|| format!("Invalid manifest at {}", url))?;
    let qualities = quality_options(&playlist.levels);

    Ok(StreamReport {
        url: url.to_string(),
        playlist,
        qualities,
    })
}
