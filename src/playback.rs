//! Watch-page playback plans.
//!
//! A plan is what the browser player needs to start a session: the selected
//! episode's manifest, the full episode list and the typed player options.

use marquee_common::{Episode, MovieDetailResponse};
use marquee_player::{PlayerConfig, Playlist};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeEntry {
    /// 1-based, as used in the `tap` query parameter.
    pub number: usize,
    pub name: String,
    pub slug: String,
    pub manifest_url: String,
    pub embed_url: String,
}

impl EpisodeEntry {
    fn new(index: usize, episode: &Episode) -> Self {
        Self {
            number: index + 1,
            name: episode.name.clone(),
            slug: episode.slug.clone(),
            manifest_url: episode.link_m3u8.clone(),
            embed_url: episode.link_embed.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WatchPlan {
    pub slug: String,
    pub title: String,
    pub server_name: Option<String>,
    /// Selected episode, 0-based.
    pub index: usize,
    /// `None` when the movie has no episodes yet.
    pub manifest_url: Option<String>,
    pub episodes: Vec<EpisodeEntry>,
    pub previous: Option<usize>,
    pub next: Option<usize>,
    pub player: PlayerConfig,
}

/// Parse the `tap` query value; anything non-numeric selects nothing.
pub fn parse_episode_number(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse().ok())
}

/// Build the plan for a detail response, using the first episode server.
///
/// Returns `None` when the response carries no movie.
pub fn plan_watch(
    detail: &MovieDetailResponse,
    episode_number: Option<i64>,
    player: &PlayerConfig,
) -> Option<(Playlist, WatchPlan)> {
    let movie = detail.movie.as_ref()?;
    let playlist = Playlist::select(detail.primary_episodes().to_vec(), episode_number);

    let plan = WatchPlan {
        slug: movie.summary.slug.clone(),
        title: movie.summary.name.clone(),
        server_name: detail.episodes.first().map(|s| s.server_name.clone()),
        index: playlist.index(),
        manifest_url: playlist.current().map(|e| e.link_m3u8.clone()),
        episodes: playlist
            .episodes()
            .iter()
            .enumerate()
            .map(|(i, e)| EpisodeEntry::new(i, e))
            .collect(),
        previous: playlist.previous(),
        next: playlist.next(),
        player: player.clone(),
    };
    Some((playlist, plan))
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_common::{EpisodeServer, MovieDetail};

    fn detail(episodes: usize) -> MovieDetailResponse {
        let json = serde_json::json!({
            "_id": "1",
            "name": "Ten Phim",
            "slug": "ten-phim"
        });
        let movie: MovieDetail = serde_json::from_value(json).unwrap();
        MovieDetailResponse {
            msg: String::new(),
            movie: Some(movie),
            episodes: vec![EpisodeServer {
                server_name: "Vietsub #1".to_string(),
                server_data: (1..=episodes)
                    .map(|i| Episode {
                        name: format!("Tập {i}"),
                        slug: format!("tap-{i}"),
                        filename: String::new(),
                        link_embed: String::new(),
                        link_m3u8: format!("https://cdn/{i}.m3u8"),
                    })
                    .collect(),
            }],
        }
    }

    #[test]
    fn test_parse_episode_number() {
        assert_eq!(parse_episode_number(Some("3")), Some(3));
        assert_eq!(parse_episode_number(Some(" 12 ")), Some(12));
        assert_eq!(parse_episode_number(Some("abc")), None);
        assert_eq!(parse_episode_number(None), None);
    }

    #[test]
    fn test_plan_selects_episode() {
        let (playlist, plan) = plan_watch(&detail(3), Some(2), &PlayerConfig::default()).unwrap();
        assert_eq!(playlist.index(), 1);
        assert_eq!(plan.manifest_url.as_deref(), Some("https://cdn/2.m3u8"));
        assert_eq!(plan.previous, Some(1));
        assert_eq!(plan.next, Some(3));
        assert_eq!(plan.episodes[2].number, 3);
        assert_eq!(plan.server_name.as_deref(), Some("Vietsub #1"));
    }

    #[test]
    fn test_plan_clamps_out_of_range() {
        for tap in [Some(0), Some(-1), Some(4), None] {
            let (_, plan) = plan_watch(&detail(3), tap, &PlayerConfig::default()).unwrap();
            assert_eq!(plan.index, 0, "tap {tap:?}");
        }
    }

    #[test]
    fn test_plan_without_episodes() {
        let (playlist, plan) = plan_watch(&detail(0), Some(1), &PlayerConfig::default()).unwrap();
        assert!(playlist.is_empty());
        assert_eq!(plan.manifest_url, None);
    }

    #[test]
    fn test_plan_without_movie() {
        let response = MovieDetailResponse::default();
        assert!(plan_watch(&response, None, &PlayerConfig::default()).is_none());
    }
}
