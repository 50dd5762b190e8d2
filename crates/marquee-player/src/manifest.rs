//! HLS master playlist parsing.
//!
//! Only what quality selection needs is extracted: one [`Level`] per
//! `#EXT-X-STREAM-INF` entry, in playlist order. A media playlist (segments
//! only) parses to zero levels.

use serde::{Deserialize, Serialize};

use crate::error::{PlayerError, Result};

/// A rendition advertised by a master playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    /// Position in the master playlist; the client's level index.
    pub index: usize,
    pub width: u32,
    /// Vertical resolution; 0 when the playlist omits RESOLUTION.
    pub height: u32,
    pub bandwidth: u64,
    pub codecs: Option<String>,
    pub uri: String,
}

/// Parsed master playlist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterPlaylist {
    pub version: Option<u32>,
    pub levels: Vec<Level>,
    /// True when the document is a media playlist rather than a master.
    pub is_media_playlist: bool,
}

/// Parse playlist text.
pub fn parse_master(text: &str) -> Result<MasterPlaylist> {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

    match lines.next() {
        Some(first) if first.trim_start_matches('\u{feff}') == "#EXTM3U" => {}
        _ => return Err(PlayerError::manifest("missing #EXTM3U header")),
    }

    let mut playlist = MasterPlaylist::default();
    let mut pending: Option<StreamInf> = None;

    for line in lines {
        if let Some(value) = line.strip_prefix("#EXT-X-VERSION:") {
            playlist.version = value.parse().ok();
        } else if let Some(attrs) = line.strip_prefix("#EXT-X-STREAM-INF:") {
            pending = Some(StreamInf::parse(attrs));
        } else if line.starts_with("#EXTINF:") || line.starts_with("#EXT-X-TARGETDURATION:") {
            playlist.is_media_playlist = true;
        } else if line.starts_with('#') {
            continue;
        } else if let Some(inf) = pending.take() {
            playlist.levels.push(Level {
                index: playlist.levels.len(),
                width: inf.width,
                height: inf.height,
                bandwidth: inf.bandwidth,
                codecs: inf.codecs,
                uri: line.to_string(),
            });
        }
    }

    if pending.is_some() {
        return Err(PlayerError::manifest(
            "#EXT-X-STREAM-INF without a following URI",
        ));
    }

    Ok(playlist)
}

#[derive(Debug, Default)]
struct StreamInf {
    bandwidth: u64,
    width: u32,
    height: u32,
    codecs: Option<String>,
}

impl StreamInf {
    fn parse(attrs: &str) -> Self {
        let mut inf = StreamInf::default();
        for (key, value) in split_attributes(attrs) {
            match key {
                "BANDWIDTH" => inf.bandwidth = value.parse().unwrap_or(0),
                "RESOLUTION" => {
                    if let Some((w, h)) = value.split_once(|c: char| c == 'x' || c == 'X') {
                        inf.width = w.parse().unwrap_or(0);
                        inf.height = h.parse().unwrap_or(0);
                    }
                }
                "CODECS" => inf.codecs = Some(value.to_string()),
                _ => {}
            }
        }
        inf
    }
}

/// Split an attribute list on commas that are not inside quotes.
fn split_attributes(attrs: &str) -> Vec<(&str, &str)> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;

    for (i, c) in attrs.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                push_attribute(&attrs[start..i], &mut out);
                start = i + 1;
            }
            _ => {}
        }
    }
    push_attribute(&attrs[start..], &mut out);
    out
}

fn push_attribute<'a>(pair: &'a str, out: &mut Vec<(&'a str, &'a str)>) {
    if let Some((key, value)) = pair.split_once('=') {
        out.push((key.trim(), value.trim().trim_matches('"')));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const MASTER: &str = "#EXTM3U
#EXT-X-VERSION:3
#EXT-X-STREAM-INF:BANDWIDTH=800000,RESOLUTION=640x360,CODECS=\"avc1.4d401e,mp4a.40.2\"
360/index.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=2800000,RESOLUTION=1280x720
720/index.m3u8
#EXT-X-STREAM-INF:BANDWIDTH=5000000,RESOLUTION=1920x1080
1080/index.m3u8
";

    #[test]
    fn test_parse_master_levels() {
        let playlist = parse_master(MASTER).unwrap();
        assert_eq!(playlist.version, Some(3));
        assert!(!playlist.is_media_playlist);
        assert_eq!(playlist.levels.len(), 3);

        let first = &playlist.levels[0];
        assert_eq!(first.index, 0);
        assert_eq!(first.height, 360);
        assert_eq!(first.width, 640);
        assert_eq!(first.codecs.as_deref(), Some("avc1.4d401e,mp4a.40.2"));
        assert_eq!(first.uri, "360/index.m3u8");

        assert_eq!(playlist.levels[2].height, 1080);
        assert_eq!(playlist.levels[2].bandwidth, 5_000_000);
    }

    #[test]
    fn test_media_playlist_has_no_levels() {
        let text = "#EXTM3U\n#EXT-X-TARGETDURATION:6\n#EXTINF:6.0,\nseg0.ts\n#EXT-X-ENDLIST\n";
        let playlist = parse_master(text).unwrap();
        assert!(playlist.levels.is_empty());
        assert!(playlist.is_media_playlist);
    }

    #[test]
    fn test_missing_header() {
        assert_matches!(parse_master("<html></html>"), Err(PlayerError::Manifest(_)));
        assert_matches!(parse_master(""), Err(PlayerError::Manifest(_)));
    }

    #[test]
    fn test_dangling_stream_inf() {
        let text = "#EXTM3U\n#EXT-X-STREAM-INF:BANDWIDTH=1\n";
        assert_matches!(parse_master(text), Err(PlayerError::Manifest(_)));
    }

    #[test]
    fn test_missing_resolution_gives_zero_height() {
        let text = "#EXTM3U\n#EXT-X-STREAM-INF:BANDWIDTH=64000\naudio.m3u8\n";
        let playlist = parse_master(text).unwrap();
        assert_eq!(playlist.levels[0].height, 0);
    }
}
