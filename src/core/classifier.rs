//! Recognises the YouTube URL shapes the downloader knows how to handle.
//!
//! Two prefix patterns decide the path taken for an input: a watch/short
//! video link or a playlist page link. Video links may additionally carry
//! a `list=` query parameter, in which case the playlist they belong to is
//! offered as an alternative download.

use crate::core::error::{Error, Result};
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

pub const PLAYLIST_BASE_URL: &str = "https://www.youtube.com/playlist?list=";

const VIDEO_URL_PATTERN: &str =
    r"^(https?://)?(www\.)?(youtube\.com/watch\?v=|youtu\.be/)[\w-]+";
const PLAYLIST_URL_PATTERN: &str =
    r"^(https?://)?(www\.)?(youtube\.com/playlist\?list=|youtu\.be/playlist\?list=)[\w-]+";
const LIST_PARAM_PATTERN: &str = r"list=([\w-]+)";
const PLAYLIST_ID_PATTERN: &str = r"^[\w-]+";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlKind {
    /// A single video. `playlist` holds the canonical playlist URL when the
    /// video link was opened from inside a playlist.
    Video {
        url: String,
        playlist: Option<String>,
    },
    Playlist {
        url: String,
    },
}

fn video_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(VIDEO_URL_PATTERN).expect("video pattern is valid"))
}

fn playlist_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PLAYLIST_URL_PATTERN).expect("playlist pattern is valid"))
}

fn list_param_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(LIST_PARAM_PATTERN).expect("list pattern is valid"))
}

fn playlist_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PLAYLIST_ID_PATTERN).expect("playlist id pattern is valid"))
}

pub fn is_video_url(input: &str) -> bool {
    video_regex().is_match(input)
}

pub fn is_playlist_url(input: &str) -> bool {
    playlist_regex().is_match(input)
}

/// Classify a trimmed user input.
///
/// The playlist pattern is tried first: `youtu.be/playlist?list=...` also
/// satisfies the short-link video pattern.
pub fn classify(input: &str) -> Result<UrlKind> {
    if is_playlist_url(input) {
        return Ok(UrlKind::Playlist {
            url: input.to_string(),
        });
    }

    if is_video_url(input) {
        return Ok(UrlKind::Video {
            url: input.to_string(),
            playlist: extract_playlist_url(input),
        });
    }

    Err(Error::UnrecognizedUrl(input.to_string()))
}

/// Return the canonical playlist URL referenced by a `list=` query
/// parameter, if any. Only the leading `[\w-]+` run of the value is kept.
pub fn extract_playlist_url(url: &str) -> Option<String> {
    let id = match parse_lenient(url) {
        Some(parsed) => parsed
            .query_pairs()
            .find(|(key, _)| key == "list")
            .and_then(|(_, value)| {
                playlist_id_regex()
                    .find(&value)
                    .map(|m| m.as_str().to_string())
            })?,
        None => list_param_regex()
            .captures(url)?
            .get(1)
            .map(|m| m.as_str().to_string())?,
    };

    Some(format!("{}{}", PLAYLIST_BASE_URL, id))
}

fn parse_lenient(url: &str) -> Option<Url> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Url::parse(url).ok()
    } else {
        Url::parse(&format!("https://{}", url)).ok()
    }
}
