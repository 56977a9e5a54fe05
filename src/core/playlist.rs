use crate::core::error::{Error, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

const WATCH_BASE_URL: &str = "https://www.youtube.com/watch?v=";

/// One record of `--flat-playlist --dump-json` output.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaylistEntry {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl PlaylistEntry {
    pub fn video_url(&self) -> Option<String> {
        match (&self.url, &self.id) {
            (Some(url), _) if !url.is_empty() => Some(url.clone()),
            (_, Some(id)) if !id.is_empty() => Some(format!("{}{}", WATCH_BASE_URL, id)),
            _ => None,
        }
    }
}

/// Parse the tool's playlist dump into member video URLs.
///
/// Both a single JSON array and one JSON object per line are accepted.
pub fn parse_playlist_json(text: &str) -> Result<Vec<String>> {
    let entries = parse_entries(text)?;

    let urls = entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let url = entry.video_url();
            if url.is_none() {
                warn!(
                    "Playlist entry {} ({}) has no url or id, skipping",
                    index + 1,
                    entry.title.as_deref().unwrap_or("untitled")
                );
            }
            url
        })
        .collect::<Vec<_>>();

    debug!("Playlist dump contained {} entries, {} usable", entries.len(), urls.len());
    Ok(urls)
}

fn parse_entries(text: &str) -> Result<Vec<PlaylistEntry>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if trimmed.starts_with('[') {
        return match serde_json::from_str::<Value>(trimmed)? {
            Value::Array(items) => items.into_iter().map(entry_from_value).collect(),
            _ => Err(Error::UnexpectedPlaylistFormat(trimmed.to_string())),
        };
    }

    trimmed
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| serde_json::from_str::<Value>(line).map_err(Error::from))
        .map(|value| value.and_then(entry_from_value))
        .collect()
}

fn entry_from_value(value: Value) -> Result<PlaylistEntry> {
    if !value.is_object() {
        return Err(Error::UnexpectedPlaylistFormat(value.to_string()));
    }
    Ok(serde_json::from_value(value)?)
}
