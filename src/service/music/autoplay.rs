//! Similar-track lookup used when the queue runs dry with autoplay enabled.

use serde::Deserialize;

use crate::error::AppError;

const LASTFM_ENDPOINT: &str = "https://ws.audioscrobbler.com/2.0/";

/// Searches made for similar tracks before giving up.
pub const MAX_AUTOPLAY_ATTEMPTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimilarTrack {
    pub artist: String,
    pub title: String,
}

impl SimilarTrack {
    /// Lavalink search query for the track.
    pub fn search_query(&self) -> String {
        format!("ytsearch:{} - {}", self.artist, self.title)
    }
}

#[derive(Deserialize)]
struct SimilarResponse {
    similartracks: SimilarTracks,
}

#[derive(Deserialize)]
struct SimilarTracks {
    #[serde(default)]
    track: Vec<LastFmTrack>,
}

#[derive(Deserialize)]
struct LastFmTrack {
    name: String,
    artist: LastFmArtist,
}

#[derive(Deserialize)]
struct LastFmArtist {
    name: String,
}

/// Parses a `track.getsimilar` response body. Error payloads yield no tracks.
pub fn parse_similar_tracks(body: &str) -> Vec<SimilarTrack> {
    let Ok(response) = serde_json::from_str::<SimilarResponse>(body) else {
        return Vec::new();
    };

    response
        .similartracks
        .track
        .into_iter()
        .map(|track| SimilarTrack {
            artist: track.artist.name,
            title: track.name,
        })
        .collect()
}

/// Best-effort split of a YouTube style track into artist and title.
///
/// Titles shaped like `Artist - Song (Official Video)` win over the uploader name;
/// otherwise the uploader is used with `- Topic` and `VEVO` suffixes removed.
pub fn split_artist_title(author: &str, title: &str) -> (String, String) {
    let cleaned = strip_brackets(title);

    if let Some((artist, song)) = cleaned.split_once(" - ") {
        return (artist.trim().to_string(), song.trim().to_string());
    }

    let artist = author
        .trim_end_matches(" - Topic")
        .trim_end_matches("VEVO")
        .trim();

    (artist.to_string(), cleaned.trim().to_string())
}

fn strip_brackets(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut depth = 0usize;

    for c in title.chars() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Client for last.fm compatible similar-track lookups.
pub struct AutoplayService<'a> {
    http_client: &'a reqwest::Client,
    api_key: &'a str,
}

impl<'a> AutoplayService<'a> {
    pub fn new(http_client: &'a reqwest::Client, api_key: &'a str) -> Self {
        Self {
            http_client,
            api_key,
        }
    }

    /// Fetches up to `limit` tracks similar to the given one.
    pub async fn similar_tracks(
        &self,
        artist: &str,
        title: &str,
        limit: usize,
    ) -> Result<Vec<SimilarTrack>, AppError> {
        let limit = limit.to_string();
        let body = self
            .http_client
            .get(LASTFM_ENDPOINT)
            .query(&[
                ("method", "track.getsimilar"),
                ("artist", artist),
                ("track", title),
                ("api_key", self.api_key),
                ("format", "json"),
                ("autocorrect", "1"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(parse_similar_tracks(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_similar_tracks() {
        let body = r#"{
            "similartracks": {
                "track": [
                    {"name": "Teardrop", "artist": {"name": "Massive Attack"}, "match": 1.0},
                    {"name": "Glory Box", "artist": {"name": "Portishead"}, "match": 0.8}
                ],
                "@attr": {"artist": "Massive Attack"}
            }
        }"#;

        let tracks = parse_similar_tracks(body);

        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[1].artist, "Portishead");
        assert_eq!(tracks[1].search_query(), "ytsearch:Portishead - Glory Box");
    }

    #[test]
    fn error_payload_yields_nothing() {
        let body = r#"{"error": 6, "message": "Track not found"}"#;

        assert!(parse_similar_tracks(body).is_empty());
    }

    #[test]
    fn splits_title_with_dash() {
        let (artist, title) = split_artist_title("SomeChannel", "Daft Punk - One More Time (Official Video)");

        assert_eq!(artist, "Daft Punk");
        assert_eq!(title, "One More Time");
    }

    #[test]
    fn falls_back_to_cleaned_uploader() {
        assert_eq!(
            split_artist_title("Adele - Topic", "Hello"),
            ("Adele".to_string(), "Hello".to_string())
        );
        assert_eq!(
            split_artist_title("AdeleVEVO", "Hello [Live]"),
            ("Adele".to_string(), "Hello".to_string())
        );
    }
}
