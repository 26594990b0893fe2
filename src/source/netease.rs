//! NetEase Cloud Music API adapter
//!
//! Talks to a self-hosted NeteaseCloudMusicApi instance.

use super::http::{self, HttpGet};
use super::models::{self, SourceKind, StreamUrl, Suggestion, Track};
use super::MusicSource;
use anyhow::Context;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct NetEase<H> {
    http: H,
}

impl<H: HttpGet> NetEase<H> {
    /// Stream quality requested from `/song/url/v1`.
    const LEVEL: &'static str = "jymaster";

    pub fn new(http: H) -> Self {
        Self { http }
    }

    /// Resolve many song ids with a single request.
    ///
    /// The result follows the order of `ids`; ids the backend did not
    /// answer for come back with `url: None`.
    pub async fn resolve_stream_urls(&self, ids: &[String]) -> anyhow::Result<Vec<StreamUrl>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let v = self
            .http
            .get_json(
                "/song/url/v1",
                &[("id", ids.join(",")), ("level", Self::LEVEL.to_string())],
            )
            .await?;

        // `data` is an array for batched ids, but some deployments answer a
        // single id with a bare object.
        let data = http::field(&v, "/data")?;
        let entries: Vec<&Value> = match data {
            Value::Array(items) => items.iter().collect(),
            Value::Object(_) => vec![data],
            _ => anyhow::bail!("`/data` is neither an array nor an object"),
        };

        let resolved: Vec<StreamUrl> = entries
            .into_iter()
            .filter_map(|e| {
                Some(StreamUrl {
                    id: http::id_string(e.get("id")?)?,
                    url: e
                        .get("url")
                        .and_then(|u| u.as_str())
                        .filter(|u| !u.is_empty())
                        .map(|u| u.to_string()),
                })
            })
            .collect();

        Ok(ids
            .iter()
            .map(|id| {
                resolved
                    .iter()
                    .find(|r| &r.id == id)
                    .cloned()
                    .unwrap_or_else(|| StreamUrl {
                        id: id.clone(),
                        url: None,
                    })
            })
            .collect())
    }
}

impl<H: HttpGet> MusicSource for NetEase<H> {
    fn kind(&self) -> SourceKind {
        SourceKind::NetEase
    }

    async fn search(&self, keyword: &str) -> anyhow::Result<Vec<Track>> {
        let v = self
            .http
            .get_json(
                "/cloudsearch",
                &[("keywords", keyword.to_string()), ("type", "1".to_string())],
            )
            .await?;
        let songs = http::array(&v, "/result/songs")?;
        Ok(models::unique_by_id(songs.iter().filter_map(song_to_track)))
    }

    async fn suggest(&self, keyword: &str) -> anyhow::Result<Vec<Suggestion>> {
        let v = self
            .http
            .get_json("/search/suggest", &[("keywords", keyword.to_string())])
            .await?;
        let songs = http::array(&v, "/result/songs")?;
        Ok(songs
            .iter()
            .map(|s| Suggestion {
                id: s.get("id").and_then(http::id_string),
                name: s
                    .get("name")
                    .and_then(|n| n.as_str())
                    .unwrap_or_default()
                    .to_string(),
                artists: artists_of(s),
            })
            .collect())
    }

    async fn resolve_stream_url(&self, handle: &str) -> anyhow::Result<String> {
        let urls = self.resolve_stream_urls(&[handle.to_string()]).await?;
        urls.into_iter()
            .find_map(|u| u.url)
            .with_context(|| format!("no playable url for netease song {handle}"))
    }

    async fn fetch_lyric(&self, handle: &str) -> anyhow::Result<Option<String>> {
        let v = self
            .http
            .get_json("/lyric", &[("id", handle.to_string())])
            .await?;
        let lrc = http::field(&v, "/lrc")?;
        Ok(lrc
            .get("lyric")
            .and_then(|l| l.as_str())
            .map(|l| l.to_string()))
    }
}

/// `/cloudsearch` uses `ar`/`dt`, `/search/suggest` uses `artists`/`duration`.
fn song_to_track(s: &Value) -> Option<Track> {
    let Some(id) = s.get("id").and_then(http::id_string) else {
        tracing::debug!("skipping netease song without id");
        return None;
    };

    let duration_ms = s
        .get("dt")
        .or_else(|| s.get("duration"))
        .and_then(|d| d.as_u64());

    Some(Track {
        id,
        name: s
            .get("name")
            .and_then(|n| n.as_str())
            .unwrap_or("Unknown title")
            .to_string(),
        artists: artists_of(s),
        url: None,
        duration_secs: duration_ms.map(|ms| (ms / 1000) as u32),
        source: SourceKind::NetEase,
    })
}

fn artists_of(s: &Value) -> Vec<String> {
    http::names(s.get("ar").or_else(|| s.get("artists")))
}
