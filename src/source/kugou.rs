//! KuGou Music API adapter
//!
//! Tracks are addressed by file hash. Lyrics need two calls: the hash is
//! first exchanged for an `(id, accesskey)` candidate, which then keys the
//! lyric download.

use super::http::{self, HttpGet};
use super::models::{self, SourceKind, Suggestion, Track};
use super::MusicSource;
use anyhow::Context;
use serde_json::Value;

/// Key pair returned by `/search/lyric`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricHandle {
    pub id: String,
    pub access_key: String,
}

#[derive(Debug, Clone)]
pub struct KuGou<H> {
    http: H,
}

impl<H: HttpGet> KuGou<H> {
    pub fn new(http: H) -> Self {
        Self { http }
    }

    pub async fn lyric_handle(&self, hash: &str) -> anyhow::Result<LyricHandle> {
        let v = self
            .http
            .get_json("/search/lyric", &[("hash", hash.to_string())])
            .await?;
        let candidate = http::field(&v, "/candidates/0")
            .with_context(|| format!("no lyric candidate for {hash}"))?;

        Ok(LyricHandle {
            id: http::id_string(http::field(candidate, "/id")?)
                .context("lyric candidate id is empty")?,
            access_key: http::string(candidate, "/accesskey")?.to_string(),
        })
    }

    pub async fn lyric_text(&self, handle: &LyricHandle) -> anyhow::Result<Option<String>> {
        let v = self
            .http
            .get_json(
                "/lyric",
                &[
                    ("id", handle.id.clone()),
                    ("accesskey", handle.access_key.clone()),
                    ("fmt", "lrc".to_string()),
                    ("decode", "1".to_string()),
                ],
            )
            .await?;
        Ok(v.get("decodeContent")
            .and_then(|c| c.as_str())
            .map(|c| c.to_string()))
    }
}

impl<H: HttpGet> MusicSource for KuGou<H> {
    fn kind(&self) -> SourceKind {
        SourceKind::KuGou
    }

    async fn search(&self, keyword: &str) -> anyhow::Result<Vec<Track>> {
        let v = self
            .http
            .get_json("/search", &[("keywords", keyword.to_string())])
            .await?;
        let lists = http::array(&v, "/data/lists")?;
        Ok(models::unique_by_id(lists.iter().filter_map(item_to_track)))
    }

    async fn suggest(&self, keyword: &str) -> anyhow::Result<Vec<Suggestion>> {
        let v = self
            .http
            .get_json("/search/suggest", &[("keywords", keyword.to_string())])
            .await?;
        let records = http::array(&v, "/data/0/RecordDatas")?;
        Ok(records
            .iter()
            .filter_map(|r| r.get("HintInfo").and_then(|h| h.as_str()))
            .map(|hint| Suggestion {
                id: None,
                name: hint.to_string(),
                artists: Vec::new(),
            })
            .collect())
    }

    async fn resolve_stream_url(&self, handle: &str) -> anyhow::Result<String> {
        let v = self
            .http
            .get_json("/song/url/new", &[("hash", handle.to_string())])
            .await?;
        let url = http::string(&v, "/data/0/relate_goods/0/info/tracker_url/0")?;
        Ok(url.to_string())
    }

    async fn fetch_lyric(&self, handle: &str) -> anyhow::Result<Option<String>> {
        let lyric = self.lyric_handle(handle).await?;
        tracing::debug!(hash = handle, id = %lyric.id, "kugou lyric candidate");
        self.lyric_text(&lyric).await
    }
}

fn item_to_track(item: &Value) -> Option<Track> {
    let Some(hash) = item.get("FileHash").and_then(http::id_string) else {
        tracing::debug!("skipping kugou item without FileHash");
        return None;
    };

    // `Singers` is structured; `SingerName` joins the same names with "、".
    let mut artists = http::names(item.get("Singers"));
    if artists.is_empty()
        && let Some(joined) = item.get("SingerName").and_then(|s| s.as_str()) {
            artists = joined
                .split('、')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
                .collect();
        }

    Some(Track {
        id: hash,
        name: item
            .get("SongName")
            .and_then(|n| n.as_str())
            .unwrap_or("Unknown title")
            .to_string(),
        artists,
        url: None,
        duration_secs: item
            .get("Duration")
            .and_then(|d| d.as_u64())
            .map(|d| d as u32),
        source: SourceKind::KuGou,
    })
}
