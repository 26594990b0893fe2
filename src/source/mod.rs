//! Music source adapters
//!
//! Every upstream backend is normalized behind [`MusicSource`]: search,
//! suggest, stream-URL resolution and raw lyric retrieval. The raw lyric is
//! fed to [`LyricTrack::parse`] by [`MusicSource::fetch_lyric_track`].

pub mod http;
pub mod kugou;
pub mod migu;
pub mod models;
pub mod netease;

pub use http::{HttpClient, HttpGet};
pub use kugou::KuGou;
pub use migu::MiGu;
pub use models::{SourceKind, StreamUrl, Suggestion, Track};
pub use netease::NetEase;

use crate::config::Config;
use crate::lyrics::LyricTrack;
use anyhow::Context;
use std::future::Future;
use std::time::Duration;

pub trait MusicSource: Send + Sync {
    fn kind(&self) -> SourceKind;

    fn search(&self, keyword: &str) -> impl Future<Output = anyhow::Result<Vec<Track>>> + Send;

    fn suggest(
        &self,
        keyword: &str,
    ) -> impl Future<Output = anyhow::Result<Vec<Suggestion>>> + Send;

    fn resolve_stream_url(
        &self,
        handle: &str,
    ) -> impl Future<Output = anyhow::Result<String>> + Send;

    /// Raw LRC text. `Ok(None)` when the backend answers without a lyric body.
    fn fetch_lyric(
        &self,
        handle: &str,
    ) -> impl Future<Output = anyhow::Result<Option<String>>> + Send;

    fn fetch_lyric_track(
        &self,
        handle: &str,
    ) -> impl Future<Output = anyhow::Result<LyricTrack>> + Send {
        async move {
            let raw = self.fetch_lyric(handle).await?;
            Ok(LyricTrack::parse_opt(raw.as_deref()))
        }
    }
}

/// All known backends, dispatched by [`SourceKind`].
#[derive(Debug, Clone)]
pub struct Sources<H> {
    pub netease: NetEase<H>,
    pub migu: MiGu,
    pub kugou: KuGou<H>,
}

impl Sources<HttpClient> {
    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let timeout = Duration::from_millis(cfg.http.timeout_ms);
        let netease = HttpClient::new(&cfg.netease.base_url, timeout, &cfg.http.user_agent)
            .context("netease client")?;
        let kugou = HttpClient::new(&cfg.kugou.base_url, timeout, &cfg.http.user_agent)
            .context("kugou client")?;
        Ok(Self::new(netease, kugou))
    }
}

impl<H: HttpGet> Sources<H> {
    pub fn new(netease: H, kugou: H) -> Self {
        Self {
            netease: NetEase::new(netease),
            migu: MiGu,
            kugou: KuGou::new(kugou),
        }
    }

    pub async fn search(&self, kind: SourceKind, keyword: &str) -> anyhow::Result<Vec<Track>> {
        match kind {
            SourceKind::NetEase => self.netease.search(keyword).await,
            SourceKind::MiGu => self.migu.search(keyword).await,
            SourceKind::KuGou => self.kugou.search(keyword).await,
        }
    }

    pub async fn suggest(
        &self,
        kind: SourceKind,
        keyword: &str,
    ) -> anyhow::Result<Vec<Suggestion>> {
        match kind {
            SourceKind::NetEase => self.netease.suggest(keyword).await,
            SourceKind::MiGu => self.migu.suggest(keyword).await,
            SourceKind::KuGou => self.kugou.suggest(keyword).await,
        }
    }

    pub async fn resolve_stream_url(
        &self,
        kind: SourceKind,
        handle: &str,
    ) -> anyhow::Result<String> {
        match kind {
            SourceKind::NetEase => self.netease.resolve_stream_url(handle).await,
            SourceKind::MiGu => self.migu.resolve_stream_url(handle).await,
            SourceKind::KuGou => self.kugou.resolve_stream_url(handle).await,
        }
    }

    pub async fn fetch_lyric_track(
        &self,
        kind: SourceKind,
        handle: &str,
    ) -> anyhow::Result<LyricTrack> {
        match kind {
            SourceKind::NetEase => self.netease.fetch_lyric_track(handle).await,
            SourceKind::MiGu => self.migu.fetch_lyric_track(handle).await,
            SourceKind::KuGou => self.kugou.fetch_lyric_track(handle).await,
        }
    }

    /// Raw lyric text without parsing, for dumping.
    pub async fn fetch_lyric(
        &self,
        kind: SourceKind,
        handle: &str,
    ) -> anyhow::Result<Option<String>> {
        match kind {
            SourceKind::NetEase => self.netease.fetch_lyric(handle).await,
            SourceKind::MiGu => self.migu.fetch_lyric(handle).await,
            SourceKind::KuGou => self.kugou.fetch_lyric(handle).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::http::testing::FakeHttp;
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_dispatch_by_kind() {
        let netease = FakeHttp::new().route(
            "/lyric",
            json!({ "lrc": { "lyric": "[00:01.00]from netease" } }),
        );
        let kugou = FakeHttp::new()
            .route(
                "/search/lyric",
                json!({ "candidates": [{ "id": "9", "accesskey": "k" }] }),
            )
            .route("/lyric", json!({ "decodeContent": "[00:02.00]from kugou" }));
        let sources = Sources::new(netease, kugou);

        let a = sources.fetch_lyric_track(SourceKind::NetEase, "1").await.unwrap();
        assert_eq!(a.lines()[0].text, "from netease");

        let c = sources.fetch_lyric_track(SourceKind::KuGou, "HASH").await.unwrap();
        assert_eq!(c.lines()[0].time_ms, 2000);

        let err = sources.search(SourceKind::MiGu, "x").await.unwrap_err();
        assert!(err.to_string().contains("disabled"));
    }
}
