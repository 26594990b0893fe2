//! MiGu placeholder.
//!
//! The upstream MiGu API proved unreliable, so the source stays registered
//! but every call is refused.

use super::models::{SourceKind, Suggestion, Track};
use super::MusicSource;

#[derive(Debug, Clone, Copy, Default)]
pub struct MiGu;

impl MiGu {
    fn disabled<T>(&self) -> anyhow::Result<T> {
        anyhow::bail!("{} source is disabled", self.kind())
    }
}

impl MusicSource for MiGu {
    fn kind(&self) -> SourceKind {
        SourceKind::MiGu
    }

    async fn search(&self, _keyword: &str) -> anyhow::Result<Vec<Track>> {
        self.disabled()
    }

    async fn suggest(&self, _keyword: &str) -> anyhow::Result<Vec<Suggestion>> {
        self.disabled()
    }

    async fn resolve_stream_url(&self, _handle: &str) -> anyhow::Result<String> {
        self.disabled()
    }

    async fn fetch_lyric(&self, _handle: &str) -> anyhow::Result<Option<String>> {
        self.disabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_call_is_refused() {
        let migu = MiGu;
        assert!(migu.search("x").await.is_err());
        assert!(migu.suggest("x").await.is_err());
        assert!(migu.resolve_stream_url("1").await.is_err());
        let err = migu.fetch_lyric_track("1").await.unwrap_err();
        assert_eq!(err.to_string(), "migu source is disabled");
    }
}
