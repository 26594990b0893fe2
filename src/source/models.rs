use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Upstream catalog a track came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    NetEase,
    MiGu,
    KuGou,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [SourceKind::NetEase, SourceKind::MiGu, SourceKind::KuGou];

    pub fn label(self) -> &'static str {
        match self {
            SourceKind::NetEase => "netease",
            SourceKind::MiGu => "migu",
            SourceKind::KuGou => "kugou",
        }
    }

    /// MiGu's upstream API is unreliable; its adapter is a disabled placeholder.
    pub fn is_enabled(self) -> bool {
        !matches!(self, SourceKind::MiGu)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SourceKind::ALL
            .into_iter()
            .find(|k| k.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown source `{s}` (expected netease, migu or kugou)"))
    }
}

/// Track summary as returned by a search. `id` is the handle the source
/// expects for URL and lyric lookups (a song id or a file hash).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub artists: Vec<String>,
    pub url: Option<String>,
    pub duration_secs: Option<u32>,
    pub source: SourceKind,
}

impl Track {
    pub fn display_name(&self) -> String {
        if self.artists.is_empty() {
            self.name.clone()
        } else {
            format!("{} - {}", self.name, self.artists.join(", "))
        }
    }
}

/// Drop repeated ids from a result batch, keeping the first occurrence.
pub(crate) fn unique_by_id(tracks: impl IntoIterator<Item = Track>) -> Vec<Track> {
    let mut seen = HashSet::new();
    tracks
        .into_iter()
        .filter(|t| {
            let fresh = seen.insert(t.id.clone());
            if !fresh {
                tracing::debug!(id = %t.id, "skipping duplicate track id");
            }
            fresh
        })
        .collect()
}

/// Lightweight search-as-you-type hint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: Option<String>,
    pub name: String,
    pub artists: Vec<String>,
}

/// One entry of a batched URL resolution. `url` is `None` when the
/// source has no playable stream for the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamUrl {
    pub id: String,
    pub url: Option<String>,
}
