use crate::lyrics::LyricTrack;
use crate::source::{SourceKind, Suggestion, Track};

#[derive(Debug, Clone)]
pub enum Event {
    Player(PlayerEvent),
    Network(NetworkEvent),
}

/// Reported by the playback collaborator.
#[derive(Debug, Clone)]
pub enum PlayerEvent {
    Position { seconds: f64 },
    Ended,
}

/// Which request an outcome belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Search,
    Suggest,
    StreamUrl,
    Lyric,
}

/// Completed adapter calls. `generation` is the search or selection
/// generation the request was issued under.
#[derive(Debug, Clone)]
pub enum NetworkEvent {
    SearchResults {
        generation: u64,
        source: SourceKind,
        keyword: String,
        tracks: Vec<Track>,
    },
    Suggestions {
        generation: u64,
        keyword: String,
        suggestions: Vec<Suggestion>,
    },
    StreamResolved {
        generation: u64,
        track_id: String,
        url: String,
    },
    LyricLoaded {
        generation: u64,
        track_id: String,
        lyric: LyricTrack,
    },
    Failed {
        generation: u64,
        request: RequestKind,
        message: String,
    },
}
