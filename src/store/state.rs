use crate::lyrics::{self, LyricLine, LyricTrack, PlaybackCursor};
use crate::source::{SourceKind, Suggestion, Track};

/// The track currently selected for playback.
#[derive(Debug, Clone, Default)]
pub struct CurrentTrack {
    pub id: String,
    pub name: String,
    pub url: String,
    pub artists: Vec<String>,
    pub duration_secs: u32,
    pub source: Option<SourceKind>,
    pub lyric: LyricTrack,
    pub cursor: PlaybackCursor,
}

#[derive(Debug, Clone, Default)]
pub struct StoreState {
    current: CurrentTrack,
    source: SourceKind,
    results: Vec<Track>,
    suggestions: Vec<Suggestion>,

    pub searching: bool,
    pub lyric_loading: bool,
    pub resolving_url: bool,
    pub last_error: Option<String>,
}

impl StoreState {
    pub fn new(source: SourceKind) -> Self {
        Self {
            source,
            ..Self::default()
        }
    }

    // Getters

    pub fn current(&self) -> &CurrentTrack {
        &self.current
    }

    pub fn current_id(&self) -> &str {
        &self.current.id
    }

    pub fn current_name(&self) -> &str {
        &self.current.name
    }

    pub fn current_url(&self) -> &str {
        &self.current.url
    }

    pub fn current_artists(&self) -> &[String] {
        &self.current.artists
    }

    pub fn current_duration(&self) -> u32 {
        self.current.duration_secs
    }

    pub fn current_lyric(&self) -> &LyricTrack {
        &self.current.lyric
    }

    pub fn current_lyric_index(&self) -> Option<usize> {
        self.current.cursor.active_index
    }

    pub fn current_lyric_time_ms(&self) -> f64 {
        self.current.cursor.current_time_ms
    }

    pub fn current_source(&self) -> SourceKind {
        self.source
    }

    pub fn results(&self) -> &[Track] {
        &self.results
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn active_line(&self) -> Option<&LyricLine> {
        self.current.cursor.active_line(&self.current.lyric)
    }

    pub fn has_selection(&self) -> bool {
        !self.current.id.is_empty()
    }

    // Setters

    pub fn set_source(&mut self, source: SourceKind) {
        self.source = source;
    }

    pub fn set_results(&mut self, tracks: Vec<Track>) {
        self.results = tracks;
        self.searching = false;
    }

    pub fn set_suggestions(&mut self, suggestions: Vec<Suggestion>) {
        self.suggestions = suggestions;
    }

    pub fn clear_results(&mut self) {
        self.results.clear();
        self.suggestions.clear();
        self.searching = false;
    }

    /// Replace the current track wholesale. Lyric and cursor start empty.
    pub fn select_track(&mut self, track: &Track) {
        self.current = CurrentTrack {
            id: track.id.clone(),
            name: track.name.clone(),
            url: track.url.clone().unwrap_or_default(),
            artists: track.artists.clone(),
            duration_secs: track.duration_secs.unwrap_or_default(),
            source: Some(track.source),
            lyric: LyricTrack::empty(),
            cursor: PlaybackCursor::default(),
        };
        self.lyric_loading = false;
        self.resolving_url = false;
        self.last_error = None;
    }

    pub fn clear_current(&mut self) {
        self.current = CurrentTrack::default();
        self.lyric_loading = false;
        self.resolving_url = false;
    }

    pub fn set_current_url(&mut self, url: String) {
        self.current.url = url;
        self.resolving_url = false;
    }

    /// Install a freshly parsed lyric; the cursor is recomputed against it
    /// at the last known playback time.
    pub fn set_lyric(&mut self, lyric: LyricTrack) {
        let seconds = self.current.cursor.current_time_ms / 1000.0;
        self.current.cursor = lyrics::update_index(&lyric, seconds);
        self.current.lyric = lyric;
        self.lyric_loading = false;
    }

    pub fn update_lyric_index(&mut self, current_time_seconds: f64) -> PlaybackCursor {
        self.current.cursor = lyrics::update_index(&self.current.lyric, current_time_seconds);
        self.current.cursor
    }

    /// Forget the playback position, leaving no line active.
    pub fn reset_cursor(&mut self) {
        self.current.cursor = PlaybackCursor::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_track(id: &str) -> Track {
        Track {
            id: id.to_string(),
            name: format!("Track {}", id),
            artists: vec!["Artist".to_string()],
            url: None,
            duration_secs: Some(180),
            source: SourceKind::NetEase,
        }
    }

    #[test]
    fn test_select_replaces_fields() {
        let mut state = StoreState::new(SourceKind::KuGou);
        assert!(!state.has_selection());
        assert_eq!(state.current_source(), SourceKind::KuGou);

        state.select_track(&make_track("1"));
        state.set_lyric(LyricTrack::parse("[00:00.00]a\n[00:02.00]b"));
        state.update_lyric_index(3.0);
        assert_eq!(state.current_lyric_index(), Some(1));

        state.select_track(&make_track("2"));
        assert_eq!(state.current_id(), "2");
        assert_eq!(state.current_name(), "Track 2");
        assert_eq!(state.current_duration(), 180);
        assert_eq!(state.current_artists(), ["Artist".to_string()]);
        assert!(state.current_lyric().is_empty());
        assert_eq!(state.current_lyric_index(), None);
        assert_eq!(state.current_lyric_time_ms(), 0.0);
        assert_eq!(state.current_url(), "");
    }

    #[test]
    fn test_tick_against_empty_lyric() {
        let mut state = StoreState::default();
        state.select_track(&make_track("1"));
        let cursor = state.update_lyric_index(12.0);
        assert_eq!(cursor.position(), -1);
        assert_eq!(state.current_lyric_time_ms(), 12_000.0);
        assert!(state.active_line().is_none());
    }

    #[test]
    fn test_lyric_arriving_mid_song() {
        let mut state = StoreState::default();
        state.select_track(&make_track("1"));
        state.lyric_loading = true;
        state.update_lyric_index(2.5);

        state.set_lyric(LyricTrack::parse("[00:00.00]a\n[00:02.00]b\n[00:05.00]c"));
        assert!(!state.lyric_loading);
        assert_eq!(state.current_lyric_index(), Some(1));
        assert_eq!(state.active_line().map(|l| l.text.as_str()), Some("b"));
    }

    #[test]
    fn test_reset_cursor() {
        let mut state = StoreState::default();
        state.select_track(&make_track("1"));
        state.set_lyric(LyricTrack::parse("[00:00.00]a\n[00:02.00]b"));
        state.update_lyric_index(2.5);
        assert_eq!(state.current_lyric_index(), Some(1));

        state.reset_cursor();
        assert_eq!(state.current_lyric_index(), None);
        assert_eq!(state.current_lyric_time_ms(), 0.0);
        assert_eq!(state.current_lyric().len(), 2);
    }

    #[test]
    fn test_results() {
        let mut state = StoreState::default();
        state.searching = true;
        state.set_results(vec![make_track("1"), make_track("2")]);
        assert!(!state.searching);
        assert_eq!(state.results().len(), 2);

        state.clear_results();
        assert!(state.results().is_empty());
    }

    #[test]
    fn test_clear_current() {
        let mut state = StoreState::default();
        let mut track = make_track("9");
        track.url = Some("http://x/9.mp3".into());
        state.select_track(&track);
        assert_eq!(state.current_url(), "http://x/9.mp3");

        state.clear_current();
        assert!(!state.has_selection());
        assert_eq!(state.current().source, None);
    }
}
