use crate::source::{SourceKind, Track};

/// UI-originated requests handled by [`super::Store::handle_action`].
#[derive(Debug, Clone)]
pub enum Action {
    SwitchSource(SourceKind),
    Search(String),
    Suggest(String),
    /// Select an entry of the current result list by position
    SelectResult(usize),
    SelectTrack(Track),
    ClearSelection,
    Tick { seconds: f64 },
}
