//! Synchronized lyrics
//!
//! This module provides:
//! - LRC parser producing a time-ordered [`LyricTrack`]
//! - Playback cursor resolving the active line for a playback time

pub mod cursor;
pub mod parser;

pub use cursor::{update_index, PlaybackCursor};
pub use parser::{LrcMetadata, LyricLine, LyricTrack};
