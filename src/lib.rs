//! In-process state store for a music player front end.
//!
//! - [`lyrics`]: LRC parsing and playback-time to lyric-line resolution
//! - [`source`]: search / suggest / stream URL / lyric adapters per backend
//! - [`store`]: current-track and search-result state, driven by actions
//! - [`config`]: backend endpoints and HTTP settings

pub mod config;
pub mod lyrics;
pub mod source;
pub mod store;
