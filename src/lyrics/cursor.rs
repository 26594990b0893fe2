//! Maps a playback clock onto the active lyric line.

use super::parser::{LyricLine, LyricTrack};

/// Result of resolving a playback time against a [`LyricTrack`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackCursor {
    /// Playback time the cursor was resolved at, in milliseconds (unrounded)
    pub current_time_ms: f64,
    /// `None` until the first line's timestamp has been reached
    pub active_index: Option<usize>,
}

impl PlaybackCursor {
    /// Signed index with `-1` meaning "no active line".
    pub fn position(&self) -> isize {
        self.active_index.map_or(-1, |i| i as isize)
    }

    pub fn active_line<'a>(&self, track: &'a LyricTrack) -> Option<&'a LyricLine> {
        self.active_index.and_then(|i| track.get(i))
    }
}

/// Find the last line whose timestamp is at or before `current_time_seconds`.
///
/// Pure: the same `(track, time)` always yields the same cursor, for forward
/// playback and arbitrary seeks alike.
pub fn update_index(track: &LyricTrack, current_time_seconds: f64) -> PlaybackCursor {
    let time_ms = current_time_seconds * 1000.0;

    // Sorted ascending, so the `<=` prefix ends where the predicate first fails.
    // NaN compares false everywhere and yields an empty prefix.
    let reached = track
        .lines()
        .partition_point(|l| l.time_ms as f64 <= time_ms);

    PlaybackCursor {
        current_time_ms: time_ms,
        active_index: reached.checked_sub(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track() -> LyricTrack {
        LyricTrack::parse("[00:00.00]a\n[00:02.00]b\n[00:05.00]c")
    }

    /// Reference prefix scan the binary search must agree with.
    fn linear(track: &LyricTrack, seconds: f64) -> Option<usize> {
        let time_ms = seconds * 1000.0;
        let mut index = None;
        for (i, line) in track.iter().enumerate() {
            if line.time_ms as f64 <= time_ms {
                index = Some(i);
            } else {
                break;
            }
        }
        index
    }

    #[test]
    fn test_basic_positions() {
        let t = track();
        assert_eq!(update_index(&t, 1.0).active_index, Some(0));
        assert_eq!(update_index(&t, 2.5).active_index, Some(1));
        assert_eq!(update_index(&t, 10.0).active_index, Some(2));
        assert_eq!(update_index(&t, -1.0).active_index, None);
        assert_eq!(update_index(&t, -1.0).position(), -1);
        assert_eq!(update_index(&t, 2.0).active_index, Some(1));
    }

    #[test]
    fn test_empty_track() {
        let t = LyricTrack::empty();
        for s in [-5.0, 0.0, 1.5, 1e9] {
            assert_eq!(update_index(&t, s).active_index, None);
        }
        assert_eq!(update_index(&t, f64::NAN).active_index, None);
    }

    #[test]
    fn test_before_first_line() {
        let t = LyricTrack::parse("[00:03.00]late start");
        let cursor = update_index(&t, 2.999);
        assert_eq!(cursor.active_index, None);
        assert!(cursor.active_line(&t).is_none());
        assert_eq!(
            update_index(&t, 3.0).active_line(&t).map(|l| l.text.as_str()),
            Some("late start")
        );
    }

    #[test]
    fn test_idempotent() {
        let t = track();
        assert_eq!(update_index(&t, 2.5), update_index(&t, 2.5));
    }

    #[test]
    fn test_monotonic_and_matches_scan() {
        let t = LyricTrack::parse("[00:00.50]a\n[00:01.00][00:04.00]b\n[00:01.00]c\n[00:07.25]d");
        let mut last = -1;
        for step in -10..100 {
            let seconds = step as f64 * 0.1;
            let cursor = update_index(&t, seconds);
            assert_eq!(cursor.active_index, linear(&t, seconds));
            assert!(cursor.position() >= last);
            last = cursor.position();
        }
    }

    #[test]
    fn test_backward_seek() {
        let t = track();
        assert_eq!(update_index(&t, 6.0).active_index, Some(2));
        assert_eq!(update_index(&t, 0.5).active_index, Some(0));
    }

    #[test]
    fn test_keeps_unrounded_time() {
        let cursor = update_index(&track(), 1.2345);
        assert!((cursor.current_time_ms - 1234.5).abs() < 1e-6);
    }
}
