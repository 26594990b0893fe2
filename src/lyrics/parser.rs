//! Timed-text (LRC) lyric parser
//!
//! Lines carry one or more leading time tags followed by the lyric text:
//! [mm:ss.xx] Lyrics line here
//!
//! Example:
//! [00:12.34] Hello world
//! [00:15.00][01:02.500] Chorus

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// `[MM:SS.ff]` or `[MM:SS.fff]`. Digits are ASCII only.
static TIME_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([0-9]{2}):([0-9]{2})\.([0-9]{2,3})\]").expect("time tag regex")
});

/// ID tags such as `[ti:Title]` or `[offset:-250]`.
static ID_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[([A-Za-z]{2,6}):(.*)\]$").expect("id tag regex"));

/// A single line of lyrics with its timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricLine {
    /// Timestamp in milliseconds from start
    pub time_ms: u64,
    /// The lyrics text, never empty
    pub text: String,
}

impl LyricLine {
    pub fn new(time_ms: u64, text: impl Into<String>) -> Self {
        Self {
            time_ms,
            text: text.into(),
        }
    }
}

impl fmt::Display for LyricLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let min = self.time_ms / 60_000;
        let sec = (self.time_ms % 60_000) / 1000;
        let ms = self.time_ms % 1000;
        write!(f, "[{min:02}:{sec:02}.{ms:03}]{}", self.text)
    }
}

/// Lyric lines sorted ascending by time. Equal timestamps keep their source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LyricTrack {
    lines: Vec<LyricLine>,
}

impl LyricTrack {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a raw lyric blob. Never fails: lines without a well-formed tag are skipped.
    pub fn parse(raw: &str) -> Self {
        let mut lines = Vec::new();

        for line in raw.split('\n') {
            if line.is_empty() {
                continue;
            }

            let text = TIME_TAG.replace_all(line, "");
            // U+FEFF is not `char::is_whitespace` but shows up in exported lyrics
            let text = text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
            // Tag-only lines carry no lyric
            if text.is_empty() {
                continue;
            }

            for caps in TIME_TAG.captures_iter(line) {
                if let Some(time_ms) = tag_to_ms(&caps[1], &caps[2], &caps[3]) {
                    lines.push(LyricLine::new(time_ms, text));
                }
            }
        }

        // Vec::sort_by_key is stable
        lines.sort_by_key(|l| l.time_ms);

        Self { lines }
    }

    /// Parse a lyric body that may be absent (e.g. a `null` JSON field).
    pub fn parse_opt(raw: Option<&str>) -> Self {
        raw.map(Self::parse).unwrap_or_default()
    }

    pub fn lines(&self) -> &[LyricLine] {
        &self.lines
    }

    pub fn get(&self, index: usize) -> Option<&LyricLine> {
        self.lines.get(index)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LyricLine> {
        self.lines.iter()
    }

    /// Render back to LRC, one tag per line.
    pub fn to_lrc(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<'a> IntoIterator for &'a LyricTrack {
    type Item = &'a LyricLine;
    type IntoIter = std::slice::Iter<'a, LyricLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

/// `"50"` is half a second, not fifty milliseconds.
fn tag_to_ms(min: &str, sec: &str, frac: &str) -> Option<u64> {
    let min: u64 = min.parse().ok()?;
    let sec: u64 = sec.parse().ok()?;
    let ms: u64 = format!("{frac:0<3}").parse().ok()?;
    Some(min * 60_000 + sec * 1000 + ms)
}

/// Header ID tags. Informational only, the offset is never applied to line times.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LrcMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub author: Option<String>,
    pub offset_ms: Option<i64>,
}

impl LrcMetadata {
    pub fn parse(raw: &str) -> Self {
        let mut meta = Self::default();

        for line in raw.lines() {
            let line = line.trim();
            let Some(caps) = ID_TAG.captures(line) else {
                continue;
            };
            let value = caps[2].trim();
            if value.is_empty() {
                continue;
            }

            match caps[1].to_ascii_lowercase().as_str() {
                "ti" => meta.title = Some(value.to_string()),
                "ar" => meta.artist = Some(value.to_string()),
                "al" => meta.album = Some(value.to_string()),
                "by" => meta.author = Some(value.to_string()),
                "offset" => meta.offset_ms = value.parse().ok(),
                _ => {}
            }
        }

        meta
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
