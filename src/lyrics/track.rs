use std::cmp::Ordering;

/// One time-synced lyric entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LyricLine {
    pub timestamp: f64,
    pub text: String,
}

/// The lyric track for the current playback session.
///
/// `Synced` entries are sorted ascending by timestamp and all carry non-empty
/// text. `Plain` is the degraded form with no time mapping; the cursor worker
/// does not run for it.
#[derive(Debug, Clone, PartialEq)]
pub enum LyricTrack {
    Synced(Vec<LyricLine>),
    Plain(Vec<String>),
}

impl LyricTrack {
    /// Build a track from the lookup service's raw text fields.
    ///
    /// Synced text is preferred; when it yields zero entries the plain text
    /// is split into trimmed non-empty lines; `None` when both are empty.
    pub fn parse(synced: &str, plain: &str) -> Option<LyricTrack> {
        let entries = parse_synced(synced);
        if !entries.is_empty() {
            return Some(LyricTrack::Synced(entries));
        }

        let lines: Vec<String> = plain
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        if lines.is_empty() {
            None
        } else {
            Some(LyricTrack::Plain(lines))
        }
    }

    pub fn is_synced(&self) -> bool {
        matches!(self, LyricTrack::Synced(_))
    }

    pub fn len(&self) -> usize {
        match self {
            LyricTrack::Synced(entries) => entries.len(),
            LyricTrack::Plain(lines) => lines.len(),
        }
    }

    /// The display text of entry `i`.
    pub fn line(&self, i: usize) -> Option<&str> {
        match self {
            LyricTrack::Synced(entries) => entries.get(i).map(|e| e.text.as_str()),
            LyricTrack::Plain(lines) => lines.get(i).map(String::as_str),
        }
    }

    /// The timestamps of a synced track, `None` for plain ones.
    pub fn timestamps(&self) -> Option<Vec<f64>> {
        match self {
            LyricTrack::Synced(entries) => Some(entries.iter().map(|e| e.timestamp).collect()),
            LyricTrack::Plain(_) => None,
        }
    }
}

/// Parse timestamp-tagged lyric text into sorted entries.
///
/// Each line may carry several `[mm:ss.xx]` tags; each tag yields one entry
/// with the line's tag-stripped text. Lines with no parseable tag or empty
/// remaining text are dropped. The sort is stable, so same-timestamp entries
/// keep their source order.
fn parse_synced(raw: &str) -> Vec<LyricLine> {
    let mut entries: Vec<LyricLine> = Vec::new();

    for raw_line in raw.lines() {
        if raw_line.trim().is_empty() {
            continue;
        }

        let (tags, text) = strip_tags(raw_line);
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        for tag in &tags {
            if let Some(seconds) = parse_timestamp(tag) {
                entries.push(LyricLine {
                    timestamp: seconds,
                    text: text.to_string(),
                });
            }
        }
    }

    entries.sort_by(|a, b| {
        a.timestamp
            .partial_cmp(&b.timestamp)
            .unwrap_or(Ordering::Equal)
    });
    entries
}

/// Split a raw line into its timestamp-shaped tags and the remaining text.
///
/// A tag is `[...]` whose interior is non-empty and drawn from digits, `:`
/// and `.`. Other bracketed content ("[Chorus]") stays in the text.
fn strip_tags(line: &str) -> (Vec<String>, String) {
    let mut tags = Vec::new();
    let mut text = String::new();

    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '[' {
            if let Some(close) = chars[i + 1..].iter().position(|&c| c == ']') {
                let inner: String = chars[i + 1..i + 1 + close].iter().collect();
                if !inner.is_empty() && inner.chars().all(|c| c.is_ascii_digit() || c == ':' || c == '.') {
                    tags.push(inner);
                    i += close + 2;
                    continue;
                }
            }
        }
        text.push(chars[i]);
        i += 1;
    }

    (tags, text)
}

/// Parse a `mm:ss` or `mm:ss.xx` tag interior into seconds.
pub fn parse_timestamp(tag: &str) -> Option<f64> {
    let mut parts = tag.split(':');
    let minutes: f64 = parts.next()?.parse().ok()?;
    let seconds: f64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    if minutes < 0.0 || seconds < 0.0 {
        return None;
    }
    Some(minutes * 60.0 + seconds)
}

/// Map a clock position onto a synced track: the greatest index whose
/// timestamp is `<= position`, or `0` when the first entry is still ahead.
pub fn cursor_index(timestamps: &[f64], position: f64) -> usize {
    let mut idx = 0;
    for (i, &ts) in timestamps.iter().enumerate() {
        if ts <= position {
            idx = i;
        } else {
            break;
        }
    }
    idx
}
