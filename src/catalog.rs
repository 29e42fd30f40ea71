use std::process::Command;
use std::sync::mpsc;
use std::thread;

use crate::config::SearchSettings;

/// One catalog entry as produced by a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub url: String,
    /// Human-readable duration label ("3:45", or "Live" when unknown).
    pub duration: String,
    pub channel: String,
}

/// Format a duration hint in seconds as `M:SS`, or "Live" when absent.
pub fn format_duration(seconds: Option<f64>) -> String {
    match seconds {
        Some(s) if s > 0.0 => {
            let total = s as u64;
            format!("{}:{:02}", total / 60, total % 60)
        }
        _ => "Live".to_string(),
    }
}

/// Run a catalog search, blocking until the search tool returns.
///
/// The primary invocation asks for a single JSON document; if that fails for
/// any reason a plain text-mode invocation is tried. Returns an empty list
/// when both fail (a failed search is not an error).
pub fn search(query: &str, settings: &SearchSettings) -> Vec<Track> {
    let output = Command::new(&settings.binary)
        .args([
            "--flat-playlist",
            "--dump-single-json",
            "--default-search",
            &format!("ytsearch{}", settings.max_results),
            "--no-warnings",
            "--socket-timeout",
            &settings.socket_timeout_secs.to_string(),
            query,
        ])
        .output();

    match output {
        Ok(out) if out.status.success() => {
            let body = String::from_utf8_lossy(&out.stdout);
            match parse_search_json(&body, settings.max_results) {
                Some(tracks) => tracks,
                None => search_fallback(query, settings),
            }
        }
        _ => search_fallback(query, settings),
    }
}

/// Text-mode fallback search: one title/duration/id line triplet per result.
fn search_fallback(query: &str, settings: &SearchSettings) -> Vec<Track> {
    let output = Command::new(&settings.binary)
        .args([
            "--get-id",
            "--get-title",
            "--get-duration",
            "--default-search",
            &format!("ytsearch{}", settings.max_results),
            "--no-warnings",
            query,
        ])
        .output();

    match output {
        Ok(out) => parse_fallback_output(&String::from_utf8_lossy(&out.stdout)),
        Err(_) => Vec::new(),
    }
}

/// Parse the search tool's `--dump-single-json` payload into tracks.
///
/// Returns `None` when the payload is not the expected JSON shape, so the
/// caller can fall back to text mode.
fn parse_search_json(body: &str, limit: usize) -> Option<Vec<Track>> {
    let data: serde_json::Value = serde_json::from_str(body).ok()?;
    let entries = data.get("entries")?.as_array()?;

    let mut tracks: Vec<Track> = Vec::new();
    for entry in entries.iter() {
        if tracks.len() >= limit {
            break;
        }
        let id = entry
            .get("id")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        // Flat-playlist output can repeat an entry; keep the first.
        if !id.is_empty() && tracks.iter().any(|t| t.id == id) {
            continue;
        }
        let title = entry
            .get("title")
            .and_then(|v| v.as_str())
            .unwrap_or("Unknown")
            .to_string();
        let url = entry
            .get("url")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| format!("https://youtube.com/watch?v={id}"));
        let duration = format_duration(entry.get("duration").and_then(|v| v.as_f64()));
        let channel = entry
            .get("uploader")
            .or_else(|| entry.get("channel"))
            .and_then(|v| v.as_str())
            .unwrap_or("Unknown")
            .to_string();

        tracks.push(Track {
            id,
            title,
            url,
            duration,
            channel,
        });
    }

    Some(tracks)
}

/// Parse text-mode output: lines come in title/duration/id triplets.
fn parse_fallback_output(body: &str) -> Vec<Track> {
    let lines: Vec<&str> = body.lines().map(str::trim).collect();

    let mut tracks = Vec::new();
    for triplet in lines.chunks_exact(3) {
        let (title, duration, id) = (triplet[0], triplet[1], triplet[2]);
        if title.is_empty() || id.is_empty() {
            continue;
        }
        tracks.push(Track {
            id: id.to_string(),
            title: title.to_string(),
            url: format!("https://youtube.com/watch?v={id}"),
            duration: if duration.is_empty() {
                "Live".to_string()
            } else {
                duration.to_string()
            },
            channel: "YouTube".to_string(),
        });
    }
    tracks
}

/// Run a search on a one-shot worker thread.
///
/// The receiver yields exactly one `Vec<Track>` (possibly empty); the render
/// loop polls it with `try_recv` so a slow search never blocks a tick.
pub fn spawn_search(query: String, settings: SearchSettings) -> mpsc::Receiver<Vec<Track>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(search(&query, &settings));
    });
    rx
}
