use std::sync::mpsc;
use std::thread;

use super::track::LyricTrack;

/// Query the lyric search service for a track title, blocking.
///
/// Any failure (network, HTTP status, JSON shape, no results) degrades to
/// `None`; missing lyrics are never an error.
fn lookup(api_url: &str, title: &str) -> Option<LyricTrack> {
    let url = format!("{}?q={}", api_url, urlencoding::encode(title));

    let body = ureq::get(&url).call().ok()?.body_mut().read_to_string().ok()?;
    let results: serde_json::Value = serde_json::from_str(&body).ok()?;
    let first = results.as_array()?.first()?;

    let synced = first
        .get("syncedLyrics")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    let plain = first
        .get("plainLyrics")
        .and_then(|v| v.as_str())
        .unwrap_or("");

    LyricTrack::parse(synced, plain)
}

/// Run one lyric lookup on a one-shot worker thread.
///
/// The receiver yields exactly one result; the render loop polls it with
/// `try_recv` and attaches the track to the live session when it lands.
pub fn spawn_lookup(api_url: String, title: String) -> mpsc::Receiver<Option<LyricTrack>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(lookup(&api_url, &title));
    });
    rx
}
