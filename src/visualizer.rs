//! Spectrum feed from the external visualizer process.
//!
//! The visualizer emits one semicolon-separated line of raw integers per
//! sample tick; the reader thread rescales each line into discrete bar
//! levels and publishes it as the latest frame. Frames are latest-value-wins:
//! a new frame replaces the old one, nothing is queued.

use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::config::VisualizerSettings;

/// Number of discrete bar levels; published levels are in `0..LEVELS`.
pub const LEVELS: u64 = 8;

/// Latest published frame. Empty vector means no frame yet.
pub type FrameHandle = Arc<Mutex<Vec<u8>>>;

/// Parse one raw output line into integers.
///
/// Any unparseable token invalidates the whole line; partial frames are
/// never produced.
pub fn parse_line(line: &str) -> Option<Vec<u64>> {
    let mut values = Vec::new();
    for token in line.split(';') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        values.push(token.parse().ok()?);
    }
    if values.is_empty() { None } else { Some(values) }
}

/// Rescale raw values into bar levels `0..LEVELS`.
///
/// The line's maximum maps to the top level; an all-zero line maps to all
/// zeros (the divisor is clamped to 1).
pub fn scale_levels(raw: &[u64]) -> Vec<u8> {
    let max = raw.iter().copied().max().unwrap_or(0).max(1);
    raw.iter()
        .map(|&v| ((v * (LEVELS - 1) / max).min(LEVELS - 1)) as u8)
        .collect()
}

/// Write the generated visualizer config selecting raw ASCII output.
fn write_config(dir: &Path, bars: u32) -> io::Result<PathBuf> {
    let path = dir.join("cava_config");
    let contents = format!(
        "[general]\n\
         bars = {bars}\n\
         \n\
         [input]\n\
         source = auto\n\
         \n\
         [output]\n\
         method = raw\n\
         raw_target = /dev/stdout\n\
         data_format = ascii\n"
    );
    fs::write(&path, contents)?;
    Ok(path)
}

/// Launch the visualizer process and its reader thread.
///
/// Returns `None` when the process cannot be started; the session treats
/// that the same as the tool being absent. The reader runs until the active
/// flag drops or the output stream ends, publishing one frame per valid
/// line into `frame`.
pub fn spawn(
    settings: &VisualizerSettings,
    dir: &Path,
    active: Arc<AtomicBool>,
    frame: FrameHandle,
) -> Option<(Child, JoinHandle<()>)> {
    let config_path = write_config(dir, settings.bars).ok()?;

    let mut child = Command::new(&settings.binary)
        .arg("-p")
        .arg(&config_path)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .ok()?;

    let stdout = child.stdout.take()?;
    let handle = thread::spawn(move || {
        let mut reader = BufReader::new(stdout);
        let mut line = String::new();

        while active.load(Ordering::Relaxed) {
            line.clear();
            match reader.read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {
                    let Some(raw) = parse_line(line.trim()) else {
                        continue;
                    };
                    let levels = scale_levels(&raw);
                    if let Ok(mut current) = frame.lock() {
                        *current = levels;
                    }
                }
            }
        }
    });

    Some((child, handle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_line_reads_semicolon_separated_integers() {
        assert_eq!(parse_line("0;5;10;2"), Some(vec![0, 5, 10, 2]));
        assert_eq!(parse_line("7"), Some(vec![7]));
        // Trailing separator is normal raw output.
        assert_eq!(parse_line("1;2;3;"), Some(vec![1, 2, 3]));
    }

    #[test]
    fn parse_line_rejects_whole_line_on_any_bad_token() {
        assert_eq!(parse_line("1;x;3"), None);
        assert_eq!(parse_line("1;-2;3"), None);
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line(";;"), None);
    }

    #[test]
    fn scale_levels_matches_floor_rule() {
        // max=10 maps to the top level; the rest floor-scale against it.
        assert_eq!(scale_levels(&[0, 5, 10, 2]), vec![0, 3, 7, 1]);
    }

    #[test]
    fn scale_levels_bounds() {
        let raw = [3, 999, 0, 500, 1000, 7];
        let levels = scale_levels(&raw);
        assert!(levels.iter().all(|&l| (l as u64) < LEVELS));
        // The maximum input always reaches the top level.
        assert_eq!(levels[4], (LEVELS - 1) as u8);
    }

    #[test]
    fn scale_levels_all_zero_is_all_zero() {
        assert_eq!(scale_levels(&[0, 0, 0]), vec![0, 0, 0]);
    }

    #[test]
    fn write_config_emits_raw_ascii_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), 40).unwrap();
        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.contains("bars = 40"));
        assert!(contents.contains("method = raw"));
        assert!(contents.contains("data_format = ascii"));
    }
}
