//! Lyric lookup and the time-indexed lyric track.
//!
//! `LyricTrack` is built once per playback session from the lookup service's
//! raw text and never mutated afterwards; `cursor_index` maps a playback
//! clock reading onto it.

mod fetch;
mod track;

pub use fetch::spawn_lookup;
pub use track::{LyricLine, LyricTrack, cursor_index};

#[cfg(test)]
mod tests;
