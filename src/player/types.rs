use std::sync::atomic::AtomicUsize;
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Latest known playback position and duration, in seconds.
///
/// Written only by the clock poller while a session is active; read by the
/// lyric cursor worker and the renderer. Readers always observe a complete
/// value: the poller updates it under one short lock, never across an IPC
/// call.
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    pub position: f64,
    pub duration: f64,
    pub updated_at: Option<Instant>,
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self {
            position: 0.0,
            duration: 0.0,
            updated_at: None,
        }
    }
}

pub type ClockHandle = Arc<Mutex<PlaybackClock>>;

/// Published lyric cursor index. Written only by the cursor worker.
pub type CursorHandle = Arc<AtomicUsize>;
