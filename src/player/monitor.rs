use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::ipc::IpcClient;
use super::types::{ClockHandle, CursorHandle};
use crate::lyrics;

/// Spawn the playback clock poller.
///
/// While the session is active: query `time-pos` and `duration`, then
/// publish both under one short lock. The lock is never held across the IPC
/// round trip, so readers only ever see a complete clock value.
pub(super) fn spawn_clock_poller(
    active: Arc<AtomicBool>,
    client: IpcClient,
    clock: ClockHandle,
    interval: Duration,
) -> JoinHandle<()> {
    thread::spawn(move || {
        while active.load(Ordering::Relaxed) {
            let position = client.query_f64("time-pos");
            let duration = client.query_f64("duration");

            if position.is_some() || duration.is_some() {
                if let Ok(mut c) = clock.lock() {
                    if let Some(d) = duration {
                        c.duration = d;
                    }
                    if let Some(p) = position {
                        c.position = if c.duration > 0.0 {
                            p.clamp(0.0, c.duration)
                        } else {
                            p.max(0.0)
                        };
                    }
                    c.updated_at = Some(Instant::now());
                }
            }

            thread::sleep(interval);
        }
    })
}

/// Spawn the lyric cursor worker for a time-synced track.
///
/// Every tick it reads the clock position and publishes the greatest entry
/// index whose timestamp has been reached. The scan restarts from the top
/// each tick, so the published index is monotonic whenever the clock is.
pub(super) fn spawn_lyric_cursor(
    active: Arc<AtomicBool>,
    clock: ClockHandle,
    timestamps: Vec<f64>,
    cursor: CursorHandle,
    interval: Duration,
) -> JoinHandle<()> {
    thread::spawn(move || {
        while active.load(Ordering::Relaxed) {
            let position = clock.lock().map(|c| c.position).unwrap_or(0.0);
            cursor.store(lyrics::cursor_index(&timestamps, position), Ordering::Relaxed);
            thread::sleep(interval);
        }
    })
}
