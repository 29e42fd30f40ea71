use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::catalog::Track;
use crate::config::{LyricsSettings, PlayerSettings, VisualizerSettings};
use crate::lyrics::{self, LyricTrack};
use crate::visualizer::{self, FrameHandle};

use super::ipc::IpcClient;
use super::monitor;
use super::types::{ClockHandle, CursorHandle, PlaybackClock};

/// Session lifecycle. `Starting` and `Stopping` are transited synchronously
/// inside `start`/`stop`, so between calls the state is `Idle` or `Active`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Starting,
    Active,
    Stopping,
}

/// Resources of one live playback: processes, socket path, shared state
/// handles and the background worker handles. Created by `start`, consumed
/// by teardown.
struct ActiveSession {
    player: Child,
    visualizer: Option<Child>,
    socket_path: PathBuf,
    active: Arc<AtomicBool>,
    clock: ClockHandle,
    frame: FrameHandle,
    cursor: CursorHandle,
    workers: Vec<JoinHandle<()>>,
    lyrics: Option<LyricTrack>,
    lyrics_rx: Option<Receiver<Option<LyricTrack>>>,
    track: Track,
}

/// The aggregate root owning the external player, its IPC channel and the
/// background activities. At most one session is live at a time; starting a
/// new one drains the previous one first.
pub struct PlayerSession {
    player_settings: PlayerSettings,
    lyrics_settings: LyricsSettings,
    visualizer_settings: VisualizerSettings,
    runtime_dir: PathBuf,
    has_visualizer: bool,
    state: SessionState,
    inner: Option<ActiveSession>,
    /// Last played track, kept across teardown so the UI can report
    /// "Stopped" against a title instead of going blank.
    last_track: Option<Track>,
    session_seq: usize,
}

impl PlayerSession {
    pub fn new(
        player_settings: PlayerSettings,
        lyrics_settings: LyricsSettings,
        visualizer_settings: VisualizerSettings,
        runtime_dir: &Path,
        has_visualizer: bool,
    ) -> Self {
        Self {
            player_settings,
            lyrics_settings,
            visualizer_settings,
            runtime_dir: runtime_dir.to_path_buf(),
            has_visualizer,
            state: SessionState::Idle,
            inner: None,
            last_track: None,
            session_seq: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn has_visualizer(&self) -> bool {
        self.has_visualizer
    }

    /// The track of the live session, or the last one played.
    pub fn current_track(&self) -> Option<&Track> {
        match &self.inner {
            Some(inner) => Some(&inner.track),
            None => self.last_track.as_ref(),
        }
    }

    /// Point-in-time copy of the playback clock.
    pub fn clock(&self) -> Option<PlaybackClock> {
        let inner = self.inner.as_ref()?;
        inner.clock.lock().ok().map(|c| c.clone())
    }

    /// Latest visualizer frame; empty when none has been published yet.
    pub fn frame(&self) -> Vec<u8> {
        match &self.inner {
            Some(inner) => inner.frame.lock().map(|f| f.clone()).unwrap_or_default(),
            None => Vec::new(),
        }
    }

    pub fn lyrics(&self) -> Option<&LyricTrack> {
        self.inner.as_ref()?.lyrics.as_ref()
    }

    /// Whether the one-shot lyric lookup is still in flight.
    pub fn lyrics_pending(&self) -> bool {
        self.inner
            .as_ref()
            .is_some_and(|inner| inner.lyrics_rx.is_some())
    }

    pub fn lyric_cursor(&self) -> usize {
        match &self.inner {
            Some(inner) => inner.cursor.load(Ordering::Relaxed),
            None => 0,
        }
    }

    /// Launch playback of `track`, draining any previous session first.
    ///
    /// The session becomes `Active` as soon as the player process is up; the
    /// clock poller fills in values once the IPC socket appears.
    pub fn start(&mut self, track: &Track, audio_only: bool) -> std::io::Result<()> {
        self.stop();
        self.state = SessionState::Starting;

        self.session_seq += 1;
        let socket_path = self
            .runtime_dir
            .join(format!("mpv-sock-{}", self.session_seq));

        let mut cmd = Command::new(&self.player_settings.binary);
        cmd.arg(format!("--volume={}", self.player_settings.volume))
            .arg("--really-quiet")
            .arg(format!("--input-ipc-server={}", socket_path.display()));
        if audio_only {
            cmd.arg("--no-video");
        }
        cmd.arg(&track.url).stdout(Stdio::null()).stderr(Stdio::null());

        let player = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                self.state = SessionState::Idle;
                return Err(e);
            }
        };

        let active = Arc::new(AtomicBool::new(true));
        let clock: ClockHandle = Arc::new(Mutex::new(PlaybackClock::default()));
        let frame: FrameHandle = Arc::new(Mutex::new(Vec::new()));
        let cursor: CursorHandle = Arc::new(AtomicUsize::new(0));
        let mut workers = Vec::new();

        let client = IpcClient::new(
            socket_path.clone(),
            Duration::from_millis(self.player_settings.ipc_timeout_ms),
        );
        workers.push(monitor::spawn_clock_poller(
            active.clone(),
            client,
            clock.clone(),
            Duration::from_millis(self.player_settings.poll_interval_ms),
        ));

        let mut viz_child = None;
        if self.has_visualizer {
            if let Some((child, handle)) = visualizer::spawn(
                &self.visualizer_settings,
                &self.runtime_dir,
                active.clone(),
                frame.clone(),
            ) {
                viz_child = Some(child);
                workers.push(handle);
            }
        }

        let lyrics_rx = Some(lyrics::spawn_lookup(
            self.lyrics_settings.api_url.clone(),
            track.title.clone(),
        ));

        self.inner = Some(ActiveSession {
            player,
            visualizer: viz_child,
            socket_path,
            active,
            clock,
            frame,
            cursor,
            workers,
            lyrics: None,
            lyrics_rx,
            track: track.clone(),
        });
        self.last_track = Some(track.clone());
        self.state = SessionState::Active;
        Ok(())
    }

    /// Check whether the lyric lookup finished and attach its result.
    ///
    /// For a time-synced track this also spawns the cursor worker. Called by
    /// the render loop each tick; cheap when nothing is pending.
    pub fn poll_lyrics(&mut self) {
        let lyrics_interval = Duration::from_millis(self.lyrics_settings.cursor_interval_ms);
        let Some(inner) = self.inner.as_mut() else {
            return;
        };
        let Some(rx) = inner.lyrics_rx.as_ref() else {
            return;
        };

        match rx.try_recv() {
            Ok(result) => {
                inner.lyrics_rx = None;
                if let Some(track) = result {
                    if let Some(timestamps) = track.timestamps() {
                        inner.workers.push(monitor::spawn_lyric_cursor(
                            inner.active.clone(),
                            inner.clock.clone(),
                            timestamps,
                            inner.cursor.clone(),
                            lyrics_interval,
                        ));
                    }
                    inner.lyrics = Some(track);
                }
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                inner.lyrics_rx = None;
            }
        }
    }

    /// Detect an externally-exited player and tear the session down.
    ///
    /// Called once per render tick rather than from a dedicated thread, so
    /// exit detection cannot race the teardown path. Returns true when a
    /// teardown happened.
    pub fn poll_exit(&mut self) -> bool {
        if self.state != SessionState::Active {
            return false;
        }
        let exited = match self.inner.as_mut() {
            Some(inner) => matches!(inner.player.try_wait(), Ok(Some(_))),
            None => false,
        };
        if exited {
            self.stop();
        }
        exited
    }

    /// Live background worker handles (joined workers are gone).
    #[cfg(test)]
    pub(crate) fn worker_count(&self) -> usize {
        self.inner.as_ref().map_or(0, |inner| inner.workers.len())
    }

    /// Tear the session down. Safe to call in any state, any number of
    /// times; stopping an idle session is a no-op.
    pub fn stop(&mut self) {
        let Some(mut inner) = self.inner.take() else {
            self.state = SessionState::Idle;
            return;
        };
        self.state = SessionState::Stopping;

        // Stop feeding the workers before reaping the processes.
        inner.active.store(false, Ordering::Relaxed);

        terminate(
            &mut inner.player,
            Duration::from_millis(self.player_settings.stop_grace_ms),
        );
        if let Some(mut viz) = inner.visualizer.take() {
            // Killing the visualizer closes its pipe and unblocks the reader.
            let _ = viz.kill();
            let _ = viz.wait();
        }

        for worker in inner.workers.drain(..) {
            let _ = worker.join();
        }

        // The player normally removes its socket; a leftover file is not an
        // error worth surfacing.
        let _ = std::fs::remove_file(&inner.socket_path);

        self.state = SessionState::Idle;
    }
}

impl Drop for PlayerSession {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Terminate a child gracefully: SIGTERM, a bounded grace period, SIGKILL.
fn terminate(child: &mut Child, grace: Duration) {
    if matches!(child.try_wait(), Ok(Some(_))) {
        return;
    }

    unsafe {
        libc::kill(child.id() as libc::pid_t, libc::SIGTERM);
    }

    let deadline = Instant::now() + grace;
    while Instant::now() < deadline {
        match child.try_wait() {
            Ok(Some(_)) => return,
            Ok(None) => thread::sleep(Duration::from_millis(50)),
            Err(_) => break,
        }
    }

    let _ = child.kill();
    let _ = child.wait();
}
