//! Playback engine: the external player process, its IPC clock, and the
//! session that owns both plus the background workers feeding the renderer.

mod ipc;
mod monitor;
mod session;
mod types;

pub use ipc::IpcClient;
pub use session::{PlayerSession, SessionState};
pub use types::{ClockHandle, CursorHandle, PlaybackClock};
