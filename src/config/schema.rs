use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/vivace/config.toml` or `~/.config/vivace/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `VIVACE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub player: PlayerSettings,
    pub search: SearchSettings,
    pub lyrics: LyricsSettings,
    pub visualizer: VisualizerSettings,
    pub ui: UiSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Player binary to launch. Must speak mpv's JSON IPC protocol.
    pub binary: String,
    /// Playback volume passed on the command line (0-100).
    pub volume: u32,
    /// Whether sessions start in audio-only mode (`--no-video`).
    pub audio_only: bool,
    /// Interval between playback clock polls (milliseconds).
    pub poll_interval_ms: u64,
    /// Connect/read/write timeout for one IPC round trip (milliseconds).
    pub ipc_timeout_ms: u64,
    /// Grace period between SIGTERM and SIGKILL on teardown (milliseconds).
    pub stop_grace_ms: u64,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            binary: "mpv".to_string(),
            volume: 100,
            audio_only: true,
            poll_interval_ms: 300,
            ipc_timeout_ms: 500,
            stop_grace_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Catalog search binary (yt-dlp compatible CLI).
    pub binary: String,
    /// Maximum number of results per search.
    pub max_results: usize,
    /// Network timeout forwarded to the search tool (seconds).
    pub socket_timeout_secs: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            binary: "yt-dlp".to_string(),
            max_results: 10,
            socket_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LyricsSettings {
    /// Whether the lyrics panel starts visible.
    pub enabled: bool,
    /// Lyric search endpoint. Queried as `<api_url>?q=<title>`.
    pub api_url: String,
    /// Interval between lyric cursor updates (milliseconds).
    pub cursor_interval_ms: u64,
}

impl Default for LyricsSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            api_url: "https://lrclib.net/api/search".to_string(),
            cursor_interval_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VisualizerSettings {
    /// Visualizer binary. Must support raw ASCII output to stdout.
    pub binary: String,
    /// Number of spectrum bars the visualizer emits per sample.
    pub bars: u32,
}

impl Default for VisualizerSettings {
    fn default() -> Self {
        Self {
            binary: "cava".to_string(),
            bars: 40,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Separator between elapsed and total time in the now-playing line.
    pub time_separator: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ vivace: music in the terminal ~ ".to_string(),
            time_separator: " / ".to_string(),
        }
    }
}
