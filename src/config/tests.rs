use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_vivace_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("VIVACE_CONFIG_PATH", "/tmp/vivace-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/vivace-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("vivace")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("vivace")
            .join("config.toml")
    );
}

#[test]
fn defaults_describe_the_stock_toolchain() {
    let s = Settings::default();
    assert_eq!(s.player.binary, "mpv");
    assert_eq!(s.search.binary, "yt-dlp");
    assert_eq!(s.visualizer.binary, "cava");
    assert_eq!(s.player.poll_interval_ms, 300);
    assert_eq!(s.player.ipc_timeout_ms, 500);
    assert_eq!(s.player.stop_grace_ms, 2000);
    assert_eq!(s.lyrics.cursor_interval_ms, 100);
    assert!(s.validate().is_ok());
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[player]
binary = "mpv-git"
volume = 60
audio_only = false
poll_interval_ms = 250
ipc_timeout_ms = 400
stop_grace_ms = 1500

[search]
max_results = 5
socket_timeout_secs = 7

[lyrics]
enabled = false
cursor_interval_ms = 50

[visualizer]
bars = 64

[ui]
header_text = "hello"
time_separator = " | "
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("VIVACE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("VIVACE__PLAYER__VOLUME");

    let s = Settings::load().unwrap();
    assert_eq!(s.player.binary, "mpv-git");
    assert_eq!(s.player.volume, 60);
    assert!(!s.player.audio_only);
    assert_eq!(s.player.poll_interval_ms, 250);
    assert_eq!(s.player.ipc_timeout_ms, 400);
    assert_eq!(s.player.stop_grace_ms, 1500);
    assert_eq!(s.search.max_results, 5);
    assert_eq!(s.search.socket_timeout_secs, 7);
    assert!(!s.lyrics.enabled);
    assert_eq!(s.lyrics.cursor_interval_ms, 50);
    assert_eq!(s.visualizer.bars, 64);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.ui.time_separator, " | ");
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[player]
volume = 80
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("VIVACE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("VIVACE__PLAYER__VOLUME", "40");

    let s = Settings::load().unwrap();
    assert_eq!(s.player.volume, 40);
}

#[test]
fn validate_rejects_degenerate_values() {
    let mut s = Settings::default();
    s.search.max_results = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.visualizer.bars = 1;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.player.ipc_timeout_ms = 0;
    assert!(s.validate().is_err());
}
