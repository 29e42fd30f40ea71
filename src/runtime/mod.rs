use std::process::{Command, Stdio};

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::player::PlayerSession;

mod event_loop;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();

    // The search tool and the player are hard requirements; the visualizer
    // only gates its own panel.
    let mut missing = Vec::new();
    for binary in [&settings.search.binary, &settings.player.binary] {
        if !command_exists(binary) {
            missing.push(binary.clone());
        }
    }
    if !missing.is_empty() {
        return Err(format!(
            "required tools not found: {} (install them and try again)",
            missing.join(", ")
        )
        .into());
    }
    let has_visualizer = command_exists(&settings.visualizer.binary);

    // App-lifetime scratch dir for IPC socket paths and the visualizer
    // config; removed on exit when the guard drops.
    let runtime_dir = tempfile::Builder::new().prefix("vivace-").tempdir()?;

    let mut session = PlayerSession::new(
        settings.player.clone(),
        settings.lyrics.clone(),
        settings.visualizer.clone(),
        runtime_dir.path(),
        has_visualizer,
    );
    let mut app = App::new(settings.player.audio_only, settings.lyrics.enabled);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &mut session);

    session.stop();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    run_result
}

/// Probe whether a required external tool is runnable.
fn command_exists(binary: &str) -> bool {
    Command::new(binary)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
