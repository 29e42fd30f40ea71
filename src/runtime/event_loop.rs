use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::config::Settings;
use crate::player::PlayerSession;
use crate::ui;

/// Render cadence when no input arrives; input wakes the loop immediately.
const TICK: Duration = Duration::from_millis(100);

/// Main terminal event loop: one snapshot-and-paint per tick, at most one
/// input event dispatched per tick. Returns `Ok(())` on quit.
///
/// The loop itself never blocks on the player, the visualizer or the
/// network; it only drains already-published state.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &Settings,
    app: &mut App,
    session: &mut PlayerSession,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // A player that exits on its own is handled like an explicit stop;
        // the status line reports "Stopped".
        session.poll_exit();
        session.poll_lyrics();
        app.poll_search();

        terminal.draw(|f| ui::draw(f, app, session, &settings.ui))?;

        if event::poll(TICK)? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if handle_key(key, settings, app, session) {
                        break;
                    }
                }
                Event::Mouse(mouse) => {
                    let size = terminal.size()?;
                    let area = Rect::new(0, 0, size.width, size.height);
                    handle_mouse(mouse, area, settings, app, session);
                }
                _ => {}
            }
        }
    }

    Ok(())
}

/// Handle one key press. Returns true when the app should quit.
fn handle_key(
    key: KeyEvent,
    settings: &Settings,
    app: &mut App,
    session: &mut PlayerSession,
) -> bool {
    if app.search_mode {
        match key.code {
            KeyCode::Esc => app.exit_search_mode(),
            KeyCode::Enter => app.submit_search(&settings.search),
            KeyCode::Backspace => app.pop_search_char(),
            KeyCode::Char(c) => app.push_search_char(c),
            _ => {}
        }
        return false;
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('s') => app.enter_search_mode(),
        KeyCode::Char('l') => app.toggle_lyrics(),
        KeyCode::Char('m') => app.toggle_audio_only(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Enter => play_selected(settings, app, session),
        KeyCode::Char(' ') => session.stop(),
        KeyCode::Char('n') => {
            app.select_next();
            if session.is_active() {
                play_selected(settings, app, session);
            }
        }
        KeyCode::Char('p') => {
            app.select_prev();
            if session.is_active() {
                play_selected(settings, app, session);
            }
        }
        _ => {}
    }

    false
}

/// Handle one pointer event against the layout drawn this tick.
fn handle_mouse(
    mouse: MouseEvent,
    area: Rect,
    settings: &Settings,
    app: &mut App,
    session: &mut PlayerSession,
) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            match ui::hit_test(area, app, session.is_active(), mouse.column, mouse.row) {
                Some(ui::Hit::SearchBox) => app.enter_search_mode(),
                Some(ui::Hit::Result(index)) => {
                    app.selected = index;
                    play_selected(settings, app, session);
                }
                None => {}
            }
        }
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),
        _ => {}
    }
}

/// Start a session for the selected track; failures become a status notice,
/// never a crash.
fn play_selected(settings: &Settings, app: &mut App, session: &mut PlayerSession) {
    let Some(track) = app.selected_track().cloned() else {
        return;
    };
    match session.start(&track, app.audio_only) {
        Ok(()) => app.status = None,
        Err(e) => {
            app.status = Some(format!(
                "failed to start {}: {e}",
                settings.player.binary
            ));
        }
    }
}
