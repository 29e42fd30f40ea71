//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`, plus
//! the mouse hit-testing that maps pointer events back onto the same layout.

use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph, Widget, Wrap},
};

use crate::app::App;
use crate::config::UiSettings;
use crate::player::{PlaybackClock, PlayerSession, SessionState};
use crate::visualizer::LEVELS;

/// Rows each result occupies in the list (title + channel/duration line).
const RESULT_ROWS: usize = 2;

/// How many lines of context precede the active lyric line in its window.
const LYRIC_CONTEXT: usize = 3;

/// The screen regions of one composed frame.
struct Chunks {
    header: Rect,
    search: Rect,
    results: Rect,
    visualizer: Option<Rect>,
    lyrics: Option<Rect>,
    status: Rect,
    footer: Rect,
}

/// Compute the frame layout. The right-hand column (visualizer + lyrics)
/// only exists while a session is live; hit-testing recomputes this same
/// layout so clicks land on what was actually drawn.
fn split_frame(area: Rect, playing: bool, show_lyrics: bool) -> Chunks {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(3),
        ])
        .split(area);

    let (results, visualizer, lyrics) = if playing {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[2]);

        if show_lyrics {
            let right = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(cols[1]);
            (cols[0], Some(right[0]), Some(right[1]))
        } else {
            (cols[0], Some(cols[1]), None)
        }
    } else {
        (rows[2], None, None)
    };

    Chunks {
        header: rows[0],
        search: rows[1],
        results,
        visualizer,
        lyrics,
        status: rows[3],
        footer: rows[4],
    }
}

/// Format seconds as `MM:SS`; out-of-range values render as a placeholder.
pub fn format_mmss(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "--:--".to_string();
    }
    let total = seconds as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Build the elapsed/total time text for a clock reading.
pub fn time_display(clock: &PlaybackClock, separator: &str) -> String {
    let elapsed = format_mmss(clock.position);
    if clock.duration > 0.0 {
        format!("{}{}{}", elapsed, separator, format_mmss(clock.duration))
    } else {
        elapsed
    }
}

/// Render a one-line progress bar: elapsed time, a track with a position
/// marker, total time.
fn progress_line(clock: &PlaybackClock, width: usize) -> String {
    let cur = format_mmss(clock.position);
    let dur = format_mmss(clock.duration);

    let bar_width = width.saturating_sub(cur.len() + dur.len() + 2).max(10);
    let marker = if clock.duration > 0.0 {
        let pos = (clock.position / clock.duration * bar_width as f64) as usize;
        pos.min(bar_width - 1)
    } else {
        0
    };

    let bar: String = (0..bar_width)
        .map(|i| if i == marker { '○' } else { '─' })
        .collect();
    format!("{cur} {bar} {dur}")
}

/// Rows a bar of `level` fills out of `max_rows`. Every bar shows at least
/// one cell; the top level fills the panel.
fn bar_rows(level: u8, max_rows: usize) -> usize {
    (((level as usize + 1) * max_rows) / LEVELS as usize).max(1)
}

/// The visible slice of the result list, centered on the selection.
fn list_window(total: usize, inner_height: usize, selected: usize) -> (usize, usize) {
    let per_page = (inner_height / RESULT_ROWS).max(1);
    if total <= per_page {
        return (0, total);
    }

    let mut start = selected.saturating_sub(per_page / 2);
    if start + per_page > total {
        start = total - per_page;
    }
    (start, start + per_page)
}

/// Spectrum panel: a progress line on top, vertical level bars below.
struct SpectrumWidget<'a> {
    levels: &'a [u8],
    clock: Option<&'a PlaybackClock>,
    block: Block<'a>,
}

impl Widget for SpectrumWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = self.block.inner(area);
        self.block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if let Some(clock) = self.clock {
            let line = progress_line(clock, inner.width as usize);
            buf.set_stringn(
                inner.x,
                inner.y,
                &line,
                inner.width as usize,
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            );
        }

        if inner.height < 3 || self.levels.is_empty() {
            return;
        }

        let top = inner.y + 2;
        let bottom = inner.y + inner.height - 1;
        let max_rows = (bottom - top + 1) as usize;

        for (col, &level) in self.levels.iter().enumerate() {
            if col as u16 >= inner.width {
                break;
            }
            let filled = bar_rows(level, max_rows).min(max_rows) as u16;
            for r in 0..filled {
                let y = bottom - r;
                buf[(inner.x + col as u16, y)]
                    .set_char('█')
                    .set_fg(Color::Green);
            }
        }
    }
}

fn draw_header(frame: &mut Frame, area: Rect, ui: &UiSettings) {
    let header = Paragraph::new(ui.header_text.as_str())
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" vivace ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, area);
}

fn draw_search_box(frame: &mut Frame, area: Rect, app: &App) {
    let content: Line = if app.search_mode {
        Line::from(Span::styled(
            format!("{}█", app.search_input),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ))
    } else if app.search_query.is_empty() {
        Line::from(Span::styled(
            "[press 's' or click here to search]",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(app.search_query.as_str())
    };

    let search = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" search ")
            .padding(Padding {
                left: 1,
                right: 0,
                top: 0,
                bottom: 0,
            }),
    );
    frame.render_widget(search, area);
}

fn draw_results(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title(" results ");

    if !app.has_results() {
        let hint = if app.search_pending() {
            "searching…"
        } else if app.search_query.is_empty() {
            "search for music or videos"
        } else {
            "no results"
        };
        let empty = Paragraph::new(hint)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let inner_height = area.height.saturating_sub(2) as usize;
    let (start, end) = list_window(app.results.len(), inner_height, app.selected);

    let items: Vec<ListItem> = app.results[start..end]
        .iter()
        .map(|track| {
            ListItem::new(vec![
                Line::from(track.title.as_str()),
                Line::from(Span::styled(
                    format!("  {} | {}", track.channel, track.duration),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("▶ ");
    let mut state = ratatui::widgets::ListState::default();
    state.select(Some(app.selected - start));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_visualizer(frame: &mut Frame, area: Rect, session: &PlayerSession) {
    let block = Block::default().borders(Borders::ALL).title(" spectrum ");

    if !session.has_visualizer() {
        let placeholder = Paragraph::new("visualizer unavailable")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let levels = session.frame();
    let clock = session.clock();
    let widget = SpectrumWidget {
        levels: &levels,
        clock: clock.as_ref(),
        block,
    };
    frame.render_widget(widget, area);
}

fn draw_lyrics(frame: &mut Frame, area: Rect, session: &PlayerSession) {
    let block = Block::default().borders(Borders::ALL).title(" lyrics ");
    let inner_height = area.height.saturating_sub(2) as usize;

    let Some(track) = session.lyrics() else {
        let message = if session.lyrics_pending() {
            "fetching lyrics…"
        } else {
            "no lyrics available"
        };
        let placeholder = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    };

    let cursor = session.lyric_cursor().min(track.len().saturating_sub(1));
    let start = if track.is_synced() {
        cursor.saturating_sub(LYRIC_CONTEXT)
    } else {
        0
    };

    let mut lines: Vec<Line> = Vec::new();
    for i in start..track.len().min(start + inner_height) {
        let Some(text) = track.line(i) else { break };
        let style = if track.is_synced() && i == cursor {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(Span::styled(text.to_string(), style)));
    }

    let lyrics = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(lyrics, area);
}

fn draw_status(frame: &mut Frame, area: Rect, app: &App, session: &PlayerSession, ui: &UiSettings) {
    let mut parts: Vec<String> = Vec::new();

    parts.push(format!(
        "Mode: {}",
        if app.audio_only { "AUDIO" } else { "VIDEO" }
    ));
    parts.push(format!(
        "Lyrics: {}",
        if app.show_lyrics { "ON" } else { "OFF" }
    ));

    if let Some(track) = session.current_track() {
        match session.state() {
            SessionState::Active | SessionState::Starting => {
                match session.clock() {
                    Some(clock) if clock.updated_at.is_some() => {
                        parts.push(format!(
                            "Song: {} [{}]",
                            track.title,
                            time_display(&clock, &ui.time_separator)
                        ));
                    }
                    _ => parts.push(format!("Song: {}", track.title)),
                }
                parts.push("Playing".to_string());
            }
            SessionState::Idle | SessionState::Stopping => {
                parts.push(format!("Song: {}", track.title));
                parts.push("Stopped".to_string());
            }
        }
    }

    if let Some(notice) = &app.status {
        parts.push(notice.clone());
    }

    let status = Paragraph::new(parts.join(" • "))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" status ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status, area);
}

/// Render the controls help line.
fn controls_text() -> String {
    [
        ("s", "search"),
        ("enter", "play"),
        ("space", "stop"),
        ("n/p", "next/prev"),
        ("↑/↓", "navigate"),
        ("m", "audio/video"),
        ("l", "lyrics"),
        ("q", "quit"),
    ]
    .iter()
    .map(|(k, v)| format!("[{k}] {v}"))
    .collect::<Vec<String>>()
    .join(" | ")
}

fn draw_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(controls_text())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, area);
}

/// Render the entire UI for one tick.
pub fn draw(frame: &mut Frame, app: &App, session: &PlayerSession, ui: &UiSettings) {
    let playing = session.is_active();
    let chunks = split_frame(frame.area(), playing, app.show_lyrics);

    draw_header(frame, chunks.header, ui);
    draw_search_box(frame, chunks.search, app);
    draw_results(frame, chunks.results, app);
    if let Some(area) = chunks.visualizer {
        draw_visualizer(frame, area, session);
    }
    if let Some(area) = chunks.lyrics {
        draw_lyrics(frame, area, session);
    }
    draw_status(frame, chunks.status, app, session, ui);
    draw_footer(frame, chunks.footer);
}

/// What a pointer event landed on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Hit {
    SearchBox,
    Result(usize),
}

/// Map a click position back onto the layout drawn for this frame.
pub fn hit_test(area: Rect, app: &App, playing: bool, column: u16, row: u16) -> Option<Hit> {
    let chunks = split_frame(area, playing, app.show_lyrics);

    let inside = |r: Rect| {
        column >= r.x && column < r.x + r.width && row >= r.y && row < r.y + r.height
    };

    if inside(chunks.search) {
        return Some(Hit::SearchBox);
    }

    if inside(chunks.results) && app.has_results() {
        let inner_y = chunks.results.y + 1;
        let inner_height = chunks.results.height.saturating_sub(2);
        if row < inner_y || row >= inner_y + inner_height {
            return None;
        }
        let (start, end) = list_window(app.results.len(), inner_height as usize, app.selected);
        let index = start + ((row - inner_y) as usize) / RESULT_ROWS;
        if index < end {
            return Some(Hit::Result(index));
        }
    }

    None
}
