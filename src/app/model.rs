//! Application model: search input, result list and presentation toggles.
//!
//! `App` is the UI-facing state mutated by the event loop; everything
//! playback-related lives in `player::PlayerSession`.

use std::sync::mpsc::{Receiver, TryRecvError};

use crate::catalog::{self, Track};
use crate::config::SearchSettings;

pub struct App {
    /// The query of the last submitted search.
    pub search_query: String,
    /// The text being edited while in search mode.
    pub search_input: String,
    /// Whether keystrokes edit the search box.
    pub search_mode: bool,

    pub results: Vec<Track>,
    pub selected: usize,

    /// Start playback without video output.
    pub audio_only: bool,
    /// Whether the lyrics panel is shown during playback.
    pub show_lyrics: bool,

    /// One-line notice shown in the status box ("Searching…", errors).
    pub status: Option<String>,

    pub(crate) search_rx: Option<Receiver<Vec<Track>>>,
}

impl App {
    pub fn new(audio_only: bool, show_lyrics: bool) -> Self {
        Self {
            search_query: String::new(),
            search_input: String::new(),
            search_mode: false,
            results: Vec::new(),
            selected: 0,
            audio_only,
            show_lyrics,
            status: None,
            search_rx: None,
        }
    }

    pub fn has_results(&self) -> bool {
        !self.results.is_empty()
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.results.get(self.selected)
    }

    /// Enter search mode, seeding the input with the previous query.
    pub fn enter_search_mode(&mut self) {
        self.search_mode = true;
        self.search_input = self.search_query.clone();
    }

    pub fn exit_search_mode(&mut self) {
        self.search_mode = false;
    }

    pub fn push_search_char(&mut self, c: char) {
        if !c.is_control() {
            self.search_input.push(c);
        }
    }

    pub fn pop_search_char(&mut self) {
        self.search_input.pop();
    }

    /// Submit the edited query: leave search mode and kick off a one-shot
    /// search worker. Blank input is ignored.
    pub fn submit_search(&mut self, settings: &SearchSettings) {
        let query = self.search_input.trim().to_string();
        self.exit_search_mode();
        if query.is_empty() {
            return;
        }

        self.search_query = query.clone();
        self.status = Some(format!("Searching for \"{query}\"…"));
        self.search_rx = Some(catalog::spawn_search(query, settings.clone()));
    }

    /// Whether a search worker is still in flight.
    pub fn search_pending(&self) -> bool {
        self.search_rx.is_some()
    }

    /// Collect a finished search, replacing the result list.
    ///
    /// Called by the render loop each tick; cheap when nothing is pending.
    /// Replacing the results resets the selection to the top.
    pub fn poll_search(&mut self) {
        let Some(rx) = self.search_rx.as_ref() else {
            return;
        };

        match rx.try_recv() {
            Ok(results) => {
                self.search_rx = None;
                self.results = results;
                self.selected = 0;
                self.status = if self.results.is_empty() {
                    Some("No results found.".to_string())
                } else {
                    None
                };
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.search_rx = None;
                self.status = Some("Search failed.".to_string());
            }
        }
    }

    /// Move the selection down, wrapping at the end.
    pub fn select_next(&mut self) {
        if !self.results.is_empty() {
            self.selected = (self.selected + 1) % self.results.len();
        }
    }

    /// Move the selection up, wrapping at the start.
    pub fn select_prev(&mut self) {
        if !self.results.is_empty() {
            self.selected = (self.selected + self.results.len() - 1) % self.results.len();
        }
    }

    pub fn toggle_audio_only(&mut self) {
        self.audio_only = !self.audio_only;
    }

    pub fn toggle_lyrics(&mut self) {
        self.show_lyrics = !self.show_lyrics;
    }
}
