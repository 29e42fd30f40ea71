use super::*;
use crate::catalog::Track;

fn t(title: &str) -> Track {
    Track {
        id: title.to_ascii_lowercase(),
        title: title.into(),
        url: format!("https://example.com/{title}"),
        duration: "3:00".into(),
        channel: "Test".into(),
    }
}

#[test]
fn selection_wraps_in_both_directions() {
    let mut app = App::new(true, true);
    app.results = vec![t("A"), t("B"), t("C")];

    assert_eq!(app.selected, 0);
    app.select_prev();
    assert_eq!(app.selected, 2);
    app.select_next();
    assert_eq!(app.selected, 0);
    app.select_next();
    assert_eq!(app.selected, 1);
}

#[test]
fn selection_is_inert_without_results() {
    let mut app = App::new(true, true);
    app.select_next();
    app.select_prev();
    assert_eq!(app.selected, 0);
    assert!(app.selected_track().is_none());
    assert!(!app.has_results());
}

#[test]
fn search_mode_edits_a_seeded_input() {
    let mut app = App::new(true, true);
    app.search_query = "previous query".into();

    app.enter_search_mode();
    assert!(app.search_mode);
    assert_eq!(app.search_input, "previous query");

    app.pop_search_char();
    app.push_search_char('!');
    assert_eq!(app.search_input, "previous quer!");

    // Control characters never land in the input.
    app.push_search_char('\u{8}');
    assert_eq!(app.search_input, "previous quer!");

    app.exit_search_mode();
    assert!(!app.search_mode);
    // Abandoning the edit leaves the submitted query untouched.
    assert_eq!(app.search_query, "previous query");
}

#[test]
fn blank_input_does_not_submit() {
    let mut app = App::new(true, true);
    app.enter_search_mode();
    app.search_input = "   ".into();
    app.submit_search(&Default::default());

    assert!(!app.search_mode);
    assert!(!app.search_pending());
    assert!(app.status.is_none());
}

#[test]
fn toggles_flip_modes() {
    let mut app = App::new(true, true);
    app.toggle_audio_only();
    assert!(!app.audio_only);
    app.toggle_lyrics();
    assert!(!app.show_lyrics);
    app.toggle_lyrics();
    assert!(app.show_lyrics);
}

#[test]
fn poll_search_is_inert_when_nothing_is_pending() {
    let mut app = App::new(true, true);
    app.results = vec![t("Kept")];
    app.selected = 0;
    app.poll_search();
    assert_eq!(app.results.len(), 1);
    assert!(app.status.is_none());
}

#[test]
fn finished_search_replaces_results_and_resets_selection() {
    use std::sync::mpsc;

    let mut app = App::new(true, true);
    app.results = vec![t("Old A"), t("Old B")];
    app.selected = 1;

    // Stand in for the search worker with a hand-fed channel.
    let (tx, rx) = mpsc::channel();
    app.search_rx = Some(rx);
    assert!(app.search_pending());

    app.poll_search();
    assert!(app.search_pending(), "empty channel must not finish the search");

    tx.send(vec![t("New")]).unwrap();
    app.poll_search();
    assert!(!app.search_pending());
    assert_eq!(app.results.len(), 1);
    assert_eq!(app.results[0].title, "New");
    assert_eq!(app.selected, 0);
    assert!(app.status.is_none());
}

#[test]
fn empty_search_result_sets_a_notice() {
    use std::sync::mpsc;

    let mut app = App::new(true, true);
    let (tx, rx) = mpsc::channel();
    app.search_rx = Some(rx);
    tx.send(Vec::new()).unwrap();
    app.poll_search();
    assert_eq!(app.status.as_deref(), Some("No results found."));
}

#[test]
fn dead_search_worker_is_reported() {
    use std::sync::mpsc;

    let mut app = App::new(true, true);
    let (tx, rx) = mpsc::channel::<Vec<Track>>();
    app.search_rx = Some(rx);
    drop(tx);
    app.poll_search();
    assert!(!app.search_pending());
    assert_eq!(app.status.as_deref(), Some("Search failed."));
}
