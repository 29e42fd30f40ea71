use super::track::parse_timestamp;
use super::*;

#[test]
fn parse_timestamp_handles_fractions() {
    assert_eq!(parse_timestamp("00:12.50"), Some(12.5));
    assert_eq!(parse_timestamp("01:05"), Some(65.0));
    assert_eq!(parse_timestamp("10:00.25"), Some(600.25));
}

#[test]
fn parse_timestamp_rejects_malformed_tags() {
    assert_eq!(parse_timestamp(""), None);
    assert_eq!(parse_timestamp("abc"), None);
    assert_eq!(parse_timestamp("12"), None);
    assert_eq!(parse_timestamp("1:2:3"), None);
    assert_eq!(parse_timestamp("1:"), None);
}

#[test]
fn synced_parse_is_sorted_with_non_empty_text() {
    let raw = "[00:30.00]Later line\n[00:12.50]Hello there\n[00:20.00]Middle\n";
    let track = LyricTrack::parse(raw, "").unwrap();

    let LyricTrack::Synced(entries) = &track else {
        panic!("expected synced track");
    };
    assert_eq!(entries.len(), 3);
    assert!(entries.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    assert!(entries.iter().all(|e| !e.text.is_empty()));
    assert_eq!(entries[0].text, "Hello there");
}

#[test]
fn synced_parse_expands_multi_tag_lines() {
    let raw = "[00:10.00][01:10.00]Repeated chorus line\n";
    let track = LyricTrack::parse(raw, "").unwrap();

    let LyricTrack::Synced(entries) = &track else {
        panic!("expected synced track");
    };
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].timestamp, 10.0);
    assert_eq!(entries[1].timestamp, 70.0);
    assert_eq!(entries[0].text, entries[1].text);
}

#[test]
fn synced_parse_drops_tagless_and_empty_lines() {
    let raw = "no tag here\n[00:05.00]\n[bad:tag]text\n[00:07.00]Kept\n";
    let track = LyricTrack::parse(raw, "").unwrap();

    let LyricTrack::Synced(entries) = &track else {
        panic!("expected synced track");
    };
    // "no tag here" has no tag; "[00:05.00]" has empty text; "[bad:tag]text"
    // keeps its bracket in the text and yields no timestamp.
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].text, "Kept");
}

#[test]
fn synced_parse_keeps_section_markers_in_text() {
    let raw = "[00:01.00][Chorus] Sing it\n";
    let track = LyricTrack::parse(raw, "").unwrap();

    let LyricTrack::Synced(entries) = &track else {
        panic!("expected synced track");
    };
    assert_eq!(entries[0].text, "[Chorus] Sing it");
}

#[test]
fn zero_synced_entries_fall_back_to_plain() {
    let synced = "nothing tagged\n\n";
    let plain = "  First line  \n\nSecond line\n";
    let track = LyricTrack::parse(synced, plain).unwrap();

    let LyricTrack::Plain(lines) = &track else {
        panic!("expected plain track");
    };
    assert_eq!(lines.as_slice(), ["First line", "Second line"]);
    assert!(!track.is_synced());
    assert!(track.timestamps().is_none());
}

#[test]
fn both_empty_yields_no_track() {
    assert_eq!(LyricTrack::parse("", ""), None);
    assert_eq!(LyricTrack::parse("\n\n", "   \n"), None);
}

#[test]
fn cursor_index_picks_greatest_reached_entry() {
    let ts = [12.5, 20.0, 45.0];

    // Before the first entry the cursor rests on it.
    assert_eq!(cursor_index(&ts, 0.0), 0);
    assert_eq!(cursor_index(&ts, 12.49), 0);

    assert_eq!(cursor_index(&ts, 12.5), 0);
    assert_eq!(cursor_index(&ts, 20.0), 1);
    assert_eq!(cursor_index(&ts, 44.0), 1);
    assert_eq!(cursor_index(&ts, 45.0), 2);
    assert_eq!(cursor_index(&ts, 1000.0), 2);
    assert_eq!(cursor_index(&[], 5.0), 0);
}

#[test]
fn cursor_index_is_monotonic_in_position() {
    let ts = [1.0, 2.0, 2.0, 8.5, 30.0];
    let mut last = 0;
    for step in 0..400 {
        let pos = step as f64 * 0.1;
        let idx = cursor_index(&ts, pos);
        assert!(idx >= last, "cursor went backwards at position {pos}");
        last = idx;
    }
}

#[test]
fn track_accessors_cover_both_forms() {
    let synced = LyricTrack::parse("[00:01.00]One\n[00:02.00]Two\n", "").unwrap();
    assert!(synced.is_synced());
    assert_eq!(synced.len(), 2);
    assert_eq!(synced.line(1), Some("Two"));
    assert_eq!(synced.line(5), None);
    assert_eq!(synced.timestamps().unwrap(), vec![1.0, 2.0]);

    let plain = LyricTrack::parse("", "Only line\n").unwrap();
    assert_eq!(plain.len(), 1);
    assert_eq!(plain.line(0), Some("Only line"));
}
