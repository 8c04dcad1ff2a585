//! Named windows: extra edges at a fixed offset from the playback position.

use std::collections::HashMap;

use pretty_assertions::assert_eq;

use chart_playback::prelude::*;

use super::dsl::{TestCursorDriver, chip, dense_chart, secs, single_note_chart, summary};

const JUDGE: WindowId = WindowId(0);
const EARLY: WindowId = WindowId(1);

#[test]
fn test_windows_fire_after_the_built_in_edges() {
    let (chart, note) = single_note_chart();

    TestCursorDriver::new(chart, CursorConfig::default())
        .stay()
        .window("judge", Seconds::ZERO)
        .window("early", secs(0.2))
        .view(|cursor| {
            assert_eq!(cursor.window_id("judge"), Some(JUDGE));
            assert_eq!(cursor.window_id("early"), Some(EARLY));
            assert_eq!(cursor.window_id("late"), None);
            assert_eq!(cursor.window(EARLY).map(|window| window.name()), Some("early"));
        })
        .silent()
        .to_ms(1900)
        .view(move |cursor| {
            assert_eq!(cursor.window_zone_of(EARLY, note), Some(WindowZone::Passed));
            assert_eq!(cursor.window_zone_of(JUDGE, note), Some(WindowZone::Ahead));
        })
        .events(|crossings| {
            assert_eq!(
                summary(crossings),
                vec![
                    (Edge::Primary, CrossingKind::Head, Direction::Forward),
                    (Edge::Primary, CrossingKind::Tail, Direction::Forward),
                    (Edge::Window(EARLY), CrossingKind::Head, Direction::Forward),
                    (Edge::Window(EARLY), CrossingKind::Tail, Direction::Forward),
                ]
            );
        })
        .to_ms(2000)
        .view(move |cursor| {
            assert_eq!(cursor.window_zone_of(JUDGE, note), Some(WindowZone::Ahead));
        })
        .silent()
        .to_ms(2100)
        .events(|crossings| {
            assert_eq!(
                summary(crossings),
                vec![
                    (Edge::Critical, CrossingKind::Head, Direction::Forward),
                    (Edge::Critical, CrossingKind::Tail, Direction::Forward),
                    (Edge::Window(JUDGE), CrossingKind::Head, Direction::Forward),
                    (Edge::Window(JUDGE), CrossingKind::Tail, Direction::Forward),
                ]
            );
        })
        .to_ms(0)
        .view(move |cursor| {
            assert_eq!(cursor.window_zone_of(EARLY, note), Some(WindowZone::Ahead));
            assert_eq!(cursor.window_zone_of(JUDGE, note), Some(WindowZone::Ahead));
        })
        .events(|crossings| {
            assert_eq!(
                summary(crossings),
                vec![
                    (Edge::Window(EARLY), CrossingKind::Tail, Direction::Backward),
                    (Edge::Window(EARLY), CrossingKind::Head, Direction::Backward),
                    (Edge::Window(JUDGE), CrossingKind::Tail, Direction::Backward),
                    (Edge::Window(JUDGE), CrossingKind::Head, Direction::Backward),
                    (Edge::Critical, CrossingKind::Tail, Direction::Backward),
                    (Edge::Critical, CrossingKind::Head, Direction::Backward),
                    (Edge::Primary, CrossingKind::Tail, Direction::Backward),
                    (Edge::Primary, CrossingKind::Head, Direction::Backward),
                ]
            );
        })
        .run();
}

#[test]
fn test_window_declared_mid_play_classifies_silently() {
    let (chart, note) = single_note_chart();
    let late = WindowId(0);

    TestCursorDriver::new(chart, CursorConfig::default())
        .to_ms(3000)
        .stay()
        .window("late", secs(-0.5))
        .view(move |cursor| {
            assert_eq!(cursor.window_zone_of(late, note), Some(WindowZone::Passed));
            assert_eq!(cursor.window(late).map(|window| window.edge()), Some(secs(2.5)));
        })
        .silent()
        .to_ms(1000)
        .events(move |crossings| {
            let window: Vec<_> = crossings
                .iter()
                .filter(|crossing| crossing.edge == Edge::Window(late))
                .map(|crossing| crossing.kind)
                .collect();
            assert_eq!(window, vec![CrossingKind::Tail, CrossingKind::Head]);
        })
        .run();
}

#[test]
fn test_duplicate_window_name_is_rejected() {
    let (chart, _) = single_note_chart();
    let mut cursor = PlaybackCursor::new(&chart, CursorConfig::default());
    assert_eq!(cursor.add_window("judge", Seconds::ZERO), Ok(JUDGE));
    assert_eq!(
        cursor.add_window("judge", secs(0.1)),
        Err(ConfigError::DuplicateWindow("judge".to_string()))
    );
    assert_eq!(cursor.window(JUDGE).map(|window| window.offset()), Some(Seconds::ZERO));
}

#[test]
fn test_windows_follow_late_edits() {
    let (chart, note) = single_note_chart();
    let inserted = EntityId(1);

    TestCursorDriver::new(chart, CursorConfig::default())
        .stay()
        .window("judge", Seconds::ZERO)
        .to_ms(3000)
        .stay()
        // 1.0 s, already passed by every edge but the secondary one
        .insert(LaneId(0), Tick::new(1, 2), Tick::ZERO, chip())
        .view(move |cursor| {
            assert_eq!(cursor.window_zone_of(JUDGE, inserted), Some(WindowZone::Passed));
        })
        .events(|crossings| {
            assert_eq!(
                summary(crossings),
                vec![
                    (Edge::Primary, CrossingKind::Head, Direction::Forward),
                    (Edge::Primary, CrossingKind::Tail, Direction::Forward),
                    (Edge::Critical, CrossingKind::Head, Direction::Forward),
                    (Edge::Critical, CrossingKind::Tail, Direction::Forward),
                    (Edge::Secondary, CrossingKind::Head, Direction::Forward),
                    (Edge::Secondary, CrossingKind::Tail, Direction::Forward),
                    (Edge::Window(JUDGE), CrossingKind::Head, Direction::Forward),
                    (Edge::Window(JUDGE), CrossingKind::Tail, Direction::Forward),
                ]
            );
        })
        .to_ms(0)
        .stay()
        .remove(note)
        .events(|crossings| {
            assert_eq!(crossings.len(), 8);
            assert_eq!(
                summary(crossings.get(6..).unwrap_or_default()),
                vec![
                    (Edge::Window(JUDGE), CrossingKind::Head, Direction::Forward),
                    (Edge::Window(JUDGE), CrossingKind::Tail, Direction::Forward),
                ]
            );
        })
        .run();
}

#[test]
fn test_forward_run_crosses_each_window_once() {
    let chart = dense_chart(4);
    let mut driver = TestCursorDriver::new(chart, CursorConfig::default());
    let _ = driver
        .stay()
        .window("judge", Seconds::ZERO)
        .window("lead", secs(0.35))
        .window("trail", secs(-0.2))
        .then();
    for millis in (-1000..8000).step_by(45) {
        let _ = driver.to_ms(millis).then();
    }
    driver.to_ms(10_000).run();

    let mut counts: HashMap<(EntityId, Edge, CrossingKind), usize> = HashMap::new();
    for crossing in driver.history() {
        *counts
            .entry((crossing.entity, crossing.edge, crossing.kind))
            .or_default() += 1;
    }
    for (id, _) in driver.chart().entities() {
        for window in [WindowId(0), WindowId(1), WindowId(2)] {
            for kind in [CrossingKind::Head, CrossingKind::Tail] {
                assert_eq!(counts.get(&(id, Edge::Window(window), kind)).copied(), Some(1));
            }
        }
    }
    assert_eq!(driver.history().len(), driver.chart().len() * 12);
}
