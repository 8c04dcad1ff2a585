//! Entities added or removed while the cursor is playing.

use std::collections::HashMap;

use pretty_assertions::assert_eq;

use chart_playback::prelude::*;

use super::dsl::{TestCursorDriver, chip, dense_chart, single_note_chart, summary};

fn hold_chart() -> (Chart, EntityId) {
    let mut chart = Chart::new(
        [LaneKind::Button, LaneKind::Button],
        TimeMap::new(120.0, 4, 4).expect("valid tempo"),
    );
    // 2.0 s to 3.0 s
    let hold = chart
        .add_entity(LaneId(0), Tick::from_measures(1), Tick::new(1, 2), chip())
        .expect("valid entity");
    (chart, hold)
}

#[test]
fn test_removal_flushes_pending_crossings() {
    let (chart, hold) = hold_chart();

    TestCursorDriver::new(chart, CursorConfig::default())
        .to_ms(2600)
        .view(move |cursor| assert_eq!(cursor.zone_of(hold), Some(Zone::Secondary)))
        .stay()
        .remove(hold)
        .view(move |cursor| {
            assert!(!cursor.is_tracking(hold));
            assert_eq!(cursor.zone_of(hold), None);
            assert_eq!(cursor.tracked_len(), 0);
        })
        .events(|crossings| {
            assert_eq!(
                summary(crossings),
                vec![
                    (Edge::Critical, CrossingKind::Tail, Direction::Forward),
                    (Edge::Secondary, CrossingKind::Tail, Direction::Forward),
                ]
            );
        })
        .to_ms(0)
        .silent()
        .to_ms(10_000)
        .silent()
        .run();
}

#[test]
fn test_removal_ahead_and_behind() {
    let (chart, note) = single_note_chart();
    let mut driver = TestCursorDriver::new(chart, CursorConfig::default());
    driver
        .stay()
        .remove(note)
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
                ]
            );
        })
        .run();
    assert_eq!(driver.chart().entity(note), None);

    let (chart, note) = single_note_chart();
    TestCursorDriver::new(chart, CursorConfig::default())
        .to_ms(5000)
        .stay()
        .remove(note)
        .silent()
        .run();
}

#[test]
fn test_removing_an_untracked_entity_is_a_no_op() {
    let (chart, note) = single_note_chart();
    let mut cursor = PlaybackCursor::new(&chart, CursorConfig::default());
    let mut crossings = Vec::new();
    assert!(!cursor.remove_object(EntityId(99), &mut crossings));
    assert!(cursor.remove_object(note, &mut crossings));
    crossings.clear();
    assert!(!cursor.remove_object(note, &mut crossings));
    assert_eq!(crossings, vec![]);
}

#[test]
fn test_insertions_during_playback_stay_balanced() {
    let chart = dense_chart(4);
    let existing = chart.len();
    let mut driver = TestCursorDriver::new(chart, CursorConfig::default());
    let _ = driver
        .to_ms(3000)
        .stay()
        // behind, straddling the playback position, and ahead, on an empty lane
        .insert(LaneId(4), Tick::new(1, 4), Tick::ZERO, chip())
        .insert(LaneId(4), Tick::new(3, 2), Tick::new(3, 4), chip())
        .insert(LaneId(4), Tick::new(5, 2), Tick::ZERO, chip())
        .insert(LaneId(5), Tick::from_measures(3), Tick::from_measures(1), chip())
        .then();
    for millis in (3000..9000).step_by(250) {
        let _ = driver.to_ms(millis).then();
    }
    driver.to_ms(20_000).run();

    let mut counts: HashMap<EntityId, usize> = HashMap::new();
    for crossing in driver.history() {
        assert_eq!(crossing.direction, Direction::Forward);
        *counts.entry(crossing.entity).or_default() += 1;
    }
    assert_eq!(driver.chart().len(), existing + 4);
    for (id, _) in driver.chart().entities() {
        assert_eq!(counts.get(&id).copied(), Some(6), "{id}");
    }
}

#[test]
fn test_inserted_entity_rewinds_like_the_others() {
    let (chart, note) = single_note_chart();
    let mut driver = TestCursorDriver::new(chart, CursorConfig::default());
    let inserted = EntityId(1);
    driver
        .to_ms(4000)
        .stay()
        // 3.0 s, behind the 3.5 s secondary edge
        .insert(LaneId(0), Tick::new(3, 2), Tick::ZERO, chip())
        .view(move |cursor| {
            assert_eq!(cursor.zone_of(inserted), Some(Zone::Behind));
            assert_eq!(
                cursor.lane_zone(LaneId(0), Zone::Behind).collect::<Vec<_>>(),
                vec![note, inserted]
            );
        })
        .to_ms(0)
        .view(move |cursor| {
            assert_eq!(cursor.zone_of(note), Some(Zone::Ahead));
            assert_eq!(cursor.zone_of(inserted), Some(Zone::Ahead));
            assert_eq!(
                cursor.lane_zone(LaneId(0), Zone::Ahead).collect::<Vec<_>>(),
                vec![note, inserted]
            );
        })
        .events(move |crossings| {
            assert_eq!(crossings.len(), 12);
            // the later entity is revealed first when rewinding
            assert_eq!(crossings.first().map(|crossing| crossing.entity), Some(inserted));
            assert!(
                crossings
                    .iter()
                    .all(|crossing| crossing.direction == Direction::Backward)
            );
        })
        .run();
}

#[test]
fn test_reset_picks_up_tempo_changes() {
    let (mut chart, note) = single_note_chart();
    let mut cursor = PlaybackCursor::new(&chart, CursorConfig::default());
    cursor.advance(Seconds::from_millis(1500), &mut IgnoreCrossings);
    assert_eq!(cursor.zone_of(note), Some(Zone::Primary));

    // twice as fast: the note moves to 1.0 s
    chart
        .time_map_mut()
        .set_bpm(Tick::ZERO, 240.0)
        .expect("valid tempo");
    cursor.reset(&chart);
    assert_eq!(cursor.zone_of(note), Some(Zone::Ahead));

    let mut crossings = Vec::new();
    cursor.advance(Seconds::from_millis(1600), &mut crossings);
    assert_eq!(cursor.zone_of(note), Some(Zone::Behind));
    assert_eq!(crossings.len(), 6);
}
