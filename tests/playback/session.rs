//! Sessions letting listeners edit the chart they are listening to.

use pretty_assertions::assert_eq;

use chart_playback::prelude::*;

use super::dsl::{chip, secs};

fn four_lanes() -> (PlaybackSession, EntityId) {
    let mut chart = Chart::new(
        [LaneKind::Button; 4],
        TimeMap::new(120.0, 4, 4).expect("valid tempo"),
    );
    let note = chart
        .add_entity(LaneId(0), Tick::from_measures(1), Tick::ZERO, chip())
        .expect("valid entity");
    (PlaybackSession::new(chart, CursorConfig::default()), note)
}

#[test]
fn test_spawned_entities_cascade_until_the_queue_is_empty() {
    let (mut session, _) = four_lanes();
    let mut log = Vec::new();
    let mut listener = |crossing: &Crossing, chart: &Chart, deferred: &mut Deferred| {
        log.push((crossing.lane, crossing.edge, crossing.kind));
        if crossing.edge == Edge::Critical && crossing.is_head() && crossing.lane.0 < 3 {
            let position = chart
                .entity(crossing.entity)
                .expect("crossed entity exists")
                .position();
            deferred.insert(LaneId(crossing.lane.0 + 1), position, Tick::ZERO, chip());
        }
    };
    session
        .advance(secs(3.0), &mut listener)
        .expect("every spawn is valid");

    assert_eq!(session.chart().len(), 4);
    assert_eq!(session.cursor().tracked_len(), 4);
    assert_eq!(log.len(), 24);
    // each lane reports only after the previous one completed
    let lanes: Vec<_> = log.iter().map(|(lane, _, _)| lane.0).collect();
    assert!(lanes.windows(2).all(|pair| pair.first() <= pair.get(1)));
    for lane in 0..4 {
        let ids: Vec<_> = session
            .cursor()
            .lane_zone(LaneId(lane), Zone::Behind)
            .collect();
        assert_eq!(ids.len(), 1, "lane {lane}");
    }
}

#[test]
fn test_judged_notes_vanish_after_the_sweep() {
    let (mut session, note) = four_lanes();
    let second = session
        .insert_entity(
            LaneId(1),
            Tick::new(5, 4),
            Tick::ZERO,
            chip(),
            &mut |_: &Crossing, _: &Chart, _: &mut Deferred| {},
        )
        .expect("valid entity");

    let mut judged = Vec::new();
    let mut listener = |crossing: &Crossing, _: &Chart, deferred: &mut Deferred| {
        if crossing.edge == Edge::Critical && crossing.is_head() {
            judged.push(crossing.entity);
            deferred.remove(crossing.entity);
        }
    };
    session
        .advance(secs(2.1), &mut listener)
        .expect("removals are valid");
    assert_eq!(session.chart().entity(note), None);
    assert!(session.chart().entity(second).is_some());

    session
        .advance(secs(2.6), &mut listener)
        .expect("removals are valid");
    assert_eq!(judged, vec![note, second]);
    assert!(session.chart().is_empty());
    assert_eq!(session.cursor().tracked_len(), 0);
}

#[test]
fn test_first_failure_is_returned_and_the_rest_applied() {
    let (mut session, note) = four_lanes();
    let mut listener = |crossing: &Crossing, _: &Chart, deferred: &mut Deferred| {
        if crossing.edge == Edge::Primary && crossing.is_head() {
            // collides with the note itself
            deferred.insert(LaneId(0), Tick::from_measures(1), Tick::ZERO, chip());
            deferred.insert(LaneId(9), Tick::from_measures(1), Tick::ZERO, chip());
            deferred.insert(LaneId(2), Tick::from_measures(1), Tick::ZERO, chip());
            assert_eq!(deferred.len(), 3);
        }
    };
    let result = session.advance(secs(1.5), &mut listener);
    assert_eq!(
        result,
        Err(ChartError::Overlap {
            lane: LaneId(0),
            position: Tick::from_measures(1),
            existing: note,
        })
    );
    assert_eq!(session.chart().len(), 2);
    assert_eq!(
        session
            .cursor()
            .lane_zone(LaneId(2), Zone::Primary)
            .collect::<Vec<_>>(),
        vec![EntityId(1)]
    );
}

#[test]
fn test_direct_edits_reset_the_cursor() {
    let (mut session, note) = four_lanes();
    let mut ignore = |_: &Crossing, _: &Chart, _: &mut Deferred| {};
    session.advance(secs(3.0), &mut ignore).expect("nothing queued");
    assert_eq!(session.cursor().zone_of(note), Some(Zone::Behind));

    let tail = session
        .edit_chart(|chart| {
            let tail = chart.add_entity(LaneId(0), Tick::new(3, 2), Tick::ZERO, chip())?;
            chart.link(note, tail)?;
            Ok::<_, ChartError>(tail)
        })
        .expect("valid chain");
    assert_eq!(session.cursor().position(), Seconds::MIN);
    assert_eq!(session.cursor().zone_of(tail), Some(Zone::Ahead));
    assert_eq!(
        session
            .chart()
            .chain(note)
            .map(|(id, _)| id)
            .collect::<Vec<_>>(),
        vec![note, tail]
    );

    assert_eq!(
        session.remove_entity(tail, &mut ignore),
        Err(ChartError::StillLinked(tail))
    );
    session
        .cursor_mut()
        .add_window("judge", Seconds::ZERO)
        .expect("unique name");
    let mut crossings = Vec::new();
    let mut collect = |crossing: &Crossing, _: &Chart, _: &mut Deferred| crossings.push(*crossing);
    session.advance(secs(10.0), &mut collect).expect("nothing queued");
    assert_eq!(crossings.len(), 16);

    session.reset();
    assert_eq!(session.cursor().zone_of(note), Some(Zone::Ahead));
    let chart = session.into_chart();
    assert_eq!(chart.verify_chains(), Ok(()));
}
