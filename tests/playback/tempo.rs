//! The cursor over charts with tempo and meter changes.

use pretty_assertions::assert_eq;

use chart_playback::prelude::*;

use super::assert_time_close;
use super::dsl::chip;

fn accelerating_chart() -> Chart {
    let mut time_map = TimeMap::new(120.0, 4, 4).expect("valid tempo");
    time_map
        .set_bpm(Tick::from_measures(1), 240.0)
        .expect("valid tempo");
    time_map
        .set_time_signature(Tick::from_measures(3), 3, 4)
        .expect("valid meter");
    let mut chart = Chart::new([LaneKind::Button], time_map);
    for measure in 1..=4 {
        chart
            .add_entity(LaneId(0), Tick::from_measures(measure), Tick::ZERO, chip())
            .expect("valid entity");
    }
    chart
}

#[test]
fn test_known_conversions() {
    let time_map = TimeMap::new(120.0, 4, 4).expect("valid tempo");
    assert_time_close(2.0, time_map.to_time(Tick::from_measures(1)).as_f64(), "one measure");
    assert_time_close(0.5, time_map.to_time(Tick::new(1, 4)).as_f64(), "one beat");

    let chart = accelerating_chart();
    let time_map = chart.time_map();
    assert_eq!(time_map.len(), 3);
    assert_time_close(3.0, time_map.to_time(Tick::from_measures(2)).as_f64(), "after the change");
    // 3/4 at 240 BPM
    assert_time_close(4.75, time_map.to_time(Tick::from_measures(4)).as_f64(), "after the meter");
    assert_time_close(
        2.5,
        time_map.to_measures(Seconds::from_millis(3500)),
        "back into measures",
    );
}

#[test]
fn test_time_never_decreases() {
    let chart = accelerating_chart();
    let time_map = chart.time_map();
    let mut previous = Seconds::MIN;
    for sixteenth in 0..=96 {
        let time = time_map.to_time(Tick::new(sixteenth, 16));
        assert!(time >= previous, "{sixteenth}/16 went back to {time}");
        previous = time;
    }
}

#[test]
fn test_entities_are_reached_right_after_their_time() {
    let chart = accelerating_chart();
    let mut cursor = PlaybackCursor::new(&chart, CursorConfig::default());
    let mut hits = Vec::new();
    for millis in (0..6000).step_by(10) {
        let mut sink = FnSink(|crossing: Crossing| {
            if crossing.edge == Edge::Critical && crossing.is_head() {
                hits.push((crossing.entity, millis));
            }
        });
        cursor.advance(Seconds::from_millis(millis), &mut sink);
    }
    // a frame landing exactly on an entity leaves it for the next frame
    assert_eq!(
        hits,
        vec![
            (EntityId(0), 2010),
            (EntityId(1), 3010),
            (EntityId(2), 4010),
            (EntityId(3), 4760),
        ]
    );
}

#[test]
fn test_chart_extent_follows_the_tempo() {
    let chart = accelerating_chart();
    assert_eq!(chart.time_start(), Some(Seconds::from_millis(2000)));
    assert_eq!(chart.time_end(), Some(Seconds::from_millis(4750)));

    let empty = Chart::new([LaneKind::Button], TimeMap::new(120.0, 4, 4).expect("valid tempo"));
    assert_eq!(empty.time_start(), None);
    assert_eq!(empty.time_end(), None);
}
