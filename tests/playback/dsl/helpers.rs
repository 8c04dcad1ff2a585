//! DSL helper functions
//!
//! Provides convenient factory functions for charts used across the playback tests.

use chart_playback::prelude::*;

/// Shorthand for an exact number of seconds
pub fn secs(value: f64) -> Seconds {
    Seconds::new(value).expect("finite seconds")
}

/// A plain button press
pub fn chip() -> EntityData {
    EntityData::Button(ButtonData::default())
}

/// One button lane with a single press at 2.0 s (tick 1 under 120 BPM 4/4)
pub fn single_note_chart() -> (Chart, EntityId) {
    let mut chart = Chart::new(
        [LaneKind::Button],
        TimeMap::new(120.0, 4, 4).expect("valid tempo"),
    );
    let id = chart
        .add_entity(LaneId(0), Tick::from_measures(1), Tick::ZERO, chip())
        .expect("valid entity");
    (chart, id)
}

/// The standard lane layout filled with presses on every lane every eighth of a measure, with a
/// hold on the first lane every second measure and a laser sweep on the laser lanes.
pub fn dense_chart(measures: i64) -> Chart {
    let mut chart = Chart::standard(TimeMap::new(180.0, 4, 4).expect("valid tempo"));
    for measure in 0..measures {
        for lane in 1..4 {
            for eighth in 0..8 {
                let position = Tick::from_measures(measure) + Tick::new(eighth, 8);
                chart
                    .add_entity(LaneId(lane), position, Tick::ZERO, chip())
                    .expect("valid entity");
            }
        }
        if measure % 2 == 0 {
            chart
                .add_entity(
                    LaneId(0),
                    Tick::from_measures(measure),
                    Tick::from_measures(1),
                    chip(),
                )
                .expect("valid entity");
        }
        for lane in [6, 7] {
            let value = (measure % 2) as f64;
            chart
                .add_entity(
                    LaneId(lane),
                    Tick::from_measures(measure),
                    Tick::from_measures(1),
                    EntityData::Laser(LaserSegment::new(value, 1.0 - value)),
                )
                .expect("valid entity");
        }
    }
    chart
}

/// Drops everything but the edge, the kind and the direction of each crossing
pub fn summary(crossings: &[Crossing]) -> Vec<(Edge, CrossingKind, Direction)> {
    crossings
        .iter()
        .map(|crossing| (crossing.edge, crossing.kind, crossing.direction))
        .collect()
}
