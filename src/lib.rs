//! The timing and playback core of a rhythm game chart.
//!
//! A chart is a set of lanes holding entities at exact rational positions, plus a tempo map
//! converting those positions into playback time. A playback cursor then walks the chart and
//! reports when entities enter and leave the visible window around the playback position.
//!
//! - `timing` module provides [`timing::Tick`], [`timing::Seconds`] and the [`timing::TimeMap`]
//!   converting between them.
//! - `chart` module provides the [`chart::Chart`] model: lanes, entities and chains of entities
//!   forming holds and laser sweeps.
//! - `playback` module provides the [`playback::PlaybackCursor`] and the
//!   [`playback::PlaybackSession`] letting listeners edit the chart during playback.
//!
//! In detail, our policies are:
//!
//! - Keep positions exact. Floating point appears only once a position is converted into time.
//! - Never infer chains. The importer links entities explicitly.
//! - Do not read or write any chart format. Importers build charts through the insertion APIs.
//! - Do not install a logger. Diagnostics go through the `log` facade.

pub mod chart;
pub mod playback;
pub mod prelude;
pub mod timing;
