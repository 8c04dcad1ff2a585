//! Playback: a cursor sliding a visible window over a chart.
//!
//! The window around the playback position `p` is bounded by three edges:
//!
//! ```text
//! primary   = p + look_ahead
//! critical  = p
//! secondary = p - look_behind
//! ```
//!
//! Each lane's entities are partitioned into [`Zone`]s by these edges. Whenever the start or the
//! end of an entity crosses an edge, the cursor emits a [`Crossing`]. Moving forward, the edges are
//! swept primary first, so a single large jump still emits every crossing in playback order.
//! Moving backward is the exact mirror.
//!
//! ```
//! use chart_playback::prelude::*;
//!
//! let mut chart = Chart::standard(TimeMap::new(120.0, 4, 4)?);
//! let note = chart.add_entity(
//!     LaneId(0),
//!     Tick::from_measures(1),
//!     Tick::ZERO,
//!     EntityData::Button(ButtonData::default()),
//! )?;
//!
//! let mut cursor = PlaybackCursor::new(&chart, CursorConfig::default());
//! let mut crossings = Vec::new();
//! cursor.advance(Seconds::from_millis(1500), &mut crossings);
//! assert_eq!(cursor.zone_of(note), Some(Zone::Primary));
//! assert_eq!(crossings.len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod crossing;
pub mod cursor;
pub mod session;
pub mod window;
pub mod zone;

pub use self::{
    config::{ConfigError, CursorConfig},
    crossing::{Crossing, CrossingKind, CrossingSink, Direction, Edge, FnSink, IgnoreCrossings},
    cursor::PlaybackCursor,
    session::{Deferred, Mutation, PlaybackSession, SessionListener},
    window::{WindowId, WindowZone},
    zone::Zone,
};
