//! Prelude module for the crate.
//!
//! This module re-exports the commonly used types of every module.
//! You can use `use chart_playback::prelude::*;` to import them at once.

// Re-export timing types
pub use crate::timing::{ControlPoint, Seconds, Tick, TimeMap, TimingError};

// Re-export chart types
pub use crate::chart::{
    ButtonData, CameraParam, Chain, Chart, ChartError, ChartEvent, CurveShape, EffectDefaults,
    EffectKind, EffectParams, Entity, EntityData, EntityId, FilterKind, Lane, LaneId, LaneKind,
    LaserSegment, OverlapPolicy,
};

// Re-export playback types
pub use crate::playback::{
    ConfigError, Crossing, CrossingKind, CrossingSink, CursorConfig, Deferred, Direction, Edge,
    FnSink, IgnoreCrossings, Mutation, PlaybackCursor, PlaybackSession, SessionListener, WindowId,
    WindowZone, Zone,
};
