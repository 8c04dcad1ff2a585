//! The playback cursor, sliding its window over a chart.

use std::cmp::Ordering;
use std::collections::HashMap;

use log::{debug, warn};

use crate::chart::{Chart, ChartError, EntityId, LaneId};
use crate::timing::Seconds;

use super::config::{ConfigError, CursorConfig};
use super::crossing::{CrossingSink, Direction};
use super::window::{NamedWindow, WindowId, WindowLane, WindowZone};
use super::zone::{Edges, Emitter, LaneZones, Tracked, Zone};

/// Tracks which entities of a chart are ahead of, inside or behind the visible window around a
/// playback position.
///
/// The cursor caches start and end times and lanes of the entities it tracks. After changing the
/// tempo map, or adding or removing entities without telling the cursor, call
/// [`PlaybackCursor::reset`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackCursor {
    config: CursorConfig,
    position: Seconds,
    edges: Edges,
    lanes: Vec<LaneZones>,
    windows: Vec<NamedWindow>,
    lane_of: HashMap<EntityId, LaneId>,
}

impl PlaybackCursor {
    /// Creates a cursor before the beginning of `chart`.
    #[must_use]
    pub fn new(chart: &Chart, config: CursorConfig) -> Self {
        let mut cursor = Self {
            config,
            position: Seconds::MIN,
            edges: Edges::BEFORE_START,
            lanes: Vec::new(),
            windows: Vec::new(),
            lane_of: HashMap::new(),
        };
        cursor.reset(chart);
        cursor
    }

    /// Moves the cursor back before the beginning of time, tracking every entity of `chart` in
    /// [`Zone::Ahead`]. Fires no crossings.
    pub fn reset(&mut self, chart: &Chart) {
        self.position = Seconds::MIN;
        self.edges = Edges::BEFORE_START;
        self.lane_of.clear();
        let tracked: Vec<Vec<Tracked>> = chart
            .lanes()
            .iter()
            .map(|lane| {
                lane.entities()
                    .iter()
                    .filter_map(|&id| track(chart, id))
                    .collect()
            })
            .collect();
        for (index, entities) in tracked.iter().enumerate() {
            self.lane_of
                .extend(entities.iter().map(|entity| (entity.id, LaneId(index))));
        }
        for window in &mut self.windows {
            let edge = self.position + window.offset();
            window.set_edge(edge);
            window.lanes = tracked
                .iter()
                .map(|entities| WindowLane::classify(entities, edge))
                .collect();
        }
        self.lanes = tracked.into_iter().map(LaneZones::all_ahead).collect();
    }

    /// Moves the cursor to `next`, emitting every crossing on the way to `sink`.
    ///
    /// The direction follows from `next` against the current position. Moving to the current
    /// position does nothing.
    pub fn advance<S: CrossingSink + ?Sized>(&mut self, next: Seconds, sink: &mut S) {
        let direction = match next.cmp(&self.position) {
            Ordering::Greater => Direction::Forward,
            Ordering::Less => Direction::Backward,
            Ordering::Equal => return,
        };
        if self.position != Seconds::MIN
            && (next - self.position).as_f64().abs() > self.config.look_ahead().as_f64()
        {
            debug!("seeking from {} to {next}", self.position);
        }
        let to = self.edges_at(next, direction);

        let Self {
            lanes,
            windows,
            edges,
            ..
        } = self;
        for (index, zones) in lanes.iter_mut().enumerate() {
            let mut out = Emitter {
                lane: LaneId(index),
                direction,
                sink: &mut *sink,
            };
            match direction {
                Direction::Forward => {
                    zones.sweep(edges, &to, &mut out);
                    sweep_windows(windows, index, next, &mut out);
                }
                Direction::Backward => {
                    sweep_windows(windows, index, next, &mut out);
                    zones.sweep(edges, &to, &mut out);
                }
            }
        }
        for window in windows.iter_mut() {
            window.set_edge(next + window.offset());
        }
        *edges = to;
        self.position = next;
    }

    /// Starts tracking an entity added to `chart` after the cursor was reset, emitting the
    /// crossings it would have emitted had it been there from the beginning.
    ///
    /// Adding an entity already tracked does nothing.
    ///
    /// # Errors
    ///
    /// - [`ChartError::UnknownEntity`] if `chart` has no such entity.
    /// - [`ChartError::LaneOutOfRange`] if the entity's lane is unknown to the cursor.
    pub fn add_object<S: CrossingSink + ?Sized>(
        &mut self,
        chart: &Chart,
        id: EntityId,
        sink: &mut S,
    ) -> Result<(), ChartError> {
        let entity = chart.entity(id).ok_or(ChartError::UnknownEntity(id))?;
        let tracked = track(chart, id).ok_or(ChartError::UnknownEntity(id))?;
        let lane = entity.lane();
        if self.lane_of.contains_key(&id) {
            warn!("entity {id} is already tracked");
            return Ok(());
        }
        let zones = self
            .lanes
            .get_mut(lane.0)
            .ok_or(ChartError::LaneOutOfRange(lane))?;

        let mut out = Emitter {
            lane,
            direction: Direction::Forward,
            sink,
        };
        let mut single = LaneZones::all_ahead(vec![tracked]);
        single.sweep(&Edges::BEFORE_START, &self.edges, &mut out);
        zones.merge(single);
        for (index, window) in self.windows.iter_mut().enumerate() {
            let mut single = WindowLane::classify([&tracked], Seconds::MIN);
            single.sweep(WindowId(index), window.edge(), &mut out);
            if let Some(lane) = window.lanes.get_mut(lane.0) {
                lane.merge(single);
            }
        }
        self.lane_of.insert(id, lane);
        Ok(())
    }

    /// Stops tracking an entity, first emitting every crossing it still has pending, as if the
    /// cursor ran past the end of time.
    ///
    /// Returns `false` if the entity is not tracked.
    pub fn remove_object<S: CrossingSink + ?Sized>(&mut self, id: EntityId, sink: &mut S) -> bool {
        let Some(lane) = self.lane_of.remove(&id) else {
            warn!("entity {id} is not tracked, ignoring its removal");
            return false;
        };
        let mut out = Emitter {
            lane,
            direction: Direction::Forward,
            sink,
        };
        if let Some(mut single) = self
            .lanes
            .get_mut(lane.0)
            .and_then(|zones| zones.split_off(id))
        {
            single.sweep(&self.edges, &Edges::AFTER_END, &mut out);
        }
        for (index, window) in self.windows.iter_mut().enumerate() {
            if let Some(mut single) = window
                .lanes
                .get_mut(lane.0)
                .and_then(|zones| zones.split_off(id))
            {
                single.sweep(WindowId(index), Seconds::MAX, &mut out);
            }
        }
        true
    }

    /// Declares a named window with its edge at `position + offset`.
    ///
    /// Entities are classified against the edge at the current position without firing crossings.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::DuplicateWindow`] if the name is taken.
    pub fn add_window(
        &mut self,
        name: impl Into<String>,
        offset: Seconds,
    ) -> Result<WindowId, ConfigError> {
        let name = name.into();
        if self.window_id(&name).is_some() {
            return Err(ConfigError::DuplicateWindow(name));
        }
        let edge = self.position + offset;
        let lanes = self
            .lanes
            .iter()
            .map(|zones| WindowLane::classify(zones.iter(), edge))
            .collect();
        let id = WindowId(self.windows.len());
        debug!("window {name:?} added as {id} at offset {offset}");
        self.windows
            .push(NamedWindow::new(name, offset, edge, lanes));
        Ok(id)
    }

    /// Looks up a named window.
    #[must_use]
    pub fn window_id(&self, name: &str) -> Option<WindowId> {
        self.windows
            .iter()
            .position(|window| window.name() == name)
            .map(WindowId)
    }

    /// Gets a named window.
    #[must_use]
    pub fn window(&self, id: WindowId) -> Option<&NamedWindow> {
        self.windows.get(id.0)
    }

    /// The configuration.
    #[must_use]
    pub const fn config(&self) -> &CursorConfig {
        &self.config
    }

    /// Changes the look-ahead, effective from the next move.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NegativeLookAhead`] if `look_ahead` is negative.
    pub fn set_look_ahead(&mut self, look_ahead: Seconds) -> Result<(), ConfigError> {
        self.config = self.config.with_look_ahead(look_ahead)?;
        Ok(())
    }

    /// Changes the look-behind, effective from the next move.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NegativeLookBehind`] if `look_behind` is negative.
    pub fn set_look_behind(&mut self, look_behind: Seconds) -> Result<(), ConfigError> {
        self.config = self.config.with_look_behind(look_behind)?;
        Ok(())
    }

    /// The playback position, [`Seconds::MIN`] after a reset.
    #[must_use]
    pub const fn position(&self) -> Seconds {
        self.position
    }

    /// Whether `id` is tracked.
    #[must_use]
    pub fn is_tracking(&self, id: EntityId) -> bool {
        self.lane_of.contains_key(&id)
    }

    /// Number of tracked entities.
    #[must_use]
    pub fn tracked_len(&self) -> usize {
        self.lane_of.len()
    }

    /// The zone holding `id`.
    #[must_use]
    pub fn zone_of(&self, id: EntityId) -> Option<Zone> {
        let lane = self.lane_of.get(&id)?;
        self.lanes.get(lane.0)?.zone_of(id)
    }

    /// The entities of `lane` in `zone`, sorted by start time, or by end time for
    /// [`Zone::Behind`].
    pub fn lane_zone(&self, lane: LaneId, zone: Zone) -> impl Iterator<Item = EntityId> + '_ {
        self.lanes
            .get(lane.0)
            .into_iter()
            .flat_map(move |zones| zones.queue(zone).iter().map(|entity| entity.id))
    }

    /// The zone holding `id` relative to a named window.
    #[must_use]
    pub fn window_zone_of(&self, window: WindowId, id: EntityId) -> Option<WindowZone> {
        let lane = self.lane_of.get(&id)?;
        self.windows.get(window.0)?.lane(lane.0)?.zone_of(id)
    }

    /// Edges for a move to `next`. An edge never moves against the direction of the move, so a
    /// changed look-ahead or look-behind only ever delays crossings.
    fn edges_at(&self, next: Seconds, direction: Direction) -> Edges {
        let primary = next + self.config.look_ahead();
        let secondary = next - self.config.look_behind();
        match direction {
            Direction::Forward => Edges {
                primary: primary.max(self.edges.primary),
                critical: next,
                secondary: secondary.max(self.edges.secondary),
            },
            Direction::Backward => Edges {
                primary: primary.min(self.edges.primary),
                critical: next,
                secondary: secondary.min(self.edges.secondary),
            },
        }
    }
}

/// Sweeps the named windows over one lane, in declaration order when moving forward.
fn sweep_windows<S: CrossingSink + ?Sized>(
    windows: &mut [NamedWindow],
    lane: usize,
    next: Seconds,
    out: &mut Emitter<'_, S>,
) {
    let count = windows.len();
    for step in 0..count {
        let index = if out.is_forward() {
            step
        } else {
            count - 1 - step
        };
        let Some(window) = windows.get_mut(index) else {
            continue;
        };
        let edge = next + window.offset();
        if let Some(zones) = window.lanes.get_mut(lane) {
            zones.sweep(WindowId(index), edge, out);
        }
    }
}

fn track(chart: &Chart, id: EntityId) -> Option<Tracked> {
    let (start, end) = chart.entity_times(id)?;
    Some(Tracked { id, start, end })
}
