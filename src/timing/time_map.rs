//! This module introduces struct [`TimeMap`], which manages the tempo and meter changes of a chart.

use super::{Result, Seconds, Tick, TimingError};

/// A tempo/meter declaration anchored to a chart position.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlPoint {
    position: Tick,
    bpm: f64,
    beat_count: u32,
    beat_kind: u32,
    speed_multiplier: f64,
    start_time: Seconds,
}

impl ControlPoint {
    /// The position where this point takes effect.
    #[must_use]
    pub const fn position(&self) -> Tick {
        self.position
    }

    /// Tempo in quarter notes per minute. Always positive.
    #[must_use]
    pub const fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Beats per measure, the numerator of the time signature.
    #[must_use]
    pub const fn beat_count(&self) -> u32 {
        self.beat_count
    }

    /// Note value of one beat, the denominator of the time signature.
    #[must_use]
    pub const fn beat_kind(&self) -> u32 {
        self.beat_kind
    }

    /// Scroll speed multiplier for the visual lane speed.
    #[must_use]
    pub const fn speed_multiplier(&self) -> f64 {
        self.speed_multiplier
    }

    /// Time at which this point's segment begins.
    #[must_use]
    pub const fn start_time(&self) -> Seconds {
        self.start_time
    }

    /// Length of one measure in seconds under this point.
    ///
    /// Formula: `beat_count * (60 / bpm) * (4 / beat_kind)`.
    #[must_use]
    pub fn measure_seconds(&self) -> f64 {
        240.0 * f64::from(self.beat_count) / (self.bpm * f64::from(self.beat_kind))
    }

    /// Length of one beat in seconds under this point.
    #[must_use]
    pub fn beat_seconds(&self) -> f64 {
        self.measure_seconds() / f64::from(self.beat_count)
    }

    fn time_at(&self, position: Tick) -> Seconds {
        let elapsed = position.measures_since(self.position) * self.measure_seconds();
        self.start_time + Seconds::saturating_new(elapsed)
    }
}

fn check_bpm(bpm: f64) -> Result<()> {
    if bpm.is_finite() && bpm > 0.0 {
        Ok(())
    } else {
        Err(TimingError::NonPositiveBpm(bpm))
    }
}

const fn check_time_signature(beat_count: u32, beat_kind: u32) -> Result<()> {
    if beat_count == 0 || beat_kind == 0 {
        Err(TimingError::InvalidTimeSignature {
            beat_count,
            beat_kind,
        })
    } else {
        Ok(())
    }
}

/// Ordered tempo/meter control points of a chart.
///
/// The root point sits at tick 0 and always exists, so every lookup succeeds. Later points are kept
/// in strictly increasing position order with their segment start times cached, so converting a
/// [`Tick`] into [`Seconds`] costs one binary search.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeMap {
    root: ControlPoint,
    changes: Vec<ControlPoint>,
}

impl TimeMap {
    /// Creates a map with only the root point.
    ///
    /// # Errors
    ///
    /// Returns [`TimingError`] if `bpm` is not positive or the time signature contains zero.
    pub fn new(bpm: f64, beat_count: u32, beat_kind: u32) -> Result<Self> {
        check_bpm(bpm)?;
        check_time_signature(beat_count, beat_kind)?;
        Ok(Self {
            root: ControlPoint {
                position: Tick::ZERO,
                bpm,
                beat_count,
                beat_kind,
                speed_multiplier: 1.0,
                start_time: Seconds::ZERO,
            },
            changes: Vec::new(),
        })
    }

    /// Iterates all control points in position order, the root first.
    pub fn control_points(&self) -> impl Iterator<Item = &ControlPoint> {
        std::iter::once(&self.root).chain(&self.changes)
    }

    /// Number of control points, including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len() + 1
    }

    /// Always `false`, the root point cannot be removed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Gets the root point at tick 0.
    #[must_use]
    pub const fn root(&self) -> &ControlPoint {
        &self.root
    }

    /// Gets the most recent control point at or before `position`.
    ///
    /// Positions before the root resolve to the root.
    #[must_use]
    pub fn most_recent_control_point(&self, position: Tick) -> &ControlPoint {
        let passed = self.changes.partition_point(|point| point.position <= position);
        passed
            .checked_sub(1)
            .and_then(|index| self.changes.get(index))
            .unwrap_or(&self.root)
    }

    /// Gets the control point in effect at playback time `time`.
    #[must_use]
    pub fn control_point_at_time(&self, time: Seconds) -> &ControlPoint {
        let passed = self.changes.partition_point(|point| point.start_time <= time);
        passed
            .checked_sub(1)
            .and_then(|index| self.changes.get(index))
            .unwrap_or(&self.root)
    }

    /// Gets or creates the control point at `position`.
    ///
    /// With `exact` unset, this is [`Self::most_recent_control_point`] and never inserts. With
    /// `exact` set, the point at exactly `position` is returned, created as a copy of the most
    /// recent point's tempo and meter when absent.
    ///
    /// # Errors
    ///
    /// Returns [`TimingError::BeforeRoot`] if a point would be created before tick 0.
    pub fn get_or_create(&mut self, position: Tick, exact: bool) -> Result<&ControlPoint> {
        if !exact {
            return Ok(self.most_recent_control_point(position));
        }
        let slot = self.slot_at(position)?;
        Ok(self.point(slot))
    }

    /// Sets the tempo from `position` on.
    ///
    /// # Errors
    ///
    /// Returns [`TimingError::NonPositiveBpm`] if `bpm` is not positive and finite, or
    /// [`TimingError::BeforeRoot`] for a negative position.
    pub fn set_bpm(&mut self, position: Tick, bpm: f64) -> Result<&ControlPoint> {
        check_bpm(bpm)?;
        let slot = self.slot_at(position)?;
        self.point_mut(slot).bpm = bpm;
        self.recompute_after(slot);
        log::debug!("tempo set to {bpm} at {position}");
        Ok(self.point(slot))
    }

    /// Sets the time signature from `position` on.
    ///
    /// # Errors
    ///
    /// Returns [`TimingError::InvalidTimeSignature`] if either part is zero, or
    /// [`TimingError::BeforeRoot`] for a negative position.
    pub fn set_time_signature(
        &mut self,
        position: Tick,
        beat_count: u32,
        beat_kind: u32,
    ) -> Result<&ControlPoint> {
        check_time_signature(beat_count, beat_kind)?;
        let slot = self.slot_at(position)?;
        let point = self.point_mut(slot);
        point.beat_count = beat_count;
        point.beat_kind = beat_kind;
        self.recompute_after(slot);
        log::debug!("time signature set to {beat_count}/{beat_kind} at {position}");
        Ok(self.point(slot))
    }

    /// Sets the scroll speed multiplier from `position` on. Does not affect timing.
    ///
    /// # Errors
    ///
    /// Returns [`TimingError::NonFiniteSpeed`] if `multiplier` is not finite, or
    /// [`TimingError::BeforeRoot`] for a negative position.
    pub fn set_speed_multiplier(&mut self, position: Tick, multiplier: f64) -> Result<&ControlPoint> {
        if !multiplier.is_finite() {
            return Err(TimingError::NonFiniteSpeed(multiplier));
        }
        let slot = self.slot_at(position)?;
        self.point_mut(slot).speed_multiplier = multiplier;
        Ok(self.point(slot))
    }

    /// Removes the control point at exactly `position`. The root point is never removed.
    pub fn remove_control_point(&mut self, position: Tick) -> Option<ControlPoint> {
        let index = self
            .changes
            .binary_search_by(|point| point.position.cmp(&position))
            .ok()?;
        let removed = self.changes.remove(index);
        self.recompute_after(index.checked_sub(1).map_or(Slot::Root, Slot::Change));
        Some(removed)
    }

    /// Converts a chart position into playback time.
    ///
    /// Positions before the root are extrapolated with the root tempo.
    #[must_use]
    pub fn to_time(&self, position: Tick) -> Seconds {
        self.most_recent_control_point(position).time_at(position)
    }

    /// Converts playback time back into floating measures.
    #[must_use]
    pub fn to_measures(&self, time: Seconds) -> f64 {
        let point = self.control_point_at_time(time);
        point.position.as_f64() + (time - point.start_time).as_f64() / point.measure_seconds()
    }

    /// Gets the scroll speed multiplier in effect at `position`.
    #[must_use]
    pub fn speed_multiplier_at(&self, position: Tick) -> f64 {
        self.most_recent_control_point(position).speed_multiplier
    }

    fn slot_at(&mut self, position: Tick) -> Result<Slot> {
        if position.is_negative() {
            return Err(TimingError::BeforeRoot(position));
        }
        if position == Tick::ZERO {
            return Ok(Slot::Root);
        }
        match self
            .changes
            .binary_search_by(|point| point.position.cmp(&position))
        {
            Ok(index) => Ok(Slot::Change(index)),
            Err(index) => {
                let previous = self.most_recent_control_point(position);
                let created = ControlPoint {
                    position,
                    start_time: previous.time_at(position),
                    ..previous.clone()
                };
                self.changes.insert(index, created);
                log::debug!("control point created at {position}");
                Ok(Slot::Change(index))
            }
        }
    }

    fn point(&self, slot: Slot) -> &ControlPoint {
        match slot {
            Slot::Root => &self.root,
            Slot::Change(index) => self.changes.get(index).unwrap_or(&self.root),
        }
    }

    fn point_mut(&mut self, slot: Slot) -> &mut ControlPoint {
        match slot {
            Slot::Root => &mut self.root,
            Slot::Change(index) => match self.changes.get_mut(index) {
                Some(point) => point,
                None => &mut self.root,
            },
        }
    }

    /// Refreshes cached start times of every point after `slot`.
    fn recompute_after(&mut self, slot: Slot) {
        let first = match slot {
            Slot::Root => 0,
            Slot::Change(index) => index + 1,
        };
        for index in first..self.changes.len() {
            let start_time = {
                let previous = index
                    .checked_sub(1)
                    .and_then(|prev| self.changes.get(prev))
                    .unwrap_or(&self.root);
                self.changes
                    .get(index)
                    .map(|point| previous.time_at(point.position))
            };
            if let (Some(start_time), Some(point)) = (start_time, self.changes.get_mut(index)) {
                point.start_time = start_time;
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Root,
    Change(usize),
}
