//! The chart model: a fixed set of lanes holding positioned entities, and one [`TimeMap`].
//!
//! Entities live in an arena owned by [`Chart`] and are addressed by [`EntityId`]. Ids are never
//! reused, so a stale id or a dangling chain link is detected instead of resolving to some other
//! entity.
//!
//! Chains (holds, laser sweeps) are built explicitly with [`Chart::link`]; the chart never infers
//! them. An entity must be unlinked before it can be removed.

pub mod chain;
pub mod effect;
pub mod entity;
pub mod lane;

use thiserror::Error;

use crate::timing::{Seconds, Tick, TimeMap};

pub use self::{
    chain::Chain,
    effect::{EffectDefaults, EffectKind, EffectParams},
    entity::{
        ButtonData, CameraParam, ChartEvent, CurveShape, Entity, EntityData, EntityId,
        FilterKind, LaneId, LaserSegment,
    },
    lane::{Lane, LaneKind},
};

/// An error occurred when modifying a [`Chart`].
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ChartError {
    /// The lane does not exist.
    #[error("{0} is out of range")]
    LaneOutOfRange(LaneId),
    /// The payload does not fit the lane.
    #[error("{lane} holds {expected:?} entities, got {found:?}")]
    KindMismatch {
        /// The lane inserted into.
        lane: LaneId,
        /// The kind of the lane.
        expected: LaneKind,
        /// The kind of the payload.
        found: LaneKind,
    },
    /// The duration was negative.
    #[error("duration must not be negative, got {0}")]
    NegativeDuration(Tick),
    /// The end of the entity does not fit in a tick.
    #[error("entity at {position} lasting {duration} ends out of range")]
    EndOverflow {
        /// Start of the rejected entity.
        position: Tick,
        /// Length of the rejected entity.
        duration: Tick,
    },
    /// The entity would overlap an existing one.
    #[error("entity at {position} on {lane} overlaps {existing}")]
    Overlap {
        /// The lane inserted into.
        lane: LaneId,
        /// Start of the rejected entity.
        position: Tick,
        /// The entity overlapped.
        existing: EntityId,
    },
    /// No entity has this id.
    #[error("entity {0} does not exist")]
    UnknownEntity(EntityId),
    /// The entity is still part of a chain.
    #[error("entity {0} is still linked, unlink it first")]
    StillLinked(EntityId),
    /// One side of a link is already taken.
    #[error("entity {0} is already linked on that side")]
    AlreadyLinked(EntityId),
    /// Chains must stay within a lane.
    #[error("cannot link {previous} and {next} across lanes")]
    CrossLaneLink {
        /// The earlier entity.
        previous: EntityId,
        /// The later entity.
        next: EntityId,
    },
    /// The link would go backwards in time, or close a loop.
    #[error("cannot link {previous} before {next}")]
    LinkOrder {
        /// The earlier entity.
        previous: EntityId,
        /// The later entity.
        next: EntityId,
    },
    /// A link points at a missing entity or is not mirrored on the other side.
    #[error("link from {entity} to {link} is broken")]
    BrokenChain {
        /// The entity holding the link.
        entity: EntityId,
        /// The linked entity.
        link: EntityId,
    },
}

/// type alias of core::result::Result<T, ChartError>
pub type Result<T> = core::result::Result<T, ChartError>;

/// What to do when an inserted entity overlaps another one on a button or laser lane.
///
/// Touching entities (one ends exactly where the next begins) never overlap, so contiguous chain
/// members insert cleanly. Event lanes accept any number of entities at a position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OverlapPolicy {
    /// Reject overlapping entities with [`ChartError::Overlap`].
    #[default]
    Reject,
    /// Accept anything; the importer is responsible.
    Allow,
}

/// Lane layout of [`Chart::standard`]: four buttons, two effect buttons, two lasers, one event lane.
pub const STANDARD_LANES: [LaneKind; 9] = [
    LaneKind::Button,
    LaneKind::Button,
    LaneKind::Button,
    LaneKind::Button,
    LaneKind::Button,
    LaneKind::Button,
    LaneKind::Laser,
    LaneKind::Laser,
    LaneKind::Event,
];

/// Two intervals overlap when they share more than an end point, or are the same instant.
fn overlaps(a: (Tick, Tick), b: (Tick, Tick)) -> bool {
    let (a_start, a_end) = a;
    let (b_start, b_end) = b;
    (a_start < b_end && b_start < a_end) || (a_start == b_start && a_start == a_end && b_start == b_end)
}

/// A chart: lanes of entities, the tempo map and the effect defaults.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chart {
    lanes: Vec<Lane>,
    entities: Vec<Option<Entity>>,
    time_map: TimeMap,
    effects: EffectDefaults,
    overlap_policy: OverlapPolicy,
}

impl Chart {
    /// Creates an empty chart with the given lane layout.
    #[must_use]
    pub fn new(lane_kinds: impl IntoIterator<Item = LaneKind>, time_map: TimeMap) -> Self {
        Self {
            lanes: lane_kinds.into_iter().map(Lane::new).collect(),
            entities: Vec::new(),
            time_map,
            effects: EffectDefaults::standard(),
            overlap_policy: OverlapPolicy::default(),
        }
    }

    /// Creates an empty chart with [`STANDARD_LANES`].
    #[must_use]
    pub fn standard(time_map: TimeMap) -> Self {
        Self::new(STANDARD_LANES, time_map)
    }

    /// Replaces the effect defaults.
    #[must_use]
    pub fn with_effect_defaults(mut self, effects: EffectDefaults) -> Self {
        self.effects = effects;
        self
    }

    /// Replaces the overlap policy.
    #[must_use]
    pub fn with_overlap_policy(mut self, policy: OverlapPolicy) -> Self {
        self.overlap_policy = policy;
        self
    }

    /// The tempo map.
    #[must_use]
    pub const fn time_map(&self) -> &TimeMap {
        &self.time_map
    }

    /// The tempo map, mutably.
    ///
    /// Changing tempo moves entities in time; reset any cursor walking this chart afterwards.
    pub const fn time_map_mut(&mut self) -> &mut TimeMap {
        &mut self.time_map
    }

    /// The effect defaults.
    #[must_use]
    pub const fn effect_defaults(&self) -> &EffectDefaults {
        &self.effects
    }

    /// The effect defaults, mutably.
    pub const fn effect_defaults_mut(&mut self) -> &mut EffectDefaults {
        &mut self.effects
    }

    /// The overlap policy.
    #[must_use]
    pub const fn overlap_policy(&self) -> OverlapPolicy {
        self.overlap_policy
    }

    /// All lanes.
    #[must_use]
    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    /// Gets a lane.
    #[must_use]
    pub fn lane(&self, lane: LaneId) -> Option<&Lane> {
        self.lanes.get(lane.0)
    }

    /// Number of lanes.
    #[must_use]
    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    /// Gets an entity.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.0).and_then(Option::as_ref)
    }

    pub(crate) fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Iterates all live entities in id order.
    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|entity| (EntityId(index), entity)))
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lanes.iter().map(Lane::len).sum()
    }

    /// Whether the chart holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lanes.iter().all(Lane::is_empty)
    }

    /// Inserts an entity, keeping the lane sorted by position.
    ///
    /// # Errors
    ///
    /// - [`ChartError::LaneOutOfRange`] if the lane does not exist.
    /// - [`ChartError::KindMismatch`] if `data` does not fit the lane.
    /// - [`ChartError::NegativeDuration`] if `duration` is negative.
    /// - [`ChartError::EndOverflow`] if `position + duration` does not fit in a [`Tick`].
    /// - [`ChartError::Overlap`] if rejected by the [`OverlapPolicy`].
    pub fn add_entity(
        &mut self,
        lane: LaneId,
        position: Tick,
        duration: Tick,
        data: EntityData,
    ) -> Result<EntityId> {
        let lane_kind = self
            .lane(lane)
            .ok_or(ChartError::LaneOutOfRange(lane))?
            .kind();
        if lane_kind != data.lane_kind() {
            return Err(ChartError::KindMismatch {
                lane,
                expected: lane_kind,
                found: data.lane_kind(),
            });
        }
        if duration.is_negative() {
            return Err(ChartError::NegativeDuration(duration));
        }
        let end = position
            .checked_add(duration)
            .ok_or(ChartError::EndOverflow { position, duration })?;
        let index = self.insertion_index(lane, position);
        if self.overlap_policy == OverlapPolicy::Reject && lane_kind != LaneKind::Event {
            self.check_overlap(lane, index, position, end)?;
        }

        let id = EntityId(self.entities.len());
        self.entities.push(Some(Entity {
            lane,
            position,
            duration,
            previous: None,
            next: None,
            data,
        }));
        if let Some(lane) = self.lanes.get_mut(lane.0) {
            lane.entities.insert(index, id);
        }
        Ok(id)
    }

    /// Removes an entity from the chart.
    ///
    /// A cursor tracking this chart must be told first, see
    /// [`crate::playback::PlaybackCursor::remove_object`].
    ///
    /// # Errors
    ///
    /// - [`ChartError::UnknownEntity`] if no entity has this id.
    /// - [`ChartError::StillLinked`] if the entity is part of a chain.
    pub fn remove_entity(&mut self, id: EntityId) -> Result<Entity> {
        let entity = self.entity(id).ok_or(ChartError::UnknownEntity(id))?;
        if entity.is_linked() {
            return Err(ChartError::StillLinked(id));
        }
        let (lane, position) = (entity.lane, entity.position);
        let first = self.insertion_index_before(lane, position);
        if let Some(lane) = self.lanes.get_mut(lane.0) {
            if let Some(offset) = lane.entities.iter().skip(first).position(|&other| other == id) {
                lane.entities.remove(first + offset);
            }
        }
        let removed = self
            .entities
            .get_mut(id.0)
            .and_then(Option::take)
            .ok_or(ChartError::UnknownEntity(id))?;
        debug_assert_eq!(self.verify_chains(), Ok(()));
        Ok(removed)
    }

    /// Playback start and end time of an entity.
    #[must_use]
    pub fn entity_times(&self, id: EntityId) -> Option<(Seconds, Seconds)> {
        let entity = self.entity(id)?;
        let start = self.time_map.to_time(entity.position);
        let end = if entity.duration.is_zero() {
            start
        } else {
            self.time_map.to_time(entity.end_position())
        };
        Some((start, end))
    }

    /// Earliest start time over all entities.
    #[must_use]
    pub fn time_start(&self) -> Option<Seconds> {
        self.lanes
            .iter()
            .filter_map(|lane| lane.entities.first())
            .filter_map(|&id| self.entity(id))
            .map(|entity| entity.position)
            .min()
            .map(|position| self.time_map.to_time(position))
    }

    /// Latest end time over all entities.
    #[must_use]
    pub fn time_end(&self) -> Option<Seconds> {
        self.entities()
            .map(|(_, entity)| entity.end_position())
            .max()
            .map(|position| self.time_map.to_time(position))
    }

    /// Finds the last entity on `lane` starting at or before `position` and matching `predicate`.
    #[must_use]
    pub fn most_recent_of(
        &self,
        lane: LaneId,
        position: Tick,
        predicate: impl Fn(&Entity) -> bool,
    ) -> Option<EntityId> {
        let entities = &self.lane(lane)?.entities;
        let passed = self.insertion_index(lane, position);
        entities
            .get(..passed)?
            .iter()
            .rev()
            .copied()
            .find(|&id| self.entity(id).is_some_and(&predicate))
    }

    /// Finds the last laser segment on `lane` starting at or before `position`.
    #[must_use]
    pub fn most_recent_laser(&self, lane: LaneId, position: Tick) -> Option<(EntityId, &LaserSegment)> {
        let id = self.most_recent_of(lane, position, |entity| entity.as_laser().is_some())?;
        let segment = self.entity(id)?.as_laser()?;
        Some((id, segment))
    }

    /// Samples the laser value on `lane` at `position`.
    ///
    /// Returns `None` when no laser segment covers `position`. A zero-length segment (a slam)
    /// reports its final value.
    #[must_use]
    pub fn sample_laser(&self, lane: LaneId, position: Tick) -> Option<f64> {
        let (id, segment) = self.most_recent_laser(lane, position)?;
        let entity = self.entity(id)?;
        if entity.duration.is_zero() {
            return (entity.position == position).then_some(segment.final_value);
        }
        if position > entity.end_position() {
            return None;
        }
        let progress = position.measures_since(entity.position) / entity.duration.as_f64();
        Some(segment.value_at(progress))
    }

    /// Resolves the effect parameters of a button through its override or the chart's defaults.
    #[must_use]
    pub fn effect_params(&self, id: EntityId) -> Option<EffectParams> {
        let button = self.entity(id)?.as_button()?;
        let kind = button.effect?;
        Some(
            button
                .effect_params
                .unwrap_or_else(|| self.effects.get(kind)),
        )
    }

    /// Index of the first entity on `lane` starting after `position`.
    fn insertion_index(&self, lane: LaneId, position: Tick) -> usize {
        self.lane(lane).map_or(0, |lane| {
            lane.entities
                .partition_point(|&id| self.entity(id).is_some_and(|e| e.position <= position))
        })
    }

    /// Index of the first entity on `lane` starting at or after `position`.
    fn insertion_index_before(&self, lane: LaneId, position: Tick) -> usize {
        self.lane(lane).map_or(0, |lane| {
            lane.entities
                .partition_point(|&id| self.entity(id).is_some_and(|e| e.position < position))
        })
    }

    fn check_overlap(&self, lane: LaneId, index: usize, start: Tick, end: Tick) -> Result<()> {
        let Some(entities) = self.lane(lane).map(Lane::entities) else {
            return Ok(());
        };
        let conflict = |id: &EntityId| {
            self.entity(*id)
                .is_some_and(|other| overlaps((start, end), (other.position, other.end_position())))
        };
        let before = entities.get(..index).unwrap_or_default();
        // every entity sharing the start, then the closest one starting earlier
        let same_start = before
            .iter()
            .rev()
            .take_while(|&&id| self.entity(id).is_some_and(|e| e.position == start))
            .count();
        let candidates = before
            .iter()
            .rev()
            .take(same_start + 1)
            .chain(entities.get(index));
        match candidates.copied().find(|id| conflict(id)) {
            Some(existing) => Err(ChartError::Overlap {
                lane,
                position: start,
                existing,
            }),
            None => Ok(()),
        }
    }
}
