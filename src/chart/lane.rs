//! Lanes of a chart.

use super::EntityId;

/// Category of entities a lane may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LaneKind {
    /// Button presses and holds.
    Button,
    /// Laser segments.
    Laser,
    /// Generic parameter events.
    Event,
}

/// One parallel track of the chart, holding its entities sorted by position.
///
/// Entities at an equal position keep their insertion order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lane {
    kind: LaneKind,
    pub(crate) entities: Vec<EntityId>,
}

impl Lane {
    pub(crate) const fn new(kind: LaneKind) -> Self {
        Self {
            kind,
            entities: Vec::new(),
        }
    }

    /// The kind of entities held.
    #[must_use]
    pub const fn kind(&self) -> LaneKind {
        self.kind
    }

    /// The entities in position order.
    #[must_use]
    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    /// Number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the lane holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
