//! Configuration of the playback cursor.

use thiserror::Error;

use crate::timing::Seconds;

/// An error occurred when configuring a cursor.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The look-ahead window was negative.
    #[error("look-ahead must not be negative, got {0}")]
    NegativeLookAhead(Seconds),
    /// The look-behind window was negative.
    #[error("look-behind must not be negative, got {0}")]
    NegativeLookBehind(Seconds),
    /// A window with this name already exists.
    #[error("window {0:?} already exists")]
    DuplicateWindow(String),
}

/// Sizes of the visible window around the playback position.
///
/// Changing these on a running cursor does not fire crossings for entities the old edges already
/// passed. Reset the cursor to apply them from scratch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawCursorConfig")
)]
pub struct CursorConfig {
    look_ahead: Seconds,
    look_behind: Seconds,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            look_ahead: Self::DEFAULT_LOOK_AHEAD,
            look_behind: Self::DEFAULT_LOOK_BEHIND,
        }
    }
}

impl CursorConfig {
    /// Look-ahead of the default configuration.
    pub const DEFAULT_LOOK_AHEAD: Seconds = Seconds::from_millis(1000);
    /// Look-behind of the default configuration.
    pub const DEFAULT_LOOK_BEHIND: Seconds = Seconds::from_millis(500);

    /// Creates a configuration.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NegativeLookAhead`] or [`ConfigError::NegativeLookBehind`] on a negative
    ///   window.
    pub fn new(look_ahead: Seconds, look_behind: Seconds) -> Result<Self, ConfigError> {
        Self::default()
            .with_look_ahead(look_ahead)?
            .with_look_behind(look_behind)
    }

    /// Replaces the look-ahead.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NegativeLookAhead`] if `look_ahead` is negative.
    pub fn with_look_ahead(mut self, look_ahead: Seconds) -> Result<Self, ConfigError> {
        if look_ahead < Seconds::ZERO {
            return Err(ConfigError::NegativeLookAhead(look_ahead));
        }
        self.look_ahead = look_ahead;
        Ok(self)
    }

    /// Replaces the look-behind.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NegativeLookBehind`] if `look_behind` is negative.
    pub fn with_look_behind(mut self, look_behind: Seconds) -> Result<Self, ConfigError> {
        if look_behind < Seconds::ZERO {
            return Err(ConfigError::NegativeLookBehind(look_behind));
        }
        self.look_behind = look_behind;
        Ok(self)
    }

    /// How far ahead of the playback position entities become visible.
    #[must_use]
    pub const fn look_ahead(&self) -> Seconds {
        self.look_ahead
    }

    /// How long entities stay visible after their end.
    #[must_use]
    pub const fn look_behind(&self) -> Seconds {
        self.look_behind
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawCursorConfig {
    look_ahead: Seconds,
    look_behind: Seconds,
}

#[cfg(feature = "serde")]
impl TryFrom<RawCursorConfig> for CursorConfig {
    type Error = ConfigError;

    fn try_from(raw: RawCursorConfig) -> Result<Self, Self::Error> {
        Self::new(raw.look_ahead, raw.look_behind)
    }
}
