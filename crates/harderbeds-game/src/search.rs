//! Bounds of the spawn-candidate search volume.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchConfigError {
    #[error(
        "inner exclusion radius {inner} must be smaller than both search radii \
         (horizontal {horizontal}, vertical {vertical})"
    )]
    ExclusionTooLarge {
        inner: i32,
        horizontal: i32,
        vertical: i32,
    },

    #[error("search radius must not be negative: {0}")]
    NegativeRadius(i32),

    #[error("search radius {radius} exceeds the maximum of {max}")]
    RadiusTooLarge { radius: i32, max: i32 },

    #[error("light threshold {0} is outside 0..=16")]
    LightOutOfRange(u8),
}

/// Search volume around a bed and the light threshold for mob spawning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Blocks searched on each side of the target along X and Z.
    pub horizontal_radius: i32,
    /// Blocks searched above and below the target.
    pub vertical_radius: i32,
    /// Offsets within this distance of the target on any axis are skipped.
    pub inner_exclusion_radius: i32,
    /// Spawn spots need light strictly below this level.
    pub min_light_level: u8,
}

impl SearchConfig {
    pub const DEFAULT_HORIZONTAL_RADIUS: i32 = 20;
    pub const DEFAULT_VERTICAL_RADIUS: i32 = 10;
    pub const DEFAULT_INNER_EXCLUSION_RADIUS: i32 = 3;
    pub const DEFAULT_MIN_LIGHT_LEVEL: u8 = 8;
    /// Largest accepted radius on any axis.
    pub const MAX_RADIUS: i32 = 256;

    pub fn new(
        horizontal_radius: i32,
        vertical_radius: i32,
        inner_exclusion_radius: i32,
        min_light_level: u8,
    ) -> Result<Self, SearchConfigError> {
        let config = Self {
            horizontal_radius,
            vertical_radius,
            inner_exclusion_radius,
            min_light_level,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SearchConfigError> {
        for r in [
            self.horizontal_radius,
            self.vertical_radius,
            self.inner_exclusion_radius,
        ] {
            if r < 0 {
                return Err(SearchConfigError::NegativeRadius(r));
            }
            if r > Self::MAX_RADIUS {
                return Err(SearchConfigError::RadiusTooLarge {
                    radius: r,
                    max: Self::MAX_RADIUS,
                });
            }
        }
        if self.inner_exclusion_radius >= self.horizontal_radius.min(self.vertical_radius) {
            return Err(SearchConfigError::ExclusionTooLarge {
                inner: self.inner_exclusion_radius,
                horizontal: self.horizontal_radius,
                vertical: self.vertical_radius,
            });
        }
        if self.min_light_level > 16 {
            return Err(SearchConfigError::LightOutOfRange(self.min_light_level));
        }
        Ok(())
    }

    /// Upper bound on positions visited by one scan.
    pub fn volume(&self) -> u64 {
        let side = 2 * u64::from(self.horizontal_radius.unsigned_abs()) + 1;
        side * side * (2 * u64::from(self.vertical_radius.unsigned_abs()) + 1)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            horizontal_radius: Self::DEFAULT_HORIZONTAL_RADIUS,
            vertical_radius: Self::DEFAULT_VERTICAL_RADIUS,
            inner_exclusion_radius: Self::DEFAULT_INNER_EXCLUSION_RADIUS,
            min_light_level: Self::DEFAULT_MIN_LIGHT_LEVEL,
        }
    }
}
