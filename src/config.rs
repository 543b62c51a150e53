use serde_derive::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Upper bound on `gaussian_sigma`; the smoothing kernel spans `8 * sigma + 1` taps
pub const MAX_GAUSSIAN_SIGMA: f32 = 100.0;

/// Tracking thresholds. Fixed for the whole run of a tracker.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TrackerConfig {
    /// Largest centroid distance (px, exclusive) at which a detection extends a track
    pub max_distance: f32,

    /// Consecutive missed frames a track survives
    pub max_misses: u32,

    /// Masks with fewer occupied pixels are discarded
    pub min_mask_area: u32,

    /// Raw points required before the trail gets smoothed
    pub smoothing_window: usize,

    pub gaussian_sigma: f32,

    /// Movement (px) since the last smoothed point required to extend the trail
    pub min_movement_threshold: f32,

    /// Capacity of the smoothed trail; the raw history keeps twice as many points
    pub trail_length: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_distance: 50.0,
            max_misses: 5,
            min_mask_area: 700,
            smoothing_window: 5,
            gaussian_sigma: 2.0,
            min_movement_threshold: 2.0,
            trail_length: 30,
        }
    }
}

impl TrackerConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;

        Ok(config)
    }

    #[inline]
    pub fn raw_history_capacity(&self) -> usize {
        self.trail_length * 2
    }

    #[inline]
    pub fn smoothed_history_capacity(&self) -> usize {
        self.trail_length
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.max_distance.is_finite() && self.max_distance > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "max_distance must be positive, got {}",
                self.max_distance
            )));
        }

        if !(self.gaussian_sigma.is_finite() && self.gaussian_sigma > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "gaussian_sigma must be positive, got {}",
                self.gaussian_sigma
            )));
        }

        if self.gaussian_sigma > MAX_GAUSSIAN_SIGMA {
            return Err(Error::InvalidConfig(format!(
                "gaussian_sigma must not exceed {}, got {}",
                MAX_GAUSSIAN_SIGMA, self.gaussian_sigma
            )));
        }

        if !(self.min_movement_threshold.is_finite() && self.min_movement_threshold >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "min_movement_threshold must be non-negative, got {}",
                self.min_movement_threshold
            )));
        }

        if self.smoothing_window == 0 {
            return Err(Error::InvalidConfig("smoothing_window must be at least 1".into()));
        }

        if self.trail_length == 0 {
            return Err(Error::InvalidConfig("trail_length must be at least 1".into()));
        }

        if self.smoothing_window > self.raw_history_capacity() {
            return Err(Error::InvalidConfig(format!(
                "smoothing_window ({}) exceeds raw history capacity ({})",
                self.smoothing_window,
                self.raw_history_capacity()
            )));
        }

        Ok(())
    }
}
