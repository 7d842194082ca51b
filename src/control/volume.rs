//! Pinch distance to volume level mapping
//!
//! The mapper is independent of any OS mixer: it turns a pixel distance into
//! a smoothed normalized level and leaves applying it to the actuator layer.

use serde::Deserialize;

/// Configuration for the volume mapper
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct VolumeConfig {
    /// Pinch distance (px) at or below which the level is 0
    pub min_dist: f32,

    /// Pinch distance (px) at or above which the level is 1
    pub max_dist: f32,

    /// Weight of the previous level in the exponential smoothing
    pub smoothing: f32,

    /// Endpoint attenuation at level 0 (dB)
    pub endpoint_min_db: f32,

    /// Endpoint attenuation at level 1 (dB)
    pub endpoint_max_db: f32,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            min_dist: 30.0,
            max_dist: 200.0,
            smoothing: 0.8,
            endpoint_min_db: -65.25,
            endpoint_max_db: 0.0,
        }
    }
}

/// State carried across cycles by the mapper
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VolumeState {
    /// Last smoothed level, always in [0, 1]
    pub previous_level: f32,
}

/// Linear map of a pinch distance into [0, 1]
pub fn map_distance_to_level(distance: f32, min_dist: f32, max_dist: f32) -> f32 {
    ((distance - min_dist) / (max_dist - min_dist)).clamp(0.0, 1.0)
}

/// One step of exponential smoothing
pub fn smooth(previous: f32, raw: f32, smoothing: f32) -> f32 {
    (smoothing * previous + (1.0 - smoothing) * raw).clamp(0.0, 1.0)
}

/// Maps pinch distances to smoothed volume levels
#[derive(Clone, Debug)]
pub struct VolumeMapper {
    config: VolumeConfig,
    state: VolumeState,
}

impl VolumeMapper {
    pub fn new(config: VolumeConfig) -> Self {
        Self {
            config,
            state: VolumeState::default(),
        }
    }

    /// Raw (unsmoothed) level for a distance using the configured range
    pub fn map_distance_to_level(&self, distance: f32) -> f32 {
        map_distance_to_level(distance, self.config.min_dist, self.config.max_dist)
    }

    /// Smooth the mapped level into the state and return it as a percentage
    pub fn apply(&mut self, distance: f32) -> u8 {
        let raw = self.map_distance_to_level(distance);
        let level = smooth(self.state.previous_level, raw, self.config.smoothing);
        self.state.previous_level = level;
        (level * 100.0).round() as u8
    }

    /// Current smoothed level
    pub fn level(&self) -> f32 {
        self.state.previous_level
    }

    pub fn state(&self) -> VolumeState {
        self.state
    }

    /// Convert a normalized level into the endpoint's decibel range
    pub fn level_to_db(&self, level: f32) -> f32 {
        let lo = self.config.endpoint_min_db;
        let hi = self.config.endpoint_max_db;
        lo + level.clamp(0.0, 1.0) * (hi - lo)
    }
}

impl Default for VolumeMapper {
    fn default() -> Self {
        Self::new(VolumeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturates_outside_range() {
        for d in [0.0, 10.0, 29.9, 30.0] {
            assert_eq!(map_distance_to_level(d, 30.0, 200.0), 0.0);
        }
        for d in [200.0, 250.0, 1000.0] {
            assert_eq!(map_distance_to_level(d, 30.0, 200.0), 1.0);
        }
    }

    #[test]
    fn test_monotonic_between_bounds() {
        let mut last = 0.0;
        for d in 30..=200 {
            let level = map_distance_to_level(d as f32, 30.0, 200.0);
            assert!(level >= last);
            last = level;
        }
        assert!((map_distance_to_level(115.0, 30.0, 200.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_smoothing_sequence() {
        let mut mapper = VolumeMapper::default();
        let expected_levels = [0.0, 0.2, 0.36, 0.488];
        let expected_percent = [0, 20, 36, 49];

        for (i, d) in [30.0, 200.0, 200.0, 200.0].into_iter().enumerate() {
            let percent = mapper.apply(d);
            assert_eq!(percent, expected_percent[i]);
            assert!((mapper.level() - expected_levels[i]).abs() < 1e-5);
        }
    }

    #[test]
    fn test_converges_to_raw_level() {
        let mut mapper = VolumeMapper::default();
        let target = mapper.map_distance_to_level(115.0);
        for n in 1..=60 {
            mapper.apply(115.0);
            let bound = target * 0.8f32.powi(n) + 1e-5;
            assert!((mapper.level() - target).abs() <= bound);
        }
        assert!((mapper.level() - target).abs() < 1e-4);
    }

    #[test]
    fn test_level_to_db() {
        let mapper = VolumeMapper::default();
        assert_eq!(mapper.level_to_db(0.0), -65.25);
        assert_eq!(mapper.level_to_db(1.0), 0.0);
        assert!((mapper.level_to_db(0.5) + 32.625).abs() < 1e-4);
    }
}
