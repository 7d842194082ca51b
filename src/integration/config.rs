//! Configuration for the integration layer
//!
//! Provides centralized configuration for all components, loadable from a
//! TOML file where every section and field is optional.

use crate::control::{ArbiterConfig, ScrollConfig, VolumeConfig};
use crate::remote::{MotionConfig, RemoteConfig};
use crate::{HandCtlError, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;

/// Larger than any camera frame height
const MAX_DEAD_ZONE: i32 = 10_000;

/// Configuration for the complete application
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Pinch to volume mapping
    pub volume: VolumeConfig,

    /// Index finger scrolling
    pub scroll: ScrollConfig,

    /// Mode arbitration
    pub arbiter: ArbiterConfig,

    /// Desktop remote listener
    pub remote: RemoteConfig,

    /// Phone-side shake uplink
    pub motion: MotionConfig,
}

impl AppConfig {
    /// Parse a TOML document
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            HandCtlError::ConfigError(format!("Failed to read {:?}: {}", path, e))
        })?;
        Self::from_toml(&text)
    }

    /// Override the remote listen address
    pub fn with_remote_bind(mut self, bind: impl Into<String>) -> Self {
        self.remote.bind = bind.into();
        self
    }

    /// Disable the remote listener
    pub fn without_remote(mut self) -> Self {
        self.remote.enabled = false;
        self
    }

    /// Only issue mute/unmute on state changes
    pub fn with_mute_dedupe(mut self) -> Self {
        self.arbiter.dedupe_mute = true;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let v = &self.volume;
        if !(v.min_dist >= 0.0 && v.min_dist < v.max_dist) {
            return Err(HandCtlError::ConfigError(format!(
                "volume.min_dist ({}) must be >= 0 and below volume.max_dist ({})",
                v.min_dist, v.max_dist
            )));
        }
        if !(0.0..1.0).contains(&v.smoothing) {
            return Err(HandCtlError::ConfigError(format!(
                "volume.smoothing ({}) must be in [0, 1)",
                v.smoothing
            )));
        }
        if v.endpoint_min_db > v.endpoint_max_db {
            return Err(HandCtlError::ConfigError(
                "volume.endpoint_min_db must not exceed volume.endpoint_max_db".to_string(),
            ));
        }

        if !(0..=MAX_DEAD_ZONE).contains(&self.scroll.dead_zone) {
            return Err(HandCtlError::ConfigError(format!(
                "scroll.dead_zone ({}) must be in [0, {}]",
                self.scroll.dead_zone, MAX_DEAD_ZONE
            )));
        }
        if self.scroll.magnitude <= 0 {
            return Err(HandCtlError::ConfigError(
                "scroll.magnitude must be > 0".to_string(),
            ));
        }

        if self.remote.enabled {
            self.remote.bind.parse::<SocketAddr>().map_err(|e| {
                HandCtlError::ConfigError(format!("remote.bind {:?}: {}", self.remote.bind, e))
            })?;
        }
        if self.remote.request_timeout_ms == 0 || self.remote.max_request_bytes == 0 {
            return Err(HandCtlError::ConfigError(
                "remote.request_timeout_ms and remote.max_request_bytes must be > 0".to_string(),
            ));
        }

        let m = &self.motion;
        if m.window_size < 2 {
            return Err(HandCtlError::ConfigError(
                "motion.window_size must be at least 2".to_string(),
            ));
        }
        if m.wave_threshold < 0.0 || m.raise_threshold < 0.0 {
            return Err(HandCtlError::ConfigError(
                "motion thresholds must not be negative".to_string(),
            ));
        }
        if m.poll_interval_ms == 0 {
            return Err(HandCtlError::ConfigError(
                "motion.poll_interval_ms must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.volume.min_dist, 30.0);
        assert_eq!(config.volume.max_dist, 200.0);
        assert_eq!(config.scroll.dead_zone, 40);
        assert_eq!(config.remote.bind, "0.0.0.0:5000");
        assert_eq!(config.motion.window_size, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = AppConfig::default()
            .without_remote()
            .with_mute_dedupe()
            .with_remote_bind("127.0.0.1:0");

        assert!(!config.remote.enabled);
        assert!(config.arbiter.dedupe_mute);
        assert_eq!(config.remote.bind, "127.0.0.1:0");
    }

    #[test]
    fn test_partial_toml() {
        let config = AppConfig::from_toml(
            r#"
            [scroll]
            dead_zone = 60

            [motion]
            wave_threshold = 3.5
            "#,
        )
        .unwrap();
        assert_eq!(config.scroll.dead_zone, 60);
        assert_eq!(config.scroll.magnitude, 1);
        assert_eq!(config.motion.wave_threshold, 3.5);
        assert_eq!(config.volume, VolumeConfig::default());
    }

    #[test]
    fn test_rejects_inverted_distance_range() {
        let err = AppConfig::from_toml("[volume]\nmin_dist = 200.0\nmax_dist = 30.0\n");
        assert!(matches!(err, Err(HandCtlError::ConfigError(_))));
    }

    #[test]
    fn test_rejects_bad_bind_only_when_enabled() {
        let bad = AppConfig::default().with_remote_bind("not an address");
        assert!(bad.validate().is_err());
        assert!(bad.without_remote().validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_dead_zone() {
        let err = AppConfig::from_toml("[scroll]\ndead_zone = 2147483647\n");
        assert!(matches!(err, Err(HandCtlError::ConfigError(_))));
        let err = AppConfig::from_toml("[scroll]\ndead_zone = -1\n");
        assert!(matches!(err, Err(HandCtlError::ConfigError(_))));
        assert!(AppConfig::from_toml("[scroll]\ndead_zone = 10000\n").is_ok());
    }

    #[test]
    fn test_rejects_unknown_types() {
        assert!(AppConfig::from_toml("[scroll]\ndead_zone = \"wide\"\n").is_err());
    }
}
