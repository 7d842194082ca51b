//! Per-frame mode arbitration
//!
//! A closed fist mutes and freezes every other control; an open hand unmutes
//! and lets the pinch drive the volume and the index finger drive scrolling.
//! The mode follows the classifier every frame with no hysteresis.

use super::scroll::{ScrollConfig, ScrollIntent, ScrollTrigger};
use super::volume::{VolumeConfig, VolumeMapper};
use crate::actuator::Actuator;
use crate::gesture::{FrameSize, GestureFrame, LandmarkSet};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Configuration for the arbiter
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ArbiterConfig {
    /// Only issue mute/unmute when the state changes. Needed for actuators
    /// that toggle instead of set.
    pub dedupe_mute: bool,
}

/// Control mode for one frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum GestureMode {
    /// Pinch and scroll active
    #[default]
    Open,
    /// Muted, no volume or scroll updates
    Closed,
}

impl std::fmt::Display for GestureMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GestureMode::Open => write!(f, "Open"),
            GestureMode::Closed => write!(f, "Closed"),
        }
    }
}

/// What one frame produced, for presentation and tests
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CycleReport {
    pub mode: GestureMode,
    /// Smoothed volume percent, 0 while closed
    pub volume_percent: u8,
    /// Pinch distance in pixels, 0 while closed
    pub distance: f32,
    pub scroll: ScrollIntent,
    pub frame: GestureFrame,
    /// Actuator errors swallowed during this cycle
    pub actuator_errors: usize,
}

/// Combines the closure classifier with the volume mapper and scroll trigger
pub struct ModeArbiter {
    config: ArbiterConfig,
    volume: VolumeMapper,
    scroll: ScrollTrigger,
    actuator: Arc<dyn Actuator>,
    applied_mute: Option<bool>,
}

impl ModeArbiter {
    pub fn new(
        config: ArbiterConfig,
        volume: VolumeConfig,
        scroll: ScrollConfig,
        actuator: Arc<dyn Actuator>,
    ) -> Self {
        Self {
            config,
            volume: VolumeMapper::new(volume),
            scroll: ScrollTrigger::new(scroll),
            actuator,
            applied_mute: None,
        }
    }

    /// Run one frame for the detected hand
    pub fn process(&mut self, hand: &LandmarkSet, frame_size: FrameSize) -> CycleReport {
        let frame = GestureFrame::from_landmarks(hand, frame_size);
        self.process_frame(frame, frame_size.center_y())
    }

    /// Run one frame from an already derived gesture frame
    pub fn process_frame(&mut self, frame: GestureFrame, center_y: i32) -> CycleReport {
        let mut errors = 0;

        let mode = if frame.is_closed {
            GestureMode::Closed
        } else {
            GestureMode::Open
        };

        if mode == GestureMode::Closed {
            errors += self.apply_mute(true);
            debug!("Hand closed, muted");
            return CycleReport {
                mode,
                volume_percent: 0,
                distance: 0.0,
                scroll: ScrollIntent::None,
                frame,
                actuator_errors: errors,
            };
        }

        errors += self.apply_mute(false);

        let percent = self.volume.apply(frame.pinch_distance);
        let level = self.volume.level();
        errors += track(self.actuator.set_volume(level, self.volume.level_to_db(level)));

        let intent = self.scroll.evaluate(frame.index_y, center_y);
        if intent != ScrollIntent::None {
            errors += track(self.actuator.scroll(intent.delta(self.scroll.magnitude())));
        }

        debug!(
            "Open: distance {:.1}px -> {}%, scroll {}",
            frame.pinch_distance, percent, intent
        );

        CycleReport {
            mode,
            volume_percent: percent,
            distance: frame.pinch_distance,
            scroll: intent,
            frame,
            actuator_errors: errors,
        }
    }

    fn apply_mute(&mut self, muted: bool) -> usize {
        if self.actuator.take_mute_failure() {
            debug!("Earlier mute call failed downstream, resending");
            self.applied_mute = None;
        }
        if self.config.dedupe_mute && self.applied_mute == Some(muted) {
            return 0;
        }
        match self.actuator.set_mute(muted) {
            Ok(()) => {
                self.applied_mute = Some(muted);
                0
            }
            Err(e) => {
                // Unknown state after a failure, so retry next frame
                self.applied_mute = None;
                warn!("Failed to set mute={}: {}", muted, e);
                1
            }
        }
    }

    pub fn volume(&self) -> &VolumeMapper {
        &self.volume
    }
}

fn track(result: crate::Result<()>) -> usize {
    match result {
        Ok(()) => 0,
        Err(e) => {
            warn!("Actuator call failed: {}", e);
            1
        }
    }
}
