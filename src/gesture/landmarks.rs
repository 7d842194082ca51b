//! Hand landmark geometry
//!
//! Converts the detector's normalized per-hand landmarks into frame pixel
//! positions and measures the distances the controls are driven by.

use crate::{HandCtlError, Result};
use serde::{Deserialize, Serialize};

pub const LANDMARK_COUNT: usize = 21;

/// Largest magnitude accepted for a normalized coordinate. Detectors report
/// points slightly outside the frame; anything past this is garbage.
pub const MAX_COORDINATE: f32 = 10.0;

pub const THUMB_TIP: usize = 4;
pub const INDEX_PIP: usize = 6;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_TIP: usize = 12;
pub const RING_PIP: usize = 14;
pub const RING_TIP: usize = 16;
pub const PINKY_PIP: usize = 18;
pub const PINKY_TIP: usize = 20;

/// A single normalized landmark, x and y in [0, 1] with y growing downward
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn is_plausible(&self) -> bool {
        [self.x, self.y]
            .iter()
            .all(|v| v.is_finite() && v.abs() <= MAX_COORDINATE)
    }
}

/// The 21 landmarks of one tracked hand, indexed by anatomical id
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Landmark>", into = "Vec<Landmark>")]
pub struct LandmarkSet {
    points: Vec<Landmark>,
}

impl LandmarkSet {
    /// Wrap a detector result, rejecting sets with fewer than 21 points
    pub fn new(points: Vec<Landmark>) -> Result<Self> {
        if points.len() < LANDMARK_COUNT {
            return Err(HandCtlError::InvalidInput(format!(
                "expected {} landmarks, got {}",
                LANDMARK_COUNT,
                points.len()
            )));
        }
        if let Some((id, lm)) = points
            .iter()
            .enumerate()
            .find(|(_, lm)| !lm.is_plausible())
        {
            return Err(HandCtlError::InvalidInput(format!(
                "landmark {} out of range: ({}, {})",
                id, lm.x, lm.y
            )));
        }
        Ok(Self { points })
    }

    pub fn get(&self, id: usize) -> Landmark {
        self.points[id]
    }

    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    /// Pixel position of landmark `id` in a frame of the given size
    pub fn to_pixel(&self, id: usize, frame: FrameSize) -> PixelPoint {
        let lm = self.points[id];
        PixelPoint {
            x: (lm.x * frame.width as f32) as i32,
            y: (lm.y * frame.height as f32) as i32,
        }
    }
}

impl TryFrom<Vec<Landmark>> for LandmarkSet {
    type Error = HandCtlError;

    fn try_from(points: Vec<Landmark>) -> Result<Self> {
        Self::new(points)
    }
}

impl From<LandmarkSet> for Vec<Landmark> {
    fn from(set: LandmarkSet) -> Self {
        set.points
    }
}

/// Frame dimensions in pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Horizontal center line used as the scroll reference
    pub fn center_y(&self) -> i32 {
        (self.height / 2) as i32
    }
}

/// Integer position in frame-pixel space
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Pixel positions of the thumb tip and index tip
pub fn finger_positions(hand: &LandmarkSet, frame: FrameSize) -> (PixelPoint, PixelPoint) {
    (
        hand.to_pixel(THUMB_TIP, frame),
        hand.to_pixel(INDEX_TIP, frame),
    )
}

/// Pixel y of the index fingertip
pub fn index_finger_y(hand: &LandmarkSet, frame: FrameSize) -> i32 {
    hand.to_pixel(INDEX_TIP, frame).y
}

/// Euclidean distance between two pixel points
pub fn distance(a: PixelPoint, b: PixelPoint) -> f32 {
    let dx = (b.x as i64 - a.x as i64) as f32;
    let dy = (b.y as i64 - a.y as i64) as f32;
    (dx * dx + dy * dy).sqrt()
}
