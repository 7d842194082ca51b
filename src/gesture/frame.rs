use super::closure::is_hand_closed;
use super::landmarks::{distance, finger_positions, FrameSize, LandmarkSet, PixelPoint};
use serde::Serialize;

/// Per-cycle gesture state derived from one landmark set
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GestureFrame {
    pub pinch_distance: f32,
    pub is_closed: bool,
    pub index_y: i32,
    pub thumb: PixelPoint,
    pub index: PixelPoint,
}

impl GestureFrame {
    pub fn from_landmarks(hand: &LandmarkSet, frame: FrameSize) -> Self {
        let (thumb, index) = finger_positions(hand, frame);
        Self {
            pinch_distance: distance(thumb, index),
            is_closed: is_hand_closed(hand),
            index_y: index.y,
            thumb,
            index,
        }
    }
}
