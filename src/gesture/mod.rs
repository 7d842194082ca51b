pub mod closure;
pub mod frame;
pub mod landmarks;

pub use closure::{curled_fingers, is_hand_closed};
pub use frame::GestureFrame;
pub use landmarks::{
    distance, finger_positions, index_finger_y, FrameSize, Landmark, LandmarkSet, PixelPoint,
};
