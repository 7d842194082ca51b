//! Detector boundary
//!
//! Camera capture and hand-pose detection happen outside this crate. A
//! [`LandmarkSource`] hands the controller one observation per captured
//! frame: the frame size plus the first detected hand, if any.

pub mod channel;
pub mod replay;

pub use channel::ChannelSource;
pub use replay::ReplaySource;

use crate::gesture::{FrameSize, LandmarkSet};
use crate::Result;

/// One captured frame as seen by the detector
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    pub frame: FrameSize,
    /// First detected hand; `None` is a valid "no gesture" frame
    pub hand: Option<LandmarkSet>,
}

impl Observation {
    pub fn new(frame: FrameSize, hand: Option<LandmarkSet>) -> Self {
        Self { frame, hand }
    }

    pub fn empty(frame: FrameSize) -> Self {
        Self { frame, hand: None }
    }
}

/// Result of asking a source for the next frame
#[derive(Clone, Debug, PartialEq)]
pub enum Acquisition {
    /// A frame was captured
    Frame(Observation),
    /// Nothing available this cycle; the loop keeps going
    Idle,
    /// The source has ended (quit requested or stream exhausted)
    Finished,
}

/// Anything that can deliver per-frame observations
///
/// An `Err` from [`LandmarkSource::next`] is a fatal capture failure and
/// stops the control loop.
pub trait LandmarkSource: Send {
    fn next(&mut self) -> Result<Acquisition>;
}
