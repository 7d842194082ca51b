//! Phone remote: the desktop listener and the phone-side shake uplink

pub mod client;
pub mod debouncer;
pub mod page;
pub mod server;

pub use client::{send_command, MotionClient, MotionSensor, ReplaySensor, SensorReading, UplinkStats};
pub use debouncer::{MotionConfig, MotionDebouncer, MotionOutcome, MotionSample, MotionWindow};
pub use server::{RemoteCommand, RemoteConfig, RemoteServer};
