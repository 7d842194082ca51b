//! End-to-end integration module
//!
//! This module provides the layer that connects all components: the
//! landmark source, the gesture loop and the shared actuators.

mod config;
mod controller;

pub use config::AppConfig;
pub use controller::{ControllerCommand, ControllerEvent, ControllerHandle, GestureController};
