//! Actuator boundary
//!
//! Everything that changes the host (mixer level, mute, scroll wheel, key
//! presses) goes through [`Actuator`]. Implementations are shared between the
//! gesture loop and the remote listener, so they must be `Send + Sync` and
//! every call must be safe to repeat: setting the same mute state twice has no
//! effect beyond the first call.

pub mod logging;
pub mod queue;
pub mod recording;

pub use logging::LoggingActuator;
pub use queue::{ActuatorHandle, ActuatorWorker};
pub use recording::RecordingActuator;

use crate::Result;

/// A single request to the host
#[derive(Clone, Debug, PartialEq)]
pub enum ActuatorCommand {
    /// Set the master volume; `level` is normalized, `level_db` is the endpoint value
    SetVolume { level: f32, level_db: f32 },

    /// Mute (`true`) or unmute (`false`) the master output
    SetMute(bool),

    /// Scroll by a signed number of notches, positive is up
    Scroll(i32),

    /// Press the "next page" key (right arrow)
    PressNext,
}

/// Host control surface
pub trait Actuator: Send + Sync {
    fn set_volume(&self, level: f32, level_db: f32) -> Result<()>;

    fn set_mute(&self, muted: bool) -> Result<()>;

    fn scroll(&self, delta: i32) -> Result<()>;

    fn press_next(&self) -> Result<()>;

    /// Dispatch a command to the matching method
    fn apply(&self, command: &ActuatorCommand) -> Result<()> {
        match *command {
            ActuatorCommand::SetVolume { level, level_db } => self.set_volume(level, level_db),
            ActuatorCommand::SetMute(muted) => self.set_mute(muted),
            ActuatorCommand::Scroll(delta) => self.scroll(delta),
            ActuatorCommand::PressNext => self.press_next(),
        }
    }

    /// Whether a mute call that was accepted has since failed. Reading clears
    /// the flag. Actuators that fail synchronously never set it.
    fn take_mute_failure(&self) -> bool {
        false
    }
}
