use super::{Actuator, ActuatorCommand};
use crate::{HandCtlError, Result};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Actuator that records every call, for tests and dry runs
///
/// Clones share the same log. With failures enabled every call is still
/// recorded but returns an [`HandCtlError::ActuatorError`].
#[derive(Clone, Debug, Default)]
pub struct RecordingActuator {
    calls: Arc<Mutex<Vec<ActuatorCommand>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingActuator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Snapshot of all recorded calls
    pub fn calls(&self) -> Vec<ActuatorCommand> {
        self.calls.lock().clone()
    }

    /// Drain the recorded calls
    pub fn take(&self) -> Vec<ActuatorCommand> {
        std::mem::take(&mut *self.calls.lock())
    }

    pub fn count(&self, pred: impl Fn(&ActuatorCommand) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| pred(*c)).count()
    }

    fn record(&self, command: ActuatorCommand) -> Result<()> {
        let failing = self.failing.load(Ordering::SeqCst);
        let description = format!("{:?}", command);
        self.calls.lock().push(command);
        if failing {
            return Err(HandCtlError::ActuatorError(format!(
                "injected failure on {}",
                description
            )));
        }
        Ok(())
    }
}

impl Actuator for RecordingActuator {
    fn set_volume(&self, level: f32, level_db: f32) -> Result<()> {
        self.record(ActuatorCommand::SetVolume { level, level_db })
    }

    fn set_mute(&self, muted: bool) -> Result<()> {
        self.record(ActuatorCommand::SetMute(muted))
    }

    fn scroll(&self, delta: i32) -> Result<()> {
        self.record(ActuatorCommand::Scroll(delta))
    }

    fn press_next(&self) -> Result<()> {
        self.record(ActuatorCommand::PressNext)
    }
}
