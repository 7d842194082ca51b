//! Single-owner actuator queue
//!
//! The real actuator lives on one worker thread; the gesture loop and the
//! remote listener hold cloned [`ActuatorHandle`]s that only enqueue commands.
//! Host calls are therefore serialized even when the underlying binding is
//! not thread-safe. Mute failures on the worker are flagged back to the
//! handles so callers that skip repeated mute calls know to resend.

use super::{Actuator, ActuatorCommand};
use crate::{HandCtlError, Result};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

enum QueueMessage {
    Command(ActuatorCommand),
    Shutdown,
}

/// Cloneable sender side of the actuator queue
#[derive(Clone)]
pub struct ActuatorHandle {
    tx: Sender<QueueMessage>,
    mute_failed: Arc<AtomicBool>,
}

impl ActuatorHandle {
    fn enqueue(&self, command: ActuatorCommand) -> Result<()> {
        match self.tx.try_send(QueueMessage::Command(command)) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(HandCtlError::ActuatorError(
                "actuator queue full, command dropped".to_string(),
            )),
            Err(TrySendError::Disconnected(_)) => Err(HandCtlError::ChannelError(
                "actuator worker has stopped".to_string(),
            )),
        }
    }

    /// Ask the worker to drain pending commands and exit
    pub fn shutdown(&self) {
        let _ = self.tx.send(QueueMessage::Shutdown);
    }
}

impl Actuator for ActuatorHandle {
    fn set_volume(&self, level: f32, level_db: f32) -> Result<()> {
        self.enqueue(ActuatorCommand::SetVolume { level, level_db })
    }

    fn set_mute(&self, muted: bool) -> Result<()> {
        self.enqueue(ActuatorCommand::SetMute(muted))
    }

    fn scroll(&self, delta: i32) -> Result<()> {
        self.enqueue(ActuatorCommand::Scroll(delta))
    }

    fn press_next(&self) -> Result<()> {
        self.enqueue(ActuatorCommand::PressNext)
    }

    fn take_mute_failure(&self) -> bool {
        self.mute_failed.swap(false, Ordering::SeqCst)
    }
}

/// Worker that owns the actuator and applies queued commands in order
pub struct ActuatorWorker {
    actuator: Arc<dyn Actuator>,
    rx: Receiver<QueueMessage>,
    mute_failed: Arc<AtomicBool>,
}

impl ActuatorWorker {
    /// Create a worker and its handle with room for `capacity` pending commands
    pub fn new(actuator: Arc<dyn Actuator>, capacity: usize) -> (Self, ActuatorHandle) {
        let (tx, rx) = bounded(capacity);
        let mute_failed = Arc::new(AtomicBool::new(false));
        let worker = Self {
            actuator,
            rx,
            mute_failed: Arc::clone(&mute_failed),
        };
        (worker, ActuatorHandle { tx, mute_failed })
    }

    /// Spawn the worker thread
    pub fn start(self) -> Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("actuator".to_string())
            .spawn(move || self.run())
            .map_err(|e| HandCtlError::ChannelError(format!("Failed to spawn actuator worker: {}", e)))
    }

    fn run(self) {
        info!("Actuator worker started");
        for message in self.rx.iter() {
            match message {
                QueueMessage::Command(command) => {
                    if let Err(e) = self.actuator.apply(&command) {
                        warn!("Actuator call {:?} failed: {}", command, e);
                        if matches!(command, ActuatorCommand::SetMute(_)) {
                            self.mute_failed.store(true, Ordering::SeqCst);
                        }
                    }
                }
                QueueMessage::Shutdown => {
                    debug!("Actuator worker shutdown requested");
                    break;
                }
            }
        }
        info!("Actuator worker stopped");
    }
}
