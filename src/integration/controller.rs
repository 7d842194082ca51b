//! Gesture control loop
//!
//! Connects the detector boundary to the actuators: Landmarks -> Geometry ->
//! Closure -> Volume/Scroll -> Actuator, one synchronous pass per frame.

use crate::actuator::Actuator;
use crate::control::{CycleReport, ModeArbiter};
use crate::integration::config::AppConfig;
use crate::source::{Acquisition, LandmarkSource};
use crate::utils::perf::{CycleTimings, FrameCounter, LoopStats};
use crate::{HandCtlError, Result};
use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Commands that can be sent to the controller
#[derive(Debug, Clone)]
pub enum ControllerCommand {
    /// Stop after the current cycle
    Shutdown,
}

/// Events emitted by the controller
#[derive(Debug, Clone)]
pub enum ControllerEvent {
    /// A frame with a hand was processed
    Cycle(CycleReport),

    /// A frame arrived without a hand
    NoHand,

    /// The loop stopped on a fatal error
    Error(String),

    /// The loop has stopped
    Stopped(LoopStats),
}

/// Handle for controlling the loop from another thread
#[derive(Clone)]
pub struct ControllerHandle {
    command_tx: Sender<ControllerCommand>,
    event_rx: Receiver<ControllerEvent>,
}

impl ControllerHandle {
    /// Send a command to the controller
    pub fn send_command(&self, cmd: ControllerCommand) -> Result<()> {
        self.command_tx
            .send(cmd)
            .map_err(|e| HandCtlError::ChannelError(format!("Failed to send command: {}", e)))
    }

    /// Try to receive an event from the controller
    pub fn try_recv_event(&self) -> Option<ControllerEvent> {
        self.event_rx.try_recv().ok()
    }
}

/// Per-frame gesture loop
pub struct GestureController {
    arbiter: ModeArbiter,
    source: Box<dyn LandmarkSource>,
    command_rx: Receiver<ControllerCommand>,
    event_tx: Sender<ControllerEvent>,
}

impl GestureController {
    /// Create a controller with the given configuration
    pub fn new(
        config: &AppConfig,
        source: Box<dyn LandmarkSource>,
        actuator: Arc<dyn Actuator>,
    ) -> (Self, ControllerHandle) {
        let (command_tx, command_rx) = bounded(16);
        let (event_tx, event_rx) = bounded(256);

        let arbiter = ModeArbiter::new(
            config.arbiter.clone(),
            config.volume.clone(),
            config.scroll.clone(),
            actuator,
        );

        let controller = Self {
            arbiter,
            source,
            command_rx,
            event_tx,
        };
        let handle = ControllerHandle {
            command_tx,
            event_rx,
        };

        (controller, handle)
    }

    /// Run the loop on its own thread
    pub fn start(self) -> Result<JoinHandle<Result<LoopStats>>> {
        thread::Builder::new()
            .name("gesture-loop".to_string())
            .spawn(move || self.run())
            .map_err(|e| HandCtlError::ChannelError(format!("Failed to spawn gesture loop: {}", e)))
    }

    /// Run the loop on the current thread until quit, end of input or a
    /// capture failure
    pub fn run(mut self) -> Result<LoopStats> {
        info!("Gesture loop started");

        let mut timings = CycleTimings::new(300);
        let mut counter = FrameCounter::start();
        let mut actuator_errors = 0u64;
        let mut failure = None;

        loop {
            match self.command_rx.try_recv() {
                Ok(ControllerCommand::Shutdown) => {
                    info!("Gesture loop shutdown requested");
                    break;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    warn!("Command channel disconnected");
                    break;
                }
            }

            let observation = match self.source.next() {
                Ok(Acquisition::Frame(observation)) => observation,
                Ok(Acquisition::Idle) => {
                    counter.idle();
                    continue;
                }
                Ok(Acquisition::Finished) => {
                    info!("Landmark source finished");
                    break;
                }
                Err(e) => {
                    error!("Capture failed: {}", e);
                    self.emit(ControllerEvent::Error(e.to_string()));
                    failure = Some(e);
                    break;
                }
            };

            let started = Instant::now();
            counter.frame(observation.hand.is_some());

            let event = match observation.hand {
                Some(ref hand) => {
                    let report = self.arbiter.process(hand, observation.frame);
                    actuator_errors += report.actuator_errors as u64;
                    ControllerEvent::Cycle(report)
                }
                None => ControllerEvent::NoHand,
            };
            timings.push(started.elapsed());
            self.emit(event);
        }

        let stats = LoopStats {
            frames: counter.frames(),
            frames_with_hand: counter.hands(),
            idle_cycles: counter.idle_cycles(),
            actuator_errors,
            avg_cycle: timings.mean(),
            max_cycle: timings.worst(),
            fps: counter.fps(),
        };
        info!("Gesture loop stopped: {}", stats.summary());
        self.emit(ControllerEvent::Stopped(stats.clone()));

        match failure {
            Some(e) => Err(e),
            None => Ok(stats),
        }
    }

    fn emit(&self, event: ControllerEvent) {
        // Nobody listening or listener too slow; the loop never waits
        if self.event_tx.try_send(event).is_err() {
            debug!("Controller event dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuator::RecordingActuator;
    use crate::gesture::FrameSize;
    use crate::source::{ChannelSource, Observation};
    use std::time::Duration;

    #[test]
    fn test_shutdown_command_stops_loop() {
        let (source, _tx) = ChannelSource::new(4, Duration::from_millis(5));
        let (controller, handle) = GestureController::new(
            &AppConfig::default(),
            Box::new(source),
            Arc::new(RecordingActuator::new()),
        );
        let join = controller.start().unwrap();

        handle.send_command(ControllerCommand::Shutdown).unwrap();
        let stats = join.join().unwrap().unwrap();
        assert_eq!(stats.frames, 0);
    }

    #[test]
    fn test_frames_without_hand_do_nothing() {
        let recorder = RecordingActuator::new();
        let (source, tx) = ChannelSource::new(4, Duration::from_millis(5));
        let (controller, handle) = GestureController::new(
            &AppConfig::default(),
            Box::new(source),
            Arc::new(recorder.clone()),
        );

        tx.send(Observation::empty(FrameSize::new(640, 480))).unwrap();
        tx.send(Observation::empty(FrameSize::new(640, 480))).unwrap();
        drop(tx);

        let stats = controller.run().unwrap();
        assert_eq!(stats.frames, 2);
        assert_eq!(stats.frames_with_hand, 0);
        assert!(recorder.calls().is_empty());

        assert!(matches!(handle.try_recv_event(), Some(ControllerEvent::NoHand)));
    }

    struct BrokenCamera;

    impl LandmarkSource for BrokenCamera {
        fn next(&mut self) -> Result<Acquisition> {
            Err(HandCtlError::CaptureError("device unplugged".to_string()))
        }
    }

    #[test]
    fn test_capture_failure_is_fatal() {
        let (controller, handle) = GestureController::new(
            &AppConfig::default(),
            Box::new(BrokenCamera),
            Arc::new(RecordingActuator::new()),
        );
        let result = controller.run();
        assert!(matches!(result, Err(HandCtlError::CaptureError(_))));
        assert!(matches!(handle.try_recv_event(), Some(ControllerEvent::Error(_))));
    }
}
