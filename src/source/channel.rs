use super::{Acquisition, LandmarkSource, Observation};
use crate::Result;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

/// Source fed by an external detector thread over a channel
pub struct ChannelSource {
    rx: Receiver<Observation>,
    poll_timeout: Duration,
}

impl ChannelSource {
    /// Create the source and the sender the detector pushes into
    pub fn new(capacity: usize, poll_timeout: Duration) -> (Self, Sender<Observation>) {
        let (tx, rx) = bounded(capacity);
        (Self { rx, poll_timeout }, tx)
    }
}

impl LandmarkSource for ChannelSource {
    fn next(&mut self) -> Result<Acquisition> {
        match self.rx.recv_timeout(self.poll_timeout) {
            Ok(observation) => Ok(Acquisition::Frame(observation)),
            Err(RecvTimeoutError::Timeout) => Ok(Acquisition::Idle),
            Err(RecvTimeoutError::Disconnected) => Ok(Acquisition::Finished),
        }
    }
}
