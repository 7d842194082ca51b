//! Phone-side uplink
//!
//! Polls an accelerometer at a fixed interval, runs the shake debouncer and
//! opens a fresh connection to the desktop listener for every detected
//! shake. Nothing waits for an acknowledgement; a failed send is logged and
//! dropped, the next shake retries.

use super::debouncer::{MotionConfig, MotionDebouncer, MotionOutcome, MotionSample};
use crate::{HandCtlError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Literal sent to the desktop for a shake
pub const NEXT_COMMAND: &str = "NEXT";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// One poll of the accelerometer
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SensorReading {
    Sample(MotionSample),
    /// The sensor had nothing this tick
    Missing,
    /// The sensor is gone; stop polling
    Closed,
}

/// Accelerometer boundary
pub trait MotionSensor: Send {
    fn read(&mut self) -> SensorReading;
}

/// Sensor replaying JSON-lines `{"x":..,"y":..,"z":..}` samples
pub struct ReplaySensor<R: BufRead> {
    lines: Lines<R>,
}

impl ReplaySensor<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            HandCtlError::CaptureError(format!("Failed to open motion replay {:?}: {}", path, e))
        })?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> ReplaySensor<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl<R: BufRead + Send> MotionSensor for ReplaySensor<R> {
    fn read(&mut self) -> SensorReading {
        match self.lines.next() {
            None | Some(Err(_)) => SensorReading::Closed,
            Some(Ok(line)) => match serde_json::from_str::<MotionSample>(&line) {
                Ok(sample) => SensorReading::Sample(sample),
                Err(_) => SensorReading::Missing,
            },
        }
    }
}

/// Open a connection, send `command` and close
pub async fn send_command(server: &str, command: &str) -> Result<()> {
    debug!("Sending {} to {}", command, server);
    let mut stream = tokio::time::timeout(CONNECT_TIMEOUT, TcpStream::connect(server))
        .await
        .map_err(|_| HandCtlError::NetworkError(format!("connect to {} timed out", server)))?
        .map_err(|e| HandCtlError::NetworkError(format!("connect to {} failed: {}", server, e)))?;

    stream
        .write_all(command.as_bytes())
        .await
        .map_err(|e| HandCtlError::NetworkError(format!("send failed: {}", e)))?;
    let _ = stream.shutdown().await;
    Ok(())
}

/// Counters from one uplink run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UplinkStats {
    pub samples: usize,
    pub raised: usize,
    pub next_sent: usize,
    pub send_failures: usize,
}

/// Polling loop tying a sensor to the debouncer and the uplink
pub struct MotionClient<S: MotionSensor> {
    config: MotionConfig,
    sensor: S,
    debouncer: MotionDebouncer,
}

impl<S: MotionSensor> MotionClient<S> {
    pub fn new(config: MotionConfig, sensor: S) -> Self {
        let debouncer = MotionDebouncer::new(config.clone());
        Self {
            config,
            sensor,
            debouncer,
        }
    }

    /// Poll until the sensor closes
    pub async fn run(mut self) -> UplinkStats {
        let mut stats = UplinkStats::default();
        let mut ticker =
            tokio::time::interval(Duration::from_millis(self.config.poll_interval_ms.max(1)));
        // A slow send must not be followed by a burst of back-to-back reads
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!("Motion uplink sending to {}", self.config.server);

        loop {
            ticker.tick().await;
            let sample = match self.sensor.read() {
                SensorReading::Sample(sample) => sample,
                SensorReading::Missing => continue,
                SensorReading::Closed => break,
            };
            stats.samples += 1;

            match self.debouncer.push(sample) {
                MotionOutcome::Raised => {
                    stats.raised += 1;
                    debug!("Hand raised");
                }
                MotionOutcome::Next => {
                    info!("Wave detected -> {}", NEXT_COMMAND);
                    match send_command(&self.config.server, NEXT_COMMAND).await {
                        Ok(()) => stats.next_sent += 1,
                        Err(e) => {
                            stats.send_failures += 1;
                            warn!("Could not reach {}: {}", self.config.server, e);
                        }
                    }
                }
                MotionOutcome::Idle => {}
            }
        }

        info!(
            "Motion uplink finished: {} samples, {} sent, {} failed",
            stats.samples, stats.next_sent, stats.send_failures
        );
        stats
    }
}
