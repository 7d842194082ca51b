//! Replay of recorded landmark streams
//!
//! Each line of the file is one frame:
//! `{"width": 640, "height": 480, "landmarks": [{"x": 0.5, "y": 0.5}, ...]}`
//! with `"landmarks": null` (or the key omitted) for frames without a hand.

use super::{Acquisition, LandmarkSource, Observation};
use crate::gesture::{FrameSize, Landmark, LandmarkSet};
use crate::{HandCtlError, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct ReplayRecord {
    width: u32,
    height: u32,
    #[serde(default)]
    landmarks: Option<Vec<Landmark>>,
}

/// Parse a single recorded frame
pub fn parse_record(line: &str) -> Result<Observation> {
    let record: ReplayRecord = serde_json::from_str(line)?;
    let hand = record.landmarks.map(LandmarkSet::new).transpose()?;
    Ok(Observation::new(FrameSize::new(record.width, record.height), hand))
}

/// Source that replays a JSON-lines recording at a fixed frame interval
pub struct ReplaySource<R: BufRead> {
    lines: Lines<R>,
    frame_interval: Duration,
    last_frame: Option<Instant>,
    line_no: usize,
}

impl ReplaySource<BufReader<File>> {
    /// Open a recording; a missing file is a capture failure
    pub fn open(path: impl AsRef<Path>, frame_interval: Duration) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            HandCtlError::CaptureError(format!("Failed to open replay {:?}: {}", path, e))
        })?;
        info!("Replaying landmarks from {:?}", path);
        Ok(Self::from_reader(BufReader::new(file), frame_interval))
    }
}

impl<R: BufRead> ReplaySource<R> {
    pub fn from_reader(reader: R, frame_interval: Duration) -> Self {
        Self {
            lines: reader.lines(),
            frame_interval,
            last_frame: None,
            line_no: 0,
        }
    }

    fn pace(&mut self) {
        if let Some(last) = self.last_frame {
            let elapsed = last.elapsed();
            if elapsed < self.frame_interval {
                std::thread::sleep(self.frame_interval - elapsed);
            }
        }
        self.last_frame = Some(Instant::now());
    }
}

impl<R: BufRead + Send> LandmarkSource for ReplaySource<R> {
    fn next(&mut self) -> Result<Acquisition> {
        let line = match self.lines.next() {
            Some(line) => line.map_err(|e| HandCtlError::CaptureError(e.to_string()))?,
            None => return Ok(Acquisition::Finished),
        };
        self.line_no += 1;

        if line.trim().is_empty() {
            return Ok(Acquisition::Idle);
        }

        self.pace();

        match parse_record(&line) {
            Ok(observation) => Ok(Acquisition::Frame(observation)),
            Err(e) => {
                warn!("Skipping replay line {}: {}", self.line_no, e);
                Ok(Acquisition::Idle)
            }
        }
    }
}
