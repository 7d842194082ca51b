//! Gesture loop bookkeeping
//!
//! The loop keeps the last few hundred cycle latencies and a running frame
//! count, and turns both into a [`LoopStats`] line when it stops.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Latencies of the most recent control cycles, oldest evicted first
#[derive(Debug)]
pub struct CycleTimings {
    recent: VecDeque<Duration>,
    keep: usize,
}

impl CycleTimings {
    pub fn new(keep: usize) -> Self {
        Self {
            recent: VecDeque::with_capacity(keep),
            keep: keep.max(1),
        }
    }

    /// Add the latency of one finished cycle
    pub fn push(&mut self, cycle: Duration) {
        while self.recent.len() >= self.keep {
            self.recent.pop_front();
        }
        self.recent.push_back(cycle);
    }

    /// Mean of the kept cycles, zero before the first one
    pub fn mean(&self) -> Duration {
        match self.recent.len() {
            0 => Duration::ZERO,
            n => self.recent.iter().sum::<Duration>() / n as u32,
        }
    }

    /// Slowest kept cycle
    pub fn worst(&self) -> Duration {
        self.recent.iter().copied().max().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.recent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recent.is_empty()
    }
}

/// Counts frames and measures the rate they arrive at
#[derive(Debug)]
pub struct FrameCounter {
    started: Instant,
    frames: u64,
    idle: u64,
    hands: u64,
}

impl FrameCounter {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            frames: 0,
            idle: 0,
            hands: 0,
        }
    }

    /// A frame arrived; `with_hand` if the detector found one
    pub fn frame(&mut self, with_hand: bool) {
        self.frames += 1;
        if with_hand {
            self.hands += 1;
        }
    }

    /// A cycle without a frame
    pub fn idle(&mut self) {
        self.idle += 1;
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn hands(&self) -> u64 {
        self.hands
    }

    pub fn idle_cycles(&self) -> u64 {
        self.idle
    }

    /// Frames per second since start
    pub fn fps(&self) -> f32 {
        let secs = self.started.elapsed().as_secs_f32();
        if secs <= 0.0 {
            return 0.0;
        }
        self.frames as f32 / secs
    }
}

/// Summary reported when the control loop stops
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LoopStats {
    pub frames: u64,
    pub frames_with_hand: u64,
    pub idle_cycles: u64,
    pub actuator_errors: u64,
    pub avg_cycle: Duration,
    pub max_cycle: Duration,
    pub fps: f32,
}

impl LoopStats {
    pub fn summary(&self) -> String {
        format!(
            "{} frames ({} with hand, {} idle) | avg {:.2}ms max {:.2}ms | FPS: {:.0} | actuator errors: {}",
            self.frames,
            self.frames_with_hand,
            self.idle_cycles,
            self.avg_cycle.as_secs_f64() * 1000.0,
            self.max_cycle.as_secs_f64() * 1000.0,
            self.fps,
            self.actuator_errors
        )
    }
}
