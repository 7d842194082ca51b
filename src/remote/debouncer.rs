//! Shake detection for the phone remote
//!
//! Counts large sample-to-sample jumps of the accelerometer x axis over a
//! sliding window. A deliberate shake produces many of them; tilting the
//! phone produces few or none.

use ringbuf::{traits::*, HeapRb};
use serde::Deserialize;

/// Configuration for the motion debouncer
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Samples kept in the sliding window
    pub window_size: usize,

    /// Minimum |x[i] - x[i-1]| (m/s²) counted as a shake jump
    pub wave_threshold: f32,

    /// y acceleration (m/s²) above which the phone counts as raised
    pub raise_threshold: f32,

    /// A window fires when its jump count exceeds this
    pub min_crossings: usize,

    /// Sensor polling interval in milliseconds
    pub poll_interval_ms: u64,

    /// Address of the desktop listener
    pub server: String,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            window_size: 10,
            wave_threshold: 2.0,
            raise_threshold: 8.0,
            min_crossings: 3,
            poll_interval_ms: 100,
            server: "192.168.1.14:5000".to_string(),
        }
    }
}

/// One accelerometer reading in m/s²
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct MotionSample {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl MotionSample {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// What a single sample produced
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionOutcome {
    /// Phone held up; the window was not touched
    Raised,
    /// Shake detected; the window has been cleared
    Next,
    /// Nothing yet
    Idle,
}

/// Bounded FIFO of recent x samples
pub struct MotionWindow {
    samples: HeapRb<f32>,
}

impl MotionWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: HeapRb::new(capacity),
        }
    }

    /// Append a sample, evicting the oldest when full
    pub fn push(&mut self, sample: f32) {
        if self.samples.is_full() {
            let _ = self.samples.try_pop();
        }
        let _ = self.samples.try_push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.occupied_len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.samples.is_full()
    }

    pub fn capacity(&self) -> usize {
        self.samples.capacity().get()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Number of successive absolute differences greater than `threshold`
    pub fn count_jumps(&self, threshold: f32) -> usize {
        self.samples
            .iter()
            .zip(self.samples.iter().skip(1))
            .filter(|(prev, next)| (*next - *prev).abs() > threshold)
            .count()
    }
}

/// Sliding-window shake detector that re-arms after firing
pub struct MotionDebouncer {
    config: MotionConfig,
    window: MotionWindow,
}

impl MotionDebouncer {
    pub fn new(config: MotionConfig) -> Self {
        let window = MotionWindow::new(config.window_size);
        Self { config, window }
    }

    /// Feed one accelerometer reading
    ///
    /// The window is evaluated only once it holds `window_size` samples, and
    /// never holds more.
    pub fn push(&mut self, sample: MotionSample) -> MotionOutcome {
        if sample.y > self.config.raise_threshold {
            return MotionOutcome::Raised;
        }

        self.window.push(sample.x);
        if !self.window.is_full() {
            return MotionOutcome::Idle;
        }

        if self.window.count_jumps(self.config.wave_threshold) > self.config.min_crossings {
            self.window.clear();
            return MotionOutcome::Next;
        }

        MotionOutcome::Idle
    }

    pub fn window(&self) -> &MotionWindow {
        &self.window
    }
}

impl Default for MotionDebouncer {
    fn default() -> Self {
        Self::new(MotionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(debouncer: &mut MotionDebouncer, xs: &[f32]) -> Vec<MotionOutcome> {
        xs.iter()
            .map(|&x| debouncer.push(MotionSample::new(x, 0.0, 9.8)))
            .collect()
    }

    #[test]
    fn test_shake_fires_on_full_window() {
        let mut debouncer = MotionDebouncer::default();
        let outcomes = feed(&mut debouncer, &[0.0, 5.0, 0.0, 5.0, 0.0, 5.0, 0.0, 5.0, 0.0, 5.0]);

        assert!(outcomes[..9].iter().all(|o| *o == MotionOutcome::Idle));
        assert_eq!(outcomes[9], MotionOutcome::Next);
        assert!(debouncer.window().is_empty());
    }

    #[test]
    fn test_small_jitter_never_fires() {
        let mut debouncer = MotionDebouncer::default();
        let xs: Vec<f32> = (0..50).map(|i| (i % 2) as f32).collect();
        assert!(feed(&mut debouncer, &xs)
            .iter()
            .all(|o| *o == MotionOutcome::Idle));
    }

    #[test]
    fn test_exactly_min_crossings_does_not_fire() {
        let mut debouncer = MotionDebouncer::default();
        // three jumps of 5, the rest flat
        let xs = [0.0, 5.0, 0.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0];
        assert_eq!(*feed(&mut debouncer, &xs).last().unwrap(), MotionOutcome::Idle);
    }

    #[test]
    fn test_rearms_after_firing() {
        let mut debouncer = MotionDebouncer::default();
        let shake = [0.0, 5.0, 0.0, 5.0, 0.0, 5.0, 0.0, 5.0, 0.0, 5.0];
        assert_eq!(*feed(&mut debouncer, &shake).last().unwrap(), MotionOutcome::Next);

        // one more sample is not enough to fire again
        assert_eq!(feed(&mut debouncer, &[0.0]), vec![MotionOutcome::Idle]);
        assert_eq!(debouncer.window().len(), 1);

        let second = feed(&mut debouncer, &shake[1..]);
        assert_eq!(*second.last().unwrap(), MotionOutcome::Next);
    }

    #[test]
    fn test_raise_short_circuits_window() {
        let mut debouncer = MotionDebouncer::default();
        feed(&mut debouncer, &[1.0, 2.0]);
        let outcome = debouncer.push(MotionSample::new(100.0, 9.5, 0.0));
        assert_eq!(outcome, MotionOutcome::Raised);
        assert_eq!(debouncer.window().len(), 2);
    }

    #[test]
    fn test_window_never_exceeds_capacity() {
        let mut window = MotionWindow::new(10);
        for i in 0..25 {
            window.push(i as f32);
            assert!(window.len() <= window.capacity());
        }
        assert_eq!(window.len(), 10);
        assert_eq!(window.count_jumps(0.5), 9);
    }

    #[test]
    fn test_jumps_follow_arrival_order_after_eviction() {
        let mut window = MotionWindow::new(4);
        for x in [0.0, 0.0, 0.0, 0.0, 10.0] {
            window.push(x);
        }
        assert_eq!(window.count_jumps(2.0), 1);

        for _ in 0..3 {
            window.push(10.0);
        }
        assert_eq!(window.count_jumps(2.0), 0);
    }
}
