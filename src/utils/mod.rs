pub mod perf;

pub use perf::{CycleTimings, FrameCounter, LoopStats};
