pub mod arbiter;
pub mod scroll;
pub mod volume;

pub use arbiter::{ArbiterConfig, CycleReport, GestureMode, ModeArbiter};
pub use scroll::{scroll_intent, ScrollConfig, ScrollIntent, ScrollTrigger};
pub use volume::{map_distance_to_level, VolumeConfig, VolumeMapper, VolumeState};
