use serde::{Deserialize, Serialize};

/// Configuration for the scroll trigger
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Half-height (px) of the band around the frame center that never scrolls
    pub dead_zone: i32,

    /// Notches sent per scroll event
    pub magnitude: i32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            dead_zone: 40,
            magnitude: 1,
        }
    }
}

/// Direction requested by the index finger's vertical position
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum ScrollIntent {
    Up,
    Down,
    #[default]
    None,
}

impl ScrollIntent {
    /// Signed scroll amount for a given magnitude
    pub fn delta(&self, magnitude: i32) -> i32 {
        match self {
            ScrollIntent::Up => magnitude,
            ScrollIntent::Down => -magnitude,
            ScrollIntent::None => 0,
        }
    }
}

impl std::fmt::Display for ScrollIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScrollIntent::Up => write!(f, "Up"),
            ScrollIntent::Down => write!(f, "Down"),
            ScrollIntent::None => write!(f, "None"),
        }
    }
}

/// Classify a fingertip y against the dead zone around `center_y`
pub fn scroll_intent(index_y: i32, center_y: i32, dead_zone: i32) -> ScrollIntent {
    if index_y < center_y.saturating_sub(dead_zone) {
        ScrollIntent::Up
    } else if index_y > center_y.saturating_add(dead_zone) {
        ScrollIntent::Down
    } else {
        ScrollIntent::None
    }
}

/// Level-triggered scroll trigger; fires every cycle the finger is outside the dead zone
#[derive(Clone, Debug, Default)]
pub struct ScrollTrigger {
    config: ScrollConfig,
}

impl ScrollTrigger {
    pub fn new(config: ScrollConfig) -> Self {
        Self { config }
    }

    pub fn evaluate(&self, index_y: i32, center_y: i32) -> ScrollIntent {
        scroll_intent(index_y, center_y, self.config.dead_zone)
    }

    pub fn magnitude(&self) -> i32 {
        self.config.magnitude
    }
}
