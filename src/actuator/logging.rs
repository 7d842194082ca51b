use super::Actuator;
use crate::Result;
use parking_lot::Mutex;
use tracing::{debug, info};

/// Dry-run actuator that reports every call through tracing
///
/// Used when no OS binding is wired in. Mute changes are logged at info
/// level only when the state actually flips, so the per-frame unmute calls
/// stay quiet.
#[derive(Debug, Default)]
pub struct LoggingActuator {
    muted: Mutex<Option<bool>>,
}

impl LoggingActuator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Actuator for LoggingActuator {
    fn set_volume(&self, level: f32, level_db: f32) -> Result<()> {
        debug!("Volume -> {:.3} ({:.2} dB)", level, level_db);
        Ok(())
    }

    fn set_mute(&self, muted: bool) -> Result<()> {
        let mut last = self.muted.lock();
        if *last != Some(muted) {
            info!("{}", if muted { "Muted" } else { "Unmuted" });
            *last = Some(muted);
        }
        Ok(())
    }

    fn scroll(&self, delta: i32) -> Result<()> {
        debug!("Scroll {:+}", delta);
        Ok(())
    }

    fn press_next(&self) -> Result<()> {
        info!("Next page");
        Ok(())
    }
}
