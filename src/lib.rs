pub mod actuator;
pub mod control;
pub mod gesture;
pub mod integration;
pub mod remote;
pub mod source;
pub mod utils;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum HandCtlError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Capture error: {0}")]
    CaptureError(String),

    #[error("Actuator error: {0}")]
    ActuatorError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Channel error: {0}")]
    ChannelError(String),

    #[error("IO error: {0}")]
    IOError(String),
}

impl From<std::io::Error> for HandCtlError {
    fn from(e: std::io::Error) -> Self {
        HandCtlError::IOError(e.to_string())
    }
}

impl From<toml::de::Error> for HandCtlError {
    fn from(e: toml::de::Error) -> Self {
        HandCtlError::ConfigError(e.to_string())
    }
}

impl From<serde_json::Error> for HandCtlError {
    fn from(e: serde_json::Error) -> Self {
        HandCtlError::InvalidInput(e.to_string())
    }
}

impl HandCtlError {
    /// Check if this error is recoverable
    ///
    /// Recoverable errors cost at most one control cycle or one remote
    /// connection; everything else stops startup.
    pub fn is_recoverable(&self) -> bool {
        match self {
            // A bad landmark set only spoils the current frame
            HandCtlError::InvalidInput(_) => true,
            // No capture device means there is nothing to drive the loop
            HandCtlError::CaptureError(_) => false,
            // A missed volume/scroll update is corrected by the next frame
            HandCtlError::ActuatorError(_) => true,
            // One bad connection must not stop the listener
            HandCtlError::NetworkError(_) => true,
            HandCtlError::ConfigError(_) => false,
            HandCtlError::ChannelError(_) => false,
            HandCtlError::IOError(_) => false,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            HandCtlError::InvalidInput(_) => {
                "Hand tracking produced an incomplete frame; skipping it.".to_string()
            }
            HandCtlError::CaptureError(_) => {
                "Could not read from the capture device. Please check the camera.".to_string()
            }
            HandCtlError::ActuatorError(_) => {
                "Could not apply the gesture to the system. Retrying on the next frame."
                    .to_string()
            }
            HandCtlError::NetworkError(_) => {
                "Remote control connection failed.".to_string()
            }
            HandCtlError::ConfigError(_) => {
                "Configuration error. Please check settings.".to_string()
            }
            HandCtlError::ChannelError(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
            HandCtlError::IOError(_) => "File system error occurred.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HandCtlError>;
