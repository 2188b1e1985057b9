/// Error types for every fallible subsystem
///
/// All errors are `Clone` because they travel inside `Message`
/// values between background tasks and the UI thread.
use thiserror::Error;

/// Failures while acquiring a photo (camera or upload)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// The user or the OS refused camera access
    #[error("camera access was denied: {0}")]
    Denied(String),

    /// No usable camera could be opened
    #[error("no camera available: {0}")]
    NoDevice(String),

    /// The stream broke while running
    #[error("camera stream failed: {0}")]
    Stream(String),

    /// Snapshot requested before the first frame arrived
    #[error("no camera frame available yet")]
    NoFrame,

    /// The still image could not be encoded
    #[error("failed to encode photo: {0}")]
    Encode(String),

    /// The chosen file could not be read
    #[error("failed to read file: {0}")]
    Read(String),

    /// The chosen file is not an image the decoder understands
    #[error("not a supported image: {0}")]
    Decode(String),
}

impl CaptureError {
    /// Message shown to the user in the notice dialog
    pub fn user_message(&self) -> String {
        match self {
            CaptureError::Denied(_) | CaptureError::NoDevice(_) => {
                "Camera access is required to take photos!".to_string()
            }
            CaptureError::Read(_) | CaptureError::Decode(_) => {
                "That file doesn't look like a photo. Try a JPG or PNG.".to_string()
            }
            other => format!("Something went wrong with the camera: {}", other),
        }
    }
}

/// Failures of the result producer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("analysis backend failed: {0}")]
    Backend(String),
}

/// Failures anywhere in the share pipeline
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShareError {
    #[error("failed to capture the result: {0}")]
    Screenshot(String),

    #[error("failed to encode the result image: {0}")]
    Encode(String),

    #[error("save was cancelled")]
    Cancelled,

    #[error("failed to write the result image: {0}")]
    Write(String),

    #[error("native sharing is not available")]
    Unavailable,
}

/// Failures while loading the config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
