//! Error handling for Riffbox
//!
//! Only configuration-boundary operations can fail. Block processing and
//! pitch detection are total: silence or a weak signal is an ordinary
//! return value, never an error.

use thiserror::Error;

/// Result type alias for Riffbox operations
pub type Result<T> = std::result::Result<T, RiffboxError>;

/// Main error type for Riffbox operations
#[derive(Error, Debug)]
pub enum RiffboxError {
    // Configuration Errors
    #[error("Unknown parameter '{param}' for effect {effect}")]
    UnknownParameter { effect: &'static str, param: String },

    #[error("Unknown effect type: {name}")]
    UnknownEffect { name: String },

    #[error("Chain index {index} out of range (chain length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // Control Handoff Errors
    #[error("Control queue is full; the audio thread is not draining messages")]
    ControlQueueFull,

    #[error("Audio engine has been dropped")]
    EngineDisconnected,

    // Audio File Errors
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RiffboxError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            RiffboxError::UnknownParameter { .. } => "UNKNOWN_PARAMETER",
            RiffboxError::UnknownEffect { .. } => "UNKNOWN_EFFECT",
            RiffboxError::IndexOutOfRange { .. } => "INDEX_OUT_OF_RANGE",
            RiffboxError::InvalidConfig { .. } => "INVALID_CONFIG",
            RiffboxError::ControlQueueFull => "CONTROL_QUEUE_FULL",
            RiffboxError::EngineDisconnected => "ENGINE_DISCONNECTED",
            RiffboxError::Wav(_) => "WAV_ERROR",
            RiffboxError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            RiffboxError::Io(_) => "IO_ERROR",
            RiffboxError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if retrying the same request later may succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(self, RiffboxError::ControlQueueFull)
    }

    /// Returns a suggested recovery action for this error
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            Self::UnknownParameter { .. } => {
                "Use one of the parameter names listed for this effect type"
            }
            Self::UnknownEffect { .. } => "Valid effects: Overdrive, Fuzz, Chorus, Delay, Reverb",
            Self::IndexOutOfRange { .. } => "Check the chain length before addressing a slot",
            Self::InvalidConfig { .. } => "Fix the configuration value and reload",
            Self::ControlQueueFull => "Wait for the next audio block and resend",
            Self::EngineDisconnected => "Recreate the engine and its controller",
            Self::Wav(_) | Self::UnsupportedFormat { .. } => {
                "Convert the input to a 16/24-bit integer or 32-bit float WAV file"
            }
            _ => "Check the error details and try again",
        }
    }
}
