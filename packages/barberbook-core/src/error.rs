//! Error types shared across the core library.

use reqwest::StatusCode;

/// Failure turning user or wire input into a typed value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid price range '{0}', expected a value like \"$25-45\"")]
    PriceRange(String),

    #[error("price range minimum {min} exceeds maximum {max}")]
    InvertedPriceRange { min: u32, max: u32 },

    #[error("unknown {field} value '{value}'")]
    UnknownValue { field: &'static str, value: String },
}

/// Failure reading or writing the persisted credential.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Could not find a configuration directory")]
    NoConfigDir,

    #[error("Credential file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Credential data is malformed: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Keyring access failed: {0}")]
    Keyring(String),
}

/// Failure of an outbound API call. Passed to the caller unchanged.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request timed out")]
    Timeout,

    #[error("Request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Server returned error: {status} - {body}")]
    Status { status: StatusCode, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ApiError {
    /// HTTP status of the failed call, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Transport(e)
        }
    }
}

/// Failure building a booking from a service selection.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BookingError {
    #[error("Select at least one service before booking")]
    NoServicesSelected,

    #[error("Service {service_id} is not offered by barber {barber_id}")]
    UnknownService { barber_id: u32, service_id: u32 },
}
