use thiserror::Error;

/// Why a POI lookup produced no usable records.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, TLS, or body transfer failure.
    #[error("POI request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("POI service returned HTTP {status}")]
    Status { status: u16 },
    #[error("malformed POI response: {0}")]
    Malformed(String),
}

impl FetchError {
    pub fn malformed(message: impl Into<String>) -> Self {
        FetchError::Malformed(message.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport(_) => "transport",
            FetchError::Status { .. } => "status",
            FetchError::Malformed(_) => "malformed",
        }
    }
}
