use thiserror::Error;
use tourism_booking::BookingError;
use tourism_catalog::CatalogError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Upstream request failed ({status}): {detail}")]
    UpstreamRequestFailed { status: u16, detail: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Could not decode response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UpstreamRequestFailed { status, detail } => {
                CatalogError::UpstreamRequestFailed { status, detail }
            }
            other => CatalogError::Unavailable(other.to_string()),
        }
    }
}

impl From<StoreError> for BookingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UpstreamRequestFailed { status, detail } => {
                BookingError::UpstreamRequestFailed { status, detail }
            }
            other => BookingError::Unavailable(other.to_string()),
        }
    }
}
