pub mod draft;
pub mod lifecycle;
pub mod manager;
pub mod models;
pub mod payload;
pub mod payment;
pub mod reference;
pub mod repository;

pub use draft::{BookingDraft, UploadState};
pub use lifecycle::{BookingAction, CheckOutPending};
pub use manager::BookingManager;
pub use models::{Booking, BookingStatus, Customer, PaymentMethod, PaymentStatus};
pub use payload::BookingPayload;
pub use reference::BookingReference;
pub use repository::{BookingFilter, BookingRepository, InMemoryBookingRepository};

use tourism_catalog::{CatalogError, ItemType};

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{item_type} not found: {id}")]
    ItemNotFound {
        item_type: ItemType,
        id: String,
    },

    #[error("Booking not found: {0}")]
    NotFound(String),

    #[error("Booking conflict: {0}")]
    Conflict(String),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("Upstream request failed with status {status}: {detail}")]
    UpstreamRequestFailed {
        status: u16,
        detail: String,
    },

    #[error("Upstream service unavailable: {0}")]
    Unavailable(String),
}

impl From<CatalogError> for BookingError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::ItemNotFound { item_type, id } => BookingError::ItemNotFound { item_type, id },
            CatalogError::UpstreamRequestFailed { status, detail } => {
                BookingError::UpstreamRequestFailed { status, detail }
            }
            CatalogError::Unavailable(msg) => BookingError::Unavailable(msg),
        }
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
