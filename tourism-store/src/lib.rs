//! Configuration and REST clients for the auth, catalog and booking services.

pub mod app_config;
pub mod auth_client;
pub mod booking_client;
pub mod catalog_client;
pub mod error;
pub mod http;

pub use app_config::Config;
pub use auth_client::{AuthClient, PortalUser, TokenResponse};
pub use booking_client::RestBookingRepository;
pub use catalog_client::RestCatalog;
pub use error::StoreError;
pub use http::ApiClient;
