use std::sync::Arc;
use tourism_booking::BookingManager;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
}

#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<BookingManager>,
    pub auth: AuthConfig,
}

impl AppState {
    pub fn new(manager: BookingManager, jwt_secret: impl Into<String>) -> Self {
        Self {
            manager: Arc::new(manager),
            auth: AuthConfig { secret: jwt_secret.into() },
        }
    }
}
