use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

/// Portal user types allowed into the back office
pub const STAFF_USER_TYPES: &[&str] = &["PORTAL_ADMIN", "PORTAL_STAFF", "ASSET_MANAGER"];

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StaffClaims {
    pub sub: String,
    pub user_type: String,
    pub exp: usize,
}

// ============================================================================
// Staff Authentication Middleware
// ============================================================================

pub async fn staff_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Authentication("Missing bearer token".to_string()))?;

    let token_data = decode::<StaffClaims>(
        token,
        &DecodingKey::from_secret(state.auth.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| AppError::Authentication(format!("Invalid token: {}", e)))?;

    if !STAFF_USER_TYPES.contains(&token_data.claims.user_type.as_str()) {
        return Err(AppError::Authorization(format!(
            "User type {} has no back-office access",
            token_data.claims.user_type
        )));
    }

    req.extensions_mut().insert(token_data.claims);

    Ok(next.run(req).await)
}
