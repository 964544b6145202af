use axum::{extract::State, routing::post, Json, Router};
use tourism_catalog::{BookingRequest, PricingBreakdown};
use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/pricing/quote", post(quote))
}

/// Live quote for the booking form. No item selected prices as empty.
async fn quote(
    State(state): State<AppState>,
    Json(request): Json<BookingRequest>,
) -> Result<Json<PricingBreakdown>, AppError> {
    Ok(Json(state.manager.quote(&request).await?))
}
