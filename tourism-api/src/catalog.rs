use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tourism_catalog::{destinations_with_room_type, plan_mass_update, MassUpdatePlan, MassUpdateRequest};
use tracing::info;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RoomTypeQuery {
    pub room_type: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/catalog/room-type-destinations", get(room_type_destinations))
        .route("/v1/catalog/mass-update/preview", post(preview_mass_update))
}

/// Destinations offering a room type, for the mass update destination picker
async fn room_type_destinations(
    State(state): State<AppState>,
    Query(query): Query<RoomTypeQuery>,
) -> Result<Json<Vec<String>>, AppError> {
    let accommodations = state.manager.catalog().list_accommodations(None).await?;
    Ok(Json(destinations_with_room_type(&accommodations, &query.room_type)))
}

async fn preview_mass_update(
    State(state): State<AppState>,
    Json(request): Json<MassUpdateRequest>,
) -> Result<Json<MassUpdatePlan>, AppError> {
    let accommodations = state.manager.catalog().list_accommodations(None).await?;
    let plan = plan_mass_update(&accommodations, &request)?;
    info!(
        "Mass update preview for {}: {} accommodations",
        plan.room_type,
        plan.targets.len()
    );
    Ok(Json(plan))
}
