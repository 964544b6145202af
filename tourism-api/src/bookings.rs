use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tourism_booking::lifecycle::{available_actions, coerce_additional_revenue};
use tourism_booking::{
    Booking, BookingAction, BookingDraft, BookingFilter, BookingStatus, CheckOutPending, PaymentStatus,
};
use tourism_shared::models::BookingTransitionedEvent;
use uuid::Uuid;
use crate::error::AppError;
use crate::middleware::StaffClaims;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Booking plus the values the bookings screen derives from it
#[derive(Debug, Serialize)]
pub struct BookingView {
    #[serde(flatten)]
    pub booking: Booking,
    pub effective_payment_status: PaymentStatus,
    pub balance_due: Decimal,
    pub available_actions: Vec<BookingAction>,
}

impl From<Booking> for BookingView {
    fn from(booking: Booking) -> Self {
        Self {
            effective_payment_status: booking.effective_payment_status(),
            balance_due: booking.balance_due(),
            available_actions: available_actions(booking.booking_status),
            booking,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransitionResponse {
    pub booking: BookingView,
    pub event: BookingTransitionedEvent,
}

impl From<(Booking, BookingTransitionedEvent)> for TransitionResponse {
    fn from((booking, event): (Booking, BookingTransitionedEvent)) -> Self {
        Self { booking: booking.into(), event }
    }
}

#[derive(Debug, Deserialize)]
pub struct CompleteCheckOutRequest {
    /// Free-form input from the dialog; anything non-numeric counts as zero
    #[serde(default)]
    pub additional_revenue: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct ExternalStatusRequest {
    pub status: BookingStatus,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", get(list_bookings).post(create_booking))
        .route("/v1/bookings/{id}", get(get_booking).put(edit_booking))
        .route("/v1/bookings/{id}/confirm", post(confirm_booking))
        .route("/v1/bookings/{id}/check-in", post(check_in))
        .route("/v1/bookings/{id}/check-out", post(initiate_check_out))
        .route("/v1/bookings/{id}/check-out/complete", post(complete_check_out))
        .route("/v1/bookings/{id}/cancel", post(cancel_booking))
        .route("/v1/bookings/{id}/status", post(apply_external_status))
}

// ============================================================================
// Handlers
// ============================================================================

async fn list_bookings(
    State(state): State<AppState>,
    Query(filter): Query<BookingFilter>,
) -> Result<Json<Vec<BookingView>>, AppError> {
    let bookings = state.manager.list_bookings(&filter).await?;
    Ok(Json(bookings.into_iter().map(BookingView::from).collect()))
}

async fn create_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<StaffClaims>,
    Json(draft): Json<BookingDraft>,
) -> Result<(StatusCode, Json<BookingView>), AppError> {
    let booking = state.manager.create_booking(draft, Some(claims.sub)).await?;
    Ok((StatusCode::CREATED, Json(booking.into())))
}

async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingView>, AppError> {
    let booking = state.manager.get_booking(id).await?;
    Ok(Json(booking.into()))
}

async fn edit_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<BookingDraft>,
) -> Result<Json<BookingView>, AppError> {
    let booking = state.manager.edit_booking(id, draft).await?;
    Ok(Json(booking.into()))
}

async fn confirm_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransitionResponse>, AppError> {
    Ok(Json(state.manager.confirm(id).await?.into()))
}

async fn check_in(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransitionResponse>, AppError> {
    Ok(Json(state.manager.check_in(id).await?.into()))
}

async fn cancel_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransitionResponse>, AppError> {
    Ok(Json(state.manager.cancel(id).await?.into()))
}

async fn initiate_check_out(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CheckOutPending>, AppError> {
    Ok(Json(state.manager.initiate_check_out(id).await?))
}

async fn complete_check_out(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CompleteCheckOutRequest>,
) -> Result<Json<TransitionResponse>, AppError> {
    let revenue = coerce_additional_revenue(&req.additional_revenue);
    Ok(Json(state.manager.complete_check_out(id, revenue).await?.into()))
}

async fn apply_external_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ExternalStatusRequest>,
) -> Result<Json<TransitionResponse>, AppError> {
    Ok(Json(state.manager.apply_external_status(id, req.status).await?.into()))
}
