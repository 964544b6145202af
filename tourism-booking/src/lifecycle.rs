use chrono::{DateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use tourism_shared::models::BookingTransitionedEvent;
use crate::models::{Booking, BookingStatus};
use crate::{BookingError, BookingResult};

/// Staff actions that move a booking through its lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingAction {
    Confirm,
    CheckIn,
    CheckOut,
    Cancel,
}

impl BookingAction {
    pub fn target(&self) -> BookingStatus {
        match self {
            BookingAction::Confirm => BookingStatus::Confirmed,
            BookingAction::CheckIn => BookingStatus::CheckedIn,
            BookingAction::CheckOut => BookingStatus::CheckedOut,
            BookingAction::Cancel => BookingStatus::Cancelled,
        }
    }
}

/// `(from, action, to)`. Anything not listed is an invalid transition.
const TRANSITIONS: &[(BookingStatus, BookingAction, BookingStatus)] = &[
    (BookingStatus::Pending, BookingAction::Confirm, BookingStatus::Confirmed),
    (BookingStatus::Confirmed, BookingAction::CheckIn, BookingStatus::CheckedIn),
    (BookingStatus::CheckedIn, BookingAction::CheckOut, BookingStatus::CheckedOut),
    (BookingStatus::Pending, BookingAction::Cancel, BookingStatus::Cancelled),
    (BookingStatus::Confirmed, BookingAction::Cancel, BookingStatus::Cancelled),
];

/// Statuses only external systems (payment gateway, partner channel) may set
const EXTERNAL_STATUSES: &[BookingStatus] = &[
    BookingStatus::Completed,
    BookingStatus::Failed,
    BookingStatus::OnHold,
];

pub fn next_status(from: BookingStatus, action: BookingAction) -> Option<BookingStatus> {
    TRANSITIONS
        .iter()
        .find(|(f, a, _)| *f == from && *a == action)
        .map(|(_, _, to)| *to)
}

/// Actions a UI may offer for a booking in `status`
pub fn available_actions(status: BookingStatus) -> Vec<BookingAction> {
    TRANSITIONS
        .iter()
        .filter(|(f, _, _)| *f == status)
        .map(|(_, a, _)| *a)
        .collect()
}

/// Apply `action` or reject it with `InvalidTransition`
pub fn apply(booking: &mut Booking, action: BookingAction) -> BookingResult<BookingTransitionedEvent> {
    let from = booking.booking_status;
    let to = next_status(from, action).ok_or(BookingError::InvalidTransition {
        from,
        to: action.target(),
    })?;
    booking.update_status(to);
    Ok(transitioned(booking, from, to))
}

pub fn confirm(booking: &mut Booking) -> BookingResult<BookingTransitionedEvent> {
    apply(booking, BookingAction::Confirm)
}

pub fn check_in(booking: &mut Booking) -> BookingResult<BookingTransitionedEvent> {
    apply(booking, BookingAction::CheckIn)
}

pub fn cancel(booking: &mut Booking) -> BookingResult<BookingTransitionedEvent> {
    apply(booking, BookingAction::Cancel)
}

/// Open check-out confirmation. Nothing changes on the booking until
/// [`complete_check_out`] consumes it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckOutPending {
    pub booking_id: Uuid,
    pub booking_reference: String,
    pub additional_revenue: Decimal,
    pub opened_at: DateTime<Utc>,
}

pub fn initiate_check_out(booking: &Booking) -> BookingResult<CheckOutPending> {
    if next_status(booking.booking_status, BookingAction::CheckOut).is_none() {
        return Err(BookingError::InvalidTransition {
            from: booking.booking_status,
            to: BookingStatus::CheckedOut,
        });
    }
    Ok(CheckOutPending {
        booking_id: booking.id,
        booking_reference: booking.booking_reference.to_string(),
        additional_revenue: Decimal::ZERO,
        opened_at: Utc::now(),
    })
}

pub fn complete_check_out(
    booking: &mut Booking,
    pending: CheckOutPending,
    additional_revenue: Decimal,
) -> BookingResult<BookingTransitionedEvent> {
    if pending.booking_id != booking.id {
        return Err(BookingError::Validation(format!(
            "Check-out was opened for {}, not {}",
            pending.booking_reference, booking.booking_reference
        )));
    }
    let event = apply(booking, BookingAction::CheckOut)?;
    booking.additional_revenue = additional_revenue.max(Decimal::ZERO);
    Ok(event)
}

/// Record a status reported by an external system.
///
/// Only COMPLETED, FAILED and ON_HOLD can be set this way, and never on a
/// cancelled or checked-out booking.
pub fn apply_external(booking: &mut Booking, status: BookingStatus) -> BookingResult<BookingTransitionedEvent> {
    let from = booking.booking_status;
    let terminal = matches!(from, BookingStatus::Cancelled | BookingStatus::CheckedOut);
    if terminal || !EXTERNAL_STATUSES.contains(&status) {
        return Err(BookingError::InvalidTransition { from, to: status });
    }
    booking.update_status(status);
    Ok(transitioned(booking, from, status))
}

/// Additional revenue as typed into the check-out dialog.
///
/// Numbers and numeric strings are accepted; anything else, and anything
/// negative, counts as zero.
pub fn coerce_additional_revenue(raw: &serde_json::Value) -> Decimal {
    let value = match raw {
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(Decimal::from)
            .or_else(|| n.as_f64().and_then(Decimal::from_f64)),
        serde_json::Value::String(s) => s.trim().parse::<Decimal>().ok(),
        _ => None,
    };
    value.filter(|v| *v > Decimal::ZERO).unwrap_or(Decimal::ZERO)
}

fn transitioned(booking: &Booking, from: BookingStatus, to: BookingStatus) -> BookingTransitionedEvent {
    BookingTransitionedEvent::new(booking.id, booking.booking_reference.to_string(), from.as_str(), to.as_str())
}
