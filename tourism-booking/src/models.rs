use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use tourism_catalog::ItemType;
use tourism_shared::Masked;
use crate::payment;
use crate::reference::BookingReference;

/// Booking status in the lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
    Completed,
    Failed,
    OnHold,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::CheckedIn => "CHECKED_IN",
            BookingStatus::CheckedOut => "CHECKED_OUT",
            BookingStatus::Cancelled => "CANCELLED",
            BookingStatus::Completed => "COMPLETED",
            BookingStatus::Failed => "FAILED",
            BookingStatus::OnHold => "ON_HOLD",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(BookingStatus::Pending),
            "CONFIRMED" => Ok(BookingStatus::Confirmed),
            "CHECKED_IN" => Ok(BookingStatus::CheckedIn),
            "CHECKED_OUT" => Ok(BookingStatus::CheckedOut),
            "CANCELLED" => Ok(BookingStatus::Cancelled),
            "COMPLETED" => Ok(BookingStatus::Completed),
            "FAILED" => Ok(BookingStatus::Failed),
            "ON_HOLD" => Ok(BookingStatus::OnHold),
            other => Err(format!("Unknown booking status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Partial,
    Paid,
    Failed,
    Refunded,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Upi,
    Card,
    BankTransfer,
}

/// Lead guest of a booking
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub name: String,
    pub email: Option<Masked<String>>,
    pub phone: Masked<String>,
    pub id_type: Option<String>,
    pub id_proof_url: Option<String>,
}

/// Back-office projection of a booking owned by the booking service.
///
/// Never deleted; cancellation is a status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: Uuid,
    pub booking_reference: BookingReference,
    pub source: String,
    pub partner_id: Option<String>,
    pub item_type: ItemType,
    pub item_id: String,
    pub item_name: Option<String>,
    pub destination_id: Option<String>,
    pub booking_status: BookingStatus,
    /// Set explicitly by staff. `None` only on legacy records.
    pub payment_status: Option<PaymentStatus>,
    pub payment_method: Option<PaymentMethod>,
    pub total_amount: Decimal,
    pub amount_paid: Decimal,
    pub additional_revenue: Decimal,
    pub currency: String,
    pub travel_start_date: NaiveDate,
    pub travel_end_date: NaiveDate,
    pub unit_count: u32,
    pub pax_adults: u32,
    pub pax_children: u32,
    pub customer: Customer,
    pub booked_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub booking_channel: Option<String>,
}

impl Booking {
    /// Explicit status when staff set one, otherwise inferred from the amounts
    pub fn effective_payment_status(&self) -> PaymentStatus {
        self.payment_status.unwrap_or_else(|| {
            payment::derive_payment_status(self.total_amount, Some(self.amount_paid))
        })
    }

    pub fn balance_due(&self) -> Decimal {
        payment::balance_due(self.total_amount, self.amount_paid)
    }

    pub(crate) fn update_status(&mut self, status: BookingStatus) {
        self.booking_status = status;
        self.updated_at = Utc::now();
    }
}
