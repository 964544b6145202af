use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use tourism_catalog::ItemType;
use tourism_shared::Masked;
use crate::models::{Booking, BookingStatus, Customer, PaymentMethod, PaymentStatus};
use crate::reference::BookingReference;
use crate::{BookingError, BookingResult};

/// Flat booking record as exchanged with the booking service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingPayload {
    pub id: Uuid,
    pub booking_reference: String,
    pub source: String,
    #[serde(default)]
    pub partner_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accommodation_id: Option<String>,
    #[serde(default)]
    pub destination_id: Option<String>,
    #[serde(default)]
    pub package_name: Option<String>,
    pub booking_status: BookingStatus,
    #[serde(deserialize_with = "travel_date")]
    pub travel_start_date: NaiveDate,
    #[serde(deserialize_with = "travel_date")]
    pub travel_end_date: NaiveDate,
    #[serde(default = "one")]
    pub unit_count: u32,
    pub pax_adults: u32,
    #[serde(default)]
    pub pax_children: u32,
    pub total_amount: Decimal,
    #[serde(default)]
    pub amount_paid: Option<Decimal>,
    #[serde(default)]
    pub additional_revenue: Option<Decimal>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    pub currency: String,
    pub booked_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    pub customer_name: String,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub customer_id_type: Option<String>,
    #[serde(default)]
    pub customer_id_proof_url: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub booking_channel: Option<String>,
}

fn one() -> u32 { 1 }

/// Accepts `2025-01-20` as well as full timestamps like `2025-01-20T00:00:00Z`
fn travel_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let day = raw.split('T').next().unwrap_or_default();
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(serde::de::Error::custom)
}

impl From<&Booking> for BookingPayload {
    fn from(b: &Booking) -> Self {
        let item_id = Some(b.item_id.clone());
        let (package_id, experience_id, accommodation_id) = match b.item_type {
            ItemType::Package => (item_id, None, None),
            ItemType::Experience => (None, item_id, None),
            ItemType::Accommodation => (None, None, item_id),
        };

        Self {
            id: b.id,
            booking_reference: b.booking_reference.to_string(),
            source: b.source.clone(),
            partner_id: b.partner_id.clone(),
            package_id,
            experience_id,
            accommodation_id,
            destination_id: b.destination_id.clone(),
            package_name: b.item_name.clone(),
            booking_status: b.booking_status,
            travel_start_date: b.travel_start_date,
            travel_end_date: b.travel_end_date,
            unit_count: b.unit_count,
            pax_adults: b.pax_adults,
            pax_children: b.pax_children,
            total_amount: b.total_amount,
            amount_paid: Some(b.amount_paid),
            additional_revenue: Some(b.additional_revenue),
            payment_status: b.payment_status,
            payment_method: b.payment_method,
            currency: b.currency.clone(),
            booked_at: b.booked_at,
            updated_at: Some(b.updated_at),
            customer_name: b.customer.name.clone(),
            customer_email: b.customer.email.as_ref().map(|e| e.reveal().clone()),
            customer_phone: Some(b.customer.phone.reveal().clone()),
            customer_id_type: b.customer.id_type.clone(),
            customer_id_proof_url: b.customer.id_proof_url.clone(),
            created_by: b.created_by.clone(),
            booking_channel: b.booking_channel.clone(),
        }
    }
}

impl TryFrom<BookingPayload> for Booking {
    type Error = BookingError;

    fn try_from(p: BookingPayload) -> BookingResult<Self> {
        let booking_reference: BookingReference = p
            .booking_reference
            .parse()
            .map_err(BookingError::Validation)?;

        let (item_type, item_id) = match (p.package_id, p.experience_id, p.accommodation_id) {
            (Some(id), _, _) => (ItemType::Package, id),
            (None, Some(id), _) => (ItemType::Experience, id),
            (None, None, Some(id)) => (ItemType::Accommodation, id),
            (None, None, None) => {
                return Err(BookingError::Validation(format!(
                    "Booking {} has no booked item",
                    booking_reference
                )))
            }
        };

        Ok(Booking {
            id: p.id,
            booking_reference,
            source: p.source,
            partner_id: p.partner_id,
            item_type,
            item_id,
            item_name: p.package_name,
            destination_id: p.destination_id,
            booking_status: p.booking_status,
            payment_status: p.payment_status,
            payment_method: p.payment_method,
            total_amount: p.total_amount,
            amount_paid: p.amount_paid.unwrap_or_default(),
            additional_revenue: p.additional_revenue.unwrap_or_default().max(Decimal::ZERO),
            currency: p.currency,
            travel_start_date: p.travel_start_date,
            travel_end_date: p.travel_end_date,
            unit_count: p.unit_count,
            pax_adults: p.pax_adults,
            pax_children: p.pax_children,
            customer: Customer {
                name: p.customer_name,
                email: p.customer_email.map(Masked),
                phone: Masked(p.customer_phone.unwrap_or_default()),
                id_type: p.customer_id_type,
                id_proof_url: p.customer_id_proof_url,
            },
            booked_at: p.booked_at,
            updated_at: p.updated_at.unwrap_or(p.booked_at),
            created_by: p.created_by,
            booking_channel: p.booking_channel,
        })
    }
}
