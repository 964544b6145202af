use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tourism_catalog::{BookingRequest, ItemType};
use tourism_shared::Masked;
use crate::models::Customer;
use crate::payment::PaymentInput;
use crate::{BookingError, BookingResult};

/// State of the guest ID proof upload attached to the form
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UploadState {
    #[default]
    Idle,
    Uploading,
    Uploaded { url: String },
    Failed { reason: String },
}

/// Booking form submission (create and edit)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingDraft {
    #[serde(flatten)]
    pub request: BookingRequest,
    pub customer_name: String,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub customer_id_type: Option<String>,
    #[serde(default)]
    pub id_proof: UploadState,
    #[serde(flatten)]
    pub payment: PaymentInput,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub partner_id: Option<String>,
}

impl BookingDraft {
    /// Reject drafts that must not reach pricing or the booking service
    pub fn validate(&self) -> BookingResult<()> {
        let req = &self.request;

        if req.item_id.trim().is_empty() {
            return invalid(format!("Select a {} to book", req.item_type.as_str().to_lowercase()));
        }

        match (req.item_type, req.check_out) {
            (ItemType::Accommodation, None) => {
                return invalid("Check-out date is required for accommodation".to_string());
            }
            (ItemType::Accommodation, Some(out)) if out <= req.check_in => {
                return invalid(format!("Check-out {} must be after check-in {}", out, req.check_in));
            }
            (_, Some(out)) if out < req.check_in => {
                return invalid(format!("End date {} is before start date {}", out, req.check_in));
            }
            _ => {}
        }

        validate_counts(req)?;
        if self.customer_name.trim().is_empty() {
            return invalid("Lead guest name is required".to_string());
        }
        if self.customer_phone.trim().is_empty() {
            return invalid("Lead guest phone is required".to_string());
        }
        if self.id_proof == UploadState::Uploading {
            return invalid("ID proof is still uploading".to_string());
        }
        Ok(())
    }

    /// Single-day bookings end on the day they start
    pub fn travel_end_date(&self) -> NaiveDate {
        self.request.check_out.unwrap_or(self.request.check_in)
    }

    /// Guest record; `existing_proof_url` is kept unless a new upload finished
    pub fn customer(&self, existing_proof_url: Option<String>) -> Customer {
        let id_proof_url = match &self.id_proof {
            UploadState::Uploaded { url } => Some(url.clone()),
            _ => existing_proof_url,
        };
        Customer {
            name: self.customer_name.trim().to_string(),
            email: self
                .customer_email
                .as_ref()
                .filter(|e| !e.trim().is_empty())
                .map(|e| Masked(e.trim().to_string())),
            phone: Masked(self.customer_phone.trim().to_string()),
            id_type: self.customer_id_type.clone(),
            id_proof_url,
        }
    }
}

/// A selected item is never priced for zero units or zero adults
pub fn validate_counts(req: &BookingRequest) -> BookingResult<()> {
    if req.unit_count < 1 {
        return invalid("At least one unit is required".to_string());
    }
    if req.pax_adults < 1 {
        return invalid("At least one adult is required".to_string());
    }
    Ok(())
}

fn invalid(msg: String) -> BookingResult<()> {
    Err(BookingError::Validation(msg))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn stay_draft() -> BookingDraft {
        BookingDraft {
            request: BookingRequest {
                item_type: ItemType::Accommodation,
                item_id: "a1".to_string(),
                destination_id: None,
                check_in: date(2025, 1, 20),
                check_out: Some(date(2025, 1, 23)),
                unit_count: 1,
                pax_adults: 2,
                pax_children: 0,
            },
            customer_name: "Rahul Sharma".to_string(),
            customer_email: Some("rahul@example.com".to_string()),
            customer_phone: "9876543210".to_string(),
            customer_id_type: Some("AADHAR".to_string()),
            id_proof: UploadState::Idle,
            payment: PaymentInput::default(),
            source: None,
            partner_id: None,
        }
    }
}
