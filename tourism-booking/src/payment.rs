use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use crate::models::{PaymentMethod, PaymentStatus};
use crate::{BookingError, BookingResult};

/// Payment fields as submitted with the booking form
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PaymentInput {
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    /// Only read for PARTIAL, or to infer a status on legacy records
    #[serde(default)]
    pub partial_amount: Option<Decimal>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
}

/// Infer a payment status from the amounts alone.
///
/// PAID when the full total is paid, PARTIAL for anything strictly between
/// zero and the total, PENDING otherwise (nothing paid, unknown amount, or an
/// amount above the total).
pub fn derive_payment_status(total_amount: Decimal, amount_paid: Option<Decimal>) -> PaymentStatus {
    match amount_paid {
        Some(paid) if paid > Decimal::ZERO && paid == total_amount => PaymentStatus::Paid,
        Some(paid) if paid > Decimal::ZERO && paid < total_amount => PaymentStatus::Partial,
        _ => PaymentStatus::Pending,
    }
}

pub fn balance_due(total_amount: Decimal, amount_paid: Decimal) -> Decimal {
    (total_amount - amount_paid).max(Decimal::ZERO)
}

/// Turn the submitted payment fields into `(status, amount_paid)`.
///
/// An explicit status always wins and fixes the amount (PAID pays the full
/// total, PENDING pays nothing). Without one the status is inferred from
/// `partial_amount`.
pub fn resolve_payment(total_amount: Decimal, input: &PaymentInput) -> BookingResult<(PaymentStatus, Decimal)> {
    match input.payment_status {
        Some(PaymentStatus::Paid) => Ok((PaymentStatus::Paid, total_amount)),
        Some(PaymentStatus::Partial) => {
            let paid = input.partial_amount.ok_or_else(|| {
                BookingError::Validation("Enter the amount paid for a partial payment".to_string())
            })?;
            if paid <= Decimal::ZERO || paid >= total_amount {
                return Err(BookingError::Validation(format!(
                    "Partial payment must be between 0 and {}, got {}",
                    total_amount, paid
                )));
            }
            Ok((PaymentStatus::Partial, paid))
        }
        Some(status) => Ok((status, Decimal::ZERO)),
        None => {
            let paid = input.partial_amount.unwrap_or_default().max(Decimal::ZERO);
            Ok((derive_payment_status(total_amount, Some(paid)), paid))
        }
    }
}
