use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;
use tourism_catalog::{CatalogLookup, PricingBreakdown, PricingEngine};
use tourism_shared::models::BookingTransitionedEvent;
use crate::draft::{self, BookingDraft};
use crate::lifecycle::{self, BookingAction, CheckOutPending};
use crate::models::{Booking, BookingStatus};
use crate::payment::{self, PaymentInput};
use crate::reference::BookingReference;
use crate::repository::{BookingFilter, BookingRepository};
use crate::{BookingError, BookingResult};

pub const DEFAULT_SOURCE: &str = "WALK_IN";
pub const DEFAULT_CURRENCY: &str = "INR";

/// Creates, edits and moves bookings through their lifecycle.
///
/// Storage and catalog are injected; the manager itself only holds open
/// check-out confirmations.
pub struct BookingManager {
    repository: Arc<dyn BookingRepository>,
    catalog: Arc<dyn CatalogLookup>,
    engine: PricingEngine,
    pending_checkouts: Mutex<HashMap<Uuid, CheckOutPending>>,
    default_source: String,
    currency: String,
}

impl BookingManager {
    pub fn new(repository: Arc<dyn BookingRepository>, catalog: Arc<dyn CatalogLookup>) -> Self {
        Self {
            repository,
            catalog,
            engine: PricingEngine::new(),
            pending_checkouts: Mutex::new(HashMap::new()),
            default_source: DEFAULT_SOURCE.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }

    pub fn with_default_source(mut self, source: impl Into<String>) -> Self {
        self.default_source = source.into();
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn catalog(&self) -> &Arc<dyn CatalogLookup> {
        &self.catalog
    }

    /// Live price for the booking form
    pub async fn quote(&self, request: &tourism_catalog::BookingRequest) -> BookingResult<PricingBreakdown> {
        if !request.item_id.trim().is_empty() {
            draft::validate_counts(request)?;
        }
        let (breakdown, _) = self.engine.quote(self.catalog.as_ref(), request).await?;
        Ok(breakdown)
    }

    /// Staff-created bookings are confirmed immediately
    pub async fn create_booking(&self, draft: BookingDraft, created_by: Option<String>) -> BookingResult<Booking> {
        draft.validate()?;
        let (pricing, item) = self.engine.quote(self.catalog.as_ref(), &draft.request).await?;
        ensure_payable(&pricing)?;
        let (payment_status, amount_paid) = payment::resolve_payment(pricing.total, &draft.payment)?;

        let now = Utc::now();
        let sequence = self.repository.next_sequence(now.year()).await?;
        let source = draft.source.clone().unwrap_or_else(|| self.default_source.clone());

        let booking = Booking {
            id: Uuid::new_v4(),
            booking_reference: BookingReference::generate(now.year(), sequence),
            partner_id: draft.partner_id.clone(),
            item_type: draft.request.item_type,
            item_id: draft.request.item_id.clone(),
            item_name: item.as_ref().map(|i| i.name().to_string()),
            destination_id: draft.request.destination_id.clone(),
            booking_status: BookingStatus::Confirmed,
            payment_status: Some(payment_status),
            payment_method: draft.payment.payment_method,
            total_amount: pricing.total,
            amount_paid,
            additional_revenue: Decimal::ZERO,
            currency: self.currency.clone(),
            travel_start_date: draft.request.check_in,
            travel_end_date: draft.travel_end_date(),
            unit_count: draft.request.unit_count,
            pax_adults: draft.request.pax_adults,
            pax_children: draft.request.pax_children,
            customer: draft.customer(None),
            booked_at: now,
            updated_at: now,
            created_by,
            booking_channel: Some(source.clone()),
            source,
        };

        self.repository.save(&booking).await?;
        info!(
            "Booking created: {} ({} {}, total {})",
            booking.booking_reference, booking.item_type, booking.item_id, booking.total_amount
        );
        Ok(booking)
    }

    /// Reprice and update an existing booking.
    ///
    /// Reference, status, additional revenue and booking time are kept. A
    /// payment status set explicitly on the booking is never replaced by one
    /// inferred from amounts; only a new explicit status changes it. The
    /// recorded amount paid carries over when the form gives none.
    pub async fn edit_booking(&self, id: Uuid, draft: BookingDraft) -> BookingResult<Booking> {
        draft.validate()?;
        let mut booking = self.get_booking(id).await?;

        let (pricing, item) = self.engine.quote(self.catalog.as_ref(), &draft.request).await?;
        ensure_payable(&pricing)?;

        let payment_input = match (draft.payment.payment_status, booking.payment_status) {
            (None, stored) => PaymentInput {
                payment_status: stored,
                partial_amount: draft.payment.partial_amount.or(Some(booking.amount_paid)),
                payment_method: draft.payment.payment_method,
            },
            _ => draft.payment.clone(),
        };
        let (payment_status, amount_paid) = payment::resolve_payment(pricing.total, &payment_input)?;

        booking.item_type = draft.request.item_type;
        booking.item_id = draft.request.item_id.clone();
        booking.item_name = item.as_ref().map(|i| i.name().to_string());
        booking.destination_id = draft.request.destination_id.clone();
        // Legacy records stay derived from amounts until staff pick a status
        booking.payment_status = payment_input.payment_status.map(|_| payment_status);
        booking.payment_method = payment_input.payment_method.or(booking.payment_method);
        booking.total_amount = pricing.total;
        booking.amount_paid = amount_paid;
        booking.travel_start_date = draft.request.check_in;
        booking.travel_end_date = draft.travel_end_date();
        booking.unit_count = draft.request.unit_count;
        booking.pax_adults = draft.request.pax_adults;
        booking.pax_children = draft.request.pax_children;
        booking.customer = draft.customer(booking.customer.id_proof_url.take());
        if let Some(partner_id) = draft.partner_id {
            booking.partner_id = Some(partner_id);
        }
        booking.updated_at = Utc::now();

        self.repository.update(&booking).await?;
        info!("Booking updated: {} (total {})", booking.booking_reference, booking.total_amount);
        Ok(booking)
    }

    pub async fn get_booking(&self, id: Uuid) -> BookingResult<Booking> {
        self.repository
            .find(id)
            .await?
            .ok_or_else(|| BookingError::NotFound(id.to_string()))
    }

    pub async fn list_bookings(&self, filter: &BookingFilter) -> BookingResult<Vec<Booking>> {
        self.repository.list(filter).await
    }

    pub async fn confirm(&self, id: Uuid) -> BookingResult<(Booking, BookingTransitionedEvent)> {
        self.transition(id, BookingAction::Confirm).await
    }

    pub async fn check_in(&self, id: Uuid) -> BookingResult<(Booking, BookingTransitionedEvent)> {
        self.transition(id, BookingAction::CheckIn).await
    }

    pub async fn cancel(&self, id: Uuid) -> BookingResult<(Booking, BookingTransitionedEvent)> {
        self.transition(id, BookingAction::Cancel).await
    }

    /// Open the check-out confirmation; re-opening replaces an earlier one
    pub async fn initiate_check_out(&self, id: Uuid) -> BookingResult<CheckOutPending> {
        let booking = self.get_booking(id).await?;
        let pending = lifecycle::initiate_check_out(&booking)?;
        self.pending_checkouts.lock().await.insert(id, pending.clone());
        info!("Check-out initiated: {}", booking.booking_reference);
        Ok(pending)
    }

    /// Consumes the confirmation opened by [`Self::initiate_check_out`].
    ///
    /// The confirmation is only dropped once the checked-out booking is
    /// stored, so a failed upstream update can be retried.
    pub async fn complete_check_out(
        &self,
        id: Uuid,
        additional_revenue: Decimal,
    ) -> BookingResult<(Booking, BookingTransitionedEvent)> {
        let mut booking = self.get_booking(id).await?;

        let mut pending_checkouts = self.pending_checkouts.lock().await;
        let pending = match pending_checkouts.get(&id) {
            Some(p) => p.clone(),
            None => {
                warn!("Check-out completed without initiation: {}", booking.booking_reference);
                return Err(BookingError::InvalidTransition {
                    from: booking.booking_status,
                    to: BookingStatus::CheckedOut,
                });
            }
        };

        let event = lifecycle::complete_check_out(&mut booking, pending, additional_revenue)?;
        self.repository.update(&booking).await?;
        pending_checkouts.remove(&id);
        drop(pending_checkouts);

        info!(
            "Booking {}: {} -> {} (additional revenue {})",
            event.booking_reference, event.from_status, event.to_status, booking.additional_revenue
        );
        Ok((booking, event))
    }

    /// Status pushed by an external system (COMPLETED, FAILED, ON_HOLD)
    pub async fn apply_external_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> BookingResult<(Booking, BookingTransitionedEvent)> {
        let mut booking = self.get_booking(id).await?;
        let event = lifecycle::apply_external(&mut booking, status)?;
        self.repository.update(&booking).await?;
        info!("Booking {}: {} -> {} (external)", event.booking_reference, event.from_status, event.to_status);
        Ok((booking, event))
    }

    async fn transition(
        &self,
        id: Uuid,
        action: BookingAction,
    ) -> BookingResult<(Booking, BookingTransitionedEvent)> {
        let mut booking = self.get_booking(id).await?;
        let event = lifecycle::apply(&mut booking, action).map_err(|e| {
            warn!("Rejected {:?} on {}: {}", action, booking.booking_reference, e);
            e
        })?;
        self.repository.update(&booking).await?;
        info!("Booking {}: {} -> {}", event.booking_reference, event.from_status, event.to_status);
        Ok((booking, event))
    }
}

fn ensure_payable(pricing: &PricingBreakdown) -> BookingResult<()> {
    if pricing.total <= Decimal::ZERO {
        return Err(BookingError::Validation("Booking total must be greater than zero".to_string()));
    }
    Ok(())
}
