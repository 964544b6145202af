use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;
use crate::models::{Booking, BookingStatus};
use crate::{BookingError, BookingResult};

/// List filter used by the bookings screen
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct BookingFilter {
    #[serde(default)]
    pub status: Option<BookingStatus>,
    /// Partner users only see bookings from their own channel
    #[serde(default)]
    pub source: Option<String>,
}

impl BookingFilter {
    pub fn matches(&self, booking: &Booking) -> bool {
        self.status.map_or(true, |s| booking.booking_status == s)
            && self.source.as_deref().map_or(true, |s| booking.source == s)
    }
}

/// Booking persistence. Concurrent edits are last-write-wins.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn save(&self, booking: &Booking) -> BookingResult<()>;

    async fn find(&self, id: Uuid) -> BookingResult<Option<Booking>>;

    async fn find_by_reference(&self, reference: &str) -> BookingResult<Option<Booking>>;

    async fn update(&self, booking: &Booking) -> BookingResult<()>;

    /// Newest first
    async fn list(&self, filter: &BookingFilter) -> BookingResult<Vec<Booking>>;

    /// Next free reference sequence for `year`, starting at 1
    async fn next_sequence(&self, year: i32) -> BookingResult<u32>;
}

#[derive(Default)]
struct Inner {
    bookings: HashMap<Uuid, Booking>,
    sequences: HashMap<i32, u32>,
}

/// In-memory repository for tests and the demo server
#[derive(Default)]
pub struct InMemoryBookingRepository {
    inner: RwLock<Inner>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with existing bookings; sequences continue after the highest seen
    pub fn with_bookings(bookings: Vec<Booking>) -> Self {
        let mut inner = Inner::default();
        for booking in bookings {
            let seq = inner.sequences.entry(booking.booking_reference.year()).or_insert(0);
            *seq = (*seq).max(booking.booking_reference.sequence());
            inner.bookings.insert(booking.id, booking);
        }
        Self { inner: RwLock::new(inner) }
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn save(&self, booking: &Booking) -> BookingResult<()> {
        let mut inner = self.inner.write().await;
        let duplicate = inner
            .bookings
            .values()
            .any(|b| b.id == booking.id || b.booking_reference == booking.booking_reference);
        if duplicate {
            return Err(BookingError::Conflict(format!(
                "Booking {} already exists",
                booking.booking_reference
            )));
        }
        inner.bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn find(&self, id: Uuid) -> BookingResult<Option<Booking>> {
        Ok(self.inner.read().await.bookings.get(&id).cloned())
    }

    async fn find_by_reference(&self, reference: &str) -> BookingResult<Option<Booking>> {
        let inner = self.inner.read().await;
        Ok(inner
            .bookings
            .values()
            .find(|b| b.booking_reference.as_str() == reference)
            .cloned())
    }

    async fn update(&self, booking: &Booking) -> BookingResult<()> {
        let mut inner = self.inner.write().await;
        match inner.bookings.get_mut(&booking.id) {
            Some(existing) => {
                *existing = booking.clone();
                Ok(())
            }
            None => Err(BookingError::NotFound(booking.id.to_string())),
        }
    }

    async fn list(&self, filter: &BookingFilter) -> BookingResult<Vec<Booking>> {
        let inner = self.inner.read().await;
        let mut found: Vec<Booking> = inner
            .bookings
            .values()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.booked_at.cmp(&a.booked_at));
        Ok(found)
    }

    async fn next_sequence(&self, year: i32) -> BookingResult<u32> {
        let mut inner = self.inner.write().await;
        let seq = inner.sequences.entry(year).or_insert(0);
        *seq += 1;
        Ok(*seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::booking;
    use crate::reference::BookingReference;
    use chrono::Duration;

    #[tokio::test]
    async fn test_save_find_update() {
        let repo = InMemoryBookingRepository::new();
        let mut b = booking(BookingStatus::Pending);
        repo.save(&b).await.unwrap();

        assert_eq!(repo.find(b.id).await.unwrap().unwrap(), b);
        assert!(repo.find_by_reference("TRP-2025-0002").await.unwrap().is_some());

        b.booking_status = BookingStatus::Confirmed;
        repo.update(&b).await.unwrap();
        assert_eq!(
            repo.find(b.id).await.unwrap().unwrap().booking_status,
            BookingStatus::Confirmed
        );
    }

    #[tokio::test]
    async fn test_duplicate_reference_rejected() {
        let repo = InMemoryBookingRepository::new();
        repo.save(&booking(BookingStatus::Pending)).await.unwrap();

        let err = repo.save(&booking(BookingStatus::Pending)).await.unwrap_err();
        assert!(matches!(err, BookingError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_unknown_booking() {
        let repo = InMemoryBookingRepository::new();
        let err = repo.update(&booking(BookingStatus::Pending)).await.unwrap_err();
        assert!(matches!(err, BookingError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_filters_and_orders() {
        let mut older = booking(BookingStatus::Confirmed);
        older.booking_reference = BookingReference::generate(2025, 1);
        older.source = "PORTAL".to_string();
        older.booked_at = older.booked_at - Duration::days(2);

        let newer = booking(BookingStatus::Pending);

        let mut cancelled = booking(BookingStatus::Cancelled);
        cancelled.booking_reference = BookingReference::generate(2025, 3);
        cancelled.booked_at = cancelled.booked_at - Duration::days(1);

        let repo = InMemoryBookingRepository::with_bookings(vec![older.clone(), newer.clone(), cancelled]);

        let all = repo.list(&BookingFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].id, newer.id);
        assert_eq!(all[2].id, older.id);

        let pending = repo
            .list(&BookingFilter { status: Some(BookingStatus::Pending), source: None })
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);

        let partner = repo
            .list(&BookingFilter { status: None, source: Some("MAKEMYTRIP".to_string()) })
            .await
            .unwrap();
        assert_eq!(partner.len(), 2);
        assert!(partner.iter().all(|b| b.source == "MAKEMYTRIP"));
    }

    #[tokio::test]
    async fn test_sequences_continue_after_seed() {
        let repo = InMemoryBookingRepository::with_bookings(vec![booking(BookingStatus::Pending)]);
        assert_eq!(repo.next_sequence(2025).await.unwrap(), 3);
        assert_eq!(repo.next_sequence(2025).await.unwrap(), 4);
        assert_eq!(repo.next_sequence(2026).await.unwrap(), 1);
    }
}
