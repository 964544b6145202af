use async_trait::async_trait;
use std::future::Future;
use tourism_booking::{
    Booking, BookingFilter, BookingPayload, BookingReference, BookingRepository, BookingResult,
};
use tracing::{info, warn};
use uuid::Uuid;
use crate::http::ApiClient;

/// Booking service client
pub struct RestBookingRepository {
    api: ApiClient,
}

impl RestBookingRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Every matching record, paged with `skip`/`limit`
    async fn fetch(&self, query: &[(&str, String)]) -> BookingResult<Vec<Booking>> {
        let payloads = collect_pages(PAGE_SIZE, |skip, limit| {
            let mut paged = query.to_vec();
            paged.push(("skip", skip.to_string()));
            paged.push(("limit", limit.to_string()));
            async move { self.api.get_query::<Vec<BookingPayload>>("/bookings/", &paged).await }
        })
        .await?;
        Ok(into_bookings(payloads))
    }
}

/// The booking service caps a page at 100 rows
const PAGE_SIZE: usize = 100;

/// Request pages until one comes back short
async fn collect_pages<T, E, F, Fut>(page_size: usize, mut fetch_page: F) -> Result<Vec<T>, E>
where
    F: FnMut(usize, usize) -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>>,
{
    let mut all = Vec::new();
    loop {
        let page = fetch_page(all.len(), page_size).await?;
        let done = page.len() < page_size;
        all.extend(page);
        if done {
            return Ok(all);
        }
    }
}

fn filter_query(filter: &BookingFilter) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(status) = filter.status {
        query.push(("status", status.as_str().to_string()));
    }
    if let Some(source) = &filter.source {
        query.push(("source", source.clone()));
    }
    query
}

/// Records the back office cannot read are skipped, not fatal to the list
fn into_bookings(payloads: Vec<BookingPayload>) -> Vec<Booking> {
    payloads
        .into_iter()
        .filter_map(|payload| {
            let id = payload.id;
            match Booking::try_from(payload) {
                Ok(booking) => Some(booking),
                Err(e) => {
                    warn!("Skipping booking {}: {}", id, e);
                    None
                }
            }
        })
        .collect()
}

fn next_sequence_after(bookings: &[Booking], year: i32) -> u32 {
    bookings
        .iter()
        .map(|b| &b.booking_reference)
        .filter(|r| r.year() == year)
        .map(BookingReference::sequence)
        .max()
        .unwrap_or(0)
        + 1
}

#[async_trait]
impl BookingRepository for RestBookingRepository {
    async fn save(&self, booking: &Booking) -> BookingResult<()> {
        let _: serde_json::Value = self
            .api
            .post_json("/bookings/", &BookingPayload::from(booking))
            .await?;
        info!("Booking {} stored upstream", booking.booking_reference);
        Ok(())
    }

    async fn find(&self, id: Uuid) -> BookingResult<Option<Booking>> {
        let payload: Option<BookingPayload> = self.api.get_optional(&format!("/bookings/{}", id)).await?;
        payload.map(Booking::try_from).transpose()
    }

    async fn find_by_reference(&self, reference: &str) -> BookingResult<Option<Booking>> {
        let bookings = self.fetch(&[("booking_reference", reference.to_string())]).await?;
        Ok(bookings
            .into_iter()
            .find(|b| b.booking_reference.as_str() == reference))
    }

    async fn update(&self, booking: &Booking) -> BookingResult<()> {
        let _: serde_json::Value = self
            .api
            .put_json(&format!("/bookings/{}", booking.id), &BookingPayload::from(booking))
            .await?;
        Ok(())
    }

    async fn list(&self, filter: &BookingFilter) -> BookingResult<Vec<Booking>> {
        // Upstream filtering is best effort; apply the filter again locally
        let mut bookings: Vec<Booking> = self
            .fetch(&filter_query(filter))
            .await?
            .into_iter()
            .filter(|b| filter.matches(b))
            .collect();
        bookings.sort_by(|a, b| b.booked_at.cmp(&a.booked_at));
        Ok(bookings)
    }

    async fn next_sequence(&self, year: i32) -> BookingResult<u32> {
        let bookings = self.fetch(&[]).await?;
        Ok(next_sequence_after(&bookings, year))
    }
}
