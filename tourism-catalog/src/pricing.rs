use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use crate::item::{Accommodation, BookingItem, ItemType};
use crate::lookup::{CatalogError, CatalogLookup};

/// Adults included in the base price of one unit.
///
/// NOTE: this ignores `Accommodation::base_occupancy`. Kept as-is until product
/// decides which one is authoritative.
pub const BASE_ADULTS_PER_UNIT: u32 = 2;

/// Children pay half the adult rate on packages and experiences.
pub const CHILD_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

fn one() -> u32 { 1 }

/// Inputs of the booking form that affect price
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingRequest {
    pub item_type: ItemType,
    #[serde(default)]
    pub item_id: String,
    /// Scopes accommodation lookups
    #[serde(default)]
    pub destination_id: Option<String>,
    pub check_in: NaiveDate,
    #[serde(default)]
    pub check_out: Option<NaiveDate>,
    #[serde(default = "one")]
    pub unit_count: u32,
    #[serde(default = "one")]
    pub pax_adults: u32,
    #[serde(default)]
    pub pax_children: u32,
}

impl BookingRequest {
    /// Billable nights. Same-day and open-ended stays bill one night.
    pub fn nights(&self) -> u32 {
        let days = self
            .check_out
            .map(|out| (out - self.check_in).num_days().unsigned_abs())
            .unwrap_or(0);
        u32::try_from(days).unwrap_or(u32::MAX).max(1)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceLine {
    pub label: String,
    pub value: Decimal,
}

impl PriceLine {
    fn new(label: &str, value: impl Into<Decimal>) -> Self {
        Self { label: label.to_string(), value: value.into() }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PricingBreakdown {
    pub breakdown: Vec<PriceLine>,
    pub total: Decimal,
}

impl PricingBreakdown {
    /// Nothing selected yet
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.breakdown.is_empty()
    }

    pub fn line(&self, label: &str) -> Option<Decimal> {
        self.breakdown.iter().find(|l| l.label == label).map(|l| l.value)
    }
}

/// Computes the payable amount for a booking form.
///
/// Pure and synchronous; safe to call on every form change. No rounding is
/// applied, callers format for display.
#[derive(Debug, Clone, Copy, Default)]
pub struct PricingEngine;

impl PricingEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn price(&self, request: &BookingRequest, item: Option<&BookingItem>) -> PricingBreakdown {
        if request.item_id.trim().is_empty() {
            return PricingBreakdown::empty();
        }

        match item {
            None => PricingBreakdown::empty(),
            Some(BookingItem::Accommodation(acc)) => self.price_accommodation(acc, request),
            Some(BookingItem::Package(pkg)) => {
                self.price_per_person(pkg.price_inr.unwrap_or_default(), request)
            }
            Some(BookingItem::Experience(exp)) => {
                self.price_per_person(exp.price_inr.unwrap_or_default(), request)
            }
        }
    }

    /// Resolve the requested item through the catalog and price it.
    ///
    /// An empty `item_id` is the "no selection" state and prices to zero; an id
    /// the catalog does not know is an error.
    pub async fn quote(
        &self,
        catalog: &dyn CatalogLookup,
        request: &BookingRequest,
    ) -> Result<(PricingBreakdown, Option<BookingItem>), CatalogError> {
        if request.item_id.trim().is_empty() {
            return Ok((PricingBreakdown::empty(), None));
        }

        let item = catalog
            .resolve(request.item_type, &request.item_id, request.destination_id.as_deref())
            .await?
            .ok_or_else(|| CatalogError::ItemNotFound {
                item_type: request.item_type,
                id: request.item_id.clone(),
            })?;

        Ok((self.price(request, Some(&item)), Some(item)))
    }

    fn price_accommodation(&self, acc: &Accommodation, request: &BookingRequest) -> PricingBreakdown {
        let nights = request.nights();
        let nights_dec = Decimal::from(nights);

        let mut total = acc.base_price * nights_dec * Decimal::from(request.unit_count);
        let mut breakdown = vec![
            PriceLine::new("Base Rate", acc.base_price),
            PriceLine::new("Nights", nights),
            PriceLine::new("Units", request.unit_count),
        ];

        let base_capacity = request.unit_count.saturating_mul(BASE_ADULTS_PER_UNIT);
        let extra_boarders = request.pax_adults.saturating_sub(base_capacity);
        let extra_rate = acc.extra_boarder_price.unwrap_or_default();

        if extra_boarders > 0 && extra_rate > Decimal::ZERO {
            let extra_cost = Decimal::from(extra_boarders) * extra_rate * nights_dec;
            total += extra_cost;
            breakdown.push(PriceLine::new("Extra Boarders", extra_boarders));
            breakdown.push(PriceLine::new("Extra Boarder Rate", extra_rate));
            breakdown.push(PriceLine::new("Extra Boarder Cost", extra_cost));
        }

        PricingBreakdown { breakdown, total }
    }

    fn price_per_person(&self, price: Decimal, request: &BookingRequest) -> PricingBreakdown {
        let child_price = price * CHILD_RATE;
        let total = price * Decimal::from(request.pax_adults)
            + child_price * Decimal::from(request.pax_children);

        PricingBreakdown {
            breakdown: vec![
                PriceLine::new("Adult Price", price),
                PriceLine::new("Adults", request.pax_adults),
                PriceLine::new("Children Price", child_price),
                PriceLine::new("Children", request.pax_children),
            ],
            total,
        }
    }
}
