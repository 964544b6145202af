use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of thing a booking is made against
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemType {
    Accommodation,
    Package,
    Experience,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Accommodation => "ACCOMMODATION",
            ItemType::Package => "PACKAGE",
            ItemType::Experience => "EXPERIENCE",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ACCOMMODATION" => Ok(ItemType::Accommodation),
            "PACKAGE" => Ok(ItemType::Package),
            "EXPERIENCE" => Ok(ItemType::Experience),
            other => Err(format!("Unknown item type: {}", other)),
        }
    }
}

fn default_base_occupancy() -> u32 { 2 }
fn default_max_occupancy() -> u32 { 3 }
fn default_total_units() -> u32 { 1 }
fn default_active() -> bool { true }

/// A bookable unit type (room, tent, cottage, dormitory) at a destination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Accommodation {
    pub id: String,
    pub name: String,
    pub destination_id: String,
    #[serde(rename = "type", default)]
    pub room_type: Option<String>,
    pub base_price: Decimal,
    /// Carried from the catalog but not used by pricing, which assumes two adults per unit.
    #[serde(default = "default_base_occupancy")]
    pub base_occupancy: u32,
    #[serde(default)]
    pub extra_boarder_price: Option<Decimal>,
    #[serde(default = "default_max_occupancy")]
    pub max_occupancy: u32,
    #[serde(default = "default_total_units")]
    pub total_units: u32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "PackageRecord")]
pub struct Package {
    pub id: String,
    pub name: String,
    pub duration_days: Option<u32>,
    pub price_inr: Option<Decimal>,
    pub is_active: bool,
}

/// Package as the catalog sends it. The service calls the price
/// `base_price`, the admin fixtures `price_inr`; some records carry both.
#[derive(Deserialize)]
struct PackageRecord {
    id: String,
    name: String,
    #[serde(default)]
    duration_days: Option<u32>,
    #[serde(default)]
    base_price: Option<Decimal>,
    #[serde(default)]
    price_inr: Option<Decimal>,
    #[serde(default = "default_active")]
    is_active: bool,
}

impl From<PackageRecord> for Package {
    fn from(record: PackageRecord) -> Self {
        Package {
            id: record.id,
            name: record.name,
            duration_days: record.duration_days,
            // A zero base price falls back to price_inr
            price_inr: record.base_price.filter(|p| !p.is_zero()).or(record.price_inr),
            is_active: record.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Experience {
    pub id: String,
    #[serde(alias = "name")]
    pub title: String,
    #[serde(default)]
    pub price_inr: Option<Decimal>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// A resolved catalog entry, one variant per [`ItemType`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "item_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingItem {
    Accommodation(Accommodation),
    Package(Package),
    Experience(Experience),
}

impl BookingItem {
    pub fn item_type(&self) -> ItemType {
        match self {
            BookingItem::Accommodation(_) => ItemType::Accommodation,
            BookingItem::Package(_) => ItemType::Package,
            BookingItem::Experience(_) => ItemType::Experience,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            BookingItem::Accommodation(a) => &a.id,
            BookingItem::Package(p) => &p.id,
            BookingItem::Experience(e) => &e.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            BookingItem::Accommodation(a) => &a.name,
            BookingItem::Package(p) => &p.name,
            BookingItem::Experience(e) => &e.title,
        }
    }
}
