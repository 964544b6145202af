pub mod item;
pub mod lookup;
pub mod pricing;
pub mod tariff;

pub use item::{Accommodation, BookingItem, Experience, ItemType, Package};
pub use lookup::{CatalogError, CatalogLookup, InMemoryCatalog};
pub use pricing::{BookingRequest, PriceLine, PricingBreakdown, PricingEngine};
pub use tariff::{
    destinations_with_room_type, plan_mass_update, MassUpdateAction, MassUpdateError, MassUpdatePlan,
    MassUpdateRequest, TariffMode,
};
