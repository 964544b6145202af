pub mod events;

pub use events::BookingTransitionedEvent;
