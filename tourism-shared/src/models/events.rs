use uuid::Uuid;

/// Emitted once per accepted lifecycle transition (check-in, check-out, cancel, ...)
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct BookingTransitionedEvent {
    pub booking_id: Uuid,
    pub booking_reference: String,
    pub from_status: String,
    pub to_status: String,
    pub timestamp: i64,
}

impl BookingTransitionedEvent {
    pub fn new(
        booking_id: Uuid,
        booking_reference: impl Into<String>,
        from_status: impl Into<String>,
        to_status: impl Into<String>,
    ) -> Self {
        Self {
            booking_id,
            booking_reference: booking_reference.into(),
            from_status: from_status.into(),
            to_status: to_status.into(),
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}
