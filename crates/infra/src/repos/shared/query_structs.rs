use booking_notifier_domain::{BookingStatus, ReminderWindow, ID};

/// Filter for bookings that should be reminded within some `ReminderWindow`
#[derive(Debug, Clone)]
pub struct BookingReminderQuery {
    /// Inclusive lower bound of the booking start in millis
    pub start_ts: i64,
    /// Exclusive upper bound of the booking start in millis
    pub end_ts: i64,
    pub statuses: Vec<BookingStatus>,
    /// Bookings made by this client are left out
    pub exclude_client: Option<ID>,
}

impl BookingReminderQuery {
    pub fn new(window: &ReminderWindow, exclude_client: Option<ID>) -> Self {
        Self {
            start_ts: window.lower_ts,
            end_ts: window.upper_ts,
            statuses: BookingStatus::ACTIVE.to_vec(),
            exclude_client,
        }
    }
}
