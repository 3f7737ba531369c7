use booking_notifier_domain::{Booking, BookingStatus, DeviceToken};
use chrono::Utc;

/// Confirmed booking starting `minutes` from now
pub fn booking_starting_in(minutes: i64) -> Booking {
    Booking {
        id: Default::default(),
        client_id: Default::default(),
        master_id: Default::default(),
        client_name: Some("Ivan".into()),
        service_name: Some("Haircut".into()),
        start_ts: Utc::now().timestamp_millis() + minutes * 60 * 1000,
        status: BookingStatus::Confirmed,
    }
}

pub fn device_token(booking: &Booking, token: &str) -> DeviceToken {
    DeviceToken {
        user_id: booking.client_id.clone(),
        token: token.into(),
        updated: Utc::now().timestamp_millis(),
    }
}
