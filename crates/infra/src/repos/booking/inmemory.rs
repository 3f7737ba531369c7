use super::IBookingRepo;
use crate::repos::shared::{inmemory_repo::*, query_structs::BookingReminderQuery};
use booking_notifier_domain::Booking;

pub struct InMemoryBookingRepo {
    bookings: std::sync::Mutex<Vec<Booking>>,
}

impl InMemoryBookingRepo {
    pub fn new() -> Self {
        Self {
            bookings: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Bookings are written by the booking system, this is only used to seed data
    pub fn insert(&self, booking: &Booking) {
        upsert(booking, &self.bookings);
    }
}

impl Default for InMemoryBookingRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IBookingRepo for InMemoryBookingRepo {
    async fn find_reminder_candidates(
        &self,
        query: &BookingReminderQuery,
    ) -> anyhow::Result<Vec<Booking>> {
        let mut bookings = find_by(&self.bookings, |b| {
            b.start_ts >= query.start_ts
                && b.start_ts < query.end_ts
                && query.statuses.contains(&b.status)
                && query.exclude_client.as_ref() != Some(&b.client_id)
        });
        bookings.sort_by_key(|b| b.start_ts);
        Ok(bookings)
    }

    async fn check_connection(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
