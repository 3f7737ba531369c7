mod inmemory;
mod postgres;

pub use inmemory::InMemoryBookingRepo;
pub use postgres::PostgresBookingRepo;

use crate::repos::shared::query_structs::BookingReminderQuery;
use booking_notifier_domain::Booking;

/// Read access to the bookings of the external booking system
#[async_trait::async_trait]
pub trait IBookingRepo: Send + Sync {
    /// Bookings matching the query, ordered by start time
    async fn find_reminder_candidates(
        &self,
        query: &BookingReminderQuery,
    ) -> anyhow::Result<Vec<Booking>>;
    /// Fails if the underlying store cannot be reached at all
    async fn check_connection(&self) -> anyhow::Result<()>;
}
