mod inmemory;
mod postgres;

pub use inmemory::InMemoryReminderLogRepo;
pub use postgres::PostgresReminderLogRepo;

use booking_notifier_domain::{ReminderKind, ReminderLogEntry, ReminderLogStatus, ID};

/// Append only ledger of reminder delivery attempts
#[async_trait::async_trait]
pub trait IReminderLogRepo: Send + Sync {
    async fn insert(&self, entry: &ReminderLogEntry) -> anyhow::Result<()>;
    /// Number of entries for the (booking, kind) pair with one of the given statuses
    async fn count_matching(
        &self,
        booking_id: &ID,
        kind: ReminderKind,
        statuses: &[ReminderLogStatus],
    ) -> anyhow::Result<i64>;
    async fn find_by_booking(&self, booking_id: &ID) -> anyhow::Result<Vec<ReminderLogEntry>>;
}
