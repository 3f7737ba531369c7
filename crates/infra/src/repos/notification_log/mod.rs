mod inmemory;
mod postgres;

pub use inmemory::InMemoryNotificationLogRepo;
pub use postgres::PostgresNotificationLogRepo;

use booking_notifier_domain::{NotificationLogEntry, ID};

/// Append only ledger of on demand notifications
#[async_trait::async_trait]
pub trait INotificationLogRepo: Send + Sync {
    async fn insert(&self, entry: &NotificationLogEntry) -> anyhow::Result<()>;
    async fn find_by_booking(&self, booking_id: &ID) -> anyhow::Result<Vec<NotificationLogEntry>>;
}
