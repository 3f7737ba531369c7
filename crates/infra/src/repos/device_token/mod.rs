mod inmemory;
mod postgres;

pub use inmemory::InMemoryDeviceTokenRepo;
pub use postgres::PostgresDeviceTokenRepo;

use booking_notifier_domain::{DeviceToken, ID};

#[async_trait::async_trait]
pub trait IDeviceTokenRepo: Send + Sync {
    /// Every token registered by the given users, most recently updated first
    async fn find_by_users(&self, user_ids: &[ID]) -> anyhow::Result<Vec<DeviceToken>>;
}
