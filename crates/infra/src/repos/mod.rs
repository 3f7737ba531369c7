mod booking;
mod device_token;
mod notification_log;
mod reminder_log;
mod shared;

pub use booking::{IBookingRepo, InMemoryBookingRepo};
pub use device_token::{IDeviceTokenRepo, InMemoryDeviceTokenRepo};
pub use notification_log::{INotificationLogRepo, InMemoryNotificationLogRepo};
pub use reminder_log::{IReminderLogRepo, InMemoryReminderLogRepo};
pub use shared::query_structs::*;

use booking::PostgresBookingRepo;
use device_token::PostgresDeviceTokenRepo;
use notification_log::PostgresNotificationLogRepo;
use reminder_log::PostgresReminderLogRepo;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    pub bookings: Arc<dyn IBookingRepo>,
    pub device_tokens: Arc<dyn IDeviceTokenRepo>,
    pub reminder_logs: Arc<dyn IReminderLogRepo>,
    pub notification_logs: Arc<dyn INotificationLogRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");
        Ok(Self {
            bookings: Arc::new(PostgresBookingRepo::new(pool.clone())),
            device_tokens: Arc::new(PostgresDeviceTokenRepo::new(pool.clone())),
            reminder_logs: Arc::new(PostgresReminderLogRepo::new(pool.clone())),
            notification_logs: Arc::new(PostgresNotificationLogRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            bookings: Arc::new(InMemoryBookingRepo::new()),
            device_tokens: Arc::new(InMemoryDeviceTokenRepo::new()),
            reminder_logs: Arc::new(InMemoryReminderLogRepo::new()),
            notification_logs: Arc::new(InMemoryNotificationLogRepo::new()),
        }
    }
}
