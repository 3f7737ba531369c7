use super::INotificationLogRepo;
use crate::repos::shared::inmemory_repo::*;
use booking_notifier_domain::{NotificationLogEntry, ID};

pub struct InMemoryNotificationLogRepo {
    entries: std::sync::Mutex<Vec<NotificationLogEntry>>,
}

impl InMemoryNotificationLogRepo {
    pub fn new() -> Self {
        Self {
            entries: std::sync::Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryNotificationLogRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl INotificationLogRepo for InMemoryNotificationLogRepo {
    async fn insert(&self, entry: &NotificationLogEntry) -> anyhow::Result<()> {
        insert(entry, &self.entries);
        Ok(())
    }

    async fn find_by_booking(&self, booking_id: &ID) -> anyhow::Result<Vec<NotificationLogEntry>> {
        Ok(find_by(&self.entries, |e| e.booking_id == *booking_id))
    }
}
