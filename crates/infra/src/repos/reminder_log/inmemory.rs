use super::IReminderLogRepo;
use crate::repos::shared::inmemory_repo::*;
use booking_notifier_domain::{ReminderKind, ReminderLogEntry, ReminderLogStatus, ID};

pub struct InMemoryReminderLogRepo {
    entries: std::sync::Mutex<Vec<ReminderLogEntry>>,
}

impl InMemoryReminderLogRepo {
    pub fn new() -> Self {
        Self {
            entries: std::sync::Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryReminderLogRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IReminderLogRepo for InMemoryReminderLogRepo {
    async fn insert(&self, entry: &ReminderLogEntry) -> anyhow::Result<()> {
        insert(entry, &self.entries);
        Ok(())
    }

    async fn count_matching(
        &self,
        booking_id: &ID,
        kind: ReminderKind,
        statuses: &[ReminderLogStatus],
    ) -> anyhow::Result<i64> {
        Ok(count_by(&self.entries, |e| {
            e.booking_id == *booking_id && e.kind == kind && statuses.contains(&e.status)
        }))
    }

    async fn find_by_booking(&self, booking_id: &ID) -> anyhow::Result<Vec<ReminderLogEntry>> {
        Ok(find_by(&self.entries, |e| e.booking_id == *booking_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(booking_id: &ID, kind: ReminderKind, status: ReminderLogStatus) -> ReminderLogEntry {
        ReminderLogEntry {
            id: Default::default(),
            booking_id: booking_id.clone(),
            client_id: Default::default(),
            kind,
            status,
            device_token: None,
            error_message: None,
            provider_response: None,
            created: 0,
        }
    }

    #[tokio::test]
    async fn counts_by_booking_kind_and_status() {
        let repo = InMemoryReminderLogRepo::new();
        let booking_id = ID::new();
        let all = [ReminderLogStatus::Sent, ReminderLogStatus::Failed];

        repo.insert(&entry(&booking_id, ReminderKind::OneHour, ReminderLogStatus::Failed))
            .await
            .unwrap();
        repo.insert(&entry(&ID::new(), ReminderKind::OneHour, ReminderLogStatus::Sent))
            .await
            .unwrap();

        let count = repo
            .count_matching(&booking_id, ReminderKind::OneHour, &all)
            .await
            .unwrap();
        assert_eq!(count, 1);
        let count = repo
            .count_matching(&booking_id, ReminderKind::OneHour, &[ReminderLogStatus::Sent])
            .await
            .unwrap();
        assert_eq!(count, 0);
        let count = repo
            .count_matching(&booking_id, ReminderKind::TwentyFourHours, &all)
            .await
            .unwrap();
        assert_eq!(count, 0);
        assert_eq!(repo.find_by_booking(&booking_id).await.unwrap().len(), 1);
    }
}
