use super::IDeviceTokenRepo;
use crate::repos::shared::inmemory_repo::*;
use booking_notifier_domain::{DeviceToken, ID};

pub struct InMemoryDeviceTokenRepo {
    tokens: std::sync::Mutex<Vec<DeviceToken>>,
}

impl InMemoryDeviceTokenRepo {
    pub fn new() -> Self {
        Self {
            tokens: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Tokens are registered by the client apps, this is only used to seed data
    pub fn insert(&self, token: &DeviceToken) {
        insert(token, &self.tokens);
    }
}

impl Default for InMemoryDeviceTokenRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IDeviceTokenRepo for InMemoryDeviceTokenRepo {
    async fn find_by_users(&self, user_ids: &[ID]) -> anyhow::Result<Vec<DeviceToken>> {
        let mut tokens = find_by(&self.tokens, |t| {
            !t.token.is_empty() && user_ids.contains(&t.user_id)
        });
        tokens.sort_by(|t1, t2| t2.updated.cmp(&t1.updated));
        Ok(tokens)
    }
}
