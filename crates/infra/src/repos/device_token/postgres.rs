use super::IDeviceTokenRepo;
use booking_notifier_domain::{DeviceToken, ID};
use chrono::{DateTime, Utc};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresDeviceTokenRepo {
    pool: PgPool,
}

impl PostgresDeviceTokenRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct DeviceTokenRaw {
    user_id: Uuid,
    fcm_token: String,
    updated_at: DateTime<Utc>,
}

impl From<DeviceTokenRaw> for DeviceToken {
    fn from(raw: DeviceTokenRaw) -> Self {
        Self {
            user_id: raw.user_id.into(),
            token: raw.fcm_token,
            updated: raw.updated_at.timestamp_millis(),
        }
    }
}

#[async_trait::async_trait]
impl IDeviceTokenRepo for PostgresDeviceTokenRepo {
    async fn find_by_users(&self, user_ids: &[ID]) -> anyhow::Result<Vec<DeviceToken>> {
        let ids = user_ids
            .iter()
            .map(|id| *id.inner_ref())
            .collect::<Vec<_>>();
        let tokens: Vec<DeviceTokenRaw> = sqlx::query_as(
            r#"
            SELECT t.user_id, t.fcm_token, t.updated_at FROM user_fcm_tokens AS t
            WHERE t.user_id = ANY($1) AND t.fcm_token <> ''
            ORDER BY t.updated_at DESC
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(tokens.into_iter().map(|t| t.into()).collect())
    }
}
