use super::INotificationLogRepo;
use crate::repos::shared::datetime_from_millis;
use booking_notifier_domain::{NotificationLogEntry, ID};
use chrono::{DateTime, Utc};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresNotificationLogRepo {
    pool: PgPool,
}

impl PostgresNotificationLogRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct NotificationLogRaw {
    id: Uuid,
    booking_id: Uuid,
    client_id: Uuid,
    fcm_token: String,
    title: String,
    body: String,
    success: bool,
    error_message: Option<String>,
    response: Option<serde_json::Value>,
    sent_at: DateTime<Utc>,
}

impl From<NotificationLogRaw> for NotificationLogEntry {
    fn from(raw: NotificationLogRaw) -> Self {
        Self {
            id: raw.id.into(),
            booking_id: raw.booking_id.into(),
            client_id: raw.client_id.into(),
            device_token: raw.fcm_token,
            title: raw.title,
            body: raw.body,
            success: raw.success,
            error_message: raw.error_message,
            provider_response: raw.response,
            created: raw.sent_at.timestamp_millis(),
        }
    }
}

#[async_trait::async_trait]
impl INotificationLogRepo for PostgresNotificationLogRepo {
    async fn insert(&self, entry: &NotificationLogEntry) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO notification_logs
            (id, booking_id, client_id, fcm_token, title, body, success, error_message, response, sent_at)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(entry.id.inner_ref())
        .bind(entry.booking_id.inner_ref())
        .bind(entry.client_id.inner_ref())
        .bind(&entry.device_token)
        .bind(&entry.title)
        .bind(&entry.body)
        .bind(entry.success)
        .bind(&entry.error_message)
        .bind(&entry.provider_response)
        .bind(datetime_from_millis(entry.created)?)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_booking(&self, booking_id: &ID) -> anyhow::Result<Vec<NotificationLogEntry>> {
        let entries: Vec<NotificationLogRaw> = sqlx::query_as(
            r#"
            SELECT * FROM notification_logs AS n
            WHERE n.booking_id = $1
            ORDER BY n.sent_at ASC
            "#,
        )
        .bind(booking_id.inner_ref())
        .fetch_all(&self.pool)
        .await?;

        Ok(entries.into_iter().map(|e| e.into()).collect())
    }
}
