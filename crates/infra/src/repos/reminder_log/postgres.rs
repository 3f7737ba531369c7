use super::IReminderLogRepo;
use crate::repos::shared::datetime_from_millis;
use booking_notifier_domain::{ReminderKind, ReminderLogEntry, ReminderLogStatus, ID};
use chrono::{DateTime, Utc};
use sqlx::{types::Uuid, FromRow, PgPool};
use std::convert::{TryFrom, TryInto};

pub struct PostgresReminderLogRepo {
    pool: PgPool,
}

impl PostgresReminderLogRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderLogRaw {
    id: Uuid,
    booking_id: Uuid,
    client_id: Uuid,
    #[sqlx(rename = "type")]
    kind: String,
    status: String,
    fcm_token: Option<String>,
    error_message: Option<String>,
    fcm_response: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ReminderLogRaw> for ReminderLogEntry {
    type Error = anyhow::Error;

    fn try_from(raw: ReminderLogRaw) -> anyhow::Result<Self> {
        Ok(ReminderLogEntry {
            id: raw.id.into(),
            booking_id: raw.booking_id.into(),
            client_id: raw.client_id.into(),
            kind: raw.kind.parse()?,
            status: raw.status.parse()?,
            device_token: raw.fcm_token,
            error_message: raw.error_message,
            provider_response: raw.fcm_response,
            created: raw.created_at.timestamp_millis(),
        })
    }
}

#[async_trait::async_trait]
impl IReminderLogRepo for PostgresReminderLogRepo {
    async fn insert(&self, entry: &ReminderLogEntry) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reminder_logs
            (id, booking_id, client_id, type, status, fcm_token, error_message, fcm_response, created_at)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(entry.id.inner_ref())
        .bind(entry.booking_id.inner_ref())
        .bind(entry.client_id.inner_ref())
        .bind(entry.kind.as_str())
        .bind(entry.status.as_str())
        .bind(&entry.device_token)
        .bind(&entry.error_message)
        .bind(&entry.provider_response)
        .bind(datetime_from_millis(entry.created)?)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn count_matching(
        &self,
        booking_id: &ID,
        kind: ReminderKind,
        statuses: &[ReminderLogStatus],
    ) -> anyhow::Result<i64> {
        let statuses = statuses
            .iter()
            .map(|s| s.as_str().to_string())
            .collect::<Vec<_>>();
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM reminder_logs AS r
            WHERE r.booking_id = $1 AND r.type = $2 AND r.status = ANY($3)
            "#,
        )
        .bind(booking_id.inner_ref())
        .bind(kind.as_str())
        .bind(&statuses)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn find_by_booking(&self, booking_id: &ID) -> anyhow::Result<Vec<ReminderLogEntry>> {
        let entries: Vec<ReminderLogRaw> = sqlx::query_as(
            r#"
            SELECT * FROM reminder_logs AS r
            WHERE r.booking_id = $1
            ORDER BY r.created_at ASC
            "#,
        )
        .bind(booking_id.inner_ref())
        .fetch_all(&self.pool)
        .await?;

        entries.into_iter().map(|e| e.try_into()).collect()
    }
}
