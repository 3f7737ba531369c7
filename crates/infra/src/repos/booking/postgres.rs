use super::IBookingRepo;
use crate::repos::shared::{datetime_from_millis, query_structs::BookingReminderQuery};
use booking_notifier_domain::Booking;
use chrono::{DateTime, Utc};
use sqlx::{types::Uuid, FromRow, PgPool};
use std::convert::{TryFrom, TryInto};

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct BookingRaw {
    booking_uid: Uuid,
    client_uid: Uuid,
    master_uid: Uuid,
    client_name: Option<String>,
    service_name: Option<String>,
    start_time: DateTime<Utc>,
    status: String,
}

impl TryFrom<BookingRaw> for Booking {
    type Error = anyhow::Error;

    fn try_from(raw: BookingRaw) -> anyhow::Result<Self> {
        Ok(Booking {
            id: raw.booking_uid.into(),
            client_id: raw.client_uid.into(),
            master_id: raw.master_uid.into(),
            client_name: raw.client_name,
            service_name: raw.service_name,
            start_ts: raw.start_time.timestamp_millis(),
            status: raw.status.parse()?,
        })
    }
}

#[async_trait::async_trait]
impl IBookingRepo for PostgresBookingRepo {
    async fn find_reminder_candidates(
        &self,
        query: &BookingReminderQuery,
    ) -> anyhow::Result<Vec<Booking>> {
        let statuses = query
            .statuses
            .iter()
            .map(|s| s.as_str().to_string())
            .collect::<Vec<_>>();
        let exclude_client = query.exclude_client.as_ref().map(|id| *id.inner_ref());

        let bookings: Vec<BookingRaw> = sqlx::query_as(
            r#"
            SELECT
                b.id AS booking_uid,
                b.client_id AS client_uid,
                b.master_id AS master_uid,
                p.full_name AS client_name,
                s.name AS service_name,
                b.start_time,
                b.status
            FROM bookings AS b
            LEFT JOIN profiles AS p ON p.id = b.client_id
            LEFT JOIN services AS s ON s.id = b.service_id
            WHERE b.start_time >= $1
                AND b.start_time < $2
                AND b.status = ANY($3)
                AND ($4::uuid IS NULL OR b.client_id <> $4)
            ORDER BY b.start_time ASC
            "#,
        )
        .bind(datetime_from_millis(query.start_ts)?)
        .bind(datetime_from_millis(query.end_ts)?)
        .bind(&statuses)
        .bind(exclude_client)
        .fetch_all(&self.pool)
        .await?;

        bookings.into_iter().map(|b| b.try_into()).collect()
    }

    async fn check_connection(&self) -> anyhow::Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
