pub mod inmemory_repo;
pub mod query_structs;

use chrono::{DateTime, TimeZone, Utc};

pub fn datetime_from_millis(ts: i64) -> anyhow::Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ts)
        .single()
        .ok_or_else(|| anyhow::anyhow!("Timestamp {} is out of range", ts))
}
