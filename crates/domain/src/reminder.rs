use crate::booking::Booking;
use crate::shared::entity::ID;
use chrono::TimeZone;
use chrono_tz::Tz;
use std::{collections::HashMap, fmt::Display, str::FromStr};
use thiserror::Error;

const MINUTE_MILLIS: i64 = 1000 * 60;
const HOUR_MILLIS: i64 = MINUTE_MILLIS * 60;

/// The closed set of reminders that are sent before a `Booking` starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReminderKind {
    TwentyFourHours,
    OneHour,
}

impl ReminderKind {
    pub const ALL: [ReminderKind; 2] = [ReminderKind::TwentyFourHours, ReminderKind::OneHour];

    /// How long before the start of the `Booking` this reminder targets
    pub fn lead_time_millis(&self) -> i64 {
        match self {
            Self::TwentyFourHours => 24 * HOUR_MILLIS,
            Self::OneHour => HOUR_MILLIS,
        }
    }

    pub fn default_tolerance_millis(&self) -> i64 {
        match self {
            Self::TwentyFourHours => 60 * MINUTE_MILLIS,
            Self::OneHour => 10 * MINUTE_MILLIS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TwentyFourHours => "24h",
            Self::OneHour => "1h",
        }
    }

    /// Renders the title and body shown to the client. The start time is
    /// formatted in the given timezone.
    pub fn message(&self, booking: &Booking, tz: Tz) -> ReminderMessage {
        let start_time = format_start_time(booking.start_ts, tz);
        match self {
            Self::TwentyFourHours => ReminderMessage {
                title: "Appointment reminder".into(),
                body: format!(
                    "{}, you have an appointment tomorrow at {}. Service: {}",
                    booking.client_display_name(),
                    start_time,
                    booking.service_display_name()
                ),
            },
            Self::OneHour => ReminderMessage {
                title: "Your appointment is coming up!".into(),
                body: format!(
                    "{}, your appointment starts in 1 hour at {}",
                    booking.client_display_name(),
                    start_time
                ),
            },
        }
    }

    /// Data payload delivered alongside the notification so that the client app
    /// can open the right screen
    pub fn data(&self, booking_id: &ID) -> HashMap<String, String> {
        let mut data = HashMap::new();
        data.insert("booking_id".to_string(), booking_id.as_string());
        data.insert("screen".to_string(), "booking_details".to_string());
        data.insert("type".to_string(), "reminder".to_string());
        data.insert("reminder_type".to_string(), self.as_str().to_string());
        data
    }
}

impl Display for ReminderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReminderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "24h" => Ok(Self::TwentyFourHours),
            "1h" => Ok(Self::OneHour),
            _ => Err(anyhow::anyhow!("Unknown reminder kind: {}", s)),
        }
    }
}

fn format_start_time(start_ts: i64, tz: Tz) -> String {
    tz.timestamp_millis_opt(start_ts)
        .single()
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReminderMessage {
    pub title: String,
    pub body: String,
}

/// How far a `Booking` start may drift from the exact lead time of a
/// `ReminderKind` and still be reminded. Must be at least half of the
/// interval between two dispatch cycles or bookings can fall between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReminderTolerance {
    pub kind: ReminderKind,
    pub tolerance_millis: i64,
}

impl ReminderTolerance {
    pub fn defaults() -> Vec<Self> {
        ReminderKind::ALL
            .iter()
            .map(|kind| Self {
                kind: *kind,
                tolerance_millis: kind.default_tolerance_millis(),
            })
            .collect()
    }
}

/// The range of `Booking` start timestamps that are eligible for a given
/// `ReminderKind` at some instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReminderWindow {
    pub kind: ReminderKind,
    pub lower_ts: i64,
    pub upper_ts: i64,
}

impl ReminderWindow {
    pub fn new(now_ts: i64, tolerance: &ReminderTolerance) -> Self {
        let target = now_ts + tolerance.kind.lead_time_millis();
        Self {
            kind: tolerance.kind,
            lower_ts: target - tolerance.tolerance_millis,
            upper_ts: target + tolerance.tolerance_millis,
        }
    }

    /// Lower bound is inclusive, upper bound is exclusive
    pub fn contains(&self, ts: i64) -> bool {
        ts >= self.lower_ts && ts < self.upper_ts
    }
}

pub fn get_reminder_windows(now_ts: i64, tolerances: &[ReminderTolerance]) -> Vec<ReminderWindow> {
    tolerances
        .iter()
        .map(|tolerance| ReminderWindow::new(now_ts, tolerance))
        .collect()
}

/// Picks the `ReminderKind` to send for a booking starting at `start_ts`.
/// When the windows overlap the most urgent reminder, i.e. the one with the
/// shortest lead time, wins.
pub fn classify_reminder(start_ts: i64, windows: &[ReminderWindow]) -> Option<ReminderKind> {
    windows
        .iter()
        .filter(|w| w.contains(start_ts))
        .min_by_key(|w| w.kind.lead_time_millis())
        .map(|w| w.kind)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderLogStatus {
    Sent,
    Failed,
}

impl ReminderLogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Failed => "failed",
        }
    }
}

impl FromStr for ReminderLogStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sent" => Ok(Self::Sent),
            "failed" => Ok(Self::Failed),
            _ => Err(anyhow::anyhow!("Unknown reminder log status: {}", s)),
        }
    }
}

/// One attempt at delivering a reminder. These entries form an append only
/// ledger which is also used to avoid notifying the same booking twice.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderLogEntry {
    pub id: ID,
    pub booking_id: ID,
    pub client_id: ID,
    pub kind: ReminderKind,
    pub status: ReminderLogStatus,
    /// The device token the attempt was made for. `None` when the client had no tokens
    pub device_token: Option<String>,
    pub error_message: Option<String>,
    /// Raw response body from the push provider
    pub provider_response: Option<serde_json::Value>,
    pub created: i64,
}

impl ReminderLogEntry {
    /// The attempt that is logged when the client had no device to send to
    pub fn is_missing_tokens(&self) -> bool {
        self.status == ReminderLogStatus::Failed && self.device_token.is_none()
    }
}

/// Which log entries mark a (booking, kind) pair as already processed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupPolicy {
    /// Any attempt counts, so failed deliveries are never retried
    AnyAttempt,
    /// Only successful deliveries count, failed ones are retried next cycle.
    /// Clients without any device are not retried.
    SentOnly,
}

impl DedupPolicy {
    pub fn statuses(&self) -> &'static [ReminderLogStatus] {
        match self {
            Self::AnyAttempt => &[ReminderLogStatus::Sent, ReminderLogStatus::Failed],
            Self::SentOnly => &[ReminderLogStatus::Sent],
        }
    }
}

impl FromStr for DedupPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any_attempt" => Ok(Self::AnyAttempt),
            "sent_only" => Ok(Self::SentOnly),
            _ => Err(anyhow::anyhow!("Unknown dedup policy: {}", s)),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeliveryError {
    #[error("no tokens")]
    NoTokens,
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    ProviderRejected(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenDeliveryOutcome {
    pub device_token: String,
    pub result: Result<(), DeliveryError>,
}

/// Outcome of delivering one reminder to every device of a client
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationResult {
    pub booking_id: ID,
    pub kind: ReminderKind,
    /// True if at least one device received the notification
    pub success: bool,
    pub outcomes: Vec<TokenDeliveryOutcome>,
}
