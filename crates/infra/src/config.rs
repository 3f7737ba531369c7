use booking_notifier_domain::{DedupPolicy, ReminderKind, ReminderTolerance, Tz};
use std::{fmt::Display, str::FromStr};
use tracing::{info, warn};

const DEFAULT_FCM_ENDPOINT: &str = "https://fcm.googleapis.com/fcm/send";

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Timezone used when rendering appointment times in notifications
    pub timezone: Tz,
    /// How far from the exact lead time a booking may start and still be
    /// reminded, per `ReminderKind`
    pub reminder_tolerances: Vec<ReminderTolerance>,
    /// Interval in minutes of the in process reminder job. `None` if reminders
    /// are only dispatched through the api by an external scheduler.
    pub reminder_job_interval_minutes: Option<u64>,
    /// Upper bound on bookings being delivered at the same time in one cycle.
    /// Protects the push provider from bursts when many bookings are due.
    pub max_concurrent_deliveries: usize,
    pub dedup_policy: DedupPolicy,
    pub fcm: FcmConfig,
}

#[derive(Debug, Clone)]
pub struct FcmConfig {
    pub server_key: String,
    pub endpoint: String,
}

/// Upper bound for every minutes setting, keeps all millisecond math in range
const MAX_MINUTES: u64 = 7 * 24 * 60;
const DEFAULT_JOB_INTERVAL_MINUTES: u64 = 5;

fn parse_or<T>(name: &str, value: Option<String>, default: T) -> T
where
    T: FromStr + Display,
{
    match value {
        Some(value) => match value.parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}.",
                    name, value, default
                );
                default
            }
        },
        None => default,
    }
}

fn parse_env_or<T>(name: &str, default: T) -> T
where
    T: FromStr + Display,
{
    parse_or(name, std::env::var(name).ok(), default)
}

fn parse_minutes(name: &str, value: Option<String>, default: u64) -> u64 {
    let minutes = parse_or(name, value, default);
    if minutes > MAX_MINUTES {
        warn!(
            "The given {}: {} exceeds {} minutes, falling back to the default: {}.",
            name, minutes, MAX_MINUTES, default
        );
        return default;
    }
    minutes
}

fn tolerance_from(name: &str, value: Option<String>, kind: ReminderKind) -> ReminderTolerance {
    let default_minutes = (kind.default_tolerance_millis() / (1000 * 60)) as u64;
    let minutes = match parse_minutes(name, value, default_minutes) {
        0 => {
            warn!(
                "{} must be positive, falling back to the default: {}.",
                name, default_minutes
            );
            default_minutes
        }
        minutes => minutes,
    };
    ReminderTolerance {
        kind,
        tolerance_millis: minutes as i64 * 60 * 1000,
    }
}

fn job_interval_from(value: Option<String>) -> Option<u64> {
    match parse_minutes(
        "REMINDER_JOB_INTERVAL_MINUTES",
        value,
        DEFAULT_JOB_INTERVAL_MINUTES,
    ) {
        0 => {
            info!("In process reminder job is disabled, waiting for external triggers.");
            None
        }
        minutes => Some(minutes),
    }
}

impl Config {
    pub fn new() -> Self {
        let port = parse_env_or("PORT", 5000);

        let timezone = match std::env::var("NOTIFICATION_TIMEZONE") {
            Ok(tz) => tz.parse::<Tz>().unwrap_or_else(|_| {
                warn!(
                    "The given NOTIFICATION_TIMEZONE: {} is not valid, falling back to UTC.",
                    tz
                );
                Tz::UTC
            }),
            Err(_) => Tz::UTC,
        };

        let reminder_tolerances = vec![
            tolerance_from(
                "REMINDER_24H_TOLERANCE_MINUTES",
                std::env::var("REMINDER_24H_TOLERANCE_MINUTES").ok(),
                ReminderKind::TwentyFourHours,
            ),
            tolerance_from(
                "REMINDER_1H_TOLERANCE_MINUTES",
                std::env::var("REMINDER_1H_TOLERANCE_MINUTES").ok(),
                ReminderKind::OneHour,
            ),
        ];

        let reminder_job_interval_minutes =
            job_interval_from(std::env::var("REMINDER_JOB_INTERVAL_MINUTES").ok());

        let max_concurrent_deliveries = match parse_env_or("MAX_CONCURRENT_DELIVERIES", 16) {
            0 => 1,
            n => n,
        };

        let dedup_policy = match std::env::var("REMINDER_DEDUP_POLICY") {
            Ok(policy) => policy.parse::<DedupPolicy>().unwrap_or_else(|_| {
                warn!(
                    "The given REMINDER_DEDUP_POLICY: {} is not valid, falling back to any_attempt.",
                    policy
                );
                DedupPolicy::AnyAttempt
            }),
            Err(_) => DedupPolicy::AnyAttempt,
        };

        let server_key = std::env::var("FCM_SERVER_KEY").unwrap_or_else(|_| {
            warn!("Did not find FCM_SERVER_KEY environment variable. Push deliveries will be rejected.");
            String::new()
        });
        let endpoint =
            std::env::var("FCM_ENDPOINT").unwrap_or_else(|_| DEFAULT_FCM_ENDPOINT.to_string());

        let config = Self {
            port,
            timezone,
            reminder_tolerances,
            reminder_job_interval_minutes,
            max_concurrent_deliveries,
            dedup_policy,
            fcm: FcmConfig {
                server_key,
                endpoint,
            },
        };
        config.warn_on_reminder_gaps();
        config
    }

    /// Bookings can slip between two cycles if a window is narrower than the
    /// interval between them
    fn warn_on_reminder_gaps(&self) {
        let interval_minutes = match self.reminder_job_interval_minutes {
            Some(minutes) => minutes as i64,
            None => return,
        };
        for tolerance in &self.reminder_tolerances {
            if 2 * tolerance.tolerance_millis < interval_minutes * 60 * 1000 {
                warn!(
                    "Tolerance of the {} reminder is less than half of the job interval of {} minutes. Some bookings will not be reminded.",
                    tolerance.kind, interval_minutes
                );
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_parses_minutes() {
        let tolerance = tolerance_from("T", Some("30".into()), ReminderKind::OneHour);
        assert_eq!(tolerance.tolerance_millis, 30 * 60 * 1000);

        let tolerance = tolerance_from("T", None, ReminderKind::TwentyFourHours);
        assert_eq!(
            tolerance.tolerance_millis,
            ReminderKind::TwentyFourHours.default_tolerance_millis()
        );
    }

    #[test]
    fn out_of_range_tolerance_falls_back_to_default() {
        for value in &["9223372036854775807", "18446744073709551615", "-5", "0", "abc"] {
            let tolerance = tolerance_from("T", Some(value.to_string()), ReminderKind::OneHour);
            assert_eq!(
                tolerance.tolerance_millis,
                ReminderKind::OneHour.default_tolerance_millis()
            );
        }
    }

    #[test]
    fn job_interval_parses_and_can_be_disabled() {
        assert_eq!(job_interval_from(None), Some(5));
        assert_eq!(job_interval_from(Some("15".into())), Some(15));
        assert_eq!(job_interval_from(Some("0".into())), None);
        assert_eq!(job_interval_from(Some("9223372036854775807".into())), Some(5));
    }

    #[test]
    fn gap_check_handles_largest_allowed_values() {
        let config = Config {
            port: 0,
            timezone: Tz::UTC,
            reminder_tolerances: vec![tolerance_from(
                "T",
                Some(MAX_MINUTES.to_string()),
                ReminderKind::TwentyFourHours,
            )],
            reminder_job_interval_minutes: job_interval_from(Some(MAX_MINUTES.to_string())),
            max_concurrent_deliveries: 1,
            dedup_policy: DedupPolicy::AnyAttempt,
            fcm: FcmConfig {
                server_key: String::new(),
                endpoint: DEFAULT_FCM_ENDPOINT.to_string(),
            },
        };
        config.warn_on_reminder_gaps();
        assert_eq!(config.reminder_job_interval_minutes, Some(MAX_MINUTES));
    }
}
