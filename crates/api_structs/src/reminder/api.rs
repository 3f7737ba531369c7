use booking_notifier_domain::ID;
use serde::{Deserialize, Serialize};

pub mod send_scheduled_reminders {
    use super::*;

    #[derive(Debug, Default, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        /// Client that should not be notified in this cycle, e.g. the caller
        pub exclude_client: Option<ID>,
    }

    /// Summary of one reminder cycle
    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub processed: usize,
        pub sent: usize,
        pub failed: usize,
        /// RFC3339 instant the cycle was evaluated at
        pub timestamp: String,
    }

    impl APIResponse {
        pub fn new(processed: usize, sent: usize, failed: usize, timestamp: String) -> Self {
            Self {
                processed,
                sent,
                failed,
                timestamp,
            }
        }
    }
}
