use booking_notifier_domain::ID;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod send_push_notification {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub booking_id: ID,
        pub client_id: ID,
        pub title: Option<String>,
        pub body: Option<String>,
        /// Extra data delivered to the client app
        pub data: Option<HashMap<String, String>>,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        /// Whether the push provider accepted the notification
        pub success: bool,
        pub message: String,
        pub provider_response: serde_json::Value,
    }
}
