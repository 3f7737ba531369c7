use crate::shared::entity::ID;
use std::collections::HashMap;

const DEFAULT_TITLE: &str = "Appointment reminder";
const DEFAULT_BODY: &str = "You have an upcoming appointment";
const CLICK_ACTION: &str = "FLUTTER_NOTIFICATION_CLICK";

/// A notification about a `Booking` requested on demand by the booking system,
/// e.g. when a master confirms or moves an appointment
#[derive(Debug, Clone, PartialEq)]
pub struct BookingNotification {
    pub booking_id: ID,
    pub client_id: ID,
    pub title: String,
    pub body: String,
    pub data: HashMap<String, String>,
}

impl BookingNotification {
    /// Missing or empty title and body get generic texts. The caller's data is
    /// kept but can not override the keys the client app routes on.
    pub fn new(
        booking_id: ID,
        client_id: ID,
        title: Option<String>,
        body: Option<String>,
        data: Option<HashMap<String, String>>,
    ) -> Self {
        let mut data = data.unwrap_or_default();
        data.insert("booking_id".to_string(), booking_id.as_string());
        data.insert("screen".to_string(), "booking_details".to_string());
        data.insert("click_action".to_string(), CLICK_ACTION.to_string());

        Self {
            booking_id,
            client_id,
            title: non_empty_or(title, DEFAULT_TITLE),
            body: non_empty_or(body, DEFAULT_BODY),
            data,
        }
    }
}

fn non_empty_or(text: Option<String>, default: &str) -> String {
    match text {
        Some(text) if !text.trim().is_empty() => text,
        _ => default.to_string(),
    }
}

/// One on demand notification sent to a device
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationLogEntry {
    pub id: ID,
    pub booking_id: ID,
    pub client_id: ID,
    pub device_token: String,
    pub title: String,
    pub body: String,
    pub success: bool,
    pub error_message: Option<String>,
    /// Raw response body from the push provider
    pub provider_response: Option<serde_json::Value>,
    pub created: i64,
}
