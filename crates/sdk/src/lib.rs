mod base;
mod notification;
mod reminder;
mod status;

pub(crate) use base::BaseClient;
pub use base::{APIError, APIResponse};
pub use booking_notifier_api_structs::send_scheduled_reminders::APIResponse as ReminderCycleSummary;
pub use booking_notifier_domain::ID;
use notification::NotificationClient;
pub use notification::SendPushNotificationInput;
use reminder::ReminderClient;
use status::StatusClient;
use std::sync::Arc;

/// Booking Notifier Server SDK
///
/// The SDK contains methods for interacting with the Booking Notifier server
/// API.
#[derive(Clone)]
pub struct NotifierSDK {
    pub notification: NotificationClient,
    pub reminder: ReminderClient,
    pub status: StatusClient,
}

impl NotifierSDK {
    pub fn new(address: String) -> Self {
        let base = Arc::new(BaseClient::new(address));
        let notification = NotificationClient::new(base.clone());
        let reminder = ReminderClient::new(base.clone());
        let status = StatusClient::new(base);

        Self {
            notification,
            reminder,
            status,
        }
    }
}
