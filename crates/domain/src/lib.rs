mod booking;
mod notification;
mod reminder;
mod shared;

pub use booking::{Booking, BookingStatus, BookingWithDeviceTokens, DeviceToken};
pub use chrono_tz::Tz;
pub use notification::{BookingNotification, NotificationLogEntry};
pub use reminder::{
    classify_reminder, get_reminder_windows, DedupPolicy, DeliveryError, NotificationResult,
    ReminderKind, ReminderLogEntry, ReminderLogStatus, ReminderMessage, ReminderTolerance,
    ReminderWindow, TokenDeliveryOutcome,
};
pub use shared::entity::{Entity, InvalidIDError, ID};
