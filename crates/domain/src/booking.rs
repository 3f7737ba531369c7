use crate::shared::entity::{Entity, ID};
use std::{fmt::Display, str::FromStr};

const FALLBACK_CLIENT_NAME: &str = "Client";
const FALLBACK_SERVICE_NAME: &str = "Service";

/// A `Booking` is an appointment between a client and a master for some service.
/// Bookings are owned by the external booking system and are only read here.
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub id: ID,
    /// The user who booked the appointment and who receives the reminders
    pub client_id: ID,
    pub master_id: ID,
    pub client_name: Option<String>,
    pub service_name: Option<String>,
    /// Start of the appointment in millis
    pub start_ts: i64,
    pub status: BookingStatus,
}

impl Booking {
    pub fn client_display_name(&self) -> &str {
        self.client_name.as_deref().unwrap_or(FALLBACK_CLIENT_NAME)
    }

    pub fn service_display_name(&self) -> &str {
        self.service_name.as_deref().unwrap_or(FALLBACK_SERVICE_NAME)
    }
}

impl Entity for Booking {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// Statuses for which reminders should be sent
    pub const ACTIVE: [BookingStatus; 2] = [BookingStatus::Pending, BookingStatus::Confirmed];

    pub fn is_active(&self) -> bool {
        Self::ACTIVE.contains(self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }
}

impl Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            _ => Err(anyhow::anyhow!("Unknown booking status: {}", s)),
        }
    }
}

/// A `Booking` joined with every `DeviceToken` registered by its client
#[derive(Debug, Clone)]
pub struct BookingWithDeviceTokens {
    pub booking: Booking,
    pub device_tokens: Vec<DeviceToken>,
}

/// Opaque push token of one of the devices a user has registered
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceToken {
    pub user_id: ID,
    pub token: String,
    /// Last time the device refreshed the token, in millis
    pub updated: i64,
}
