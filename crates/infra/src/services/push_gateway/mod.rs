mod fcm;
mod inmemory;

pub use fcm::FcmPushGateway;
pub use inmemory::InMemoryPushGateway;

use std::collections::HashMap;
use thiserror::Error;

/// A notification addressed to a single device
#[derive(Debug, Clone, PartialEq)]
pub struct PushMessage {
    pub device_token: String,
    pub title: String,
    pub body: String,
    pub data: HashMap<String, String>,
}

/// The push provider processed the request. It might still have refused to
/// deliver the message, e.g. because the device token has expired.
#[derive(Debug, Clone, PartialEq)]
pub struct PushGatewayResponse {
    pub success: bool,
    /// Error reported by the provider for this message
    pub error: Option<String>,
    pub raw: serde_json::Value,
}

/// The push provider could not be reached or did not answer properly
#[derive(Error, Debug)]
pub enum PushTransportError {
    #[error("Unable to reach push provider: {0}")]
    Network(String),
    #[error("Push provider responded with status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
    #[error("Malformed push provider response: {0}")]
    MalformedResponse(String),
}

#[async_trait::async_trait]
pub trait IPushGateway: Send + Sync {
    async fn send(&self, message: &PushMessage) -> Result<PushGatewayResponse, PushTransportError>;
}
