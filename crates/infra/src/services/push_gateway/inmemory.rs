use super::{IPushGateway, PushGatewayResponse, PushMessage, PushTransportError};
use serde_json::json;
use std::{collections::HashSet, sync::Mutex};

/// Push gateway that records every message instead of sending it.
/// Tokens can be marked as rejected by the provider or as unreachable.
pub struct InMemoryPushGateway {
    sent: Mutex<Vec<PushMessage>>,
    rejected_tokens: Mutex<HashSet<String>>,
    unreachable_tokens: Mutex<HashSet<String>>,
}

impl InMemoryPushGateway {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            rejected_tokens: Mutex::new(HashSet::new()),
            unreachable_tokens: Mutex::new(HashSet::new()),
        }
    }

    pub fn reject_token(&self, token: &str) {
        self.rejected_tokens.lock().unwrap().insert(token.to_string());
    }

    pub fn fail_transport_for(&self, token: &str) {
        self.unreachable_tokens
            .lock()
            .unwrap()
            .insert(token.to_string());
    }

    /// Every message the gateway was asked to send, including the failed ones
    pub fn sent(&self) -> Vec<PushMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for InMemoryPushGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IPushGateway for InMemoryPushGateway {
    async fn send(&self, message: &PushMessage) -> Result<PushGatewayResponse, PushTransportError> {
        self.sent.lock().unwrap().push(message.clone());

        if self
            .unreachable_tokens
            .lock()
            .unwrap()
            .contains(&message.device_token)
        {
            return Err(PushTransportError::Network("connection refused".into()));
        }
        if self
            .rejected_tokens
            .lock()
            .unwrap()
            .contains(&message.device_token)
        {
            return Ok(PushGatewayResponse {
                success: false,
                error: Some("NotRegistered".into()),
                raw: json!({ "success": 0, "failure": 1, "results": [{ "error": "NotRegistered" }] }),
            });
        }
        Ok(PushGatewayResponse {
            success: true,
            error: None,
            raw: json!({ "success": 1, "failure": 0, "results": [{ "message_id": "inmemory" }] }),
        })
    }
}
