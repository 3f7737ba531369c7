use super::{IPushGateway, PushGatewayResponse, PushMessage, PushTransportError};
use crate::config::FcmConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Serialize)]
struct FcmNotification<'a> {
    title: &'a str,
    body: &'a str,
    sound: &'a str,
}

#[derive(Debug, Serialize)]
struct FcmAndroidConfig {
    priority: &'static str,
}

#[derive(Debug, Serialize)]
struct FcmAps {
    sound: &'static str,
    badge: i64,
}

#[derive(Debug, Serialize)]
struct FcmApnsPayload {
    aps: FcmAps,
}

#[derive(Debug, Serialize)]
struct FcmApnsConfig {
    payload: FcmApnsPayload,
}

#[derive(Debug, Serialize)]
struct FcmSendRequest<'a> {
    to: &'a str,
    notification: FcmNotification<'a>,
    data: &'a HashMap<String, String>,
    android: FcmAndroidConfig,
    apns: FcmApnsConfig,
}

impl<'a> From<&'a PushMessage> for FcmSendRequest<'a> {
    fn from(message: &'a PushMessage) -> Self {
        Self {
            to: &message.device_token,
            notification: FcmNotification {
                title: &message.title,
                body: &message.body,
                sound: "default",
            },
            data: &message.data,
            android: FcmAndroidConfig { priority: "high" },
            apns: FcmApnsConfig {
                payload: FcmApnsPayload {
                    aps: FcmAps {
                        sound: "default",
                        badge: 1,
                    },
                },
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct FcmMessageResult {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FcmSendResponse {
    #[serde(default)]
    success: i64,
    #[serde(default)]
    results: Vec<FcmMessageResult>,
}

impl FcmSendResponse {
    fn into_gateway_response(self, raw: serde_json::Value) -> PushGatewayResponse {
        let success = self.success == 1;
        let error = if success {
            None
        } else {
            Some(
                self.results
                    .into_iter()
                    .find_map(|r| r.error)
                    .unwrap_or_else(|| "Unknown FCM error".to_string()),
            )
        };
        PushGatewayResponse {
            success,
            error,
            raw,
        }
    }
}

/// Delivers notifications through the Firebase Cloud Messaging legacy HTTP api
pub struct FcmPushGateway {
    client: Client,
    config: FcmConfig,
}

impl FcmPushGateway {
    pub fn new(config: FcmConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait::async_trait]
impl IPushGateway for FcmPushGateway {
    async fn send(&self, message: &PushMessage) -> Result<PushGatewayResponse, PushTransportError> {
        let res = self
            .client
            .post(&self.config.endpoint)
            .header("Authorization", format!("key={}", self.config.server_key))
            .json(&FcmSendRequest::from(message))
            .send()
            .await
            .map_err(|e| PushTransportError::Network(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(PushTransportError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let raw = res
            .json::<serde_json::Value>()
            .await
            .map_err(|e| PushTransportError::MalformedResponse(e.to_string()))?;
        let parsed = serde_json::from_value::<FcmSendResponse>(raw.clone())
            .map_err(|e| PushTransportError::MalformedResponse(e.to_string()))?;

        Ok(parsed.into_gateway_response(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(raw: serde_json::Value) -> PushGatewayResponse {
        let parsed = serde_json::from_value::<FcmSendResponse>(raw.clone()).unwrap();
        parsed.into_gateway_response(raw)
    }

    #[test]
    fn reads_successful_delivery() {
        let res = parse(json!({
            "multicast_id": 1,
            "success": 1,
            "failure": 0,
            "results": [{ "message_id": "0:1" }]
        }));
        assert!(res.success);
        assert_eq!(res.error, None);
    }

    #[test]
    fn reads_provider_rejection() {
        let res = parse(json!({
            "success": 0,
            "failure": 1,
            "results": [{ "error": "NotRegistered" }]
        }));
        assert!(!res.success);
        assert_eq!(res.error.as_deref(), Some("NotRegistered"));
        assert_eq!(res.raw["failure"], 1);

        let res = parse(json!({ "success": 0 }));
        assert_eq!(res.error.as_deref(), Some("Unknown FCM error"));
    }

    #[test]
    fn serializes_request_with_platform_options() {
        let mut data = HashMap::new();
        data.insert("booking_id".to_string(), "abc".to_string());
        let message = PushMessage {
            device_token: "token".into(),
            title: "Title".into(),
            body: "Body".into(),
            data,
        };
        let body = serde_json::to_value(FcmSendRequest::from(&message)).unwrap();
        assert_eq!(body["to"], "token");
        assert_eq!(body["notification"]["sound"], "default");
        assert_eq!(body["data"]["booking_id"], "abc");
        assert_eq!(body["android"]["priority"], "high");
        assert_eq!(body["apns"]["payload"]["aps"]["badge"], 1);
    }
}
