use crate::{APIResponse, BaseClient, ID};
use booking_notifier_api_structs::*;
use reqwest::StatusCode;
use std::{collections::HashMap, sync::Arc};

#[derive(Clone)]
pub struct NotificationClient {
    base: Arc<BaseClient>,
}

pub struct SendPushNotificationInput {
    pub booking_id: ID,
    pub client_id: ID,
    pub title: Option<String>,
    pub body: Option<String>,
    pub data: Option<HashMap<String, String>>,
}

impl NotificationClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    /// Notifies the latest device of the client about the booking
    pub async fn send_push(
        &self,
        input: SendPushNotificationInput,
    ) -> APIResponse<send_push_notification::APIResponse> {
        let body = send_push_notification::RequestBody {
            booking_id: input.booking_id,
            client_id: input.client_id,
            title: input.title,
            body: input.body,
            data: input.data,
        };

        self.base
            .post(body, "notifications/push".into(), StatusCode::OK)
            .await
    }
}
