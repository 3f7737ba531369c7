use crate::{APIResponse, BaseClient, ID};
use booking_notifier_api_structs::*;
use reqwest::StatusCode;
use serde_json::json;
use std::sync::Arc;

#[derive(Clone)]
pub struct ReminderClient {
    base: Arc<BaseClient>,
}

impl ReminderClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    /// Runs a reminder cycle on the server and returns its summary. The
    /// `exclude_client` will not be notified in this cycle.
    pub async fn dispatch(
        &self,
        exclude_client: Option<ID>,
    ) -> APIResponse<send_scheduled_reminders::APIResponse> {
        let path = match exclude_client {
            Some(client_id) => format!("reminders/dispatch?excludeClient={}", client_id),
            None => "reminders/dispatch".into(),
        };
        self.base.post(json!({}), path, StatusCode::OK).await
    }
}
