use booking_notifier_domain::{
    Booking, BookingWithDeviceTokens, DeliveryError, NotificationResult, ReminderKind,
    ReminderLogEntry, ReminderLogStatus, ReminderMessage, TokenDeliveryOutcome,
};
use booking_notifier_infra::{NotifierContext, PushMessage};
use futures::future::join_all;
use std::collections::HashMap;
use tracing::{error, warn};

/// Sends the reminder to every device of the client and records each attempt
/// in the reminder log. The reminder counts as delivered if any device got it.
pub async fn deliver_reminder(
    candidate: &BookingWithDeviceTokens,
    kind: ReminderKind,
    ctx: &NotifierContext,
) -> NotificationResult {
    let booking = &candidate.booking;

    if candidate.device_tokens.is_empty() {
        warn!(
            "No device tokens found for client {} of booking {}",
            booking.client_id, booking.id
        );
        log_attempt(booking, kind, None, &Err(DeliveryError::NoTokens), None, ctx).await;
        return NotificationResult {
            booking_id: booking.id.clone(),
            kind,
            success: false,
            outcomes: Vec::new(),
        };
    }

    let message = kind.message(booking, ctx.config.timezone);
    let data = kind.data(&booking.id);
    let outcomes = join_all(
        candidate
            .device_tokens
            .iter()
            .map(|t| deliver_to_device(booking, kind, &message, &data, &t.token, ctx)),
    )
    .await;

    NotificationResult {
        booking_id: booking.id.clone(),
        kind,
        success: outcomes.iter().any(|o| o.result.is_ok()),
        outcomes,
    }
}

async fn deliver_to_device(
    booking: &Booking,
    kind: ReminderKind,
    message: &ReminderMessage,
    data: &HashMap<String, String>,
    device_token: &str,
    ctx: &NotifierContext,
) -> TokenDeliveryOutcome {
    let push_message = PushMessage {
        device_token: device_token.to_string(),
        title: message.title.clone(),
        body: message.body.clone(),
        data: data.clone(),
    };

    let (result, provider_response) = match ctx.push_gateway.send(&push_message).await {
        Ok(res) if res.success => (Ok(()), Some(res.raw)),
        Ok(res) => {
            let reason = res
                .error
                .unwrap_or_else(|| "Unknown provider error".to_string());
            (Err(DeliveryError::ProviderRejected(reason)), Some(res.raw))
        }
        Err(e) => (Err(DeliveryError::Transport(e.to_string())), None),
    };

    if let Err(e) = &result {
        warn!(
            "Unable to deliver {} reminder for booking {} to a device: {}",
            kind, booking.id, e
        );
    }

    log_attempt(
        booking,
        kind,
        Some(device_token),
        &result,
        provider_response,
        ctx,
    )
    .await;

    TokenDeliveryOutcome {
        device_token: device_token.to_string(),
        result,
    }
}

async fn log_attempt(
    booking: &Booking,
    kind: ReminderKind,
    device_token: Option<&str>,
    result: &Result<(), DeliveryError>,
    provider_response: Option<serde_json::Value>,
    ctx: &NotifierContext,
) {
    let entry = ReminderLogEntry {
        id: Default::default(),
        booking_id: booking.id.clone(),
        client_id: booking.client_id.clone(),
        kind,
        status: match result {
            Ok(_) => ReminderLogStatus::Sent,
            Err(_) => ReminderLogStatus::Failed,
        },
        device_token: device_token.map(|t| t.to_string()),
        error_message: result.as_ref().err().map(|e| e.to_string()),
        provider_response,
        created: ctx.sys.get_timestamp_millis(),
    };

    if let Err(e) = ctx.repos.reminder_logs.insert(&entry).await {
        error!(
            "Unable to store reminder log for booking {}. Err: {:?}",
            booking.id, e
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::*;
    use booking_notifier_domain::ID;
    use booking_notifier_infra::IReminderLogRepo;
    use std::sync::Arc;

    #[actix_web::test]
    async fn no_tokens_logs_single_failure_without_provider_calls() {
        let test = setup(ts("2024-01-01T10:00:00Z"));
        let booking = booking_at(ts("2024-01-01T11:00:00Z"));
        let candidate = BookingWithDeviceTokens {
            booking: booking.clone(),
            device_tokens: Vec::new(),
        };

        let res = deliver_reminder(&candidate, ReminderKind::OneHour, &test.ctx).await;
        assert!(!res.success);
        assert!(res.outcomes.is_empty());
        assert!(test.gateway.sent().is_empty());

        let logs = test
            .ctx
            .repos
            .reminder_logs
            .find_by_booking(&booking.id)
            .await
            .unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, ReminderLogStatus::Failed);
        assert_eq!(logs[0].error_message.as_deref(), Some("no tokens"));
        assert_eq!(logs[0].device_token, None);
    }

    #[actix_web::test]
    async fn one_working_device_is_enough() {
        let test = setup(ts("2024-01-01T10:00:00Z"));
        let booking = booking_at(ts("2024-01-01T11:00:00Z"));
        let candidate = BookingWithDeviceTokens {
            booking: booking.clone(),
            device_tokens: vec![
                token_for(&booking, "stale", 1),
                token_for(&booking, "offline", 2),
                token_for(&booking, "phone", 3),
            ],
        };
        test.gateway.reject_token("stale");
        test.gateway.fail_transport_for("offline");

        let res = deliver_reminder(&candidate, ReminderKind::OneHour, &test.ctx).await;
        assert!(res.success);
        assert_eq!(res.outcomes.len(), 3);
        assert_eq!(test.gateway.sent().len(), 3);

        let logs = test
            .ctx
            .repos
            .reminder_logs
            .find_by_booking(&booking.id)
            .await
            .unwrap();
        assert_eq!(logs.len(), 3);

        let log_for = |token: &str| {
            logs.iter()
                .find(|l| l.device_token.as_deref() == Some(token))
                .unwrap()
        };
        let stale = log_for("stale");
        assert_eq!(stale.status, ReminderLogStatus::Failed);
        assert_eq!(stale.error_message.as_deref(), Some("NotRegistered"));
        assert!(stale.provider_response.is_some());

        let offline = log_for("offline");
        assert_eq!(offline.status, ReminderLogStatus::Failed);
        assert!(offline.provider_response.is_none());
        assert!(offline
            .error_message
            .as_deref()
            .unwrap()
            .contains("connection refused"));

        let phone = log_for("phone");
        assert_eq!(phone.status, ReminderLogStatus::Sent);
        assert_eq!(phone.kind, ReminderKind::OneHour);
        assert_eq!(phone.error_message, None);
    }

    #[actix_web::test]
    async fn all_devices_failing_fails_the_reminder() {
        let test = setup(ts("2024-01-01T10:00:00Z"));
        let booking = booking_at(ts("2024-01-02T10:00:00Z"));
        let candidate = BookingWithDeviceTokens {
            booking: booking.clone(),
            device_tokens: vec![token_for(&booking, "stale", 1)],
        };
        test.gateway.reject_token("stale");

        let res = deliver_reminder(&candidate, ReminderKind::TwentyFourHours, &test.ctx).await;
        assert!(!res.success);
        assert_eq!(
            res.outcomes[0].result,
            Err(DeliveryError::ProviderRejected("NotRegistered".into()))
        );
    }

    #[actix_web::test]
    async fn sends_rendered_message_with_booking_data() {
        let test = setup(ts("2024-01-01T10:00:00Z"));
        let booking = booking_at(ts("2024-01-01T11:00:00Z"));
        let candidate = BookingWithDeviceTokens {
            booking: booking.clone(),
            device_tokens: vec![token_for(&booking, "phone", 1)],
        };

        deliver_reminder(&candidate, ReminderKind::OneHour, &test.ctx).await;
        let sent = test.gateway.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].device_token, "phone");
        assert_eq!(
            sent[0].title,
            ReminderKind::OneHour
                .message(&booking, test.ctx.config.timezone)
                .title
        );
        assert_eq!(sent[0].data.get("booking_id"), Some(&booking.id.as_string()));
        assert_eq!(
            sent[0].data.get("reminder_type").map(|s| s.as_str()),
            Some("1h")
        );
    }

    struct ReadOnlyLogRepo;

    #[async_trait::async_trait]
    impl IReminderLogRepo for ReadOnlyLogRepo {
        async fn insert(&self, _entry: &ReminderLogEntry) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("cannot execute INSERT in a read-only transaction"))
        }

        async fn count_matching(
            &self,
            _booking_id: &ID,
            _kind: ReminderKind,
            _statuses: &[ReminderLogStatus],
        ) -> anyhow::Result<i64> {
            Ok(0)
        }

        async fn find_by_booking(&self, _booking_id: &ID) -> anyhow::Result<Vec<ReminderLogEntry>> {
            Ok(Vec::new())
        }
    }

    #[actix_web::test]
    async fn failing_log_write_keeps_delivery_outcome() {
        let mut test = setup(ts("2024-01-01T10:00:00Z"));
        test.ctx.repos.reminder_logs = Arc::new(ReadOnlyLogRepo);
        let booking = booking_at(ts("2024-01-01T11:00:00Z"));
        let candidate = BookingWithDeviceTokens {
            booking: booking.clone(),
            device_tokens: vec![token_for(&booking, "phone", 1), token_for(&booking, "stale", 2)],
        };
        test.gateway.reject_token("stale");

        let res = deliver_reminder(&candidate, ReminderKind::OneHour, &test.ctx).await;
        assert!(res.success);
        assert_eq!(res.outcomes.len(), 2);
        assert_eq!(test.gateway.sent().len(), 2);

        let without_tokens = BookingWithDeviceTokens {
            booking: booking_at(ts("2024-01-01T11:00:00Z")),
            device_tokens: Vec::new(),
        };
        let res = deliver_reminder(&without_tokens, ReminderKind::OneHour, &test.ctx).await;
        assert!(!res.success);
        assert_eq!(test.gateway.sent().len(), 2);
    }
}
