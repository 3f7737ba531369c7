use super::{
    dedup::is_already_processed, deliver_reminder::deliver_reminder,
    find_candidates::find_reminder_candidates,
};
use crate::{
    error::NotifierError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use booking_notifier_api_structs::send_scheduled_reminders::*;
use booking_notifier_domain::{
    classify_reminder, get_reminder_windows, BookingWithDeviceTokens, NotificationResult,
    ReminderKind, ReminderWindow, ID,
};
use booking_notifier_infra::NotifierContext;
use chrono::{SecondsFormat, TimeZone, Utc};
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use tracing::{error, info};

fn handle_error(e: UseCaseError) -> NotifierError {
    match e {
        UseCaseError::StorageUnavailable(msg) => NotifierError::InternalError(msg),
    }
}

fn format_timestamp(ts: i64) -> String {
    Utc.timestamp_millis_opt(ts)
        .single()
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

impl From<ReminderCycleSummary> for APIResponse {
    fn from(summary: ReminderCycleSummary) -> Self {
        APIResponse::new(
            summary.processed,
            summary.sent,
            summary.failed,
            format_timestamp(summary.timestamp),
        )
    }
}

/// Entry point for external schedulers
pub async fn send_scheduled_reminders_controller(
    query_params: web::Query<QueryParams>,
    ctx: web::Data<NotifierContext>,
) -> Result<HttpResponse, NotifierError> {
    let usecase = SendScheduledRemindersUseCase {
        exclude_client: query_params.0.exclude_client,
    };

    execute(usecase, &ctx)
        .await
        .map(|summary| HttpResponse::Ok().json(APIResponse::from(summary)))
        .map_err(handle_error)
}

/// Runs one reminder cycle: every active booking that is due for a reminder
/// and has not been reminded of that kind before gets notified on all of the
/// client's devices.
#[derive(Debug, Default)]
pub struct SendScheduledRemindersUseCase {
    /// Client that should not be notified, e.g. the one triggering the cycle
    /// through the api. The in process job never excludes anyone.
    pub exclude_client: Option<ID>,
}

#[derive(Debug)]
pub enum UseCaseError {
    /// The booking store could not be reached at all
    StorageUnavailable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReminderCycleSummary {
    /// Bookings a delivery was attempted for
    pub processed: usize,
    pub sent: usize,
    pub failed: usize,
    /// The instant the cycle was evaluated at
    pub timestamp: i64,
}

/// Candidates of every window, a booking found by several windows is kept once.
/// A window whose lookup fails is skipped so that the others still get processed.
async fn collect_candidates(
    windows: &[ReminderWindow],
    exclude_client: Option<&ID>,
    ctx: &NotifierContext,
) -> Vec<BookingWithDeviceTokens> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for window in windows {
        match find_reminder_candidates(window, exclude_client, ctx).await {
            Ok(window_candidates) => {
                for candidate in window_candidates {
                    if seen.insert(candidate.booking.id.clone()) {
                        candidates.push(candidate);
                    }
                }
            }
            Err(e) => {
                error!(
                    "Unable to find bookings for the {} reminder window. Err: {:?}",
                    window.kind, e
                );
            }
        }
    }

    candidates
}

async fn select_due_reminders(
    candidates: Vec<BookingWithDeviceTokens>,
    windows: &[ReminderWindow],
    ctx: &NotifierContext,
) -> Vec<(BookingWithDeviceTokens, ReminderKind)> {
    let mut due = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let kind = match classify_reminder(candidate.booking.start_ts, windows) {
            Some(kind) => kind,
            None => continue,
        };
        match is_already_processed(&candidate.booking.id, kind, ctx).await {
            Ok(false) => due.push((candidate, kind)),
            Ok(true) => continue,
            // Never send without a successful check
            Err(e) => {
                error!(
                    "Unable to check reminder log of booking {}. Err: {:?}",
                    candidate.booking.id, e
                );
            }
        }
    }

    due
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendScheduledRemindersUseCase {
    type Response = ReminderCycleSummary;

    type Error = UseCaseError;

    const NAME: &'static str = "SendScheduledReminders";

    async fn execute(&mut self, ctx: &NotifierContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .bookings
            .check_connection()
            .await
            .map_err(|e| UseCaseError::StorageUnavailable(e.to_string()))?;

        let now = ctx.sys.get_timestamp_millis();
        let windows = get_reminder_windows(now, &ctx.config.reminder_tolerances);

        let candidates = collect_candidates(&windows, self.exclude_client.as_ref(), ctx).await;
        let due = select_due_reminders(candidates, &windows, ctx).await;
        info!("Found {} bookings to remind", due.len());

        // Each delivery settles on its own, a failing booking never cancels the others
        let results: Vec<NotificationResult> = stream::iter(due.iter())
            .map(|(candidate, kind)| deliver_reminder(candidate, *kind, ctx))
            .buffer_unordered(ctx.config.max_concurrent_deliveries)
            .collect()
            .await;

        let sent = results.iter().filter(|r| r.success).count();
        Ok(ReminderCycleSummary {
            processed: results.len(),
            sent,
            failed: results.len() - sent,
            timestamp: now,
        })
    }
}
