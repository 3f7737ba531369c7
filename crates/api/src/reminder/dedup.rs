use booking_notifier_domain::{DedupPolicy, ReminderKind, ID};
use booking_notifier_infra::NotifierContext;

/// Checks the reminder log for an earlier attempt at the same reminder.
///
/// This is a plain read and not a lock. Two overlapping cycles can both see no
/// entry and notify the same booking twice, which is tolerated since push
/// providers deliver at least once anyway.
pub async fn is_already_processed(
    booking_id: &ID,
    kind: ReminderKind,
    ctx: &NotifierContext,
) -> anyhow::Result<bool> {
    let count = ctx
        .repos
        .reminder_logs
        .count_matching(booking_id, kind, ctx.config.dedup_policy.statuses())
        .await?;
    if count > 0 {
        return Ok(true);
    }

    match ctx.config.dedup_policy {
        DedupPolicy::AnyAttempt => Ok(false),
        // A client without devices would otherwise add a failed entry every cycle
        DedupPolicy::SentOnly => {
            let entries = ctx.repos.reminder_logs.find_by_booking(booking_id).await?;
            Ok(entries
                .iter()
                .any(|e| e.kind == kind && e.is_missing_tokens()))
        }
    }
}
