use crate::{
    reminder::send_scheduled_reminders::SendScheduledRemindersUseCase, shared::usecase::execute,
};
use actix_web::rt::time::{interval, sleep_until, Instant};
use booking_notifier_infra::NotifierContext;
use std::time::Duration;
use tracing::info;

/// Seconds until the next multiple of `interval_secs`, so that cycles run at
/// predictable wall clock times
pub fn get_start_delay(now_ts: usize, interval_secs: usize) -> usize {
    let secs_into_interval = (now_ts / 1000) % interval_secs;
    interval_secs - secs_into_interval
}

pub fn start_send_reminders_job(ctx: NotifierContext) {
    let interval_secs = match ctx.config.reminder_job_interval_minutes {
        Some(minutes) => minutes * 60,
        None => return,
    };

    actix_web::rt::spawn(async move {
        let now = ctx.sys.get_timestamp_millis();
        let secs_to_next_run = get_start_delay(now as usize, interval_secs as usize);
        let start = Instant::now() + Duration::from_secs(secs_to_next_run as u64);

        sleep_until(start).await;
        let mut cycle_interval = interval(Duration::from_secs(interval_secs));
        loop {
            cycle_interval.tick().await;
            let context = ctx.clone();
            actix_web::rt::spawn(send_reminders(context));
        }
    });
}

async fn send_reminders(ctx: NotifierContext) {
    // Errors are traced by `execute`
    if let Ok(summary) = execute(SendScheduledRemindersUseCase::default(), &ctx).await {
        info!(
            "Reminder cycle done. Processed: {}, sent: {}, failed: {}",
            summary.processed, summary.sent, summary.failed
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_delay_works() {
        assert_eq!(get_start_delay(50 * 1000, 60), 10);
        assert_eq!(get_start_delay(60 * 1000, 60), 60);
        assert_eq!(get_start_delay(59 * 1000, 60), 1);
        assert_eq!(get_start_delay(0, 300), 300);
        assert_eq!(get_start_delay(299 * 1000 + 999, 300), 1);
        assert_eq!(get_start_delay(301 * 1000, 300), 299);
    }
}
