use booking_notifier_domain::{BookingWithDeviceTokens, DeviceToken, ReminderWindow, ID};
use booking_notifier_infra::{BookingReminderQuery, NotifierContext};
use std::collections::HashMap;

/// Finds the active bookings starting within the `ReminderWindow` together with
/// every device token of their clients
pub async fn find_reminder_candidates(
    window: &ReminderWindow,
    exclude_client: Option<&ID>,
    ctx: &NotifierContext,
) -> anyhow::Result<Vec<BookingWithDeviceTokens>> {
    let query = BookingReminderQuery::new(window, exclude_client.cloned());
    let bookings = ctx.repos.bookings.find_reminder_candidates(&query).await?;
    if bookings.is_empty() {
        return Ok(Vec::new());
    }

    let mut client_ids: Vec<ID> = Vec::with_capacity(bookings.len());
    for booking in &bookings {
        if !client_ids.contains(&booking.client_id) {
            client_ids.push(booking.client_id.clone());
        }
    }

    let mut tokens_lookup: HashMap<ID, Vec<DeviceToken>> = HashMap::new();
    for token in ctx.repos.device_tokens.find_by_users(&client_ids).await? {
        let user_tokens = tokens_lookup.entry(token.user_id.clone()).or_default();
        // The same device can be registered more than once
        if !user_tokens.iter().any(|t| t.token == token.token) {
            user_tokens.push(token);
        }
    }

    Ok(bookings
        .into_iter()
        .map(|booking| {
            let device_tokens = tokens_lookup
                .get(&booking.client_id)
                .cloned()
                .unwrap_or_default();
            BookingWithDeviceTokens {
                booking,
                device_tokens,
            }
        })
        .collect())
}
