use booking_notifier_domain::{Booking, BookingStatus, DeviceToken};
use booking_notifier_infra::{
    InMemoryBookingRepo, InMemoryDeviceTokenRepo, InMemoryNotificationLogRepo, InMemoryPushGateway,
    InMemoryReminderLogRepo, NotifierContext, Repos, StaticSys,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub struct TestContext {
    pub ctx: NotifierContext,
    pub bookings: Arc<InMemoryBookingRepo>,
    pub device_tokens: Arc<InMemoryDeviceTokenRepo>,
    pub gateway: Arc<InMemoryPushGateway>,
}

pub fn setup(now: i64) -> TestContext {
    let bookings = Arc::new(InMemoryBookingRepo::new());
    let device_tokens = Arc::new(InMemoryDeviceTokenRepo::new());
    let gateway = Arc::new(InMemoryPushGateway::new());

    let mut ctx = NotifierContext::create_inmemory();
    ctx.repos = Repos {
        bookings: bookings.clone(),
        device_tokens: device_tokens.clone(),
        reminder_logs: Arc::new(InMemoryReminderLogRepo::new()),
        notification_logs: Arc::new(InMemoryNotificationLogRepo::new()),
    };
    ctx.push_gateway = gateway.clone();
    ctx.sys = Arc::new(StaticSys(now));

    TestContext {
        ctx,
        bookings,
        device_tokens,
        gateway,
    }
}

pub fn ts(s: &str) -> i64 {
    DateTime::parse_from_rfc3339(s)
        .expect("Valid RFC3339")
        .with_timezone(&Utc)
        .timestamp_millis()
}

pub fn booking_at(start_ts: i64) -> Booking {
    Booking {
        id: Default::default(),
        client_id: Default::default(),
        master_id: Default::default(),
        client_name: Some("Anna".into()),
        service_name: Some("Manicure".into()),
        start_ts,
        status: BookingStatus::Confirmed,
    }
}

pub fn token_for(booking: &Booking, token: &str, updated: i64) -> DeviceToken {
    DeviceToken {
        user_id: booking.client_id.clone(),
        token: token.into(),
        updated,
    }
}
