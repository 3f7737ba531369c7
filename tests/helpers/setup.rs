use booking_notifier_api::Application;
use booking_notifier_infra::{
    InMemoryBookingRepo, InMemoryDeviceTokenRepo, InMemoryNotificationLogRepo, InMemoryPushGateway,
    InMemoryReminderLogRepo, NotifierContext, Repos,
};
use booking_notifier_sdk::NotifierSDK;
use std::sync::Arc;

pub struct TestApp {
    pub bookings: Arc<InMemoryBookingRepo>,
    pub device_tokens: Arc<InMemoryDeviceTokenRepo>,
    pub gateway: Arc<InMemoryPushGateway>,
}

fn inmemory_context() -> (NotifierContext, TestApp) {
    let app = TestApp {
        bookings: Arc::new(InMemoryBookingRepo::new()),
        device_tokens: Arc::new(InMemoryDeviceTokenRepo::new()),
        gateway: Arc::new(InMemoryPushGateway::new()),
    };

    let mut ctx = NotifierContext::create_inmemory();
    ctx.repos = Repos {
        bookings: app.bookings.clone(),
        device_tokens: app.device_tokens.clone(),
        reminder_logs: Arc::new(InMemoryReminderLogRepo::new()),
        notification_logs: Arc::new(InMemoryNotificationLogRepo::new()),
    };
    ctx.push_gateway = app.gateway.clone();
    ctx.config.port = 0; // Random port
    // Cycles are only triggered through the api in tests
    ctx.config.reminder_job_interval_minutes = None;

    (ctx, app)
}

async fn launch(ctx: NotifierContext) -> NotifierSDK {
    let application = Application::new(ctx)
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    NotifierSDK::new(address)
}

// Launch the application as a background task
pub async fn spawn_app() -> (TestApp, NotifierSDK) {
    let (ctx, app) = inmemory_context();
    let sdk = launch(ctx).await;
    (app, sdk)
}

/// Launch the application with a custom context, e.g. with failing repos
pub async fn spawn_app_with<F: FnOnce(&mut NotifierContext)>(configure: F) -> (TestApp, NotifierSDK) {
    let (mut ctx, app) = inmemory_context();
    configure(&mut ctx);
    let sdk = launch(ctx).await;
    (app, sdk)
}
