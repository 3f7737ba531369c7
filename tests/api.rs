mod helpers;

use booking_notifier_domain::Booking;
use booking_notifier_infra::{BookingReminderQuery, IBookingRepo};
use booking_notifier_sdk::{APIError, SendPushNotificationInput};
use helpers::setup::{spawn_app, spawn_app_with};
use helpers::utils::{booking_starting_in, device_token};
use std::sync::Arc;

#[actix_web::test]
async fn test_status_ok() {
    let (_, sdk) = spawn_app().await;
    assert!(sdk.status.check_health().await.is_ok());
}

#[actix_web::test]
async fn test_dispatch_without_bookings() {
    let (app, sdk) = spawn_app().await;
    let res = sdk
        .reminder
        .dispatch(None)
        .await
        .expect("Expected dispatch to succeed");
    assert_eq!(res.processed, 0);
    assert_eq!(res.sent, 0);
    assert_eq!(res.failed, 0);
    assert!(!res.timestamp.is_empty());
    assert!(app.gateway.sent().is_empty());
}

#[actix_web::test]
async fn test_dispatch_sends_each_reminder_once() {
    let (app, sdk) = spawn_app().await;

    let in_one_hour = booking_starting_in(60);
    let tomorrow = booking_starting_in(24 * 60);
    let no_devices = booking_starting_in(60);
    for booking in &[&in_one_hour, &tomorrow, &no_devices] {
        app.bookings.insert(booking);
    }
    app.device_tokens.insert(&device_token(&in_one_hour, "phone"));
    app.device_tokens.insert(&device_token(&in_one_hour, "watch"));
    app.device_tokens.insert(&device_token(&tomorrow, "laptop"));

    let res = sdk
        .reminder
        .dispatch(None)
        .await
        .expect("Expected dispatch to succeed");
    assert_eq!(res.processed, 3);
    assert_eq!(res.sent, 2);
    assert_eq!(res.failed, 1);
    assert_eq!(app.gateway.sent().len(), 3);

    let res = sdk
        .reminder
        .dispatch(None)
        .await
        .expect("Expected dispatch to succeed");
    assert_eq!(res.processed, 0);
    assert_eq!(app.gateway.sent().len(), 3);
}

struct UnreachableRepo;

#[async_trait::async_trait]
impl IBookingRepo for UnreachableRepo {
    async fn find_reminder_candidates(
        &self,
        _query: &BookingReminderQuery,
    ) -> anyhow::Result<Vec<Booking>> {
        Err(anyhow::anyhow!("connection refused"))
    }

    async fn check_connection(&self) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("connection refused"))
    }
}

#[actix_web::test]
async fn test_dispatch_fails_when_store_is_unreachable() {
    let (_, sdk) = spawn_app_with(|ctx| {
        ctx.repos.bookings = Arc::new(UnreachableRepo);
    })
    .await;

    match sdk.reminder.dispatch(None).await {
        Err(APIError::UnexpectedStatusCode(status)) => assert_eq!(status.as_u16(), 500),
        res => panic!("Expected internal server error, got: {:?}", res),
    }
}

#[actix_web::test]
async fn test_dispatch_skips_excluded_client() {
    let (app, sdk) = spawn_app().await;

    let caller = booking_starting_in(60);
    let other = booking_starting_in(60);
    for booking in &[&caller, &other] {
        app.bookings.insert(booking);
        app.device_tokens.insert(&device_token(booking, "phone"));
    }

    let res = sdk
        .reminder
        .dispatch(Some(caller.client_id.clone()))
        .await
        .expect("Expected dispatch to succeed");
    assert_eq!(res.processed, 1);
    assert_eq!(res.sent, 1);
}

#[actix_web::test]
async fn test_push_notification_to_client_device() {
    let (app, sdk) = spawn_app().await;
    let booking = booking_starting_in(3 * 24 * 60);
    app.device_tokens.insert(&device_token(&booking, "phone"));

    let res = sdk
        .notification
        .send_push(SendPushNotificationInput {
            booking_id: booking.id.clone(),
            client_id: booking.client_id.clone(),
            title: Some("Booking confirmed".into()),
            body: None,
            data: None,
        })
        .await
        .expect("Expected notification to be sent");
    assert!(res.success);
    assert_eq!(res.message, "Notification sent");

    let sent = app.gateway.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].device_token, "phone");
    assert_eq!(sent[0].title, "Booking confirmed");
    assert_eq!(sent[0].data.get("booking_id"), Some(&booking.id.to_string()));
}

#[actix_web::test]
async fn test_push_notification_without_device_is_not_found() {
    let (app, sdk) = spawn_app().await;
    let booking = booking_starting_in(60);

    let res = sdk
        .notification
        .send_push(SendPushNotificationInput {
            booking_id: booking.id.clone(),
            client_id: booking.client_id.clone(),
            title: None,
            body: None,
            data: None,
        })
        .await;
    match res {
        Err(APIError::UnexpectedStatusCode(status)) => assert_eq!(status.as_u16(), 404),
        res => panic!("Expected not found, got: {:?}", res),
    }
    assert!(app.gateway.sent().is_empty());
}
