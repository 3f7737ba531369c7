use crate::{
    error::NotifierError,
    shared::usecase::{execute, UseCase},
};
use actix_web::{web, HttpResponse};
use booking_notifier_api_structs::send_push_notification::*;
use booking_notifier_domain::{BookingNotification, NotificationLogEntry, ID};
use booking_notifier_infra::{NotifierContext, PushGatewayResponse, PushMessage};
use tracing::error;

fn handle_error(e: UseCaseError) -> NotifierError {
    match e {
        UseCaseError::NoDeviceToken(client_id) => NotifierError::NotFound(format!(
            "No device token found for the client with id: {}",
            client_id
        )),
        UseCaseError::StorageError => NotifierError::InternalError(
            "Unable to look up the device tokens of the client".into(),
        ),
        UseCaseError::DeliveryFailed(msg) => NotifierError::InternalError(msg),
    }
}

pub async fn send_push_notification_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<NotifierContext>,
) -> Result<HttpResponse, NotifierError> {
    let body = body.0;
    let usecase = SendPushNotificationUseCase {
        notification: BookingNotification::new(
            body.booking_id,
            body.client_id,
            body.title,
            body.body,
            body.data,
        ),
    };

    execute(usecase, &ctx)
        .await
        .map(|res| {
            let message = if res.success {
                "Notification sent"
            } else {
                "Notification rejected by the push provider"
            };
            HttpResponse::Ok().json(APIResponse {
                success: res.success,
                message: message.into(),
                provider_response: res.raw,
            })
        })
        .map_err(handle_error)
}

/// Sends a single notification about a booking to the most recently
/// registered device of the client and records it in the notification log
#[derive(Debug)]
pub struct SendPushNotificationUseCase {
    pub notification: BookingNotification,
}

#[derive(Debug)]
pub enum UseCaseError {
    NoDeviceToken(ID),
    StorageError,
    DeliveryFailed(String),
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendPushNotificationUseCase {
    type Response = PushGatewayResponse;

    type Error = UseCaseError;

    const NAME: &'static str = "SendPushNotification";

    async fn execute(&mut self, ctx: &NotifierContext) -> Result<Self::Response, Self::Error> {
        let notification = &self.notification;
        let device_token = ctx
            .repos
            .device_tokens
            .find_by_users(std::slice::from_ref(&notification.client_id))
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .into_iter()
            .next()
            .map(|t| t.token)
            .ok_or_else(|| UseCaseError::NoDeviceToken(notification.client_id.clone()))?;

        let message = PushMessage {
            device_token: device_token.clone(),
            title: notification.title.clone(),
            body: notification.body.clone(),
            data: notification.data.clone(),
        };
        let res = ctx.push_gateway.send(&message).await;

        let mut entry = NotificationLogEntry {
            id: Default::default(),
            booking_id: notification.booking_id.clone(),
            client_id: notification.client_id.clone(),
            device_token,
            title: notification.title.clone(),
            body: notification.body.clone(),
            success: false,
            error_message: None,
            provider_response: None,
            created: ctx.sys.get_timestamp_millis(),
        };
        match &res {
            Ok(gateway_res) => {
                entry.success = gateway_res.success;
                entry.error_message = gateway_res.error.clone();
                entry.provider_response = Some(gateway_res.raw.clone());
            }
            Err(e) => entry.error_message = Some(e.to_string()),
        }
        if let Err(e) = ctx.repos.notification_logs.insert(&entry).await {
            error!(
                "Unable to store notification log for booking {}. Err: {:?}",
                notification.booking_id, e
            );
        }

        res.map_err(|e| UseCaseError::DeliveryFailed(e.to_string()))
    }
}
