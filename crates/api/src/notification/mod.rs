mod send_push_notification;

use actix_web::web;
use send_push_notification::send_push_notification_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/notifications/push",
        web::post().to(send_push_notification_controller),
    );
}
