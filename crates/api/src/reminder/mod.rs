mod dedup;
mod deliver_reminder;
mod find_candidates;
pub mod send_scheduled_reminders;

use actix_web::web;
use send_scheduled_reminders::send_scheduled_reminders_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/reminders/dispatch",
        web::post().to(send_scheduled_reminders_controller),
    );
}
