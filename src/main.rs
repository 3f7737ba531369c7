mod telemetry;

use booking_notifier_api::Application;
use booking_notifier_infra::{run_migration, setup_context};
use telemetry::{get_subscriber, init_subscriber};
use tracing::error;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    openssl_probe::init_ssl_cert_env_vars();

    let subscriber = get_subscriber("booking_notifier_server".into(), "info".into());
    init_subscriber(subscriber);

    if let Err(e) = run_migration().await {
        error!("Unable to run migrations: {:?}", e);
    }
    let context = setup_context().await;

    let app = Application::new(context).await?;
    app.start().await
}
