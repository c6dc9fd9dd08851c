use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;

use cb_api::{middleware::cors::create_cors, routes, telemetry, AppState};
use cb_core::repositories::InMemoryChallengeStore;
use cb_core::services::otp::{Dispatcher, OtpService, OtpServiceConfig};
use cb_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load and validate configuration; missing Twilio credentials abort here
    let config = AppConfig::load()?;

    telemetry::init(&config.logging);

    tracing::info!(
        environment = %config.environment,
        dispatch_mode = %config.dispatch_mode,
        "Starting Chairbook API server"
    );

    let transport = cb_infra::create_transport(&config)?;
    let dispatcher = Dispatcher::new(config.dispatch_mode, transport);

    let store = Arc::new(InMemoryChallengeStore::new());
    let otp_service = Arc::new(OtpService::new(
        store,
        dispatcher,
        OtpServiceConfig::from(&config.otp),
    ));

    // Periodic removal of stale challenges
    let _sweep = otp_service.clone().start_sweep_task();

    let state = web::Data::new(AppState::new(otp_service));
    let allowed_origins = config.server.allowed_origins.clone();
    let bind_address = config.server.bind_address();
    tracing::info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(create_cors(&allowed_origins))
            .wrap(TracingLogger::default())
            .configure(routes::configure::<InMemoryChallengeStore>)
    });

    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_address)?.run().await?;
    Ok(())
}
