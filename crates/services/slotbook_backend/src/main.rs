// File: services/slotbook_backend/src/main.rs
mod service_factory;

use axum::{routing::get, Router};
use service_factory::SlotbookServiceFactory;
use slotbook_booking::{routes, BookingWorkflow};
use slotbook_common::services::ServiceFactory;
use slotbook_config::load_config;
use slotbook_db::{AccessCodeLedger, BookingStore, DbClient, SqlAccessCodeLedger, SqlBookingStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    slotbook_common::logging::init();

    let config = Arc::new(load_config()?);

    let db = DbClient::new(&config).await?;
    let ledger = SqlAccessCodeLedger::new(db.clone());
    let store = SqlBookingStore::new(db);
    ledger.init_schema().await?;
    store.init_schema().await?;
    info!("Database schema ready");

    let factory = SlotbookServiceFactory::new(config.clone()).await;
    // Slots must never be offered without the calendar's busy times, so a
    // missing busy-time source is a startup error, not a degraded mode.
    let busy_source = factory.busy_time_source().ok_or(
        "no busy-time source available: set use_gcal = true and configure [gcal]",
    )?;
    let notifier = factory.notifier();

    let calendar_id = config
        .gcal
        .as_ref()
        .and_then(|g| g.calendar_id.clone())
        .unwrap_or_else(|| "primary".to_string());

    let workflow = Arc::new(BookingWorkflow::new(
        ledger,
        store,
        busy_source,
        notifier,
        config.scheduling.clone(),
        config.notifications.clone(),
        calendar_id,
    ));

    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to the Slotbook API!" }))
        .merge(routes(config.clone(), workflow));

    let app = Router::new()
        .nest("/api", api_router)
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
