//! Service entry-point: loads `.env`, reads configuration, opens the store and serves
//! `/api/users`.

use std::sync::Arc;

use actix_web::{App, HttpServer, middleware::Logger, web};
use clap::Parser;
use tracing::{error, info, warn};

use userdesk::{config::Config, http, service::UserService, telemetry::setup_tracing};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    setup_tracing();
    let config = Config::parse();

    let store = config.open_store().await.map_err(|e| {
        error!(error = %e, store = ?config.store, "failed to open store");
        std::io::Error::other(e)
    })?;
    info!(store = ?config.store, "store opened");

    let service = UserService::start(store).await.map_err(|e| {
        error!(error = %e, "failed to create unique index on users.email");
        std::io::Error::other(e)
    })?;

    let service = web::Data::new(service);
    let server_service = service.clone();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(http::cors())
            .wrap(Logger::default())
            .app_data(server_service.clone())
            .configure(http::configure)
    })
    .bind((config.host.as_str(), config.port))?;

    info!(host = %config.host, port = config.port, "server running");
    server.run().await?;

    match Arc::try_unwrap(service.into_inner()) {
        Ok(service) => {
            if let Err(e) = service.shutdown().await {
                warn!(error = %e, "store shutdown failed");
            }
            info!("store closed");
        }
        Err(_) => warn!("store still in use at exit; skipping shutdown"),
    }

    Ok(())
}
