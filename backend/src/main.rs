//! Backend entry-point: wires adapters, services, REST endpoints, and
//! OpenAPI docs.

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use backend::api::health::{live, ready, HealthState};
use backend::api::{self, AppState};
use backend::config::{AppConfig, ProcessEnv};
use backend::outbound::{IpGeolocationProvider, RazorpayGateway};
#[cfg(debug_assertions)]
use backend::ApiDoc;
use backend::Trace;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::from_env(&ProcessEnv).map_err(std::io::Error::other)?;
    info!(
        key_fingerprint = %config.gateway.key_fingerprint(),
        gateway_currency = %config.gateway_currency,
        "payment gateway configured"
    );

    let gateway = RazorpayGateway::new(config.gateway).map_err(std::io::Error::other)?;
    let geolocation =
        IpGeolocationProvider::new(config.geolocation_url, config.geolocation_timeout)
            .map_err(std::io::Error::other)?;
    let state = AppState::with_in_memory_stores(
        Arc::new(gateway),
        Arc::new(geolocation),
        config.gateway_currency,
    );

    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the probe state stays shared.
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        let mut app = App::new()
            .app_data(server_health_state.clone())
            .app_data(web::Data::new(state.clone()))
            .wrap(Trace)
            .service(web::scope("/api/v1").configure(api::routes))
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        {
            app = app
                .service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
        }

        app
    })
    .bind(config.bind_addr)?;

    health_state.mark_ready();
    server.run().await
}
