pub mod chain;
pub mod extract;
pub mod health;
pub mod processes;
mod rate_limit;
pub mod sensors;
pub mod subprocesses;

use axum::{
    routing::{get, put},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use utoipa::{OpenApi, ToSchema};
use utoipa_scalar::{Scalar, Servable};

use crate::common::AppState;
use rate_limit::FallbackIpKeyExtractor;

/// Plain acknowledgement body
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::ping,
        processes::list_processes,
        processes::get_current_process,
        processes::get_process,
        processes::create_process,
        processes::update_process,
        processes::delete_process,
        subprocesses::create_subprocess,
        subprocesses::list_subprocesses,
        subprocesses::get_subprocess,
        subprocesses::update_subprocess,
        subprocesses::delete_subprocess,
        sensors::list_sensors,
        sensors::create_sensors,
        sensors::list_mac_addresses,
        sensors::count_sensors,
        sensors::get_sensor,
        sensors::update_sensor,
        sensors::delete_sensor,
        sensors::delete_all_sensors,
        chain::update_status,
        chain::create_chain,
        chain::clean_database,
    ),
    components(
        schemas(
            MessageResponse,
            health::PingResponse,
            processes::ProcessPayload,
            processes::ProcessResponse,
            processes::ProcessDates,
            processes::ProcessDeletedResponse,
            subprocesses::SubprocessPayload,
            subprocesses::SubprocessResponse,
            sensors::SensorPayload,
            sensors::SensorBatch,
            sensors::SensorResponse,
            sensors::SensorCountResponse,
            chain::StatusPayload,
            chain::StatusResponse,
            chain::ChainResponse,
            chain::CleanDatabaseResponse,
            crate::avimex::ForwardReport,
            crate::services::cascade::DeletedRows,
        )
    ),
    tags(
        (name = "health", description = "Liveness check"),
        (name = "processes", description = "Calibration processes"),
        (name = "subprocesses", description = "Measurement points of a process"),
        (name = "sensors", description = "Sensors bound to a process"),
        (name = "chain", description = "Chain export to Avimex"),
    ),
    info(
        title = "Calibra API",
        description = "Calibration process registry with Avimex chain export",
        version = "0.1.0"
    )
)]
struct ApiDoc;

pub fn build_router(state: AppState) -> Router {
    let config = &state.config;

    let api_routes_base = Router::new()
        .route(
            "/processes",
            get(processes::list_processes).post(processes::create_process),
        )
        .route("/process", get(processes::get_current_process))
        .route(
            "/processes/{id}",
            get(processes::get_process)
                .put(processes::update_process)
                .delete(processes::delete_process),
        )
        .route(
            "/processes/{proceso_id}/subprocesses",
            get(subprocesses::list_subprocesses).post(subprocesses::create_subprocess),
        )
        .route(
            "/subprocesses/{id}",
            get(subprocesses::get_subprocess)
                .put(subprocesses::update_subprocess)
                .delete(subprocesses::delete_subprocess),
        )
        .route("/estatus/{id}", put(chain::update_status))
        .route(
            "/sensores",
            get(sensors::list_sensors)
                .post(sensors::create_sensors)
                .delete(sensors::delete_all_sensors),
        )
        .route("/sensores/macaddresses", get(sensors::list_mac_addresses))
        .route(
            "/sensores/{id}",
            get(sensors::get_sensor)
                .put(sensors::update_sensor)
                .delete(sensors::delete_sensor),
        )
        .route("/cantidad-sensores", get(sensors::count_sensors))
        .route("/crea-cadena", get(chain::create_chain))
        .route("/clean-database", get(chain::clean_database));

    let api_routes = if config.disable_rate_limiting {
        tracing::warn!("Rate limiting DISABLED");
        api_routes_base
    } else {
        tracing::info!(
            per_second = config.rate_limit_per_second,
            burst = config.rate_limit_burst,
            "Rate limiting configured"
        );

        let limiter = GovernorConfigBuilder::default()
            .key_extractor(FallbackIpKeyExtractor)
            .per_second(config.rate_limit_per_second)
            .burst_size(config.rate_limit_burst)
            .finish()
            .expect("Failed to create rate limiter");

        api_routes_base.layer(GovernorLayer {
            config: Arc::new(limiter),
        })
    }
    .layer(RequestBodyLimitLayer::new(1024 * 1024)); // 1MB body limit

    // Liveness check (NO rate limiting)
    let health_routes = Router::new().route("/ping", get(health::ping));

    let docs_routes = Router::new().merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    Router::new()
        .merge(api_routes)
        .merge(health_routes)
        .merge(docs_routes)
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
