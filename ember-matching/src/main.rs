use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod config;
mod events;
mod models;
mod routes;
mod schema;
mod services;

use config::AppConfig;
use ember_shared::clients::db::{create_pool, DbPool};
use ember_shared::clients::rabbitmq::RabbitMQClient;
use ember_shared::clients::redis::RedisClient;

pub struct AppState {
    pub db: DbPool,
    pub config: AppConfig,
    pub rabbitmq: RabbitMQClient,
    pub redis: RedisClient,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ember_shared::middleware::init_tracing("ember-matching");

    let config = AppConfig::load()?;
    let port = config.port;

    let db = create_pool(&config.database_url);
    let rabbitmq = RabbitMQClient::connect(&config.rabbitmq_url).await?;
    let redis = RedisClient::connect(&config.redis_url).await?;
    let metrics_handle = ember_shared::middleware::init_metrics();

    let state = Arc::new(AppState { db, config, rabbitmq, redis, metrics_handle });

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::health::metrics))
        .route("/swipe", post(routes::swipe::swipe))
        .route("/candidates", get(routes::candidates::get_candidates))
        .route("/matches", get(routes::matches::list_matches))
        .route("/matches/detailed", get(routes::matches::list_matches_detailed))
        .route("/discover", get(routes::discover::discover))
        .route("/liked", get(routes::liked::list_liked))
        .route("/received", get(routes::received::list_received))
        .route("/stats", get(routes::stats::get_stats))
        .layer(axum::middleware::from_fn(ember_shared::middleware::metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "ember-matching starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
