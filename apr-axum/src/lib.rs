#![warn(missing_docs)]
// Note: this overwrites the link in the README to point to the rust docs of the apr-axum crate.
//! [apr_core]: https://docs.rs/apr_core/latest/apr_core/index.html
//! [apr_axum]: https://docs.rs/apr_axum/latest/apr_axum/index.html
//! [apr_sqlite]: https://docs.rs/apr_sqlite/latest/apr_sqlite/index.html
#![doc = include_str!("../README.md")]

mod error;
mod extract;
mod report_routes;
mod response;

use aide::{
    axum::{ApiRouter, routing::get},
    openapi::OpenApi,
};
use apr_core::ports::Application;
use axum::{Extension, Json};
use schemars::JsonSchema;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

mod openapi;
use openapi::{api_docs, docs_routes};

pub mod config;
use config::AxumConfig;

pub use error::{ApiError, ErrorResponse};
pub use response::ReportsResponse;

/// Response for the health check endpoint
#[derive(Serialize, JsonSchema)]
#[schemars(inline)]
struct HealthResponse {
    status: String,
}

/// Simple health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Construct a full API router with the given state and config
pub fn router<T: ApiApplication>(state: T, config: AxumConfig) -> axum::Router {
    let mut api = OpenApi::default();
    ApiRouter::new()
        .api_route("/health", get(health_check))
        .merge(report_routes::router())
        .nest_api_service("/docs", docs_routes())
        .finish_api_with(&mut api, api_docs)
        .layer(Extension(Arc::new(api))) // Arc is very important here or you will face massive memory and performance issues
        .layer(Extension(Arc::new(config)))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Starts the HTTP server with the provided configuration
pub async fn start_server<T: ApiApplication>(
    config: AxumConfig,
    app: T,
) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    tracing::info!("Listening for requests on {}", listener.local_addr()?);

    let service = router(app, config);
    axum::serve(listener, service).await
}

/// Axum imposes all sorts of constraints on what can pass for state. This
/// trait, coupled with a blanket implementation, specifies it all upfront and
/// in one place.
pub trait ApiApplication:
    Clone + Send + Sync + 'static + Application<Repository: Send + Sync + 'static>
{
}

// this is the blanket implementation
impl<T> ApiApplication for T where
    T: Clone + Send + Sync + 'static + Application<Repository: Send + Sync + 'static>
{
}
