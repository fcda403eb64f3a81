//! HTTP API Layer
//!
//! This crate provides the REST API for the petty cash system using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for batches, ledger entries and health
//! - **Middleware**: Request ids, tracing, request logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::in_memory(config)?;
//! let app = create_router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
    middleware as axum_middleware,
};
use tower_http::cors::{CorsLayer, Any};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use core_kernel::{CompanyId, HealthCheckable};
use domain_ledger::LedgerError;
use domain_petty_cash::PettyCashService;

use crate::bootstrap::InMemoryBackend;
use crate::config::ApiConfig;
use crate::handlers::{health, ledger, petty_cash};
use crate::middleware::request_logging;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PettyCashService>,
    pub config: ApiConfig,
    /// Company the server books for
    pub company_id: CompanyId,
    pub health_checks: Arc<Vec<Arc<dyn HealthCheckable>>>,
}

impl AppState {
    /// Creates state over in-memory adapters
    pub fn in_memory(config: ApiConfig) -> Result<Self, LedgerError> {
        let backend = InMemoryBackend::from_config(&config)?;
        Ok(Self::from_backend(backend, config))
    }

    /// Creates state over an already built backend
    pub fn from_backend(backend: InMemoryBackend, config: ApiConfig) -> Self {
        Self {
            service: backend.service,
            config,
            company_id: backend.company_id,
            health_checks: Arc::new(backend.health_checks),
        }
    }
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Service, configuration and health checks
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Petty cash routes
    let petty_cash_routes = Router::new()
        .route("/", post(petty_cash::create_batch).get(petty_cash::list_batches))
        .route("/:id", get(petty_cash::get_batch).delete(petty_cash::delete_batch))
        .route("/:id/accounts", put(petty_cash::assign_accounts))
        .route("/:id/lines", post(petty_cash::add_line))
        .route(
            "/:id/lines/:line_id",
            put(petty_cash::update_line).delete(petty_cash::remove_line),
        )
        .route("/:id/confirm", post(petty_cash::confirm_batch))
        .route("/:id/settle", post(petty_cash::settle_batch))
        .route("/:id/print", post(petty_cash::print_batch));

    // Ledger routes
    let ledger_routes = Router::new().route("/entries/:id", get(ledger::get_entry));

    let api_routes = Router::new()
        .nest("/petty-cash", petty_cash_routes)
        .nest("/ledger", ledger_routes)
        .layer(axum_middleware::from_fn(request_logging));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
