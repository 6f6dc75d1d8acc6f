//! HR Directory Backend
//!
//! REST backend for the HR front-end. Employee and department records live in
//! a remote record store; this service normalizes them and does the
//! filtering, sorting and export the UI needs.

mod api;
mod config;
mod errors;
mod export;
mod models;
mod repository;
mod search;
mod store;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use repository::{DepartmentRepository, EmployeeRepository};
use store::{HttpRecordStore, MemoryRecordStore, RecordStore};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub employees: Arc<EmployeeRepository>,
    pub departments: Arc<DepartmentRepository>,
}

impl AppState {
    /// Wire both repositories to one record store.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        let employees = Arc::new(EmployeeRepository::new(store.clone()));
        let departments = Arc::new(DepartmentRepository::new(store, employees.clone()));
        Self {
            employees,
            departments,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting HR Directory Backend");
    tracing::info!("Bind address: {}", config.bind_addr);

    let store = open_store(&config).await?;
    let state = AppState::new(store);

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Pick the record store: the remote one when a URL is configured, otherwise in-memory.
async fn open_store(config: &Config) -> Result<Arc<dyn RecordStore>, errors::AppError> {
    if let Some(url) = &config.store_url {
        tracing::info!("Record store: {}", url);
        let store = HttpRecordStore::new(url.clone(), config.store_api_key.clone())?;
        return Ok(Arc::new(store));
    }

    tracing::warn!("HR_STORE_URL is not set. Using the in-memory record store!");
    let store = match &config.fixture_path {
        Some(path) => {
            let store = MemoryRecordStore::from_fixture_file(path).await?;
            tracing::info!(
                "Loaded fixture {:?}: {} employees, {} departments",
                path,
                store.len(store::schema::employee::TABLE).await,
                store.len(store::schema::department::TABLE).await
            );
            store
        }
        None => MemoryRecordStore::new(),
    };
    Ok(Arc::new(store))
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api_routes = Router::new()
        // Employees
        .route(
            "/employees",
            get(api::list_employees).post(api::create_employee),
        )
        .route("/employees/export", get(api::export_employees))
        .route("/employees/search", get(api::search_employees))
        .route("/employees/status/{status}", get(api::employees_by_status))
        .route(
            "/employees/department/{name}",
            get(api::employees_by_department),
        )
        .route(
            "/employees/{id}",
            get(api::get_employee)
                .put(api::update_employee)
                .delete(api::delete_employee),
        )
        // Departments
        .route("/departments", get(api::list_departments))
        .route("/departments", post(api::create_department))
        .route(
            "/departments/{id}",
            get(api::get_department)
                .put(api::update_department)
                .delete(api::delete_department),
        )
        .route(
            "/departments/{id}/employees",
            get(api::get_department_detail),
        );

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
