use axum::{
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;
use tower_governor::{
    governor::GovernorConfigBuilder,
    key_extractor::SmartIpKeyExtractor,
    GovernorLayer,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod analysis;
pub mod analytics;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod import;
pub mod routes;
pub mod store;

use config::Config;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        AppState {
            db,
            config: Arc::new(config),
        }
    }
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = String)
    )
)]
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "Service is healthy")
}

async fn route_not_found() -> error::AppError {
    error::AppError::NotFound("Route not found".to_string())
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Portfolio Tracker API",
        version = "0.1.0",
        description = "Portfolio companies, bulk CSV import and portfolio analytics"
    ),
    paths(
        health_check,
        routes::companies::list_companies,
        routes::companies::create_company,
        routes::companies::company_options,
        routes::companies::get_company,
        routes::companies::update_company,
        routes::companies::delete_company,
        routes::companies::add_company_update,
        routes::companies::add_metric,
        routes::import::import_csv,
        routes::import::import_upload,
        routes::import::import_records,
        routes::analytics::portfolio_analytics,
        routes::reports::list_reports,
        routes::reports::create_report,
        routes::analysis::analyze_query,
        routes::analysis::list_analyses,
        routes::analysis::example_questions
    ),
    components(schemas(
        error::Field,
        error::FieldViolation,
        import::RawCompanyRecord,
        routes::CompanyResponse,
        routes::CompanyUpdateResponse,
        routes::MetricResponse,
        routes::companies::CompanyDetailResponse,
        routes::import::ImportResponse,
        analytics::PortfolioSummary,
        analytics::Breakdown
    )),
    tags(
        (name = "portfolio", description = "Portfolio tracking")
    )
)]
pub struct ApiDoc;

/// Create the application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route(
            "/companies",
            get(routes::list_companies).post(routes::create_company),
        )
        .route("/companies/options", get(routes::company_options))
        .route(
            "/companies/{id}",
            get(routes::get_company)
                .put(routes::update_company)
                .delete(routes::delete_company),
        )
        .route("/companies/{id}/updates", post(routes::add_company_update))
        .route("/companies/{id}/metrics", post(routes::add_metric))
        .route("/import/csv", post(routes::import_csv))
        .route("/import/upload", post(routes::import_upload))
        .route("/import/records", post(routes::import_records))
        .route("/analytics/portfolio", get(routes::portfolio_analytics))
        .route(
            "/reports",
            get(routes::list_reports).post(routes::create_report),
        )
        .route(
            "/analysis",
            get(routes::list_analyses).post(routes::analyze_query),
        )
        .route("/analysis/examples", get(routes::example_questions))
        .fallback(route_not_found)
        .with_state(state);

    // Per-IP rate limiting on the API, never on the docs
    let api_routes = match config.rate_limit {
        Some(limit) => {
            let period_ms = (60_000 / u64::from(limit.per_minute)).max(1);
            match GovernorConfigBuilder::default()
                .key_extractor(SmartIpKeyExtractor)
                .period(Duration::from_millis(period_ms))
                .burst_size(limit.burst)
                .finish()
            {
                Some(governor_conf) => {
                    tracing::info!(
                        per_minute = limit.per_minute,
                        burst = limit.burst,
                        "Rate limiting enabled"
                    );
                    api_routes.layer(GovernorLayer {
                        config: Arc::new(governor_conf),
                    })
                }
                None => {
                    tracing::warn!("Invalid rate limit settings; rate limiting disabled");
                    api_routes
                }
            }
        }
        None => api_routes,
    };
    let api_routes = api_routes.layer(middleware::map_response(error::tag_plain_errors));

    let mut app = Router::new().merge(api_routes);

    if config.enable_docs {
        app = app.merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()));
    }

    app.layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    )
    .layer(TraceLayer::new_for_http())
}
