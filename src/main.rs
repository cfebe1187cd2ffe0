mod config;
mod core;
mod error;
mod models;
mod routes;
mod services;

use actix_cors::Cors;
use actix_web::{http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use std::sync::Arc;
use tracing::{error, info};

use crate::config::Settings;
use crate::core::{DisclosurePolicy, LikeRegistry, Scorer};
use crate::models::ScoringWeights;
use crate::routes::engine::AppState;
use crate::services::{
    DirectoryClient, EngagementStore, EventSink, LogSink, PgEngagementStore, ProfileProvider,
};

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl actix_web::error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .content_type("application/json")
            .json(serde_json::json!({
                "error": self.error,
                "message": self.message,
                "status_code": self.status_code,
            }))
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(
    err: actix_web::error::JsonPayloadError,
    req: &actix_web::HttpRequest,
) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(
    err: actix_web::error::QueryPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Configuration first: the log filter and format come from [logging]
    let settings = Settings::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    // Initialize logging (RUST_LOG / LOG_FORMAT override the configured values)
    let filter = tracing_subscriber::EnvFilter::new(settings.logging.filter_directive());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if settings.logging.resolved_format() == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting Yonder Match engine...");
    info!("Configuration loaded successfully");

    // Initialize the profile directory client
    let provider: Arc<dyn ProfileProvider> = Arc::new(
        DirectoryClient::new(settings.directory.endpoint, settings.directory.api_key)
            .unwrap_or_else(|e| {
                error!("Failed to create directory client: {}", e);
                panic!("Directory client error: {}", e);
            }),
    );

    info!("Profile directory client initialized");

    // Initialize the engagement store
    let store: Arc<dyn EngagementStore> = Arc::new(
        PgEngagementStore::from_settings(
            &settings.database.url,
            settings.database.max_connections,
            settings.database.min_connections,
        )
        .await
        .unwrap_or_else(|e| {
            error!("Failed to connect to PostgreSQL: {}", e);
            panic!("PostgreSQL connection error: {}", e);
        }),
    );

    info!(
        "Engagement store initialized (max: {} connections)",
        settings.database.max_connections.unwrap_or(10)
    );

    // Event sink: structured logs picked up by the delivery pipeline
    let events: Arc<dyn EventSink> = Arc::new(LogSink);

    // Initialize the scorer with configured weights
    let weights = ScoringWeights {
        skills: settings.scoring.weights.skills,
        availability: settings.scoring.weights.availability,
        location: settings.scoring.weights.location,
    };

    let scorer = Scorer::new(weights);

    info!("Scorer initialized with weights: {:?}", weights);

    let registry = Arc::new(LikeRegistry::new(
        store.clone(),
        provider.clone(),
        events.clone(),
    ));
    let policy = Arc::new(DisclosurePolicy::new(store.clone(), events.clone()));

    // Build application state
    let app_state = AppState {
        provider,
        store,
        registry,
        policy,
        scorer,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
