use actix_cors::Cors;
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing_subscriber::prelude::*;

use restage_engine::ReviewEngine;

mod config;
mod database;
mod handlers;
mod store;

use handlers::SharedEngine;
use store::SqliteRecordStore;

#[get("/health")]
async fn health(db: web::Data<Arc<database::Database>>) -> impl Responder {
    // Test database connection
    match db.connection.lock() {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "database": "connected"
        })),
        Err(_) => HttpResponse::InternalServerError().json(serde_json::json!({
            "status": "unhealthy",
            "database": "disconnected"
        })),
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long)]
    log_file_path: Option<String>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(log_path) = args.log_file_path {
        let log_path = std::path::Path::new(&log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("restage-api.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard);

        tracing_subscriber::registry()
            .with(env_filter.clone())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    // Initialize database
    let db = database::initialize_database().expect("Failed to initialize database");

    tracing::info!(
        "Database initialized at: {:?}",
        database::get_db_path().unwrap()
    );

    // Load config
    let (config, config_path) = config::ApiConfig::load().expect("Failed to load config");
    tracing::info!("Config loaded from {:?}", config_path);

    // Get server config or use defaults
    let (host, port) = if let Some(server_config) = &config.server {
        (server_config.host.clone(), server_config.port)
    } else {
        ("127.0.0.1".to_string(), 8080)
    };

    tracing::info!("Server will listen on {}:{}", host, port);

    // Build the review engine over the SQLite store and pull initial data
    let record_store = SqliteRecordStore::new(db.async_connection.clone());
    let mut review_engine = ReviewEngine::new(record_store);
    if let Err(e) = review_engine.load().await {
        tracing::warn!("Initial data load failed, starting with an empty view: {}", e);
    }
    let engine: SharedEngine = Arc::new(Mutex::new(review_engine));

    let server = HttpServer::new(move || {
        // Configure CORS
        let cors = if let Some(cors_config) = &config.cors {
            let mut cors_builder = Cors::default();
            for origin in &cors_config.allowed_origins {
                cors_builder = cors_builder.allowed_origin(origin);
            }
            cors_builder
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(vec!["Authorization", "Accept", "Content-Type"])
                .max_age(3600)
        } else {
            Cors::default()
                .allow_any_origin()
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(vec!["Authorization", "Accept", "Content-Type"])
                .max_age(3600)
        };

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(db.clone()))
            .app_data(web::Data::new(engine.clone()))
            .service(health)
            .route("/api/staging", web::get().to(handlers::staging::list_staging_records))
            .route("/api/staging", web::post().to(handlers::staging::create_staging_record))
            .route("/api/staging/status-counts", web::get().to(handlers::staging::status_counts))
            .route("/api/contacts", web::get().to(handlers::matches::list_contacts))
            .route("/api/matches", web::get().to(handlers::matches::list_match_groups))
            .route("/api/review", web::get().to(handlers::review::get_state))
            .route("/api/review/selection", web::post().to(handlers::review::set_selection))
            .route("/api/review/filter", web::post().to(handlers::review::set_filter))
            .route("/api/review/promote", web::post().to(handlers::review::promote))
            .route("/api/review/delete", web::post().to(handlers::review::delete))
            .route("/api/review/reject", web::post().to(handlers::review::reject))
            .route("/api/review/refresh", web::post().to(handlers::review::refresh))
    })
    .bind((host.as_str(), port))?
    .run();

    let handle = server.handle();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }

        tracing::info!("Ctrl+C received, shutting down...");
        handle.stop(true).await;
    });

    server.await
}
