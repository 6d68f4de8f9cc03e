//! Parts inventory server - main entry point.
//!
//! Starts the Actix-web server with configured routes and middleware.

use std::path::PathBuf;
use std::time::Duration;

use actix_cors::Cors;
use actix_files::{Files, NamedFile};
use actix_web::{App, HttpRequest, HttpServer, Result as ActixResult, http::header, web};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use parts_inventory_lib::api::{self, ApiDoc};
use parts_inventory_lib::config::Config;
use parts_inventory_lib::db::DbPool;
use parts_inventory_lib::middleware::RequestLogger;
use parts_inventory_lib::services::{
    BatchProcessor, EntityResolver, ProgressHub, start_progress_pruning,
};

/// How often abandoned progress channels are swept.
const PROGRESS_PRUNE_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// SPA fallback handler - serves index.html for client-side routing.
async fn spa_fallback(req: HttpRequest) -> ActixResult<NamedFile> {
    let static_dir = req
        .app_data::<web::Data<PathBuf>>()
        .ok_or_else(|| actix_web::error::ErrorNotFound("Static files are not configured"))?;
    Ok(NamedFile::open(static_dir.join("index.html"))?)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - In production, DATABASE_URL and INV_SESSION_SECRET must be set");
            error!("  - In production, values must not match development defaults");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  Parts Inventory Server");
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
        info!("Using development defaults for DATABASE_URL and INV_SESSION_SECRET");
    }

    let pool = match DbPool::new(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };
    info!("Database connection established");

    if let Err(e) = pool.run_migrations().await {
        error!("Failed to run migrations: {}", e);
        std::process::exit(1);
    }
    info!("Database migrations complete");

    let progress_hub = ProgressHub::new();
    start_progress_pruning(progress_hub.clone(), PROGRESS_PRUNE_INTERVAL);

    let resolver = EntityResolver::from_settings(pool.clone(), &config.upload);
    let processor = BatchProcessor::new(pool.clone(), resolver.clone(), config.upload.batch_size);

    info!(
        "Upload limits: {}MB max size, {} rows per batch",
        config.upload.max_upload_size / 1024 / 1024,
        processor.batch_size()
    );
    match &config.upload.allowed_areas {
        Some(areas) => info!("Accepted areas: {}", areas.join(", ")),
        None => info!("Accepting any area name"),
    }

    let bind_address = config.bind_address();
    let max_upload_size = config.upload.max_upload_size;
    let static_dir = config.static_dir.clone();
    let is_development = config.is_development();
    let config = web::Data::new(config);

    if static_dir.is_some() {
        info!("Static file serving enabled from {:?}", static_dir);
    }

    let worker_count = if is_development {
        info!(
            "Starting server at http://{} (4 workers - development mode)",
            bind_address
        );
        4
    } else {
        let cpus = num_cpus::get();
        info!(
            "Starting server at http://{} ({} workers)",
            bind_address, cpus
        );
        cpus
    };

    // Start HTTP server
    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                header::AUTHORIZATION,
                header::ACCEPT,
                header::CONTENT_TYPE,
            ])
            .supports_credentials()
            .max_age(3600);
        let cors = if is_development {
            cors.allowed_origin("http://localhost:3000")
                .allowed_origin("http://127.0.0.1:3000")
        } else {
            // Same-origin only
            cors
        };

        let mut app = App::new()
            // Add CORS middleware (must be before other middleware)
            .wrap(cors)
            .wrap(RequestLogger)
            .app_data(config.clone())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(resolver.clone()))
            .app_data(web::Data::new(processor.clone()))
            .app_data(web::Data::new(progress_hub.clone()))
            // Room for multipart overhead; the file limit is enforced while streaming
            .app_data(web::PayloadConfig::new(max_upload_size * 2))
            .service(web::scope("/api/v1").configure(api::configure_api))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            );

        // Serve the frontend when INV_STATIC_DIR is set
        if let Some(ref dir) = static_dir {
            app = app
                .app_data(web::Data::new(dir.clone()))
                .service(Files::new("/assets", dir.join("assets")).prefer_utf8(true))
                // SPA fallback - serve index.html for all other routes
                .default_service(web::route().to(spa_fallback));
        }

        app
    });

    server
        .workers(worker_count)
        .bind(&bind_address)?
        .run()
        .await
}
