mod api;
mod config;
mod database;
mod models;
mod services;
mod store;
mod utils;

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::services::UserService;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| {
        log::error!("❌ Invalid configuration: {}", e);
        std::io::Error::other(e)
    })?;

    log::info!("🚀 Starting User Directory...");
    log::info!("📊 Database: {:?} ({})", config.backend, config.database_name);

    // Store aberto uma vez e compartilhado entre os workers
    let store = store::open(&config).await.map_err(|e| {
        log::error!("❌ Failed to open user store: {}", e);
        std::io::Error::other(e.to_string())
    })?;

    let service = UserService::new(store);
    let service_data = web::Data::new(service.clone());

    log::info!("🌐 Server starting on {}:{}", config.host, config.port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", config.host, config.port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", config.host, config.port);

    let allowed_origins = config.allowed_origins.clone();

    let server = HttpServer::new(move || {
        let cors = allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                header::CONTENT_TYPE,
                header::ACCEPT,
                header::CACHE_CONTROL,
                header::IF_NONE_MATCH,
            ])
            .expose_headers(vec![header::CONTENT_TYPE, header::ETAG])
            .max_age(3600);

        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(service_data.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi)
            )
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // Metrics
            .route("/metrics", web::get().to(api::metrics::get_metrics))
            // Users: CRUD com result envelope
            .service(web::scope("/api/v1/users").configure(api::users::configure))
    })
    .bind((config.host.as_str(), config.port))?
    .run();

    let result = server.await;

    log::info!("🛑 Server stopped, releasing user store");
    service.close().await;

    result
}
