mod chat;
mod classifier;
mod config;
mod error;
mod routes;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use chat::{ChatResponder, OpenRouterResponder};
use classifier::{Classifier, DemoClassifier};
use config::AppConfig;
use routes::configure_routes;
use std::env;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if let Ok(current_dir) = env::current_dir() {
        log::info!("Current working directory: {}", current_dir.display());
    } else {
        log::error!("Failed to get the current working directory.");
    }

    let config = AppConfig::load().map_err(|e| {
        log::error!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    if !config.demo_mode {
        log::warn!("No classifier model is bundled with this build. Switching to DEMO mode.");
    }
    log::info!("Running in DEMO mode - model predictions will be simulated");
    let classifier: Arc<dyn Classifier> = Arc::new(DemoClassifier::new());

    let responder: Arc<dyn ChatResponder> =
        Arc::new(OpenRouterResponder::new(config.chat.clone()).map_err(|e| {
            log::error!("Failed to create chat client: {}", e);
            std::io::Error::other(e.to_string())
        })?);

    if config.chatbot_configured() {
        log::info!("Chatbot configured with model {}", config.chat.model);
    } else {
        log::warn!("OPENROUTER_API_KEY is not set. The chatbot will reply with setup instructions.");
    }

    let bind_address = config.bind_address();
    let frontend_dir = config.frontend_dir.clone();
    let app_config = web::Data::new(config);

    log::info!("Starting server on {}", bind_address);
    log::info!("Serving frontend from {}", frontend_dir);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(app_config.clone())
            .app_data(web::Data::from(classifier.clone()))
            .app_data(web::Data::from(responder.clone()))
            .configure(|cfg| configure_routes(cfg, frontend_dir.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}
