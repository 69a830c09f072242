mod api;
mod config;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Compress, web, App, HttpServer};
use dotenv::dotenv;
use services::{AppState, SupabaseClient};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    utils::logging::init();

    let settings = config::Settings::from_env().map_err(|e| {
        log::error!("❌ {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    log::info!("🚀 Starting Users API...");
    log::info!("🔗 Supabase: {}", settings.supabase_url);

    // Clientes construídos uma única vez e compartilhados por todos os workers
    let anon = Arc::new(SupabaseClient::new(&settings.supabase_url, &settings.anon_key));
    let service = match &settings.service_role_key {
        Some(key) => {
            log::info!("🔑 Service role key configured: table access uses the privileged client");
            Some(Arc::new(SupabaseClient::new(&settings.supabase_url, key)))
        }
        None => {
            log::warn!("⚠️  SUPABASE_SERVICE_ROLE_KEY not set: table access falls back to the anon key");
            None
        }
    };
    let state = web::Data::new(AppState::from_clients(anon, service));

    log::info!("🌐 Server starting on {}:{}", settings.host, settings.port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", settings.host, settings.port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);

        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(state.clone())
            .wrap(Compress::default())
            .wrap(cors)
            .wrap(middleware::RequestLogging)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi)
            )
            .configure(api::configure)
    })
    .bind((settings.host.clone(), settings.port))?
    .run()
    .await
}
