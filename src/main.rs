mod api;
mod config;
mod database;
mod middleware;
mod models;
mod seeds;
mod services;
mod state;
mod utils;

use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::io;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use config::AppConfig;
use services::{
    AlgoliaClient, FirebaseAuth, FirebaseStorage, FirebaseTokenVerifier, GoogleCredentials, ServiceAccount,
    SmtpMailer, TokenVerifier,
};
use state::AppState;

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    log::error!("❌ {}: {}", context, err);
    io::Error::other(format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| startup_error("Invalid configuration", e))?;

    log::info!("🚀 Starting Women in Engineering directory...");

    // Google service account shared by Firestore, auth and storage
    let http = reqwest::Client::new();
    let account_json = ServiceAccount::decode_base64(&config.firebase_config_base64)
        .map_err(|e| startup_error("Invalid FIREBASE_CONFIG_BASE64", e))?;
    let account = ServiceAccount::from_json(&account_json)
        .map_err(|e| startup_error("Invalid FIREBASE_CONFIG_BASE64", e))?;
    let credentials = Arc::new(GoogleCredentials::new(account, http.clone()));
    let project_id = config
        .firebase_project_id
        .clone()
        .unwrap_or_else(|| credentials.project_id().to_string());
    log::info!("🔥 Firebase project: {}", project_id);

    // Initialize Firestore connection
    let db = database::Firestore::new(&project_id, &account_json)
        .await
        .map_err(|e| startup_error("Failed to connect to Firestore", e))?;
    log::info!("✅ Firestore connected successfully");

    let mailer = SmtpMailer::new(&config.email_user, &config.email_password, &config.smtp_host)
        .map_err(|e| startup_error("Invalid mail configuration", e))?;

    let state = AppState {
        repo: Arc::new(db.clone()),
        identity: Arc::new(FirebaseAuth::new(
            credentials.clone(),
            http.clone(),
            project_id.clone(),
            config.firebase_api_key.clone(),
            config.frontend_url.clone(),
        )),
        index: Arc::new(AlgoliaClient::new(
            http.clone(),
            config.algolia_app_id.clone(),
            config.algolia_admin_key.clone(),
            config.algolia_engineer_index.clone(),
        )),
        storage: Arc::new(FirebaseStorage::new(
            credentials.clone(),
            http.clone(),
            config.firebase_storage_bucket.clone(),
        )),
        mailer: Arc::new(mailer),
    };
    let state_data = web::Data::new(state);

    let verifier: Arc<dyn TokenVerifier> = Arc::new(FirebaseTokenVerifier::new(http.clone(), project_id));
    let verifier_data = web::Data::from(verifier);

    // 🌱 Event documents signups union into
    seeds::seed_events(&db).await;

    if config.enable_testing_routes {
        log::warn!("🧪 Testing routes enabled under /testing");
    }

    log::info!("🌐 Server starting on {}:{}", config.host, config.port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", config.host, config.port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", config.host, config.port);

    let bind = (config.host.clone(), config.port);

    // Start HTTP server
    HttpServer::new(move || {
        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        let mut app = App::new()
            .app_data(state_data.clone())
            .app_data(verifier_data.clone())
            .wrap(middleware::cors(&config.frontend_url))
            .wrap(Logger::default())
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi))
            .route("/", web::get().to(api::health::hello))
            .route("/health", web::get().to(api::health::health_check))
            .configure(api::engineers::configure)
            .configure(api::users::configure)
            .configure(api::search::configure);

        if config.enable_testing_routes {
            app = app.configure(api::testing::configure);
        }

        app
    })
    .bind(bind)?
    .run()
    .await
}
