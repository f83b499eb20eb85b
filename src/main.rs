use dotenvy::dotenv;
use money_buddy::{
    bot,
    classifier::HttpClassifier,
    config::{self, Credentials},
    core::router::Router,
    errors::Result,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Settings and secrets
    let app_config = config::settings::load_app_configuration()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    let credentials =
        Credentials::from_env().inspect_err(|e| error!("Missing credentials: {}", e))?;

    // 4. Database
    let database_url = config::database::get_database_url();
    let db = config::database::create_connection(&database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    config::database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Classifier and router
    let classifier = HttpClassifier::new(
        &app_config.classifier,
        credentials.classifier_api_key.clone(),
    )?;
    let router = Router::new(db, Arc::new(classifier), Arc::new(app_config));

    // 6. Run the bot
    bot::run_bot(&credentials.bot_token, router).await
}
