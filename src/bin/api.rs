use aurora_chat_analyst::{api::start_server, config::Config, AnswerService};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env()?;

    info!("🚀 Aurora Chat Analyst - API Server");
    info!("📍 Port: {}", config.port);
    info!("🧠 Model: {}", config.model);

    let service = Arc::new(AnswerService::bootstrap(&config).await?);

    info!("✅ {} messages ready", service.corpus().len());
    info!("📡 Starting API server...");

    start_server(service, config.port).await?;

    Ok(())
}
