mod application;
mod config;
mod domain;
mod infrastructure;
mod presentation;

use config::AppConfig;
use infrastructure::container::AppContainer;
use presentation::http::server::HttpServer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    let container = AppContainer::new(config)?;

    let server = HttpServer::new(
        container.project_handler.clone(),
        container.artifact_handler.clone(),
        container.port,
    );
    server.run().await
}
