//! haystackd: a concurrent line-search server
//!
//! Answers exact-line existence queries against a configured dataset file
//! over TCP, optionally TLS-wrapped. One connection carries one query and
//! receives exactly one response line.

use haystackd::config::Config;
use haystackd::dataset::CachePolicy;
use haystackd::server::Server;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!(
        host = %config.host,
        port = config.port,
        dataset = %config.dataset_path.display(),
        policy = %CachePolicy::from_reread_flag(config.reread_on_query),
        algorithm = %config.algorithm,
        tls = config.tls_enabled,
        "Starting haystackd server"
    );

    let server = Server::new(config)?;
    server.run().await
}
