use gateway::GatewayApi;
use smbfs::{NativeSessionFactory, ShareRegistry};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Share definitions are required; refuse to start without them
    let config_path =
        std::env::var("SHARES_CONFIG").unwrap_or_else(|_| "shares.toml".to_string());
    let registry = match ShareRegistry::load(&config_path) {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Failed to load share configuration from {}: {}", config_path, e);
            eprintln!("Set SHARES_CONFIG to point at a valid shares file");
            std::process::exit(1);
        }
    };
    tracing::info!("Loaded {} share(s) from {}", registry.shares().len(), config_path);

    let mut api = GatewayApi::new(registry, Arc::new(NativeSessionFactory::new()));
    if let Ok(secs) = std::env::var("SMB_OP_TIMEOUT_SECS") {
        match secs.parse() {
            Ok(secs) => api = api.with_op_timeout(Duration::from_secs(secs)),
            Err(_) => eprintln!("Ignoring invalid SMB_OP_TIMEOUT_SECS: {}", secs),
        }
    }
    if let Ok(dir) = std::env::var("SCRATCH_DIR") {
        api = api.with_scratch_dir(dir.into());
    }

    let host = std::env::var("MEDIA_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("MEDIA_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8081);

    if let Err(e) = api.serve(&host, port).await {
        eprintln!("Media gateway failed: {}", e);
        std::process::exit(1);
    }
}
