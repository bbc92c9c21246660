#![cfg(not(tarpaulin_include))]

use grant_finder::app;
use grant_finder::config::AppConfig;

/// Main entry point for the web application
///
/// Initializes logging, loads the secrets file and runs the web server.
/// Logging honours `RUST_LOG` and defaults to `info`.
///
/// # Returns
/// * `Result<(), Box<dyn std::error::Error>>` - Success or error object
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load()?;

    // Start the web application
    app::run(config).await
}
