// src/main.rs

//! The main entry point for the Parlor chat server application.

use anyhow::Result;
use parlor::config::Config;
use parlor::server;
use std::env;
use tracing::error;
use tracing_subscriber::filter::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Define version information.
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    // Collect command-line arguments to decide the execution mode.
    let args: Vec<String> = env::args().collect();

    // Handle the --version flag.
    if args.contains(&"--version".to_string()) {
        println!("Parlor version {VERSION}");
        return Ok(());
    }

    // The configuration file is optional: without --config the compiled-in
    // defaults apply, so a plain `parlor` invocation just works.
    let mut config = match args.iter().position(|arg| arg == "--config") {
        Some(config_index) => {
            let Some(config_path) = args.get(config_index + 1) else {
                eprintln!("--config flag requires a value");
                std::process::exit(1);
            };
            match Config::from_file(config_path) {
                Ok(cfg) => cfg,
                Err(e) => {
                    eprintln!("Failed to load configuration from \"{config_path}\": {e}");
                    std::process::exit(1);
                }
            }
        }
        None => Config::default(),
    };

    // Override port if provided as a command-line argument
    if let Some(port_index) = args.iter().position(|arg| arg == "--port") {
        if let Some(port_str) = args.get(port_index + 1) {
            match port_str.parse::<u16>() {
                Ok(port) => config.port = port,
                Err(_) => {
                    eprintln!("Invalid port number: {port_str}");
                    std::process::exit(1);
                }
            }
        } else {
            eprintln!("--port flag requires a value");
            std::process::exit(1);
        }
    }

    // Get the log level from the environment, falling back to the config.
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone());

    // Setup logging with compact format and ANSI colors.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .compact()
        .with_ansi(true)
        .init();

    if let Err(e) = server::run(config).await {
        error!("Server runtime error: {}", e);
        return Err(e);
    }

    Ok(())
}
