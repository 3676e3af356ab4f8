//! Main executable for the Sales Analytics Service.

use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sales_analytics_service::{
    config::Config, error::Result, server::AnalyticsServer, AnalyticsService,
};

/// Command line arguments for the sales analytics service
#[derive(Parser, Debug)]
#[command(name = "sales-analytics-server")]
#[command(about = "Sales Analytics Service")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// Server host address
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Server port
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Enable development mode
    #[arg(long)]
    dev: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    init_tracing(&args.log_level);

    info!(
        "Starting Sales Analytics Service v{}",
        env!("CARGO_PKG_VERSION")
    );

    let mut config = Config::from_env()?;
    override_config_from_args(&mut config, &args);

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        std::process::exit(1);
    }

    info!(
        "Server will bind to {}:{}",
        config.server.host, config.server.port
    );

    let service = AnalyticsService::new(config);
    let server = AnalyticsServer::new(service);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.start().await {
            error!("HTTP server error: {}", e);
        }
    });

    tokio::select! {
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
        result = server_handle => {
            if let Err(e) = result {
                error!("Server task failed: {}", e);
            }
        }
    }

    info!("Sales analytics service shutdown complete");
    Ok(())
}

/// Initialize tracing with an env-filter and JSON output.
fn init_tracing(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => {
            eprintln!("Invalid log level: {}. Using 'info'", log_level);
            tracing::Level::INFO
        }
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "sales_analytics_service={},tower_http=debug,axum=debug",
                    level
                )
                .into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .json(),
        )
        .init();
}

/// Override configuration with command line arguments
fn override_config_from_args(config: &mut Config, args: &Args) {
    config.server.host = args.host.clone();
    config.server.port = args.port;

    if args.dev {
        info!("Development mode enabled");
        config.monitoring.log_level = "debug".to_string();
        config.monitoring.log_format = "text".to_string();
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
