//! MySQL MCP Gateway - Main entry point.

use clap::Parser;
use mysql_mcp_gateway::config::{Config, TransportMode};
use mysql_mcp_gateway::db::DbPool;
use mysql_mcp_gateway::tools::CommandGateway;
use mysql_mcp_gateway::transport::{HttpTransport, StdioTransport, Transport};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr: stdout belongs to the stdio transport.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();

    init_tracing(&config);

    info!(
        transport = %config.transport,
        "Starting MySQL MCP Gateway v{}",
        env!("CARGO_PKG_VERSION")
    );

    let connection_config = config.connection_config()?;
    let pool = match DbPool::connect(&connection_config).await {
        Ok(pool) => pool,
        Err(e) => {
            error!(
                url = %connection_config.masked_connection_string(),
                error = %e,
                suggestion = e.suggestion().unwrap_or(""),
                "Failed to connect to database"
            );
            return Err(e.into());
        }
    };

    let gateway = Arc::new(CommandGateway::new(Arc::new(pool)));

    let result = match config.transport {
        TransportMode::Stdio => {
            info!("Using stdio transport");
            StdioTransport::new(gateway).run().await
        }
        TransportMode::Http => {
            info!(
                addr = %config.http_bind_addr(),
                endpoint = %config.mcp_endpoint,
                "Using HTTP transport"
            );
            let transport = HttpTransport::new(
                gateway,
                &config.http_host,
                config.http_port,
                &config.mcp_endpoint,
            );
            transport.run().await
        }
    };

    if let Err(e) = result {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
