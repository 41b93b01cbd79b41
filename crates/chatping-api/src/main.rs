//! chatping CLI and REST API entry point.
//!
//! Binary name: `chatping`
//!
//! Parses CLI arguments, initializes the database and pipeline, then either
//! starts the REST API server or runs a one-shot command.

mod http;
mod state;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use state::{AppState, FCM_KEY_ENV};

#[derive(Parser)]
#[command(name = "chatping", about = "Chat message push-notification dispatch service", version)]
struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST API server
    Serve {
        /// Bind host (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Bind port (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Verify database connectivity and print the effective configuration
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,chatping=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let state = AppState::init().await?;

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| state.config.server.host.clone());
            let port = port.unwrap_or(state.config.server.port);
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} chatping listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            println!("\n  Server stopped.");
        }

        Commands::Check => {
            let db_ok = sqlx::query("SELECT 1")
                .fetch_one(&state.db_pool.reader)
                .await
                .is_ok();
            let key_set = std::env::var(FCM_KEY_ENV).is_ok();

            let check_mark = |ok: bool| {
                if ok {
                    format!("{}", console::style("✓").green())
                } else {
                    format!("{}", console::style("✗").red())
                }
            };

            println!();
            println!("  Data dir: {}", state.data_dir.display());
            println!("  {} database reachable", check_mark(db_ok));
            println!("  {} {FCM_KEY_ENV} set", check_mark(key_set));
            println!(
                "  Push endpoint: {}",
                state.config.push.endpoint
            );
            println!(
                "  Ingress auth: {}",
                match (&state.config.ingress.hmac_secret, &state.config.ingress.bearer_token) {
                    (Some(_), _) => "hmac-sha256",
                    (None, Some(_)) => "bearer",
                    (None, None) => "none (open)",
                }
            );
            println!();
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
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
