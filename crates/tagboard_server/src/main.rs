//! Tagboard server entrypoint.

use tagboard_server::{config::Config, db::Database, serve_router, AppState, DEFAULT_PORT};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct CliFlags {
    help: bool,
    reindex: bool,
}

fn parse_cli_flags(args: &[String]) -> anyhow::Result<CliFlags> {
    let mut flags = CliFlags::default();
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => flags.help = true,
            "--reindex" => flags.reindex = true,
            value if value.starts_with('-') => {
                anyhow::bail!(
                    "Unknown option: '{}'. Use --help to see supported options.",
                    value
                );
            }
            value => {
                anyhow::bail!(
                    "Unexpected positional argument: '{}'. Use --help to see supported options.",
                    value
                );
            }
        }
    }
    Ok(flags)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tagboard=info,tagboard_server=info,tagboard_core=info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let cli_flags = parse_cli_flags(&args)?;

    if cli_flags.help {
        print_help();
        return Ok(());
    }

    let config = Config::from_env()?;

    if cli_flags.reindex {
        return run_reindex(&config);
    }

    let state = AppState::open(config.clone())?;
    if state.sessions.is_some() {
        tracing::info!("Sessions enabled");
    }

    let allow_public = tagboard_server::config::env_flag_enabled("ALLOW_PUBLIC_ACCESS");
    let bind_addr = tagboard_server::resolve_bind_address(&config, allow_public);
    if !bind_addr.ip().is_loopback() {
        tracing::warn!(
            "Binding to non-localhost address: {} - ensure proper security measures are in place",
            bind_addr
        );
    }

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let actual_addr = listener.local_addr().unwrap_or(bind_addr);
    tracing::info!("Tagboard running at http://{}", actual_addr);

    let serve_result = serve_router(listener, state, shutdown_signal()).await;
    // The router owned the last state clone; its storage handles are closed now.
    tracing::info!("Storage closed");

    serve_result?;
    Ok(())
}

fn run_reindex(config: &Config) -> anyhow::Result<()> {
    let database = Database::new(&config.db_path)?;
    let count = database.messages.reindex_all()?;
    tracing::info!("Re-indexed {} message(s) in {}", count, config.db_path);
    Ok(())
}

fn print_help() {
    println!("Tagboard Server\n");
    println!("Usage: tagboard [OPTIONS]\n");
    println!("Options:");
    println!("  --reindex         Rebuild tag and feed entries for every stored message, then exit");
    println!("  --help            Show this help message");
    println!("\nEnvironment variables:");
    println!("  DB_PATH           Database directory (default: ./db)");
    println!("  PORT              Server port (default: {})", DEFAULT_PORT);
    println!("  MAX_MESSAGE_SIZE  Maximum message size in bytes (default: 64KB)");
    println!("  STATIC_DIR        Directory served for static assets (default: public)");
    println!("  ENABLE_SESSIONS   Issue opaque session cookies");
    println!("  SESSION           Session signing secret (required with ENABLE_SESSIONS)");
    println!("  ALLOW_PUBLIC_ACCESS  Allow binding to non-loopback addresses");
    println!(
        "  BIND              Override bind address (e.g. 0.0.0.0:{})",
        DEFAULT_PORT
    );
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
