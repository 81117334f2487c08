//! Faucet service binary

use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ziesha_faucet::api::{health_handler, root_handler, send_handler, status_handler, AppState};
use ziesha_faucet::{
    mpn_address_valid, Amount, BazukaCli, FaucetConfig, FaucetLedger, LedgerStore, WalletAddress,
};

/// Faucet service CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address
    #[arg(long)]
    server_addr: Option<String>,

    /// Pool wallet (MPN address) the faucet pays out from
    #[arg(long)]
    pool_wallet: Option<String>,

    /// Amount dispensed per request (in tℤ)
    #[arg(long)]
    amount: Option<f64>,

    /// Cooldown between disbursements to the same address (seconds)
    #[arg(long)]
    cooldown_secs: Option<u64>,

    /// Ledger state file path
    #[arg(long)]
    state_path: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let env_filter = if args.debug {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::from_default_env()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Ziesha Pool Faucet Service v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = FaucetConfig::from_env();

    // Override with CLI arguments
    if let Some(addr) = args.server_addr {
        config.server_addr = addr;
    }

    if let Some(wallet) = args.pool_wallet {
        config.pool_wallet = wallet;
    }

    if let Some(amount) = args.amount {
        config.send_amount = amount;
    }

    if let Some(cooldown) = args.cooldown_secs {
        config.cooldown_secs = cooldown;
    }

    if let Some(path) = args.state_path {
        config.state_path = path;
    }

    info!("Configuration:");
    info!("  Server address: {}", config.server_addr);
    info!("  Send amount: {}t\u{2124}", config.send_amount);
    info!("  Cooldown: {}s", config.cooldown_secs);
    info!("  State file: {}", config.state_path);

    let pool_wallet = WalletAddress::validated(&config.pool_wallet, mpn_address_valid)
        .map_err(|e| anyhow::anyhow!("pool wallet (set ZIESHA_POOL_WALLET): {}", e))?;
    let default_amount = Amount::new(config.send_amount)
        .map_err(|e| anyhow::anyhow!("send amount: {}", e))?;

    // Build the single process-wide ledger instance
    let executor = Arc::new(BazukaCli::new(
        config.bazuka_bin.clone(),
        config.executor_timeout(),
    ));
    let ledger = Arc::new(FaucetLedger::open(
        pool_wallet,
        config.cooldown_duration(),
        LedgerStore::new(&config.state_path),
        executor,
    )?);
    info!("Faucet ledger initialized");

    let state = Arc::new(AppState {
        ledger: ledger.clone(),
        default_amount,
    });

    // Build router
    let mut app = axum::Router::new()
        .route("/", axum::routing::get(root_handler))
        .route("/health", axum::routing::get(health_handler))
        .route("/api/status", axum::routing::get(status_handler))
        .route("/api/send", axum::routing::post(send_handler))
        .with_state(state);

    // Add CORS if enabled
    if config.cors_enabled {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        app = app.layer(cors);
        info!("CORS enabled");
    }

    // Periodic housekeeping: drop entries whose cooldown has elapsed
    let prune_ledger = ledger.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(3600));
        loop {
            interval.tick().await;
            match prune_ledger.prune_expired().await {
                Ok(0) => {}
                Ok(count) => info!("Pruned {} expired ledger entries", count),
                Err(e) => warn!("Ledger pruning failed: {}", e),
            }
        }
    });

    // Start server
    let addr: SocketAddr = config.server_addr.parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down gracefully");
    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }
}
