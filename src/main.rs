//! hookflow demo — replays two orders through the hook engine.
//!
//! The first order passes the risk gate; the second is rejected by it.

use tracing_subscriber::{EnvFilter, fmt};

use hookflow::{Order, OrderService};
use hookflow_core::config::AppConfig;
use hookflow_core::error::AppError;
use hookflow_engine::ExecutionContext;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Demo error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("HOOKFLOW_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting hookflow demo v{}", env!("CARGO_PKG_VERSION"));

    let service = OrderService::new(&config).await;
    let ctx = ExecutionContext::new();

    let orders = [
        ("normal order", Order::new("order_001", "user_1001", 500)),
        ("risk rejected order", Order::new("order_002", "user_1002", 20_000)),
    ];

    for (case, order) in &orders {
        tracing::info!(case = %case, order_id = %order.id, amount = order.amount, "Creating order");
        if let Err(e) = service.create_order(&ctx, order).await {
            tracing::warn!(order_id = %order.id, error = %e, "create order failed");
        }
    }

    tracing::info!(
        in_flight = service.engine().in_flight(),
        "Waiting for async hooks"
    );
    if !service.shutdown().await {
        return Err(AppError::internal("async hooks did not finish before the drain timeout"));
    }

    tracing::info!("hookflow demo finished");
    Ok(())
}
