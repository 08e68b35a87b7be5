use std::sync::Arc;

use clap::Parser;
use common::config::ConfigManager;
use common::{log, logger};
use snake_arcade_server::game_registry::GameRegistry;
use snake_arcade_server::record_store::InMemoryRecordStore;
use snake_arcade_server::server_config::{DEFAULT_CONFIG_PATH, ServerConfig};
use snake_arcade_server::tick_task::TickTask;
use snake_arcade_server::web_server::{WebServerState, run_web_server};

#[derive(Parser)]
#[command(name = "snake_arcade_server")]
struct Args {
    /// YAML config file; defaults are used when it does not exist.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    #[arg(long)]
    use_log_prefix: bool,

    /// Overrides `bind_address` from the config file.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Server".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let mut config: ServerConfig = ConfigManager::from_yaml_file(&args.config).load()?;
    if let Some(bind) = args.bind {
        config.bind_address = bind;
    }

    log!(
        "Starting with {}x{} field, {} max walls, {}ms tick",
        config.field_width,
        config.field_height,
        config.max_walls,
        config.tick_interval_ms
    );

    let registry = GameRegistry::new(config.registry_settings());
    let tick_task = TickTask::new(registry.clone());
    let tick_handle = tokio::spawn(async move { tick_task.run().await });

    let state = WebServerState {
        registry,
        records: Arc::new(InMemoryRecordStore::new()),
        leaderboard_default_limit: config.leaderboard_default_limit,
    };

    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for Ctrl+C");
        log!("Shutdown signal received");
    };

    run_web_server(state, &config.bind_address, shutdown_signal).await?;

    tick_handle.abort();
    log!("Server shut down gracefully");

    Ok(())
}
