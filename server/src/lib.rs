pub mod game_registry;
pub mod record_store;
pub mod server_config;
pub mod tick_task;
pub mod web_server;
