//! RandoBot - race room seed bot
//!
//! Runs race sessions behind a local console driver. Each room gets its
//! own task; rolls, locks and version changes are handled by
//! `randobot_core::RaceSession`.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod console;
mod outlet;
mod room_runtime;

fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting RandoBot");

    let source = config::resolve(
        config::config_arg(std::env::args().skip(1)),
        std::env::var_os(config::CONFIG_ENV),
        config::platform_config_path(),
    );
    let bot_config = match config::load(&source) {
        Ok(bot_config) => Arc::new(bot_config),
        Err(e) => {
            tracing::error!(source = ?source, "Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to create tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    let exit_code = runtime.block_on(async move {
        let outlet = Arc::new(outlet::ConsoleOutlet);
        let mut rooms = room_runtime::RoomRuntime::new(bot_config, outlet);

        let result = console::run(&mut rooms).await;
        rooms.shutdown().await;

        match result {
            Ok(()) => 0,
            Err(e) => {
                tracing::error!("Console stopped: {}", e);
                1
            }
        }
    });

    std::process::exit(exit_code);
}
