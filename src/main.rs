//! behold-less - announcer spam filter for roguelike game channels
//!
//! Reads announcer lines from a chat host, classifies them, and tells the
//! host which ones to move into a quiet buffer.

mod bridge;
mod common;
mod config;
mod grammar;
mod rules;

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use tokio::io::{stdin, stdout, BufReader};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use bridge::{run_feed, Bridge, BufferResolver};
use common::BufferId;
use config::{env::apply_env_overrides, env::get_config_path, load_and_validate};
use rules::ConfigStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration is read first so its debug flag can set the log level.
    let config_path = get_config_path();
    let settings = load_and_validate(&config_path);

    let default_level = match settings {
        Ok(ref settings) if settings.debug => tracing::Level::DEBUG,
        _ => tracing::Level::INFO,
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(default_level.into()))
        .with_writer(std::io::stderr)
        .init();

    info!("behold-less v{} starting...", env!("CARGO_PKG_VERSION"));
    info!("Loading configuration from {}...", config_path);

    let settings = settings.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        error!("Please ensure {} is properly formatted.", config_path);
        e
    })?;

    let mut store = ConfigStore::new(settings.rules);
    apply_env_overrides(&mut store);

    let config = store.snapshot();
    info!("Configuration loaded successfully (v{})", store.version());
    info!("  min_turn: {}", config.min_turn);
    info!("  min_points: {}", config.min_points);
    for (name, list) in [("show_users", &config.show_users), ("show_variants", &config.show_variants)] {
        if !list.is_empty() {
            info!("  {}: shown {:?}, hidden {:?}", name, list.allowed(), list.denied());
        }
    }
    if config.always_show_events.is_empty() {
        warn!("  always_show_events is empty, wins and wishes follow the thresholds");
    } else {
        info!("  always_show_events: {} patterns", config.always_show_events.len());
    }
    if config.hides_redirected() {
        info!("  buffer_name is empty, redirected lines are hidden");
    } else {
        info!("  buffer_name: {}", config.buffer_name);
    }
    info!("  {} announcer bindings", settings.sources.len());
    for binding in settings.sources.iter() {
        info!(
            "  source: {} in {} ({:?})",
            binding.announcer,
            binding.room.as_deref().unwrap_or("any room"),
            binding.grammar
        );
    }

    let mut bridge = Bridge::new(settings.sources, store, stdout_buffers());

    let reader = BufReader::new(stdin());
    let shutdown = tokio::select! {
        biased;
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
            None
        }
        stats = run_feed(&mut bridge, reader, stdout()) => Some(stats?),
    };

    match shutdown {
        Some(stats) => info!(
            "Input closed: {} lines, {} redirected, {} option changes ({} rejected)",
            stats.lines, stats.redirected, stats.option_changes, stats.rejected_options
        ),
        None => warn!("Stopped before input closed"),
    }

    info!("Exiting...");
    Ok(())
}

/// Buffers are created on first use by the host; remember which names were
/// already announced.
fn stdout_buffers() -> BufferResolver {
    let created: Mutex<HashSet<String>> = Mutex::new(HashSet::new());
    Arc::new(move |name: &str| {
        let mut created = created.lock().ok()?;
        if created.insert(name.to_string()) {
            info!("Using buffer '{}' for redirected lines", name);
        }
        Some(BufferId(format!("buffer:{}", name)))
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
