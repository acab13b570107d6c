//! rosterwatch: roster presence watcher
//!
//! Main entry point that wires all crates together and runs the refresh loop.

mod cli;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use rosterwatch_client::{HttpAvatarSource, WebApiClient};
use rosterwatch_core::config::AppConfig;
use rosterwatch_core::error::AppError;
use rosterwatch_core::locale::Strings;
use rosterwatch_core::traits::{Clock, SharedSettings, SystemClock, UserSettings};
use rosterwatch_notify::channel::{BannerChannel, BannerState, LogToaster, ToastChannel};
use rosterwatch_notify::{NotificationDispatcher, NotificationFormatter};
use rosterwatch_worker::scheduler::TickFactory;
use rosterwatch_worker::{
    BoardSink, Collaborators, IntervalTicks, PresenceBoard, PresenceCycle, Scheduler, TickSource,
};

use cli::{Cli, Command};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load(&cli.config, &cli.env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    let result = match cli.command.unwrap_or_default() {
        Command::Run => run(config).await,
        Command::TestNotification => test_notification(config).await,
    };

    if let Err(e) = result {
        tracing::error!("rosterwatch error: {}", e);
        std::process::exit(1);
    }
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

/// Run the refresh loop until a shutdown signal arrives.
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting rosterwatch v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Data directories ─────────────────────────────────
    tokio::fs::create_dir_all(&config.cache.avatar_dir)
        .await
        .map_err(|e| {
            AppError::internal(format!(
                "Failed to create dir '{}': {}",
                config.cache.avatar_dir, e
            ))
        })?;

    // ── Step 2: Remote API ───────────────────────────────────────
    let api = Arc::new(WebApiClient::new(&config.remote)?);
    let avatar_source = Arc::new(HttpAvatarSource::new(&config.remote)?);
    tracing::info!("Remote API: {}", config.remote.base_url);

    // ── Step 3: Settings, clock, and outputs ─────────────────────
    let settings = Arc::new(SharedSettings::new(UserSettings::from(&config)));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let board = Arc::new(BoardSink::new());
    let banner = Arc::new(BannerChannel::new(Duration::from_secs(
        config.notifications.banner_seconds,
    )));
    let toast = Arc::new(ToastChannel::new(Arc::new(LogToaster)));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let reporter = tokio::spawn(report_changes(
        board.subscribe(),
        banner.subscribe(),
        shutdown_rx,
    ));

    // ── Step 4: Refresh cycle and scheduler ──────────────────────
    let cycle = Arc::new(PresenceCycle::new(
        &config,
        Collaborators {
            api,
            avatar_source,
            settings,
            clock: Arc::clone(&clock),
            sink: board,
            banner,
            toast,
        },
    ));

    let refresh = Duration::from_secs(config.polling.refresh_seconds);
    let ticks: TickFactory =
        Arc::new(move || Box::new(IntervalTicks::new(refresh)) as Box<dyn TickSource>);
    let scheduler = Scheduler::new(
        cycle,
        clock,
        ticks,
        chrono::Duration::minutes(config.polling.pause_on_activity_minutes as i64),
    );

    if scheduler.start() {
        tracing::info!("Polling every {}s", config.polling.refresh_seconds);
    } else {
        tracing::warn!("Polling is disabled in configuration");
    }

    // ── Step 5: Graceful shutdown ────────────────────────────────
    shutdown_signal().await;
    tracing::info!("Shutdown signal received, stopping refresh loop...");
    scheduler.stop();
    let _ = tokio::time::timeout(Duration::from_secs(10), scheduler.await_completion()).await;

    let _ = shutdown_tx.send(true);
    let _ = tokio::time::timeout(Duration::from_secs(5), reporter).await;

    tracing::info!("rosterwatch shut down gracefully");
    Ok(())
}

/// Deliver one sample notification and keep the banner up for its duration.
async fn test_notification(config: AppConfig) -> Result<(), AppError> {
    let banner_for = Duration::from_secs(config.notifications.banner_seconds);
    let dispatcher = NotificationDispatcher::new(
        NotificationFormatter::new(Strings::new(config.strings.clone())),
        Arc::new(BannerChannel::new(banner_for)),
        Arc::new(ToastChannel::new(Arc::new(LogToaster))),
    );

    match dispatcher.send_test_notification(&UserSettings::from(&config)) {
        Some(notification) => {
            println!("{}", notification.banner_text);
            if config.notifications.output.sends_banner() {
                tokio::time::sleep(banner_for).await;
            }
        }
        None => println!("Notifications are disabled in configuration"),
    }
    Ok(())
}

/// Log board and banner changes until shutdown.
async fn report_changes(
    mut board: watch::Receiver<PresenceBoard>,
    mut banner: watch::Receiver<BannerState>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            changed = board.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = board.borrow_and_update().clone();
                match &snapshot.status {
                    Some(status) => tracing::warn!(status = %status, "Presence board reset"),
                    None => tracing::info!(
                        online = snapshot.view.counts.online,
                        in_game = snapshot.view.counts.in_game,
                        offline = snapshot.view.counts.offline,
                        revision = snapshot.revision,
                        "Presence board updated"
                    ),
                }
            }
            changed = banner.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = banner.borrow_and_update().clone();
                if state.visible {
                    tracing::info!(message = %state.message, "Banner");
                }
            }
            _ = shutdown.changed() => break,
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
}
