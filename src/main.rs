//! loan_ledger - peer-to-peer loan lifecycle service
//!
//! Loans move through proposed, approved, invested and disbursed. Investors
//! are emailed the agreement letter once a loan is fully funded.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use loan_ledger::api::{self, AppState};
use loan_ledger::notify::{self, LogNotifier, NotificationQueue, SmtpNotifier};
use loan_ledger::store::InMemoryLoanStore;
use loan_ledger::{Config, LoanLedger};

/// Upper bound on draining queued notifications after the server stops
const NOTIFY_DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Initialize tracing/logging
fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "loan_ledger=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Start the notification dispatcher on SMTP when configured, logging otherwise
fn start_notifications(config: &Config) -> anyhow::Result<(NotificationQueue, JoinHandle<()>)> {
    let dispatcher_config = config.dispatcher_config();

    match &config.smtp {
        Some(smtp) => {
            tracing::info!(
                host = %smtp.host,
                port = smtp.port,
                tls = %smtp.tls,
                "Delivering notifications over SMTP"
            );
            let notifier = SmtpNotifier::new(smtp)?;
            Ok(notify::spawn_dispatcher(notifier, dispatcher_config))
        }
        None => {
            tracing::warn!("SMTP_HOST not set, notifications will only be logged");
            Ok(notify::spawn_dispatcher(LogNotifier, dispatcher_config))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;
    init_tracing(config.is_production());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!(environment = %config.environment, "Starting loan_ledger server");

    let (queue, dispatcher) = start_notifications(&config)?;
    let ledger = LoanLedger::new(Arc::new(InMemoryLoanStore::new()), queue);
    let app = api::build_app(AppState::new(ledger));

    tracing::info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router owned the last queue handle; the dispatcher now drains and stops
    tracing::info!("Server shutting down...");
    match tokio::time::timeout(NOTIFY_DRAIN_TIMEOUT, dispatcher).await {
        Ok(Ok(())) => tracing::info!("Pending notifications drained. Goodbye!"),
        Ok(Err(e)) => tracing::error!(error = %e, "Notification dispatcher panicked"),
        Err(_) => tracing::warn!("Gave up waiting for pending notifications"),
    }

    Ok(())
}

/// Shutdown signal handler for graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}
