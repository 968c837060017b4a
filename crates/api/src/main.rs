//! Accounts API server.
//!
//! # Architecture
//!
//! - Axum web framework, JSON in and out
//! - One service type per use case, shared by `/customers` and `/users`
//! - `PostgreSQL` storage (or in-memory with `ACCOUNTS_STORE=memory`)
//! - Side-effect collaborators that log, with SMTP mail when configured
//!
//! Migrations are not run on startup. Run them explicitly via:
//! `cargo run -p accounts-cli -- migrate`

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;
use std::sync::Arc;

use sentry::integrations::tracing as sentry_tracing;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use accounts_api::config::{ApiConfig, StoreBackend};
use accounts_api::db::{self, PgEntityRepository};
use accounts_api::effects::{SideEffects, SmtpMailer};
use accounts_api::{AppState, app};
use accounts_core::EntityKind;

/// Our crate plus the collaborator log targets.
const DEFAULT_LOG_FILTER: &str =
    "accounts_api=info,audit=info,analytics=info,mailing=info,notifications=info,tower_http=debug";

/// Errors that stop the server from starting or serving.
#[derive(Debug, Error)]
enum StartupError {
    #[error("ACCOUNTS_DATABASE_URL is required for the postgres store")]
    MissingDatabaseUrl,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("SMTP setup failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ApiConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    // JSON for log shippers, text locally
    let json = std::env::var("ACCOUNTS_LOG_FORMAT").is_ok_and(|v| v == "json");
    let json_layer = json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

/// Logging collaborators, with the SMTP mailer when SMTP is configured.
fn build_effects(config: &ApiConfig) -> Result<SideEffects, StartupError> {
    let effects = SideEffects::logging();
    let Some(email) = &config.email else {
        tracing::info!("SMTP not configured, emails are logged only");
        return Ok(effects);
    };

    let mailer = SmtpMailer::new(email)?;
    tracing::info!(host = %email.smtp_host, "SMTP mailer configured");
    Ok(effects.with_mailer(Arc::new(mailer)))
}

async fn build_state(config: &ApiConfig, effects: SideEffects) -> Result<AppState, StartupError> {
    match config.store {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, data is lost on shutdown");
            Ok(AppState::in_memory(effects))
        }
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_ref()
                .ok_or(StartupError::MissingDatabaseUrl)?;
            let pool = db::create_pool(url).await?;
            tracing::info!("Database pool created");

            Ok(AppState::new(
                Arc::new(PgEntityRepository::new(pool.clone(), EntityKind::Customer)),
                Arc::new(PgEntityRepository::new(pool, EntityKind::User)),
                effects,
            ))
        }
    }
}

async fn run(config: ApiConfig) -> Result<(), StartupError> {
    let effects = build_effects(&config)?;
    let state = build_state(&config, effects).await?;

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("accounts-api listening on http://{}", addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ApiConfig::from_env() {
        Ok(config) => config,
        #[allow(clippy::print_stderr)]
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Server failed");
            ExitCode::FAILURE
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
