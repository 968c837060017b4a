//! Integration tests for the accounts API.
//!
//! # Running Tests
//!
//! ```bash
//! # HTTP tests (in-memory store, no setup needed)
//! cargo test -p accounts-integration-tests
//!
//! # PostgreSQL repository tests
//! ACCOUNTS_TEST_DATABASE_URL=postgres://... \
//!     cargo test -p accounts-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `customers_api` / `users_api` - full HTTP flows against a spawned server
//! - `postgres_repository` - repository against a real database (ignored)

use std::net::{IpAddr, Ipv4Addr};

use reqwest::Client;
use secrecy::SecretString;
use sqlx::PgPool;
use tokio::task::JoinHandle;

use accounts_api::config::ApiConfig;
use accounts_api::effects::SideEffects;
use accounts_api::{AppState, app, db};

/// An API server running on an ephemeral port for the duration of a test.
pub struct TestServer {
    pub base_url: String,
    pub client: Client,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Spawn a server over empty in-memory stores with no-op collaborators.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn() -> Self {
        Self::spawn_with(AppState::in_memory(SideEffects::noop())).await
    }

    /// Spawn a server over `state`.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn_with(state: AppState) -> Self {
        let config = ApiConfig::in_memory(IpAddr::V4(Ipv4Addr::LOCALHOST), 0);
        let listener = tokio::net::TcpListener::bind(config.socket_addr())
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app(state)).await {
                panic!("Test server failed: {e}");
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            client: Client::new(),
            handle,
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Connect to `ACCOUNTS_TEST_DATABASE_URL` and run migrations.
///
/// # Panics
///
/// Panics if the variable is unset, the connection fails, or a migration
/// fails.
pub async fn test_pool() -> PgPool {
    let url = std::env::var("ACCOUNTS_TEST_DATABASE_URL")
        .map(SecretString::from)
        .expect("ACCOUNTS_TEST_DATABASE_URL must be set for database tests");
    let pool = db::create_pool(&url)
        .await
        .expect("Failed to connect to test database");
    sqlx::migrate!("../api/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// A unique email so tests can share one database.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.com", uuid::Uuid::new_v4().simple())
}
