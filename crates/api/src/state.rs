//! Application state shared across handlers.

use std::sync::Arc;

use accounts_core::EntityKind;

use crate::db::{EntityRepository, MemoryEntityRepository, RepositoryError};
use crate::effects::SideEffects;
use crate::services::UseCases;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the use cases for both entity kinds.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    customers: Arc<UseCases>,
    users: Arc<UseCases>,
}

impl AppState {
    /// Build state from one repository per kind and a shared set of
    /// collaborators.
    #[must_use]
    pub fn new(
        customers: Arc<dyn EntityRepository>,
        users: Arc<dyn EntityRepository>,
        effects: SideEffects,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                customers: Arc::new(UseCases::new(customers, effects.clone())),
                users: Arc::new(UseCases::new(users, effects)),
            }),
        }
    }

    /// State backed by empty in-memory repositories.
    #[must_use]
    pub fn in_memory(effects: SideEffects) -> Self {
        Self::new(
            Arc::new(MemoryEntityRepository::new(EntityKind::Customer)),
            Arc::new(MemoryEntityRepository::new(EntityKind::User)),
            effects,
        )
    }

    /// Use cases for `kind`.
    #[must_use]
    pub fn use_cases(&self, kind: EntityKind) -> Arc<UseCases> {
        match kind {
            EntityKind::Customer => self.inner.customers.clone(),
            EntityKind::User => self.inner.users.clone(),
        }
    }

    /// Check every backing store.
    ///
    /// # Errors
    ///
    /// Returns the first repository error encountered.
    pub async fn health_check(&self) -> Result<(), RepositoryError> {
        self.inner.customers.health_check().await?;
        self.inner.users.health_check().await
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
