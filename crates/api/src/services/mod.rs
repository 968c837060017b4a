//! Account use cases.
//!
//! One type per action, each exposing a single `handle` method. Every use
//! case follows the same shape: fetch, guard, mutate, persist, then fan out
//! to the side-effect collaborators (see [`crate::effects`]).
//!
//! [`UseCases`] builds the full set for one [`EntityKind`].

mod activate;
mod confirm_email;
mod create;
mod deactivate;
mod delete;
mod error;
mod get;
mod get_by_email;
mod list;
mod search;
mod update;

use std::sync::Arc;

pub use activate::ActivateEntity;
pub use confirm_email::ConfirmEmail;
pub use create::CreateEntity;
pub use deactivate::DeactivateEntity;
pub use delete::DeleteEntity;
pub use error::ServiceError;
pub use get::GetEntity;
pub use get_by_email::GetEntityByEmail;
pub use list::ListEntities;
pub use search::SearchEntities;
pub use update::UpdateEntity;

use accounts_core::{EntityId, EntityKind};

use crate::db::{EntityRepository, RepositoryError};
use crate::effects::SideEffects;
use crate::models::Entity;

/// Dependencies shared by every use case.
#[derive(Clone)]
pub(crate) struct Deps {
    repo: Arc<dyn EntityRepository>,
    effects: SideEffects,
}

impl Deps {
    fn kind(&self) -> EntityKind {
        self.repo.kind()
    }

    /// Namespaced audit action for this kind, e.g. `users.activate`.
    fn action(&self, verb: &str) -> String {
        self.kind().action(verb)
    }

    async fn require(&self, id: EntityId) -> Result<Entity, ServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(self.kind(), id))
    }

    /// Save, reporting a row deleted since it was read as `NotFound`.
    async fn save(&self, entity: &Entity) -> Result<Entity, ServiceError> {
        self.repo.save(entity).await.map_err(|e| match e {
            RepositoryError::NotFound => ServiceError::not_found(self.kind(), entity.id),
            other => ServiceError::Repository(other),
        })
    }
}

/// Parse a path ID. Malformed IDs cannot match any record, so they are
/// reported as `NotFound` carrying the raw input.
///
/// # Errors
///
/// Returns `ServiceError::NotFound` if `raw` is not a UUID.
pub fn parse_id(kind: EntityKind, raw: &str) -> Result<EntityId, ServiceError> {
    EntityId::parse(raw).map_err(|_| ServiceError::not_found(kind, raw))
}

/// All use cases for one entity kind.
#[derive(Clone)]
pub struct UseCases {
    pub create: CreateEntity,
    pub get: GetEntity,
    pub get_by_email: GetEntityByEmail,
    pub list: ListEntities,
    pub search: SearchEntities,
    pub update: UpdateEntity,
    pub delete: DeleteEntity,
    pub confirm_email: ConfirmEmail,
    pub activate: ActivateEntity,
    pub deactivate: DeactivateEntity,
    repo: Arc<dyn EntityRepository>,
}

impl UseCases {
    /// Wire every use case to `repo` and `effects`.
    #[must_use]
    pub fn new(repo: Arc<dyn EntityRepository>, effects: SideEffects) -> Self {
        let deps = Deps {
            repo: repo.clone(),
            effects,
        };
        Self {
            create: CreateEntity::new(deps.clone()),
            get: GetEntity::new(deps.clone()),
            get_by_email: GetEntityByEmail::new(deps.clone()),
            list: ListEntities::new(deps.clone()),
            search: SearchEntities::new(deps.clone()),
            update: UpdateEntity::new(deps.clone()),
            delete: DeleteEntity::new(deps.clone()),
            confirm_email: ConfirmEmail::new(deps.clone()),
            activate: ActivateEntity::new(deps.clone()),
            deactivate: DeactivateEntity::new(deps),
            repo,
        }
    }

    /// The kind these use cases operate on.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.repo.kind()
    }

    /// Check the backing store.
    ///
    /// # Errors
    ///
    /// Returns the repository error if the store is unreachable.
    pub async fn health_check(&self) -> Result<(), RepositoryError> {
        self.repo.health_check().await
    }
}

impl std::fmt::Debug for UseCases {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UseCases")
            .field("kind", &self.kind())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use async_trait::async_trait;

    use accounts_core::{Email, EntityId, EntityKind};

    use super::UseCases;
    use crate::db::{EntityRepository, MemoryEntityRepository, RepositoryError};
    use crate::effects::testing::Recorder;
    use crate::models::{CreateEntityRequest, Entity, NewEntity};

    /// Use cases over an empty in-memory store, with a recorder.
    pub fn use_cases(kind: EntityKind) -> (UseCases, Arc<Recorder>) {
        use_cases_over(Arc::new(MemoryEntityRepository::new(kind)))
    }

    /// Use cases over `repo`, with a recorder.
    pub fn use_cases_over(repo: Arc<dyn EntityRepository>) -> (UseCases, Arc<Recorder>) {
        let recorder = Recorder::new();
        (UseCases::new(repo, recorder.side_effects()), recorder)
    }

    /// How [`Racing`] interferes with its inner store.
    #[derive(Debug, Clone, Copy)]
    pub enum Race {
        /// Email lookups miss, as if a concurrent create has not committed yet.
        EmailLookupMisses,
        /// Every row is deleted right after it is read by ID.
        DeletedAfterRead,
    }

    /// In-memory store that simulates a concurrent writer.
    pub struct Racing {
        inner: MemoryEntityRepository,
        race: Race,
    }

    impl Racing {
        pub fn new(kind: EntityKind, race: Race) -> Arc<Self> {
            Arc::new(Self {
                inner: MemoryEntityRepository::new(kind),
                race,
            })
        }
    }

    #[async_trait]
    impl EntityRepository for Racing {
        fn kind(&self) -> EntityKind {
            self.inner.kind()
        }

        async fn find_by_id(&self, id: EntityId) -> Result<Option<Entity>, RepositoryError> {
            let found = self.inner.find_by_id(id).await?;
            if matches!(self.race, Race::DeletedAfterRead) {
                self.inner.delete(id).await?;
            }
            Ok(found)
        }

        async fn find_by_email(&self, email: &Email) -> Result<Option<Entity>, RepositoryError> {
            match self.race {
                Race::EmailLookupMisses => Ok(None),
                Race::DeletedAfterRead => self.inner.find_by_email(email).await,
            }
        }

        async fn find_all(&self) -> Result<Vec<Entity>, RepositoryError> {
            self.inner.find_all().await
        }

        async fn search(&self, text: &str) -> Result<Vec<Entity>, RepositoryError> {
            self.inner.search(text).await
        }

        async fn insert(&self, new: NewEntity) -> Result<Entity, RepositoryError> {
            self.inner.insert(new).await
        }

        async fn save(&self, entity: &Entity) -> Result<Entity, RepositoryError> {
            self.inner.save(entity).await
        }

        async fn delete(&self, id: EntityId) -> Result<(), RepositoryError> {
            self.inner.delete(id).await
        }

        async fn health_check(&self) -> Result<(), RepositoryError> {
            self.inner.health_check().await
        }
    }

    /// Use cases whose collaborators all fail.
    pub fn failing_use_cases(kind: EntityKind) -> (UseCases, Arc<Recorder>) {
        let recorder = Recorder::failing();
        let repo = Arc::new(MemoryEntityRepository::new(kind));
        (UseCases::new(repo, recorder.side_effects()), recorder)
    }

    pub fn request(email: &str, first: &str, last: &str) -> CreateEntityRequest {
        CreateEntityRequest {
            email: email.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            phone_number: None,
        }
    }

    /// Create a record, then forget the create's side effects.
    pub async fn seed(
        use_cases: &UseCases,
        recorder: &Recorder,
        email: &str,
        first: &str,
        last: &str,
    ) -> Entity {
        let entity = use_cases
            .create
            .handle(request(email, first, last))
            .await
            .unwrap();
        recorder.clear();
        entity
    }
}
