//! In-memory entity repository.
//!
//! Keeps records in insertion order behind a `RwLock`. Used by tests and by
//! `ACCOUNTS_STORE=memory` for running the API without a database.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use accounts_core::{Email, EntityId, EntityKind};

use super::{EntityRepository, RepositoryError};
use crate::models::{Entity, NewEntity};

/// Process-local repository for one entity kind.
#[derive(Debug)]
pub struct MemoryEntityRepository {
    kind: EntityKind,
    rows: RwLock<Vec<Entity>>,
}

impl MemoryEntityRepository {
    /// Create an empty repository for `kind`.
    #[must_use]
    pub const fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            rows: RwLock::const_new(Vec::new()),
        }
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Whether the repository holds no records.
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

/// Newest first; among equal timestamps the later insert comes first.
fn newest_first<'a>(rows: impl DoubleEndedIterator<Item = &'a Entity>) -> Vec<Entity> {
    let mut out: Vec<Entity> = rows.rev().cloned().collect();
    out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    out
}

#[async_trait]
impl EntityRepository for MemoryEntityRepository {
    fn kind(&self) -> EntityKind {
        self.kind
    }

    async fn find_by_id(&self, id: EntityId) -> Result<Option<Entity>, RepositoryError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|e| e.id == id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Entity>, RepositoryError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|e| &e.email == email).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Entity>, RepositoryError> {
        let rows = self.rows.read().await;
        Ok(newest_first(rows.iter()))
    }

    async fn search(&self, text: &str) -> Result<Vec<Entity>, RepositoryError> {
        let needle = text.to_lowercase();
        let rows = self.rows.read().await;
        Ok(newest_first(rows.iter().filter(|e| e.matches_text(&needle))))
    }

    async fn insert(&self, new: NewEntity) -> Result<Entity, RepositoryError> {
        let mut rows = self.rows.write().await;

        if rows.iter().any(|e| e.email == new.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let now = Utc::now();
        let entity = Entity {
            id: EntityId::new(),
            email: new.email,
            first_name: new.first_name,
            last_name: new.last_name,
            phone_number: new.phone_number,
            email_confirmed: false,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        rows.push(entity.clone());

        Ok(entity)
    }

    async fn save(&self, entity: &Entity) -> Result<Entity, RepositoryError> {
        let mut rows = self.rows.write().await;
        let stored = rows
            .iter_mut()
            .find(|e| e.id == entity.id)
            .ok_or(RepositoryError::NotFound)?;

        // Identity, email and creation time are not writable through save.
        stored.first_name.clone_from(&entity.first_name);
        stored.last_name.clone_from(&entity.last_name);
        stored.phone_number.clone_from(&entity.phone_number);
        stored.email_confirmed = entity.email_confirmed;
        stored.is_active = entity.is_active;
        stored.updated_at = Utc::now();

        Ok(stored.clone())
    }

    async fn delete(&self, id: EntityId) -> Result<(), RepositoryError> {
        self.rows.write().await.retain(|e| e.id != id);
        Ok(())
    }

    async fn health_check(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
