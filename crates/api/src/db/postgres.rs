//! `PostgreSQL` entity repository.
//!
//! Customers and users live in identically shaped tables, so one repository
//! type serves both; the table name comes from [`EntityKind::resource`].
//! Queries are built at runtime because the table name varies.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use accounts_core::{Email, EntityId, EntityKind};

use super::{EntityRepository, RepositoryError, escape_like};
use crate::models::{Entity, NewEntity};

const COLUMNS: &str = "id, email, first_name, last_name, phone_number, \
                       email_confirmed, is_active, created_at, updated_at";

/// Raw row as stored in `customers` / `users`.
#[derive(Debug, sqlx::FromRow)]
struct EntityRow {
    id: EntityId,
    email: String,
    first_name: String,
    last_name: String,
    phone_number: Option<String>,
    email_confirmed: bool,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<EntityRow> for Entity {
    type Error = RepositoryError;

    fn try_from(row: EntityRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            email,
            first_name: row.first_name,
            last_name: row.last_name,
            phone_number: row.phone_number,
            email_confirmed: row.email_confirmed,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_entities(rows: Vec<EntityRow>) -> Result<Vec<Entity>, RepositoryError> {
    rows.into_iter().map(Entity::try_from).collect()
}

/// Repository for one entity table.
#[derive(Debug, Clone)]
pub struct PgEntityRepository {
    pool: PgPool,
    kind: EntityKind,
}

impl PgEntityRepository {
    /// Create a repository for `kind` backed by `pool`.
    #[must_use]
    pub const fn new(pool: PgPool, kind: EntityKind) -> Self {
        Self { pool, kind }
    }

    fn table(&self) -> &'static str {
        self.kind.resource()
    }
}

#[async_trait]
impl EntityRepository for PgEntityRepository {
    fn kind(&self) -> EntityKind {
        self.kind
    }

    async fn find_by_id(&self, id: EntityId) -> Result<Option<Entity>, RepositoryError> {
        let sql = format!("SELECT {COLUMNS} FROM {} WHERE id = $1", self.table());
        let row = sqlx::query_as::<_, EntityRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Entity::try_from).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Entity>, RepositoryError> {
        let sql = format!("SELECT {COLUMNS} FROM {} WHERE email = $1", self.table());
        let row = sqlx::query_as::<_, EntityRow>(&sql)
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Entity::try_from).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Entity>, RepositoryError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM {} ORDER BY created_at DESC, id",
            self.table()
        );
        let rows = sqlx::query_as::<_, EntityRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        into_entities(rows)
    }

    async fn search(&self, text: &str) -> Result<Vec<Entity>, RepositoryError> {
        let sql = format!(
            r"
            SELECT {COLUMNS} FROM {}
            WHERE first_name ILIKE $1 OR last_name ILIKE $1 OR email ILIKE $1
            ORDER BY created_at DESC, id
            ",
            self.table()
        );
        let pattern = format!("%{}%", escape_like(text));
        let rows = sqlx::query_as::<_, EntityRow>(&sql)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;

        into_entities(rows)
    }

    async fn insert(&self, new: NewEntity) -> Result<Entity, RepositoryError> {
        let sql = format!(
            r"
            INSERT INTO {} (id, email, first_name, last_name, phone_number)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            ",
            self.table()
        );
        let row = sqlx::query_as::<_, EntityRow>(&sql)
            .bind(EntityId::new())
            .bind(new.email.as_str())
            .bind(&new.first_name)
            .bind(&new.last_name)
            .bind(new.phone_number.as_deref())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    return RepositoryError::Conflict("email already exists".to_owned());
                }
                RepositoryError::Database(e)
            })?;

        row.try_into()
    }

    async fn save(&self, entity: &Entity) -> Result<Entity, RepositoryError> {
        let sql = format!(
            r"
            UPDATE {}
            SET first_name = $2,
                last_name = $3,
                phone_number = $4,
                email_confirmed = $5,
                is_active = $6,
                updated_at = now()
            WHERE id = $1
            RETURNING {COLUMNS}
            ",
            self.table()
        );
        let row = sqlx::query_as::<_, EntityRow>(&sql)
            .bind(entity.id)
            .bind(&entity.first_name)
            .bind(&entity.last_name)
            .bind(entity.phone_number.as_deref())
            .bind(entity.email_confirmed)
            .bind(entity.is_active)
            .fetch_optional(&self.pool)
            .await?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    async fn delete(&self, id: EntityId) -> Result<(), RepositoryError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.table());
        sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
