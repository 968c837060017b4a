//! Seed the database with demo customers and users.
//!
//! Records are inserted through the same repository the API uses. Emails are
//! deterministic (`customer-<n>@example.com`, `user-<n>@example.com`), so
//! reseeding skips records that already exist.

use accounts_api::db::{self, EntityRepository, PgEntityRepository, RepositoryError};
use accounts_api::models::NewEntity;
use accounts_core::{Email, EntityKind};

use super::{CommandError, database_url};

const FIRST_NAMES: [&str; 8] = [
    "Ada", "Grace", "Alan", "Barbara", "Edsger", "Frances", "John", "Margaret",
];
const LAST_NAMES: [&str; 8] = [
    "Lovelace", "Hopper", "Turing", "Liskov", "Dijkstra", "Allen", "Backus", "Hamilton",
];

/// Outcome of a seeding run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub inserted: usize,
    pub skipped: usize,
}

/// Insert `count` demo records of each kind.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails, or
/// an insert fails for a reason other than a duplicate email.
pub async fn run(count: usize) -> Result<SeedSummary, CommandError> {
    let database_url = database_url()?;
    let pool = db::create_pool(&database_url).await?;
    tracing::info!("Connected to database");

    let mut summary = SeedSummary::default();
    for kind in EntityKind::ALL {
        let repo = PgEntityRepository::new(pool.clone(), kind);
        let result = seed_kind(&repo, count).await?;
        tracing::info!(
            kind = %kind,
            inserted = result.inserted,
            skipped = result.skipped,
            "Seeded"
        );
        summary.inserted += result.inserted;
        summary.skipped += result.skipped;
    }

    Ok(summary)
}

/// Insert `count` demo records into `repo`, skipping taken emails.
///
/// # Errors
///
/// Returns the first repository error other than a conflict.
pub async fn seed_kind(
    repo: &dyn EntityRepository,
    count: usize,
) -> Result<SeedSummary, CommandError> {
    let mut summary = SeedSummary::default();

    for n in 1..=count {
        let new = demo_entity(repo.kind(), n)?;
        match repo.insert(new).await {
            Ok(_) => summary.inserted += 1,
            Err(RepositoryError::Conflict(_)) => summary.skipped += 1,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(summary)
}

fn demo_entity(kind: EntityKind, n: usize) -> Result<NewEntity, CommandError> {
    let prefix = match kind {
        EntityKind::Customer => "customer",
        EntityKind::User => "user",
    };
    let email = Email::parse(&format!("{prefix}-{n}@example.com"))
        .map_err(|e| CommandError::InvalidData(format!("demo email {n}: {e}")))?;

    Ok(NewEntity {
        email,
        first_name: pick(&FIRST_NAMES, n),
        last_name: pick(&LAST_NAMES, n / FIRST_NAMES.len()),
        // Every third record has no phone number.
        phone_number: (n % 3 != 0).then(|| format!("+1 555 {n:04}")),
    })
}

fn pick(names: &[&str], n: usize) -> String {
    n.checked_rem(names.len())
        .and_then(|i| names.get(i))
        .copied()
        .unwrap_or_default()
        .to_owned()
}
