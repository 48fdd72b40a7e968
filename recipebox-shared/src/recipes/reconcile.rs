/// Get-or-create reconciliation for nested tags and ingredients
///
/// Given a list of names from a request, resolve each to the owner's
/// existing entity or create it, then link it to the recipe. Everything runs
/// on the caller's connection, normally inside the recipe write transaction,
/// so a failure anywhere leaves no partial entities or links behind.
///
/// Names are matched exactly (case-sensitive, after trimming in the payload
/// layer). Repeating a name in one request resolves to a single entity and a
/// single link.

use sqlx::PgConnection;
use uuid::Uuid;

use crate::models::named::{self, NamedEntity};

/// Errors from resolving nested entities
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// The insert hit a conflicting row that the follow-up lookup could not see
    #[error("{kind} {name:?} conflicted on insert but could not be found")]
    Vanished { kind: &'static str, name: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// What a reconcile pass resolved
#[derive(Debug)]
pub struct ReconcileOutcome<T> {
    /// Distinct entities now linked, in first-mention order
    pub entities: Vec<T>,

    /// How many of them did not exist before this pass
    pub created: usize,
}

impl<T> Default for ReconcileOutcome<T> {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
            created: 0,
        }
    }
}

/// Resolves one name to the owner's entity, creating it if needed
///
/// Returns the entity and whether it was created here.
pub async fn get_or_create<T: NamedEntity>(
    conn: &mut PgConnection,
    user_id: Uuid,
    name: &str,
) -> Result<(T, bool), ReconcileError> {
    if let Some(existing) = named::find_by_name::<T>(&mut *conn, user_id, name).await? {
        return Ok((existing, false));
    }

    if let Some(created) = named::insert_if_absent::<T>(&mut *conn, user_id, name).await? {
        return Ok((created, true));
    }

    // Lost a race with a concurrent insert; the row is there now.
    named::find_by_name::<T>(&mut *conn, user_id, name)
        .await?
        .map(|existing| (existing, false))
        .ok_or_else(|| ReconcileError::Vanished {
            kind: T::KIND,
            name: name.to_string(),
        })
}

/// Resolves `names` and links each entity to the recipe
///
/// Existing links are kept; this only adds.
pub async fn attach_all<T: NamedEntity>(
    conn: &mut PgConnection,
    user_id: Uuid,
    recipe_id: i64,
    names: &[String],
) -> Result<ReconcileOutcome<T>, ReconcileError> {
    let mut outcome = ReconcileOutcome::default();

    for name in names {
        if outcome.entities.iter().any(|e: &T| e.name() == name.as_str()) {
            continue;
        }

        let (entity, created) = get_or_create::<T>(&mut *conn, user_id, name).await?;
        named::attach::<T>(&mut *conn, recipe_id, entity.id()).await?;

        if created {
            outcome.created += 1;
        }
        outcome.entities.push(entity);
    }

    tracing::debug!(
        recipe_id = recipe_id,
        kind = T::KIND,
        linked = outcome.entities.len(),
        created = outcome.created,
        "Reconciled nested entities"
    );

    Ok(outcome)
}

/// Makes the recipe's links of this kind exactly `names`
///
/// Previously linked entities that are no longer named are unlinked but not
/// deleted. An empty list clears every link.
pub async fn replace<T: NamedEntity>(
    conn: &mut PgConnection,
    user_id: Uuid,
    recipe_id: i64,
    names: &[String],
) -> Result<ReconcileOutcome<T>, ReconcileError> {
    let removed = named::detach_all::<T>(&mut *conn, recipe_id).await?;

    tracing::debug!(
        recipe_id = recipe_id,
        kind = T::KIND,
        removed = removed,
        "Cleared nested links"
    );

    attach_all(conn, user_id, recipe_id, names).await
}
