/// Owner-scoped, name-keyed entities attached to recipes
///
/// Tags and ingredients share one shape (`id`, `user_id`, `name`), one
/// uniqueness rule (one row per owner and name) and one kind of association
/// table. [`NamedEntity`] captures the table names; the functions here are
/// the queries both kinds run.
///
/// Table and column names come from trait constants, never from input, so
/// they are safe to splice into SQL text.

use serde::Serialize;
use sqlx::{PgConnection, PgExecutor, PgPool};
use uuid::Uuid;

/// A per-user entity identified by its name and linked to recipes
pub trait NamedEntity: Serialize + Send + Sync + Unpin + Sized + 'static {
    /// Human-readable kind, used in logs and error messages
    const KIND: &'static str;

    /// Table holding the entities
    const TABLE: &'static str;

    /// Association table linking recipes to entities
    const LINK_TABLE: &'static str;

    /// Entity id column in [`Self::LINK_TABLE`]
    const LINK_COLUMN: &'static str;

    fn from_parts(id: i64, user_id: Uuid, name: String) -> Self;

    fn id(&self) -> i64;

    fn user_id(&self) -> Uuid;

    fn name(&self) -> &str;
}

#[derive(sqlx::FromRow)]
struct NamedRow {
    id: i64,
    user_id: Uuid,
    name: String,
}

impl NamedRow {
    fn into_entity<T: NamedEntity>(self) -> T {
        T::from_parts(self.id, self.user_id, self.name)
    }
}

#[derive(sqlx::FromRow)]
struct LinkedRow {
    recipe_id: i64,
    id: i64,
    user_id: Uuid,
    name: String,
}

/// Finds the entity owned by `user_id` with exactly this name
pub async fn find_by_name<T: NamedEntity>(
    conn: &mut PgConnection,
    user_id: Uuid,
    name: &str,
) -> Result<Option<T>, sqlx::Error> {
    let query = format!(
        "SELECT id, user_id, name FROM {} WHERE user_id = $1 AND name = $2",
        T::TABLE
    );

    let row = sqlx::query_as::<_, NamedRow>(&query)
        .bind(user_id)
        .bind(name)
        .fetch_optional(conn)
        .await?;

    Ok(row.map(NamedRow::into_entity))
}

/// Inserts an entity unless the owner already has one with this name
///
/// Returns `None` when the row already existed, including when a concurrent
/// transaction inserted it first.
pub async fn insert_if_absent<T: NamedEntity>(
    conn: &mut PgConnection,
    user_id: Uuid,
    name: &str,
) -> Result<Option<T>, sqlx::Error> {
    let query = format!(
        "INSERT INTO {} (user_id, name) VALUES ($1, $2) \
         ON CONFLICT (user_id, name) DO NOTHING \
         RETURNING id, user_id, name",
        T::TABLE
    );

    let row = sqlx::query_as::<_, NamedRow>(&query)
        .bind(user_id)
        .bind(name)
        .fetch_optional(conn)
        .await?;

    Ok(row.map(NamedRow::into_entity))
}

/// Links an entity to a recipe; linking twice is a no-op
///
/// Returns whether a new link row was written.
pub async fn attach<T: NamedEntity>(
    conn: &mut PgConnection,
    recipe_id: i64,
    entity_id: i64,
) -> Result<bool, sqlx::Error> {
    let query = format!(
        "INSERT INTO {} (recipe_id, {}) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        T::LINK_TABLE,
        T::LINK_COLUMN
    );

    let result = sqlx::query(&query)
        .bind(recipe_id)
        .bind(entity_id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Removes every link of this kind from a recipe, returning how many went
pub async fn detach_all<T: NamedEntity>(
    conn: &mut PgConnection,
    recipe_id: i64,
) -> Result<u64, sqlx::Error> {
    let query = format!("DELETE FROM {} WHERE recipe_id = $1", T::LINK_TABLE);

    let result = sqlx::query(&query).bind(recipe_id).execute(conn).await?;

    Ok(result.rows_affected())
}

/// Loads the entities linked to each of `recipe_ids`, ordered by name
///
/// Returns `(recipe_id, entity)` pairs.
pub async fn for_recipes<'e, T, E>(executor: E, recipe_ids: &[i64]) -> Result<Vec<(i64, T)>, sqlx::Error>
where
    T: NamedEntity,
    E: PgExecutor<'e>,
{
    if recipe_ids.is_empty() {
        return Ok(Vec::new());
    }

    let query = format!(
        "SELECT l.recipe_id, e.id, e.user_id, e.name \
         FROM {link} l \
         JOIN {table} e ON e.id = l.{column} \
         WHERE l.recipe_id = ANY($1) \
         ORDER BY e.name, e.id",
        link = T::LINK_TABLE,
        table = T::TABLE,
        column = T::LINK_COLUMN
    );

    let rows = sqlx::query_as::<_, LinkedRow>(&query)
        .bind(recipe_ids)
        .fetch_all(executor)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| (row.recipe_id, T::from_parts(row.id, row.user_id, row.name)))
        .collect())
}

/// Lists the owner's entities, name descending
pub async fn list_for_owner<T: NamedEntity>(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<T>, sqlx::Error> {
    let query = format!(
        "SELECT id, user_id, name FROM {} WHERE user_id = $1 ORDER BY name DESC, id DESC",
        T::TABLE
    );

    let rows = sqlx::query_as::<_, NamedRow>(&query)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(NamedRow::into_entity).collect())
}

/// Renames an entity if the requester owns it
///
/// Returns `None` when the id is unknown or belongs to someone else. A name
/// already used by another of the owner's entities fails with a unique
/// violation.
pub async fn rename_owned<T: NamedEntity>(
    pool: &PgPool,
    id: i64,
    user_id: Uuid,
    name: &str,
) -> Result<Option<T>, sqlx::Error> {
    let query = format!(
        "UPDATE {} SET name = $3 WHERE id = $1 AND user_id = $2 RETURNING id, user_id, name",
        T::TABLE
    );

    let row = sqlx::query_as::<_, NamedRow>(&query)
        .bind(id)
        .bind(user_id)
        .bind(name)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(NamedRow::into_entity))
}

/// Deletes an entity if the requester owns it; its recipe links cascade
pub async fn delete_owned<T: NamedEntity>(
    pool: &PgPool,
    id: i64,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let query = format!("DELETE FROM {} WHERE id = $1 AND user_id = $2", T::TABLE);

    let result = sqlx::query(&query)
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Counts the owner's entities with this name (0 or 1 while the invariant holds)
pub async fn count_by_name<T: NamedEntity>(
    pool: &PgPool,
    user_id: Uuid,
    name: &str,
) -> Result<i64, sqlx::Error> {
    let query = format!(
        "SELECT COUNT(*) FROM {} WHERE user_id = $1 AND name = $2",
        T::TABLE
    );

    let (count,): (i64,) = sqlx::query_as(&query)
        .bind(user_id)
        .bind(name)
        .fetch_one(pool)
        .await?;

    Ok(count)
}
