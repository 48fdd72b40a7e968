/// Recipe model and owner-scoped queries
///
/// Every query here filters on `user_id`. A recipe owned by someone else is
/// indistinguishable from one that doesn't exist.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE recipes (
///     id BIGSERIAL PRIMARY KEY,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     time_minutes INTEGER NOT NULL CHECK (time_minutes >= 0),
///     price NUMERIC(5, 2) NOT NULL CHECK (price >= 0),
///     link VARCHAR(255) NOT NULL DEFAULT '',
///     description TEXT NOT NULL DEFAULT '',
///     image VARCHAR(512),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgExecutor, PgPool};
use uuid::Uuid;

const RECIPE_COLUMNS: &str = "id, user_id, title, time_minutes, price, link, description, image, \
                              created_at, updated_at";

/// Recipe row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Recipe {
    pub id: i64,

    /// Owner, fixed at creation
    pub user_id: Uuid,

    pub title: String,

    pub time_minutes: i32,

    /// Fixed-point price with two decimal places
    pub price: Decimal,

    /// Source URL, empty when not given
    pub link: String,

    /// Free text, empty when not given
    pub description: String,

    /// Stored image path; not writable through the recipe payload
    pub image: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Scalar fields of a recipe about to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecipe {
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
    pub description: String,
}

/// Scalar fields to overwrite; `None` leaves the column untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeChanges {
    pub title: Option<String>,
    pub time_minutes: Option<i32>,
    pub price: Option<Decimal>,
    pub link: Option<String>,
    pub description: Option<String>,
}

impl RecipeChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.time_minutes.is_none()
            && self.price.is_none()
            && self.link.is_none()
            && self.description.is_none()
    }
}

impl Recipe {
    /// Inserts a recipe owned by `user_id`
    pub async fn insert(
        conn: &mut PgConnection,
        user_id: Uuid,
        data: NewRecipe,
    ) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO recipes (user_id, title, time_minutes, price, link, description) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {RECIPE_COLUMNS}"
        );

        sqlx::query_as::<_, Recipe>(&query)
            .bind(user_id)
            .bind(data.title)
            .bind(data.time_minutes)
            .bind(data.price)
            .bind(data.link)
            .bind(data.description)
            .fetch_one(conn)
            .await
    }

    /// Finds a recipe by id if `user_id` owns it
    pub async fn find_owned<'e, E: PgExecutor<'e>>(
        executor: E,
        id: i64,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1 AND user_id = $2");

        sqlx::query_as::<_, Recipe>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(executor)
            .await
    }

    /// Like [`Recipe::find_owned`], but holds a row lock until the
    /// surrounding transaction ends
    pub async fn lock_owned(
        conn: &mut PgConnection,
        id: i64,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1 AND user_id = $2 FOR UPDATE"
        );

        sqlx::query_as::<_, Recipe>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(conn)
            .await
    }

    /// Writes the set fields of `changes` and bumps `updated_at`
    pub async fn apply_changes(
        conn: &mut PgConnection,
        id: i64,
        changes: RecipeChanges,
    ) -> Result<Self, sqlx::Error> {
        let query = format!(
            "UPDATE recipes SET \
                 title = COALESCE($2, title), \
                 time_minutes = COALESCE($3, time_minutes), \
                 price = COALESCE($4, price), \
                 link = COALESCE($5, link), \
                 description = COALESCE($6, description), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {RECIPE_COLUMNS}"
        );

        sqlx::query_as::<_, Recipe>(&query)
            .bind(id)
            .bind(changes.title)
            .bind(changes.time_minutes)
            .bind(changes.price)
            .bind(changes.link)
            .bind(changes.description)
            .fetch_one(conn)
            .await
    }

    /// Lists the owner's recipes, newest (highest id) first
    pub async fn list_owned(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE user_id = $1 ORDER BY id DESC"
        );

        sqlx::query_as::<_, Recipe>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Deletes a recipe if `user_id` owns it
    ///
    /// Association rows cascade; tags and ingredients survive.
    pub async fn delete_owned(pool: &PgPool, id: i64, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_changes_is_empty() {
        assert!(RecipeChanges::default().is_empty());

        let changes = RecipeChanges {
            title: Some("New title".to_string()),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }
}
