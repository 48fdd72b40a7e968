/// Ingredient model
///
/// Same shape and ownership rules as [`super::tag::Tag`]: one row per owner
/// and name, created on first mention in a recipe payload.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE ingredients (
///     id BIGSERIAL PRIMARY KEY,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     name VARCHAR(255) NOT NULL,
///     CONSTRAINT ingredients_user_name_unique UNIQUE (user_id, name)
/// );
/// ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::named::NamedEntity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: i64,

    #[serde(skip)]
    pub user_id: Uuid,

    pub name: String,
}

impl NamedEntity for Ingredient {
    const KIND: &'static str = "ingredient";
    const TABLE: &'static str = "ingredients";
    const LINK_TABLE: &'static str = "recipe_ingredients";
    const LINK_COLUMN: &'static str = "ingredient_id";

    fn from_parts(id: i64, user_id: Uuid, name: String) -> Self {
        Self { id, user_id, name }
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn user_id(&self) -> Uuid {
        self.user_id
    }

    fn name(&self) -> &str {
        &self.name
    }
}
