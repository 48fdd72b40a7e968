/// Tag model
///
/// Tags label recipes ("Vegan", "Dessert"). They are created implicitly when
/// a recipe payload names one the owner doesn't have yet, and are reused by
/// name afterwards. See [`super::named`] for the shared queries.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tags (
///     id BIGSERIAL PRIMARY KEY,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     name VARCHAR(255) NOT NULL,
///     CONSTRAINT tags_user_name_unique UNIQUE (user_id, name)
/// );
///
/// CREATE TABLE recipe_tags (
///     recipe_id BIGINT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
///     tag_id BIGINT NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
///     PRIMARY KEY (recipe_id, tag_id)
/// );
/// ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::named::NamedEntity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,

    /// Owner; never serialized
    #[serde(skip)]
    pub user_id: Uuid,

    pub name: String,
}

impl NamedEntity for Tag {
    const KIND: &'static str = "tag";
    const TABLE: &'static str = "tags";
    const LINK_TABLE: &'static str = "recipe_tags";
    const LINK_COLUMN: &'static str = "tag_id";

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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_serializes_id_and_name_only() {
        let tag = Tag::from_parts(7, Uuid::new_v4(), "Vegan".to_string());
        let json = serde_json::to_value(&tag).unwrap();

        assert_eq!(json, serde_json::json!({ "id": 7, "name": "Vegan" }));
    }
}
