/// Recipe read views
///
/// Lists return [`RecipeSummary`]; single-recipe reads and write responses
/// return [`RecipeDetail`]. Nested tags and ingredients are always fully
/// expanded as `{id, name}` and ordered by name.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::ingredient::Ingredient;
use crate::models::named::{self, NamedEntity};
use crate::models::recipe::Recipe;
use crate::models::tag::Tag;

/// Recipe as shown in lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub id: i64,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<Ingredient>,
}

/// Recipe as shown on its own: the summary plus the long-form fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub summary: RecipeSummary,
    pub description: String,
    pub image: Option<String>,
}

impl RecipeSummary {
    fn assemble(recipe: &Recipe, tags: Vec<Tag>, ingredients: Vec<Ingredient>) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title.clone(),
            time_minutes: recipe.time_minutes,
            price: recipe.price,
            link: recipe.link.clone(),
            tags,
            ingredients,
        }
    }
}

impl RecipeDetail {
    pub(crate) fn assemble(recipe: Recipe, tags: Vec<Tag>, ingredients: Vec<Ingredient>) -> Self {
        let summary = RecipeSummary::assemble(&recipe, tags, ingredients);
        Self {
            summary,
            description: recipe.description,
            image: recipe.image,
        }
    }

    pub fn id(&self) -> i64 {
        self.summary.id
    }
}

/// Groups `(recipe_id, entity)` pairs by recipe, keeping their order
fn group_by_recipe<T>(pairs: Vec<(i64, T)>) -> HashMap<i64, Vec<T>> {
    let mut grouped: HashMap<i64, Vec<T>> = HashMap::new();
    for (recipe_id, entity) in pairs {
        grouped.entry(recipe_id).or_default().push(entity);
    }
    grouped
}

/// Lists the owner's recipes, newest first
///
/// Nested entities are loaded with one query per kind, not per recipe.
pub async fn list_recipes(pool: &PgPool, user_id: Uuid) -> Result<Vec<RecipeSummary>, sqlx::Error> {
    let recipes = Recipe::list_owned(pool, user_id).await?;
    let ids: Vec<i64> = recipes.iter().map(|r| r.id).collect();

    let mut tags = group_by_recipe(named::for_recipes::<Tag, _>(pool, &ids).await?);
    let mut ingredients = group_by_recipe(named::for_recipes::<Ingredient, _>(pool, &ids).await?);

    Ok(recipes
        .iter()
        .map(|recipe| {
            RecipeSummary::assemble(
                recipe,
                tags.remove(&recipe.id).unwrap_or_default(),
                ingredients.remove(&recipe.id).unwrap_or_default(),
            )
        })
        .collect())
}

/// Loads one of the owner's recipes with its nested entities
///
/// Returns `None` for unknown ids and for recipes owned by someone else.
pub async fn get_recipe(
    pool: &PgPool,
    id: i64,
    user_id: Uuid,
) -> Result<Option<RecipeDetail>, sqlx::Error> {
    let Some(recipe) = Recipe::find_owned(pool, id, user_id).await? else {
        return Ok(None);
    };

    let tags = linked::<Tag, _>(pool, recipe.id).await?;
    let ingredients = linked::<Ingredient, _>(pool, recipe.id).await?;

    Ok(Some(RecipeDetail::assemble(recipe, tags, ingredients)))
}

/// Builds the detail view of a recipe row inside an open transaction
///
/// Used by the write path so the response reflects uncommitted links.
pub(crate) async fn load_detail(
    conn: &mut PgConnection,
    recipe: Recipe,
) -> Result<RecipeDetail, sqlx::Error> {
    let tags = linked::<Tag, _>(&mut *conn, recipe.id).await?;
    let ingredients = linked::<Ingredient, _>(&mut *conn, recipe.id).await?;

    Ok(RecipeDetail::assemble(recipe, tags, ingredients))
}

async fn linked<'e, T, E>(executor: E, recipe_id: i64) -> Result<Vec<T>, sqlx::Error>
where
    T: NamedEntity,
    E: sqlx::PgExecutor<'e>,
{
    let pairs = named::for_recipes::<T, E>(executor, &[recipe_id]).await?;
    Ok(pairs.into_iter().map(|(_, entity)| entity).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use std::str::FromStr;

    fn recipe() -> Recipe {
        Recipe {
            id: 3,
            user_id: Uuid::new_v4(),
            title: "Chocolate cheesecake".to_string(),
            time_minutes: 30,
            price: Decimal::from_str("5.00").unwrap(),
            link: String::new(),
            description: "Rich and creamy".to_string(),
            image: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_detail_serializes_flat_with_expanded_nested() {
        let owner = Uuid::new_v4();
        let detail = RecipeDetail::assemble(
            recipe(),
            vec![Tag::from_parts(1, owner, "Dessert".to_string())],
            vec![Ingredient::from_parts(2, owner, "Cream cheese".to_string())],
        );

        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 3,
                "title": "Chocolate cheesecake",
                "time_minutes": 30,
                "price": "5.00",
                "link": "",
                "tags": [{ "id": 1, "name": "Dessert" }],
                "ingredients": [{ "id": 2, "name": "Cream cheese" }],
                "description": "Rich and creamy",
                "image": null
            })
        );
    }

    #[test]
    fn test_summary_omits_long_form_fields() {
        let summary = RecipeSummary::assemble(&recipe(), vec![], vec![]);
        let value = serde_json::to_value(&summary).unwrap();

        assert!(value.get("description").is_none());
        assert!(value.get("image").is_none());
        assert_eq!(value["tags"], json!([]));
    }

    #[test]
    fn test_group_by_recipe_keeps_order() {
        let grouped = group_by_recipe(vec![(1, "a"), (2, "b"), (1, "c")]);
        assert_eq!(grouped[&1], vec!["a", "c"]);
        assert_eq!(grouped[&2], vec!["b"]);
    }
}
