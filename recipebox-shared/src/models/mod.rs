/// Database models for RecipeBox
///
/// # Models
///
/// - `user`: User accounts
/// - `recipe`: Recipes, the aggregate root
/// - `tag`, `ingredient`: Per-user named entities linked to recipes
/// - `named`: Queries shared by tags and ingredients
///
/// # Example
///
/// ```no_run
/// use recipebox_shared::models::{named, tag::Tag};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
/// let tags: Vec<Tag> = named::list_for_owner(&pool, user_id).await?;
/// # Ok(())
/// # }
/// ```

pub mod ingredient;
pub mod named;
pub mod recipe;
pub mod tag;
pub mod user;
