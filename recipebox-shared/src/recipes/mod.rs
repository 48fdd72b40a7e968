/// Recipe aggregate operations
///
/// The recipe is the aggregate root: its tags and ingredients are written
/// through it, with get-or-create semantics for names the owner hasn't used
/// before.
///
/// # Modules
///
/// - `payload`: Request bodies, field presence and validation
/// - `reconcile`: Get-or-create and linking of nested entities
/// - `write`: Transactional create, update and delete
/// - `read`: List and detail views
///
/// # Example
///
/// ```no_run
/// use recipebox_shared::recipes::{create_recipe, NameRecord, RecipePayload};
/// use rust_decimal::Decimal;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let payload = RecipePayload {
///     title: Some("Avocado lime cheesecake".to_string()),
///     time_minutes: Some(60),
///     price: Some(Decimal::new(2000, 2)),
///     tags: Some(vec![NameRecord::named("Vegan"), NameRecord::named("Dessert")]),
///     ..Default::default()
/// };
///
/// let recipe = create_recipe(&pool, user_id, payload).await?;
/// assert_eq!(recipe.summary.tags.len(), 2);
/// # Ok(())
/// # }
/// ```

pub mod payload;
pub mod read;
pub mod reconcile;
pub mod write;

pub use payload::{FieldError, NameRecord, RecipePayload, WriteMode};
pub use read::{get_recipe, list_recipes, RecipeDetail, RecipeSummary};
pub use write::{create_recipe, delete_recipe, update_recipe, RecipeError};
