pub mod book;
pub mod config;
pub mod cook;
pub mod duration;
pub mod error;
pub mod generator;
pub mod matcher;
pub mod model;
pub mod plan;
pub mod providers;
pub mod scaling;
pub mod storage;

// Re-export commonly used types
pub use book::{filter_recipes, RecipeBook, RecipeFilter};
pub use cook::{CookSession, Narrator, Ticker, Timer};
pub use duration::extract_duration;
pub use error::AssistantError;
pub use generator::{parse_recipes, ProviderKind, RecipeGenerator, RecipeGeneratorBuilder};
pub use matcher::ingredients_for_step;
pub use model::{Ingredient, Nutrition, Recipe};
pub use plan::{Meal, MealPlan, Weekday};
pub use scaling::{scale_amount, scale_recipe};
pub use storage::{JsonFileStore, MemoryStore, Store, Theme, UserData};

/// Generate recipes from a list of available ingredients using the
/// configured provider.
///
/// # Arguments
/// * `ingredients` - What the user has on hand
///
/// # Returns
/// The proposed recipes
///
/// # Example
/// ```no_run
/// use recipe_assistant::generate_recipes;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let recipes = generate_recipes(&["chicken", "lemon", "thyme"]).await?;
/// for recipe in &recipes {
///     println!("{}", recipe.name);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn generate_recipes(ingredients: &[&str]) -> Result<Vec<Recipe>, AssistantError> {
    RecipeGenerator::builder()
        .ingredients(ingredients.iter().copied())
        .build()
        .await
}

/// Generate recipes with an explicit provider.
///
/// # Arguments
/// * `ingredients` - What the user has on hand
/// * `provider` - Which backend to ask
/// * `api_key` - Key for the provider, overriding config and environment
pub async fn generate_recipes_with_provider(
    ingredients: &[&str],
    provider: ProviderKind,
    api_key: Option<String>,
) -> Result<Vec<Recipe>, AssistantError> {
    let mut builder = RecipeGenerator::builder()
        .ingredients(ingredients.iter().copied())
        .provider(provider);
    if let Some(key) = api_key {
        builder = builder.api_key(key);
    }
    builder.build().await
}
