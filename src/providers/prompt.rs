/// The system prompt used for generating recipes from a list of ingredients.
///
/// It describes the JSON shape the response must follow, which is the same
/// shape [`Recipe`](crate::Recipe) deserializes from.
///
/// The prompt is loaded from `prompt.txt` at compile time using the
/// `include_str!` macro, making it easy to edit without dealing with
/// Rust string syntax.
pub const RECIPE_GENERATION_PROMPT: &str = include_str!("prompt.txt");

/// Optional steering for a generation request
#[derive(Debug, Clone, Default)]
pub struct Preferences {
    pub cuisine: Option<String>,
    pub diet: Option<String>,
    /// Number of recipes to ask for
    pub count: Option<u32>,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Build the user message listing the available ingredients and any preferences.
pub fn build_generation_prompt(ingredients: &[String], preferences: &Preferences) -> String {
    let mut prompt = format!(
        "Ingredients I have: {}.",
        ingredients
            .iter()
            .map(|i| i.trim())
            .filter(|i| !i.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let count = preferences.count.unwrap_or(3).max(1);
    prompt.push_str(&format!("\nSuggest {} recipes.", count));

    if let Some(cuisine) = non_blank(preferences.cuisine.as_ref()) {
        prompt.push_str(&format!("\nCuisine: {}.", cuisine));
    }
    if let Some(diet) = non_blank(preferences.diet.as_ref()) {
        prompt.push_str(&format!(
            "\nEvery recipe must be suitable for this diet: {}.",
            diet
        ));
    }

    prompt
}
