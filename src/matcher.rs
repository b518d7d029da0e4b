use crate::model::Ingredient;

/// Shorter name tokens ("oil", "egg") are too generic to match on their own.
const MIN_TOKEN_CHARS: usize = 4;

/// Return the ingredients a step refers to, paired with their position in
/// `ingredients`.
///
/// Matching is case-insensitive: an ingredient is referenced when its full
/// name appears in the step, or when any word of the name (split on
/// whitespace and hyphens) of at least four characters does. This is loose
/// on purpose and will over-match generic words.
///
/// Positions are stable so checklist state keyed by `(step, index)` stays
/// valid between calls.
///
/// # Example
/// ```
/// use recipe_assistant::{ingredients_for_step, Ingredient};
///
/// let ingredients = vec![
///     Ingredient::new("Chicken Breast", "2"),
///     Ingredient::new("Salt", "1 tsp"),
/// ];
/// let matched = ingredients_for_step("Season the chicken with salt", &ingredients);
/// assert_eq!(matched.len(), 2);
/// ```
pub fn ingredients_for_step<'a>(
    step: &str,
    ingredients: &'a [Ingredient],
) -> Vec<(usize, &'a Ingredient)> {
    let step = step.to_lowercase();
    ingredients
        .iter()
        .enumerate()
        .filter(|(_, ingredient)| is_referenced(&step, &ingredient.name))
        .collect()
}

fn is_referenced(step_lower: &str, name: &str) -> bool {
    let name = name.trim().to_lowercase();
    if name.is_empty() {
        return false;
    }
    if step_lower.contains(&name) {
        return true;
    }
    name.split(|c: char| c.is_whitespace() || c == '-')
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
        .any(|token| step_lower.contains(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pantry() -> Vec<Ingredient> {
        vec![
            Ingredient::new("Chicken Breast", "500 g"),
            Ingredient::new("Salt", "1 tsp"),
        ]
    }

    #[test]
    fn test_matches_by_token_and_full_name() {
        let ingredients = pantry();
        let matched = ingredients_for_step("Season the chicken with salt", &ingredients);
        let indices: Vec<usize> = matched.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn test_no_match() {
        let ingredients = pantry();
        assert!(ingredients_for_step("Add the broth,", &ingredients).is_empty());
    }

    #[test]
    fn test_short_tokens_ignored() {
        let ingredients = vec![Ingredient::new("Olive Oil", "2 tbsp")];
        assert!(ingredients_for_step("Boil the water", &ingredients).is_empty());
        assert_eq!(ingredients_for_step("Drizzle with olive oil", &ingredients).len(), 1);
    }

    #[test]
    fn test_hyphenated_names_split() {
        let ingredients = vec![Ingredient::new("Sun-dried Tomatoes", "50 g")];
        let matched = ingredients_for_step("Stir in the tomatoes", &ingredients);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].0, 0);
    }

    #[test]
    fn test_loose_matching_over_matches_substrings() {
        // "rice" is found inside "price"; accepted imprecision
        let ingredients = vec![Ingredient::new("Basmati Rice", "1 cup")];
        assert_eq!(ingredients_for_step("Check the price tag", &ingredients).len(), 1);
    }

    #[test]
    fn test_order_follows_ingredient_list() {
        let ingredients = vec![
            Ingredient::new("Garlic", "2 cloves"),
            Ingredient::new("Butter", "30 g"),
            Ingredient::new("Parsley", "a handful"),
        ];
        let matched = ingredients_for_step("Add parsley, then garlic", &ingredients);
        let indices: Vec<usize> = matched.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn test_empty_name_never_matches() {
        let ingredients = vec![Ingredient::new("  ", "1")];
        assert!(ingredients_for_step("anything at all", &ingredients).is_empty());
    }
}
