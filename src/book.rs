use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::duration::extract_duration;
use crate::model::Recipe;

/// The user's saved recipes, kept by value in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeBook {
    recipes: Vec<Recipe>,
}

/// Criteria for browsing recipes. Empty fields match everything.
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    /// Case-insensitive text matched against name, description and ingredient names
    pub query: Option<String>,
    pub tag: Option<String>,
    pub difficulty: Option<String>,
    /// Upper bound on the cook time. Recipes without a readable cook time pass.
    pub max_minutes: Option<u64>,
}

impl RecipeFilter {
    pub fn matches(&self, recipe: &Recipe) -> bool {
        if let Some(query) = non_blank(&self.query) {
            let query = query.to_lowercase();
            let hit = recipe.name.to_lowercase().contains(&query)
                || recipe.description.to_lowercase().contains(&query)
                || recipe
                    .ingredients
                    .iter()
                    .any(|i| i.name.to_lowercase().contains(&query));
            if !hit {
                return false;
            }
        }
        if let Some(tag) = non_blank(&self.tag) {
            if !recipe.has_tag(tag) {
                return false;
            }
        }
        if let Some(difficulty) = non_blank(&self.difficulty) {
            if !recipe.matches_difficulty(difficulty) {
                return false;
            }
        }
        if let Some(max_minutes) = self.max_minutes {
            if let Some(seconds) = extract_duration(&recipe.cook_time) {
                if seconds > max_minutes.saturating_mul(60) {
                    return false;
                }
            }
        }
        true
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Recipes from `recipes` that pass `filter`, in their original order.
pub fn filter_recipes<'a>(recipes: &'a [Recipe], filter: &RecipeFilter) -> Vec<&'a Recipe> {
    recipes.iter().filter(|r| filter.matches(r)).collect()
}

/// Every tag used across `recipes`, lowercased and sorted.
pub fn all_tags<'a>(recipes: impl IntoIterator<Item = &'a Recipe>) -> BTreeSet<String> {
    recipes
        .into_iter()
        .flat_map(|r| r.tags.iter())
        .map(|t| t.to_lowercase())
        .collect()
}

impl RecipeBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a copy of `recipe`. A saved recipe with the same name
    /// (ignoring case) is replaced. Returns true if it was new.
    pub fn save(&mut self, recipe: Recipe) -> bool {
        match self.position(&recipe.name) {
            Some(index) => {
                self.recipes[index] = recipe;
                false
            }
            None => {
                self.recipes.push(recipe);
                true
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Recipe> {
        self.position(name).map(|index| self.recipes.remove(index))
    }

    pub fn get(&self, name: &str) -> Option<&Recipe> {
        self.position(name).map(|index| &self.recipes[index])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.iter()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn filter(&self, filter: &RecipeFilter) -> Vec<&Recipe> {
        filter_recipes(&self.recipes, filter)
    }

    pub fn tags(&self) -> BTreeSet<String> {
        all_tags(&self.recipes)
    }

    fn position(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.recipes
            .iter()
            .position(|r| r.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Ingredient;

    fn recipe(name: &str, tags: &[&str], difficulty: &str, cook_time: &str) -> Recipe {
        Recipe {
            name: name.to_string(),
            difficulty: difficulty.to_string(),
            cook_time: cook_time.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_save_replaces_same_name() {
        let mut book = RecipeBook::new();
        assert!(book.save(recipe("Pad Thai", &[], "Medium", "")));
        assert!(!book.save(recipe("pad thai", &["noodles"], "Easy", "")));
        assert_eq!(book.len(), 1);
        assert!(book.get("PAD THAI").unwrap().has_tag("noodles"));
    }

    #[test]
    fn test_remove() {
        let mut book = RecipeBook::new();
        book.save(recipe("Chili", &[], "", ""));
        assert!(book.remove("chili").is_some());
        assert!(book.remove("chili").is_none());
        assert!(book.is_empty());
    }

    #[test]
    fn test_saved_copy_is_independent() {
        let mut original = recipe("Soup", &[], "", "");
        let mut book = RecipeBook::new();
        book.save(original.clone());
        original.description = "changed".to_string();
        assert_eq!(book.get("Soup").unwrap().description, "");
    }

    #[test]
    fn test_filter_by_query_tag_difficulty() {
        let mut book = RecipeBook::new();
        let mut curry = recipe("Green Curry", &["Thai", "spicy"], "Medium", "30 mins");
        curry.ingredients.push(Ingredient::new("Coconut Milk", "400 ml"));
        book.save(curry);
        book.save(recipe("Pancakes", &["breakfast"], "Easy", "15 mins"));

        let by_ingredient = RecipeFilter {
            query: Some("coconut".to_string()),
            ..Default::default()
        };
        assert_eq!(book.filter(&by_ingredient).len(), 1);

        let by_tag = RecipeFilter {
            tag: Some("thai".to_string()),
            difficulty: Some("medium".to_string()),
            ..Default::default()
        };
        assert_eq!(book.filter(&by_tag)[0].name, "Green Curry");

        let wrong_difficulty = RecipeFilter {
            tag: Some("breakfast".to_string()),
            difficulty: Some("Hard".to_string()),
            ..Default::default()
        };
        assert!(book.filter(&wrong_difficulty).is_empty());
    }

    #[test]
    fn test_filter_by_max_minutes() {
        let recipes = vec![
            recipe("Stew", &[], "", "2 hours"),
            recipe("Salad", &[], "", "10 mins"),
            recipe("Mystery", &[], "", "varies"),
        ];
        let quick = RecipeFilter {
            max_minutes: Some(30),
            ..Default::default()
        };
        let names: Vec<&str> = filter_recipes(&recipes, &quick)
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["Salad", "Mystery"]);

        let unbounded = RecipeFilter {
            max_minutes: Some(u64::MAX),
            ..Default::default()
        };
        assert_eq!(filter_recipes(&recipes, &unbounded).len(), 3);
    }

    #[test]
    fn test_blank_filter_matches_all() {
        let recipes = vec![recipe("A", &[], "", ""), recipe("B", &[], "", "")];
        let filter = RecipeFilter {
            query: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_recipes(&recipes, &filter).len(), 2);
    }

    #[test]
    fn test_all_tags() {
        let recipes = vec![
            recipe("A", &["Vegan", "quick"], "", ""),
            recipe("B", &["vegan"], "", ""),
        ];
        let tags: Vec<String> = all_tags(&recipes).into_iter().collect();
        assert_eq!(tags, vec!["quick", "vegan"]);
    }
}
