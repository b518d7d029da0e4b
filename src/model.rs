use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

use crate::scaling::parse_leading_quantity;

/// Base serving count assumed when a recipe does not state one.
pub const DEFAULT_SERVINGS: u32 = 2;

/// A generated or saved recipe.
///
/// The serialized shape (camelCase keys) is shared by the generation
/// providers' JSON output and the persisted user data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub calories: String,
    #[serde(default)]
    pub prep_time: String,
    #[serde(default)]
    pub cook_time: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default = "default_servings", deserialize_with = "lenient_servings")]
    pub servings: u32,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<Nutrition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drink_pairing: Option<String>,
}

/// One ingredient line. `amount` is free text ("200 g", "a pinch").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub amount: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nutrition {
    #[serde(default)]
    pub protein: String,
    #[serde(default)]
    pub carbs: String,
    #[serde(default)]
    pub fat: String,
}

fn default_servings() -> u32 {
    DEFAULT_SERVINGS
}

/// Providers send servings as `4`, `4.0`, `"4"` or `"4 people"`. Anything
/// without a positive count falls back to the default.
fn lenient_servings<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let count = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_leading_quantity(s).map(|(v, _)| v),
        _ => None,
    };
    Ok(count
        .map(f64::round)
        .filter(|c| *c >= 1.0 && *c <= f64::from(u32::MAX))
        .map_or(DEFAULT_SERVINGS, |c| c as u32))
}

impl Ingredient {
    pub fn new(name: impl Into<String>, amount: impl Into<String>) -> Self {
        Ingredient {
            name: name.into(),
            amount: amount.into(),
        }
    }
}

impl Default for Recipe {
    fn default() -> Self {
        Recipe {
            name: String::new(),
            description: String::new(),
            calories: String::new(),
            prep_time: String::new(),
            cook_time: String::new(),
            difficulty: String::new(),
            servings: DEFAULT_SERVINGS,
            ingredients: Vec::new(),
            steps: Vec::new(),
            tags: BTreeSet::new(),
            nutrition: None,
            drink_pairing: None,
        }
    }
}

impl Recipe {
    /// Tidy a recipe as received from a provider: trim text fields, drop
    /// blank steps and ingredients, and replace a zero serving count with
    /// the default.
    pub fn normalize(mut self) -> Self {
        self.name = self.name.trim().to_string();
        if self.servings == 0 {
            self.servings = DEFAULT_SERVINGS;
        }
        self.ingredients.retain(|i| !i.name.trim().is_empty());
        for ingredient in &mut self.ingredients {
            ingredient.name = ingredient.name.trim().to_string();
            ingredient.amount = ingredient.amount.trim().to_string();
        }
        self.steps = self
            .steps
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        self.tags = self
            .tags
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        self.drink_pairing = self
            .drink_pairing
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        self
    }

    pub fn matches_difficulty(&self, difficulty: &str) -> bool {
        self.difficulty.eq_ignore_ascii_case(difficulty.trim())
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.trim();
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}
