use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::Recipe;
use crate::AssistantError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = AssistantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        Weekday::ALL
            .into_iter()
            .find(|day| day.as_str() == s || (s.len() >= 3 && day.as_str().starts_with(&s)))
            .ok_or_else(|| AssistantError::ParseError(format!("Unknown day: {}", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Meal {
    Breakfast,
    Lunch,
    Dinner,
}

impl Meal {
    pub const ALL: [Meal; 3] = [Meal::Breakfast, Meal::Lunch, Meal::Dinner];

    pub fn as_str(&self) -> &'static str {
        match self {
            Meal::Breakfast => "breakfast",
            Meal::Lunch => "lunch",
            Meal::Dinner => "dinner",
        }
    }
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Meal {
    type Err = AssistantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        Meal::ALL
            .into_iter()
            .find(|meal| meal.as_str() == s)
            .ok_or_else(|| AssistantError::ParseError(format!("Unknown meal: {}", s)))
    }
}

/// One week of planned meals. Each (day, meal) slot holds a copy of a recipe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MealPlan {
    #[serde(default)]
    slots: BTreeMap<Weekday, BTreeMap<Meal, Recipe>>,
}

/// Ingredient totals for the planned week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingItem {
    pub name: String,
    /// Distinct amounts as written in the recipes that use it
    pub amounts: Vec<String>,
}

impl MealPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `recipe` in a slot, returning whatever was there before.
    pub fn assign(&mut self, day: Weekday, meal: Meal, recipe: Recipe) -> Option<Recipe> {
        self.slots.entry(day).or_default().insert(meal, recipe)
    }

    pub fn unassign(&mut self, day: Weekday, meal: Meal) -> Option<Recipe> {
        let meals = self.slots.get_mut(&day)?;
        let removed = meals.remove(&meal);
        if meals.is_empty() {
            self.slots.remove(&day);
        }
        removed
    }

    pub fn get(&self, day: Weekday, meal: Meal) -> Option<&Recipe> {
        self.slots.get(&day)?.get(&meal)
    }

    /// Planned meals for one day, breakfast first.
    pub fn day(&self, day: Weekday) -> Vec<(Meal, &Recipe)> {
        self.slots
            .get(&day)
            .map(|meals| meals.iter().map(|(meal, recipe)| (*meal, recipe)).collect())
            .unwrap_or_default()
    }

    /// Remove `name` from every slot. Returns how many slots were cleared.
    pub fn remove_recipe(&mut self, name: &str) -> usize {
        let name = name.trim();
        let mut removed = 0;
        for meals in self.slots.values_mut() {
            let before = meals.len();
            meals.retain(|_, recipe| !recipe.name.eq_ignore_ascii_case(name));
            removed += before - meals.len();
        }
        self.slots.retain(|_, meals| !meals.is_empty());
        removed
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Number of filled slots.
    pub fn len(&self) -> usize {
        self.slots.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Merge ingredients across the week by name (ignoring case), in the
    /// order they are first planned.
    pub fn shopping_list(&self) -> Vec<ShoppingItem> {
        let mut items: Vec<ShoppingItem> = Vec::new();
        let recipes = self.slots.values().flat_map(|meals| meals.values());
        for ingredient in recipes.flat_map(|r| r.ingredients.iter()) {
            let amount = ingredient.amount.trim();
            let existing = items
                .iter()
                .position(|item| item.name.eq_ignore_ascii_case(&ingredient.name));
            let index = match existing {
                Some(index) => index,
                None => {
                    items.push(ShoppingItem {
                        name: ingredient.name.clone(),
                        amounts: Vec::new(),
                    });
                    items.len() - 1
                }
            };
            let item = &mut items[index];
            if !amount.is_empty() && !item.amounts.iter().any(|a| a == amount) {
                item.amounts.push(amount.to_string());
            }
        }
        items
    }
}
