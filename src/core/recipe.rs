use super::types::{IngredientId, Money, RecipeId, Seconds, ToolId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Quantity of one ingredient consumed by a step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientUse {
    pub ingredient_id: IngredientId,
    pub quantity: u32,
}

/// One atomic cooking action: gated by a required tool, takes a fixed
/// duration unless the tool shortcut completes it early.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookingStep {
    pub name: String,
    pub tool_id: ToolId,
    pub ingredients: Vec<IngredientUse>,
    pub duration: Seconds,
}

/// Static recipe configuration. Never mutated at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    pub price: Money,
    pub steps: Vec<CookingStep>,
    /// Weight of the finished dish, in grams.
    pub dish_weight: f64,
}

impl Recipe {
    /// Total ingredient demand summed across all steps.
    pub fn total_ingredients(&self) -> HashMap<IngredientId, u32> {
        let mut totals: HashMap<IngredientId, u32> = HashMap::new();
        for step in &self.steps {
            for use_ in &step.ingredients {
                *totals.entry(use_.ingredient_id.clone()).or_insert(0) += use_.quantity;
            }
        }
        totals
    }

    /// Sum of all step durations, the timer-only cooking time.
    pub fn total_duration(&self) -> Seconds {
        self.steps.iter().map(|s| s.duration).sum()
    }
}

/// Lookup store for the stall's known recipes.
pub struct RecipeBook {
    recipes: HashMap<RecipeId, Recipe>,
}

impl RecipeBook {
    pub fn new() -> Self {
        Self {
            recipes: HashMap::new(),
        }
    }

    pub fn from_recipes(recipes: Vec<Recipe>) -> Self {
        let mut book = Self::new();
        for recipe in recipes {
            book.insert(recipe);
        }
        book
    }

    /// Register a recipe, replacing any previous one under the same id.
    pub fn insert(&mut self, recipe: Recipe) {
        self.recipes.insert(recipe.id.clone(), recipe);
    }

    pub fn get(&self, id: &str) -> Option<&Recipe> {
        self.recipes.get(id)
    }

    pub fn ids(&self) -> Vec<RecipeId> {
        self.recipes.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

impl Default for RecipeBook {
    fn default() -> Self {
        Self::new()
    }
}
