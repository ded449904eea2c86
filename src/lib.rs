pub mod core;

// Re-export commonly used types
pub use crate::core::collaborators::{IngredientLedger, Pantry, ToolRegistry, ToolShed};
pub use crate::core::config::StallConfig;
pub use crate::core::events::{StallEvent, Topic};
pub use crate::core::recipe::{CookingStep, IngredientUse, Recipe, RecipeBook};
pub use crate::core::shift_clock::ShiftState;
pub use crate::core::stall::StallEngine;
