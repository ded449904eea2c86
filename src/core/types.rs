/// Unique identifier for a customer instance (UUID v4 string).
pub type CustomerId = String;
/// Unique identifier for an order instance (UUID v4 string).
pub type OrderId = String;
/// Unique identifier for a finished dish (UUID v4 string).
pub type DishId = String;
/// Configuration key of a recipe (e.g. "egg_fry").
pub type RecipeId = String;
/// Configuration key of a kitchen tool (e.g. "wok").
pub type ToolId = String;
/// Configuration key of an ingredient (e.g. "egg").
pub type IngredientId = String;

/// Simulated time in seconds. Advanced only by the external tick driver.
pub type Seconds = f64;
/// Money amounts, in whole gold units.
pub type Money = i64;
/// One-based business day counter.
pub type Day = u32;
