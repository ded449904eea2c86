use super::events::StallEvent;
use super::types::{DishId, RecipeId, Seconds};
use log::{debug, info};
use std::collections::VecDeque;
use uuid::Uuid;

/// A finished dish emitted by the cooking pipeline, owned by storage
/// until served or cleared.
#[derive(Debug, Clone, PartialEq)]
pub struct Dish {
    pub id: DishId,
    pub recipe_id: RecipeId,
    /// Quality score in [0, 100].
    pub score: f64,
    pub created_at: Seconds,
    pub is_served: bool,
}

impl Dish {
    pub fn new(recipe_id: RecipeId, score: f64, created_at: Seconds) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            recipe_id,
            score,
            created_at,
            is_served: false,
        }
    }
}

/// FIFO queue decoupling cooking completion from serving.
///
/// Dishes leave in arrival order only; `take_next` is the single
/// consumer operation and never hands out the same dish twice.
pub struct DishStorage {
    queue: VecDeque<Dish>,
}

impl DishStorage {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Append a dish to the tail. No capacity limit.
    pub fn store(&mut self, dish: Dish) -> StallEvent {
        debug!(
            "[DishStorage] Stored dish {} ({}), {} in queue",
            dish.id,
            dish.recipe_id,
            self.queue.len() + 1
        );
        let event = StallEvent::DishStored {
            dish_id: dish.id.clone(),
            recipe_id: dish.recipe_id.clone(),
        };
        self.queue.push_back(dish);
        event
    }

    /// Pop the oldest dish, marked served. None when empty.
    pub fn take_next(&mut self) -> Option<Dish> {
        self.queue.pop_front().map(|mut dish| {
            dish.is_served = true;
            dish
        })
    }

    /// Return an unconsumed dish to the head of the queue, preserving
    /// arrival order. Used when a serve attempt fails to match.
    pub fn put_back(&mut self, mut dish: Dish) {
        dish.is_served = false;
        self.queue.push_front(dish);
    }

    /// Empty the queue at shift close.
    pub fn clear(&mut self) -> StallEvent {
        let discarded = self.queue.len();
        if discarded > 0 {
            info!("[DishStorage] Cleared {} unserved dishes", discarded);
        }
        self.queue.clear();
        StallEvent::DishStorageCleared { discarded }
    }

    pub fn peek(&self) -> Option<&Dish> {
        self.queue.front()
    }

    /// Whether the *next* dish to come out matches the recipe. Serving
    /// is strictly FIFO, so only the head is consulted.
    pub fn has_dish_for(&self, recipe_id: &str) -> bool {
        self.queue
            .front()
            .map_or(false, |dish| dish.recipe_id == recipe_id)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Default for DishStorage {
    fn default() -> Self {
        Self::new()
    }
}
