use super::types::{CustomerId, OrderId, RecipeId, Seconds};
use uuid::Uuid;

/// Lifecycle of a customer, from arrival to departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerState {
    /// In a display slot (or the background queue), order unfilled.
    Waiting,
    /// A matching dish was delivered; payment/evaluation pending.
    Served,
    /// Timed out and left unserved.
    Left,
    /// Paid and evaluated; ready to be removed.
    Completed,
}

/// One recipe demand, created atomically with its customer, 1:1.
/// Immutable after creation except `is_completed` and the derived
/// `is_priority` mirror.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub recipe_id: RecipeId,
    pub created_at: Seconds,
    pub max_wait: Seconds,
    pub is_completed: bool,
    pub is_priority: bool,
}

#[derive(Debug, Clone)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub order: Order,
    pub state: CustomerState,
    /// Seconds of patience left; decremented while Waiting in a slot.
    pub wait_remaining: Seconds,
    /// True only for the slot-0 occupant of the displayed set.
    pub is_priority: bool,
}

impl Customer {
    /// Create a customer together with their order.
    pub fn new(name: String, recipe_id: RecipeId, max_wait: Seconds, now: Seconds) -> Self {
        let customer_id = Uuid::new_v4().to_string();
        let order = Order {
            id: Uuid::new_v4().to_string(),
            customer_id: customer_id.clone(),
            recipe_id,
            created_at: now,
            max_wait,
            is_completed: false,
            is_priority: false,
        };
        Self {
            id: customer_id,
            name,
            order,
            state: CustomerState::Waiting,
            wait_remaining: max_wait,
            is_priority: false,
        }
    }

    pub fn is_waiting(&self) -> bool {
        self.state == CustomerState::Waiting
    }

    /// Set the priority flag, mirrored onto the order.
    pub fn set_priority(&mut self, priority: bool) {
        self.is_priority = priority;
        self.order.is_priority = priority;
    }
}
