use super::customer::Order;
use super::evaluation::Review;
use super::ledger::DaySummary;
use super::shift_clock::ShiftState;
use super::types::{CustomerId, Day, DishId, Money, RecipeId};

/// Named topic a subscriber attaches to. Every [`StallEvent`] variant
/// maps to exactly one topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    ShiftStateChanged,
    OrderCreated,
    CustomerLeft,
    QueueCountUpdated,
    DishStored,
    DishStorageCleared,
    CustomerPaid,
    GoldChanged,
    EvaluationCompleted,
    DayAdvanced,
}

/// Closed set of events flowing over the [`EventBus`](super::event_bus::EventBus).
///
/// One tagged union instead of opaque per-topic payloads, so
/// subscribers match on variants rather than downcasting.
#[derive(Debug, Clone)]
pub enum StallEvent {
    /// The global phase state machine moved.
    ShiftStateChanged { from: ShiftState, to: ShiftState },
    /// A customer spawned and their order was created with them.
    OrderCreated(Order),
    /// A waiting customer ran out of patience and left unserved.
    CustomerLeft { customer_id: CustomerId },
    /// Displayed or waiting counts changed.
    QueueCountUpdated { displayed: usize, waiting: usize },
    /// A finished dish entered storage.
    DishStored { dish_id: DishId, recipe_id: RecipeId },
    /// Storage was emptied at shift close.
    DishStorageCleared { discarded: usize },
    /// A served customer paid for their dish.
    CustomerPaid { customer_id: CustomerId, amount: Money },
    /// The stall's running gold total changed.
    GoldChanged { total: Money },
    /// A served dish was classified into a review.
    EvaluationCompleted {
        customer_id: CustomerId,
        review: Review,
        score: f64,
    },
    /// The day rollup completed and the day counter advanced.
    DayAdvanced { day: Day, summary: DaySummary },
}

impl StallEvent {
    /// The topic this event is published under.
    pub fn topic(&self) -> Topic {
        match self {
            StallEvent::ShiftStateChanged { .. } => Topic::ShiftStateChanged,
            StallEvent::OrderCreated(_) => Topic::OrderCreated,
            StallEvent::CustomerLeft { .. } => Topic::CustomerLeft,
            StallEvent::QueueCountUpdated { .. } => Topic::QueueCountUpdated,
            StallEvent::DishStored { .. } => Topic::DishStored,
            StallEvent::DishStorageCleared { .. } => Topic::DishStorageCleared,
            StallEvent::CustomerPaid { .. } => Topic::CustomerPaid,
            StallEvent::GoldChanged { .. } => Topic::GoldChanged,
            StallEvent::EvaluationCompleted { .. } => Topic::EvaluationCompleted,
            StallEvent::DayAdvanced { .. } => Topic::DayAdvanced,
        }
    }
}
