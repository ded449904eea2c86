use super::customer::{Customer, CustomerState};
use super::dish_storage::Dish;
use super::errors::ServeError;

/// Binds a customer's order to a served dish.
///
/// The matching rule is exact recipe-id equality; there is no partial
/// credit and no substitution.
pub struct OrderMatcher;

impl OrderMatcher {
    /// Whether the dish satisfies the customer's order.
    pub fn matches(customer: &Customer, dish: &Dish) -> bool {
        customer.order.recipe_id == dish.recipe_id
    }

    /// Attempt to fill the customer's order with the dish.
    ///
    /// Fails when the customer is not awaiting service. Returns the
    /// match result otherwise; on a match the order is completed and the
    /// customer transitions to Served. On a mismatch nothing changes,
    /// and the caller decides what to do with the dish.
    pub fn serve_dish(customer: &mut Customer, dish: &Dish) -> Result<bool, ServeError> {
        if customer.state != CustomerState::Waiting {
            return Err(ServeError::NotAwaitingService);
        }
        if !Self::matches(customer, dish) {
            return Ok(false);
        }
        customer.order.is_completed = true;
        customer.state = CustomerState::Served;
        Ok(true)
    }
}
