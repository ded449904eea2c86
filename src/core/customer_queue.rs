use super::config::QueueConfig;
use super::customer::{Customer, CustomerState};
use super::events::StallEvent;
use super::types::{RecipeId, Seconds};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::VecDeque;

/// Bounded on-stage display slots plus an unbounded background queue.
///
/// Invariants: the displayed set never exceeds its capacity; the slot-0
/// occupant (and only it) carries the priority flag; whenever a slot
/// frees, the oldest waiting customer is promoted before anything else
/// observes the queue.
pub struct CustomerQueue {
    displayed: Vec<Customer>,
    waiting: VecDeque<Customer>,
    max_displayed: usize,
    recipe_pool: Vec<RecipeId>,
    spawn_interval: (Seconds, Seconds),
    default_wait: Seconds,
    next_spawn_at: Seconds,
    rng: StdRng,
    spawn_serial: u64,
}

impl CustomerQueue {
    pub fn new(config: &QueueConfig, recipe_pool: Vec<RecipeId>, rng: StdRng) -> Self {
        Self {
            displayed: Vec::with_capacity(config.max_display_customers),
            waiting: VecDeque::new(),
            max_displayed: config.max_display_customers,
            recipe_pool,
            spawn_interval: (
                config.spawn_interval_min_secs,
                config.spawn_interval_max_secs,
            ),
            default_wait: config.customer_wait_secs,
            next_spawn_at: 0.0,
            rng,
            spawn_serial: 0,
        }
    }

    /// Age displayed customers, process timeouts, then consider an
    /// automatic spawn. `spawning_open` gates spawning to the selling
    /// window; timeout processing always runs so lingering customers
    /// drain even after close.
    pub fn tick(
        &mut self,
        now: Seconds,
        elapsed: Seconds,
        spawning_open: bool,
    ) -> Vec<StallEvent> {
        let mut events = Vec::new();

        for customer in self.displayed.iter_mut() {
            if customer.is_waiting() {
                customer.wait_remaining -= elapsed;
            }
        }

        // Remove timed-out customers one at a time; each removal promotes
        // and re-derives priority before the next is considered, so the
        // slot-0 invariant holds at every intermediate point.
        loop {
            let timed_out = self
                .displayed
                .iter()
                .position(|c| c.is_waiting() && c.wait_remaining <= 0.0);
            let index = match timed_out {
                Some(index) => index,
                None => break,
            };

            let mut customer = self.displayed.remove(index);
            customer.state = CustomerState::Left;
            info!(
                "[CustomerQueue] {} left unserved (order {})",
                customer.name, customer.order.recipe_id
            );
            events.push(StallEvent::CustomerLeft {
                customer_id: customer.id,
            });
            self.promote_one();
            self.reassign_priority();
            events.push(self.count_event());
        }

        if spawning_open
            && now >= self.next_spawn_at
            && self.displayed.len() < self.max_displayed
        {
            events.extend(self.spawn(now));
        }

        events
    }

    /// Create a customer/order pair and enqueue it: into a display slot
    /// when one is free, otherwise the background queue. A spawn with no
    /// recipes configured is a logged no-op.
    pub fn spawn(&mut self, now: Seconds) -> Vec<StallEvent> {
        if self.recipe_pool.is_empty() {
            warn!("[CustomerQueue] Spawn skipped: no recipes configured");
            return Vec::new();
        }

        let recipe_id = self.recipe_pool[self.rng.gen_range(0..self.recipe_pool.len())].clone();
        self.spawn_serial += 1;
        let name = format!("guest-{:03}", self.spawn_serial);
        let mut customer = Customer::new(name, recipe_id, self.default_wait, now);
        debug!(
            "[CustomerQueue] {} arrived wanting '{}'",
            customer.name, customer.order.recipe_id
        );

        let to_display = self.displayed.len() < self.max_displayed;
        if to_display {
            // Priority goes to the arrival that fills an empty stage.
            customer.set_priority(self.displayed.is_empty());
        }
        let order = customer.order.clone();
        if to_display {
            self.displayed.push(customer);
        } else {
            self.waiting.push_back(customer);
        }

        let (min, max) = self.spawn_interval;
        self.next_spawn_at = now + self.rng.gen_range(min..=max);

        vec![StallEvent::OrderCreated(order), self.count_event()]
    }

    /// Remove the customer in a display slot (after completion),
    /// promoting from the background queue into the freed slot.
    pub fn remove_at(&mut self, slot: usize) -> Option<Customer> {
        if slot >= self.displayed.len() {
            return None;
        }
        let customer = self.displayed.remove(slot);
        self.promote_one();
        self.reassign_priority();
        Some(customer)
    }

    /// At shift close every remaining customer leaves unserved.
    pub fn close_out(&mut self) -> Vec<StallEvent> {
        let mut events = Vec::new();
        for mut customer in self
            .displayed
            .drain(..)
            .chain(self.waiting.drain(..))
        {
            customer.state = CustomerState::Left;
            events.push(StallEvent::CustomerLeft {
                customer_id: customer.id,
            });
        }
        if !events.is_empty() {
            info!("[CustomerQueue] {} customers left at close", events.len());
        }
        events.push(self.count_event());
        events
    }

    pub fn customer_at(&self, slot: usize) -> Option<&Customer> {
        self.displayed.get(slot)
    }

    pub fn customer_at_mut(&mut self, slot: usize) -> Option<&mut Customer> {
        self.displayed.get_mut(slot)
    }

    pub fn displayed(&self) -> &[Customer] {
        &self.displayed
    }

    pub fn displayed_count(&self) -> usize {
        self.displayed.len()
    }

    pub fn waiting_count(&self) -> usize {
        self.waiting.len()
    }

    /// Displayed plus waiting.
    pub fn total_count(&self) -> usize {
        self.displayed.len() + self.waiting.len()
    }

    pub fn count_event(&self) -> StallEvent {
        StallEvent::QueueCountUpdated {
            displayed: self.displayed.len(),
            waiting: self.waiting.len(),
        }
    }

    fn promote_one(&mut self) {
        if self.displayed.len() < self.max_displayed {
            if let Some(customer) = self.waiting.pop_front() {
                debug!("[CustomerQueue] Promoted {} to a display slot", customer.name);
                self.displayed.push(customer);
            }
        }
    }

    fn reassign_priority(&mut self) {
        for (index, customer) in self.displayed.iter_mut().enumerate() {
            customer.set_priority(index == 0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn queue_with(max_displayed: usize, wait: f64) -> CustomerQueue {
        let config = QueueConfig {
            max_display_customers: max_displayed,
            spawn_interval_min_secs: 5.0,
            spawn_interval_max_secs: 10.0,
            customer_wait_secs: wait,
        };
        CustomerQueue::new(
            &config,
            vec!["egg_fry".to_string(), "noodle".to_string()],
            StdRng::seed_from_u64(7),
        )
    }

    fn assert_priority_invariant(queue: &CustomerQueue) {
        for (index, customer) in queue.displayed().iter().enumerate() {
            assert_eq!(
                customer.is_priority,
                index == 0,
                "Priority must be held by slot 0 exactly"
            );
        }
    }

    #[test]
    fn test_five_spawns_overflow_into_waiting() {
        let mut queue = queue_with(4, 120.0);
        for _ in 0..5 {
            queue.spawn(0.0);
        }
        assert_eq!(queue.displayed_count(), 4);
        assert_eq!(queue.waiting_count(), 1);
        assert_eq!(queue.total_count(), 5);
        assert_priority_invariant(&queue);
    }

    #[test]
    fn test_removal_promotes_within_same_call() {
        let mut queue = queue_with(4, 120.0);
        for _ in 0..5 {
            queue.spawn(0.0);
        }
        let waiting_name = queue.waiting.front().unwrap().name.clone();

        queue.remove_at(1).unwrap();
        assert_eq!(queue.displayed_count(), 4);
        assert_eq!(queue.waiting_count(), 0);
        assert!(queue.displayed().iter().any(|c| c.name == waiting_name));
        assert_priority_invariant(&queue);
    }

    #[test]
    fn test_wait_time_non_increasing_and_left_once() {
        let mut queue = queue_with(2, 10.0);
        queue.spawn(0.0);
        let before = queue.customer_at(0).unwrap().wait_remaining;

        let events = queue.tick(1.0, 4.0, false);
        assert!(queue.customer_at(0).unwrap().wait_remaining < before);
        assert!(events.is_empty());

        let events = queue.tick(2.0, 7.0, false);
        let left: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, StallEvent::CustomerLeft { .. }))
            .collect();
        assert_eq!(left.len(), 1, "Timeout must fire exactly once");
        assert_eq!(queue.displayed_count(), 0);

        // Nothing left to time out on later ticks.
        let events = queue.tick(3.0, 100.0, false);
        assert!(events
            .iter()
            .all(|e| !matches!(e, StallEvent::CustomerLeft { .. })));
    }

    #[test]
    fn test_timeout_promotes_waiting_customer() {
        let mut queue = queue_with(1, 5.0);
        queue.spawn(0.0);
        queue.spawn(0.0);
        assert_eq!(queue.displayed_count(), 1);
        assert_eq!(queue.waiting_count(), 1);

        let events = queue.tick(1.0, 6.0, false);
        assert!(events
            .iter()
            .any(|e| matches!(e, StallEvent::CustomerLeft { .. })));
        // Freed slot refilled from the background queue within the tick.
        assert_eq!(queue.displayed_count(), 1);
        assert_eq!(queue.waiting_count(), 0);
        assert_priority_invariant(&queue);
        // The promoted customer starts with a fresh timer.
        assert!(queue.customer_at(0).unwrap().wait_remaining > 0.0);
    }

    #[test]
    fn test_spawn_without_recipes_is_noop() {
        let config = QueueConfig::default();
        let mut queue = CustomerQueue::new(&config, Vec::new(), StdRng::seed_from_u64(7));
        let events = queue.spawn(0.0);
        assert!(events.is_empty());
        assert_eq!(queue.total_count(), 0);
    }

    #[test]
    fn test_auto_spawn_respects_window_and_capacity() {
        let mut queue = queue_with(1, 120.0);

        // Closed window: no spawn even though the timer is due.
        let events = queue.tick(0.0, 0.5, false);
        assert_eq!(queue.total_count(), 0);
        assert!(events.is_empty());

        // Open window spawns immediately (timer starts at zero).
        queue.tick(0.5, 0.5, true);
        assert_eq!(queue.displayed_count(), 1);

        // Slot full: the auto-spawner holds off.
        queue.tick(100.0, 0.5, true);
        assert_eq!(queue.total_count(), 1);
    }

    #[test]
    fn test_close_out_empties_both_sets() {
        let mut queue = queue_with(2, 120.0);
        for _ in 0..4 {
            queue.spawn(0.0);
        }
        let events = queue.close_out();
        let left = events
            .iter()
            .filter(|e| matches!(e, StallEvent::CustomerLeft { .. }))
            .count();
        assert_eq!(left, 4);
        assert_eq!(queue.total_count(), 0);
    }
}
