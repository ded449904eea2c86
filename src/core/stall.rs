use super::collaborators::{IngredientLedger, ToolRegistry};
use super::config::StallConfig;
use super::cooking::CookingPipeline;
use super::customer::CustomerState;
use super::customer_queue::CustomerQueue;
use super::dish_storage::DishStorage;
use super::errors::{CookingError, ServeError, ShiftError};
use super::event_bus::EventBus;
use super::events::StallEvent;
use super::evaluation::EvaluationEngine;
use super::ledger::TransactionLedger;
use super::order_matcher::OrderMatcher;
use super::payment::PaymentEngine;
use super::recipe::RecipeBook;
use super::shift_clock::{ShiftClock, ShiftState};
use super::types::{Money, Seconds};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Composition root of one stall simulation.
///
/// Owns the bus and every component, wired by construction rather than
/// ambient globals. The host loop drives `tick(elapsed)`; the player
/// (or any external actor) drives the documented public operations.
/// Components advance in a fixed order each tick (ShiftClock, then
/// CustomerQueue, then CookingPipeline) so queue timeouts and
/// promotions settle before any serve decision made between ticks.
pub struct StallEngine {
    config: StallConfig,
    bus: EventBus,
    clock: ShiftClock,
    queue: CustomerQueue,
    pipeline: CookingPipeline,
    storage: DishStorage,
    payment: PaymentEngine,
    evaluation: EvaluationEngine,
    ledger: TransactionLedger,
    recipes: RecipeBook,
    ingredients: Box<dyn IngredientLedger>,
    tools: Box<dyn ToolRegistry>,
    now: Seconds,
    gold: Money,
}

impl StallEngine {
    pub fn new(
        config: StallConfig,
        recipes: RecipeBook,
        ingredients: Box<dyn IngredientLedger>,
        tools: Box<dyn ToolRegistry>,
    ) -> Self {
        let seed = config.random_seed.unwrap_or_else(rand::random);
        // Sorted pool so seeded runs are reproducible regardless of
        // recipe-map iteration order.
        let mut recipe_pool = recipes.ids();
        recipe_pool.sort();

        Self {
            clock: ShiftClock::new(config.shift.shift_duration_secs),
            queue: CustomerQueue::new(
                &config.queue,
                recipe_pool,
                StdRng::seed_from_u64(seed),
            ),
            pipeline: CookingPipeline::new(
                &config.cooking,
                StdRng::seed_from_u64(seed.wrapping_add(1)),
            ),
            storage: DishStorage::new(),
            payment: PaymentEngine::new(config.pricing.clone()),
            evaluation: EvaluationEngine::new(&config.evaluation),
            ledger: TransactionLedger::new(),
            bus: EventBus::new(),
            recipes,
            ingredients,
            tools,
            now: 0.0,
            gold: 0,
            config,
        }
    }

    /// Advance the whole simulation by `elapsed` seconds.
    pub fn tick(&mut self, elapsed: Seconds) {
        self.now += elapsed;

        if let Some(event) = self.clock.tick(elapsed) {
            // Countdown crossed zero: the clock forced Stalling -> Closed.
            self.publish(event);
            self.finish_day();
        }

        let spawning_open = self.clock.state() == ShiftState::Stalling;
        for event in self.queue.tick(self.now, elapsed, spawning_open) {
            self.publish(event);
        }

        if let Some(dish) = self.pipeline.tick(self.now, elapsed) {
            let event = self.storage.store(dish);
            self.publish(event);
        }
    }

    /// Open the selling window (Idle -> Stalling).
    pub fn open_shift(&mut self) -> Result<(), ShiftError> {
        let event = self.clock.open()?;
        self.publish(event);
        Ok(())
    }

    /// Close the selling window early (Stalling -> Closed) and run the
    /// day rollup.
    pub fn close_shift(&mut self) -> Result<(), ShiftError> {
        let event = self.clock.close()?;
        self.publish(event);
        self.finish_day();
        Ok(())
    }

    /// Return from Closed (or Exploring) to Idle, ready for the next
    /// day's `open_shift`.
    pub fn reset_to_idle(&mut self) -> Result<(), ShiftError> {
        let event = self.clock.reset()?;
        self.publish(event);
        Ok(())
    }

    /// Record leaving the stall (Idle/Closed -> Exploring).
    pub fn explore(&mut self) -> Result<(), ShiftError> {
        let event = self.clock.explore()?;
        self.publish(event);
        Ok(())
    }

    /// Begin cooking the given recipe. A zero-step recipe lands in
    /// storage before this call returns.
    pub fn start_cooking(&mut self, recipe_id: &str) -> Result<(), CookingError> {
        let recipe = match self.recipes.get(recipe_id) {
            Some(recipe) => recipe.clone(),
            None => return Err(CookingError::UnknownRecipe(recipe_id.to_string())),
        };
        let finished = self
            .pipeline
            .start_cooking(&recipe, self.ingredients.as_mut(), self.now)?;
        if let Some(dish) = finished {
            let event = self.storage.store(dish);
            self.publish(event);
        }
        Ok(())
    }

    /// Use a tool on the current cooking step. The tool registry is
    /// consulted first; the pipeline only ever sees known, owned tools.
    pub fn use_tool(&mut self, tool_id: &str) -> Result<(), CookingError> {
        if !self.tools.tool_exists(tool_id) {
            return Err(CookingError::UnknownTool(tool_id.to_string()));
        }
        if !self.tools.is_owned(tool_id) {
            return Err(CookingError::ToolNotOwned(tool_id.to_string()));
        }
        if let Some(dish) = self.pipeline.use_tool(tool_id, self.now)? {
            let event = self.storage.store(dish);
            self.publish(event);
        }
        Ok(())
    }

    /// Abandon the active cooking session; ingredients stay consumed.
    pub fn cancel_cooking(&mut self) -> Result<(), CookingError> {
        self.pipeline.cancel()
    }

    /// Serve the oldest stored dish to the customer in a display slot.
    ///
    /// Failures have no net side effects: on a recipe mismatch the dish
    /// goes back to the head of storage and the customer keeps waiting.
    /// On success the payout is returned and the slot is refilled from
    /// the background queue.
    pub fn serve(&mut self, slot: usize) -> Result<Money, ServeError> {
        let (customer_id, recipe_id) = match self.queue.customer_at(slot) {
            Some(customer) => {
                if !customer.is_waiting() {
                    return Err(ServeError::NotAwaitingService);
                }
                (customer.id.clone(), customer.order.recipe_id.clone())
            }
            None => return Err(ServeError::InvalidSlot(slot)),
        };
        let recipe = match self.recipes.get(&recipe_id) {
            Some(recipe) => recipe.clone(),
            None => {
                warn!("[StallEngine] Order for '{}' has no recipe entry", recipe_id);
                return Err(ServeError::UnknownRecipe(recipe_id));
            }
        };

        let dish = match self.storage.take_next() {
            Some(dish) => dish,
            None => return Err(ServeError::NoDishReady),
        };

        let matched = match self.queue.customer_at_mut(slot) {
            Some(customer) => OrderMatcher::serve_dish(customer, &dish),
            None => Err(ServeError::InvalidSlot(slot)),
        };
        match matched {
            Ok(true) => {}
            Ok(false) => {
                let offered = dish.recipe_id.clone();
                self.storage.put_back(dish);
                return Err(ServeError::WrongRecipe {
                    wanted: recipe_id,
                    offered,
                });
            }
            Err(err) => {
                self.storage.put_back(dish);
                return Err(err);
            }
        }

        // Matched: payment, evaluation, ledger, then departure.
        let (amount, pay_event) = self.payment.charge(&customer_id, &recipe, dish.score);
        self.gold += amount;
        self.publish(pay_event);
        let gold_event = StallEvent::GoldChanged { total: self.gold };
        self.publish(gold_event);

        let (_review, eval_event) = self.evaluation.evaluate(&customer_id, dish.score);
        self.publish(eval_event);

        if let Some(customer) = self.queue.customer_at_mut(slot) {
            customer.state = CustomerState::Completed;
        }
        self.queue.remove_at(slot);
        let count_event = self.queue.count_event();
        self.publish(count_event);

        info!(
            "[StallEngine] Served slot {} ({}) for {} gold",
            slot, recipe.name, amount
        );
        Ok(amount)
    }

    /// Route an event to its core consumers, then to the bus. Core
    /// routing runs first so external handlers observe committed state.
    fn publish(&mut self, event: StallEvent) {
        self.ledger.handle_event(&event, self.now);
        self.bus.publish(&event);
    }

    /// Day-boundary housekeeping after the Stalling -> Closed
    /// transition: abandon the in-flight dish, send everyone home,
    /// clear storage, roll the ledger over, and reset the running
    /// counters.
    fn finish_day(&mut self) {
        if self.pipeline.is_cooking() {
            warn!("[StallEngine] Shift closed mid-cook; session discarded");
            self.pipeline.cancel().ok();
        }
        for event in self.queue.close_out() {
            self.publish(event);
        }
        let event = self.storage.clear();
        self.publish(event);

        let (_summary, event) = self.ledger.rollup_day(
            self.payment.customers_served(),
            self.evaluation.good_rate(),
            self.now,
        );
        self.payment.reset_day();
        self.evaluation.reset_day();
        self.publish(event);
    }

    // Read-only views.

    pub fn now(&self) -> Seconds {
        self.now
    }

    pub fn shift_state(&self) -> ShiftState {
        self.clock.state()
    }

    pub fn shift_remaining(&self) -> Seconds {
        self.clock.remaining()
    }

    pub fn gold(&self) -> Money {
        self.gold
    }

    pub fn current_day(&self) -> u32 {
        self.ledger.current_day()
    }

    pub fn config(&self) -> &StallConfig {
        &self.config
    }

    pub fn recipes(&self) -> &RecipeBook {
        &self.recipes
    }

    pub fn queue(&self) -> &CustomerQueue {
        &self.queue
    }

    pub fn storage(&self) -> &DishStorage {
        &self.storage
    }

    pub fn pipeline(&self) -> &CookingPipeline {
        &self.pipeline
    }

    pub fn payment(&self) -> &PaymentEngine {
        &self.payment
    }

    pub fn evaluation(&self) -> &EvaluationEngine {
        &self.evaluation
    }

    pub fn ledger(&self) -> &TransactionLedger {
        &self.ledger
    }

    /// Subscription point for the presentation layer.
    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }
}
