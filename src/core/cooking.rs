use super::collaborators::IngredientLedger;
use super::config::CookingConfig;
use super::dish_storage::Dish;
use super::errors::CookingError;
use super::recipe::{CookingStep, Recipe};
use super::types::{Seconds, ToolId};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::Normal;
use std::collections::HashMap;

/// Transient state of the one in-flight recipe.
///
/// Invariant: while a session exists, `step_index` points at a real
/// step; the session is dissolved the moment the last step completes.
#[derive(Debug, Clone)]
pub struct CookingSession {
    pub recipe: Recipe,
    pub step_index: usize,
    pub step_elapsed: Seconds,
    pub selected_tool: Option<ToolId>,
}

impl CookingSession {
    pub fn current_step(&self) -> &CookingStep {
        &self.recipe.steps[self.step_index]
    }
}

/// Per-recipe sequential step state machine.
///
/// Steps advance either by their timer filling up or by the required
/// tool being used; both run through the same advance path. Tool use
/// arms a cooldown, a plain countdown decremented each tick.
pub struct CookingPipeline {
    session: Option<CookingSession>,
    cooldowns: HashMap<ToolId, Seconds>,
    tool_cooldown: Seconds,
    score_base: f64,
    score_noise: Option<Normal<f64>>,
    rng: StdRng,
}

impl CookingPipeline {
    pub fn new(config: &CookingConfig, rng: StdRng) -> Self {
        let std_dev = config.score_std_dev;
        let score_noise = if std_dev.is_finite() && std_dev > 0.0 {
            Normal::new(0.0, std_dev).ok()
        } else {
            None
        };
        Self {
            session: None,
            cooldowns: HashMap::new(),
            tool_cooldown: config.tool_cooldown_secs,
            score_base: config.score_base,
            score_noise,
            rng,
        }
    }

    pub fn is_cooking(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&CookingSession> {
        self.session.as_ref()
    }

    /// Seconds of cooldown left on a tool; zero when ready.
    pub fn cooldown_remaining(&self, tool_id: &str) -> Seconds {
        self.cooldowns.get(tool_id).copied().unwrap_or(0.0)
    }

    /// Begin cooking a recipe. Rejected while a session is active or
    /// when any required ingredient is short; the availability check
    /// covers the whole recipe before anything is deducted.
    ///
    /// A recipe with no steps completes immediately and the dish is
    /// returned from this call.
    pub fn start_cooking(
        &mut self,
        recipe: &Recipe,
        ingredients: &mut dyn IngredientLedger,
        now: Seconds,
    ) -> Result<Option<Dish>, CookingError> {
        if self.session.is_some() {
            return Err(CookingError::SessionActive);
        }

        let needs = recipe.total_ingredients();
        for (ingredient_id, quantity) in &needs {
            if !ingredients.has_enough(ingredient_id, *quantity) {
                return Err(CookingError::MissingIngredients(recipe.id.clone()));
            }
        }
        for (ingredient_id, quantity) in &needs {
            // The check above passed; a refusal here is a collaborator
            // fault and degrades to a logged no-op.
            if !ingredients.consume(ingredient_id, *quantity) {
                warn!(
                    "[CookingPipeline] Ledger refused {} x {} after passing the check",
                    quantity, ingredient_id
                );
            }
        }

        info!("[CookingPipeline] Started cooking '{}'", recipe.name);
        self.session = Some(CookingSession {
            recipe: recipe.clone(),
            step_index: 0,
            step_elapsed: 0.0,
            selected_tool: None,
        });

        if recipe.steps.is_empty() {
            return Ok(self.complete_session(now));
        }
        Ok(None)
    }

    /// Advance the step timer and the tool cooldowns. Returns the
    /// finished dish when the last step completes this tick.
    pub fn tick(&mut self, now: Seconds, elapsed: Seconds) -> Option<Dish> {
        self.cooldowns.retain(|tool_id, remaining| {
            *remaining -= elapsed;
            if *remaining <= 0.0 {
                debug!("[CookingPipeline] Tool '{}' ready again", tool_id);
                false
            } else {
                true
            }
        });

        match self.session.as_mut() {
            Some(session) => session.step_elapsed += elapsed,
            None => return None,
        }
        self.advance_ready_steps(now)
    }

    /// Complete the current step with the required tool, skipping the
    /// rest of its timer, and arm the tool's cooldown. A wrong tool or
    /// a cooling tool fails with the step timer untouched.
    pub fn use_tool(&mut self, tool_id: &str, now: Seconds) -> Result<Option<Dish>, CookingError> {
        let (expected, duration) = match self.session.as_ref() {
            Some(session) => {
                let step = session.current_step();
                (step.tool_id.clone(), step.duration)
            }
            None => return Err(CookingError::NoActiveSession),
        };
        if expected != tool_id {
            return Err(CookingError::WrongTool {
                expected,
                got: tool_id.to_string(),
            });
        }
        if self.cooldown_remaining(tool_id) > 0.0 {
            return Err(CookingError::ToolCoolingDown(tool_id.to_string()));
        }

        if let Some(session) = self.session.as_mut() {
            session.selected_tool = Some(tool_id.to_string());
            // Equivalent to the timer reaching its target; the shared
            // advance path below does the rest.
            session.step_elapsed = duration;
        }
        self.cooldowns
            .insert(tool_id.to_string(), self.tool_cooldown);
        debug!("[CookingPipeline] Tool '{}' completed the current step", tool_id);
        Ok(self.advance_ready_steps(now))
    }

    /// Discard the active session. Consumed ingredients are not
    /// refunded.
    pub fn cancel(&mut self) -> Result<(), CookingError> {
        match self.session.take() {
            Some(session) => {
                info!(
                    "[CookingPipeline] Cancelled '{}' at step {}, ingredients lost",
                    session.recipe.name, session.step_index
                );
                Ok(())
            }
            None => Err(CookingError::NoActiveSession),
        }
    }

    /// Shared advance path for timer- and tool-driven completion.
    /// Excess elapsed time carries into the next step.
    fn advance_ready_steps(&mut self, now: Seconds) -> Option<Dish> {
        loop {
            let finished = match self.session.as_mut() {
                Some(session) => {
                    let duration = session.current_step().duration;
                    if session.step_elapsed < duration {
                        return None;
                    }
                    session.step_elapsed -= duration;
                    session.step_index += 1;
                    session.selected_tool = None;
                    session.step_index >= session.recipe.steps.len()
                }
                None => return None,
            };
            if finished {
                return self.complete_session(now);
            }
        }
    }

    fn complete_session(&mut self, now: Seconds) -> Option<Dish> {
        let session = self.session.take()?;
        let noise = match self.score_noise {
            Some(noise) => self.rng.sample(noise),
            None => 0.0,
        };
        let score = (self.score_base + noise).clamp(0.0, 100.0);
        info!(
            "[CookingPipeline] '{}' finished with score {:.1}",
            session.recipe.name, score
        );
        Some(Dish::new(session.recipe.id, score, now))
    }
}
