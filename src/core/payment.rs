use super::config::PricingConfig;
use super::events::StallEvent;
use super::recipe::Recipe;
use super::types::{CustomerId, Money};
use log::debug;

/// Score band a dish's price multiplier is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceTier {
    Perfect,
    Good,
    Normal,
    Bad,
}

/// Tier boundaries. Fixed; only the multipliers are configurable.
pub const PERFECT_SCORE_THRESHOLD: f64 = 90.0;
pub const GOOD_SCORE_THRESHOLD: f64 = 70.0;
pub const NORMAL_SCORE_THRESHOLD: f64 = 50.0;

/// Resolves dish scores into payouts and keeps the day's running
/// earnings counters.
pub struct PaymentEngine {
    pricing: PricingConfig,
    day_earnings: Money,
    customers_served: u64,
}

impl PaymentEngine {
    pub fn new(pricing: PricingConfig) -> Self {
        Self {
            pricing,
            day_earnings: 0,
            customers_served: 0,
        }
    }

    /// The highest tier the score qualifies for.
    pub fn tier_for(score: f64) -> PriceTier {
        if score >= PERFECT_SCORE_THRESHOLD {
            PriceTier::Perfect
        } else if score >= GOOD_SCORE_THRESHOLD {
            PriceTier::Good
        } else if score >= NORMAL_SCORE_THRESHOLD {
            PriceTier::Normal
        } else {
            PriceTier::Bad
        }
    }

    fn multiplier(&self, tier: PriceTier) -> f64 {
        match tier {
            PriceTier::Perfect => self.pricing.perfect_multiplier,
            PriceTier::Good => self.pricing.good_multiplier,
            PriceTier::Normal => self.pricing.normal_multiplier,
            PriceTier::Bad => self.pricing.bad_multiplier,
        }
    }

    /// Price of a dish at a given score: recipe price times the tier
    /// multiplier, rounded to whole gold. Pure.
    pub fn compute_price(&self, recipe: &Recipe, score: f64) -> Money {
        let multiplier = self.multiplier(Self::tier_for(score));
        (recipe.price as f64 * multiplier).round() as Money
    }

    /// Charge a served customer: computes the price, bumps the running
    /// day counters, and yields the payment event for the ledger and
    /// the bus.
    pub fn charge(
        &mut self,
        customer_id: &CustomerId,
        recipe: &Recipe,
        score: f64,
    ) -> (Money, StallEvent) {
        let amount = self.compute_price(recipe, score);
        self.day_earnings += amount;
        self.customers_served += 1;
        debug!(
            "[PaymentEngine] {} paid {} for '{}' (score {:.1})",
            customer_id, amount, recipe.name, score
        );
        (
            amount,
            StallEvent::CustomerPaid {
                customer_id: customer_id.clone(),
                amount,
            },
        )
    }

    /// Earnings recorded since the last day reset.
    pub fn day_earnings(&self) -> Money {
        self.day_earnings
    }

    /// Customers served since the last day reset.
    pub fn customers_served(&self) -> u64 {
        self.customers_served
    }

    /// Zero the running counters at the day boundary.
    pub fn reset_day(&mut self) {
        self.day_earnings = 0;
        self.customers_served = 0;
    }
}
