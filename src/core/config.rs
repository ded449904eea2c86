use serde::{Deserialize, Serialize};

/// Shift clock settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftConfig {
    /// Length of one selling window, in simulated seconds.
    pub shift_duration_secs: f64,
}

impl Default for ShiftConfig {
    fn default() -> Self {
        Self {
            shift_duration_secs: 900.0,
        }
    }
}

/// Customer queue settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Capacity of the on-stage display slots.
    pub max_display_customers: usize,
    /// Lower bound of the random interval between spawns, seconds.
    pub spawn_interval_min_secs: f64,
    /// Upper bound of the random interval between spawns, seconds.
    pub spawn_interval_max_secs: f64,
    /// Patience granted to each customer on spawn, seconds.
    pub customer_wait_secs: f64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_display_customers: 4,
            spawn_interval_min_secs: 8.0,
            spawn_interval_max_secs: 20.0,
            customer_wait_secs: 120.0,
        }
    }
}

/// Cooking pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookingConfig {
    /// Cooldown applied to a tool after a tool-assisted step, seconds.
    pub tool_cooldown_secs: f64,
    /// Center of the dish score distribution.
    pub score_base: f64,
    /// Standard deviation of the dish score noise; the final score is
    /// clamped to [0, 100].
    pub score_std_dev: f64,
}

impl Default for CookingConfig {
    fn default() -> Self {
        Self {
            tool_cooldown_secs: 5.0,
            score_base: 80.0,
            score_std_dev: 10.0,
        }
    }
}

/// Price multipliers per score tier. Thresholds are fixed (90/70/50);
/// only the multipliers are tunable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    pub perfect_multiplier: f64,
    pub good_multiplier: f64,
    pub normal_multiplier: f64,
    pub bad_multiplier: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            perfect_multiplier: 1.5,
            good_multiplier: 1.2,
            normal_multiplier: 1.0,
            bad_multiplier: 0.5,
        }
    }
}

/// Review classification thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Scores at or above this are a good review.
    pub good_threshold: f64,
    /// Scores strictly below this are a bad review.
    pub bad_threshold: f64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            good_threshold: 80.0,
            bad_threshold: 50.0,
        }
    }
}

/// Root configuration for one stall simulation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StallConfig {
    pub shift: ShiftConfig,
    pub queue: QueueConfig,
    pub cooking: CookingConfig,
    pub pricing: PricingConfig,
    pub evaluation: EvaluationConfig,
    /// Seed for deterministic runs; None draws from entropy.
    pub random_seed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StallConfig::default();
        assert_eq!(config.queue.max_display_customers, 4);
        assert_eq!(config.shift.shift_duration_secs, 900.0);
        assert_eq!(config.random_seed, None);
    }

    #[test]
    fn test_spawn_interval_bounds_ordered() {
        let config = QueueConfig::default();
        assert!(config.spawn_interval_min_secs <= config.spawn_interval_max_secs);
    }

    #[test]
    fn test_default_multipliers_are_monotonic() {
        let pricing = PricingConfig::default();
        assert!(pricing.bad_multiplier <= pricing.normal_multiplier);
        assert!(pricing.normal_multiplier <= pricing.good_multiplier);
        assert!(pricing.good_multiplier <= pricing.perfect_multiplier);
    }
}
