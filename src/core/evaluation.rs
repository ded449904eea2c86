use super::config::EvaluationConfig;
use super::events::StallEvent;
use super::types::CustomerId;
use log::debug;

/// Review classification of one served dish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Review {
    Good,
    /// Neither good nor bad; counts only toward the served total.
    Neutral,
    Bad,
}

impl std::fmt::Display for Review {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Review::Good => "Good",
            Review::Neutral => "Neutral",
            Review::Bad => "Bad",
        };
        write!(f, "{}", name)
    }
}

/// Classifies dish scores into reviews and keeps the day's running
/// review tallies.
pub struct EvaluationEngine {
    good_threshold: f64,
    bad_threshold: f64,
    good_count: u64,
    bad_count: u64,
    total_served: u64,
}

impl EvaluationEngine {
    pub fn new(config: &EvaluationConfig) -> Self {
        Self {
            good_threshold: config.good_threshold,
            bad_threshold: config.bad_threshold,
            good_count: 0,
            bad_count: 0,
            total_served: 0,
        }
    }

    /// Total classification over [0, 100]: at or above the good
    /// threshold is Good, strictly below the bad threshold is Bad,
    /// everything between is Neutral.
    pub fn classify(&self, score: f64) -> Review {
        if score >= self.good_threshold {
            Review::Good
        } else if score < self.bad_threshold {
            Review::Bad
        } else {
            Review::Neutral
        }
    }

    /// Classify and tally a served dish, yielding the completion event.
    pub fn evaluate(&mut self, customer_id: &CustomerId, score: f64) -> (Review, StallEvent) {
        let review = self.classify(score);
        self.total_served += 1;
        match review {
            Review::Good => self.good_count += 1,
            Review::Bad => self.bad_count += 1,
            Review::Neutral => {}
        }
        debug!(
            "[EvaluationEngine] {} scored {:.1}: {} review",
            customer_id, score, review
        );
        (
            review,
            StallEvent::EvaluationCompleted {
                customer_id: customer_id.clone(),
                review,
                score,
            },
        )
    }

    pub fn good_count(&self) -> u64 {
        self.good_count
    }

    pub fn bad_count(&self) -> u64 {
        self.bad_count
    }

    pub fn total_served(&self) -> u64 {
        self.total_served
    }

    /// Share of served dishes with a good review; zero when nothing
    /// has been served yet.
    pub fn good_rate(&self) -> f64 {
        if self.total_served == 0 {
            return 0.0;
        }
        self.good_count as f64 / self.total_served as f64
    }

    /// Zero the running tallies at the day boundary.
    pub fn reset_day(&mut self) {
        self.good_count = 0;
        self.bad_count = 0;
        self.total_served = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> EvaluationEngine {
        EvaluationEngine::new(&EvaluationConfig {
            good_threshold: 80.0,
            bad_threshold: 50.0,
        })
    }

    #[test]
    fn test_classification_is_total_over_range() {
        let engine = engine();
        let mut score = 0.0;
        while score <= 100.0 {
            // Every score maps to exactly one review; classify never
            // panics or skips.
            let _ = engine.classify(score);
            score += 0.5;
        }
        assert_eq!(engine.classify(80.0), Review::Good);
        assert_eq!(engine.classify(79.999), Review::Neutral);
        assert_eq!(engine.classify(50.0), Review::Neutral);
        assert_eq!(engine.classify(49.999), Review::Bad);
    }

    #[test]
    fn test_neutral_counts_only_toward_total() {
        let mut engine = engine();
        let customer = "c-1".to_string();
        engine.evaluate(&customer, 95.0);
        engine.evaluate(&customer, 60.0);
        engine.evaluate(&customer, 10.0);

        assert_eq!(engine.good_count(), 1);
        assert_eq!(engine.bad_count(), 1);
        assert_eq!(engine.total_served(), 3);
    }

    #[test]
    fn test_good_rate_safe_when_empty() {
        let engine = engine();
        assert_eq!(engine.good_rate(), 0.0);
    }

    #[test]
    fn test_good_rate_and_reset() {
        let mut engine = engine();
        let customer = "c-1".to_string();
        engine.evaluate(&customer, 90.0);
        engine.evaluate(&customer, 85.0);
        engine.evaluate(&customer, 20.0);
        engine.evaluate(&customer, 60.0);

        assert!((engine.good_rate() - 0.5).abs() < 1e-9);

        engine.reset_day();
        assert_eq!(engine.total_served(), 0);
        assert_eq!(engine.good_rate(), 0.0);
    }
}
