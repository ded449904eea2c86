use super::errors::ShiftError;
use super::events::StallEvent;
use super::types::Seconds;
use log::{debug, info};

/// Global phase of the stall. Exactly one authoritative instance exists,
/// owned by the engine; everything else reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftState {
    /// Stall is closed, between days.
    Idle,
    /// Selling window is open; the countdown is running.
    Stalling,
    /// Away from the stall. No countdown semantics.
    Exploring,
    /// Selling window just ended; day rollup happens here.
    Closed,
}

impl std::fmt::Display for ShiftState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ShiftState::Idle => "Idle",
            ShiftState::Stalling => "Stalling",
            ShiftState::Exploring => "Exploring",
            ShiftState::Closed => "Closed",
        };
        write!(f, "{}", name)
    }
}

/// Phase state machine (Idle → Stalling → Closed → Idle, with Exploring
/// as a side branch) plus the in-shift countdown.
///
/// Only `tick` and the explicit transition methods mutate the state;
/// the countdown is a plain field decremented per tick, clamped at zero.
pub struct ShiftClock {
    state: ShiftState,
    remaining: Seconds,
    shift_duration: Seconds,
}

impl ShiftClock {
    pub fn new(shift_duration: Seconds) -> Self {
        Self {
            state: ShiftState::Idle,
            remaining: 0.0,
            shift_duration,
        }
    }

    pub fn state(&self) -> ShiftState {
        self.state
    }

    /// Seconds left in the current shift; zero outside Stalling.
    pub fn remaining(&self) -> Seconds {
        self.remaining
    }

    /// Idle → Stalling. Resets the countdown to the full shift duration.
    pub fn open(&mut self) -> Result<StallEvent, ShiftError> {
        self.transition(ShiftState::Idle, ShiftState::Stalling)
            .map(|event| {
                self.remaining = self.shift_duration;
                info!("[ShiftClock] Shift opened, {:.0}s on the clock", self.remaining);
                event
            })
    }

    /// Stalling → Closed, by operator action.
    pub fn close(&mut self) -> Result<StallEvent, ShiftError> {
        self.transition(ShiftState::Stalling, ShiftState::Closed)
    }

    /// Closed/Exploring → Idle, ready for the next day.
    pub fn reset(&mut self) -> Result<StallEvent, ShiftError> {
        match self.state {
            ShiftState::Closed | ShiftState::Exploring => {
                Ok(self.force(ShiftState::Idle))
            }
            from => Err(ShiftError::InvalidTransition {
                from,
                requested: ShiftState::Idle,
            }),
        }
    }

    /// Idle/Closed → Exploring. Recorded only; no countdown runs.
    pub fn explore(&mut self) -> Result<StallEvent, ShiftError> {
        match self.state {
            ShiftState::Idle | ShiftState::Closed => {
                Ok(self.force(ShiftState::Exploring))
            }
            from => Err(ShiftError::InvalidTransition {
                from,
                requested: ShiftState::Exploring,
            }),
        }
    }

    /// Advance the countdown. Returns the state-changed event when the
    /// countdown crosses zero and forces the Closed transition; the
    /// crossing fires at most once because the state leaves Stalling.
    pub fn tick(&mut self, elapsed: Seconds) -> Option<StallEvent> {
        if self.state != ShiftState::Stalling {
            return None;
        }
        self.remaining = (self.remaining - elapsed).max(0.0);
        if self.remaining > 0.0 {
            return None;
        }
        debug!("[ShiftClock] Countdown expired, closing shift");
        Some(self.force(ShiftState::Closed))
    }

    fn transition(
        &mut self,
        expected: ShiftState,
        to: ShiftState,
    ) -> Result<StallEvent, ShiftError> {
        if self.state != expected {
            return Err(ShiftError::InvalidTransition {
                from: self.state,
                requested: to,
            });
        }
        Ok(self.force(to))
    }

    fn force(&mut self, to: ShiftState) -> StallEvent {
        let from = self.state;
        self.state = to;
        info!("[ShiftClock] {} -> {}", from, to);
        StallEvent::ShiftStateChanged { from, to }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_day_cycle() {
        let mut clock = ShiftClock::new(900.0);
        assert_eq!(clock.state(), ShiftState::Idle);

        clock.open().unwrap();
        assert_eq!(clock.state(), ShiftState::Stalling);
        assert_eq!(clock.remaining(), 900.0);

        clock.close().unwrap();
        assert_eq!(clock.state(), ShiftState::Closed);

        clock.reset().unwrap();
        assert_eq!(clock.state(), ShiftState::Idle);
    }

    #[test]
    fn test_countdown_closes_exactly_once() {
        let mut clock = ShiftClock::new(10.0);
        clock.open().unwrap();

        assert!(clock.tick(6.0).is_none());
        assert_eq!(clock.remaining(), 4.0);

        let event = clock.tick(6.0);
        assert!(matches!(
            event,
            Some(StallEvent::ShiftStateChanged {
                from: ShiftState::Stalling,
                to: ShiftState::Closed,
            })
        ));
        assert_eq!(clock.remaining(), 0.0);

        // Further ticks in Closed must not fire again.
        assert!(clock.tick(1.0).is_none());
        assert!(clock.tick(100.0).is_none());
    }

    #[test]
    fn test_tick_outside_stalling_is_inert() {
        let mut clock = ShiftClock::new(10.0);
        assert!(clock.tick(5.0).is_none());
        assert_eq!(clock.state(), ShiftState::Idle);
    }

    #[test]
    fn test_invalid_transitions_rejected_without_state_change() {
        let mut clock = ShiftClock::new(10.0);

        assert!(clock.close().is_err());
        assert_eq!(clock.state(), ShiftState::Idle);

        assert!(clock.reset().is_err());
        assert_eq!(clock.state(), ShiftState::Idle);

        clock.open().unwrap();
        assert!(clock.open().is_err());
        assert!(clock.explore().is_err());
        assert_eq!(clock.state(), ShiftState::Stalling);
    }

    #[test]
    fn test_explore_branch() {
        let mut clock = ShiftClock::new(10.0);
        clock.explore().unwrap();
        assert_eq!(clock.state(), ShiftState::Exploring);
        assert_eq!(clock.remaining(), 0.0);

        clock.reset().unwrap();
        assert_eq!(clock.state(), ShiftState::Idle);
    }

    #[test]
    fn test_reopen_resets_countdown() {
        let mut clock = ShiftClock::new(10.0);
        clock.open().unwrap();
        clock.tick(10.0);
        clock.reset().unwrap();
        clock.open().unwrap();
        assert_eq!(clock.remaining(), 10.0);
    }
}
