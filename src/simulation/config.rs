//! Simulation configuration

use super::types::{Duration, Timestamp};

/// Default tick length in minutes
pub const DEFAULT_STEP_MINUTES: i64 = 30;

/// Rule deciding when a loading barge leaves its origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeparturePolicy {
    /// Leave on the tick after the commitment was made
    #[default]
    Opportunistic,
    /// Wait for the service's next scheduled departure slot
    Scheduled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Starting time; wall-clock now when `None`
    pub epoch: Option<Timestamp>,
    /// Time advanced per tick
    pub step: Duration,
    pub departure_policy: DeparturePolicy,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            epoch: None,
            step: Duration::minutes(DEFAULT_STEP_MINUTES),
            departure_policy: DeparturePolicy::default(),
        }
    }
}

impl SimConfig {
    pub fn with_epoch(mut self, epoch: Timestamp) -> Self {
        self.epoch = Some(epoch);
        self
    }

    pub fn with_step(mut self, step: Duration) -> Self {
        self.step = step;
        self
    }

    pub fn with_departure_policy(mut self, policy: DeparturePolicy) -> Self {
        self.departure_policy = policy;
        self
    }
}
