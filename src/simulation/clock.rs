//! Logical simulation clock

use super::error::{SimError, SimResult};
use super::types::{Duration, Timestamp};

/// Monotonic simulated time, advanced by a fixed step per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimClock {
    now: Timestamp,
    step: Duration,
    ticks: u64,
}

impl SimClock {
    pub fn new(epoch: Timestamp, step: Duration) -> Self {
        Self {
            now: epoch,
            step,
            ticks: 0,
        }
    }

    pub fn now(&self) -> Timestamp {
        self.now
    }

    pub fn step_size(&self) -> Duration {
        self.step
    }

    /// Number of completed ticks
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Time after the next step, if it is representable
    pub fn next_time(&self) -> SimResult<Timestamp> {
        self.now.checked_add_signed(self.step).ok_or_else(|| {
            SimError::TimeOverflow(format!("cannot step {} past {}", self.step, self.now))
        })
    }

    pub fn advance(&mut self) -> SimResult<()> {
        self.now = self.next_time()?;
        self.ticks += 1;
        Ok(())
    }
}
