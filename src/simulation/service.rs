//! Scheduled transport services between two terminals

use super::error::{SimError, SimResult};
use super::types::{Duration, ServiceId, TerminalId, Timestamp};

/// A transport service in the simulation
#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    pub id: ServiceId,
    pub origin: TerminalId,
    pub destination: TerminalId,
    /// Maximum number of barges committed at the same time
    pub capacity: u32,
    /// Transit time from origin to destination
    pub duration: Duration,
    /// Departure slots, ascending
    pub schedule: Vec<Timestamp>,
    /// Barges currently committed to this service
    pub current_load: u32,
    /// Commitments that reached the destination
    pub completed_trips: u32,
}

impl Service {
    pub fn new(
        id: ServiceId,
        origin: TerminalId,
        destination: TerminalId,
        capacity: u32,
        duration: Duration,
        mut schedule: Vec<Timestamp>,
    ) -> Self {
        schedule.sort();
        Self {
            id,
            origin,
            destination,
            capacity,
            duration,
            schedule,
            current_load: 0,
            completed_trips: 0,
        }
    }

    pub fn has_free_slot(&self) -> bool {
        self.current_load < self.capacity
    }

    /// First scheduled departure at or after `at`
    pub fn next_departure(&self, at: Timestamp) -> Option<Timestamp> {
        let idx = self.schedule.partition_point(|slot| *slot < at);
        self.schedule.get(idx).copied()
    }

    pub(crate) fn commit(&mut self) -> SimResult<()> {
        if !self.has_free_slot() {
            return Err(SimError::ConsistencyFault(format!(
                "{} committed beyond capacity {}",
                self.id, self.capacity
            )));
        }
        self.current_load += 1;
        Ok(())
    }

    pub(crate) fn release(&mut self) -> SimResult<()> {
        self.current_load = self.current_load.checked_sub(1).ok_or_else(|| {
            SimError::ConsistencyFault(format!("{} released with no commitments", self.id))
        })?;
        Ok(())
    }
}
