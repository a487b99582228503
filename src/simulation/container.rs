//! Container shipment requests

use std::cmp::Reverse;

use super::error::{SimError, SimResult};
use super::types::{ContainerId, ContainerStatus, TerminalId, Timestamp};

/// Sort key putting the most urgent container first
pub type UrgencyKey = (Timestamp, Reverse<i32>, ContainerId);

/// A container request in the simulation
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    pub id: ContainerId,
    /// Cargo unit classification, e.g. "TEU"
    pub kind: String,
    pub origin: TerminalId,
    pub destination: TerminalId,
    pub request_date: Timestamp,
    /// Earliest time the container may be picked up
    pub available_date: Timestamp,
    pub due_date: Timestamp,
    /// Higher values are served first among equal due dates
    pub priority: i32,
    pub status: ContainerStatus,
    pub delivered_at: Option<Timestamp>,
}

impl Container {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ContainerId,
        kind: impl Into<String>,
        origin: TerminalId,
        destination: TerminalId,
        request_date: Timestamp,
        available_date: Timestamp,
        due_date: Timestamp,
        priority: i32,
    ) -> Self {
        Self {
            id,
            kind: kind.into(),
            origin,
            destination,
            request_date,
            available_date,
            due_date,
            priority,
            status: ContainerStatus::Waiting,
            delivered_at: None,
        }
    }

    pub fn is_available(&self, now: Timestamp) -> bool {
        self.available_date <= now
    }

    pub fn is_overdue(&self, now: Timestamp) -> bool {
        self.status != ContainerStatus::Delivered && now > self.due_date
    }

    pub fn was_delivered_late(&self) -> bool {
        matches!(self.delivered_at, Some(at) if at > self.due_date)
    }

    pub fn urgency_key(&self) -> UrgencyKey {
        (self.due_date, Reverse(self.priority), self.id)
    }

    pub(crate) fn advance(&mut self, next: ContainerStatus) -> SimResult<()> {
        if !self.status.can_advance_to(next) {
            return Err(SimError::ConsistencyFault(format!(
                "{} cannot move from {} to {}",
                self.id, self.status, next
            )));
        }
        self.status = next;
        Ok(())
    }
}
