//! Barges: mobile carriers that commit to one service at a time

use super::error::{SimError, SimResult};
use super::types::{BargeId, BargeStatus, ContainerId, ServiceId, TerminalId, Timestamp};

/// A barge in the simulation
#[derive(Debug, Clone, PartialEq)]
pub struct Barge {
    pub id: BargeId,
    /// Maximum number of containers aboard
    pub capacity: u32,
    /// Where the barge is moored, `None` while in transit
    pub current_terminal: Option<TerminalId>,
    /// The service the barge is committed to, if any
    pub current_service: Option<ServiceId>,
    /// Containers aboard, in loading order
    pub containers: Vec<ContainerId>,
    pub status: BargeStatus,
    /// When the current commitment was made
    pub committed_at: Option<Timestamp>,
    /// When the barge left its origin on the current commitment
    pub departed_at: Option<Timestamp>,
}

impl Barge {
    pub fn new(id: BargeId, capacity: u32, home_terminal: Option<TerminalId>) -> Self {
        Self {
            id,
            capacity,
            current_terminal: home_terminal,
            current_service: None,
            containers: Vec::new(),
            status: BargeStatus::Idle,
            committed_at: None,
            departed_at: None,
        }
    }

    pub fn spare_hold(&self) -> u32 {
        self.capacity.saturating_sub(self.containers.len() as u32)
    }

    pub fn has_spare_hold(&self) -> bool {
        self.spare_hold() > 0
    }

    pub fn carries(&self, container_id: ContainerId) -> bool {
        self.containers.contains(&container_id)
    }

    pub(crate) fn load(&mut self, container_id: ContainerId) -> SimResult<()> {
        if !self.has_spare_hold() {
            return Err(SimError::ConsistencyFault(format!(
                "{} loaded beyond capacity {}",
                self.id, self.capacity
            )));
        }
        self.containers.push(container_id);
        Ok(())
    }

    pub(crate) fn unload(&mut self, container_id: ContainerId) -> SimResult<()> {
        let idx = self
            .containers
            .iter()
            .position(|c| *c == container_id)
            .ok_or_else(|| {
                SimError::ConsistencyFault(format!("{} does not carry {}", self.id, container_id))
            })?;
        self.containers.remove(idx);
        Ok(())
    }

    /// Drop the current commitment and return to idle at the current terminal
    pub(crate) fn end_commitment(&mut self, status: BargeStatus) {
        self.current_service = None;
        self.committed_at = None;
        self.departed_at = None;
        self.status = status;
    }
}
