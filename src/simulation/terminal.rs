//! Terminals: fixed storage nodes of the network

use super::error::{SimError, SimResult};
use super::types::TerminalId;

/// A terminal in the simulation
#[derive(Debug, Clone, PartialEq)]
pub struct Terminal {
    pub id: TerminalId,
    pub name: String,
    /// Maximum number of containers that can be staged here
    pub capacity: u32,
    /// Containers currently staged here awaiting pickup
    pub current_containers: u32,
}

impl Terminal {
    pub fn new(id: TerminalId, name: impl Into<String>, capacity: u32) -> Self {
        Self {
            id,
            name: name.into(),
            capacity,
            current_containers: 0,
        }
    }

    pub fn has_space(&self) -> bool {
        self.current_containers < self.capacity
    }

    /// Fraction of storage in use
    pub fn utilization(&self) -> SimResult<f64> {
        if self.capacity == 0 {
            return Err(SimError::DegenerateTerminal(self.name.clone()));
        }
        Ok(self.current_containers as f64 / self.capacity as f64)
    }

    /// Stage a newly requested container
    pub(crate) fn stage_container(&mut self) -> SimResult<()> {
        if !self.has_space() {
            return Err(SimError::TerminalFull(self.name.clone()));
        }
        self.current_containers += 1;
        Ok(())
    }

    /// A staged container left aboard a barge
    pub(crate) fn release_container(&mut self) -> SimResult<()> {
        self.current_containers = self.current_containers.checked_sub(1).ok_or_else(|| {
            SimError::ConsistencyFault(format!("terminal {} released more than it held", self.name))
        })?;
        Ok(())
    }
}
