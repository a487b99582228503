//! Core types for the container network simulation
//!
//! Identifiers, status enums and time aliases shared by every entity.

use std::fmt;

/// Point in simulated time
pub type Timestamp = chrono::NaiveDateTime;

/// Span of simulated time
pub type Duration = chrono::Duration;

/// A unique identifier for simulation entities
/// This is a simple wrapper around a usize for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SimId(pub usize);

/// A wrapper type for terminal IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TerminalId(pub SimId);

/// A wrapper type for service IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ServiceId(pub SimId);

/// A wrapper type for barge IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BargeId(pub SimId);

/// A wrapper type for container IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContainerId(pub SimId);

impl fmt::Display for TerminalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Terminal#{}", self.0 .0)
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Service#{}", self.0 .0)
    }
}

impl fmt::Display for BargeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Barge#{}", self.0 .0)
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Container#{}", self.0 .0)
    }
}

/// Lifecycle of a barge
///
/// `Idle -> Loading -> InTransit -> Unloading -> Idle`. `Maintenance` is only
/// entered and left through operator actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BargeStatus {
    Idle,
    Loading,
    InTransit,
    Unloading,
    Maintenance,
}

impl fmt::Display for BargeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BargeStatus::Idle => "idle",
            BargeStatus::Loading => "loading",
            BargeStatus::InTransit => "in_transit",
            BargeStatus::Unloading => "unloading",
            BargeStatus::Maintenance => "maintenance",
        };
        f.write_str(name)
    }
}

/// Lifecycle of a container request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContainerStatus {
    /// Staged at the origin terminal
    Waiting,
    /// Aboard exactly one barge
    InTransit,
    /// Handed over at the destination; terminal state
    Delivered,
}

impl ContainerStatus {
    /// Container statuses only move forward, one step at a time
    pub fn can_advance_to(self, next: ContainerStatus) -> bool {
        matches!(
            (self, next),
            (ContainerStatus::Waiting, ContainerStatus::InTransit)
                | (ContainerStatus::InTransit, ContainerStatus::Delivered)
        )
    }
}

impl fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContainerStatus::Waiting => "waiting",
            ContainerStatus::InTransit => "in_transit",
            ContainerStatus::Delivered => "delivered",
        };
        f.write_str(name)
    }
}
