//! Container network simulation
//!
//! This module contains the entity model, the registry that owns it, the
//! simulation clock, the per-tick assignment engine and the metrics
//! reporter. It has no I/O of its own; a driver steps it and reads it back.

mod barge;
mod clock;
mod config;
mod container;
mod engine;
mod error;
mod metrics;
mod network;
mod registry;
mod service;
mod terminal;
mod types;
mod world;

pub use barge::Barge;
pub use clock::SimClock;
pub use config::{DeparturePolicy, SimConfig, DEFAULT_STEP_MINUTES};
pub use container::{Container, UrgencyKey};
pub use engine::{run_tick, select_service, TickSummary};
pub use error::{SimError, SimResult};
pub use metrics::{terminal_utilization, MetricsReporter, Report};
pub use network::{ServiceEdge, ServiceNetwork};
pub use registry::Registry;
pub use service::Service;
pub use terminal::Terminal;
pub use types::{
    BargeId, BargeStatus, ContainerId, ContainerStatus, Duration, ServiceId, SimId, TerminalId,
    Timestamp,
};
pub use world::{Simulation, Snapshot};
