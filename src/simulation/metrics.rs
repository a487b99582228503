//! Metrics reporter
//!
//! Aggregate statistics derived from the registry. Nothing here mutates
//! simulation state, so a report can be taken at any tick boundary.

use std::collections::BTreeMap;
use std::fmt;

use super::error::SimResult;
use super::network::ServiceNetwork;
use super::registry::Registry;
use super::terminal::Terminal;
use super::types::{BargeStatus, ContainerId, ContainerStatus, Timestamp};

/// Snapshot of network performance at one point in time
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub time: Timestamp,
    pub total_containers: usize,
    pub delivered: usize,
    pub in_transit: usize,
    pub waiting: usize,
    /// Barges that are neither idle nor in maintenance
    pub active_barges: usize,
    pub idle_barges: usize,
    pub barges_in_maintenance: usize,
    pub total_barges: usize,
    /// Not yet delivered and past the due date
    pub overdue: usize,
    /// Delivered after the due date
    pub late_deliveries: usize,
    /// Waiting with no direct service from origin to destination
    pub stranded: usize,
    /// Storage in use per terminal name
    pub terminal_utilization: BTreeMap<String, f64>,
}

/// Storage in use per terminal name
pub fn terminal_utilization<'a>(
    terminals: impl IntoIterator<Item = &'a Terminal>,
) -> SimResult<BTreeMap<String, f64>> {
    terminals
        .into_iter()
        .map(|t| Ok((t.name.clone(), t.utilization()?)))
        .collect()
}

/// Read-only view computing metrics over a registry at time `now`
pub struct MetricsReporter<'a> {
    registry: &'a Registry,
    now: Timestamp,
}

impl<'a> MetricsReporter<'a> {
    pub fn new(registry: &'a Registry, now: Timestamp) -> Self {
        Self { registry, now }
    }

    pub fn report(&self) -> SimResult<Report> {
        let network = ServiceNetwork::from_registry(self.registry);

        let mut delivered = 0;
        let mut in_transit = 0;
        let mut waiting = 0;
        let mut overdue = 0;
        let mut late_deliveries = 0;
        let mut stranded = 0;
        let mut total_containers = 0;

        for container in self.registry.containers() {
            total_containers += 1;
            match container.status {
                ContainerStatus::Waiting => {
                    waiting += 1;
                    if !network.has_direct_service(container.origin, container.destination) {
                        stranded += 1;
                    }
                }
                ContainerStatus::InTransit => in_transit += 1,
                ContainerStatus::Delivered => {
                    delivered += 1;
                    if container.was_delivered_late() {
                        late_deliveries += 1;
                    }
                }
            }
            if container.is_overdue(self.now) {
                overdue += 1;
            }
        }

        let mut active_barges = 0;
        let mut idle_barges = 0;
        let mut barges_in_maintenance = 0;
        let mut total_barges = 0;
        for barge in self.registry.barges() {
            total_barges += 1;
            match barge.status {
                BargeStatus::Idle => idle_barges += 1,
                BargeStatus::Maintenance => barges_in_maintenance += 1,
                BargeStatus::Loading | BargeStatus::InTransit | BargeStatus::Unloading => {
                    active_barges += 1
                }
            }
        }

        Ok(Report {
            time: self.now,
            total_containers,
            delivered,
            in_transit,
            waiting,
            active_barges,
            idle_barges,
            barges_in_maintenance,
            total_barges,
            overdue,
            late_deliveries,
            stranded,
            terminal_utilization: terminal_utilization(self.registry.terminals())?,
        })
    }

    /// Containers still undelivered past their due date, most urgent first
    pub fn overdue_containers(&self) -> Vec<ContainerId> {
        let mut overdue: Vec<_> = self
            .registry
            .containers()
            .filter(|c| c.is_overdue(self.now))
            .collect();
        overdue.sort_by_key(|c| c.urgency_key());
        overdue.into_iter().map(|c| c.id).collect()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(50);
        writeln!(f, "{}", rule)?;
        writeln!(f, "Simulation Time: {}", self.time.format("%Y-%m-%d %H:%M"))?;
        writeln!(f, "{}", "-".repeat(50))?;
        writeln!(f, "Containers Status:")?;
        writeln!(f, "  Total: {}", self.total_containers)?;
        writeln!(f, "  Delivered: {}", self.delivered)?;
        writeln!(f, "  In Transit: {}", self.in_transit)?;
        writeln!(f, "  Waiting: {}", self.waiting)?;
        writeln!(f, "  Overdue: {}", self.overdue)?;
        writeln!(f, "  Delivered late: {}", self.late_deliveries)?;
        writeln!(f, "  Stranded: {}", self.stranded)?;
        writeln!(f)?;
        writeln!(
            f,
            "Active Barges: {}/{} (maintenance: {})",
            self.active_barges, self.total_barges, self.barges_in_maintenance
        )?;
        writeln!(f)?;
        writeln!(f, "Terminal Utilization:")?;
        for (terminal, utilization) in &self.terminal_utilization {
            writeln!(f, "  {}: {:.1}%", terminal, utilization * 100.0)?;
        }
        write!(f, "{}", rule)
    }
}
