//! Entity registry
//!
//! The registry is the sole owner of every terminal, service, barge and
//! container. Everything else refers to entities by identifier. Entities are
//! kept in `BTreeMap`s keyed by ids drawn from a single counter, so iteration
//! follows creation order.

use std::collections::{BTreeMap, HashMap, HashSet};

use super::barge::Barge;
use super::container::Container;
use super::error::{SimError, SimResult};
use super::service::Service;
use super::terminal::Terminal;
use super::types::{
    BargeId, BargeStatus, ContainerId, ContainerStatus, Duration, ServiceId, SimId, TerminalId,
    Timestamp,
};

#[derive(Debug, Clone, Default)]
pub struct Registry {
    terminals: BTreeMap<TerminalId, Terminal>,
    services: BTreeMap<ServiceId, Service>,
    barges: BTreeMap<BargeId, Barge>,
    containers: BTreeMap<ContainerId, Container>,

    /// Next ID to assign
    next_id: usize,
}

fn invalid(msg: impl Into<String>) -> SimError {
    SimError::InvalidRequest(msg.into())
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_sim_id(&mut self) -> SimId {
        let id = SimId(self.next_id);
        self.next_id += 1;
        id
    }

    fn ensure_terminal(&self, id: TerminalId, role: &str) -> SimResult<()> {
        if self.terminals.contains_key(&id) {
            Ok(())
        } else {
            Err(invalid(format!("{} terminal {} does not exist", role, id)))
        }
    }

    /// Add a terminal with the given storage capacity
    pub fn add_terminal(&mut self, name: &str, capacity: u32) -> SimResult<TerminalId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(invalid("terminal name must not be empty"));
        }
        if capacity == 0 {
            return Err(invalid(format!("terminal {} needs a positive capacity", name)));
        }
        if self.terminals.values().any(|t| t.name == name) {
            return Err(invalid(format!("terminal name {} is already taken", name)));
        }

        let id = TerminalId(self.next_sim_id());
        self.terminals.insert(id, Terminal::new(id, name, capacity));
        Ok(id)
    }

    /// Add a service from `origin` to `destination`
    pub fn add_service(
        &mut self,
        origin: TerminalId,
        destination: TerminalId,
        capacity: u32,
        duration: Duration,
        schedule: Vec<Timestamp>,
    ) -> SimResult<ServiceId> {
        self.ensure_terminal(origin, "origin")?;
        self.ensure_terminal(destination, "destination")?;
        if origin == destination {
            return Err(invalid("service origin and destination must differ"));
        }
        if capacity == 0 {
            return Err(invalid("service needs a positive capacity"));
        }
        if duration <= Duration::zero() {
            return Err(invalid("service needs a positive duration"));
        }

        let id = ServiceId(self.next_sim_id());
        let service = Service::new(id, origin, destination, capacity, duration, schedule);
        self.services.insert(id, service);
        Ok(id)
    }

    /// Add a barge, optionally moored at a home terminal
    pub fn add_barge(
        &mut self,
        capacity: u32,
        home_terminal: Option<TerminalId>,
    ) -> SimResult<BargeId> {
        if let Some(home) = home_terminal {
            self.ensure_terminal(home, "home")?;
        }
        if capacity == 0 {
            return Err(invalid("barge needs a positive capacity"));
        }

        let id = BargeId(self.next_sim_id());
        self.barges.insert(id, Barge::new(id, capacity, home_terminal));
        Ok(id)
    }

    /// Register a shipment request; the container is staged at its origin
    #[allow(clippy::too_many_arguments)]
    pub fn add_container_request(
        &mut self,
        kind: &str,
        origin: TerminalId,
        destination: TerminalId,
        available_date: Timestamp,
        due_date: Timestamp,
        priority: i32,
        request_date: Timestamp,
    ) -> SimResult<ContainerId> {
        self.ensure_terminal(origin, "origin")?;
        self.ensure_terminal(destination, "destination")?;
        if kind.trim().is_empty() {
            return Err(invalid("container type must not be empty"));
        }
        if origin == destination {
            return Err(invalid("container origin and destination must differ"));
        }
        if due_date < available_date {
            return Err(invalid(format!(
                "due date {} precedes available date {}",
                due_date, available_date
            )));
        }

        self.terminal_mut(origin)?.stage_container()?;

        let id = ContainerId(self.next_sim_id());
        let container = Container::new(
            id,
            kind.trim(),
            origin,
            destination,
            request_date,
            available_date,
            due_date,
            priority,
        );
        self.containers.insert(id, container);
        Ok(id)
    }

    pub fn terminal(&self, id: TerminalId) -> SimResult<&Terminal> {
        self.terminals
            .get(&id)
            .ok_or_else(|| SimError::UnknownEntity(id.to_string()))
    }

    pub fn service(&self, id: ServiceId) -> SimResult<&Service> {
        self.services
            .get(&id)
            .ok_or_else(|| SimError::UnknownEntity(id.to_string()))
    }

    pub fn barge(&self, id: BargeId) -> SimResult<&Barge> {
        self.barges
            .get(&id)
            .ok_or_else(|| SimError::UnknownEntity(id.to_string()))
    }

    pub fn container(&self, id: ContainerId) -> SimResult<&Container> {
        self.containers
            .get(&id)
            .ok_or_else(|| SimError::UnknownEntity(id.to_string()))
    }

    pub(crate) fn terminal_mut(&mut self, id: TerminalId) -> SimResult<&mut Terminal> {
        self.terminals
            .get_mut(&id)
            .ok_or_else(|| SimError::UnknownEntity(id.to_string()))
    }

    pub(crate) fn service_mut(&mut self, id: ServiceId) -> SimResult<&mut Service> {
        self.services
            .get_mut(&id)
            .ok_or_else(|| SimError::UnknownEntity(id.to_string()))
    }

    pub(crate) fn barge_mut(&mut self, id: BargeId) -> SimResult<&mut Barge> {
        self.barges
            .get_mut(&id)
            .ok_or_else(|| SimError::UnknownEntity(id.to_string()))
    }

    pub(crate) fn container_mut(&mut self, id: ContainerId) -> SimResult<&mut Container> {
        self.containers
            .get_mut(&id)
            .ok_or_else(|| SimError::UnknownEntity(id.to_string()))
    }

    pub fn terminals(&self) -> impl Iterator<Item = &Terminal> {
        self.terminals.values()
    }

    pub fn services(&self) -> impl Iterator<Item = &Service> {
        self.services.values()
    }

    pub fn barges(&self) -> impl Iterator<Item = &Barge> {
        self.barges.values()
    }

    pub fn containers(&self) -> impl Iterator<Item = &Container> {
        self.containers.values()
    }

    pub fn terminal_by_name(&self, name: &str) -> Option<&Terminal> {
        self.terminals.values().find(|t| t.name == name)
    }

    /// The barge whose manifest holds the container, if any
    pub fn carrier_of(&self, container_id: ContainerId) -> Option<&Barge> {
        self.barges.values().find(|b| b.carries(container_id))
    }

    /// Take an idle barge out of service
    pub fn set_barge_maintenance(&mut self, id: BargeId) -> SimResult<()> {
        let barge = self.barge_mut(id)?;
        if barge.status != BargeStatus::Idle {
            return Err(invalid(format!(
                "{} is {} and cannot enter maintenance",
                id, barge.status
            )));
        }
        barge.status = BargeStatus::Maintenance;
        Ok(())
    }

    /// Return a barge from maintenance to idle
    pub fn release_barge_maintenance(&mut self, id: BargeId) -> SimResult<()> {
        let barge = self.barge_mut(id)?;
        if barge.status != BargeStatus::Maintenance {
            return Err(invalid(format!("{} is not in maintenance", id)));
        }
        barge.status = BargeStatus::Idle;
        Ok(())
    }

    /// Verify the cross-entity invariants, reporting the first violation
    pub fn check_invariants(&self) -> SimResult<()> {
        let fault = |msg: String| Err(SimError::ConsistencyFault(msg));

        let mut staged: HashMap<TerminalId, u32> = HashMap::new();
        for container in self.containers.values() {
            if container.status == ContainerStatus::Waiting {
                *staged.entry(container.origin).or_default() += 1;
            }
        }
        for terminal in self.terminals.values() {
            if terminal.current_containers > terminal.capacity {
                return fault(format!(
                    "terminal {} holds {} of {}",
                    terminal.name, terminal.current_containers, terminal.capacity
                ));
            }
            let expected = staged.get(&terminal.id).copied().unwrap_or(0);
            if terminal.current_containers != expected {
                return fault(format!(
                    "terminal {} counts {} containers but {} are staged",
                    terminal.name, terminal.current_containers, expected
                ));
            }
        }

        let mut commitments: HashMap<ServiceId, u32> = HashMap::new();
        let mut aboard: HashSet<ContainerId> = HashSet::new();
        for barge in self.barges.values() {
            if barge.containers.len() > barge.capacity as usize {
                return fault(format!(
                    "{} carries {} of {}",
                    barge.id,
                    barge.containers.len(),
                    barge.capacity
                ));
            }
            if let Some(service_id) = barge.current_service {
                *commitments.entry(service_id).or_default() += 1;
            }
            for container_id in &barge.containers {
                if !aboard.insert(*container_id) {
                    return fault(format!("{} is aboard more than one barge", container_id));
                }
                match self.containers.get(container_id) {
                    Some(c) if c.status == ContainerStatus::InTransit => {}
                    Some(c) => {
                        return fault(format!("{} is aboard {} but {}", c.id, barge.id, c.status))
                    }
                    None => return fault(format!("{} carries unknown {}", barge.id, container_id)),
                }
            }
        }

        for service in self.services.values() {
            if service.current_load > service.capacity {
                return fault(format!(
                    "{} has {} commitments of {}",
                    service.id, service.current_load, service.capacity
                ));
            }
            let committed = commitments.get(&service.id).copied().unwrap_or(0);
            if service.current_load != committed {
                return fault(format!(
                    "{} counts {} commitments but {} barges are committed",
                    service.id, service.current_load, committed
                ));
            }
        }

        for container in self.containers.values() {
            if container.status == ContainerStatus::InTransit && !aboard.contains(&container.id) {
                return fault(format!("{} is in transit but aboard no barge", container.id));
            }
        }

        Ok(())
    }
}
