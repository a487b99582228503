//! Main simulation world that ties everything together
//!
//! `Simulation` owns the registry and the clock. An external driver calls
//! [`Simulation::step`] in its own loop; readers query reports or take an
//! immutable [`Snapshot`] between ticks.

use log::error;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use super::clock::SimClock;
use super::config::SimConfig;
use super::engine::{self, TickSummary};
use super::error::{SimError, SimResult};
use super::metrics::{MetricsReporter, Report};
use super::network::ServiceNetwork;
use super::registry::Registry;
use super::types::{BargeId, ContainerId, Duration, ServiceId, TerminalId, Timestamp};

/// Immutable copy of the simulation state taken at a tick boundary
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub time: Timestamp,
    pub tick: u64,
    pub registry: Registry,
}

impl Snapshot {
    pub fn report(&self) -> SimResult<Report> {
        MetricsReporter::new(&self.registry, self.time).report()
    }
}

/// The main simulation world
pub struct Simulation {
    registry: Registry,
    clock: SimClock,
    config: SimConfig,
}

impl Simulation {
    pub fn new(config: SimConfig) -> SimResult<Self> {
        if config.step <= Duration::zero() {
            return Err(SimError::InvalidRequest(
                "simulation step must be positive".to_string(),
            ));
        }
        let epoch = config
            .epoch
            .unwrap_or_else(|| chrono::Local::now().naive_local());
        let clock = SimClock::new(epoch, config.step);
        clock.next_time()?;
        Ok(Self {
            registry: Registry::new(),
            clock,
            config,
        })
    }

    /// Create a simulation starting at `epoch` with default settings
    pub fn starting_at(epoch: Timestamp) -> Self {
        let config = SimConfig::default().with_epoch(epoch);
        Self {
            registry: Registry::new(),
            clock: SimClock::new(epoch, config.step),
            config,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn current_time(&self) -> Timestamp {
        self.clock.now()
    }

    /// Number of completed ticks
    pub fn tick_count(&self) -> u64 {
        self.clock.ticks()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn network(&self) -> ServiceNetwork {
        ServiceNetwork::from_registry(&self.registry)
    }

    pub fn add_terminal(&mut self, name: &str, capacity: u32) -> SimResult<TerminalId> {
        self.registry.add_terminal(name, capacity)
    }

    pub fn add_service(
        &mut self,
        origin: TerminalId,
        destination: TerminalId,
        capacity: u32,
        duration: Duration,
        schedule: Vec<Timestamp>,
    ) -> SimResult<ServiceId> {
        if self.clock.now().checked_add_signed(duration).is_none() {
            return Err(SimError::InvalidRequest(format!(
                "service duration {} runs past the end of the calendar",
                duration
            )));
        }
        self.registry
            .add_service(origin, destination, capacity, duration, schedule)
    }

    pub fn add_barge(
        &mut self,
        capacity: u32,
        home_terminal: Option<TerminalId>,
    ) -> SimResult<BargeId> {
        self.registry.add_barge(capacity, home_terminal)
    }

    /// Register a shipment request dated at the current simulation time
    pub fn add_container_request(
        &mut self,
        kind: &str,
        origin: TerminalId,
        destination: TerminalId,
        available_date: Timestamp,
        due_date: Timestamp,
        priority: i32,
    ) -> SimResult<ContainerId> {
        let request_date = self.clock.now();
        self.registry.add_container_request(
            kind,
            origin,
            destination,
            available_date,
            due_date,
            priority,
            request_date,
        )
    }

    pub fn set_barge_maintenance(&mut self, barge_id: BargeId) -> SimResult<()> {
        self.registry.set_barge_maintenance(barge_id)
    }

    pub fn release_barge_maintenance(&mut self, barge_id: BargeId) -> SimResult<()> {
        self.registry.release_barge_maintenance(barge_id)
    }

    /// Main simulation tick
    ///
    /// The tick runs on a working copy of the registry which replaces the
    /// live one only once every invariant holds. On failure the state and
    /// the clock are exactly as before the call.
    pub fn step(&mut self) -> SimResult<TickSummary> {
        let now = self.clock.now();
        let mut working = self.registry.clone();

        let result = engine::run_tick(&mut working, now, &self.config)
            .and_then(|summary| self.clock.advance().map(|()| summary));
        match result {
            Ok(summary) => {
                self.registry = working;
                Ok(summary)
            }
            Err(err) => {
                error!("tick at {} aborted: {}", now, err);
                Err(err)
            }
        }
    }

    /// Run `ticks` steps, stopping at the first failure
    pub fn run(&mut self, ticks: u64) -> SimResult<TickSummary> {
        let mut total = TickSummary::default();
        for _ in 0..ticks {
            let summary = self.step()?;
            total.committed += summary.committed;
            total.departed += summary.departed;
            total.released += summary.released;
            total.arrived += summary.arrived;
            total.loaded += summary.loaded;
            total.delivered += summary.delivered;
        }
        Ok(total)
    }

    pub fn report(&self) -> SimResult<Report> {
        MetricsReporter::new(&self.registry, self.clock.now()).report()
    }

    pub fn overdue_containers(&self) -> Vec<ContainerId> {
        MetricsReporter::new(&self.registry, self.clock.now()).overdue_containers()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            time: self.clock.now(),
            tick: self.clock.ticks(),
            registry: self.registry.clone(),
        }
    }

    /// Create the three-terminal demo network with `containers` random
    /// requests drawn from a seeded RNG
    pub fn sample_network(config: SimConfig, seed: u64, containers: usize) -> SimResult<Self> {
        let mut sim = Self::new(config)?;
        let mut rng = StdRng::seed_from_u64(seed);
        let start = sim.current_time();

        let terminal_a = sim.add_terminal("Terminal A", 1000)?;
        let terminal_b = sim.add_terminal("Terminal B", 800)?;
        let terminal_c = sim.add_terminal("Terminal C", 1200)?;

        // A to B every 4 hours, B to C every 6 hours, over one day
        let schedule_ab = (0..6).map(|i| start + Duration::hours(i * 4)).collect();
        sim.add_service(terminal_a, terminal_b, 100, Duration::hours(2), schedule_ab)?;
        let schedule_bc = (0..4).map(|i| start + Duration::hours(i * 6)).collect();
        sim.add_service(terminal_b, terminal_c, 150, Duration::hours(3), schedule_bc)?;

        sim.add_barge(50, Some(terminal_a))?;
        sim.add_barge(75, Some(terminal_b))?;

        let lanes = [
            (terminal_a, terminal_b),
            (terminal_b, terminal_c),
            (terminal_a, terminal_c),
        ];
        for _ in 0..containers {
            let (origin, destination) = lanes[rng.random_range(0..lanes.len())];
            let available = start + Duration::hours(rng.random_range(0..6));
            let due = available + Duration::hours(rng.random_range(6..24));
            let priority = rng.random_range(1..=3);
            sim.add_container_request("TEU", origin, destination, available, due, priority)?;
        }

        Ok(sim)
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        println!("=== Container Network Summary ===");
        println!("Time: {}", self.current_time().format("%Y-%m-%d %H:%M"));
        println!(
            "Terminals: {}, Services: {}, Barges: {}, Containers: {}",
            self.registry.terminals().count(),
            self.registry.services().count(),
            self.registry.barges().count(),
            self.registry.containers().count()
        );

        println!("--- Terminals ---");
        for terminal in self.registry.terminals() {
            println!(
                "  {}: {}/{} containers",
                terminal.name, terminal.current_containers, terminal.capacity
            );
        }

        println!("--- Services ---");
        for service in self.registry.services() {
            println!(
                "  {} {} -> {}: {}/{} barges, {} trips completed",
                service.id,
                self.terminal_name(service.origin),
                self.terminal_name(service.destination),
                service.current_load,
                service.capacity,
                service.completed_trips
            );
        }

        println!("--- Barges ---");
        for barge in self.registry.barges() {
            let location = match barge.current_terminal {
                Some(terminal) => self.terminal_name(terminal),
                None => "underway".to_string(),
            };
            println!(
                "  {}: {} at {} ({}/{} containers)",
                barge.id,
                barge.status,
                location,
                barge.containers.len(),
                barge.capacity
            );
        }
    }

    /// Print the service network as an edge list
    pub fn print_network(&self) {
        let network = self.network();
        println!("\n=== Service Network ===");
        println!(
            "{} terminals, {} services",
            network.terminal_count(),
            network.service_count()
        );
        for edge in network.edges() {
            println!(
                "  {} --[{}]--> {}",
                self.terminal_name(edge.origin),
                edge.service_id,
                self.terminal_name(edge.destination)
            );
        }
        println!();
    }

    fn terminal_name(&self, id: TerminalId) -> String {
        self.registry
            .terminal(id)
            .map(|t| t.name.clone())
            .unwrap_or_else(|_| id.to_string())
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::starting_at(chrono::Local::now().naive_local())
    }
}
