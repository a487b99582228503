//! Assignment engine
//!
//! One tick runs three phases in a fixed order against the registry:
//! barge advancement, idle barge to service matching, and container
//! transfers. All decisions within a tick are made against `now`, the clock
//! time at the start of the tick.

use std::cmp::Reverse;

use log::{debug, warn};

use super::config::{DeparturePolicy, SimConfig};
use super::error::{SimError, SimResult};
use super::registry::Registry;
use super::types::{
    BargeId, BargeStatus, ContainerId, ContainerStatus, ServiceId, TerminalId, Timestamp,
};

/// Counts of the transitions applied during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Idle barges committed to a service
    pub committed: usize,
    /// Loaded barges that left their origin
    pub departed: usize,
    /// Commitments dropped because nothing was loaded
    pub released: usize,
    /// Barges that reached their destination
    pub arrived: usize,
    /// Containers moved aboard a barge
    pub loaded: usize,
    /// Containers handed over at their destination
    pub delivered: usize,
}

fn fault(msg: String) -> SimError {
    SimError::ConsistencyFault(msg)
}

/// Apply one round of state transitions and verify the invariants
pub fn run_tick(
    registry: &mut Registry,
    now: Timestamp,
    config: &SimConfig,
) -> SimResult<TickSummary> {
    let mut summary = TickSummary::default();

    advance_barges(registry, now, config.departure_policy, &mut summary)?;
    match_idle_barges(registry, now, config.departure_policy, &mut summary)?;
    transfer_containers(registry, now, &mut summary)?;

    registry.check_invariants()?;
    Ok(summary)
}

/// Phase 1: move committed barges along their services
fn advance_barges(
    registry: &mut Registry,
    now: Timestamp,
    policy: DeparturePolicy,
    summary: &mut TickSummary,
) -> SimResult<()> {
    let barge_ids: Vec<BargeId> = registry.barges().map(|b| b.id).collect();

    for barge_id in barge_ids {
        match registry.barge(barge_id)?.status {
            BargeStatus::Loading => depart_if_ready(registry, barge_id, now, policy, summary)?,
            BargeStatus::InTransit => arrive_if_due(registry, barge_id, now, summary)?,
            BargeStatus::Unloading => {
                let barge = registry.barge_mut(barge_id)?;
                if barge.containers.is_empty() {
                    barge.status = BargeStatus::Idle;
                    debug!("{} finished unloading", barge_id);
                }
            }
            BargeStatus::Idle | BargeStatus::Maintenance => {}
        }
    }

    Ok(())
}

fn committed_service(registry: &Registry, barge_id: BargeId) -> SimResult<ServiceId> {
    registry
        .barge(barge_id)?
        .current_service
        .ok_or_else(|| fault(format!("{} is underway without a service", barge_id)))
}

fn depart_if_ready(
    registry: &mut Registry,
    barge_id: BargeId,
    now: Timestamp,
    policy: DeparturePolicy,
    summary: &mut TickSummary,
) -> SimResult<()> {
    let service_id = committed_service(registry, barge_id)?;
    let barge = registry.barge(barge_id)?;
    let committed_at = barge
        .committed_at
        .ok_or_else(|| fault(format!("{} is loading without a commitment time", barge_id)))?;
    let empty = barge.containers.is_empty();

    let service = registry.service(service_id)?;
    let ready = match policy {
        DeparturePolicy::Opportunistic => now > committed_at,
        DeparturePolicy::Scheduled => match service.next_departure(committed_at) {
            Some(slot) => now >= slot,
            None => now > committed_at,
        },
    };
    if !ready {
        return Ok(());
    }

    if empty {
        registry.service_mut(service_id)?.release()?;
        registry
            .barge_mut(barge_id)?
            .end_commitment(BargeStatus::Idle);
        summary.released += 1;
        warn!(
            "{} released {} without loading any container",
            barge_id, service_id
        );
        return Ok(());
    }

    let barge = registry.barge_mut(barge_id)?;
    barge.status = BargeStatus::InTransit;
    barge.departed_at = Some(now);
    barge.current_terminal = None;
    summary.departed += 1;
    debug!(
        "{} departed on {} with {} containers",
        barge_id,
        service_id,
        barge.containers.len()
    );
    Ok(())
}

fn arrive_if_due(
    registry: &mut Registry,
    barge_id: BargeId,
    now: Timestamp,
    summary: &mut TickSummary,
) -> SimResult<()> {
    let service_id = committed_service(registry, barge_id)?;
    let departed_at = registry
        .barge(barge_id)?
        .departed_at
        .ok_or_else(|| fault(format!("{} is in transit without a departure time", barge_id)))?;

    let service = registry.service(service_id)?;
    let due = departed_at
        .checked_add_signed(service.duration)
        .ok_or_else(|| {
            SimError::TimeOverflow(format!(
                "{} on {} never arrives after {}",
                barge_id, service_id, departed_at
            ))
        })?;
    if now < due {
        return Ok(());
    }
    let destination = service.destination;

    let service = registry.service_mut(service_id)?;
    service.release()?;
    service.completed_trips += 1;

    let barge = registry.barge_mut(barge_id)?;
    barge.current_terminal = Some(destination);
    barge.end_commitment(BargeStatus::Unloading);
    summary.arrived += 1;
    debug!("{} arrived at {} via {}", barge_id, destination, service_id);
    Ok(())
}

/// Phase 2: commit idle barges to services with unclaimed demand
fn match_idle_barges(
    registry: &mut Registry,
    now: Timestamp,
    policy: DeparturePolicy,
    summary: &mut TickSummary,
) -> SimResult<()> {
    let barge_ids: Vec<BargeId> = registry
        .barges()
        .filter(|b| b.status == BargeStatus::Idle)
        .map(|b| b.id)
        .collect();

    for barge_id in barge_ids {
        let terminal = match registry.barge(barge_id)?.current_terminal {
            Some(terminal) => terminal,
            None => continue,
        };
        let service_id = match select_service(registry, terminal, now, policy) {
            Some(service_id) => service_id,
            None => continue,
        };

        registry.service_mut(service_id)?.commit()?;
        let barge = registry.barge_mut(barge_id)?;
        barge.status = BargeStatus::Loading;
        barge.current_service = Some(service_id);
        barge.committed_at = Some(now);
        summary.committed += 1;
        debug!("{} committed to {} at {}", barge_id, service_id, terminal);
    }

    Ok(())
}

/// Pick the service an idle barge at `terminal` should commit to
///
/// A service qualifies when it leaves from `terminal`, has a free commitment
/// slot, and has more eligible waiting containers than the barges already
/// loading on the same lane can absorb. Qualifying services are ranked by the
/// most urgent eligible container: earliest due date, then highest priority,
/// then service id.
pub fn select_service(
    registry: &Registry,
    terminal: TerminalId,
    now: Timestamp,
    policy: DeparturePolicy,
) -> Option<ServiceId> {
    registry
        .services()
        .filter(|s| s.origin == terminal && s.has_free_slot())
        .filter(|s| {
            policy == DeparturePolicy::Opportunistic
                || s.schedule.is_empty()
                || s.next_departure(now).is_some()
        })
        .filter_map(|s| {
            let eligible: Vec<_> = registry
                .containers()
                .filter(|c| {
                    c.status == ContainerStatus::Waiting
                        && c.origin == s.origin
                        && c.destination == s.destination
                        && c.is_available(now)
                })
                .collect();

            // Barges loading on any service of the same lane share its containers
            let claimed: usize = registry
                .barges()
                .filter(|b| b.status == BargeStatus::Loading)
                .filter(|b| {
                    b.current_service
                        .and_then(|id| registry.service(id).ok())
                        .is_some_and(|other| {
                            other.origin == s.origin && other.destination == s.destination
                        })
                })
                .map(|b| b.spare_hold() as usize)
                .sum();
            if eligible.len() <= claimed {
                return None;
            }

            let urgent = eligible.iter().min_by_key(|c| c.urgency_key())?;
            Some(((urgent.due_date, Reverse(urgent.priority), s.id), s.id))
        })
        .min_by_key(|(rank, _)| *rank)
        .map(|(_, service_id)| service_id)
}

/// Phase 3: load waiting containers and deliver arrived ones
fn transfer_containers(
    registry: &mut Registry,
    now: Timestamp,
    summary: &mut TickSummary,
) -> SimResult<()> {
    let mut waiting: Vec<_> = registry
        .containers()
        .filter(|c| c.status == ContainerStatus::Waiting && c.is_available(now))
        .collect();
    waiting.sort_by_key(|c| c.urgency_key());
    let waiting: Vec<ContainerId> = waiting.into_iter().map(|c| c.id).collect();

    for container_id in waiting {
        if let Some(barge_id) = find_loading_barge(registry, container_id)? {
            load_container(registry, container_id, barge_id)?;
            summary.loaded += 1;
        }
    }

    let in_transit: Vec<ContainerId> = registry
        .containers()
        .filter(|c| c.status == ContainerStatus::InTransit)
        .map(|c| c.id)
        .collect();

    for container_id in in_transit {
        let destination = registry.container(container_id)?.destination;
        let carrier = registry
            .carrier_of(container_id)
            .ok_or_else(|| fault(format!("{} is in transit but aboard no barge", container_id)))?;
        if carrier.current_terminal == Some(destination) {
            let carrier_id = carrier.id;
            deliver_container(registry, container_id, carrier_id, now)?;
            summary.delivered += 1;
        }
    }

    Ok(())
}

/// First loading barge at the container's origin with spare hold that is
/// bound for the container's destination
fn find_loading_barge(
    registry: &Registry,
    container_id: ContainerId,
) -> SimResult<Option<BargeId>> {
    let container = registry.container(container_id)?;

    for barge in registry.barges() {
        if barge.status != BargeStatus::Loading
            || barge.current_terminal != Some(container.origin)
            || !barge.has_spare_hold()
        {
            continue;
        }
        let service_id = committed_service(registry, barge.id)?;
        if registry.service(service_id)?.destination == container.destination {
            return Ok(Some(barge.id));
        }
    }

    Ok(None)
}

fn load_container(
    registry: &mut Registry,
    container_id: ContainerId,
    barge_id: BargeId,
) -> SimResult<()> {
    let container = registry.container_mut(container_id)?;
    container.advance(ContainerStatus::InTransit)?;
    let origin = container.origin;

    registry.barge_mut(barge_id)?.load(container_id)?;
    registry.terminal_mut(origin)?.release_container()?;
    debug!("{} loaded onto {} at {}", container_id, barge_id, origin);
    Ok(())
}

fn deliver_container(
    registry: &mut Registry,
    container_id: ContainerId,
    barge_id: BargeId,
    now: Timestamp,
) -> SimResult<()> {
    registry.barge_mut(barge_id)?.unload(container_id)?;

    let container = registry.container_mut(container_id)?;
    container.advance(ContainerStatus::Delivered)?;
    container.delivered_at = Some(now);
    debug!(
        "{} delivered at {} by {}",
        container_id, container.destination, barge_id
    );
    Ok(())
}
