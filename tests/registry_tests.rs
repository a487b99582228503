//! Registry creation, validation and lookup tests

use barge_sim::simulation::{
    BargeId, BargeStatus, ContainerStatus, Duration, Registry, SimError, SimId, Simulation,
    TerminalId, Timestamp,
};
use chrono::NaiveDate;
use std::collections::HashSet;

fn epoch() -> Timestamp {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

#[test]
fn test_creation_assigns_default_state() {
    let mut sim = Simulation::starting_at(epoch());
    let t1 = sim.add_terminal("Terminal A", 100).unwrap();
    let t2 = sim.add_terminal("Terminal B", 80).unwrap();
    let service = sim
        .add_service(t1, t2, 5, Duration::hours(2), Vec::new())
        .unwrap();
    let barge = sim.add_barge(10, Some(t1)).unwrap();
    let container = sim
        .add_container_request("TEU", t1, t2, epoch(), epoch() + Duration::hours(24), 1)
        .unwrap();

    let registry = sim.registry();
    assert_eq!(registry.terminal(t2).unwrap().current_containers, 0);
    assert_eq!(registry.service(service).unwrap().current_load, 0);

    let barge = registry.barge(barge).unwrap();
    assert_eq!(barge.status, BargeStatus::Idle);
    assert_eq!(barge.current_terminal, Some(t1));
    assert!(barge.current_service.is_none());
    assert!(barge.containers.is_empty());

    let container = registry.container(container).unwrap();
    assert_eq!(container.status, ContainerStatus::Waiting);
    assert_eq!(container.request_date, epoch());
    assert_eq!(container.kind, "TEU");
}

#[test]
fn test_request_is_staged_at_origin() {
    let mut sim = Simulation::starting_at(epoch());
    let t1 = sim.add_terminal("Terminal A", 100).unwrap();
    let t2 = sim.add_terminal("Terminal B", 100).unwrap();

    for _ in 0..3 {
        sim.add_container_request("TEU", t1, t2, epoch(), epoch() + Duration::hours(4), 1)
            .unwrap();
    }

    assert_eq!(sim.registry().terminal(t1).unwrap().current_containers, 3);
    assert_eq!(sim.registry().terminal(t2).unwrap().current_containers, 0);
    assert!(sim.registry().check_invariants().is_ok());
}

#[test]
fn test_full_origin_rejects_request() {
    let mut sim = Simulation::starting_at(epoch());
    let t1 = sim.add_terminal("Small Quay", 1).unwrap();
    let t2 = sim.add_terminal("Terminal B", 100).unwrap();
    let due = epoch() + Duration::hours(4);

    sim.add_container_request("TEU", t1, t2, epoch(), due, 1)
        .unwrap();
    let err = sim
        .add_container_request("TEU", t1, t2, epoch(), due, 1)
        .unwrap_err();
    assert_eq!(err, SimError::TerminalFull("Small Quay".to_string()));
    assert_eq!(sim.registry().containers().count(), 1);
}

#[test]
fn test_ids_are_unique_and_iterate_in_creation_order() {
    let mut registry = Registry::new();
    let names = ["North", "South", "East", "West"];
    let ids: Vec<TerminalId> = names
        .iter()
        .map(|name| registry.add_terminal(name, 10).unwrap())
        .collect();

    let iterated: Vec<&str> = registry.terminals().map(|t| t.name.as_str()).collect();
    assert_eq!(iterated, names);

    let unique: HashSet<TerminalId> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len());
}

#[test]
fn test_non_positive_capacities_are_rejected() {
    let mut sim = Simulation::starting_at(epoch());
    assert!(matches!(
        sim.add_terminal("Empty", 0),
        Err(SimError::InvalidRequest(_))
    ));

    let t1 = sim.add_terminal("Terminal A", 10).unwrap();
    let t2 = sim.add_terminal("Terminal B", 10).unwrap();
    assert!(matches!(
        sim.add_service(t1, t2, 0, Duration::hours(1), Vec::new()),
        Err(SimError::InvalidRequest(_))
    ));
    assert!(matches!(
        sim.add_barge(0, Some(t1)),
        Err(SimError::InvalidRequest(_))
    ));
}

#[test]
fn test_malformed_requests_are_rejected() {
    let mut sim = Simulation::starting_at(epoch());
    let t1 = sim.add_terminal("Terminal A", 10).unwrap();
    let t2 = sim.add_terminal("Terminal B", 10).unwrap();

    // Due before available
    assert!(matches!(
        sim.add_container_request("TEU", t1, t2, epoch() + Duration::hours(5), epoch(), 1),
        Err(SimError::InvalidRequest(_))
    ));
    // Same origin and destination
    assert!(matches!(
        sim.add_container_request("TEU", t1, t1, epoch(), epoch(), 1),
        Err(SimError::InvalidRequest(_))
    ));
    // Missing cargo type
    assert!(matches!(
        sim.add_container_request("  ", t1, t2, epoch(), epoch(), 1),
        Err(SimError::InvalidRequest(_))
    ));
    // Service without transit time
    assert!(matches!(
        sim.add_service(t1, t2, 1, Duration::zero(), Vec::new()),
        Err(SimError::InvalidRequest(_))
    ));
    // Loop service
    assert!(matches!(
        sim.add_service(t1, t1, 1, Duration::hours(1), Vec::new()),
        Err(SimError::InvalidRequest(_))
    ));
    // Duplicate terminal name
    assert!(matches!(
        sim.add_terminal("Terminal A", 10),
        Err(SimError::InvalidRequest(_))
    ));

    assert_eq!(sim.registry().terminal(t1).unwrap().current_containers, 0);
}

#[test]
fn test_unknown_terminal_in_creation_call() {
    let mut sim = Simulation::starting_at(epoch());
    let t1 = sim.add_terminal("Terminal A", 10).unwrap();
    let ghost = TerminalId(SimId(999));

    assert!(matches!(
        sim.add_service(t1, ghost, 1, Duration::hours(1), Vec::new()),
        Err(SimError::InvalidRequest(_))
    ));
    assert!(matches!(
        sim.add_barge(5, Some(ghost)),
        Err(SimError::InvalidRequest(_))
    ));
    assert!(matches!(
        sim.add_container_request("TEU", ghost, t1, epoch(), epoch(), 1),
        Err(SimError::InvalidRequest(_))
    ));
}

#[test]
fn test_lookup_of_missing_entity() {
    let registry = Registry::new();
    let err = registry.barge(BargeId(SimId(7))).unwrap_err();
    assert_eq!(err, SimError::UnknownEntity("Barge#7".to_string()));
    assert!(matches!(
        registry.terminal(TerminalId(SimId(0))),
        Err(SimError::UnknownEntity(_))
    ));
}

#[test]
fn test_schedule_is_sorted_and_queried() {
    let mut sim = Simulation::starting_at(epoch());
    let t1 = sim.add_terminal("Terminal A", 10).unwrap();
    let t2 = sim.add_terminal("Terminal B", 10).unwrap();
    let schedule = vec![
        epoch() + Duration::hours(8),
        epoch() + Duration::hours(2),
        epoch() + Duration::hours(4),
    ];
    let id = sim
        .add_service(t1, t2, 1, Duration::hours(1), schedule)
        .unwrap();

    let service = sim.registry().service(id).unwrap();
    assert_eq!(service.schedule[0], epoch() + Duration::hours(2));
    assert_eq!(
        service.next_departure(epoch() + Duration::hours(3)),
        Some(epoch() + Duration::hours(4))
    );
    assert_eq!(
        service.next_departure(epoch() + Duration::hours(4)),
        Some(epoch() + Duration::hours(4))
    );
    assert_eq!(service.next_departure(epoch() + Duration::hours(9)), None);
}

#[test]
fn test_maintenance_is_operator_controlled() {
    let mut sim = Simulation::starting_at(epoch());
    let t1 = sim.add_terminal("Terminal A", 10).unwrap();
    let barge = sim.add_barge(5, Some(t1)).unwrap();

    sim.set_barge_maintenance(barge).unwrap();
    assert_eq!(
        sim.registry().barge(barge).unwrap().status,
        BargeStatus::Maintenance
    );
    assert!(matches!(
        sim.set_barge_maintenance(barge),
        Err(SimError::InvalidRequest(_))
    ));

    sim.release_barge_maintenance(barge).unwrap();
    assert_eq!(sim.registry().barge(barge).unwrap().status, BargeStatus::Idle);
    assert!(matches!(
        sim.release_barge_maintenance(barge),
        Err(SimError::InvalidRequest(_))
    ));
    assert!(matches!(
        sim.set_barge_maintenance(BargeId(SimId(42))),
        Err(SimError::UnknownEntity(_))
    ));
}
