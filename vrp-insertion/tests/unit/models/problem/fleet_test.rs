use super::*;
use crate::helpers::models::problem::*;

#[test]
fn can_create_actor_per_vehicle_shift() {
    let vehicle = VehicleBuilder::default()
        .id("v1")
        .details(vec![
            VehicleDetail { start: 1, end: None, time: None },
            VehicleDetail { start: 2, end: Some(3), time: Some(TimeWindow::new(10., 20.)) },
        ])
        .build();

    let fleet = FleetBuilder::default().add_vehicle(vehicle).add_vehicle(test_vehicle_with_id("v2")).build();

    assert_eq!(fleet.actors.len(), 3);
    assert_eq!(fleet.actors[0].detail, ActorDetail { start: 1, end: 1, time: TimeWindow::max() });
    assert_eq!(fleet.actors[1].detail, ActorDetail { start: 2, end: 3, time: TimeWindow::new(10., 20.) });
    assert_eq!(fleet.profiles, vec![0]);
}

#[test]
fn can_reject_fleet_without_vehicles_or_with_many_drivers() {
    let driver = || Arc::new(test_driver());

    assert_eq!(Fleet::new(vec![driver()], vec![]).err(), Some(InsertionError::EmptyFleet));
    assert_eq!(
        Fleet::new(vec![driver(), driver()], vec![Arc::new(test_vehicle_with_id("v1"))]).err(),
        Some(InsertionError::EmptyFleet)
    );
}

#[test]
fn can_validate_capacity_when_jobs_have_demand() {
    let fleet = FleetBuilder::default().add_vehicle(test_vehicle_with_id("v1")).build();

    assert_eq!(fleet.validate_capacity(false), Ok(()));
    assert_eq!(fleet.validate_capacity(true), Err(InsertionError::MissingCapacity("v1".to_string())));
}

#[test]
fn can_use_type_id_or_vehicle_id_as_actor_key() {
    let fleet = FleetBuilder::default()
        .add_vehicle(VehicleBuilder::default().id("v1").type_id("small").build())
        .add_vehicle(VehicleBuilder::default().id("v2").type_id("small").build())
        .add_vehicle(VehicleBuilder::default().id("v3").build())
        .build();

    let keys = fleet.actors.iter().map(|actor| ActorKey::new(actor)).collect::<Vec<_>>();

    assert_eq!(keys[0], keys[1]);
    assert_eq!(keys[0].type_id, "small");
    assert_eq!(keys[2].type_id, "v3");
}

#[test]
fn can_compare_actors_by_reference() {
    let fleet =
        FleetBuilder::default().add_vehicle(test_vehicle_with_id("v1")).add_vehicle(test_vehicle_with_id("v2")).build();

    assert!(fleet.actors[0] == fleet.actors[0].clone());
    assert!(fleet.actors[0] != fleet.actors[1]);
}
