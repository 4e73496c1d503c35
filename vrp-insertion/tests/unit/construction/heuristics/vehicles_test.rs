use super::*;
use crate::helpers::models::problem::*;
use crate::helpers::models::*;
use crate::models::Problem;
use crate::models::common::Demand;
use crate::models::problem::Costs;

fn expensive_costs() -> Costs {
    Costs { per_distance: 2., ..test_costs() }
}

fn create_problem(vehicles: Vec<(&str, &str, Costs)>, jobs: Vec<Job>) -> Arc<Problem> {
    let fleet = FleetBuilder::default()
        .add_vehicles(
            vehicles
                .into_iter()
                .map(|(id, type_id, costs)| VehicleBuilder::default().id(id).type_id(type_id).capacity(10).costs(costs).build())
                .collect(),
        )
        .build();

    create_test_problem(fleet, jobs)
}

fn create_job_type_calculator(problem: &Problem) -> Arc<dyn JobInsertionCalculator + Send + Sync> {
    let activity_cost: Arc<dyn ActivityInsertionCostCalculator + Send + Sync> =
        Arc::new(LocalActivityInsertionCostCalculator::new(problem.transport.clone(), problem.activity.clone()));

    Arc::new(JobTypeInsertionCalculator::new(
        Arc::new(ServiceInsertionCalculator::new(activity_cost.clone())),
        Arc::new(ShipmentInsertionCalculator::new(activity_cost)),
    ))
}

fn get_switched_vehicle(success: &InsertionSuccess) -> Option<String> {
    success.events.iter().find_map(|event| match event {
        InsertionEvent::SwitchVehicle { actor } => Some(get_vehicle_id(&actor.vehicle).clone()),
        InsertionEvent::InsertActivity { .. } => None,
    })
}

#[test]
fn can_select_cheapest_vehicle_type_for_new_route() {
    let job = test_single_with_id_and_location("job1", 5);
    let problem = create_problem(
        vec![("v1", "expensive", expensive_costs()), ("v2", "cheap", test_costs())],
        vec![job.clone()],
    );
    let insertion_ctx = create_test_insertion_ctx(problem.clone());
    let calculator = VehicleTypeDependentCalculator::new(create_job_type_calculator(problem.as_ref()));
    let route_ctx = create_new_route_placeholder(&insertion_ctx).unwrap();

    let result = calculator.evaluate(&insertion_ctx, &RouteCandidate { index: None, route_ctx: &route_ctx }, &job, None);

    let success = result.as_success().expect("should be success");
    assert_eq!(success.cost, 20.);
    assert_eq!(get_vehicle_id(&success.actor.vehicle), "v2");
    assert_eq!(get_switched_vehicle(success), Some("v2".to_string()));
    assert!(matches!(success.events.first(), Some(InsertionEvent::SwitchVehicle { .. })));
}

parameterized_test! {can_switch_vehicle_of_existing_empty_route, (current_costs, other_costs, expected_switch), {
    let job = test_single_with_id_and_location("job1", 5);
    let problem = create_problem(vec![("v1", "current", current_costs), ("v2", "other", other_costs)], vec![job.clone()]);
    let insertion_ctx = create_insertion_ctx_with_routes(problem.clone(), vec![("v1", vec![])]);
    let calculator = VehicleTypeDependentCalculator::new(create_job_type_calculator(problem.as_ref()));
    let candidate = RouteCandidate { index: Some(0), route_ctx: &insertion_ctx.solution.routes[0] };

    let result = calculator.evaluate(&insertion_ctx, &candidate, &job, None);

    let success = result.as_success().expect("should be success");
    assert_eq!(success.route_index, Some(0));
    assert_eq!(get_switched_vehicle(success), expected_switch.map(|id: &str| id.to_string()));
}}

can_switch_vehicle_of_existing_empty_route! {
    case01_cheaper_type_available: (expensive_costs(), test_costs(), Some("v2")),
    case02_current_is_cheaper: (test_costs(), expensive_costs(), None),
    case03_current_wins_on_tie: (test_costs(), test_costs(), None),
}

#[test]
fn can_keep_vehicle_of_route_with_jobs() {
    let job1 = test_single_with_id_and_location("job1", 5);
    let job2 = test_single_with_id_and_location("job2", 10);
    let problem = create_problem(
        vec![("v1", "expensive", expensive_costs()), ("v2", "cheap", test_costs())],
        vec![job1.clone(), job2.clone()],
    );
    let insertion_ctx = create_insertion_ctx_with_routes(problem.clone(), vec![("v1", vec![job1])]);
    let calculator = VehicleTypeDependentCalculator::new(create_job_type_calculator(problem.as_ref()));
    let candidate = RouteCandidate { index: Some(0), route_ctx: &insertion_ctx.solution.routes[0] };

    let result = calculator.evaluate(&insertion_ctx, &candidate, &job2, None);

    let success = result.as_success().expect("should be success");
    assert_eq!(get_switched_vehicle(success), None);
    assert_eq!(get_vehicle_id(&success.actor.vehicle), "v1");
}

#[test]
fn can_return_failure_when_no_vehicle_type_fits() {
    let job = SingleBuilder::default().id("job1").time_window(2000., 3000.).build_as_job_ref();
    let problem = create_problem(vec![("v1", "a", test_costs()), ("v2", "b", test_costs())], vec![job.clone()]);
    let insertion_ctx = create_test_insertion_ctx(problem.clone());
    let calculator = VehicleTypeDependentCalculator::new(create_job_type_calculator(problem.as_ref()));
    let route_ctx = create_new_route_placeholder(&insertion_ctx).unwrap();

    let result = calculator.evaluate(&insertion_ctx, &RouteCandidate { index: None, route_ctx: &route_ctx }, &job, None);

    assert_eq!(result.failure_code(), Some(crate::construction::constraints::TIME_CONSTRAINT_CODE));
}

parameterized_test! {can_blend_fixed_cost_by_completeness_ratio, (ratio, weight, expected), {
    let job = SingleBuilder::default().id("job1").location(5).demand(Demand::delivery(5)).build_as_job_ref();
    let problem = create_problem(vec![("v1", "a", fixed_costs())], vec![job.clone()]);
    let mut insertion_ctx = create_test_insertion_ctx(problem.clone());
    insertion_ctx.solution.completeness_ratio = ratio;
    let route_ctx = create_new_route_placeholder(&insertion_ctx).unwrap();
    let calculator = FixedCostInsertionCalculator::new(create_job_type_calculator(problem.as_ref()), weight);

    let result = calculator.evaluate(&insertion_ctx, &RouteCandidate { index: None, route_ctx: &route_ctx }, &job, None);

    assert_eq!(result.cost(), Some(expected));
}}

can_blend_fixed_cost_by_completeness_ratio! {
    case01_complete: (1., 1., 120.),
    case02_empty: (0., 1., 70.),
    case03_half: (0.5, 1., 95.),
    case04_weighted: (1., 0.5, 70.),
    case05_zero_weight: (1., 0., 20.),
}

#[test]
fn can_skip_fixed_cost_for_route_with_jobs() {
    let job1 = test_single_with_id_and_location("job1", 5);
    let job2 = test_single_with_id_and_location("job2", 10);
    let problem = create_problem(vec![("v1", "a", fixed_costs())], vec![job1.clone(), job2.clone()]);
    let insertion_ctx = create_insertion_ctx_with_routes(problem.clone(), vec![("v1", vec![job1])]);
    let calculator = FixedCostInsertionCalculator::new(create_job_type_calculator(problem.as_ref()), 1.);
    let candidate = RouteCandidate { index: Some(0), route_ctx: &insertion_ctx.solution.routes[0] };

    let result = calculator.evaluate(&insertion_ctx, &candidate, &job2, None);

    assert_eq!(result.cost(), Some(20.));
}

#[test]
fn can_prune_by_best_known_including_fixed_cost() {
    let job = test_single_with_id_and_location("job1", 5);
    let problem = create_problem(vec![("v1", "a", fixed_costs())], vec![job.clone()]);
    let mut insertion_ctx = create_test_insertion_ctx(problem.clone());
    insertion_ctx.solution.completeness_ratio = 1.;
    let route_ctx = create_new_route_placeholder(&insertion_ctx).unwrap();
    let calculator = FixedCostInsertionCalculator::new(create_job_type_calculator(problem.as_ref()), 1.);
    let candidate = RouteCandidate { index: None, route_ctx: &route_ctx };

    assert_eq!(calculator.evaluate(&insertion_ctx, &candidate, &job, Some(120.)).cost(), None);
    assert_eq!(calculator.evaluate(&insertion_ctx, &candidate, &job, Some(121.)).cost(), Some(120.));
}
