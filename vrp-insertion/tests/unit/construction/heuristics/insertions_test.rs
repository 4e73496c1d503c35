use super::*;
use crate::construction::constraints::TOTAL_COST_KEY;
use crate::helpers::construction::*;
use crate::helpers::models::problem::*;
use crate::helpers::models::solution::*;
use crate::helpers::models::*;
use crate::models::Problem;

fn create_problem(vehicles: &[&str], jobs: Vec<Job>) -> Arc<Problem> {
    let fleet = FleetBuilder::default()
        .add_vehicles(vehicles.iter().map(|id| VehicleBuilder::default().id(id).capacity(10).build()).collect())
        .build();

    create_test_problem(fleet, jobs)
}

fn create_success(cost: Cost) -> InsertionSuccess {
    InsertionSuccess {
        cost,
        job: test_single_with_id_and_location("job", 1),
        actor: test_actor(),
        route_index: None,
        pickup_index: None,
        delivery_index: 0,
        events: vec![],
    }
}

fn get_route_ids(insertion_ctx: &InsertionContext) -> Vec<Vec<String>> {
    insertion_ctx
        .solution
        .routes
        .iter()
        .map(|route_ctx| {
            route_ctx
                .route
                .tour
                .all_activities()
                .filter_map(|activity| activity.retrieve_job())
                .map(|job| get_job_id(&job).clone())
                .collect()
        })
        .collect()
}

fn success(cost: Cost) -> InsertionResult {
    InsertionResult::make_success(create_success(cost))
}

fn failure(code: i32) -> InsertionResult {
    InsertionResult::make_failure_with_code(code, &test_single_with_id_and_location("job", 1))
}

parameterized_test! {can_choose_best_result, (left, right, expected_cost, expected_code), {
    let result = InsertionResult::choose_best_result(left, right);

    assert_eq!(result.cost(), expected_cost);
    assert_eq!(result.failure_code(), expected_code);
}}

can_choose_best_result! {
    case01_success_wins_failure: (success(10.), failure(1), Some(10.), None),
    case02_failure_loses_success: (failure(1), success(10.), Some(10.), None),
    case03_cheaper_wins: (success(10.), success(5.), Some(5.), None),
    case04_left_wins_tie: (success(5.), success(5.), Some(5.), None),
    case05_latest_code_wins: (failure(1), failure(2), None, Some(2)),
    case06_no_position_keeps_code: (failure(1), failure(NO_BETTER_POSITION_CODE), None, Some(1)),
}

#[test]
fn can_keep_left_result_on_tie() {
    let left = InsertionSuccess { delivery_index: 1, ..create_success(5.) };
    let right = InsertionSuccess { delivery_index: 2, ..create_success(5.) };

    let result =
        InsertionResult::choose_best_result(InsertionResult::make_success(left), InsertionResult::make_success(right));

    assert_eq!(result.as_success().map(|success| success.delivery_index), Some(1));
}

#[test]
fn can_prepare_context_returning_unassigned_jobs_back() {
    let job1 = test_single_with_id_and_location("job1", 5);
    let job2 = test_single_with_id_and_location("job2", 10);
    let problem = create_problem(&["v1"], vec![job1.clone(), job2.clone()]);
    let mut insertion_ctx = create_insertion_ctx_with_routes(problem.clone(), vec![("v1", vec![job2])]);
    insertion_ctx.solution.required.clear();
    insertion_ctx.solution.unassigned.push((job1.clone(), 2));

    create_default_heuristic(problem.as_ref()).prepare(&mut insertion_ctx);

    assert!(insertion_ctx.solution.required == vec![job1]);
    assert!(insertion_ctx.solution.unassigned.is_empty());
    assert_eq!(insertion_ctx.solution.completeness_ratio, 0.5);
}

#[test]
fn can_evaluate_and_commit_job_into_new_route() {
    let job = test_single_with_id_and_location("job1", 5);
    let problem = create_problem(&["v1"], vec![job.clone()]);
    let heuristic = create_default_heuristic(problem.as_ref());
    let mut insertion_ctx = create_test_insertion_ctx(problem);

    let success = heuristic.evaluate_job(&insertion_ctx, &job).into_success().expect("should be success");
    assert_eq!(success.cost, 20.);
    assert_eq!(success.route_index, None);

    let route_index = heuristic.commit(&mut insertion_ctx, success);

    assert_eq!(route_index, 0);
    assert_eq!(get_route_ids(&insertion_ctx), vec![vec!["job1"]]);
    assert!(insertion_ctx.solution.required.is_empty());
    assert!(!insertion_ctx.solution.registry.is_available(&insertion_ctx.solution.routes[0].route.actor));
    assert_eq!(insertion_ctx.solution.routes[0].state.get_route_state(TOTAL_COST_KEY), Some(&20.));
}

#[test]
fn can_prefer_existing_route_over_new_one() {
    let job1 = test_single_with_id_and_location("job1", 5);
    let job2 = test_single_with_id_and_location("job2", 10);
    let problem = create_problem(&["v1", "v2"], vec![job1.clone(), job2.clone()]);
    let heuristic = create_default_heuristic(problem.as_ref());
    let insertion_ctx = create_insertion_ctx_with_routes(problem, vec![("v1", vec![job1])]);

    let result = heuristic.evaluate_job(&insertion_ctx, &job2);

    let success = result.as_success().expect("should be success");
    assert_eq!(success.cost, 20.);
    assert_eq!(success.route_index, Some(0));
    // both legs have the same cost, the first one wins
    assert_eq!(success.delivery_index, 0);
    assert!(matches!(success.events.as_slice(), [InsertionEvent::InsertActivity { index: 1, .. }]));
}

#[test]
fn can_evaluate_job_sequentially_and_in_parallel_with_same_result() {
    let jobs = (1..6).map(|idx| test_single_with_id_and_location(&format!("job{idx}"), idx * 3)).collect::<Vec<_>>();
    let target = test_single_with_id_and_location("target", 7);
    let problem = create_problem(&["v1", "v2", "v3"], jobs.iter().cloned().chain(std::iter::once(target.clone())).collect());
    let heuristic = create_default_heuristic(problem.as_ref());
    let mut insertion_ctx = create_insertion_ctx_with_routes(
        problem,
        vec![("v1", jobs[0..2].to_vec()), ("v2", jobs[2..5].to_vec())],
    );

    let sequential = heuristic.evaluate_job(&insertion_ctx, &target);
    insertion_ctx.environment = Arc::new(crate::utils::Environment { is_parallel: true, ..crate::utils::Environment::silent() });
    let parallel = heuristic.evaluate_job(&insertion_ctx, &target);

    assert_eq!(sequential.cost(), parallel.cost());
    assert_eq!(
        sequential.as_success().and_then(|success| success.route_index),
        parallel.as_success().and_then(|success| success.route_index)
    );
}

#[test]
fn can_commit_vehicle_switch_of_empty_route() {
    let job = test_single_with_id_and_location("job1", 5);
    let problem = create_problem(&["v1", "v2"], vec![job.clone()]);
    let heuristic = create_default_heuristic(problem.as_ref());
    let mut insertion_ctx = create_insertion_ctx_with_routes(problem.clone(), vec![("v1", vec![])]);
    let v1 = get_test_actor_from_fleet(problem.fleet.as_ref(), "v1");
    let v2 = get_test_actor_from_fleet(problem.fleet.as_ref(), "v2");
    let success = InsertionSuccess {
        job: job.clone(),
        actor: v2.clone(),
        route_index: Some(0),
        events: vec![
            InsertionEvent::SwitchVehicle { actor: v2.clone() },
            InsertionEvent::InsertActivity { activity: create_job_activities(&job).remove(0), index: 1 },
        ],
        ..create_success(20.)
    };

    heuristic.commit(&mut insertion_ctx, success);

    assert!(insertion_ctx.solution.routes[0].route.actor == v2);
    assert!(insertion_ctx.solution.registry.is_available(&v1));
    assert!(!insertion_ctx.solution.registry.is_available(&v2));
    assert_eq!(get_route_ids(&insertion_ctx), vec![vec!["job1"]]);
}

#[test]
#[should_panic(expected = "switch actor is already in use")]
fn cannot_commit_vehicle_switch_to_actor_of_another_route() {
    let job = test_single_with_id_and_location("job1", 5);
    let problem = create_problem(&["v1", "v2"], vec![job.clone()]);
    let heuristic = create_default_heuristic(problem.as_ref());
    let mut insertion_ctx = create_insertion_ctx_with_routes(problem.clone(), vec![("v1", vec![]), ("v2", vec![])]);
    let v2 = get_test_actor_from_fleet(problem.fleet.as_ref(), "v2");
    let success = InsertionSuccess {
        job: job.clone(),
        actor: v2.clone(),
        route_index: Some(0),
        events: vec![
            InsertionEvent::SwitchVehicle { actor: v2 },
            InsertionEvent::InsertActivity { activity: create_job_activities(&job).remove(0), index: 1 },
        ],
        ..create_success(20.)
    };

    heuristic.commit(&mut insertion_ctx, success);
}

#[test]
#[should_panic(expected = "new route actor is already in use")]
fn cannot_commit_new_route_with_actor_of_another_route() {
    let job = test_single_with_id_and_location("job1", 5);
    let problem = create_problem(&["v1"], vec![job.clone()]);
    let heuristic = create_default_heuristic(problem.as_ref());
    let mut insertion_ctx = create_insertion_ctx_with_routes(problem.clone(), vec![("v1", vec![])]);
    let success = InsertionSuccess {
        job: job.clone(),
        actor: get_test_actor_from_fleet(problem.fleet.as_ref(), "v1"),
        events: vec![InsertionEvent::InsertActivity { activity: create_job_activities(&job).remove(0), index: 1 }],
        ..create_success(20.)
    };

    heuristic.commit(&mut insertion_ctx, success);
}

#[test]
#[should_panic(expected = "pickup-delivery order")]
fn cannot_commit_shipment_with_delivery_before_pickup() {
    let job = test_multi_with_id_and_locations("multi", 5, 10);
    let problem = create_problem(&["v1"], vec![job.clone()]);
    let heuristic = create_default_heuristic(problem.as_ref());
    let mut insertion_ctx = create_test_insertion_ctx(problem);
    let activities = create_job_activities(&job);
    let success = InsertionSuccess {
        job: job.clone(),
        events: vec![
            InsertionEvent::InsertActivity { activity: activities[0].clone(), index: 1 },
            InsertionEvent::InsertActivity { activity: activities[1].clone(), index: 1 },
        ],
        ..create_success(0.)
    };

    heuristic.commit(&mut insertion_ctx, success);
}

#[test]
fn can_unassign_job() {
    let job = test_single_with_id_and_location("job1", 5);
    let problem = create_problem(&["v1"], vec![job.clone()]);
    let (heuristic, mut insertion_ctx) = (create_default_heuristic(problem.as_ref()), create_test_insertion_ctx(problem));

    heuristic.unassign(&mut insertion_ctx, &job, 2);

    assert!(insertion_ctx.solution.required.is_empty());
    assert_eq!(insertion_ctx.solution.unassigned.len(), 1);
    assert!(insertion_ctx.solution.unassigned[0].0 == job);
    assert_eq!(insertion_ctx.solution.unassigned[0].1, 2);
}

#[test]
fn can_remove_job_and_close_empty_route() {
    let job1 = test_single_with_id_and_location("job1", 5);
    let job2 = test_single_with_id_and_location("job2", 10);
    let problem = create_problem(&["v1"], vec![job1.clone(), job2.clone()]);
    let heuristic = create_default_heuristic(problem.as_ref());
    let mut insertion_ctx = create_insertion_ctx_with_routes(problem, vec![("v1", vec![job1.clone(), job2.clone()])]);
    let actor = insertion_ctx.solution.routes[0].route.actor.clone();

    assert!(heuristic.remove_job(&mut insertion_ctx, &job1));
    assert_eq!(get_route_ids(&insertion_ctx), vec![vec!["job2"]]);
    assert_eq!(insertion_ctx.solution.routes[0].state.get_route_state(TOTAL_COST_KEY), Some(&40.));
    assert!(!insertion_ctx.solution.registry.is_available(&actor));

    assert!(heuristic.remove_job(&mut insertion_ctx, &job2));
    assert!(insertion_ctx.solution.routes.is_empty());
    assert!(insertion_ctx.solution.registry.is_available(&actor));
    assert_eq!(insertion_ctx.solution.required.len(), 2);

    assert!(!heuristic.remove_job(&mut insertion_ctx, &job2));
}

#[test]
fn can_finalize_context() {
    let job1 = test_single_with_id_and_location("job1", 5);
    let job2 = test_single_with_id_and_location("job2", 10);
    let problem = create_problem(&["v1", "v2"], vec![job1.clone(), job2.clone()]);
    let heuristic = create_default_heuristic(problem.as_ref());
    let mut insertion_ctx =
        create_insertion_ctx_with_routes(problem.clone(), vec![("v1", vec![job1]), ("v2", vec![])]);
    let v2 = get_test_actor_from_fleet(problem.fleet.as_ref(), "v2");

    heuristic.finalize(&mut insertion_ctx);

    assert_eq!(get_route_ids(&insertion_ctx), vec![vec!["job1"]]);
    assert!(insertion_ctx.solution.registry.is_available(&v2));
    assert!(insertion_ctx.solution.required.is_empty());
    assert_eq!(insertion_ctx.solution.unassigned.len(), 1);
    assert!(insertion_ctx.solution.unassigned[0].0 == job2);
    assert_eq!(insertion_ctx.solution.unassigned[0].1, NO_BETTER_POSITION_CODE);
}

#[test]
fn can_skip_new_route_when_no_actor_available() {
    let job1 = test_single_with_id_and_location("job1", 5);
    let job2 = test_single_with_id_and_location("job2", 10);
    let problem = create_problem(&["v1"], vec![job1.clone(), job2.clone()]);
    let heuristic = create_default_heuristic(problem.as_ref());
    let insertion_ctx = create_insertion_ctx_with_routes(problem, vec![("v1", vec![job1])]);

    assert!(heuristic.evaluate_new_route(&insertion_ctx, &job2, None).is_none());
    assert!(create_new_route_placeholder(&insertion_ctx).is_none());
}

#[test]
fn can_format_insertion_event_and_failure() {
    let failure = InsertionFailure { code: 2, job: test_multi_with_id_and_locations("multi", 1, 2) };
    let event = InsertionEvent::SwitchVehicle { actor: test_actor() };

    assert!(format!("{failure:?}").starts_with("InsertionFailure { code: 2, job: Multi("));
    assert!(format!("{event:?}").starts_with("SwitchVehicle { actor: Actor { detail: ActorDetail {"));
}
