use super::*;
use crate::construction::constraints::TOTAL_COST_KEY;
use crate::construction::heuristics::*;
use crate::helpers::construction::*;
use crate::helpers::models::problem::*;
use crate::helpers::models::*;
use crate::models::Problem;
use std::sync::Mutex;

struct RecordingListener {
    name: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

impl InsertionListener for RecordingListener {
    fn insertion_starts(&self, _: &mut InsertionContext) {
        self.log.lock().unwrap().push(format!("{}:starts", self.name));
    }

    fn job_inserting(&self, insertion_ctx: &mut InsertionContext, success: &InsertionSuccess) {
        let routes = insertion_ctx.solution.routes.len();
        let is_required = insertion_ctx.solution.required.contains(&success.job);
        self.log.lock().unwrap().push(format!("{}:inserting:{routes}:{is_required}", self.name));
    }

    fn job_inserted(&self, _: &mut InsertionContext, route_index: usize, _: &Job) {
        self.log.lock().unwrap().push(format!("{}:inserted:{route_index}", self.name));
    }
}

fn create_problem(jobs: Vec<Job>) -> Arc<Problem> {
    let fleet = FleetBuilder::default()
        .add_vehicle(test_vehicle_with_id("v1"))
        .add_vehicle(test_vehicle_with_id("v2"))
        .build();

    create_test_problem(fleet, jobs)
}

#[test]
fn can_create_listeners_with_defaults() {
    assert!(InsertionListeners::default().is_empty());
    assert_eq!(InsertionListeners::new_with_defaults().len(), 3);
}

#[test]
fn can_notify_listeners_in_registration_order() {
    let job = test_single_with_id_and_location("job1", 5);
    let mut insertion_ctx = create_test_insertion_ctx(create_problem(vec![job.clone()]));
    let log = Arc::new(Mutex::new(vec![]));
    let mut listeners = InsertionListeners::default();
    listeners
        .add(Arc::new(RecordingListener { name: "first", log: log.clone() }))
        .add(Arc::new(RecordingListener { name: "second", log: log.clone() }));

    listeners.insertion_starts(&mut insertion_ctx);
    listeners.job_inserted(&mut insertion_ctx, 1, &job);
    listeners.insertion_ends(&mut insertion_ctx);

    assert_eq!(
        log.lock().unwrap().clone(),
        vec!["first:starts", "second:starts", "first:inserted:1", "second:inserted:1"]
    );
}

#[test]
fn can_lock_and_release_actors_on_vehicle_switch() {
    let problem = create_problem(vec![]);
    let mut insertion_ctx = create_test_insertion_ctx(problem.clone());
    let v1 = get_test_actor_from_fleet(problem.fleet.as_ref(), "v1");
    let v2 = get_test_actor_from_fleet(problem.fleet.as_ref(), "v2");
    let listener = RegistryListener::default();

    listener.vehicle_switched(&mut insertion_ctx, 0, None, &v1);
    assert!(!insertion_ctx.solution.registry.is_available(&v1));
    assert!(insertion_ctx.solution.registry.is_available(&v2));

    listener.vehicle_switched(&mut insertion_ctx, 0, Some(&v1), &v2);
    assert!(insertion_ctx.solution.registry.is_available(&v1));
    assert!(!insertion_ctx.solution.registry.is_available(&v2));
}

#[test]
#[should_panic(expected = "actor is already used by another route")]
fn cannot_lock_actor_twice() {
    let problem = create_problem(vec![]);
    let mut insertion_ctx = create_test_insertion_ctx(problem.clone());
    let v1 = get_test_actor_from_fleet(problem.fleet.as_ref(), "v1");
    let listener = RegistryListener::default();

    listener.vehicle_switched(&mut insertion_ctx, 0, None, &v1);
    listener.vehicle_switched(&mut insertion_ctx, 1, None, &v1);
}

#[test]
fn can_notify_listeners_before_and_after_job_insertion() {
    let job = test_single_with_id_and_location("job1", 5);
    let problem = create_problem(vec![job.clone()]);
    let mut insertion_ctx = create_test_insertion_ctx(problem.clone());
    let log = Arc::new(Mutex::new(vec![]));
    let mut listeners = InsertionListeners::new_with_defaults();
    listeners.add(Arc::new(RecordingListener { name: "recorder", log: log.clone() }));
    let heuristic = InsertionHeuristic::new(
        create_job_insertion_calculator(problem.as_ref(), &create_test_config(StrategyType::Best)),
        Arc::new(BestResultSelector::default()),
        listeners,
    );

    let success = heuristic.evaluate_job(&insertion_ctx, &job).into_success().expect("job should be inserted");
    heuristic.commit(&mut insertion_ctx, success);

    assert_eq!(log.lock().unwrap().clone(), vec!["recorder:inserting:0:true", "recorder:inserted:0"]);
}

#[test]
fn can_update_route_states_on_job_insertion() {
    let job = test_single_with_id_and_location("job1", 5);
    let mut insertion_ctx = create_insertion_ctx_with_routes(create_problem(vec![job.clone()]), vec![("v1", vec![job.clone()])]);
    insertion_ctx.solution.routes[0].state.clear();

    StateUpdateListener::default().job_inserted(&mut insertion_ctx, 0, &job);

    assert_eq!(insertion_ctx.solution.routes[0].state.get_route_state(TOTAL_COST_KEY), Some(&20.));
}

#[test]
fn can_ignore_removal_from_closed_route() {
    let job = test_single_with_id_and_location("job1", 5);
    let mut insertion_ctx = create_test_insertion_ctx(create_problem(vec![job.clone()]));

    StateUpdateListener::default().job_removed(&mut insertion_ctx, None, &job);

    assert!(insertion_ctx.solution.routes.is_empty());
}

parameterized_test! {can_refresh_completeness_ratio, (assigned, unassigned, expected), {
    let assigned = (0..assigned).map(|idx| test_single_with_id_and_location(&format!("a{idx}"), 5)).collect::<Vec<_>>();
    let unassigned = (0..unassigned).map(|idx| test_single_with_id_and_location(&format!("u{idx}"), 5)).collect::<Vec<_>>();
    let jobs = assigned.iter().chain(unassigned.iter()).cloned().collect();
    let routes = if assigned.is_empty() { vec![] } else { vec![("v1", assigned)] };
    let mut insertion_ctx = create_insertion_ctx_with_routes(create_problem(jobs), routes);
    insertion_ctx.solution.completeness_ratio = -1.;

    CompletenessRatioListener::default().insertion_starts(&mut insertion_ctx);

    assert_eq!(insertion_ctx.solution.completeness_ratio, expected);
}}

can_refresh_completeness_ratio! {
    case01_empty: (0, 0, 1.),
    case02_nothing_assigned: (0, 2, 0.),
    case03_half_assigned: (1, 1, 0.5),
    case04_all_assigned: (3, 0, 1.),
}
