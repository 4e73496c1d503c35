use crate::construction::states::{InsertionContext, RouteContext};
use crate::helpers::models::problem::*;
use crate::helpers::models::solution::*;
use crate::models::Problem;
use crate::models::problem::{Fleet, Job, TransportCost};
use crate::utils::Environment;
use std::sync::Arc;

pub fn test_environment() -> Arc<Environment> {
    Arc::new(Environment { is_parallel: false, ..Environment::silent() })
}

pub fn create_test_problem(fleet: Fleet, jobs: Vec<Job>) -> Arc<Problem> {
    create_test_problem_with_transport(fleet, jobs, TestTransportCost::new_shared())
}

pub fn create_test_problem_with_transport(
    fleet: Fleet,
    jobs: Vec<Job>,
    transport: Arc<dyn TransportCost + Send + Sync>,
) -> Arc<Problem> {
    Arc::new(Problem::new(fleet, jobs, transport, test_activity_cost()).expect("cannot create test problem"))
}

pub fn create_test_insertion_ctx(problem: Arc<Problem>) -> InsertionContext {
    InsertionContext::new(problem, test_environment())
}

/// Creates insertion context where given jobs are already assigned to routes of given vehicles
/// in the specified order. Route states are computed and actors are locked.
pub fn create_insertion_ctx_with_routes(problem: Arc<Problem>, routes: Vec<(&str, Vec<Job>)>) -> InsertionContext {
    let mut insertion_ctx = create_test_insertion_ctx(problem.clone());

    routes.into_iter().for_each(|(vehicle_id, jobs)| {
        let route_ctx = create_route_ctx_with_jobs(problem.as_ref(), vehicle_id, jobs.as_slice());

        insertion_ctx.solution.registry.use_actor(&route_ctx.route.actor);
        insertion_ctx.solution.required.retain(|job| !jobs.contains(job));
        insertion_ctx.solution.routes.push(route_ctx);
    });

    insertion_ctx
}

/// Creates route context with jobs added in given order and computed states.
pub fn create_route_ctx_with_jobs(problem: &Problem, vehicle_id: &str, jobs: &[Job]) -> RouteContext {
    let actor = get_test_actor_from_fleet(problem.fleet.as_ref(), vehicle_id);
    let route = jobs.iter().fold(RouteBuilder::default().with_actor(actor).build(), |mut route, job| {
        create_job_activities(job).into_iter().for_each(|activity| {
            route.tour.insert_last(activity);
        });
        route
    });

    let mut route_ctx = RouteContext { route, state: Default::default() };
    problem.constraint.accept_route_state(&mut route_ctx);

    route_ctx
}
