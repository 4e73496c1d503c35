#[cfg(test)]
#[path = "../../../tests/unit/construction/states/context_test.rs"]
mod context_test;

use crate::construction::constraints::TOTAL_COST_KEY;
use crate::construction::states::RouteState;
use crate::models::common::Timestamp;
use crate::models::problem::{Actor, Job};
use crate::models::solution::{Activity, Registry, Route};
use crate::models::{Problem, Solution};
use crate::utils::Environment;
use std::sync::Arc;

/// Specifies insertion context: problem, solution in progress and environment.
pub struct InsertionContext {
    /// Original problem.
    pub problem: Arc<Problem>,

    /// Solution context.
    pub solution: SolutionContext,

    /// Information about environment.
    pub environment: Arc<Environment>,
}

impl InsertionContext {
    /// Creates insertion context with all problem jobs required and no routes.
    pub fn new(problem: Arc<Problem>, environment: Arc<Environment>) -> Self {
        let registry = Registry::new(problem.fleet.as_ref());
        let required = problem.jobs.as_ref().clone();

        Self {
            problem,
            solution: SolutionContext {
                required,
                ignored: vec![],
                unassigned: vec![],
                routes: vec![],
                registry,
                completeness_ratio: 0.,
            },
            environment,
        }
    }

    /// Creates a solution snapshot from the context: empty routes are skipped.
    pub fn to_solution(&self) -> Solution {
        let routes = self
            .solution
            .routes
            .iter()
            .filter(|route_ctx| route_ctx.route.tour.has_jobs())
            .map(|route_ctx| route_ctx.route.clone())
            .collect::<Vec<_>>();

        Solution {
            registry: self.solution.registry.clone(),
            cost: self.solution.get_total_cost(),
            unassigned: self.solution.unassigned.clone(),
            routes,
        }
    }
}

/// Contains information regarding solution in progress.
#[derive(Clone)]
pub struct SolutionContext {
    /// List of jobs which require assignment.
    pub required: Vec<Job>,

    /// List of jobs which should be ignored by insertion.
    pub ignored: Vec<Job>,

    /// Jobs which cannot be assigned within the code of the last violated constraint.
    pub unassigned: Vec<(Job, i32)>,

    /// Solution routes.
    pub routes: Vec<RouteContext>,

    /// Keeps track of used actors.
    pub registry: Registry,

    /// A fraction of jobs already assigned, it is refreshed before each insertion batch.
    pub completeness_ratio: f64,
}

impl SolutionContext {
    /// Returns amount of jobs assigned to routes.
    pub fn get_assigned_count(&self) -> usize {
        self.routes.iter().map(|route_ctx| route_ctx.route.tour.job_count()).sum()
    }

    /// Returns total cost of routes: fixed costs of used actors and their accumulated route costs.
    pub fn get_total_cost(&self) -> f64 {
        self.routes
            .iter()
            .filter(|route_ctx| route_ctx.route.tour.has_jobs())
            .map(|route_ctx| {
                let actor = &route_ctx.route.actor;
                actor.vehicle.costs.fixed
                    + actor.driver.costs.fixed
                    + route_ctx.state.get_route_state_or(TOTAL_COST_KEY, 0.)
            })
            .sum()
    }

    /// Wipes all route and activity states: states have to be recomputed by state updaters.
    pub fn clear_states(&mut self) {
        self.routes.iter_mut().for_each(|route_ctx| route_ctx.state.clear());
    }
}

/// Specifies insertion context for route.
#[derive(Clone)]
pub struct RouteContext {
    /// Used route.
    pub route: Route,

    /// Route state.
    pub state: RouteState,
}

impl RouteContext {
    /// Creates a new instance of `RouteContext` with empty route for the actor.
    pub fn new(actor: Arc<Actor>) -> Self {
        Self { route: Route::new(actor), state: RouteState::default() }
    }

    /// Returns mutable references to the route and its state.
    pub fn as_mut(&mut self) -> (&mut Route, &mut RouteState) {
        (&mut self.route, &mut self.state)
    }
}

/// Specifies insertion context for activity: the target activity is evaluated between `prev` and `next`.
pub struct ActivityContext<'a> {
    /// Leg index in the route: `next` is the activity at `index + 1`, `prev` is the activity at `index`
    /// unless it is virtually inserted.
    pub index: usize,

    /// Previous activity, it can be an activity which is not yet in the route (e.g. shipment pickup).
    pub prev: &'a Activity,

    /// Target activity.
    pub target: &'a Activity,

    /// Next activity, it is always in the route at `index + 1`.
    pub next: &'a Activity,

    /// Departure time from previous activity, it can differ from its schedule when previous
    /// activities are shifted by a pending insertion.
    pub departure: Timestamp,
}

impl ActivityContext<'_> {
    /// Checks whether previous activity is in the route, not virtually inserted.
    pub fn is_prev_in_route(&self) -> bool {
        !self.prev.is_paired_with(self.target)
    }
}
