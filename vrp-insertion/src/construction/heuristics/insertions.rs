#[cfg(test)]
#[path = "../../../tests/unit/construction/heuristics/insertions_test.rs"]
mod insertions_test;

use crate::construction::heuristics::*;
use crate::construction::states::{InsertionContext, RouteContext};
use crate::models::common::Cost;
use crate::models::problem::{Actor, Job};
use crate::models::solution::Activity;
use crate::utils::map_reduce;
use std::sync::Arc;

/// A failure code used when no position is better than already known one.
pub const NO_BETTER_POSITION_CODE: i32 = 0;

/// Specifies insertion result variant.
pub enum InsertionResult {
    /// Successful insertion result.
    Success(InsertionSuccess),
    /// Insertion failure.
    Failure(InsertionFailure),
}

/// Specifies a change which has to be applied to the route to perform an insertion.
#[derive(Clone, Debug)]
pub enum InsertionEvent {
    /// Route has to be served by another actor. Emitted only for routes without jobs.
    SwitchVehicle {
        /// New actor.
        actor: Arc<Actor>,
    },
    /// Activity has to be inserted at given tour index (start of the tour has index zero).
    InsertActivity {
        /// Activity to be inserted.
        activity: Activity,
        /// Tour index, it accounts all previous events of the same insertion.
        index: usize,
    },
}

/// Specifies insertion success result needed to insert job into tour.
pub struct InsertionSuccess {
    /// Specifies marginal cost of the insertion.
    pub cost: Cost,

    /// Original job to be inserted.
    pub job: Job,

    /// Actor which serves the route after insertion.
    pub actor: Arc<Actor>,

    /// Index of the route in solution, none means that a new route has to be created.
    pub route_index: Option<usize>,

    /// Leg index of pickup insertion, set only for shipments.
    pub pickup_index: Option<usize>,

    /// Leg index of delivery (or service) insertion in the original route.
    pub delivery_index: usize,

    /// Ordered list of route changes.
    pub events: Vec<InsertionEvent>,
}

/// Specifies insertion failure.
#[derive(Clone, Debug)]
pub struct InsertionFailure {
    /// The last observed violation code.
    pub code: i32,
    /// Original job failed to be inserted.
    pub job: Job,
}

impl InsertionResult {
    /// Creates result which represents insertion success.
    pub fn make_success(success: InsertionSuccess) -> Self {
        Self::Success(success)
    }

    /// Creates result which represents insertion failure when no better position is found.
    pub fn make_failure(job: &Job) -> Self {
        Self::make_failure_with_code(NO_BETTER_POSITION_CODE, job)
    }

    /// Creates result which represents insertion failure with given code.
    pub fn make_failure_with_code(code: i32, job: &Job) -> Self {
        Self::Failure(InsertionFailure { code, job: job.clone() })
    }

    /// Compares two insertion results and returns the cheapest by cost.
    /// On tie, the left one is returned.
    pub fn choose_best_result(left: Self, right: Self) -> Self {
        match (&left, &right) {
            (Self::Success(_), Self::Failure(_)) => left,
            (Self::Failure(_), Self::Success(_)) => right,
            (Self::Success(lhs), Self::Success(rhs)) => {
                if rhs.cost < lhs.cost {
                    right
                } else {
                    left
                }
            }
            (Self::Failure(_), Self::Failure(rhs)) => {
                if rhs.code == NO_BETTER_POSITION_CODE {
                    left
                } else {
                    right
                }
            }
        }
    }

    /// Returns insertion cost if result is success.
    pub fn cost(&self) -> Option<Cost> {
        self.as_success().map(|success| success.cost)
    }

    /// Returns insertion result as success.
    pub fn as_success(&self) -> Option<&InsertionSuccess> {
        match self {
            Self::Success(success) => Some(success),
            Self::Failure(_) => None,
        }
    }

    /// Returns insertion result as success.
    pub fn into_success(self) -> Option<InsertionSuccess> {
        match self {
            Self::Success(success) => Some(success),
            Self::Failure(_) => None,
        }
    }

    /// Returns failure code if result is failure.
    pub fn failure_code(&self) -> Option<i32> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure.code),
        }
    }
}

/// Implements shared steps of insertion strategies: evaluation of a job against solution routes,
/// committing insertion results and notifying listeners.
pub struct InsertionHeuristic {
    calculator: Arc<dyn JobInsertionCalculator + Send + Sync>,
    result_selector: Arc<dyn ResultSelector + Send + Sync>,
    listeners: InsertionListeners,
}

impl InsertionHeuristic {
    /// Creates a new instance of `InsertionHeuristic`.
    pub fn new(
        calculator: Arc<dyn JobInsertionCalculator + Send + Sync>,
        result_selector: Arc<dyn ResultSelector + Send + Sync>,
        listeners: InsertionListeners,
    ) -> Self {
        Self { calculator, result_selector, listeners }
    }

    /// Selects one insertion result from two using result selector.
    pub fn select_result(&self, left: InsertionResult, right: InsertionResult) -> InsertionResult {
        self.result_selector.select(left, right)
    }

    /// Prepares context for insertion: refreshes route states and notifies listeners.
    pub fn prepare(&self, insertion_ctx: &mut InsertionContext) {
        let problem = insertion_ctx.problem.clone();

        let unassigned = std::mem::take(&mut insertion_ctx.solution.unassigned);
        insertion_ctx.solution.required.extend(unassigned.into_iter().map(|(job, _)| job));

        insertion_ctx.solution.routes.iter_mut().for_each(|route_ctx| problem.constraint.accept_route_state(route_ctx));
        problem.constraint.accept_solution_state(&mut insertion_ctx.solution);

        self.listeners.insertion_starts(insertion_ctx);
    }

    /// Evaluates job insertion into existing route with given index.
    pub fn evaluate_route(
        &self,
        insertion_ctx: &InsertionContext,
        route_index: usize,
        job: &Job,
        best_known: Option<Cost>,
    ) -> InsertionResult {
        let route_ctx = &insertion_ctx.solution.routes[route_index];
        let candidate = RouteCandidate { index: Some(route_index), route_ctx };

        self.calculator.evaluate(insertion_ctx, &candidate, job, best_known)
    }

    /// Evaluates job insertion into a new route. Returns none when there is no available actor.
    pub fn evaluate_new_route(
        &self,
        insertion_ctx: &InsertionContext,
        job: &Job,
        best_known: Option<Cost>,
    ) -> Option<InsertionResult> {
        let route_ctx = create_new_route_placeholder(insertion_ctx)?;
        let candidate = RouteCandidate { index: None, route_ctx: &route_ctx };

        Some(self.calculator.evaluate(insertion_ctx, &candidate, job, best_known))
    }

    /// Evaluates job insertion into all existing routes and a new one, returns the cheapest result.
    /// Routes are evaluated in their order, so on tie the first one wins.
    pub fn evaluate_job(&self, insertion_ctx: &InsertionContext, job: &Job) -> InsertionResult {
        let route_indices = (0..insertion_ctx.solution.routes.len()).collect::<Vec<_>>();

        let existing = if insertion_ctx.environment.is_parallel {
            map_reduce(
                route_indices.as_slice(),
                |route_index| self.evaluate_route(insertion_ctx, *route_index, job, None),
                || InsertionResult::make_failure(job),
                |left, right| self.select_result(left, right),
            )
        } else {
            route_indices.iter().fold(InsertionResult::make_failure(job), |acc, route_index| {
                let result = self.evaluate_route(insertion_ctx, *route_index, job, acc.cost());
                self.select_result(acc, result)
            })
        };

        match self.evaluate_new_route(insertion_ctx, job, existing.cost()) {
            Some(result) => self.select_result(existing, result),
            None => existing,
        }
    }

    /// Commits insertion: applies insertion events to the route and notifies listeners.
    /// Returns index of the route where job is inserted.
    /// Panics when insertion refers to an actor which is already used by another route.
    pub fn commit(&self, insertion_ctx: &mut InsertionContext, success: InsertionSuccess) -> usize {
        self.listeners.job_inserting(insertion_ctx, &success);

        let InsertionSuccess { cost, job, actor, route_index, events, .. } = success;

        let route_index = route_index.unwrap_or_else(|| {
            assert!(insertion_ctx.solution.registry.is_available(&actor), "new route actor is already in use");
            insertion_ctx.solution.routes.push(RouteContext::new(actor.clone()));
            let route_index = insertion_ctx.solution.routes.len() - 1;
            self.listeners.vehicle_switched(insertion_ctx, route_index, None, &actor);

            route_index
        });

        events.into_iter().for_each(|event| match event {
            InsertionEvent::SwitchVehicle { actor } => {
                let route_ctx = &mut insertion_ctx.solution.routes[route_index];

                if route_ctx.route.actor != actor {
                    assert!(!route_ctx.route.tour.has_jobs(), "cannot switch actor of the route with jobs");
                    assert!(insertion_ctx.solution.registry.is_available(&actor), "switch actor is already in use");
                    let previous = route_ctx.route.actor.clone();
                    *route_ctx = RouteContext::new(actor.clone());

                    self.listeners.vehicle_switched(insertion_ctx, route_index, Some(&previous), &actor);
                }
            }
            InsertionEvent::InsertActivity { activity, index } => {
                insertion_ctx.solution.routes[route_index].route.tour.insert_at(activity, index);
            }
        });

        let tour = &insertion_ctx.solution.routes[route_index].route.tour;
        if let Some(multi) = job.as_multi() {
            let positions = multi
                .jobs
                .iter()
                .map(|single| {
                    tour.all_activities().position(|a| a.job.as_ref().is_some_and(|j| Arc::ptr_eq(j, single)))
                })
                .collect::<Vec<_>>();
            assert!(
                matches!(positions.as_slice(), [Some(pickup), Some(delivery)] if pickup < delivery),
                "shipment activities are not in pickup-delivery order"
            );
        }

        tracing::debug!(cost, route_index, "job is inserted");

        insertion_ctx.solution.required.retain(|j| *j != job);
        self.listeners.job_inserted(insertion_ctx, route_index, &job);

        route_index
    }

    /// Marks job as unassigned within given violation code.
    pub fn unassign(&self, insertion_ctx: &mut InsertionContext, job: &Job, code: i32) {
        tracing::debug!(code, "job is unassigned");

        insertion_ctx.solution.required.retain(|j| j != job);
        insertion_ctx.solution.unassigned.push((job.clone(), code));
        self.listeners.job_unassigned(insertion_ctx, job, code);
    }

    /// Removes job from the solution and returns it back to the list of required jobs.
    /// Returns false if job is not assigned to any route.
    pub fn remove_job(&self, insertion_ctx: &mut InsertionContext, job: &Job) -> bool {
        let route_index =
            insertion_ctx.solution.routes.iter().position(|route_ctx| route_ctx.route.tour.contains(job));

        match route_index {
            Some(route_index) => {
                insertion_ctx.solution.routes[route_index].route.tour.remove(job);
                insertion_ctx.solution.required.push(job.clone());

                let route_index = if insertion_ctx.solution.routes[route_index].route.tour.has_jobs() {
                    Some(route_index)
                } else {
                    let route_ctx = insertion_ctx.solution.routes.remove(route_index);
                    insertion_ctx.solution.registry.free_actor(&route_ctx.route.actor);
                    tracing::debug!(route_index, "route is closed");
                    None
                };

                self.listeners.job_removed(insertion_ctx, route_index, job);

                true
            }
            None => false,
        }
    }

    /// Finalizes insertion: removes empty routes, frees their actors and updates solution state.
    pub fn finalize(&self, insertion_ctx: &mut InsertionContext) {
        let (routes, empty): (Vec<_>, Vec<_>) = std::mem::take(&mut insertion_ctx.solution.routes)
            .into_iter()
            .partition(|route_ctx| route_ctx.route.tour.has_jobs());

        empty.iter().for_each(|route_ctx| {
            insertion_ctx.solution.registry.free_actor(&route_ctx.route.actor);
        });
        insertion_ctx.solution.routes = routes;

        let unassigned = std::mem::take(&mut insertion_ctx.solution.required);
        insertion_ctx.solution.unassigned.extend(unassigned.into_iter().map(|job| (job, NO_BETTER_POSITION_CODE)));

        insertion_ctx.problem.constraint.accept_solution_state(&mut insertion_ctx.solution);
        self.listeners.insertion_ends(insertion_ctx);

        (insertion_ctx.environment.logger)(&format!(
            "insertion is finished: routes: {}, unassigned: {}, cost: {:.2}",
            insertion_ctx.solution.routes.len(),
            insertion_ctx.solution.unassigned.len(),
            insertion_ctx.solution.get_total_cost()
        ));
    }
}

/// Creates an empty route for the next available actor with its states computed.
pub(crate) fn create_new_route_placeholder(insertion_ctx: &InsertionContext) -> Option<RouteContext> {
    insertion_ctx.solution.registry.next().next().map(|actor| create_empty_route_ctx(insertion_ctx, actor))
}

/// Creates an empty route context for the actor with its states computed.
pub(crate) fn create_empty_route_ctx(insertion_ctx: &InsertionContext, actor: Arc<Actor>) -> RouteContext {
    let mut route_ctx = RouteContext::new(actor);
    insertion_ctx.problem.constraint.accept_route_state(&mut route_ctx);

    route_ctx
}
