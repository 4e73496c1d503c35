#[cfg(test)]
#[path = "../../../tests/unit/construction/heuristics/vehicles_test.rs"]
mod vehicles_test;

use crate::construction::constraints::MAX_LOAD_KEY;
use crate::construction::heuristics::*;
use crate::construction::states::InsertionContext;
use crate::models::common::{Cost, Load};
use crate::models::problem::{Actor, ActorKey, Job};
use std::sync::Arc;

/// Evaluates insertion into a route without jobs using each distinct available vehicle type:
/// the cheapest one is reported within vehicle switch event. Routes with jobs keep their vehicle.
pub struct VehicleTypeDependentCalculator {
    inner: Arc<dyn JobInsertionCalculator + Send + Sync>,
}

impl VehicleTypeDependentCalculator {
    /// Creates a new instance of `VehicleTypeDependentCalculator`.
    pub fn new(inner: Arc<dyn JobInsertionCalculator + Send + Sync>) -> Self {
        Self { inner }
    }
}

impl JobInsertionCalculator for VehicleTypeDependentCalculator {
    fn evaluate(
        &self,
        insertion_ctx: &InsertionContext,
        candidate: &RouteCandidate,
        job: &Job,
        best_known: Option<Cost>,
    ) -> InsertionResult {
        if candidate.route_ctx.route.tour.has_jobs() {
            return self.inner.evaluate(insertion_ctx, candidate, job, best_known);
        }

        // current actor of an existing route is evaluated first, so it wins on tie
        let (initial, current_key) = match candidate.index {
            Some(_) => {
                let result = self.inner.evaluate(insertion_ctx, candidate, job, best_known);
                (result, Some(ActorKey::new(&candidate.route_ctx.route.actor)))
            }
            None => (InsertionResult::make_failure(job), None),
        };

        insertion_ctx
            .solution
            .registry
            .next()
            .filter(|actor| current_key.as_ref().is_none_or(|key| *key != ActorKey::new(actor)))
            .fold(initial, |acc, actor| {
                let route_ctx = create_empty_route_ctx(insertion_ctx, actor.clone());
                let type_candidate = RouteCandidate { index: candidate.index, route_ctx: &route_ctx };
                let best_known = min_cost(best_known, acc.cost());

                let result = match self.inner.evaluate(insertion_ctx, &type_candidate, job, best_known) {
                    InsertionResult::Success(mut success) => {
                        success.events.insert(0, InsertionEvent::SwitchVehicle { actor });
                        InsertionResult::Success(success)
                    }
                    failure => failure,
                };

                InsertionResult::choose_best_result(acc, result)
            })
    }
}

/// Adds an amortized fixed cost term when the job insertion requires a new vehicle:
/// `weight * (ratio * absolute_delta + (1 - ratio) * relative_delta)`, where ratio is the solution
/// completeness ratio. Relative delta scales fixed cost by the vehicle's capacity utilization,
/// so fixed costs play a minor role while solution is far from complete.
pub struct FixedCostInsertionCalculator {
    inner: Arc<dyn JobInsertionCalculator + Send + Sync>,
    weight: f64,
}

impl FixedCostInsertionCalculator {
    /// Creates a new instance of `FixedCostInsertionCalculator`.
    pub fn new(inner: Arc<dyn JobInsertionCalculator + Send + Sync>, weight: f64) -> Self {
        Self { inner, weight }
    }
}

impl JobInsertionCalculator for FixedCostInsertionCalculator {
    fn evaluate(
        &self,
        insertion_ctx: &InsertionContext,
        candidate: &RouteCandidate,
        job: &Job,
        best_known: Option<Cost>,
    ) -> InsertionResult {
        let route_ctx = candidate.route_ctx;

        // route with jobs keeps its actor, so its fixed cost is already paid
        if route_ctx.route.tour.has_jobs() {
            return self.inner.evaluate(insertion_ctx, candidate, job, best_known);
        }

        let actor = route_ctx.route.actor.as_ref();
        let load = route_ctx.state.get_route_state_or(MAX_LOAD_KEY, 0) + get_job_size(job);
        let ratio = insertion_ctx.solution.completeness_ratio;

        let absolute = get_fixed_cost(actor);
        let relative = get_relative_fixed_cost(actor, load);
        let fixed_cost = self.weight * (ratio * absolute + (1. - ratio) * relative);

        match self.inner.evaluate(insertion_ctx, candidate, job, best_known.map(|cost| cost - fixed_cost)) {
            InsertionResult::Success(mut success) => {
                success.cost += fixed_cost;
                InsertionResult::Success(success)
            }
            failure => failure,
        }
    }
}

fn get_fixed_cost(actor: &Actor) -> Cost {
    actor.vehicle.costs.fixed + actor.driver.costs.fixed
}

fn get_relative_fixed_cost(actor: &Actor, load: Load) -> Cost {
    let capacity = actor.vehicle.capacity();
    let utilization = if capacity > 0 { load as f64 / capacity as f64 } else { 1. };

    get_fixed_cost(actor) * utilization
}

fn get_job_size(job: &Job) -> Load {
    match job {
        Job::Single(single) => single.demand().size(),
        Job::Multi(multi) => multi.pickup().demand().size(),
    }
}

fn min_cost(left: Option<Cost>, right: Option<Cost>) -> Option<Cost> {
    match (left, right) {
        (Some(left), Some(right)) => Some(left.min(right)),
        (left, right) => left.or(right),
    }
}
