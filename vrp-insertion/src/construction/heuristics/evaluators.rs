#[cfg(test)]
#[path = "../../../tests/unit/construction/heuristics/evaluators_test.rs"]
mod evaluators_test;

use crate::construction::constraints::ConstraintStatus;
use crate::construction::heuristics::*;
use crate::construction::states::{ActivityContext, InsertionContext, RouteContext};
use crate::models::common::{Cost, Timestamp};
use crate::models::problem::Job;
use crate::models::solution::Activity;
use crate::utils::unwrap_from_result;
use std::sync::Arc;

/// Specifies a route where job insertion is evaluated.
#[derive(Clone, Copy)]
pub struct RouteCandidate<'a> {
    /// Index of the route in solution, none for a new route.
    pub index: Option<usize>,
    /// Route context used for evaluation, for a new route it is an empty route of some available actor.
    pub route_ctx: &'a RouteContext,
}

/// Evaluates the cheapest feasible insertion of a job into a route.
pub trait JobInsertionCalculator {
    /// Evaluates job insertion into the route. When best known cost is passed, only results
    /// strictly cheaper than it are reported as success.
    fn evaluate(
        &self,
        insertion_ctx: &InsertionContext,
        candidate: &RouteCandidate,
        job: &Job,
        best_known: Option<Cost>,
    ) -> InsertionResult;
}

/// Evaluates insertion of a job with exactly one activity.
pub struct ServiceInsertionCalculator {
    activity_cost: Arc<dyn ActivityInsertionCostCalculator + Send + Sync>,
}

impl ServiceInsertionCalculator {
    /// Creates a new instance of `ServiceInsertionCalculator`.
    pub fn new(activity_cost: Arc<dyn ActivityInsertionCostCalculator + Send + Sync>) -> Self {
        Self { activity_cost }
    }
}

struct ServiceScan {
    best: Option<(usize, Cost)>,
    code: i32,
}

impl JobInsertionCalculator for ServiceInsertionCalculator {
    fn evaluate(
        &self,
        insertion_ctx: &InsertionContext,
        candidate: &RouteCandidate,
        job: &Job,
        best_known: Option<Cost>,
    ) -> InsertionResult {
        let problem = &insertion_ctx.problem;
        let route_ctx = candidate.route_ctx;

        if let Some(violation) = problem.constraint.evaluate_hard_route(&insertion_ctx.solution, route_ctx, job) {
            return InsertionResult::make_failure_with_code(violation.code, job);
        }

        let activities = problem.factory.create(job);
        assert_eq!(activities.len(), 1, "service insertion expects a job with one activity");
        let target = &activities[0];

        let route_costs = problem.constraint.evaluate_soft_route(&insertion_ctx.solution, route_ctx, job);
        let threshold = best_known.unwrap_or(Cost::MAX);

        let scan = unwrap_from_result(route_ctx.route.tour.legs().try_fold(
            ServiceScan { best: None, code: NO_BETTER_POSITION_CODE },
            |mut scan, (items, index)| {
                let (prev, next) = (&items[0], &items[1]);
                let activity_ctx = ActivityContext { index, prev, target, next, departure: prev.schedule.departure };

                match problem.constraint.evaluate_hard_activity(route_ctx, &activity_ctx) {
                    ConstraintStatus::Fulfilled => {
                        let cost = route_costs
                            + self.activity_cost.cost(route_ctx, &activity_ctx)
                            + problem.constraint.evaluate_soft_activity(route_ctx, &activity_ctx);

                        if cost < scan.best.map_or(threshold, |(_, best)| best) {
                            scan.best = Some((index, cost));
                        }

                        Ok(scan)
                    }
                    ConstraintStatus::NotFulfilled(code) => Ok(ServiceScan { code, ..scan }),
                    ConstraintStatus::NotFulfilledBreak(code) => Err(ServiceScan { code, ..scan }),
                }
            },
        ));

        match scan.best {
            Some((index, cost)) => InsertionResult::make_success(InsertionSuccess {
                cost,
                job: job.clone(),
                actor: route_ctx.route.actor.clone(),
                route_index: candidate.index,
                pickup_index: None,
                delivery_index: index,
                events: vec![InsertionEvent::InsertActivity { activity: target.clone(), index: index + 1 }],
            }),
            None => InsertionResult::make_failure_with_code(scan.code, job),
        }
    }
}

/// Evaluates insertion of a shipment: pickup and delivery pair where pickup precedes delivery.
pub struct ShipmentInsertionCalculator {
    activity_cost: Arc<dyn ActivityInsertionCostCalculator + Send + Sync>,
}

impl ShipmentInsertionCalculator {
    /// Creates a new instance of `ShipmentInsertionCalculator`.
    pub fn new(activity_cost: Arc<dyn ActivityInsertionCostCalculator + Send + Sync>) -> Self {
        Self { activity_cost }
    }

    /// Returns departure time from the target activity when it is visited after `prev`.
    fn departure(
        &self,
        insertion_ctx: &InsertionContext,
        route_ctx: &RouteContext,
        prev: &Activity,
        target: &Activity,
        departure: Timestamp,
    ) -> Timestamp {
        let problem = &insertion_ctx.problem;
        let actor = route_ctx.route.actor.as_ref();

        let arrival = departure
            + problem.transport.duration(actor.vehicle.profile, prev.place.location, target.place.location, departure);

        arrival.max(target.place.time.start) + problem.activity.duration(actor, target, arrival)
    }
}

impl JobInsertionCalculator for ShipmentInsertionCalculator {
    fn evaluate(
        &self,
        insertion_ctx: &InsertionContext,
        candidate: &RouteCandidate,
        job: &Job,
        best_known: Option<Cost>,
    ) -> InsertionResult {
        let problem = &insertion_ctx.problem;
        let route_ctx = candidate.route_ctx;
        let tour = &route_ctx.route.tour;

        if let Some(violation) = problem.constraint.evaluate_hard_route(&insertion_ctx.solution, route_ctx, job) {
            return InsertionResult::make_failure_with_code(violation.code, job);
        }

        let activities = problem.factory.create(job);
        assert_eq!(activities.len(), 2, "shipment insertion expects a job with pickup and delivery");
        let (pickup, delivery) = (&activities[0], &activities[1]);

        let route_costs = problem.constraint.evaluate_soft_route(&insertion_ctx.solution, route_ctx, job);
        let threshold = best_known.unwrap_or(Cost::MAX);
        let last_leg = tour.total() - 1;

        // (pickup leg, delivery leg, cost)
        let mut best: Option<(usize, usize, Cost)> = None;
        let mut code = NO_BETTER_POSITION_CODE;

        for pickup_index in 0..last_leg {
            let (prev, next) = get_leg(route_ctx, pickup_index);
            let pickup_ctx =
                ActivityContext { index: pickup_index, prev, target: pickup, next, departure: prev.schedule.departure };

            match problem.constraint.evaluate_hard_activity(route_ctx, &pickup_ctx) {
                ConstraintStatus::Fulfilled => {}
                ConstraintStatus::NotFulfilled(failed) => {
                    code = failed;
                    continue;
                }
                ConstraintStatus::NotFulfilledBreak(failed) => {
                    code = failed;
                    break;
                }
            }

            let pickup_cost = self.activity_cost.cost(route_ctx, &pickup_ctx)
                + problem.constraint.evaluate_soft_activity(route_ctx, &pickup_ctx);

            // delivery is evaluated after virtually inserted pickup, departures of the following
            // activities are propagated from the pickup departure
            let mut prev = pickup;
            let mut departure = self.departure(insertion_ctx, route_ctx, pickup_ctx.prev, pickup, pickup_ctx.departure);

            for delivery_index in pickup_index..last_leg {
                let (_, next) = get_leg(route_ctx, delivery_index);
                let delivery_ctx = ActivityContext { index: delivery_index, prev, target: delivery, next, departure };

                match problem.constraint.evaluate_hard_activity(route_ctx, &delivery_ctx) {
                    ConstraintStatus::Fulfilled => {
                        let cost = route_costs
                            + pickup_cost
                            + self.activity_cost.cost(route_ctx, &delivery_ctx)
                            + problem.constraint.evaluate_soft_activity(route_ctx, &delivery_ctx);

                        if cost < best.map_or(threshold, |(_, _, best)| best) {
                            best = Some((pickup_index, delivery_index, cost));
                        }
                    }
                    ConstraintStatus::NotFulfilled(failed) => code = failed,
                    ConstraintStatus::NotFulfilledBreak(failed) => {
                        code = failed;
                        break;
                    }
                }

                departure = self.departure(insertion_ctx, route_ctx, prev, next, departure);
                prev = next;
            }
        }

        match best {
            Some((pickup_index, delivery_index, cost)) => InsertionResult::make_success(InsertionSuccess {
                cost,
                job: job.clone(),
                actor: route_ctx.route.actor.clone(),
                route_index: candidate.index,
                pickup_index: Some(pickup_index),
                delivery_index,
                events: vec![
                    InsertionEvent::InsertActivity { activity: pickup.clone(), index: pickup_index + 1 },
                    InsertionEvent::InsertActivity { activity: delivery.clone(), index: delivery_index + 2 },
                ],
            }),
            None => InsertionResult::make_failure_with_code(code, job),
        }
    }
}

/// Dispatches insertion evaluation by job type: services and shipments.
pub struct JobTypeInsertionCalculator {
    service: Arc<dyn JobInsertionCalculator + Send + Sync>,
    shipment: Arc<dyn JobInsertionCalculator + Send + Sync>,
}

impl JobTypeInsertionCalculator {
    /// Creates a new instance of `JobTypeInsertionCalculator`.
    pub fn new(
        service: Arc<dyn JobInsertionCalculator + Send + Sync>,
        shipment: Arc<dyn JobInsertionCalculator + Send + Sync>,
    ) -> Self {
        Self { service, shipment }
    }
}

impl JobInsertionCalculator for JobTypeInsertionCalculator {
    fn evaluate(
        &self,
        insertion_ctx: &InsertionContext,
        candidate: &RouteCandidate,
        job: &Job,
        best_known: Option<Cost>,
    ) -> InsertionResult {
        match job {
            Job::Single(_) => self.service.evaluate(insertion_ctx, candidate, job, best_known),
            Job::Multi(_) => self.shipment.evaluate(insertion_ctx, candidate, job, best_known),
        }
    }
}

fn get_leg(route_ctx: &RouteContext, index: usize) -> (&Activity, &Activity) {
    let tour = &route_ctx.route.tour;
    match (tour.get(index), tour.get(index + 1)) {
        (Some(prev), Some(next)) => (prev, next),
        _ => panic!("leg index {index} is out of tour range"),
    }
}
