#[cfg(test)]
#[path = "../../../tests/unit/construction/constraints/capacity_test.rs"]
mod capacity_test;

use crate::construction::constraints::*;
use crate::construction::states::*;
use crate::models::common::{Demand, Load};
use crate::models::problem::Job;
use crate::models::solution::Route;
use std::slice::Iter;
use std::sync::Arc;

/// Checks whether vehicle can handle activity's demand.
/// Keeps current, max past and max future loads updated by route sweeps.
pub struct CapacityConstraintModule {
    state_keys: Vec<i32>,
    visitors: Vec<StateVisitor>,
    constraints: Vec<ConstraintVariant>,
}

impl CapacityConstraintModule {
    /// Creates a new instance of `CapacityConstraintModule`.
    pub fn new(code: i32) -> Self {
        Self {
            state_keys: vec![
                CURRENT_LOAD_KEY.id(),
                MAX_PAST_LOAD_KEY.id(),
                MAX_FUTURE_LOAD_KEY.id(),
                MAX_LOAD_KEY.id(),
                LOAD_VIOLATION_KEY.id(),
            ],
            visitors: vec![
                StateVisitor::Forward(Arc::new(CurrentLoadVisitor {})),
                StateVisitor::Backward(Arc::new(MaxFutureLoadVisitor {})),
            ],
            constraints: vec![
                ConstraintVariant::HardRoute(Arc::new(CapacityHardRouteConstraint { code })),
                ConstraintVariant::HardActivity(Arc::new(CapacityHardActivityConstraint { code })),
            ],
        }
    }
}

impl ConstraintModule for CapacityConstraintModule {
    fn state_keys(&self) -> Iter<i32> {
        self.state_keys.iter()
    }

    fn state_visitors(&self) -> Iter<StateVisitor> {
        self.visitors.iter()
    }

    fn get_constraints(&self) -> Iter<ConstraintVariant> {
        self.constraints.iter()
    }
}

fn get_demand(route: &Route, index: usize) -> Demand {
    route.tour.get(index).and_then(|activity| activity.job.as_ref()).map(|single| single.demand()).unwrap_or_default()
}

/// Calculates load at each activity: the tour starts loaded with all static deliveries.
/// Overload or negative load is recorded as route state, the sweep itself never fails.
struct CurrentLoadVisitor {}

impl ForwardVisitor for CurrentLoadVisitor {
    fn begin(&self, _: &Route, state: &mut RouteState) {
        state.put_route_state(LOAD_VIOLATION_KEY, false);
    }

    fn visit(&self, route: &Route, state: &mut RouteState, index: usize, _: f64, _: f64) {
        let (current, max_past) = if index == 0 {
            let start_load: Load = route
                .tour
                .all_activities()
                .filter_map(|activity| activity.job.as_ref())
                .map(|single| single.demand().delivery.0)
                .sum();
            (start_load, start_load)
        } else {
            let current = state.get_activity_state_or(CURRENT_LOAD_KEY, index - 1, 0) + get_demand(route, index).change();
            (current, state.get_activity_state_or(MAX_PAST_LOAD_KEY, index - 1, 0).max(current))
        };

        if current < 0 || current > route.actor.vehicle.capacity() {
            state.put_route_state(LOAD_VIOLATION_KEY, true);
        }

        state.put_activity_state(CURRENT_LOAD_KEY, index, current);
        state.put_activity_state(MAX_PAST_LOAD_KEY, index, max_past);
    }

    fn finish(&self, route: &Route, state: &mut RouteState) {
        let max_load = state.get_activity_state_or(MAX_PAST_LOAD_KEY, route.tour.total() - 1, 0);
        state.put_route_state(MAX_LOAD_KEY, max_load);
    }
}

struct MaxFutureLoadVisitor {}

impl BackwardVisitor for MaxFutureLoadVisitor {
    fn visit(&self, route: &Route, state: &mut RouteState, index: usize) {
        let current = state.get_activity_state_or(CURRENT_LOAD_KEY, index, 0);
        let max_future = if index + 1 < route.tour.total() {
            state.get_activity_state_or(MAX_FUTURE_LOAD_KEY, index + 1, current).max(current)
        } else {
            current
        };

        state.put_activity_state(MAX_FUTURE_LOAD_KEY, index, max_future);
    }
}

struct CapacityHardRouteConstraint {
    code: i32,
}

impl HardRouteConstraint for CapacityHardRouteConstraint {
    fn priority(&self) -> ConstraintPriority {
        ConstraintPriority::Critical
    }

    fn evaluate_job(&self, _: &SolutionContext, route_ctx: &RouteContext, job: &Job) -> Option<RouteConstraintViolation> {
        let capacity = route_ctx.route.actor.vehicle.capacity();
        let state = &route_ctx.state;

        let start_load = state.get_activity_state_or(CURRENT_LOAD_KEY, 0, 0);
        let end_load = state.get_activity_state_or(CURRENT_LOAD_KEY, route_ctx.route.tour.total() - 1, 0);

        let can_handle = match job {
            Job::Single(single) => {
                let demand = single.demand();
                start_load + demand.delivery.0 <= capacity && end_load + demand.pickup.0 <= capacity
            }
            Job::Multi(multi) => multi.pickup().demand().pickup.1 <= capacity,
        };

        if can_handle && !state.get_route_state_or(LOAD_VIOLATION_KEY, false) {
            None
        } else {
            Some(RouteConstraintViolation { code: self.code })
        }
    }
}

/// Checks load at insertion position:
/// * static delivery increases load from tour start till the activity: max past load is checked and
///   the violation holds for all next positions
/// * static pickup increases load from the activity till tour end: max future load is checked
/// * shipment pickup increases load from the activity: current load is checked here, the rest is
///   checked while delivery is moved forward, and that violation holds for all next delivery positions.
struct CapacityHardActivityConstraint {
    code: i32,
}

impl HardActivityConstraint for CapacityHardActivityConstraint {
    fn priority(&self) -> ConstraintPriority {
        ConstraintPriority::Critical
    }

    fn evaluate_activity(&self, route_ctx: &RouteContext, activity_ctx: &ActivityContext) -> ConstraintStatus {
        let Some(demand) = activity_ctx.target.job.as_ref().map(|single| single.demand()) else {
            return ConstraintStatus::Fulfilled;
        };

        let capacity = route_ctx.route.actor.vehicle.capacity();
        let state = &route_ctx.state;
        let index = activity_ctx.index;

        let current = || state.get_activity_state_or(CURRENT_LOAD_KEY, index, 0);

        if demand.delivery.0 > 0 && state.get_activity_state_or(MAX_PAST_LOAD_KEY, index, 0) + demand.delivery.0 > capacity
        {
            return ConstraintStatus::NotFulfilledBreak(self.code);
        }

        if demand.pickup.0 > 0 && state.get_activity_state_or(MAX_FUTURE_LOAD_KEY, index, 0) + demand.pickup.0 > capacity
        {
            return ConstraintStatus::NotFulfilled(self.code);
        }

        if demand.pickup.1 > 0 && current() + demand.pickup.1 > capacity {
            return ConstraintStatus::NotFulfilled(self.code);
        }

        if demand.delivery.1 > 0 && activity_ctx.is_prev_in_route() && current() + demand.delivery.1 > capacity {
            return ConstraintStatus::NotFulfilledBreak(self.code);
        }

        ConstraintStatus::Fulfilled
    }
}
