#[cfg(test)]
#[path = "../../../tests/unit/construction/constraints/costs_test.rs"]
mod costs_test;

use crate::construction::constraints::*;
use crate::construction::states::*;
use crate::models::common::Timestamp;
use crate::models::problem::{ActivityCost, TransportCost};
use crate::models::solution::Route;
use std::slice::Iter;
use std::sync::Arc;

/// Keeps accumulated costs per activity and total cost, distance and duration of the route.
/// It has no constraints: its states are used by cost calculators.
pub struct RouteCostModule {
    state_keys: Vec<i32>,
    visitors: Vec<StateVisitor>,
    constraints: Vec<ConstraintVariant>,
}

impl RouteCostModule {
    /// Creates a new instance of `RouteCostModule`.
    pub fn new(transport: Arc<dyn TransportCost + Send + Sync>, activity: Arc<dyn ActivityCost + Send + Sync>) -> Self {
        Self {
            state_keys: vec![
                ACCUMULATED_COST_KEY.id(),
                TOTAL_COST_KEY.id(),
                TOTAL_DISTANCE_KEY.id(),
                TOTAL_DURATION_KEY.id(),
            ],
            visitors: vec![StateVisitor::Forward(Arc::new(RouteCostVisitor { transport, activity }))],
            constraints: vec![],
        }
    }
}

impl ConstraintModule for RouteCostModule {
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

struct RouteCostVisitor {
    transport: Arc<dyn TransportCost + Send + Sync>,
    activity: Arc<dyn ActivityCost + Send + Sync>,
}

impl ForwardVisitor for RouteCostVisitor {
    fn visit(&self, route: &Route, state: &mut RouteState, index: usize, arrival: Timestamp, _: Timestamp) {
        let actor = route.actor.as_ref();

        let accumulated = match (index.checked_sub(1).and_then(|prev| route.tour.get(prev)), route.tour.get(index)) {
            (Some(prev), Some(activity)) => {
                state.get_activity_state_or(ACCUMULATED_COST_KEY, index - 1, 0.)
                    + self.transport.cost(actor, prev.place.location, activity.place.location, prev.schedule.departure)
                    + self.activity.cost(actor, activity, arrival)
            }
            _ => 0.,
        };

        state.put_activity_state(ACCUMULATED_COST_KEY, index, accumulated);
    }

    fn finish(&self, route: &Route, state: &mut RouteState) {
        let profile = route.actor.vehicle.profile;
        let distance = route
            .tour
            .legs()
            .map(|(leg, _)| {
                let (prev, next) = (&leg[0], &leg[1]);
                self.transport.distance(profile, prev.place.location, next.place.location, prev.schedule.departure)
            })
            .sum::<f64>();

        let last = route.tour.total() - 1;
        let total_cost = state.get_activity_state_or(ACCUMULATED_COST_KEY, last, 0.);
        let duration = route.tour.end().schedule.arrival - route.tour.start().schedule.departure;

        state.put_route_state(TOTAL_COST_KEY, total_cost);
        state.put_route_state(TOTAL_DISTANCE_KEY, distance);
        state.put_route_state(TOTAL_DURATION_KEY, duration);
    }
}
