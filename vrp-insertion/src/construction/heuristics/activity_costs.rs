#[cfg(test)]
#[path = "../../../tests/unit/construction/heuristics/activity_costs_test.rs"]
mod activity_costs_test;

use crate::construction::constraints::ACCUMULATED_COST_KEY;
use crate::construction::states::{ActivityContext, RouteContext};
use crate::models::common::{Cost, Timestamp};
use crate::models::problem::{ActivityCost, Actor, TransportCost};
use crate::models::solution::Activity;
use std::sync::Arc;

/// Calculates marginal cost of inserting an activity between two consecutive activities.
pub trait ActivityInsertionCostCalculator {
    /// Returns marginal cost of the insertion described by activity context.
    fn cost(&self, route_ctx: &RouteContext, activity_ctx: &ActivityContext) -> Cost;
}

/// Estimates insertion cost as a detour:
/// `transport(prev, target) + transport(target, next) + activity costs` minus the same for `prev` and `next`.
pub struct LocalActivityInsertionCostCalculator {
    transport: Arc<dyn TransportCost + Send + Sync>,
    activity: Arc<dyn ActivityCost + Send + Sync>,
}

impl LocalActivityInsertionCostCalculator {
    /// Creates a new instance of `LocalActivityInsertionCostCalculator`.
    pub fn new(transport: Arc<dyn TransportCost + Send + Sync>, activity: Arc<dyn ActivityCost + Send + Sync>) -> Self {
        Self { transport, activity }
    }

    fn analyze_route_leg(&self, actor: &Actor, start: &Activity, end: &Activity, time: Timestamp) -> (Cost, Timestamp) {
        let arrival =
            time + self.transport.duration(actor.vehicle.profile, start.place.location, end.place.location, time);
        let departure = arrival.max(end.place.time.start) + self.activity.duration(actor, end, arrival);

        let transport_cost = self.transport.cost(actor, start.place.location, end.place.location, time);
        let activity_cost = self.activity.cost(actor, end, arrival);

        (transport_cost + activity_cost, departure)
    }
}

impl ActivityInsertionCostCalculator for LocalActivityInsertionCostCalculator {
    fn cost(&self, route_ctx: &RouteContext, activity_ctx: &ActivityContext) -> Cost {
        let actor = route_ctx.route.actor.as_ref();

        let prev = activity_ctx.prev;
        let target = activity_ctx.target;
        let next = activity_ctx.next;
        let departure = activity_ctx.departure;

        let (cost_left, dep_time_left) = self.analyze_route_leg(actor, prev, target, departure);
        let (cost_right, _) = self.analyze_route_leg(actor, target, next, dep_time_left);
        let (cost_old, _) = self.analyze_route_leg(actor, prev, next, departure);

        cost_left + cost_right - cost_old
    }
}

/// Estimates insertion cost by re-costing a bounded window of activities after the insertion point:
/// their arrival shifts are taken into account, the rest of the route is assumed to be unaffected.
/// The estimation is approximate by its nature: it is not checked against full route recalculation.
pub struct LookAheadActivityInsertionCostCalculator {
    local: LocalActivityInsertionCostCalculator,
    transport: Arc<dyn TransportCost + Send + Sync>,
    activity: Arc<dyn ActivityCost + Send + Sync>,
    window: usize,
}

impl LookAheadActivityInsertionCostCalculator {
    /// Creates a new instance of `LookAheadActivityInsertionCostCalculator` with given forward-looking window.
    pub fn new(
        transport: Arc<dyn TransportCost + Send + Sync>,
        activity: Arc<dyn ActivityCost + Send + Sync>,
        window: usize,
    ) -> Self {
        Self {
            local: LocalActivityInsertionCostCalculator::new(transport.clone(), activity.clone()),
            transport,
            activity,
            window,
        }
    }
}

impl ActivityInsertionCostCalculator for LookAheadActivityInsertionCostCalculator {
    fn cost(&self, route_ctx: &RouteContext, activity_ctx: &ActivityContext) -> Cost {
        // accumulated costs are not known for an activity which is not in the route yet
        if !activity_ctx.is_prev_in_route() {
            return self.local.cost(route_ctx, activity_ctx);
        }

        let actor = route_ctx.route.actor.as_ref();
        let profile = actor.vehicle.profile;
        let tour = &route_ctx.route.tour;

        let last_index = (activity_ctx.index + 1 + self.window).min(tour.total() - 1);
        let path = std::iter::once(activity_ctx.target)
            .chain(tour.activities_slice(activity_ctx.index + 1, last_index).iter());

        let (new_costs, _, _) = path.fold(
            (0., activity_ctx.prev, activity_ctx.departure),
            |(total, prev, departure), activity| {
                let arrival =
                    departure + self.transport.duration(profile, prev.place.location, activity.place.location, departure);
                let cost = self.transport.cost(actor, prev.place.location, activity.place.location, departure)
                    + self.activity.cost(actor, activity, arrival);
                let departure = arrival.max(activity.place.time.start) + self.activity.duration(actor, activity, arrival);

                (total + cost, activity, departure)
            },
        );

        let old_costs = route_ctx.state.get_activity_state_or(ACCUMULATED_COST_KEY, last_index, 0.)
            - route_ctx.state.get_activity_state_or(ACCUMULATED_COST_KEY, activity_ctx.index, 0.);

        new_costs - old_costs
    }
}
