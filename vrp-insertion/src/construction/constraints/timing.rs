#[cfg(test)]
#[path = "../../../tests/unit/construction/constraints/timing_test.rs"]
mod timing_test;

use crate::construction::constraints::*;
use crate::construction::states::*;
use crate::models::problem::{ActivityCost, Job, TransportCost};
use crate::models::solution::Route;
use crate::utils::compare_floats;
use std::cmp::Ordering;
use std::slice::Iter;
use std::sync::Arc;

/// Checks whether vehicle can serve activity taking into account their time windows.
/// Keeps latest arrival and future waiting states updated by backward sweep.
pub struct TimingConstraintModule {
    state_keys: Vec<i32>,
    visitors: Vec<StateVisitor>,
    constraints: Vec<ConstraintVariant>,
}

impl TimingConstraintModule {
    /// Creates a new instance of `TimingConstraintModule`.
    pub fn new(
        transport: Arc<dyn TransportCost + Send + Sync>,
        activity: Arc<dyn ActivityCost + Send + Sync>,
        code: i32,
    ) -> Self {
        Self {
            state_keys: vec![LATEST_ARRIVAL_KEY.id(), WAITING_KEY.id(), TIME_VIOLATION_KEY.id()],
            visitors: vec![StateVisitor::Backward(Arc::new(LatestArrivalVisitor {
                transport: transport.clone(),
                activity: activity.clone(),
            }))],
            constraints: vec![
                ConstraintVariant::HardRoute(Arc::new(TimeHardRouteConstraint { code })),
                ConstraintVariant::HardActivity(Arc::new(TimeHardActivityConstraint { code, transport, activity })),
            ],
        }
    }
}

impl ConstraintModule for TimingConstraintModule {
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

/// Propagates latest feasible arrival backward: each activity's latest arrival is tightened by
/// the next activity's latest arrival minus transport and operation time.
struct LatestArrivalVisitor {
    transport: Arc<dyn TransportCost + Send + Sync>,
    activity: Arc<dyn ActivityCost + Send + Sync>,
}

impl BackwardVisitor for LatestArrivalVisitor {
    fn begin(&self, _: &Route, state: &mut RouteState) {
        state.put_route_state(TIME_VIOLATION_KEY, false);
    }

    fn visit(&self, route: &Route, state: &mut RouteState, index: usize) {
        let actor = route.actor.as_ref();
        let Some(activity) = route.tour.get(index) else { return };

        let (latest_arrival, waiting) = match route.tour.get(index + 1) {
            Some(next) => {
                let latest_next = state.get_activity_state_or(LATEST_ARRIVAL_KEY, index + 1, next.place.time.end);
                let potential_latest = latest_next
                    - self.transport.duration(
                        actor.vehicle.profile,
                        activity.place.location,
                        next.place.location,
                        latest_next,
                    )
                    - self.activity.duration(actor, activity, latest_next);

                let future_waiting = state.get_activity_state_or(WAITING_KEY, index + 1, 0.)
                    + (activity.place.time.start - activity.schedule.arrival).max(0.);

                (activity.place.time.end.min(potential_latest), future_waiting)
            }
            None => (activity.place.time.end.min(actor.detail.time.end), 0.),
        };

        if compare_floats(activity.schedule.arrival, latest_arrival) == Ordering::Greater {
            state.put_route_state(TIME_VIOLATION_KEY, true);
        }

        state.put_activity_state(LATEST_ARRIVAL_KEY, index, latest_arrival);
        state.put_activity_state(WAITING_KEY, index, waiting);
    }
}

/// Rejects jobs which time windows do not overlap with actor's shift and routes which are already late.
struct TimeHardRouteConstraint {
    code: i32,
}

impl HardRouteConstraint for TimeHardRouteConstraint {
    fn evaluate_job(&self, _: &SolutionContext, route_ctx: &RouteContext, job: &Job) -> Option<RouteConstraintViolation> {
        let shift = &route_ctx.route.actor.detail.time;
        let is_late = route_ctx.state.get_route_state_or(TIME_VIOLATION_KEY, false);

        if is_late || !job.places().all(|place| place.time.intersects(shift)) {
            Some(RouteConstraintViolation { code: self.code })
        } else {
            None
        }
    }
}

struct TimeHardActivityConstraint {
    code: i32,
    transport: Arc<dyn TransportCost + Send + Sync>,
    activity: Arc<dyn ActivityCost + Send + Sync>,
}

impl TimeHardActivityConstraint {
    fn fail(&self) -> ConstraintStatus {
        ConstraintStatus::NotFulfilled(self.code)
    }

    fn stop(&self) -> ConstraintStatus {
        ConstraintStatus::NotFulfilledBreak(self.code)
    }
}

impl HardActivityConstraint for TimeHardActivityConstraint {
    fn evaluate_activity(&self, route_ctx: &RouteContext, activity_ctx: &ActivityContext) -> ConstraintStatus {
        let actor = route_ctx.route.actor.as_ref();
        let profile = actor.vehicle.profile;

        let prev = activity_ctx.prev;
        let target = activity_ctx.target;
        let next = activity_ctx.next;
        let departure = activity_ctx.departure;

        if actor.detail.time.end < prev.place.time.start
            || actor.detail.time.end < target.place.time.start
            || actor.detail.time.end < next.place.time.start
        {
            return self.stop();
        }

        let latest_arr_time_at_next = route_ctx.state.get_activity_state_or(
            LATEST_ARRIVAL_KEY,
            activity_ctx.index + 1,
            next.place.time.end.min(actor.detail.time.end),
        );

        let arr_time_at_next = departure + self.transport.duration(profile, prev.place.location, next.place.location, departure);
        if arr_time_at_next > latest_arr_time_at_next {
            return self.stop();
        }

        if target.place.time.start > latest_arr_time_at_next {
            return self.fail();
        }

        let arr_time_at_target =
            departure + self.transport.duration(profile, prev.place.location, target.place.location, departure);
        let end_time_at_target = arr_time_at_target.max(target.place.time.start)
            + self.activity.duration(actor, target, arr_time_at_target);

        let latest_arr_time_at_target = target.place.time.end.min(
            latest_arr_time_at_next
                - self.transport.duration(profile, target.place.location, next.place.location, end_time_at_target)
                - self.activity.duration(actor, target, arr_time_at_target),
        );

        if arr_time_at_target > latest_arr_time_at_target {
            return self.fail();
        }

        let arr_time_at_next_act = end_time_at_target
            + self.transport.duration(profile, target.place.location, next.place.location, end_time_at_target);

        if arr_time_at_next_act > latest_arr_time_at_next { self.fail() } else { ConstraintStatus::Fulfilled }
    }
}
