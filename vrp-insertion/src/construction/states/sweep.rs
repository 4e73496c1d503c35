#[cfg(test)]
#[path = "../../../tests/unit/construction/states/sweep_test.rs"]
mod sweep_test;

use crate::construction::states::{RouteContext, RouteState};
use crate::models::common::Timestamp;
use crate::models::problem::{ActivityCost, TransportCost};
use crate::models::solution::Route;
use std::sync::Arc;

/// A listener of forward route sweep: it is called for every activity from start to end.
pub trait ForwardVisitor {
    /// Called before tour start is visited.
    fn begin(&self, _route: &Route, _state: &mut RouteState) {}

    /// Visits activity at given index within its arrival and departure (end of operation) time.
    fn visit(&self, route: &Route, state: &mut RouteState, index: usize, arrival: Timestamp, departure: Timestamp);

    /// Called after tour end is visited.
    fn finish(&self, _route: &Route, _state: &mut RouteState) {}
}

/// A listener of backward route sweep: it is called for every activity from end to start.
/// Values of the next activity are already in the state when the activity is visited.
pub trait BackwardVisitor {
    /// Called before tour end is visited.
    fn begin(&self, _route: &Route, _state: &mut RouteState) {}

    /// Visits activity at given index.
    fn visit(&self, route: &Route, state: &mut RouteState, index: usize);

    /// Called after tour start is visited.
    fn finish(&self, _route: &Route, _state: &mut RouteState) {}
}

/// A variant type for state visitors.
#[derive(Clone)]
pub enum StateVisitor {
    /// Visitor of forward sweep.
    Forward(Arc<dyn ForwardVisitor + Send + Sync>),
    /// Visitor of backward sweep.
    Backward(Arc<dyn BackwardVisitor + Send + Sync>),
}

/// Recomputes activity schedules starting from tour start departure and notifies visitors in registration order.
pub struct ForwardSweep {
    transport: Arc<dyn TransportCost + Send + Sync>,
    activity: Arc<dyn ActivityCost + Send + Sync>,
    visitors: Vec<Arc<dyn ForwardVisitor + Send + Sync>>,
}

impl ForwardSweep {
    /// Creates a new instance of `ForwardSweep`.
    pub fn new(transport: Arc<dyn TransportCost + Send + Sync>, activity: Arc<dyn ActivityCost + Send + Sync>) -> Self {
        Self { transport, activity, visitors: vec![] }
    }

    /// Adds a visitor.
    pub fn add_visitor(&mut self, visitor: Arc<dyn ForwardVisitor + Send + Sync>) -> &mut Self {
        self.visitors.push(visitor);
        self
    }

    /// Runs the sweep: arrival = previous departure + transport time,
    /// departure = max(arrival, time window start) + operation time.
    pub fn run(&self, route_ctx: &mut RouteContext) {
        let (route, state) = route_ctx.as_mut();
        let actor = route.actor.clone();

        let init = {
            let start = route.tour.start();
            (start.place.location, start.schedule.departure)
        };

        route.tour.all_activities_mut().skip(1).fold(init, |(location, departure), activity| {
            activity.schedule.arrival =
                departure + self.transport.duration(actor.vehicle.profile, location, activity.place.location, departure);
            activity.schedule.departure = activity.schedule.arrival.max(activity.place.time.start)
                + self.activity.duration(actor.as_ref(), activity, activity.schedule.arrival);

            (activity.place.location, activity.schedule.departure)
        });

        let route = &*route;
        self.visitors.iter().for_each(|visitor| visitor.begin(route, state));
        route.tour.all_activities().enumerate().for_each(|(index, activity)| {
            self.visitors
                .iter()
                .for_each(|visitor| visitor.visit(route, state, index, activity.schedule.arrival, activity.schedule.departure))
        });
        self.visitors.iter().for_each(|visitor| visitor.finish(route, state));
    }
}

/// Visits activities from tour end to tour start notifying visitors in registration order.
#[derive(Default)]
pub struct BackwardSweep {
    visitors: Vec<Arc<dyn BackwardVisitor + Send + Sync>>,
}

impl BackwardSweep {
    /// Adds a visitor.
    pub fn add_visitor(&mut self, visitor: Arc<dyn BackwardVisitor + Send + Sync>) -> &mut Self {
        self.visitors.push(visitor);
        self
    }

    /// Runs the sweep.
    pub fn run(&self, route_ctx: &mut RouteContext) {
        let (route, state) = route_ctx.as_mut();
        let route = &*route;

        self.visitors.iter().for_each(|visitor| visitor.begin(route, state));
        (0..route.tour.total()).rev().for_each(|index| {
            self.visitors.iter().for_each(|visitor| visitor.visit(route, state, index));
        });
        self.visitors.iter().for_each(|visitor| visitor.finish(route, state));
    }
}
