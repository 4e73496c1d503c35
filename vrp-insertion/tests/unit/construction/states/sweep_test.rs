use super::*;
use crate::helpers::models::problem::*;
use crate::helpers::models::solution::*;
use std::sync::Mutex;

struct RecordingVisitor {
    name: &'static str,
    events: Arc<Mutex<Vec<String>>>,
}

impl RecordingVisitor {
    fn record(&self, event: String) {
        self.events.lock().unwrap().push(format!("{}:{event}", self.name));
    }
}

impl ForwardVisitor for RecordingVisitor {
    fn begin(&self, _: &Route, _: &mut RouteState) {
        self.record("begin".to_string());
    }

    fn visit(&self, _: &Route, _: &mut RouteState, index: usize, arrival: Timestamp, departure: Timestamp) {
        self.record(format!("{index}({arrival},{departure})"));
    }

    fn finish(&self, _: &Route, _: &mut RouteState) {
        self.record("finish".to_string());
    }
}

impl BackwardVisitor for RecordingVisitor {
    fn visit(&self, _: &Route, _: &mut RouteState, index: usize) {
        self.record(format!("{index}"));
    }
}

fn create_route_ctx() -> RouteContext {
    let job = SingleBuilder::default().location(10).time_window(20., 100.).duration(5.).build_shared();
    RouteContext { route: RouteBuilder::default().add_activity(test_activity_with_job(job)).build(), state: Default::default() }
}

fn create_forward_sweep() -> ForwardSweep {
    ForwardSweep::new(TestTransportCost::new_shared(), test_activity_cost())
}

#[test]
fn can_update_schedules_within_forward_sweep() {
    let mut route_ctx = create_route_ctx();

    create_forward_sweep().run(&mut route_ctx);

    let schedules = route_ctx
        .route
        .tour
        .all_activities()
        .map(|activity| (activity.schedule.arrival, activity.schedule.departure))
        .collect::<Vec<_>>();
    assert_eq!(schedules, vec![(0., 0.), (10., 25.), (35., 35.)]);
}

#[test]
fn can_notify_forward_visitors_in_registration_order() {
    let events = Arc::new(Mutex::new(vec![]));
    let mut sweep = create_forward_sweep();
    sweep
        .add_visitor(Arc::new(RecordingVisitor { name: "a", events: events.clone() }))
        .add_visitor(Arc::new(RecordingVisitor { name: "b", events: events.clone() }));

    sweep.run(&mut create_route_ctx());

    assert_eq!(
        events.lock().unwrap().clone(),
        vec![
            "a:begin",
            "b:begin",
            "a:0(0,0)",
            "b:0(0,0)",
            "a:1(10,25)",
            "b:1(10,25)",
            "a:2(35,35)",
            "b:2(35,35)",
            "a:finish",
            "b:finish"
        ]
    );
}

#[test]
fn can_visit_activities_in_reverse_order_within_backward_sweep() {
    let events = Arc::new(Mutex::new(vec![]));
    let mut sweep = BackwardSweep::default();
    sweep.add_visitor(Arc::new(RecordingVisitor { name: "a", events: events.clone() }));

    sweep.run(&mut create_route_ctx());

    assert_eq!(events.lock().unwrap().clone(), vec!["a:2", "a:1", "a:0"]);
}

#[test]
fn can_produce_same_schedule_when_sweep_is_repeated() {
    let mut route_ctx = create_route_ctx();
    let sweep = create_forward_sweep();

    sweep.run(&mut route_ctx);
    let first = route_ctx.route.tour.all_activities().map(|a| a.schedule.departure).collect::<Vec<_>>();
    sweep.run(&mut route_ctx);
    let second = route_ctx.route.tour.all_activities().map(|a| a.schedule.departure).collect::<Vec<_>>();

    assert_eq!(first, second);
}
