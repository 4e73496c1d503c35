#[cfg(test)]
#[path = "../../../tests/unit/construction/heuristics/listeners_test.rs"]
mod listeners_test;

use crate::construction::heuristics::InsertionSuccess;
use crate::construction::states::InsertionContext;
use crate::models::problem::{Actor, Job};
use std::sync::Arc;

/// Listens to insertion process events. Listeners are the only place where
/// solution-level side effects (actor locks, route states, etc.) are applied.
pub trait InsertionListener {
    /// Called before insertion of a jobs batch starts.
    fn insertion_starts(&self, _insertion_ctx: &mut InsertionContext) {}

    /// Called when route with given index gets a new actor. Previous actor is none for a new route.
    fn vehicle_switched(
        &self,
        _insertion_ctx: &mut InsertionContext,
        _route_index: usize,
        _previous: Option<&Arc<Actor>>,
        _actor: &Arc<Actor>,
    ) {
    }

    /// Called before insertion is applied to the solution.
    fn job_inserting(&self, _insertion_ctx: &mut InsertionContext, _success: &InsertionSuccess) {}

    /// Called when job is inserted into the route with given index.
    fn job_inserted(&self, _insertion_ctx: &mut InsertionContext, _route_index: usize, _job: &Job) {}

    /// Called when job cannot be inserted.
    fn job_unassigned(&self, _insertion_ctx: &mut InsertionContext, _job: &Job, _code: i32) {}

    /// Called when job is removed from the route with given index. Route index is none when
    /// the route became empty and was closed.
    fn job_removed(&self, _insertion_ctx: &mut InsertionContext, _route_index: Option<usize>, _job: &Job) {}

    /// Called when insertion of a jobs batch ends.
    fn insertion_ends(&self, _insertion_ctx: &mut InsertionContext) {}
}

/// Keeps a list of insertion listeners and notifies them in registration order.
#[derive(Clone, Default)]
pub struct InsertionListeners {
    listeners: Vec<Arc<dyn InsertionListener + Send + Sync>>,
}

impl InsertionListeners {
    /// Creates listeners list with default listeners which keep actor registry,
    /// route states and completeness ratio up to date.
    pub fn new_with_defaults() -> Self {
        let mut listeners = Self::default();
        listeners
            .add(Arc::new(RegistryListener::default()))
            .add(Arc::new(StateUpdateListener::default()))
            .add(Arc::new(CompletenessRatioListener::default()));

        listeners
    }

    /// Adds a new listener.
    pub fn add(&mut self, listener: Arc<dyn InsertionListener + Send + Sync>) -> &mut Self {
        self.listeners.push(listener);
        self
    }

    /// Returns amount of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Checks whether there is no registered listener.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl InsertionListener for InsertionListeners {
    fn insertion_starts(&self, insertion_ctx: &mut InsertionContext) {
        self.listeners.iter().for_each(|l| l.insertion_starts(insertion_ctx))
    }

    fn vehicle_switched(
        &self,
        insertion_ctx: &mut InsertionContext,
        route_index: usize,
        previous: Option<&Arc<Actor>>,
        actor: &Arc<Actor>,
    ) {
        self.listeners.iter().for_each(|l| l.vehicle_switched(insertion_ctx, route_index, previous, actor))
    }

    fn job_inserting(&self, insertion_ctx: &mut InsertionContext, success: &InsertionSuccess) {
        self.listeners.iter().for_each(|l| l.job_inserting(insertion_ctx, success))
    }

    fn job_inserted(&self, insertion_ctx: &mut InsertionContext, route_index: usize, job: &Job) {
        self.listeners.iter().for_each(|l| l.job_inserted(insertion_ctx, route_index, job))
    }

    fn job_unassigned(&self, insertion_ctx: &mut InsertionContext, job: &Job, code: i32) {
        self.listeners.iter().for_each(|l| l.job_unassigned(insertion_ctx, job, code))
    }

    fn job_removed(&self, insertion_ctx: &mut InsertionContext, route_index: Option<usize>, job: &Job) {
        self.listeners.iter().for_each(|l| l.job_removed(insertion_ctx, route_index, job))
    }

    fn insertion_ends(&self, insertion_ctx: &mut InsertionContext) {
        self.listeners.iter().for_each(|l| l.insertion_ends(insertion_ctx))
    }
}

/// Locks and unlocks actors in registry when routes get new actors. An actor serves at most one route.
#[derive(Default)]
pub struct RegistryListener {}

impl InsertionListener for RegistryListener {
    fn vehicle_switched(
        &self,
        insertion_ctx: &mut InsertionContext,
        _route_index: usize,
        previous: Option<&Arc<Actor>>,
        actor: &Arc<Actor>,
    ) {
        let registry = &mut insertion_ctx.solution.registry;

        if let Some(previous) = previous {
            registry.free_actor(previous);
        }
        let is_locked = registry.use_actor(actor);
        assert!(is_locked, "actor is already used by another route");
    }
}

/// Updates route states after insertion or removal of the job.
#[derive(Default)]
pub struct StateUpdateListener {}

impl InsertionListener for StateUpdateListener {
    fn vehicle_switched(
        &self,
        insertion_ctx: &mut InsertionContext,
        route_index: usize,
        _previous: Option<&Arc<Actor>>,
        _actor: &Arc<Actor>,
    ) {
        let problem = insertion_ctx.problem.clone();
        problem.constraint.accept_route_state(&mut insertion_ctx.solution.routes[route_index]);
    }

    fn job_inserted(&self, insertion_ctx: &mut InsertionContext, route_index: usize, job: &Job) {
        let problem = insertion_ctx.problem.clone();
        problem.constraint.accept_insertion(&mut insertion_ctx.solution, route_index, job);
    }

    fn job_removed(&self, insertion_ctx: &mut InsertionContext, route_index: Option<usize>, _job: &Job) {
        if let Some(route_index) = route_index {
            let problem = insertion_ctx.problem.clone();
            problem.constraint.accept_route_state(&mut insertion_ctx.solution.routes[route_index]);
        }
    }
}

/// Refreshes solution completeness ratio: a fraction of assigned jobs.
#[derive(Default)]
pub struct CompletenessRatioListener {}

impl InsertionListener for CompletenessRatioListener {
    fn insertion_starts(&self, insertion_ctx: &mut InsertionContext) {
        let solution = &mut insertion_ctx.solution;
        let assigned = solution.get_assigned_count();
        let total = assigned + solution.required.len();

        solution.completeness_ratio = if total == 0 { 1. } else { assigned as f64 / total as f64 };
    }
}
