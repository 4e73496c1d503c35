#[cfg(test)]
#[path = "../../../tests/unit/construction/constraints/pipeline_test.rs"]
mod pipeline_test;

use crate::construction::states::*;
use crate::models::common::Cost;
use crate::models::problem::{ActivityCost, Job, TransportCost};
use crate::utils::unwrap_from_result;
use rustc_hash::FxHashSet;
use std::slice::Iter;
use std::sync::Arc;

/// Specifies evaluation order of hard constraints: critical constraints are evaluated first to fail fast.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConstraintPriority {
    /// Constraint which is cheap to check and prunes a lot.
    Critical,
    /// Regular constraint.
    #[default]
    High,
    /// Constraint which is expensive or rarely violated.
    Low,
}

/// A three-valued verdict of hard activity constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstraintStatus {
    /// Insertion at the position is feasible.
    Fulfilled,
    /// Insertion at the position is infeasible, but the next positions of the same route can be feasible.
    NotFulfilled(i32),
    /// Insertion at the position and all next positions of the same route are infeasible.
    NotFulfilledBreak(i32),
}

impl ConstraintStatus {
    /// Returns the worst status: break overrides failure, failure overrides success.
    pub fn worst(self, other: ConstraintStatus) -> ConstraintStatus {
        if other.severity() > self.severity() { other } else { self }
    }

    /// Returns violation code if any.
    pub fn code(&self) -> Option<i32> {
        match self {
            ConstraintStatus::Fulfilled => None,
            ConstraintStatus::NotFulfilled(code) | ConstraintStatus::NotFulfilledBreak(code) => Some(*code),
        }
    }

    /// Checks whether status is fulfilled.
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, ConstraintStatus::Fulfilled)
    }

    fn severity(&self) -> usize {
        match self {
            ConstraintStatus::Fulfilled => 0,
            ConstraintStatus::NotFulfilled(_) => 1,
            ConstraintStatus::NotFulfilledBreak(_) => 2,
        }
    }
}

/// Specifies result of hard route constraint check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteConstraintViolation {
    /// Violation code which is used as marker of specific constraint violated.
    pub code: i32,
}

/// Specifies hard constraint which operates on route level.
/// It is evaluated once per job and route before the position scan.
pub trait HardRouteConstraint {
    /// Returns evaluation priority.
    fn priority(&self) -> ConstraintPriority {
        ConstraintPriority::High
    }

    /// Estimates job insertion in specific route.
    /// Returns violation error if constraint is violated.
    fn evaluate_job(
        &self,
        solution_ctx: &SolutionContext,
        route_ctx: &RouteContext,
        job: &Job,
    ) -> Option<RouteConstraintViolation>;
}

/// Specifies soft constraint which operates on route level.
pub trait SoftRouteConstraint {
    /// Estimates job insertion in specific route.
    /// Returns non-zero penalty: positive makes insertion less attractive, negative - more.
    fn estimate_job(&self, solution_ctx: &SolutionContext, route_ctx: &RouteContext, job: &Job) -> Cost;
}

/// Specifies hard constraint which operates on activity level.
/// It is evaluated once per insertion position.
pub trait HardActivityConstraint {
    /// Returns evaluation priority.
    fn priority(&self) -> ConstraintPriority {
        ConstraintPriority::High
    }

    /// Estimates activity insertion in specific route leg.
    fn evaluate_activity(&self, route_ctx: &RouteContext, activity_ctx: &ActivityContext) -> ConstraintStatus;
}

/// Specifies soft constraint which operates on activity level.
pub trait SoftActivityConstraint {
    /// Estimates activity insertion in specific route leg.
    /// Returns non-zero penalty: positive makes insertion less attractive, negative - more.
    fn estimate_activity(&self, route_ctx: &RouteContext, activity_ctx: &ActivityContext) -> Cost;
}

/// A variant type for constraint types.
#[derive(Clone)]
pub enum ConstraintVariant {
    /// Hard route constraint.
    HardRoute(Arc<dyn HardRouteConstraint + Send + Sync>),
    /// Hard activity constraint.
    HardActivity(Arc<dyn HardActivityConstraint + Send + Sync>),
    /// Soft route constraint.
    SoftRoute(Arc<dyn SoftRouteConstraint + Send + Sync>),
    /// Soft activity constraint.
    SoftActivity(Arc<dyn SoftActivityConstraint + Send + Sync>),
}

/// Represents a constraint module which can be added to constraint pipeline.
pub trait ConstraintModule {
    /// Accepts insertion of specific job into route at given index of solution routes.
    /// Route states are already updated when the method is called.
    fn accept_insertion(&self, _solution_ctx: &mut SolutionContext, _route_index: usize, _job: &Job) {}

    /// Accepts route after its states are updated by sweeps.
    fn accept_route_state(&self, _ctx: &mut RouteContext) {}

    /// Accepts solution state.
    /// This method is called twice: before insertion of all jobs starts and when it ends.
    fn accept_solution_state(&self, _ctx: &mut SolutionContext) {}

    /// Returns unique constraint state keys.
    /// Used to avoid state key interference.
    fn state_keys(&self) -> Iter<i32>;

    /// Returns visitors which should be registered within route sweeps.
    fn state_visitors(&self) -> Iter<StateVisitor>;

    /// Returns list of constraints to be used.
    fn get_constraints(&self) -> Iter<ConstraintVariant>;
}

/// Provides the way to work with multiple constraints and keep their states up to date.
pub struct ConstraintPipeline {
    modules: Vec<Arc<dyn ConstraintModule + Send + Sync>>,
    state_keys: FxHashSet<i32>,
    forward: ForwardSweep,
    backward: BackwardSweep,
    hard_route_constraints: Vec<Arc<dyn HardRouteConstraint + Send + Sync>>,
    hard_activity_constraints: Vec<Arc<dyn HardActivityConstraint + Send + Sync>>,
    soft_route_constraints: Vec<Arc<dyn SoftRouteConstraint + Send + Sync>>,
    soft_activity_constraints: Vec<Arc<dyn SoftActivityConstraint + Send + Sync>>,
}

impl ConstraintPipeline {
    /// Creates an empty pipeline: its forward sweep uses given transport and activity costs to schedule activities.
    pub fn new(transport: Arc<dyn TransportCost + Send + Sync>, activity: Arc<dyn ActivityCost + Send + Sync>) -> Self {
        Self {
            modules: vec![],
            state_keys: Default::default(),
            forward: ForwardSweep::new(transport, activity),
            backward: BackwardSweep::default(),
            hard_route_constraints: vec![],
            hard_activity_constraints: vec![],
            soft_route_constraints: vec![],
            soft_activity_constraints: vec![],
        }
    }

    /// Accepts job insertion: updates states of the route and notifies modules.
    pub fn accept_insertion(&self, solution_ctx: &mut SolutionContext, route_index: usize, job: &Job) {
        self.accept_route_state(&mut solution_ctx.routes[route_index]);
        self.modules.iter().for_each(|module| module.accept_insertion(solution_ctx, route_index, job))
    }

    /// Accepts route state: runs forward and backward sweeps and notifies modules.
    pub fn accept_route_state(&self, ctx: &mut RouteContext) {
        self.forward.run(ctx);
        self.backward.run(ctx);
        self.modules.iter().for_each(|module| module.accept_route_state(ctx))
    }

    /// Accepts solution state.
    pub fn accept_solution_state(&self, ctx: &mut SolutionContext) {
        self.modules.iter().for_each(|module| module.accept_solution_state(ctx))
    }

    /// Adds constraint module. Panics if module's state keys are already registered.
    pub fn add_module(&mut self, module: Arc<dyn ConstraintModule + Send + Sync>) -> &mut Self {
        module.state_keys().for_each(|key| {
            if !self.state_keys.insert(*key) {
                panic!("attempt to register constraint with key duplication: {key}")
            }
        });

        module.state_visitors().for_each(|visitor| match visitor {
            StateVisitor::Forward(visitor) => {
                self.forward.add_visitor(visitor.clone());
            }
            StateVisitor::Backward(visitor) => {
                self.backward.add_visitor(visitor.clone());
            }
        });

        module.get_constraints().for_each(|constraint| match constraint {
            ConstraintVariant::HardRoute(c) => self.hard_route_constraints.push(c.clone()),
            ConstraintVariant::HardActivity(c) => self.hard_activity_constraints.push(c.clone()),
            ConstraintVariant::SoftRoute(c) => self.soft_route_constraints.push(c.clone()),
            ConstraintVariant::SoftActivity(c) => self.soft_activity_constraints.push(c.clone()),
        });

        self.hard_route_constraints.sort_by_key(|c| c.priority());
        self.hard_activity_constraints.sort_by_key(|c| c.priority());

        self.modules.push(module);

        self
    }

    /// Checks whether all hard route constraints are fulfilled.
    /// Returns result of first failed constraint in priority order or empty value.
    pub fn evaluate_hard_route(
        &self,
        solution_ctx: &SolutionContext,
        route_ctx: &RouteContext,
        job: &Job,
    ) -> Option<RouteConstraintViolation> {
        self.hard_route_constraints.iter().find_map(|c| c.evaluate_job(solution_ctx, route_ctx, job))
    }

    /// Checks all hard activity constraints in priority order and returns the worst status.
    /// Evaluation stops at the first break status.
    pub fn evaluate_hard_activity(&self, route_ctx: &RouteContext, activity_ctx: &ActivityContext) -> ConstraintStatus {
        unwrap_from_result(self.hard_activity_constraints.iter().try_fold(ConstraintStatus::Fulfilled, |acc, c| {
            let status = acc.worst(c.evaluate_activity(route_ctx, activity_ctx));
            if matches!(status, ConstraintStatus::NotFulfilledBreak(_)) { Err(status) } else { Ok(status) }
        }))
    }

    /// Checks soft route constraints and aggregates associated actual and penalty costs.
    pub fn evaluate_soft_route(&self, solution_ctx: &SolutionContext, route_ctx: &RouteContext, job: &Job) -> Cost {
        self.soft_route_constraints.iter().map(|c| c.estimate_job(solution_ctx, route_ctx, job)).sum()
    }

    /// Checks soft activity constraints and aggregates associated actual and penalty costs.
    pub fn evaluate_soft_activity(&self, route_ctx: &RouteContext, activity_ctx: &ActivityContext) -> Cost {
        self.soft_activity_constraints.iter().map(|c| c.estimate_activity(route_ctx, activity_ctx)).sum()
    }
}
