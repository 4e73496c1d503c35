#[cfg(test)]
#[path = "../../tests/unit/models/domain_test.rs"]
mod domain_test;

use crate::construction::constraints::*;
use crate::models::common::{Cost, DemandDimension};
use crate::models::problem::*;
use crate::models::solution::{Registry, Route};
use crate::utils::GenericResult;
use std::sync::Arc;

/// Defines a Vehicle Routing Problem as seen by the insertion engine.
pub struct Problem {
    /// Specifies used vehicles and drivers.
    pub fleet: Arc<Fleet>,

    /// Specifies jobs which have to be assigned.
    pub jobs: Arc<Vec<Job>>,

    /// Specifies constraints pipeline.
    pub constraint: Arc<ConstraintPipeline>,

    /// Specifies activity costs.
    pub activity: Arc<dyn ActivityCost + Send + Sync>,

    /// Specifies transport costs.
    pub transport: Arc<dyn TransportCost + Send + Sync>,

    /// Specifies the way activities are created from jobs.
    pub factory: Arc<dyn JobActivityFactory + Send + Sync>,
}

impl Problem {
    /// Creates a problem with default constraint modules (timing, capacity and cost states)
    /// and default activity factory.
    pub fn new(
        fleet: Fleet,
        jobs: Vec<Job>,
        transport: Arc<dyn TransportCost + Send + Sync>,
        activity: Arc<dyn ActivityCost + Send + Sync>,
    ) -> GenericResult<Self> {
        let has_demand = jobs.iter().any(|job| match job {
            Job::Single(single) => single.dimens.get_demand().is_some(),
            Job::Multi(_) => true,
        });
        fleet.validate_capacity(has_demand)?;

        let constraint = create_default_constraint_pipeline(transport.clone(), activity.clone());

        Ok(Self {
            fleet: Arc::new(fleet),
            jobs: Arc::new(jobs),
            constraint: Arc::new(constraint),
            activity,
            transport,
            factory: Arc::new(DefaultJobActivityFactory::default()),
        })
    }
}

/// Creates constraint pipeline with timing, capacity and route cost modules.
pub fn create_default_constraint_pipeline(
    transport: Arc<dyn TransportCost + Send + Sync>,
    activity: Arc<dyn ActivityCost + Send + Sync>,
) -> ConstraintPipeline {
    let mut constraint = ConstraintPipeline::new(transport.clone(), activity.clone());
    constraint
        .add_module(Arc::new(TimingConstraintModule::new(transport.clone(), activity.clone(), TIME_CONSTRAINT_CODE)))
        .add_module(Arc::new(CapacityConstraintModule::new(CAPACITY_CONSTRAINT_CODE)))
        .add_module(Arc::new(RouteCostModule::new(transport, activity)));

    constraint
}

/// Represents a VRP solution produced by the insertion engine.
pub struct Solution {
    /// Actor's registry after insertion.
    pub registry: Registry,

    /// List of assigned routes, empty routes are excluded.
    pub routes: Vec<Route>,

    /// List of unassigned jobs within the last observed violation code.
    pub unassigned: Vec<(Job, i32)>,

    /// Total solution cost: transport, activity and fixed costs of all routes.
    pub cost: Cost,
}
