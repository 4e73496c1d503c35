#[cfg(test)]
#[path = "../../../tests/unit/models/problem/jobs_test.rs"]
mod jobs_test;

use crate::models::common::{Demand, DemandDimension, Dimensions, Location, Place};
use crate::utils::{GenericResult, InsertionError};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

/// Represents a job variant.
#[derive(Clone, Debug)]
pub enum Job {
    /// A service: a job with one activity.
    Single(Arc<Single>),
    /// A shipment: a job with pickup and delivery activities which should be served by the same tour.
    Multi(Arc<Multi>),
}

impl Job {
    /// Returns job dimensions.
    pub fn dimens(&self) -> &Dimensions {
        match &self {
            Job::Single(single) => &single.dimens,
            Job::Multi(multi) => &multi.dimens,
        }
    }

    /// Returns a single job if it is a service.
    pub fn as_single(&self) -> Option<&Arc<Single>> {
        match &self {
            Job::Single(single) => Some(single),
            _ => None,
        }
    }

    /// Returns a multi job if it is a shipment.
    pub fn as_multi(&self) -> Option<&Arc<Multi>> {
        match &self {
            Job::Multi(multi) => Some(multi),
            _ => None,
        }
    }

    /// Returns all places of the job in the order of their activities.
    pub fn places(&self) -> Box<dyn Iterator<Item = &Place> + '_> {
        match &self {
            Job::Single(single) => Box::new(std::iter::once(&single.place)),
            Job::Multi(multi) => Box::new(multi.jobs.iter().map(|single| &single.place)),
        }
    }

    /// Returns the first location of the job.
    pub fn first_location(&self) -> Location {
        match &self {
            Job::Single(single) => single.place.location,
            Job::Multi(multi) => multi.pickup().place.location,
        }
    }

    /// Returns amount of activities the job is expected to have in a tour.
    pub fn activity_count(&self) -> usize {
        match &self {
            Job::Single(_) => 1,
            Job::Multi(multi) => multi.jobs.len(),
        }
    }
}

impl PartialEq<Job> for Job {
    fn eq(&self, other: &Job) -> bool {
        match (&self, other) {
            (Job::Single(lhs), Job::Single(rhs)) => Arc::ptr_eq(lhs, rhs),
            (Job::Multi(lhs), Job::Multi(rhs)) => Arc::ptr_eq(lhs, rhs),
            _ => false,
        }
    }
}

impl Eq for Job {}

impl Hash for Job {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Job::Single(single) => Arc::as_ptr(single).hash(state),
            Job::Multi(multi) => Arc::as_ptr(multi).hash(state),
        }
    }
}

/// Represents a job which has to be performed by a single activity.
pub struct Single {
    /// A place where the job is performed.
    pub place: Place,
    /// A dimensions which contains extra work requirements.
    pub dimens: Dimensions,
    /// A handle to the shipment which owns this single.
    parent: Option<Weak<Multi>>,
}

impl Single {
    /// Creates a new standalone single job (service).
    pub fn new(place: Place, dimens: Dimensions) -> Self {
        Self { place, dimens, parent: None }
    }

    /// Returns the shipment which owns the job, if any.
    pub fn parent(&self) -> Option<Arc<Multi>> {
        self.parent.as_ref().and_then(|parent| parent.upgrade())
    }

    /// Returns demand of the job.
    pub fn demand(&self) -> Demand {
        self.dimens.get_demand().cloned().unwrap_or_default()
    }
}

impl std::fmt::Debug for Single {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Single").field("place", &self.place).finish()
    }
}

/// Represents a shipment: a pickup followed by a delivery.
pub struct Multi {
    /// A list of jobs: pickup is always first, delivery is always second.
    pub jobs: Vec<Arc<Single>>,
    /// A dimensions which contains extra work requirements.
    pub dimens: Dimensions,
}

impl std::fmt::Debug for Multi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Multi").field("jobs", &self.jobs).finish()
    }
}

impl Multi {
    /// Creates a shipment from pickup and delivery places sharing the same size.
    /// Singles get an explicit handle to their parent.
    pub fn new_shared(
        pickup: Place,
        delivery: Place,
        size: i32,
        dimens: Dimensions,
    ) -> GenericResult<Arc<Multi>> {
        Self::from_singles(
            vec![
                Single::new(pickup, create_demand_dimens(Demand::pickup_dynamic(size))),
                Single::new(delivery, create_demand_dimens(Demand::delivery_dynamic(size))),
            ],
            dimens,
        )
    }

    /// Creates a shipment from given singles, they are checked to form a pickup-delivery pair.
    pub fn from_singles(singles: Vec<Single>, dimens: Dimensions) -> GenericResult<Arc<Multi>> {
        if singles.len() != 2 {
            return Err(InsertionError::BrokenShipment(singles.len()));
        }

        let (pickup, delivery) = (singles[0].demand(), singles[1].demand());
        if pickup.pickup.1 != delivery.delivery.1 || pickup.pickup.0 != 0 || delivery.delivery.0 != 0 {
            return Err(InsertionError::BrokenShipment(singles.len()));
        }

        Ok(Arc::new_cyclic(|weak| Multi {
            jobs: singles
                .into_iter()
                .map(|mut single| {
                    single.parent = Some(weak.clone());
                    Arc::new(single)
                })
                .collect(),
            dimens,
        }))
    }

    /// Returns pickup single.
    pub fn pickup(&self) -> &Arc<Single> {
        &self.jobs[0]
    }

    /// Returns delivery single.
    pub fn delivery(&self) -> &Arc<Single> {
        &self.jobs[1]
    }
}

fn create_demand_dimens(demand: Demand) -> Dimensions {
    let mut dimens = Dimensions::default();
    dimens.set_demand(demand);
    dimens
}
