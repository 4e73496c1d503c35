#[cfg(test)]
#[path = "../../../tests/unit/models/problem/factory_test.rs"]
mod factory_test;

use crate::models::common::Schedule;
use crate::models::problem::{Job, Single};
use crate::models::solution::Activity;
use std::sync::Arc;

/// Produces tour activities for a job: one for a service, pickup and delivery for a shipment.
/// Insertion calculators get activities only through this factory.
pub trait JobActivityFactory {
    /// Creates activities of the job in the order they have to be performed.
    fn create(&self, job: &Job) -> Vec<Activity>;
}

/// A default activity factory which uses job places as is.
#[derive(Default)]
pub struct DefaultJobActivityFactory {}

impl JobActivityFactory for DefaultJobActivityFactory {
    fn create(&self, job: &Job) -> Vec<Activity> {
        match job {
            Job::Single(single) => vec![create_activity(single)],
            Job::Multi(multi) => multi.jobs.iter().map(create_activity).collect(),
        }
    }
}

fn create_activity(single: &Arc<Single>) -> Activity {
    Activity {
        place: single.place.clone(),
        schedule: Schedule::new(single.place.time.start, single.place.time.start),
        job: Some(single.clone()),
    }
}
