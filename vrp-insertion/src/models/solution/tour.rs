#[cfg(test)]
#[path = "../../../tests/unit/models/solution/tour_test.rs"]
mod tour_test;

use crate::models::common::{Place, Schedule};
use crate::models::problem::{Actor, Job, Single};
use rustc_hash::FxHashSet;
use std::slice::{Iter, IterMut};
use std::sync::Arc;

/// A tour leg: two consecutive activities and index of the first one.
pub type Leg<'a> = (&'a [Activity], usize);

/// Represents activity which is needed to be performed.
#[derive(Clone, Debug)]
pub struct Activity {
    /// Specifies activity details.
    pub place: Place,
    /// Specifies activity schedule: actual arrival and departure time.
    pub schedule: Schedule,
    /// A job which the activity serves, none for start and end of a tour.
    pub job: Option<Arc<Single>>,
}

impl Activity {
    /// Checks whether activity has given job.
    pub fn has_same_job(&self, job: &Job) -> bool {
        match (self.retrieve_job(), job) {
            (Some(own), job) => own == *job,
            _ => false,
        }
    }

    /// Returns job which the activity belongs to: a shipment for its pickup or delivery.
    pub fn retrieve_job(&self) -> Option<Job> {
        self.job.as_ref().map(|single| match single.parent() {
            Some(multi) => Job::Multi(multi),
            None => Job::Single(single.clone()),
        })
    }

    /// Checks whether another activity belongs to the same shipment.
    pub fn is_paired_with(&self, other: &Activity) -> bool {
        match (self.job.as_ref().and_then(|s| s.parent()), other.job.as_ref().and_then(|s| s.parent())) {
            (Some(lhs), Some(rhs)) => Arc::ptr_eq(&lhs, &rhs),
            _ => false,
        }
    }
}

/// Represents a tour, a smart container for jobs with their associated activities.
/// Tour is always bound by start and end activities.
#[derive(Clone, Default)]
pub struct Tour {
    activities: Vec<Activity>,
    jobs: FxHashSet<Job>,
}

impl Tour {
    /// Creates a new tour with start and end using actor properties.
    pub fn new(actor: &Actor) -> Self {
        Self { activities: vec![create_start_activity(actor), create_end_activity(actor)], jobs: Default::default() }
    }

    /// Inserts activity within its job at specified index. Index should be between start and end (inclusive end).
    pub fn insert_at(&mut self, activity: Activity, index: usize) -> &mut Tour {
        assert!(index > 0 && index < self.activities.len(), "insertion index {index} is out of tour range");
        let job = activity.retrieve_job().expect("attempt to insert activity without job into the tour");

        self.jobs.insert(job);
        self.activities.insert(index, activity);

        self
    }

    /// Inserts activity within its job right before the tour end.
    pub fn insert_last(&mut self, activity: Activity) -> &mut Tour {
        self.insert_at(activity, self.activities.len() - 1)
    }

    /// Removes job within its activities from the tour.
    pub fn remove(&mut self, job: &Job) -> bool {
        self.activities.retain(|a| !a.has_same_job(job));
        self.jobs.remove(job)
    }

    /// Removes activity and its job (with all its activities) from the tour.
    pub fn remove_activity_at(&mut self, index: usize) -> Job {
        let job = self
            .activities
            .get(index)
            .and_then(|a| a.retrieve_job())
            .expect("attempt to remove activity without job from the tour");
        self.remove(&job);

        job
    }

    /// Returns all activities in tour.
    pub fn all_activities(&self) -> Iter<Activity> {
        self.activities.iter()
    }

    /// Returns all activities in tour as mutable.
    pub fn all_activities_mut(&mut self) -> IterMut<Activity> {
        self.activities.iter_mut()
    }

    /// Returns all activities in tour for specific job.
    pub fn job_activities<'a>(&'a self, job: &'a Job) -> impl Iterator<Item = &'a Activity> + 'a {
        self.activities.iter().filter(move |a| a.has_same_job(job))
    }

    /// Returns activities slice in specific range (all inclusive).
    pub fn activities_slice(&self, start: usize, end: usize) -> &[Activity] {
        &self.activities[start..=end]
    }

    /// Returns counted tour legs: (prev, next) pairs starting from (start, first) to (last, end).
    pub fn legs(&self) -> impl Iterator<Item = Leg<'_>> + '_ {
        self.activities.windows(2).zip(0_usize..)
    }

    /// Returns all jobs.
    pub fn jobs(&self) -> impl Iterator<Item = Job> + '_ {
        self.jobs.iter().cloned()
    }

    /// Returns activity by its index in tour.
    pub fn get(&self, index: usize) -> Option<&Activity> {
        self.activities.get(index)
    }

    /// Returns mutable activity by its index in tour.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Activity> {
        self.activities.get_mut(index)
    }

    /// Returns start activity in tour.
    pub fn start(&self) -> &Activity {
        &self.activities[0]
    }

    /// Returns end activity in tour.
    pub fn end(&self) -> &Activity {
        &self.activities[self.activities.len() - 1]
    }

    /// Checks whether job is present in tour.
    pub fn contains(&self, job: &Job) -> bool {
        self.jobs.contains(job)
    }

    /// Returns index of first job occurrence in the tour.
    pub fn index(&self, job: &Job) -> Option<usize> {
        self.activities.iter().position(move |a| a.has_same_job(job))
    }

    /// Checks whether tour has jobs.
    pub fn has_jobs(&self) -> bool {
        !self.jobs.is_empty()
    }

    /// Returns total amount of job activities.
    pub fn job_activity_count(&self) -> usize {
        self.activities.len() - 2
    }

    /// Returns amount of all activities in tour.
    pub fn total(&self) -> usize {
        self.activities.len()
    }

    /// Returns amount of jobs.
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }
}

/// Creates start activity of the tour using actor's shift.
pub fn create_start_activity(actor: &Actor) -> Activity {
    let time = actor.detail.time.clone();
    Activity {
        schedule: Schedule::new(time.start, time.start),
        place: Place { location: actor.detail.start, duration: 0., time },
        job: None,
    }
}

/// Creates end activity of the tour using actor's shift.
pub fn create_end_activity(actor: &Actor) -> Activity {
    let time = actor.detail.time.clone();
    Activity {
        schedule: Schedule::new(time.start, time.start),
        place: Place { location: actor.detail.end, duration: 0., time },
        job: None,
    }
}
