#[cfg(test)]
#[path = "../../../tests/unit/models/problem/costs_test.rs"]
mod costs_test;

use crate::models::common::{Cost, Distance, Duration, Location, Profile, Timestamp};
use crate::models::problem::Actor;
use crate::models::solution::Activity;
use crate::utils::{GenericResult, InsertionError};
use std::sync::Arc;

/// Provides the way to get cost information for specific activities done by specific actor.
pub trait ActivityCost {
    /// Returns cost to perform activity.
    fn cost(&self, actor: &Actor, activity: &Activity, arrival: Timestamp) -> Cost {
        let waiting = if activity.place.time.start > arrival { activity.place.time.start - arrival } else { 0. };
        let service = self.duration(actor, activity, arrival);

        waiting * (actor.driver.costs.per_waiting_time + actor.vehicle.costs.per_waiting_time)
            + service * (actor.driver.costs.per_service_time + actor.vehicle.costs.per_service_time)
    }

    /// Returns operation time spent to perform activity.
    fn duration(&self, _actor: &Actor, activity: &Activity, _arrival: Timestamp) -> Duration {
        activity.place.duration
    }
}

/// An activity cost which uses waiting and service time from actor's costs.
#[derive(Default)]
pub struct SimpleActivityCost {}

impl ActivityCost for SimpleActivityCost {}

/// Provides the way to get routing information for specific locations.
/// Implementations must be deterministic for the same input within one run.
pub trait TransportCost {
    /// Returns transport cost between two locations.
    fn cost(&self, actor: &Actor, from: Location, to: Location, departure: Timestamp) -> Cost {
        let distance = self.distance(actor.vehicle.profile, from, to, departure);
        let duration = self.duration(actor.vehicle.profile, from, to, departure);

        distance * (actor.driver.costs.per_distance + actor.vehicle.costs.per_distance)
            + duration * (actor.driver.costs.per_driving_time + actor.vehicle.costs.per_driving_time)
    }

    /// Returns transport time between two locations.
    fn duration(&self, profile: Profile, from: Location, to: Location, departure: Timestamp) -> Duration;

    /// Returns transport distance between two locations.
    fn distance(&self, profile: Profile, from: Location, to: Location, departure: Timestamp) -> Distance;
}

/// A transport cost which uses routing matrices, one pair per profile.
pub struct MatrixTransportCost {
    durations: Vec<Vec<Duration>>,
    distances: Vec<Vec<Distance>>,
    size: usize,
}

impl MatrixTransportCost {
    /// Creates a new instance of `MatrixTransportCost` from flattened square matrices indexed by profile.
    pub fn new(durations: Vec<Vec<Duration>>, distances: Vec<Vec<Distance>>) -> GenericResult<Self> {
        let size = durations.first().map(|matrix| (matrix.len() as f64).sqrt().round() as usize).unwrap_or(0);

        let is_valid = !durations.is_empty()
            && durations.len() == distances.len()
            && durations.iter().chain(distances.iter()).all(|matrix| matrix.len() == size * size);

        if !is_valid {
            return Err(InsertionError::InvalidConfig("routing matrices should be square and match profiles".into()));
        }

        Ok(Self { durations, distances, size })
    }

    /// Creates a shared instance of `MatrixTransportCost`.
    pub fn new_shared(
        durations: Vec<Vec<Duration>>,
        distances: Vec<Vec<Distance>>,
    ) -> GenericResult<Arc<dyn TransportCost + Send + Sync>> {
        Ok(Arc::new(Self::new(durations, distances)?))
    }
}

impl TransportCost for MatrixTransportCost {
    fn duration(&self, profile: Profile, from: Location, to: Location, _: Timestamp) -> Duration {
        self.durations[profile][from * self.size + to]
    }

    fn distance(&self, profile: Profile, from: Location, to: Location, _: Timestamp) -> Distance {
        self.distances[profile][from * self.size + to]
    }
}
