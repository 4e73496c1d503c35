#[cfg(test)]
#[path = "../../../tests/unit/models/problem/fleet_test.rs"]
mod fleet_test;

use crate::models::common::*;
use crate::utils::{GenericResult, InsertionError};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

const TYPE_ID_DIMENSION_KEY: &str = "type_id";

/// Represents operating costs for driver and vehicle.
#[derive(Clone, Debug, Default)]
pub struct Costs {
    /// A fixed cost to use an actor.
    pub fixed: f64,
    /// Cost per distance unit.
    pub per_distance: f64,
    /// Cost per driving time unit.
    pub per_driving_time: f64,
    /// Cost per waiting time unit.
    pub per_waiting_time: f64,
    /// Cost per service time unit.
    pub per_service_time: f64,
}

/// Represents a driver, person who drives Vehicle.
/// A no-op placeholder driver with empty costs is fine when drivers are not modeled.
pub struct Driver {
    /// Specifies operating costs for driver.
    pub costs: Costs,
    /// Dimensions which contains extra work requirements.
    pub dimens: Dimensions,
}

impl Driver {
    /// Creates a placeholder driver without costs.
    pub fn empty() -> Self {
        Self { costs: Costs::default(), dimens: Default::default() }
    }
}

/// Represents a vehicle shift detail.
#[derive(Clone, Debug)]
pub struct VehicleDetail {
    /// Location where vehicle starts.
    pub start: Location,
    /// Location where vehicle ends, if omitted, then start is used.
    pub end: Option<Location>,
    /// Time window when vehicle can work.
    pub time: Option<TimeWindow>,
}

/// Represents a vehicle.
pub struct Vehicle {
    /// A vehicle profile.
    pub profile: Profile,
    /// Specifies operating costs for vehicle.
    pub costs: Costs,
    /// Dimensions which contains extra work requirements.
    pub dimens: Dimensions,
    /// Specifies vehicle details.
    pub details: Vec<VehicleDetail>,
}

impl Vehicle {
    /// Returns vehicle capacity, zero if it is not set.
    pub fn capacity(&self) -> Load {
        self.dimens.get_capacity().cloned().unwrap_or(0)
    }

    /// Returns vehicle type id: explicitly set type or vehicle id.
    pub fn type_id(&self) -> Option<&String> {
        self.dimens.get_type_id().or_else(|| self.dimens.get_id())
    }
}

/// A trait to get or set vehicle type id.
pub trait VehicleTypeDimension {
    /// Sets vehicle type id.
    fn set_type_id(&mut self, type_id: &str) -> &mut Self;
    /// Gets vehicle type id.
    fn get_type_id(&self) -> Option<&String>;
}

impl VehicleTypeDimension for Dimensions {
    fn set_type_id(&mut self, type_id: &str) -> &mut Self {
        self.set_value(TYPE_ID_DIMENSION_KEY, type_id.to_string());
        self
    }

    fn get_type_id(&self) -> Option<&String> {
        self.get_value(TYPE_ID_DIMENSION_KEY)
    }
}

/// Represents actor detail.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct ActorDetail {
    /// Location where actor starts.
    pub start: Location,
    /// Location where actor ends.
    pub end: Location,
    /// Time window when actor can work.
    pub time: TimeWindow,
}

/// Represents an actor: a vehicle driven by driver within specific shift.
pub struct Actor {
    /// A vehicle associated within actor.
    pub vehicle: Arc<Vehicle>,
    /// A driver associated within actor.
    pub driver: Arc<Driver>,
    /// Specifies actor detail.
    pub detail: ActorDetail,
}

impl PartialEq<Actor> for Actor {
    fn eq(&self, other: &Actor) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for Actor {}

impl std::fmt::Debug for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Actor").field("detail", &self.detail).finish_non_exhaustive()
    }
}

impl Hash for Actor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self as *const Actor).hash(state);
    }
}

/// A key which identifies interchangeable actors: the same vehicle type which starts at the same location.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct ActorKey {
    /// Vehicle type id.
    pub type_id: String,
    /// Start location.
    pub start: Location,
}

impl ActorKey {
    /// Creates a new instance of `ActorKey`.
    pub fn new(actor: &Actor) -> Self {
        Self { type_id: actor.vehicle.type_id().cloned().unwrap_or_default(), start: actor.detail.start }
    }
}

/// Represents available resources to serve jobs.
pub struct Fleet {
    /// All fleet drivers.
    pub drivers: Vec<Arc<Driver>>,
    /// All fleet vehicles.
    pub vehicles: Vec<Arc<Vehicle>>,
    /// All fleet profiles.
    pub profiles: Vec<Profile>,
    /// All fleet actors.
    pub actors: Vec<Arc<Actor>>,
}

impl Fleet {
    /// Creates a new instance of `Fleet`. One actor is created per vehicle shift.
    pub fn new(drivers: Vec<Arc<Driver>>, vehicles: Vec<Arc<Vehicle>>) -> GenericResult<Fleet> {
        // NOTE smart vehicle-driver assignment is not supported: one driver serves all vehicles.
        let driver = match (drivers.len(), drivers.first()) {
            (1, Some(driver)) if !vehicles.is_empty() => driver.clone(),
            _ => return Err(InsertionError::EmptyFleet),
        };

        let mut profiles = vehicles.iter().map(|vehicle| vehicle.profile).collect::<Vec<_>>();
        profiles.sort_unstable();
        profiles.dedup();

        let actors = vehicles
            .iter()
            .flat_map(|vehicle| {
                let driver = driver.clone();
                vehicle.details.iter().map(move |detail| {
                    Arc::new(Actor {
                        vehicle: vehicle.clone(),
                        driver: driver.clone(),
                        detail: ActorDetail {
                            start: detail.start,
                            end: detail.end.unwrap_or(detail.start),
                            time: detail.time.clone().unwrap_or_else(TimeWindow::max),
                        },
                    })
                })
            })
            .collect();

        Ok(Fleet { drivers, vehicles, profiles, actors })
    }

    /// Checks that every vehicle has capacity when any job has demand.
    pub fn validate_capacity(&self, has_demand: bool) -> GenericResult<()> {
        if !has_demand {
            return Ok(());
        }

        match self.vehicles.iter().find(|vehicle| vehicle.dimens.get_capacity().is_none()) {
            Some(vehicle) => {
                Err(InsertionError::MissingCapacity(vehicle.dimens.get_id().cloned().unwrap_or_default()))
            }
            None => Ok(()),
        }
    }
}
