#[cfg(test)]
#[path = "../../../tests/unit/models/common/load_test.rs"]
mod load_test;

use crate::models::common::{Dimensions, ValueDimension};

const CAPACITY_DIMENSION_KEY: &str = "capacity";
const DEMAND_DIMENSION_KEY: &str = "demand";

/// Represents a load (or capacity) on single dimension.
pub type Load = i32;

/// Represents job demand, both static and dynamic.
/// Static demand is loaded at the vehicle start (delivery) or unloaded at the vehicle end (pickup).
/// Dynamic demand is picked up and delivered within the tour (shipment).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Demand {
    /// Keeps static and dynamic pickup amount.
    pub pickup: (Load, Load),
    /// Keeps static and dynamic delivery amount.
    pub delivery: (Load, Load),
}

impl Demand {
    /// Creates a static pickup demand.
    pub fn pickup(size: Load) -> Self {
        Self { pickup: (size, 0), delivery: (0, 0) }
    }

    /// Creates a static delivery demand.
    pub fn delivery(size: Load) -> Self {
        Self { pickup: (0, 0), delivery: (size, 0) }
    }

    /// Creates a dynamic pickup demand which is a part of a shipment.
    pub fn pickup_dynamic(size: Load) -> Self {
        Self { pickup: (0, size), delivery: (0, 0) }
    }

    /// Creates a dynamic delivery demand which is a part of a shipment.
    pub fn delivery_dynamic(size: Load) -> Self {
        Self { pickup: (0, 0), delivery: (0, size) }
    }

    /// Returns load change at the activity.
    pub fn change(&self) -> Load {
        self.pickup.0 + self.pickup.1 - self.delivery.0 - self.delivery.1
    }

    /// Returns the largest amount the demand needs from vehicle capacity.
    pub fn size(&self) -> Load {
        (self.pickup.0 + self.pickup.1).max(self.delivery.0 + self.delivery.1)
    }
}

/// A trait to get or set vehicle's capacity.
pub trait CapacityDimension {
    /// Sets capacity.
    fn set_capacity(&mut self, capacity: Load) -> &mut Self;
    /// Gets capacity.
    fn get_capacity(&self) -> Option<&Load>;
}

impl CapacityDimension for Dimensions {
    fn set_capacity(&mut self, capacity: Load) -> &mut Self {
        self.set_value(CAPACITY_DIMENSION_KEY, capacity);
        self
    }

    fn get_capacity(&self) -> Option<&Load> {
        self.get_value(CAPACITY_DIMENSION_KEY)
    }
}

/// A trait to get or set job's demand.
pub trait DemandDimension {
    /// Sets demand.
    fn set_demand(&mut self, demand: Demand) -> &mut Self;
    /// Gets demand.
    fn get_demand(&self) -> Option<&Demand>;
}

impl DemandDimension for Dimensions {
    fn set_demand(&mut self, demand: Demand) -> &mut Self {
        self.set_value(DEMAND_DIMENSION_KEY, demand);
        self
    }

    fn get_demand(&self) -> Option<&Demand> {
        self.get_value(DEMAND_DIMENSION_KEY)
    }
}
