//! Contains the constraint framework and constraint modules which keep route states up to date.

use crate::construction::states::StateKey;
use crate::models::common::{Cost, Distance, Duration, Load, Timestamp};

mod pipeline;
pub use self::pipeline::*;

mod capacity;
pub use self::capacity::*;

mod costs;
pub use self::costs::*;

mod timing;
pub use self::timing::*;

/// A key which tracks latest arrival time at activity which keeps the rest of the tour feasible.
pub const LATEST_ARRIVAL_KEY: StateKey<Timestamp> = StateKey::new(1);
/// A key which tracks waiting time accumulated from activity till the tour end.
pub const WAITING_KEY: StateKey<Duration> = StateKey::new(2);
/// A route key which is set when some activity is served after its latest possible time.
pub const TIME_VIOLATION_KEY: StateKey<bool> = StateKey::new(3);

/// A key which tracks current vehicle load at activity.
pub const CURRENT_LOAD_KEY: StateKey<Load> = StateKey::new(11);
/// A key which tracks max load seen from tour start till activity.
pub const MAX_PAST_LOAD_KEY: StateKey<Load> = StateKey::new(12);
/// A key which tracks max load seen from activity till tour end.
pub const MAX_FUTURE_LOAD_KEY: StateKey<Load> = StateKey::new(13);
/// A route key which tracks max load of the whole tour.
pub const MAX_LOAD_KEY: StateKey<Load> = StateKey::new(14);
/// A route key which is set when load exceeds capacity or goes negative.
pub const LOAD_VIOLATION_KEY: StateKey<bool> = StateKey::new(15);

/// A key which tracks transport and activity costs accumulated from tour start till activity (inclusive).
pub const ACCUMULATED_COST_KEY: StateKey<Cost> = StateKey::new(21);
/// A route key which tracks total transport and activity costs of the tour.
pub const TOTAL_COST_KEY: StateKey<Cost> = StateKey::new(22);
/// A route key which tracks total distance of the tour.
pub const TOTAL_DISTANCE_KEY: StateKey<Distance> = StateKey::new(23);
/// A route key which tracks total duration of the tour.
pub const TOTAL_DURATION_KEY: StateKey<Duration> = StateKey::new(24);

/// A code of time window constraint violation.
pub const TIME_CONSTRAINT_CODE: i32 = 1;
/// A code of capacity constraint violation.
pub const CAPACITY_CONSTRAINT_CODE: i32 = 2;
