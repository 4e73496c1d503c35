//! Common models.

mod domain;
pub use self::domain::*;

mod load;
pub use self::load::*;

/// Specifies location type: an index in routing matrix or coordinate table.
pub type Location = usize;

/// Represents a routing profile.
pub type Profile = usize;

/// Specifies cost value.
pub type Cost = f64;

/// Specifies timestamp type.
pub type Timestamp = f64;

/// Specifies duration type.
pub type Duration = f64;

/// Specifies distance type.
pub type Distance = f64;
