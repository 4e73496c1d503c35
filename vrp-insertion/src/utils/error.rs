use thiserror::Error;

/// Specifies errors raised while insertion engine is configured or its input is validated.
/// Infeasible insertions are not errors: they are reported as failed insertion results.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InsertionError {
    /// Configuration has a value outside of its allowed range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Fleet has no vehicles or no drivers.
    #[error("fleet should have at least one vehicle and exactly one driver")]
    EmptyFleet,

    /// A vehicle has no capacity while jobs have demand.
    #[error("vehicle '{0}' has no capacity defined")]
    MissingCapacity(String),

    /// Shipment cannot be built from given activities.
    #[error("shipment should have exactly one pickup and one delivery, got {0} activities")]
    BrokenShipment(usize),

    /// Activity factory returned unexpected amount of activities for a job.
    #[error("activity factory produced {actual} activities, expected {expected}")]
    ActivityMismatch {
        /// Expected amount of activities.
        expected: usize,
        /// Actual amount of activities.
        actual: usize,
    },
}

/// A type alias for result type with `InsertionError`.
pub type GenericResult<T> = Result<T, InsertionError>;
