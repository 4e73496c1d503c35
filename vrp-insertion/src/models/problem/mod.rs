//! Problem domain models.

mod costs;
pub use self::costs::*;

mod factory;
pub use self::factory::*;

mod fleet;
pub use self::fleet::*;

mod jobs;
pub use self::jobs::*;
