//! Contains route state store, insertion contexts and route sweep engines which update states.

mod context;
pub use self::context::*;

mod route_state;
pub use self::route_state::*;

mod sweep;
pub use self::sweep::*;
