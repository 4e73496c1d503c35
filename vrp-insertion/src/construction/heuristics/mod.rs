//! Contains insertion heuristics: job insertion calculators, activity cost estimators,
//! insertion strategies and their building blocks.

mod activity_costs;
pub use self::activity_costs::*;

mod cache;
pub use self::cache::*;

mod config;
pub use self::config::*;

mod evaluators;
pub use self::evaluators::*;

mod factories;
pub use self::factories::*;

mod insertions;
pub use self::insertions::*;

mod listeners;
pub use self::listeners::*;

mod selectors;
pub use self::selectors::*;

mod strategies;
pub use self::strategies::*;

mod vehicles;
pub use self::vehicles::*;
