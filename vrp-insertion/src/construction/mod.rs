//! The construction module contains logic which is needed to build a solution by inserting jobs into routes:
//! route states, their updaters, constraints, cost calculators and insertion heuristics.

pub mod constraints;
pub mod heuristics;
pub mod states;
