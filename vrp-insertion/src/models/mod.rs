//! A collection of models to represent problem and solution of a Vehicle Routing Problem.

pub mod common;
pub mod problem;
pub mod solution;

mod domain;
pub use self::domain::*;
