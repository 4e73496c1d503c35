//! This crate contains an insertion engine to build solutions of a rich ***Vehicle Routing Problem***.
//!
//! Jobs (services and pickup-delivery shipments) are inserted into vehicle routes at minimal marginal
//! cost while hard constraints (time windows, capacity) stay satisfied. Route states are kept up to
//! date incrementally by forward and backward sweeps, so each insertion position is checked in
//! constant time.
//!
//! The main building blocks are:
//! - [`models`]: problem definition (fleet, jobs, costs) and solution representation (tours, routes);
//! - [`construction::states`]: route state store, insertion contexts and route sweeps;
//! - [`construction::constraints`]: constraint pipeline with timing, capacity and cost modules;
//! - [`construction::heuristics`]: insertion calculators and best, regret, greedy insertion strategies.
//!
//! A typical usage:
//!
//! ```ignore
//! let problem = Arc::new(Problem::new(fleet, jobs, transport, Arc::new(SimpleActivityCost::default()))?);
//! let config = InsertionConfig::default();
//!
//! let strategy = create_insertion_strategy(problem.as_ref(), &config)?;
//! let insertion_ctx = InsertionContext::new(problem, Arc::new(config.create_environment(Arc::new(|_| {}))));
//!
//! let solution = strategy.insert(insertion_ctx).to_solution();
//! ```

#![warn(missing_docs)]

#[cfg(test)]
#[path = "../tests/helpers/mod.rs"]
#[macro_use]
pub mod helpers;

#[cfg(test)]
#[path = "../tests/unit/scenarios/mod.rs"]
mod scenarios;

pub mod construction;
pub mod models;
pub mod utils;
