#[cfg(test)]
#[path = "../../../tests/unit/construction/heuristics/config_test.rs"]
mod config_test;

use crate::utils::*;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::sync::Arc;

/// Specifies insertion strategy type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StrategyType {
    /// Inserts jobs in input order, each one at its cheapest position.
    #[default]
    Best,
    /// Commits the cheapest insertion across all jobs on each step.
    Cheapest,
    /// Commits insertion of the job with the largest regret on each step.
    Regret,
    /// Inserts jobs ordered by distance from the closest vehicle start.
    GreedyByDistance,
    /// Inserts jobs ordered by average distance to other jobs.
    GreedyByAverage,
}

/// Specifies insertion engine configuration.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InsertionConfig {
    /// Insertion strategy type.
    pub strategy: StrategyType,

    /// A forward-looking window of activity cost estimation, zero means local estimation.
    pub look_ahead: usize,

    /// Which best cost is compared with the best one to compute regret.
    pub regret_k: usize,

    /// A weight of fixed cost blending, fixed costs are not blended if not set.
    pub fixed_cost_weight: Option<f64>,

    /// Whether jobs are shuffled instead of being taken in input order. Greedy strategies keep their own order.
    pub shuffle_jobs: bool,

    /// Whether evaluation can be done in parallel.
    pub is_parallel: bool,
}

impl Default for InsertionConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyType::Best,
            look_ahead: 0,
            regret_k: 2,
            fixed_cost_weight: None,
            shuffle_jobs: false,
            is_parallel: true,
        }
    }
}

impl InsertionConfig {
    /// Reads config from json and validates it.
    pub fn from_reader<R: Read>(reader: R) -> GenericResult<Self> {
        let config: InsertionConfig =
            serde_json::from_reader(reader).map_err(|err| InsertionError::InvalidConfig(err.to_string()))?;
        config.validate()?;

        Ok(config)
    }

    /// Checks that config values are in allowed ranges.
    pub fn validate(&self) -> GenericResult<()> {
        if self.regret_k < 2 {
            return Err(InsertionError::InvalidConfig(format!("regretK should be at least 2, got {}", self.regret_k)));
        }

        match self.fixed_cost_weight {
            Some(weight) if !weight.is_finite() || weight < 0. => {
                Err(InsertionError::InvalidConfig(format!("fixedCostWeight should be non-negative, got {weight}")))
            }
            _ => Ok(()),
        }
    }

    /// Creates environment with parallelism setting from the config.
    pub fn create_environment(&self, logger: InfoLogger) -> Environment {
        Environment::new(Arc::new(DefaultRandom::default()), logger, self.is_parallel)
    }
}
