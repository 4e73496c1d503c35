#[cfg(test)]
#[path = "../../../tests/unit/construction/heuristics/factories_test.rs"]
mod factories_test;

use crate::construction::heuristics::*;
use crate::models::Problem;
use crate::utils::{GenericResult, InsertionError};
use std::sync::Arc;

/// Creates job insertion calculator chain: vehicle type switching, optional fixed cost blending
/// and job type dispatch to service and shipment calculators.
pub fn create_job_insertion_calculator(
    problem: &Problem,
    config: &InsertionConfig,
) -> Arc<dyn JobInsertionCalculator + Send + Sync> {
    let activity_cost: Arc<dyn ActivityInsertionCostCalculator + Send + Sync> = match config.look_ahead {
        0 => Arc::new(LocalActivityInsertionCostCalculator::new(problem.transport.clone(), problem.activity.clone())),
        window => Arc::new(LookAheadActivityInsertionCostCalculator::new(
            problem.transport.clone(),
            problem.activity.clone(),
            window,
        )),
    };

    let job_type: Arc<dyn JobInsertionCalculator + Send + Sync> = Arc::new(JobTypeInsertionCalculator::new(
        Arc::new(ServiceInsertionCalculator::new(activity_cost.clone())),
        Arc::new(ShipmentInsertionCalculator::new(activity_cost)),
    ));

    let inner: Arc<dyn JobInsertionCalculator + Send + Sync> = match config.fixed_cost_weight {
        Some(weight) => Arc::new(FixedCostInsertionCalculator::new(job_type, weight)),
        None => job_type,
    };

    Arc::new(VehicleTypeDependentCalculator::new(inner))
}

/// Creates insertion strategy defined by the config with default listeners.
pub fn create_insertion_strategy(
    problem: &Problem,
    config: &InsertionConfig,
) -> GenericResult<Box<dyn InsertionStrategy + Send + Sync>> {
    create_insertion_strategy_with_listeners(problem, config, InsertionListeners::new_with_defaults())
}

/// Creates insertion strategy defined by the config with given listeners.
pub fn create_insertion_strategy_with_listeners(
    problem: &Problem,
    config: &InsertionConfig,
    listeners: InsertionListeners,
) -> GenericResult<Box<dyn InsertionStrategy + Send + Sync>> {
    config.validate()?;
    validate_activities(problem)?;

    let heuristic = InsertionHeuristic::new(
        create_job_insertion_calculator(problem, config),
        Arc::new(BestResultSelector::default()),
        listeners,
    );

    let input_order: Arc<dyn JobSelector + Send + Sync> = if config.shuffle_jobs {
        Arc::new(ShuffledJobSelector::default())
    } else {
        Arc::new(AllJobSelector::default())
    };

    Ok(match config.strategy {
        StrategyType::Best => Box::new(BestInsertion::new(heuristic, input_order)),
        StrategyType::Cheapest => Box::new(CheapestInsertion::new(heuristic, input_order)),
        StrategyType::Regret => Box::new(RegretInsertion::new(heuristic, input_order, config.regret_k)),
        StrategyType::GreedyByDistance => {
            Box::new(BestInsertion::new(heuristic, Arc::new(DistanceJobSelector::default())))
        }
        StrategyType::GreedyByAverage => {
            Box::new(BestInsertion::new(heuristic, Arc::new(AverageDistanceJobSelector::default())))
        }
    })
}

/// Checks that activity factory produces exactly one activity per job place.
fn validate_activities(problem: &Problem) -> GenericResult<()> {
    problem.jobs.iter().try_for_each(|job| {
        let (expected, actual) = (job.activity_count(), problem.factory.create(job).len());
        if expected == actual { Ok(()) } else { Err(InsertionError::ActivityMismatch { expected, actual }) }
    })
}
