#[cfg(test)]
#[path = "../../../tests/unit/construction/heuristics/selectors_test.rs"]
mod selectors_test;

use crate::construction::heuristics::InsertionResult;
use crate::construction::states::InsertionContext;
use crate::models::common::Distance;
use crate::models::problem::Job;
use crate::utils::compare_floats;

/// On each insertion batch, returns an order in which required jobs are processed.
pub trait JobSelector {
    /// Returns required jobs in processing order.
    fn select(&self, insertion_ctx: &InsertionContext) -> Vec<Job>;
}

/// Returns required jobs in their input order.
#[derive(Default)]
pub struct AllJobSelector {}

impl JobSelector for AllJobSelector {
    fn select(&self, insertion_ctx: &InsertionContext) -> Vec<Job> {
        insertion_ctx.solution.required.clone()
    }
}

/// Returns required jobs in random order.
#[derive(Default)]
pub struct ShuffledJobSelector {}

impl JobSelector for ShuffledJobSelector {
    fn select(&self, insertion_ctx: &InsertionContext) -> Vec<Job> {
        let required = &insertion_ctx.solution.required;

        insertion_ctx
            .environment
            .random
            .shuffled_indices(required.len())
            .into_iter()
            .map(|idx| required[idx].clone())
            .collect()
    }
}

/// Orders jobs by distance from the nearest vehicle start location: the closest ones go first.
#[derive(Default)]
pub struct DistanceJobSelector {}

impl JobSelector for DistanceJobSelector {
    fn select(&self, insertion_ctx: &InsertionContext) -> Vec<Job> {
        let problem = &insertion_ctx.problem;

        sort_by_priority(insertion_ctx, |job| {
            let location = job.first_location();
            problem
                .fleet
                .actors
                .iter()
                .map(|actor| problem.transport.distance(actor.vehicle.profile, actor.detail.start, location, 0.))
                .min_by(|a, b| compare_floats(*a, *b))
                .unwrap_or(0.)
        })
    }
}

/// Orders jobs by average distance to other required jobs: jobs in dense areas go first.
#[derive(Default)]
pub struct AverageDistanceJobSelector {}

impl JobSelector for AverageDistanceJobSelector {
    fn select(&self, insertion_ctx: &InsertionContext) -> Vec<Job> {
        let problem = &insertion_ctx.problem;
        let required = &insertion_ctx.solution.required;
        let profile = problem.fleet.profiles.first().copied().unwrap_or_default();

        sort_by_priority(insertion_ctx, |job| {
            let location = job.first_location();
            let (total, count) = required.iter().filter(|other| *other != job).fold((0., 0), |(total, count), other| {
                (total + problem.transport.distance(profile, location, other.first_location(), 0.), count + 1)
            });

            if count == 0 { 0. } else { total / count as f64 }
        })
    }
}

/// Sorts required jobs by priority value ascending, ties keep input order.
fn sort_by_priority<F>(insertion_ctx: &InsertionContext, priority_fn: F) -> Vec<Job>
where
    F: Fn(&Job) -> Distance,
{
    let mut jobs = insertion_ctx
        .solution
        .required
        .iter()
        .map(|job| (job.clone(), priority_fn(job)))
        .collect::<Vec<_>>();

    jobs.sort_by(|(_, a), (_, b)| compare_floats(*a, *b));

    jobs.into_iter().map(|(job, _)| job).collect()
}

/// Selects one insertion result from two.
pub trait ResultSelector {
    /// Selects one insertion result from two.
    fn select(&self, left: InsertionResult, right: InsertionResult) -> InsertionResult;
}

/// Selects the cheapest insertion result, the first one wins on tie.
#[derive(Default)]
pub struct BestResultSelector {}

impl ResultSelector for BestResultSelector {
    fn select(&self, left: InsertionResult, right: InsertionResult) -> InsertionResult {
        InsertionResult::choose_best_result(left, right)
    }
}
