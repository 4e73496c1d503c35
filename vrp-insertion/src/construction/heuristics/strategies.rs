#[cfg(test)]
#[path = "../../../tests/unit/construction/heuristics/strategies_test.rs"]
mod strategies_test;

use crate::construction::heuristics::*;
use crate::construction::states::InsertionContext;
use crate::models::common::Cost;
use crate::utils::compare_floats;
use std::cmp::Ordering;
use std::sync::Arc;

/// Inserts required jobs of the insertion context into its routes.
pub trait InsertionStrategy {
    /// Runs insertion and returns the context with all required jobs either assigned or unassigned.
    fn insert(&self, insertion_ctx: InsertionContext) -> InsertionContext;
}

/// Inserts jobs one by one in the order defined by job selector: input order, shuffled or a priority order
/// such as distance from depot. Each job is put to its cheapest position across all routes and a new one.
pub struct BestInsertion {
    heuristic: InsertionHeuristic,
    job_selector: Arc<dyn JobSelector + Send + Sync>,
}

impl BestInsertion {
    /// Creates a new instance of `BestInsertion`.
    pub fn new(heuristic: InsertionHeuristic, job_selector: Arc<dyn JobSelector + Send + Sync>) -> Self {
        Self { heuristic, job_selector }
    }
}

impl InsertionStrategy for BestInsertion {
    fn insert(&self, insertion_ctx: InsertionContext) -> InsertionContext {
        let mut insertion_ctx = insertion_ctx;

        self.heuristic.prepare(&mut insertion_ctx);
        let jobs = self.job_selector.select(&insertion_ctx);
        log_start(&insertion_ctx, "best", jobs.len());

        jobs.into_iter().for_each(|job| match self.heuristic.evaluate_job(&insertion_ctx, &job) {
            InsertionResult::Success(success) => {
                self.heuristic.commit(&mut insertion_ctx, success);
            }
            InsertionResult::Failure(failure) => self.heuristic.unassign(&mut insertion_ctx, &job, failure.code),
        });

        self.heuristic.finalize(&mut insertion_ctx);

        insertion_ctx
    }
}

/// Repeatedly evaluates all required jobs and commits the cheapest insertion across all of them,
/// so job order matters only on tie.
pub struct CheapestInsertion {
    heuristic: InsertionHeuristic,
    job_selector: Arc<dyn JobSelector + Send + Sync>,
}

impl CheapestInsertion {
    /// Creates a new instance of `CheapestInsertion`.
    pub fn new(heuristic: InsertionHeuristic, job_selector: Arc<dyn JobSelector + Send + Sync>) -> Self {
        Self { heuristic, job_selector }
    }
}

impl InsertionStrategy for CheapestInsertion {
    fn insert(&self, insertion_ctx: InsertionContext) -> InsertionContext {
        run_cached_insertion(&self.heuristic, self.job_selector.as_ref(), insertion_ctx, "cheapest", |cache| {
            cache
                .entries()
                .iter()
                .enumerate()
                .filter_map(|(idx, entry)| entry.best_cost().map(|cost| (idx, cost)))
                .min_by(|(_, a), (_, b)| compare_floats(*a, *b))
                .map(|(idx, _)| idx)
        })
    }
}

/// Prioritizes jobs with the largest regret: a gap between k-th best and the best insertion cost.
/// Such jobs lose most if their insertion is postponed.
pub struct RegretInsertion {
    heuristic: InsertionHeuristic,
    job_selector: Arc<dyn JobSelector + Send + Sync>,
    k: usize,
}

impl RegretInsertion {
    /// Creates a new instance of `RegretInsertion`. K should be at least 2.
    pub fn new(heuristic: InsertionHeuristic, job_selector: Arc<dyn JobSelector + Send + Sync>, k: usize) -> Self {
        assert!(k >= 2, "regret k should be at least 2");
        Self { heuristic, job_selector, k }
    }
}

impl InsertionStrategy for RegretInsertion {
    fn insert(&self, insertion_ctx: InsertionContext) -> InsertionContext {
        run_cached_insertion(&self.heuristic, self.job_selector.as_ref(), insertion_ctx, "regret", |cache| {
            cache
                .entries()
                .iter()
                .enumerate()
                .filter_map(|(idx, entry)| entry.regret(self.k).zip(entry.best_cost()).map(|value| (idx, value)))
                .fold(None, |acc: Option<(usize, (Cost, Cost))>, (idx, (regret, best))| match acc {
                    Some((_, (acc_regret, acc_best)))
                        if compare_regrets((acc_regret, acc_best), (regret, best)) != Ordering::Less =>
                    {
                        acc
                    }
                    _ => Some((idx, (regret, best))),
                })
                .map(|(idx, _)| idx)
        })
    }
}

/// Compares (regret, best cost) pairs: larger regret wins, on tie lower best cost wins.
fn compare_regrets(left: (Cost, Cost), right: (Cost, Cost)) -> Ordering {
    match compare_floats(left.0, right.0) {
        Ordering::Equal => compare_floats(right.1, left.1),
        other => other,
    }
}

/// Runs insertion where all jobs are evaluated upfront and the next job to commit is chosen by
/// the selection function from the cache. Only routes touched by a commit are reevaluated.
fn run_cached_insertion<F>(
    heuristic: &InsertionHeuristic,
    job_selector: &(dyn JobSelector + Send + Sync),
    insertion_ctx: InsertionContext,
    name: &str,
    select_fn: F,
) -> InsertionContext
where
    F: Fn(&InsertionCache) -> Option<usize>,
{
    let mut insertion_ctx = insertion_ctx;

    heuristic.prepare(&mut insertion_ctx);
    let jobs = job_selector.select(&insertion_ctx);
    log_start(&insertion_ctx, name, jobs.len());

    let mut cache = InsertionCache::new(heuristic, &insertion_ctx, jobs);

    loop {
        // insertion never makes infeasible job feasible, so such jobs are unassigned immediately
        cache.take_unassignable().into_iter().for_each(|(job, code)| heuristic.unassign(&mut insertion_ctx, &job, code));

        let Some(success) = select_fn(&cache).and_then(|idx| cache.remove(idx).into_best(heuristic)) else {
            break;
        };

        let is_registry_changed = success.route_index.is_none()
            || success.events.iter().any(|event| matches!(event, InsertionEvent::SwitchVehicle { .. }));
        let route_index = heuristic.commit(&mut insertion_ctx, success);

        cache.refresh(heuristic, &insertion_ctx, route_index, is_registry_changed);
    }

    heuristic.finalize(&mut insertion_ctx);

    insertion_ctx
}

fn log_start(insertion_ctx: &InsertionContext, name: &str, jobs: usize) {
    (insertion_ctx.environment.logger)(&format!(
        "{name} insertion is started: jobs: {jobs}, routes: {}",
        insertion_ctx.solution.routes.len()
    ));
}
