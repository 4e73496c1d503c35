#[cfg(test)]
#[path = "../../../tests/unit/construction/heuristics/cache_test.rs"]
mod cache_test;

use crate::construction::heuristics::*;
use crate::construction::states::InsertionContext;
use crate::models::common::Cost;
use crate::models::problem::Job;
use crate::utils::{compare_floats, maybe_parallel_collect};

/// Keeps insertion results of a job for each solution route and for a new route.
pub struct JobInsertions {
    /// Job to be inserted.
    pub job: Job,
    /// Insertion results for existing routes, in solution route order.
    pub routes: Vec<InsertionResult>,
    /// Insertion result for a new route, none if there is no available actor.
    pub new_route: Option<InsertionResult>,
}

impl JobInsertions {
    /// Evaluates job insertion into all routes of the solution and into a new route.
    pub fn new(heuristic: &InsertionHeuristic, insertion_ctx: &InsertionContext, job: Job) -> Self {
        let routes = (0..insertion_ctx.solution.routes.len())
            .map(|route_index| heuristic.evaluate_route(insertion_ctx, route_index, &job, None))
            .collect();
        let new_route = heuristic.evaluate_new_route(insertion_ctx, &job, None);

        Self { job, routes, new_route }
    }

    /// Returns all insertion results: existing routes first, then a new route.
    pub fn results(&self) -> impl Iterator<Item = &InsertionResult> + '_ {
        self.routes.iter().chain(self.new_route.iter())
    }

    /// Returns the cheapest insertion cost if any, the first cheapest result wins.
    pub fn best_cost(&self) -> Option<Cost> {
        self.results().filter_map(|result| result.cost()).min_by(|a, b| compare_floats(*a, *b))
    }

    /// Returns regret value: a difference between k-th best and the best insertion costs.
    /// When the job has less than k feasible insertions, the regret is maximal.
    pub fn regret(&self, k: usize) -> Option<Cost> {
        let mut costs = self.results().filter_map(|result| result.cost()).collect::<Vec<_>>();
        costs.sort_by(|a, b| compare_floats(*a, *b));

        match (costs.first(), costs.get(k.max(2) - 1)) {
            (Some(best), Some(kth)) => Some(kth - best),
            (Some(_), None) => Some(Cost::MAX),
            _ => None,
        }
    }

    /// Returns the last meaningful failure code across all results.
    pub fn failure_code(&self) -> i32 {
        self.results()
            .filter_map(|result| result.failure_code())
            .filter(|code| *code != NO_BETTER_POSITION_CODE)
            .last()
            .unwrap_or(NO_BETTER_POSITION_CODE)
    }

    /// Consumes the entry and returns the cheapest insertion if any.
    pub fn into_best(self, heuristic: &InsertionHeuristic) -> Option<InsertionSuccess> {
        self.routes
            .into_iter()
            .chain(self.new_route)
            .fold(InsertionResult::make_failure(&self.job), |acc, result| heuristic.select_result(acc, result))
            .into_success()
    }
}

/// Caches insertion results of required jobs, so only routes touched by the last
/// commit have to be reevaluated.
pub struct InsertionCache {
    entries: Vec<JobInsertions>,
}

impl InsertionCache {
    /// Evaluates all jobs against all routes, evaluation is done in parallel by job.
    pub fn new(heuristic: &InsertionHeuristic, insertion_ctx: &InsertionContext, jobs: Vec<Job>) -> Self {
        let entries = maybe_parallel_collect(jobs.as_slice(), insertion_ctx.environment.is_parallel, |job| {
            JobInsertions::new(heuristic, insertion_ctx, job.clone())
        });

        tracing::debug!(jobs = entries.len(), routes = insertion_ctx.solution.routes.len(), "insertion cache is built");

        Self { entries }
    }

    /// Returns cached entries in job order.
    pub fn entries(&self) -> &[JobInsertions] {
        self.entries.as_slice()
    }

    /// Checks whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes an entry with given index.
    pub fn remove(&mut self, index: usize) -> JobInsertions {
        self.entries.remove(index)
    }

    /// Removes entries without any feasible insertion and returns their jobs with failure codes.
    pub fn take_unassignable(&mut self) -> Vec<(Job, i32)> {
        let (assignable, unassignable): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.entries).into_iter().partition(|entry| entry.best_cost().is_some());
        self.entries = assignable;

        unassignable
            .into_iter()
            .map(|entry| {
                let code = entry.failure_code();
                (entry.job, code)
            })
            .collect()
    }

    /// Reevaluates insertion results for the route with given index. If the route is new, it is appended.
    /// When actor registry has changed, new route results and results of all routes without jobs are
    /// reevaluated too, as they can refer to an actor which is not available anymore.
    pub fn refresh(
        &mut self,
        heuristic: &InsertionHeuristic,
        insertion_ctx: &InsertionContext,
        route_index: usize,
        is_registry_changed: bool,
    ) {
        let route_indices = std::iter::once(route_index)
            .chain(
                insertion_ctx
                    .solution
                    .routes
                    .iter()
                    .enumerate()
                    .filter(|(idx, route_ctx)| {
                        is_registry_changed && *idx != route_index && !route_ctx.route.tour.has_jobs()
                    })
                    .map(|(idx, _)| idx),
            )
            .collect::<Vec<_>>();

        let is_parallel = insertion_ctx.environment.is_parallel;
        let results = maybe_parallel_collect(self.entries.as_slice(), is_parallel, |entry| {
            let route_results = route_indices
                .iter()
                .map(|&idx| (idx, heuristic.evaluate_route(insertion_ctx, idx, &entry.job, None)))
                .collect::<Vec<_>>();
            let new_route_result =
                is_registry_changed.then(|| heuristic.evaluate_new_route(insertion_ctx, &entry.job, None));

            (route_results, new_route_result)
        });

        self.entries.iter_mut().zip(results).for_each(|(entry, (route_results, new_route_result))| {
            route_results.into_iter().for_each(|(idx, result)| {
                if idx < entry.routes.len() {
                    entry.routes[idx] = result;
                } else {
                    entry.routes.push(result);
                }
            });

            if let Some(new_route_result) = new_route_result {
                entry.new_route = new_route_result;
            }
        });
    }
}
