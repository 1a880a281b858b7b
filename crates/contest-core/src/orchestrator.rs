//! Experiment Orchestrator
//!
//! Runs many independent trials on a bounded worker pool and counts their
//! outcomes.
//!
//! Each trial gets its own `SmallRng` seeded from the master seed plus the
//! trial index, so a batch produces the same histogram whatever the worker
//! count or scheduling order. Trials are supervised individually: a trial that
//! panics or hits its round ceiling is recorded as a failure and the batch
//! carries on.

use contest_model::{BatchReport, Histogram, TrialFailure};
use rayon::prelude::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::ContestConfig;
use crate::error::{ContestError, Result, TrialError};
use crate::trial::{run_seeded_trial, trial_seed, TrialPlan, TrialResult};

/// Validated batch parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlan {
    pub trial_count: u64,
    pub worker_count: usize,
    pub master_seed: Option<u64>,
}

impl BatchPlan {
    /// The configured master seed, or a fresh one from entropy
    pub fn resolve_seed(&self) -> u64 {
        self.master_seed.unwrap_or_else(rand::random)
    }
}

/// Partial results from one worker, merged pairwise into the final report
#[derive(Debug, Default)]
struct BatchTally {
    histogram: Histogram,
    failures: Vec<TrialFailure>,
    total_rounds: u64,
}

impl BatchTally {
    fn absorb(
        &mut self,
        trial_index: u64,
        seed: u64,
        result: std::result::Result<TrialResult, TrialError>,
    ) {
        match result {
            Ok(result) => {
                debug!(
                    trial = trial_index,
                    outcome = %result.outcome,
                    rounds = result.rounds,
                    "trial finished"
                );
                self.histogram.record(&result.outcome);
                self.total_rounds += result.rounds;
            }
            Err(e) => {
                warn!(trial = trial_index, seed, "trial failed: {}", e);
                self.failures.push(TrialFailure {
                    trial_index,
                    seed,
                    reason: e.to_string(),
                });
            }
        }
    }

    fn merge(mut self, other: BatchTally) -> BatchTally {
        self.histogram.merge(other.histogram);
        self.failures.extend(other.failures);
        self.total_rounds += other.total_rounds;
        self
    }

    fn into_report(mut self, trial_count: u64, master_seed: u64) -> BatchReport {
        self.failures.sort_by_key(|f| f.trial_index);
        BatchReport {
            trial_count,
            master_seed,
            histogram: self.histogram,
            failures: self.failures,
            total_rounds: self.total_rounds,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Run a trial body, converting a panic into [`TrialError::Panicked`]
pub fn supervise<F>(trial: F) -> std::result::Result<TrialResult, TrialError>
where
    F: FnOnce() -> std::result::Result<TrialResult, TrialError>,
{
    panic::catch_unwind(AssertUnwindSafe(trial))
        .unwrap_or_else(|payload| Err(TrialError::Panicked(panic_message(payload.as_ref()))))
}

/// Worker pool that executes batches of trials
#[derive(Debug)]
pub struct Orchestrator {
    pool: rayon::ThreadPool,
    worker_count: usize,
}

impl Orchestrator {
    /// Start a pool with exactly `worker_count` threads
    pub fn new(worker_count: usize) -> Result<Self> {
        if worker_count == 0 {
            return Err(ContestError::invalid("worker_count must be positive"));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(worker_count)
            .thread_name(|i| format!("contest-worker-{}", i))
            .build()?;
        Ok(Self { pool, worker_count })
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Run `trial_count` trials of `plan` and count their outcomes
    pub fn run(&self, trial_count: u64, plan: &TrialPlan, master_seed: u64) -> Result<BatchReport> {
        if trial_count == 0 {
            return Err(ContestError::invalid("trial_count must be positive"));
        }

        info!(
            trials = trial_count,
            workers = self.worker_count,
            master_seed,
            "starting batch"
        );
        let started = Instant::now();

        let tally = self.pool.install(|| {
            (0..trial_count)
                .into_par_iter()
                .fold(BatchTally::default, |mut tally, index| {
                    let seed = trial_seed(master_seed, index);
                    tally.absorb(index, seed, supervise(|| run_seeded_trial(plan, seed)));
                    tally
                })
                .reduce(BatchTally::default, BatchTally::merge)
        });
        let report = tally.into_report(trial_count, master_seed);

        info!(
            completed = report.completed(),
            failed = report.failed(),
            mean_rounds = report.mean_rounds(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "batch finished"
        );
        Ok(report)
    }
}

/// Run a batch on a fresh pool of `worker_count` workers
pub fn run_batch(
    trial_count: u64,
    worker_count: usize,
    plan: &TrialPlan,
    master_seed: u64,
) -> Result<BatchReport> {
    Orchestrator::new(worker_count)?.run(trial_count, plan, master_seed)
}

/// Validate a full configuration and run it.
///
/// Configuration errors are returned before any trial starts.
pub fn run_configured(config: &ContestConfig) -> Result<BatchReport> {
    let (batch, plan) = config.validate()?;
    run_batch(
        batch.trial_count,
        batch.worker_count,
        &plan,
        batch.resolve_seed(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrialTemplate;
    use contest_model::Outcome;

    fn plan() -> TrialPlan {
        TrialTemplate::default().validate().unwrap()
    }

    #[test]
    fn test_counts_sum_to_trial_count() {
        let report = run_batch(64, 4, &plan(), 1234).unwrap();

        assert_eq!(report.trial_count, 64);
        assert_eq!(report.completed(), 64);
        assert_eq!(report.failed(), 0);
        assert!(report.is_complete());
        assert!(report.total_rounds >= 64);
        for (label, _) in report.histogram.iter() {
            assert!(["A", "B", "C", "Draw"].contains(&label));
        }
    }

    #[test]
    fn test_histogram_independent_of_worker_count() {
        let plan = plan();
        let single = run_batch(40, 1, &plan, 99).unwrap();
        let several = run_batch(40, 3, &plan, 99).unwrap();
        assert_eq!(single, several);
    }

    #[test]
    fn test_failures_are_recorded_not_fatal() {
        let mut plan = plan();
        // A single round can never finish the default scenario
        plan.max_rounds = 1;

        let report = run_batch(10, 2, &plan, 5).unwrap();

        assert_eq!(report.completed(), 0);
        assert_eq!(report.failed(), 10);
        assert_eq!(report.completed() + report.failed(), report.trial_count);
        let indices: Vec<u64> = report.failures.iter().map(|f| f.trial_index).collect();
        assert_eq!(indices, (0..10).collect::<Vec<_>>());
        assert_eq!(report.failures[3].seed, trial_seed(5, 3));
    }

    #[test]
    fn test_zero_counts_rejected() {
        let plan = plan();
        assert!(matches!(
            run_batch(0, 2, &plan, 0),
            Err(ContestError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            run_batch(10, 0, &plan, 0),
            Err(ContestError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_supervise_catches_panics() {
        let result = supervise(|| panic!("worker blew up"));
        assert_eq!(result, Err(TrialError::Panicked("worker blew up".to_string())));

        let ok = supervise(|| {
            Ok(TrialResult {
                outcome: Outcome::Draw,
                rounds: 0,
                final_holdings: Vec::new(),
            })
        });
        assert!(ok.is_ok());
    }

    #[test]
    fn test_tally_merge_is_order_independent() {
        let win = |name: &str| {
            Ok(TrialResult {
                outcome: Outcome::Winner(name.to_string()),
                rounds: 10,
                final_holdings: Vec::new(),
            })
        };

        let mut left = BatchTally::default();
        left.absorb(0, 0, win("A"));
        left.absorb(2, 2, Err(TrialError::Panicked("boom".to_string())));
        let mut right = BatchTally::default();
        right.absorb(1, 1, win("B"));
        right.absorb(3, 3, win("A"));

        let forward = BatchTally::default()
            .merge(left)
            .merge(right)
            .into_report(4, 0);

        let mut left = BatchTally::default();
        left.absorb(3, 3, win("A"));
        left.absorb(1, 1, win("B"));
        let mut right = BatchTally::default();
        right.absorb(2, 2, Err(TrialError::Panicked("boom".to_string())));
        right.absorb(0, 0, win("A"));
        let backward = right.merge(left).into_report(4, 0);

        assert_eq!(forward, backward);
        assert_eq!(forward.histogram.get("A"), 2);
        assert_eq!(forward.total_rounds, 30);
    }

    #[test]
    fn test_run_configured_rejects_before_running() {
        let mut config = ContestConfig::default();
        config.trial.steal_amount = -5;
        assert!(matches!(
            run_configured(&config),
            Err(ContestError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_run_configured_uses_fixed_seed() {
        let mut config = ContestConfig::default();
        config.batch.trial_count = 12;
        config.batch.worker_count = 2;
        config.batch.master_seed = Some(77);

        let first = run_configured(&config).unwrap();
        let second = run_configured(&config).unwrap();
        assert_eq!(first.master_seed, 77);
        assert_eq!(first, second);
    }
}
