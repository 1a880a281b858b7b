//! Trial Runner
//!
//! Builds a fresh roster and pool from a validated plan and runs one
//! competition to completion. Nothing outside the trial is read or written.

use contest_model::{Outcome, ResourceBundle};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::components::{ActionParams, Agent, SharedPool};
use crate::engine::Competition;
use crate::error::TrialError;

/// A validated trial configuration.
///
/// Built by [`crate::config::TrialTemplate::validate`]; every amount is already
/// known to be non-negative and names are unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialPlan {
    pub agents: Vec<(String, ResourceBundle)>,
    pub pool: ResourceBundle,
    pub params: ActionParams,
    /// Safety ceiling on rounds per trial
    pub max_rounds: u64,
}

impl TrialPlan {
    /// Fresh competition in its initial state
    pub fn build(&self) -> Competition {
        let agents = self
            .agents
            .iter()
            .map(|(name, holdings)| Agent::new(name.clone(), *holdings))
            .collect();
        Competition::new(agents, SharedPool::new(self.pool), self.params)
    }
}

/// Result of one completed trial
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrialResult {
    pub outcome: Outcome,
    pub rounds: u64,
    pub final_holdings: Vec<(String, ResourceBundle)>,
}

/// Seed for trial `index` of a batch
pub fn trial_seed(master_seed: u64, index: u64) -> u64 {
    master_seed.wrapping_add(index)
}

/// Run one trial with the given random source
pub fn run_trial<R: Rng + ?Sized>(plan: &TrialPlan, rng: &mut R) -> Result<TrialResult, TrialError> {
    let mut competition = plan.build();
    let outcome = competition.run(rng, plan.max_rounds)?;
    let rounds = competition.round();

    let final_holdings = competition
        .into_agents()
        .into_iter()
        .map(|agent| {
            let holdings = agent.holdings();
            (agent.name, holdings)
        })
        .collect();

    Ok(TrialResult {
        outcome,
        rounds,
        final_holdings,
    })
}

/// Run one trial with its own `SmallRng` seeded from `seed`
pub fn run_seeded_trial(plan: &TrialPlan, seed: u64) -> Result<TrialResult, TrialError> {
    let mut rng = SmallRng::seed_from_u64(seed);
    run_trial(plan, &mut rng)
}
