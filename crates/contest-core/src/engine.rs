//! Competition Engine
//!
//! Drives one trial round by round until at most one agent holds anything.
//!
//! Each round, every agent that was active when the round started draws one
//! action uniformly from `{idle, steal, resource}` and applies it immediately.
//! Actions are applied sequentially in roster order, so a later agent sees
//! balances already changed by an earlier one in the same round. The active
//! set (and with it the steal candidates) is fixed at the start of the round.

use contest_model::{Action, Outcome, ResourceBundle};
use rand::Rng;
use tracing::trace;

use crate::components::{ActionParams, Agent, SharedPool};
use crate::error::TrialError;

/// Lifecycle of a competition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompetitionState {
    Running,
    Finished,
}

/// Uniformly draw one of the three actions
pub fn draw_action<R: Rng + ?Sized>(rng: &mut R) -> Action {
    Action::ALL[rng.gen_range(0..Action::ALL.len())]
}

/// Decide the outcome for a set of agents.
///
/// The agent with strictly the largest total wins; any tie at the top is a draw.
pub fn determine_outcome(agents: &[Agent]) -> Outcome {
    let Some(max_total) = agents.iter().map(Agent::total_resources).max() else {
        return Outcome::Draw;
    };

    let mut leaders = agents.iter().filter(|a| a.total_resources() == max_total);
    match (leaders.next(), leaders.next()) {
        (Some(winner), None) => Outcome::Winner(winner.name.clone()),
        _ => Outcome::Draw,
    }
}

/// One trial's agents and pool, plus the round counter
#[derive(Debug, Clone)]
pub struct Competition {
    agents: Vec<Agent>,
    pool: SharedPool,
    params: ActionParams,
    round: u64,
    initial_ledger: ResourceBundle,
}

impl Competition {
    pub fn new(agents: Vec<Agent>, pool: SharedPool, params: ActionParams) -> Self {
        let initial_ledger = ledger_of(&agents, &pool);
        Self {
            agents,
            pool,
            params,
            round: 0,
            initial_ledger,
        }
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn pool(&self) -> &SharedPool {
        &self.pool
    }

    /// Rounds played so far
    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn active_count(&self) -> usize {
        self.agents.iter().filter(|a| a.is_active()).count()
    }

    pub fn state(&self) -> CompetitionState {
        if self.active_count() <= 1 {
            CompetitionState::Finished
        } else {
            CompetitionState::Running
        }
    }

    /// Per-kind sum over every agent and the pool
    pub fn ledger(&self) -> ResourceBundle {
        ledger_of(&self.agents, &self.pool)
    }

    /// The outcome, once the competition has finished
    pub fn outcome(&self) -> Option<Outcome> {
        match self.state() {
            CompetitionState::Finished => Some(determine_outcome(&self.agents)),
            CompetitionState::Running => None,
        }
    }

    /// Play one round. Does nothing once finished.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> CompetitionState {
        if self.state() == CompetitionState::Finished {
            return CompetitionState::Finished;
        }
        self.round += 1;

        let was_active: Vec<bool> = self.agents.iter().map(Agent::is_active).collect();

        for idx in 0..self.agents.len() {
            if !was_active[idx] {
                continue;
            }
            let action = draw_action(rng);

            let (before, rest) = self.agents.split_at_mut(idx);
            let Some((actor, after)) = rest.split_first_mut() else {
                continue;
            };

            let mut candidates: Vec<&mut Agent> = if action == Action::Steal {
                before
                    .iter_mut()
                    .zip(&was_active[..idx])
                    .chain(after.iter_mut().zip(&was_active[idx + 1..]))
                    .filter_map(|(agent, &active)| active.then_some(agent))
                    .collect()
            } else {
                Vec::new()
            };

            let outcome =
                actor.decide_action(action, &mut self.pool, &mut candidates, &self.params, rng);
            trace!(round = self.round, agent = %actor.name, ?action, ?outcome, "action applied");
        }

        debug_assert_eq!(
            self.ledger(),
            self.initial_ledger,
            "resources created or destroyed in round {}",
            self.round
        );

        if tracing::enabled!(tracing::Level::TRACE) {
            for agent in &self.agents {
                trace!(round = self.round, "{} ({})", agent.name, agent.holdings());
            }
        }

        self.state()
    }

    /// Play rounds until finished, failing once `max_rounds` have been played
    pub fn run<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        max_rounds: u64,
    ) -> Result<Outcome, TrialError> {
        while self.state() == CompetitionState::Running {
            if self.round >= max_rounds {
                return Err(TrialError::RoundLimitExceeded {
                    limit: max_rounds,
                    active: self.active_count(),
                });
            }
            self.step(rng);
        }
        Ok(determine_outcome(&self.agents))
    }

    /// Consume the competition, returning the final agents
    pub fn into_agents(self) -> Vec<Agent> {
        self.agents
    }
}

fn ledger_of(agents: &[Agent], pool: &SharedPool) -> ResourceBundle {
    agents
        .iter()
        .fold(pool.reserves(), |sum, agent| sum + agent.holdings())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::CollectPolicy;
    use contest_model::ResourceKind;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn params() -> ActionParams {
        ActionParams {
            steal_amount: 5,
            collect_amount: 3,
            collect_policy: CollectPolicy::GoldOnly,
        }
    }

    fn example_competition() -> Competition {
        Competition::new(
            vec![
                Agent::with_balances("A", 10, 10, 10),
                Agent::with_balances("B", 20, 20, 20),
                Agent::with_balances("C", 5, 5, 5),
            ],
            SharedPool::new(ResourceBundle::uniform(50)),
            params(),
        )
    }

    #[test]
    fn test_conservation_and_non_negativity_every_round() {
        for seed in 0..20 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut competition = example_competition();
            let start = competition.ledger();
            let mut pool_total = competition.pool().total();

            while competition.step(&mut rng) == CompetitionState::Running {
                assert_eq!(competition.ledger(), start, "seed {} round {}", seed, competition.round());
                // Pool only ever drains
                assert!(competition.pool().total() <= pool_total);
                pool_total = competition.pool().total();
            }
            assert_eq!(competition.ledger(), start);
        }
    }

    #[test]
    fn test_run_reaches_single_survivor() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut competition = example_competition();

        let outcome = competition.run(&mut rng, 1_000_000).unwrap();

        assert_eq!(competition.state(), CompetitionState::Finished);
        assert!(competition.active_count() <= 1);
        assert!(competition.round() > 0);
        assert_eq!(Some(outcome.clone()), competition.outcome());
        assert_eq!(outcome, determine_outcome(competition.agents()));
    }

    #[test]
    fn test_step_after_finish_is_noop() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut competition = Competition::new(
            vec![
                Agent::with_balances("A", 1, 0, 0),
                Agent::with_balances("B", 0, 0, 0),
                Agent::with_balances("C", 0, 0, 0),
            ],
            SharedPool::new(ResourceBundle::uniform(50)),
            params(),
        );

        assert_eq!(competition.step(&mut rng), CompetitionState::Finished);
        assert_eq!(competition.round(), 0);
        assert_eq!(competition.pool().total(), 150);
        assert_eq!(competition.outcome(), Some(Outcome::Winner("A".to_string())));
    }

    #[test]
    fn test_outcome_unavailable_while_running() {
        assert_eq!(example_competition().outcome(), None);
        assert_eq!(example_competition().state(), CompetitionState::Running);
    }

    #[test]
    fn test_round_limit_is_a_failure() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut competition = example_competition();

        let err = competition.run(&mut rng, 1).unwrap_err();

        assert_eq!(competition.round(), 1);
        assert!(matches!(err, TrialError::RoundLimitExceeded { limit: 1, .. }));
    }

    #[test]
    fn test_determine_outcome_unique_max() {
        let agents = vec![
            Agent::with_balances("A", 0, 0, 0),
            Agent::with_balances("B", 0, 7, 0),
            Agent::with_balances("C", 1, 1, 1),
        ];
        assert_eq!(determine_outcome(&agents), Outcome::Winner("B".to_string()));
    }

    #[test]
    fn test_determine_outcome_tie_is_draw() {
        let agents = vec![
            Agent::with_balances("A", 5, 0, 0),
            Agent::with_balances("B", 0, 0, 5),
            Agent::with_balances("C", 1, 1, 1),
        ];
        assert_eq!(determine_outcome(&agents), Outcome::Draw);

        let all_empty = vec![
            Agent::with_balances("A", 0, 0, 0),
            Agent::with_balances("B", 0, 0, 0),
        ];
        assert_eq!(determine_outcome(&all_empty), Outcome::Draw);
    }

    #[test]
    fn test_inactive_agents_never_act_or_get_robbed() {
        let mut rng = SmallRng::seed_from_u64(21);
        let mut competition = Competition::new(
            vec![
                Agent::with_balances("A", 10, 10, 10),
                Agent::with_balances("B", 10, 10, 10),
                Agent::with_balances("Broke", 0, 0, 0),
            ],
            SharedPool::new(ResourceBundle::uniform(50)),
            params(),
        );

        while competition.step(&mut rng) == CompetitionState::Running {
            assert_eq!(competition.agents()[2].total_resources(), 0);
        }
        assert_eq!(competition.agents()[2].total_resources(), 0);
    }

    #[test]
    fn test_gold_only_pool_keeps_other_kinds() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut competition = example_competition();
        competition.run(&mut rng, 1_000_000).unwrap();

        let pool = competition.pool();
        assert_eq!(pool.available(ResourceKind::Elixir), 50);
        assert_eq!(pool.available(ResourceKind::DarkElixir), 50);
    }
}
