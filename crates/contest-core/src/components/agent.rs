//! Agent
//!
//! A competitor holding three resource balances. Agents only change through
//! steal and collect, both of which move resources rather than create them.

use contest_model::{Action, Amount, ResourceBundle, ResourceKind};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::pool::SharedPool;

/// Which kind the `resource` action collects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectPolicy {
    /// Always collect gold, leaving elixir and dark elixir in the pool untouched
    #[default]
    GoldOnly,
    /// Draw the collected kind uniformly, like steal does
    AnyKind,
}

impl CollectPolicy {
    pub fn pick_kind<R: Rng + ?Sized>(&self, rng: &mut R) -> ResourceKind {
        match self {
            CollectPolicy::GoldOnly => ResourceKind::Gold,
            CollectPolicy::AnyKind => draw_kind(rng),
        }
    }
}

/// Fixed per-trial parameters for steal and collect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionParams {
    pub steal_amount: Amount,
    pub collect_amount: Amount,
    pub collect_policy: CollectPolicy,
}

/// What an action actually did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Idled,
    /// Steal attempted with nobody to steal from
    NoTarget,
    Stole {
        target: String,
        kind: ResourceKind,
        amount: Amount,
    },
    /// Collection from the pool; `amount` is zero when the kind is exhausted
    Collected { kind: ResourceKind, amount: Amount },
}

impl ActionOutcome {
    /// Amount moved by this action
    pub fn transferred(&self) -> Amount {
        match self {
            ActionOutcome::Stole { amount, .. } | ActionOutcome::Collected { amount, .. } => *amount,
            ActionOutcome::Idled | ActionOutcome::NoTarget => 0,
        }
    }
}

/// Uniformly draw one of the three resource kinds
pub fn draw_kind<R: Rng + ?Sized>(rng: &mut R) -> ResourceKind {
    ResourceKind::ALL[rng.gen_range(0..ResourceKind::ALL.len())]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub name: String,
    holdings: ResourceBundle,
}

impl Agent {
    pub fn new(name: impl Into<String>, holdings: ResourceBundle) -> Self {
        Self {
            name: name.into(),
            holdings,
        }
    }

    pub fn with_balances(
        name: impl Into<String>,
        gold: Amount,
        elixir: Amount,
        dark_elixir: Amount,
    ) -> Self {
        Self::new(name, ResourceBundle::new(gold, elixir, dark_elixir))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn balance(&self, kind: ResourceKind) -> Amount {
        self.holdings.get(kind)
    }

    pub fn holdings(&self) -> ResourceBundle {
        self.holdings
    }

    pub fn total_resources(&self) -> Amount {
        self.holdings.total()
    }

    /// Agents with nothing left no longer act and cannot be stolen from
    pub fn is_active(&self) -> bool {
        self.total_resources() > 0
    }

    fn deposit(&mut self, kind: ResourceKind, amount: Amount) {
        *self.holdings.get_mut(kind) += amount;
    }

    /// Give up to `requested` of `kind`, returning what was actually given
    fn surrender(&mut self, kind: ResourceKind, requested: Amount) -> Amount {
        let slot = self.holdings.get_mut(kind);
        let taken = requested.min(*slot);
        *slot -= taken;
        taken
    }

    /// Steal up to `amount` of a random kind from a random candidate.
    ///
    /// An empty candidate list is not an error: nothing moves and
    /// [`ActionOutcome::NoTarget`] is returned.
    pub fn attempt_steal<R: Rng + ?Sized>(
        &mut self,
        candidates: &mut [&mut Agent],
        amount: Amount,
        rng: &mut R,
    ) -> ActionOutcome {
        if candidates.is_empty() {
            debug!(agent = %self.name, "no valid targets to steal from");
            return ActionOutcome::NoTarget;
        }

        let target = &mut candidates[rng.gen_range(0..candidates.len())];
        let kind = draw_kind(rng);
        let taken = target.surrender(kind, amount);
        self.deposit(kind, taken);

        ActionOutcome::Stole {
            target: target.name.clone(),
            kind,
            amount: taken,
        }
    }

    /// Collect up to `amount` of `kind` from the pool
    pub fn attempt_collect(
        &mut self,
        pool: &mut SharedPool,
        amount: Amount,
        kind: ResourceKind,
    ) -> ActionOutcome {
        let taken = pool.withdraw(kind, amount);
        self.deposit(kind, taken);
        ActionOutcome::Collected {
            kind,
            amount: taken,
        }
    }

    /// Carry out one action for this round
    pub fn decide_action<R: Rng + ?Sized>(
        &mut self,
        action: Action,
        pool: &mut SharedPool,
        candidates: &mut [&mut Agent],
        params: &ActionParams,
        rng: &mut R,
    ) -> ActionOutcome {
        match action {
            Action::Resource => {
                let kind = params.collect_policy.pick_kind(rng);
                self.attempt_collect(pool, params.collect_amount, kind)
            }
            Action::Steal => self.attempt_steal(candidates, params.steal_amount, rng),
            Action::Idle => ActionOutcome::Idled,
        }
    }
}
