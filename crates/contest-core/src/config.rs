//! Configuration System
//!
//! Loads batch and trial parameters from a TOML file. Every section is
//! optional; missing values fall back to the classic three-agent scenario.
//!
//! Amounts are read as signed integers so that negative values can be
//! reported as configuration errors instead of parse failures.

use contest_model::{Amount, ResourceBundle, DRAW_LABEL};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::components::{ActionParams, CollectPolicy};
use crate::error::{ContestError, Result};
use crate::orchestrator::BatchPlan;
use crate::trial::TrialPlan;

/// Default config file path
pub const DEFAULT_CONFIG_PATH: &str = "contest.toml";

/// Default safety ceiling on rounds per trial
pub const DEFAULT_MAX_ROUNDS: u64 = 1_000_000;

/// Fewest agents a trial may start with
pub const MIN_AGENTS: usize = 3;

/// Top-level configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContestConfig {
    #[serde(default)]
    pub batch: BatchSettings,
    #[serde(default)]
    pub trial: TrialTemplate,
}

/// How many trials to run and on how many workers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    pub trial_count: i64,
    pub worker_count: i64,
    /// Fixed master seed; drawn from entropy when absent
    pub master_seed: Option<u64>,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            trial_count: 50,
            worker_count: 12,
            master_seed: None,
        }
    }
}

/// Initial balances for one agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSpec {
    pub name: String,
    #[serde(default)]
    pub gold: i64,
    #[serde(default)]
    pub elixir: i64,
    #[serde(default)]
    pub dark_elixir: i64,
}

impl AgentSpec {
    pub fn new(name: impl Into<String>, gold: i64, elixir: i64, dark_elixir: i64) -> Self {
        Self {
            name: name.into(),
            gold,
            elixir,
            dark_elixir,
        }
    }
}

/// Initial pool reserves
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolSpec {
    pub gold: i64,
    pub elixir: i64,
    pub dark_elixir: i64,
}

impl Default for PoolSpec {
    fn default() -> Self {
        Self {
            gold: 50,
            elixir: 50,
            dark_elixir: 50,
        }
    }
}

/// Everything needed to build one trial, before validation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrialTemplate {
    pub agents: Vec<AgentSpec>,
    pub pool: PoolSpec,
    pub steal_amount: i64,
    pub collect_amount: i64,
    pub max_rounds: u64,
    pub collect_policy: CollectPolicy,
}

impl Default for TrialTemplate {
    fn default() -> Self {
        Self {
            agents: vec![
                AgentSpec::new("A", 10, 10, 10),
                AgentSpec::new("B", 20, 20, 20),
                AgentSpec::new("C", 5, 5, 5),
            ],
            pool: PoolSpec::default(),
            steal_amount: 5,
            collect_amount: 3,
            max_rounds: DEFAULT_MAX_ROUNDS,
            collect_policy: CollectPolicy::GoldOnly,
        }
    }
}

fn non_negative(value: i64, what: &str) -> Result<Amount> {
    Amount::try_from(value)
        .map_err(|_| ContestError::invalid(format!("{} must not be negative (got {})", what, value)))
}

fn bundle(gold: i64, elixir: i64, dark_elixir: i64, owner: &str) -> Result<ResourceBundle> {
    Ok(ResourceBundle::new(
        non_negative(gold, &format!("{} gold", owner))?,
        non_negative(elixir, &format!("{} elixir", owner))?,
        non_negative(dark_elixir, &format!("{} dark_elixir", owner))?,
    ))
}

impl TrialTemplate {
    /// Check every amount and name, producing a plan the runner can execute
    pub fn validate(&self) -> Result<TrialPlan> {
        let steal_amount = non_negative(self.steal_amount, "steal_amount")?;
        let collect_amount = non_negative(self.collect_amount, "collect_amount")?;
        if self.max_rounds == 0 {
            return Err(ContestError::invalid("max_rounds must be positive"));
        }

        if self.agents.len() < MIN_AGENTS {
            return Err(ContestError::invalid(format!(
                "at least {} agents are required (got {})",
                MIN_AGENTS,
                self.agents.len()
            )));
        }

        let mut names = HashSet::new();
        let mut agents = Vec::with_capacity(self.agents.len());
        for spec in &self.agents {
            let name = spec.name.trim();
            if name.is_empty() {
                return Err(ContestError::invalid("agent names must not be empty"));
            }
            if name == DRAW_LABEL {
                return Err(ContestError::invalid(format!(
                    "agent name {:?} is reserved for tied outcomes",
                    DRAW_LABEL
                )));
            }
            if !names.insert(name) {
                return Err(ContestError::invalid(format!("duplicate agent name {:?}", name)));
            }
            let holdings = bundle(
                spec.gold,
                spec.elixir,
                spec.dark_elixir,
                &format!("agent {}", name),
            )?;
            agents.push((name.to_string(), holdings));
        }

        let pool = bundle(self.pool.gold, self.pool.elixir, self.pool.dark_elixir, "pool")?;

        // Conservation bounds every agent total by the grand total over all
        // kinds, so that sum must fit as well as each per-kind sum.
        agents
            .iter()
            .try_fold(pool, |sum, (_, holdings)| sum.checked_add(holdings))
            .and_then(|ledger| ledger.checked_total())
            .ok_or_else(|| ContestError::invalid("combined resources overflow"))?;

        Ok(TrialPlan {
            agents,
            pool,
            params: ActionParams {
                steal_amount,
                collect_amount,
                collect_policy: self.collect_policy,
            },
            max_rounds: self.max_rounds,
        })
    }
}

impl BatchSettings {
    pub fn validate(&self) -> Result<BatchPlan> {
        if self.trial_count <= 0 {
            return Err(ContestError::invalid(format!(
                "trial_count must be positive (got {})",
                self.trial_count
            )));
        }
        if self.worker_count <= 0 {
            return Err(ContestError::invalid(format!(
                "worker_count must be positive (got {})",
                self.worker_count
            )));
        }
        let worker_count = usize::try_from(self.worker_count)
            .map_err(|_| ContestError::invalid("worker_count is too large"))?;

        Ok(BatchPlan {
            trial_count: self.trial_count as u64,
            worker_count,
            master_seed: self.master_seed,
        })
    }
}

impl ContestConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> std::result::Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from `path`, or use defaults if the file does not exist.
    ///
    /// A file that exists but cannot be read or parsed is an error.
    pub fn load_if_present(path: impl AsRef<Path>) -> std::result::Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("{} not found, using default configuration", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Load configuration from the default path, or use defaults if not found
    pub fn load_or_default() -> std::result::Result<Self, ConfigError> {
        Self::load_if_present(DEFAULT_CONFIG_PATH)
    }

    /// Validate both sections before anything runs
    pub fn validate(&self) -> Result<(BatchPlan, TrialPlan)> {
        Ok((self.batch.validate()?, self.trial.validate()?))
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}
