//! Resource Contest Simulation Engine
//!
//! Agents idle, collect from a shared pool, or steal from one another until at
//! most one of them holds anything. Many independent trials run in parallel
//! and their winners are counted.

pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod orchestrator;
pub mod output;
pub mod trial;

pub use components::{ActionOutcome, ActionParams, Agent, CollectPolicy, SharedPool};
pub use config::{AgentSpec, BatchSettings, ConfigError, ContestConfig, PoolSpec, TrialTemplate};
pub use engine::{determine_outcome, Competition, CompetitionState};
pub use error::{ContestError, Result, TrialError};
pub use orchestrator::{run_batch, run_configured, BatchPlan, Orchestrator};
pub use trial::{run_seeded_trial, run_trial, trial_seed, TrialPlan, TrialResult};
