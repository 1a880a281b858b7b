//! Shared data types for the resource contest.
//!
//! This crate contains pure data structures with no simulation logic.
//! It is a dependency for all other crates in the workspace.

pub mod outcome;
pub mod report;
pub mod resource;

pub use outcome::{Outcome, DRAW_LABEL};
pub use report::{BatchReport, Histogram, TrialFailure};
pub use resource::{Action, Amount, ResourceBundle, ResourceKind};
