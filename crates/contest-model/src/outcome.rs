//! Trial Outcome
//!
//! The label a finished trial reports: the sole richest agent, or a draw.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label reported when two or more agents share the maximum total
pub const DRAW_LABEL: &str = "Draw";

/// Result of one finished trial
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Name of the agent holding strictly the most resources
    Winner(String),
    /// Two or more agents tied for the most resources
    Draw,
}

impl Outcome {
    /// Histogram label: the winner's name or `"Draw"`
    pub fn label(&self) -> &str {
        match self {
            Outcome::Winner(name) => name,
            Outcome::Draw => DRAW_LABEL,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
