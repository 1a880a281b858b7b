//! Resource Types
//!
//! The three resource kinds, per-kind holdings, and the actions an agent can take.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// Quantity of a single resource kind.
pub type Amount = u64;

/// Kind of resource held by agents and the shared pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Gold,
    Elixir,
    DarkElixir,
}

impl ResourceKind {
    /// Every kind, in a fixed order used for uniform draws
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::Gold,
        ResourceKind::Elixir,
        ResourceKind::DarkElixir,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Gold => "gold",
            ResourceKind::Elixir => "elixir",
            ResourceKind::DarkElixir => "dark_elixir",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One amount per resource kind.
///
/// Used for agent holdings, pool reserves and conservation ledgers alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ResourceBundle {
    pub gold: Amount,
    pub elixir: Amount,
    pub dark_elixir: Amount,
}

impl ResourceBundle {
    pub fn new(gold: Amount, elixir: Amount, dark_elixir: Amount) -> Self {
        Self {
            gold,
            elixir,
            dark_elixir,
        }
    }

    /// Same amount of every kind
    pub fn uniform(amount: Amount) -> Self {
        Self::new(amount, amount, amount)
    }

    pub fn get(&self, kind: ResourceKind) -> Amount {
        match kind {
            ResourceKind::Gold => self.gold,
            ResourceKind::Elixir => self.elixir,
            ResourceKind::DarkElixir => self.dark_elixir,
        }
    }

    pub fn get_mut(&mut self, kind: ResourceKind) -> &mut Amount {
        match kind {
            ResourceKind::Gold => &mut self.gold,
            ResourceKind::Elixir => &mut self.elixir,
            ResourceKind::DarkElixir => &mut self.dark_elixir,
        }
    }

    /// Sum over all kinds
    pub fn total(&self) -> Amount {
        self.gold + self.elixir + self.dark_elixir
    }

    /// Sum over all kinds, or `None` if it overflows
    pub fn checked_total(&self) -> Option<Amount> {
        self.gold.checked_add(self.elixir)?.checked_add(self.dark_elixir)
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Per-kind sum, or `None` if any kind overflows
    pub fn checked_add(&self, other: &ResourceBundle) -> Option<ResourceBundle> {
        Some(ResourceBundle {
            gold: self.gold.checked_add(other.gold)?,
            elixir: self.elixir.checked_add(other.elixir)?,
            dark_elixir: self.dark_elixir.checked_add(other.dark_elixir)?,
        })
    }
}

impl Add for ResourceBundle {
    type Output = ResourceBundle;

    fn add(self, other: ResourceBundle) -> ResourceBundle {
        ResourceBundle {
            gold: self.gold + other.gold,
            elixir: self.elixir + other.elixir,
            dark_elixir: self.dark_elixir + other.dark_elixir,
        }
    }
}

impl fmt::Display for ResourceBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Gold: {}, Elixir: {}, Dark Elixir: {}",
            self.gold, self.elixir, self.dark_elixir
        )
    }
}

/// What an active agent does in one round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Do nothing this round
    Idle,
    /// Take from another active agent
    Steal,
    /// Collect from the shared pool
    Resource,
}

impl Action {
    /// Every action, in a fixed order used for uniform draws
    pub const ALL: [Action; 3] = [Action::Idle, Action::Steal, Action::Resource];
}
