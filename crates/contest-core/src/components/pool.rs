//! Shared Pool
//!
//! The common reservoir agents collect from. Owned by a single trial.

use contest_model::{Amount, ResourceBundle, ResourceKind};
use serde::{Deserialize, Serialize};

/// Per-kind reserves available for collection.
///
/// Reserves only ever shrink: the pool has no deposit operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SharedPool {
    reserves: ResourceBundle,
}

impl SharedPool {
    pub fn new(reserves: ResourceBundle) -> Self {
        Self { reserves }
    }

    pub fn available(&self, kind: ResourceKind) -> Amount {
        self.reserves.get(kind)
    }

    pub fn reserves(&self) -> ResourceBundle {
        self.reserves
    }

    pub fn total(&self) -> Amount {
        self.reserves.total()
    }

    /// Remove up to `requested` of `kind`, returning what was actually removed
    pub fn withdraw(&mut self, kind: ResourceKind, requested: Amount) -> Amount {
        let slot = self.reserves.get_mut(kind);
        let taken = requested.min(*slot);
        *slot -= taken;
        taken
    }
}
