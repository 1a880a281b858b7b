//! Trial state: the competing agents and the pool they collect from.

pub mod agent;
pub mod pool;

pub use agent::{ActionOutcome, ActionParams, Agent, CollectPolicy};
pub use pool::SharedPool;
