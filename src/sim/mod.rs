//! The agent action engine.
//!
//! Composition, leaf-first: [`CooldownTracker`] gates how often an
//! agent repeats an action, [`select_by_recency`] picks engagement
//! targets with a freshness bias, [`Agent`] owns identity and cooldown
//! state and exposes one operation per [`ActionKind`], and
//! [`Scheduler`] drives the pool one action per tick.

mod agent;
mod cooldown;
mod scheduler;
mod selector;

pub use agent::{ActionOutcome, Agent};
pub use cooldown::{ActionKind, CooldownTracker};
pub use scheduler::Scheduler;
pub use selector::select_by_recency;
