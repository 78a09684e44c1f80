//! Per-agent action cooldowns.
//!
//! State is owned by the agent and lives in process memory only; a
//! restart deliberately clears all cooldowns and unsticks the pool.

use std::collections::HashMap;
use std::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// The fixed set of actions an agent can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Create a feed post
    Post,
    /// Comment on another agent's post
    Comment,
    /// Like another agent's post
    Like,
    /// Send a connection request
    ConnectRequest,
    /// Accept a pending inbound connection request
    ConnectAccept,
}

impl ActionKind {
    /// Tick range the cooldown is resampled from after each successful
    /// action of this kind. `None` means the kind is never throttled.
    pub fn cooldown_range(self) -> Option<RangeInclusive<u64>> {
        match self {
            Self::Post => Some(5..=15),
            Self::Comment => Some(3..=10),
            Self::Like | Self::ConnectRequest | Self::ConnectAccept => None,
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Post => "post",
            Self::Comment => "comment",
            Self::Like => "like",
            Self::ConnectRequest => "connect-request",
            Self::ConnectAccept => "connect-accept",
        };
        write!(f, "{name}")
    }
}

/// Gates how often one agent may repeat each action kind.
#[derive(Debug, Default)]
pub struct CooldownTracker {
    last_action: HashMap<ActionKind, u64>,
    cooldown_ticks: HashMap<ActionKind, u64>,
}

impl CooldownTracker {
    /// Create a tracker with no history; every kind is immediately ready.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an action of `kind` may be attempted at `tick`.
    pub fn ready(&self, kind: ActionKind, tick: u64) -> bool {
        let Some(last) = self.last_action.get(&kind) else {
            return true;
        };
        let cooldown = self.cooldown_ticks.get(&kind).copied().unwrap_or(0);
        tick.saturating_sub(*last) >= cooldown
    }

    /// Ticks remaining before `kind` is ready again (zero when ready).
    pub fn remaining(&self, kind: ActionKind, tick: u64) -> u64 {
        let Some(last) = self.last_action.get(&kind) else {
            return 0;
        };
        let cooldown = self.cooldown_ticks.get(&kind).copied().unwrap_or(0);
        (last + cooldown).saturating_sub(tick)
    }

    /// Record a successful action at `tick` and resample the cooldown
    /// for its kind.
    pub fn consume(&mut self, kind: ActionKind, tick: u64, rng: &mut impl Rng) {
        self.last_action.insert(kind, tick);
        if let Some(range) = kind.cooldown_range() {
            self.cooldown_ticks.insert(kind, rng.gen_range(range));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_fresh_tracker_is_ready_for_all_kinds() {
        let tracker = CooldownTracker::new();
        for kind in [
            ActionKind::Post,
            ActionKind::Comment,
            ActionKind::Like,
            ActionKind::ConnectRequest,
            ActionKind::ConnectAccept,
        ] {
            assert!(tracker.ready(kind, 0));
        }
    }

    #[test]
    fn test_consume_blocks_until_cooldown_elapses() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut tracker = CooldownTracker::new();

        tracker.consume(ActionKind::Post, 100, &mut rng);
        assert!(!tracker.ready(ActionKind::Post, 100));

        let remaining = tracker.remaining(ActionKind::Post, 100);
        assert!((5..=15).contains(&remaining));

        assert!(!tracker.ready(ActionKind::Post, 100 + remaining - 1));
        assert!(tracker.ready(ActionKind::Post, 100 + remaining));
    }

    #[test]
    fn test_cooldown_resampled_within_kind_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let mut tracker = CooldownTracker::new();

        for tick in 0..200 {
            tracker.consume(ActionKind::Comment, tick * 100, &mut rng);
            let remaining = tracker.remaining(ActionKind::Comment, tick * 100);
            assert!((3..=10).contains(&remaining));
        }
    }

    #[test]
    fn test_uncooled_kinds_stay_ready_after_consume() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut tracker = CooldownTracker::new();

        tracker.consume(ActionKind::Like, 50, &mut rng);
        assert!(tracker.ready(ActionKind::Like, 50));
        tracker.consume(ActionKind::ConnectRequest, 50, &mut rng);
        assert!(tracker.ready(ActionKind::ConnectRequest, 50));
    }

    #[test]
    fn test_kinds_are_tracked_independently() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut tracker = CooldownTracker::new();

        tracker.consume(ActionKind::Post, 10, &mut rng);
        assert!(!tracker.ready(ActionKind::Post, 10));
        assert!(tracker.ready(ActionKind::Comment, 10));
    }
}
