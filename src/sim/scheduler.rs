//! The simulation tick loop.
//!
//! One agent acts per tick. The priority policy mirrors how people use
//! the platform: react to others first (comment), then broadcast
//! (post), then fall back to one of the lightweight actions. Individual
//! action failures are logged and the loop keeps running; there is no
//! terminal state short of external termination or the optional tick
//! limit.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time::{sleep, Duration};

use super::agent::{ActionOutcome, Agent};
use crate::config::SimulationConfig;
use crate::error::{Result, SimError};

/// Drives the agent pool, one action per tick.
pub struct Scheduler {
    agents: Vec<Agent>,
    tick_interval: Duration,
    max_ticks: Option<u64>,
    tick: u64,
    rng: StdRng,
}

impl Scheduler {
    /// Build a scheduler over the agent pool.
    ///
    /// With `seed` set in the config the run is reproducible modulo
    /// generator output and wall-clock post ages.
    pub fn new(agents: Vec<Agent>, config: &SimulationConfig) -> Result<Self> {
        if agents.is_empty() {
            return Err(SimError::Config(
                "cannot schedule an empty agent pool".to_string(),
            ));
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            agents,
            tick_interval: Duration::from_secs(config.tick_interval_secs),
            max_ticks: config.max_ticks,
            tick: 0,
            rng,
        })
    }

    /// Current tick number.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Run the loop until the tick limit (if any) or external termination.
    pub async fn run(&mut self) -> Result<()> {
        tracing::info!(
            "Scheduler running: {} agents, {:?} per tick",
            self.agents.len(),
            self.tick_interval
        );

        loop {
            self.step().await;

            if let Some(limit) = self.max_ticks {
                if self.tick >= limit {
                    tracing::info!("Reached tick limit {limit}, stopping");
                    return Ok(());
                }
            }

            sleep(self.tick_interval).await;
        }
    }

    /// Advance one tick: pick an agent uniformly and walk the priority
    /// policy. Public so tests and embedding callers can drive the loop
    /// without wall-clock delays.
    pub async fn step(&mut self) {
        self.tick += 1;
        let tick = self.tick;

        let index = self.rng.gen_range(0..self.agents.len());
        // Split borrow: the agent needs &mut self.agents[i] while the
        // RNG hands out &mut self.rng
        let (agents, rng) = (&mut self.agents, &mut self.rng);
        let agent = &mut agents[index];

        tracing::info!("Tick {tick}: selected {}", agent.name());

        let outcome = agent.comment_on_post(tick, rng).await;
        if outcome.is_performed() {
            return;
        }

        tracing::debug!("{} could not comment, trying a post instead", agent.name());
        let outcome = agent.post(tick, rng).await;
        if outcome.is_performed() {
            return;
        }

        // Neither comment nor post: pick one of the lightweight actions
        let outcome = match rng.gen_range(0..3) {
            0 => agent.send_connection_request(rng).await,
            1 => agent.accept_connection_request(rng).await,
            _ => agent.like_post(rng).await,
        };

        match outcome {
            ActionOutcome::Performed(kind) => {
                tracing::debug!("Tick {tick}: {} performed {kind}", agent.name());
            },
            ActionOutcome::Skipped => {
                tracing::info!("Tick {tick}: {} had nothing to do", agent.name());
            },
            ActionOutcome::Failed => {
                tracing::warn!("Tick {tick}: {} action failed", agent.name());
            },
        }
    }
}
