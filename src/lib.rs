//! # Nexus Sim - Social Network Agent Simulator
//!
//! Tick-based simulation engine that populates a professional social
//! network with autonomous agents. Each agent owns an account profile
//! and performs platform actions (posting, commenting, liking,
//! connecting) with LLM-generated content, per-action cooldowns, and a
//! freshness bias when choosing what to engage with.
//!
//! ## Features
//!
//! - **Tick scheduler**: one agent acts per tick, priority-ordered
//!   (comment, then post, then a lightweight action)
//! - **Cooldown gating**: posting and commenting are rate-limited with
//!   randomized per-agent cooldowns resampled after every use
//! - **Recency-weighted targeting**: engagement favors fresh posts via
//!   `1 / (1 + age_hours)` weighting
//! - **Total content pipeline**: prompt rendering, layered salvage of
//!   malformed LLM output, shape validation, bounded retries, and a
//!   deterministic fallback so every request yields usable content
//! - **Profile enrichment**: experience, skills, and education are
//!   generated by background tasks that never block the tick loop
//!
//! ## Architecture
//!
//! ```text
//!                    ┌───────────┐
//!                    │ Scheduler │  one action per tick
//!                    └─────┬─────┘
//!                          │ picks uniformly
//!                          v
//!   ┌───────────────────────────────────────────┐
//!   │ Agent (cooldowns, recent-posts window)    │
//!   │   comment > post > like/connect/accept    │
//!   └───────┬──────────────────────────┬────────┘
//!           │ content                  │ reads/writes
//!           v                          v
//!   ┌───────────────────┐      ┌──────────────┐
//!   │ ContentPipeline   │      │ Store        │
//!   │  prompt → LLM →   │      │ (accounts,   │
//!   │  salvage/validate │      │  posts,      │
//!   │  → retry →        │      │  comments,   │
//!   │  fallback         │      │  edges, ...) │
//!   └────────┬──────────┘      └──────────────┘
//!            v
//!   ┌───────────────────┐
//!   │ TextGenerator     │  Ollama HTTP, or scripted test doubles
//!   └───────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use nexus_sim::config::Config;
//! use nexus_sim::content::ContentPipeline;
//! use nexus_sim::generator::OllamaGenerator;
//! use nexus_sim::sim::{Agent, Scheduler};
//! use nexus_sim::store::{MemoryStore, Store};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
//!     let generator = Arc::new(OllamaGenerator::new(&config.generator)?);
//!     let pipeline = ContentPipeline::new(generator);
//!
//!     let accounts = nexus_sim::accounts::get_or_create_accounts(
//!         &store,
//!         &pipeline,
//!         config.simulation.num_agents,
//!     )
//!     .await?;
//!
//!     let mut agents = Vec::new();
//!     for account in accounts {
//!         agents.push(Agent::hydrate(account, Arc::clone(&store), pipeline.clone()).await);
//!     }
//!
//!     Scheduler::new(agents, &config.simulation)?.run().await?;
//!     Ok(())
//! }
//! ```

pub mod accounts;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod sim;
pub mod store;

pub use config::Config;
pub use content::{ContentKind, ContentPipeline, ContentRequest, ContentResult};
pub use error::{Result, SimError};
pub use generator::{OllamaGenerator, TextGenerator};
pub use sim::{ActionKind, ActionOutcome, Agent, Scheduler};
pub use store::{Account, MemoryStore, Post, Store};

/// Crate version, surfaced in the CLI banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
