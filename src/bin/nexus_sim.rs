//! Nexus Sim CLI binary.
//!
//! Boots the store, the content pipeline, and the agent pool, then runs
//! the tick loop until the optional tick limit or Ctrl-C.
//!
//! Configuration layering, lowest to highest precedence: built-in
//! defaults, config file (`--config`), `NEXUS_*` environment variables,
//! command-line flags.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use nexus_sim::accounts::{get_or_create_accounts, spawn_profile_enrichment};
use nexus_sim::config::Config;
use nexus_sim::content::ContentPipeline;
use nexus_sim::generator::{OllamaGenerator, StaticGenerator, TextGenerator};
use nexus_sim::sim::{Agent, Scheduler};
use nexus_sim::store::{MemoryStore, Store};
use nexus_sim::VERSION;

#[derive(Parser)]
#[command(name = "nexus-sim")]
#[command(version = VERSION)]
#[command(about = "Social network agent simulator", long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seconds between ticks
    #[arg(short, long)]
    tick_interval: Option<u64>,

    /// Number of simulated agents
    #[arg(short = 'n', long)]
    agents: Option<usize>,

    /// Generator base URL (e.g. http://localhost:11434)
    #[arg(long)]
    generator_url: Option<String>,

    /// Generator model name
    #[arg(short, long)]
    model: Option<String>,

    /// Random seed for reproducible runs
    #[arg(short, long)]
    seed: Option<u64>,

    /// Stop after this many ticks
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Run against a canned generator instead of a live LLM
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    tracing::info!("Nexus Sim v{VERSION}");

    let config = build_config(&cli)?;
    tracing::info!(
        "Config: {} agents, {}s tick, model {}",
        config.simulation.num_agents,
        config.simulation.tick_interval_secs,
        config.generator.model
    );

    let generator: Arc<dyn TextGenerator> = if cli.dry_run {
        tracing::warn!("Dry run: content will come from canned fallbacks");
        Arc::new(StaticGenerator::fixed("not json"))
    } else {
        let ollama = OllamaGenerator::new(&config.generator)?;
        ollama.ensure_model_available().await?;
        Arc::new(ollama)
    };

    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let pipeline = ContentPipeline::new(generator)
        .with_backoff(std::time::Duration::from_millis(config.generator.retry_backoff_ms))
        .with_max_retries(config.generator.max_retries);

    let accounts =
        get_or_create_accounts(&store, &pipeline, config.simulation.num_agents).await?;

    // Experience/skills/education fill in behind the tick loop
    spawn_profile_enrichment(Arc::clone(&store), pipeline.clone(), accounts.clone());

    let mut agents = Vec::with_capacity(accounts.len());
    for account in accounts {
        agents.push(Agent::hydrate(account, Arc::clone(&store), pipeline.clone()).await);
    }

    let mut scheduler = Scheduler::new(agents, &config.simulation)?;

    tokio::select! {
        result = scheduler.run() => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received Ctrl-C, shutting down");
        },
    }

    Ok(())
}

/// Layer the config sources: defaults, file, environment, CLI flags.
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let base = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let mut config = base.merge(Config::from_env());

    if let Some(secs) = cli.tick_interval {
        config.simulation.tick_interval_secs = secs;
    }
    if let Some(n) = cli.agents {
        config.simulation.num_agents = n;
    }
    if let Some(seed) = cli.seed {
        config.simulation.seed = Some(seed);
    }
    if let Some(limit) = cli.max_ticks {
        config.simulation.max_ticks = Some(limit);
    }
    if let Some(url) = &cli.generator_url {
        config.generator.url = url.clone();
    }
    if let Some(model) = &cli.model {
        config.generator.model = model.clone();
    }

    Ok(config)
}
