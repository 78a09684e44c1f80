//! End-to-end action engine tests.
//!
//! These tests drive agents and the scheduler against a real
//! [`MemoryStore`] with scripted generators, verifying the engine
//! invariants beyond the unit test level: comment and counter flow,
//! generator failure ending in fallback content, connection edge
//! uniqueness, and cooldown gating across ticks.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use nexus_sim::config::SimulationConfig;
use nexus_sim::content::ContentPipeline;
use nexus_sim::generator::{FailingGenerator, StaticGenerator, TextGenerator};
use nexus_sim::sim::{ActionKind, ActionOutcome, Agent, Scheduler};
use nexus_sim::store::{Account, AgentId, EdgeStatus, MemoryStore, Post, Store};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn account(name: &str, title: &str) -> Account {
    let now = Utc::now();
    Account {
        id: AgentId::random(),
        sub: format!("sim-{}", name.len() * 7919),
        username: name.to_lowercase().replace(' ', ""),
        name: name.to_string(),
        title: title.to_string(),
        bio: format!("{title} who enjoys their work."),
        avatar_url: "https://i.pravatar.cc/150?u=1".to_string(),
        created_at: now,
        updated_at: now,
    }
}

fn pipeline_over(generator: Arc<dyn TextGenerator>) -> ContentPipeline {
    ContentPipeline::new(generator).with_backoff(Duration::ZERO)
}

async fn seeded_store(accounts: &[Account]) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    for account in accounts {
        store.insert_account(account.clone()).await.unwrap();
    }
    store
}

/// An agent comments on another agent's aged post and the post's
/// comment counter moves from 0 to 1.
#[tokio::test]
async fn test_comment_flow_end_to_end() {
    let alice = account("Alice Wu", "Data Engineer");
    let bob = account("Bob Mensah", "Recruiter");
    let carol = account("Carol Diaz", "Designer");
    let store = seeded_store(&[alice.clone(), bob.clone(), carol.clone()]).await;

    let post = Post::new(
        bob.id.clone(),
        "Excited to share that our team shipped a new hiring pipeline.".to_string(),
        Utc::now() - chrono::Duration::hours(10),
    );
    let post_id = post.id.clone();
    store.insert_post(post).await.unwrap();

    let generator = Arc::new(StaticGenerator::fixed(
        r#"{"content": "Congratulations to the whole team, great milestone!"}"#,
    ));
    let pipeline = pipeline_over(generator);
    let dyn_store: Arc<dyn Store> = store.clone();

    let mut agent = Agent::hydrate(alice.clone(), dyn_store.clone(), pipeline).await;
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let outcome = agent.comment_on_post(1, &mut rng).await;
    assert_eq!(outcome, ActionOutcome::Performed(ActionKind::Comment));

    let thread = dyn_store.comments_for(&post_id).await.unwrap();
    assert_eq!(thread.len(), 1);
    assert_eq!(thread[0].author, alice.id);
    assert!(thread[0].content.contains("Congratulations"));

    let stored = dyn_store.get_post(&post_id).await.unwrap().unwrap();
    assert_eq!(stored.comments, 1);
}

/// An agent never comments on its own posts; with only its own content
/// in the feed the action is skipped, not performed.
#[tokio::test]
async fn test_never_comments_on_own_post() {
    let alice = account("Alice Wu", "Data Engineer");
    let store = seeded_store(&[alice.clone()]).await;

    let own = Post::new(alice.id.clone(), "My own update.".to_string(), Utc::now());
    store.insert_post(own).await.unwrap();

    let pipeline = pipeline_over(Arc::new(StaticGenerator::fixed(
        r#"{"content": "Should never be used by this test."}"#,
    )));
    let mut agent = Agent::hydrate(alice, store.clone(), pipeline).await;
    let mut rng = ChaCha8Rng::seed_from_u64(2);

    assert_eq!(agent.comment_on_post(1, &mut rng).await, ActionOutcome::Skipped);
    assert_eq!(store.comment_count().await, 0);
}

/// A dead generator still yields a post: the pipeline makes exactly the
/// retry-budget number of calls, then a fallback post lands in the store.
#[tokio::test]
async fn test_generator_failure_ends_in_fallback_post() {
    let alice = account("Alice Wu", "Data Engineer");
    let store = seeded_store(&[alice.clone()]).await;

    let generator = Arc::new(FailingGenerator::new());
    let pipeline = pipeline_over(generator.clone());
    let mut agent = Agent::hydrate(alice.clone(), store.clone(), pipeline).await;
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    let outcome = agent.post(1, &mut rng).await;
    assert_eq!(outcome, ActionOutcome::Performed(ActionKind::Post));
    assert_eq!(generator.calls(), 3);

    assert_eq!(store.post_count().await, 1);
    let posts = store.recent_posts_by(&alice.id, 5).await.unwrap();
    assert!(!posts[0].content.is_empty());
}

/// Posting starts a cooldown: a second attempt on the next tick is
/// skipped and writes nothing.
#[tokio::test]
async fn test_post_cooldown_gates_next_attempt() {
    let alice = account("Alice Wu", "Data Engineer");
    let store = seeded_store(&[alice.clone()]).await;

    let pipeline = pipeline_over(Arc::new(StaticGenerator::fixed(
        r#"{"content": "A thoughtful update on data pipelines."}"#,
    )));
    let mut agent = Agent::hydrate(alice, store.clone(), pipeline).await;
    let mut rng = ChaCha8Rng::seed_from_u64(4);

    assert!(agent.post(1, &mut rng).await.is_performed());
    // Minimum post cooldown is 5 ticks, so tick 2 is always too early
    assert_eq!(agent.post(2, &mut rng).await, ActionOutcome::Skipped);
    assert_eq!(store.post_count().await, 1);
}

/// Connection requests never target self and never duplicate an
/// existing edge in either direction; an exhausted pool skips.
#[tokio::test]
async fn test_connection_edges_are_unique_and_never_self() {
    let alice = account("Alice Wu", "Data Engineer");
    let bob = account("Bob Mensah", "Recruiter");
    let carol = account("Carol Diaz", "Designer");
    let store = seeded_store(&[alice.clone(), bob.clone(), carol.clone()]).await;

    let pipeline = pipeline_over(Arc::new(StaticGenerator::fixed("{}")));
    let mut agent = Agent::hydrate(alice.clone(), store.clone(), pipeline).await;
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    assert!(agent.send_connection_request(&mut rng).await.is_performed());
    assert!(agent.send_connection_request(&mut rng).await.is_performed());
    // Both other users now have an edge with Alice
    assert_eq!(
        agent.send_connection_request(&mut rng).await,
        ActionOutcome::Skipped
    );

    let edges = store.all_edges().await;
    assert_eq!(edges.len(), 2);
    for edge in &edges {
        assert_ne!(edge.from, edge.to);
        assert_eq!(edge.from, alice.id);
    }
    let targets: std::collections::HashSet<_> = edges.iter().map(|e| e.to.clone()).collect();
    assert_eq!(targets.len(), 2);
}

/// Accepting a pending request flips the edge to accepted.
#[tokio::test]
async fn test_accept_connection_request() {
    let alice = account("Alice Wu", "Data Engineer");
    let bob = account("Bob Mensah", "Recruiter");
    let store = seeded_store(&[alice.clone(), bob.clone()]).await;

    let pipeline = pipeline_over(Arc::new(StaticGenerator::fixed("{}")));
    let mut sender = Agent::hydrate(alice.clone(), store.clone(), pipeline.clone()).await;
    let mut receiver = Agent::hydrate(bob.clone(), store.clone(), pipeline).await;
    let mut rng = ChaCha8Rng::seed_from_u64(6);

    assert!(sender.send_connection_request(&mut rng).await.is_performed());
    assert_eq!(
        receiver.accept_connection_request(&mut rng).await,
        ActionOutcome::Performed(ActionKind::ConnectAccept)
    );

    let edges = store.all_edges().await;
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].status, EdgeStatus::Accepted);

    // Nothing left to accept
    assert_eq!(
        receiver.accept_connection_request(&mut rng).await,
        ActionOutcome::Skipped
    );
}

/// Liking bumps the post's like counter without creating documents.
#[tokio::test]
async fn test_like_increments_counter() {
    let alice = account("Alice Wu", "Data Engineer");
    let bob = account("Bob Mensah", "Recruiter");
    let store = seeded_store(&[alice.clone(), bob.clone()]).await;

    let post = Post::new(bob.id.clone(), "Hiring!".to_string(), Utc::now());
    let post_id = post.id.clone();
    store.insert_post(post).await.unwrap();

    let pipeline = pipeline_over(Arc::new(StaticGenerator::fixed("{}")));
    let mut agent = Agent::hydrate(alice, store.clone(), pipeline).await;
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    assert_eq!(
        agent.like_post(&mut rng).await,
        ActionOutcome::Performed(ActionKind::Like)
    );
    let stored = store.get_post(&post_id).await.unwrap().unwrap();
    assert_eq!(stored.likes, 1);
    assert_eq!(store.comment_count().await, 0);
}

/// A seeded scheduler drives an agent pool forward and produces
/// activity within a handful of ticks; fresh agents are immediately
/// eligible to act.
#[tokio::test]
async fn test_scheduler_steps_produce_activity() {
    let accounts = vec![
        account("Alice Wu", "Data Engineer"),
        account("Bob Mensah", "Recruiter"),
        account("Carol Diaz", "Designer"),
    ];
    let store = seeded_store(&accounts).await;
    let pipeline = pipeline_over(Arc::new(StaticGenerator::fixed(
        r#"{"content": "Sharing some thoughts on collaboration today."}"#,
    )));

    let mut agents = Vec::new();
    for acct in &accounts {
        let dyn_store: Arc<dyn Store> = store.clone();
        agents.push(Agent::hydrate(acct.clone(), dyn_store, pipeline.clone()).await);
    }

    let config = SimulationConfig {
        tick_interval_secs: 1,
        num_agents: 3,
        max_ticks: Some(10),
        seed: Some(99),
    };
    let mut scheduler = Scheduler::new(agents, &config).unwrap();

    for _ in 0..10 {
        scheduler.step().await;
    }

    assert_eq!(scheduler.tick(), 10);
    // Nobody starts on cooldown, so the empty feed forces first posts
    // and later ticks comment on them
    let activity = store.post_count().await + store.comment_count().await;
    assert!(activity > 0, "ten ticks produced no posts or comments");
}

/// An empty agent pool is a configuration error, not a silent no-op.
#[tokio::test]
async fn test_scheduler_rejects_empty_pool() {
    let config = SimulationConfig {
        tick_interval_secs: 1,
        num_agents: 0,
        max_ticks: None,
        seed: None,
    };
    assert!(Scheduler::new(Vec::new(), &config).is_err());
}
