//! Agent action methods.
//!
//! One method per [`ActionKind`], each performing at most one
//! externally visible persistence write. Candidate filtering enforces
//! the engine invariants by construction: an agent never targets its
//! own posts, never threads under its own latest comment, and never
//! opens a duplicate connection edge.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;

use super::cooldown::{ActionKind, CooldownTracker};
use super::selector::select_by_recency;
use crate::content::{ContentKind, ContentPipeline, ContentRequest};
use crate::store::{Account, AgentId, Comment, ConnectionEdge, Post, Store};

/// Size of the recent-posts window used for style continuity.
const RECENT_POSTS_WINDOW: usize = 3;

/// What happened when an agent was asked to act.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The action completed and wrote to the store.
    Performed(ActionKind),
    /// Nothing eligible (cooldown not elapsed, or no valid target).
    /// A normal outcome, handled by the scheduler's priority policy.
    Skipped,
    /// A persistence write failed; logged, retried naturally next tick.
    Failed,
}

impl ActionOutcome {
    /// Whether the action completed.
    pub fn is_performed(&self) -> bool {
        matches!(self, Self::Performed(_))
    }
}

/// A simulated account capable of performing platform actions.
pub struct Agent {
    profile: Account,
    recent_posts: Vec<Post>,
    cooldowns: CooldownTracker,
    store: Arc<dyn Store>,
    pipeline: ContentPipeline,
}

impl Agent {
    /// Build an agent and load its recent-posts window from the store.
    pub async fn hydrate(
        profile: Account,
        store: Arc<dyn Store>,
        pipeline: ContentPipeline,
    ) -> Self {
        let recent_posts = store
            .recent_posts_by(&profile.id, RECENT_POSTS_WINDOW)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("{}: failed to load recent posts: {e}", profile.name);
                Vec::new()
            });

        Self {
            profile,
            recent_posts,
            cooldowns: CooldownTracker::new(),
            store,
            pipeline,
        }
    }

    /// The agent's account id.
    pub fn id(&self) -> &AgentId {
        &self.profile.id
    }

    /// The agent's display name.
    pub fn name(&self) -> &str {
        &self.profile.name
    }

    /// Create a new post, gated by the Post cooldown.
    pub async fn post(&mut self, tick: u64, rng: &mut (impl Rng + Send)) -> ActionOutcome {
        if !self.cooldowns.ready(ActionKind::Post, tick) {
            tracing::debug!(
                "{} is on post cooldown ({} ticks remaining)",
                self.profile.name,
                self.cooldowns.remaining(ActionKind::Post, tick)
            );
            return ActionOutcome::Skipped;
        }

        let recent = self
            .recent_posts
            .iter()
            .map(|p| format!("- {}\n", p.content))
            .collect::<String>();

        let request = ContentRequest::new(ContentKind::Post)
            .with_context("name", &self.profile.name)
            .with_context("title", &self.profile.title)
            .with_context("bio", &self.profile.bio)
            .with_context("recent_posts", recent);

        let content = self.pipeline.produce(&request).await.into_text();
        let post = Post::new(self.profile.id.clone(), content, Utc::now());
        let preview: String = post.content.chars().take(30).collect();

        if let Err(e) = self.store.insert_post(post.clone()).await {
            tracing::error!("{} failed to create post: {e}", self.profile.name);
            return ActionOutcome::Failed;
        }

        tracing::info!("{} created a post: {preview}...", self.profile.name);

        self.recent_posts.insert(0, post);
        self.recent_posts.truncate(RECENT_POSTS_WINDOW);
        self.cooldowns.consume(ActionKind::Post, tick, rng);
        ActionOutcome::Performed(ActionKind::Post)
    }

    /// Comment on another agent's post, favoring fresher posts.
    pub async fn comment_on_post(
        &mut self,
        tick: u64,
        rng: &mut (impl Rng + Send),
    ) -> ActionOutcome {
        if !self.cooldowns.ready(ActionKind::Comment, tick) {
            tracing::debug!(
                "{} is on comment cooldown ({} ticks remaining)",
                self.profile.name,
                self.cooldowns.remaining(ActionKind::Comment, tick)
            );
            return ActionOutcome::Skipped;
        }

        let candidates = match self.store.list_posts_excluding(&self.profile.id).await {
            Ok(posts) => posts,
            Err(e) => {
                tracing::error!("{} failed to list posts: {e}", self.profile.name);
                return ActionOutcome::Failed;
            },
        };

        // Drop posts where this agent is already the most recent commenter
        let mut eligible = Vec::with_capacity(candidates.len());
        for post in candidates {
            match self.store.comments_for(&post.id).await {
                Ok(thread) => {
                    let last_is_me = thread
                        .last()
                        .map(|c| c.author == self.profile.id)
                        .unwrap_or(false);
                    if !last_is_me {
                        eligible.push(post);
                    }
                },
                Err(e) => {
                    tracing::error!("{} failed to load comments: {e}", self.profile.name);
                    return ActionOutcome::Failed;
                },
            }
        }

        if eligible.is_empty() {
            tracing::debug!("{} found no posts to comment on", self.profile.name);
            return ActionOutcome::Skipped;
        }

        let now = Utc::now();
        let target = match select_by_recency(&eligible, now, rng) {
            Ok(post) => post.clone(),
            Err(e) => {
                // Unreachable given the emptiness check above
                tracing::error!("{} selection failed: {e}", self.profile.name);
                return ActionOutcome::Skipped;
            },
        };

        let author = self
            .store
            .get_account(&target.author)
            .await
            .ok()
            .flatten();
        let (author_name, author_title, author_bio) = match &author {
            Some(a) => (a.name.clone(), a.title.clone(), a.bio.clone()),
            None => ("Unknown".to_string(), String::new(), String::new()),
        };

        let thread = match self.store.comments_for(&target.id).await {
            Ok(comments) => {
                let mut lines = String::new();
                for comment in &comments {
                    let commenter = self
                        .store
                        .get_account(&comment.author)
                        .await
                        .ok()
                        .flatten()
                        .map(|a| a.name)
                        .unwrap_or_else(|| "Unknown".to_string());
                    lines.push_str(&format!("- {}: {}\n", commenter, comment.content));
                }
                lines
            },
            Err(_) => String::new(),
        };

        let request = ContentRequest::new(ContentKind::Comment)
            .with_context("name", &self.profile.name)
            .with_context("title", &self.profile.title)
            .with_context("bio", &self.profile.bio)
            .with_context("post_content", &target.content)
            .with_context("post_author_name", author_name)
            .with_context("post_author_title", author_title)
            .with_context("post_author_bio", author_bio)
            .with_context("thread", thread);

        let content = self.pipeline.produce(&request).await.into_text();
        let preview: String = content.chars().take(20).collect();
        let comment = Comment::new(target.id.clone(), self.profile.id.clone(), content, now);

        if let Err(e) = self.store.insert_comment(comment).await {
            tracing::error!("{} failed to comment: {e}", self.profile.name);
            return ActionOutcome::Failed;
        }
        if let Err(e) = self.store.increment_comments(&target.id).await {
            tracing::error!("{} failed to bump comment counter: {e}", self.profile.name);
            return ActionOutcome::Failed;
        }

        tracing::info!("{} commented on a post: {preview}...", self.profile.name);
        self.cooldowns.consume(ActionKind::Comment, tick, rng);
        ActionOutcome::Performed(ActionKind::Comment)
    }

    /// Like a uniformly chosen post by someone else. No cooldown.
    pub async fn like_post(&mut self, rng: &mut (impl Rng + Send)) -> ActionOutcome {
        let candidates = match self.store.list_posts_excluding(&self.profile.id).await {
            Ok(posts) => posts,
            Err(e) => {
                tracing::error!("{} failed to list posts: {e}", self.profile.name);
                return ActionOutcome::Failed;
            },
        };

        let Some(post) = candidates.choose(rng) else {
            tracing::debug!("{} found no posts to like", self.profile.name);
            return ActionOutcome::Skipped;
        };

        if let Err(e) = self.store.increment_likes(&post.id).await {
            tracing::error!("{} failed to like a post: {e}", self.profile.name);
            return ActionOutcome::Failed;
        }

        tracing::info!("{} liked a post", self.profile.name);
        ActionOutcome::Performed(ActionKind::Like)
    }

    /// Send a connection request to a uniformly chosen unconnected user.
    pub async fn send_connection_request(
        &mut self,
        rng: &mut (impl Rng + Send),
    ) -> ActionOutcome {
        let edges = match self.store.edges_touching(&self.profile.id).await {
            Ok(edges) => edges,
            Err(e) => {
                tracing::error!("{} failed to list edges: {e}", self.profile.name);
                return ActionOutcome::Failed;
            },
        };

        // Anyone already on a pending or accepted edge is out, plus self
        let mut excluded: HashSet<AgentId> = edges
            .iter()
            .filter_map(|e| e.other_end(&self.profile.id).cloned())
            .collect();
        excluded.insert(self.profile.id.clone());

        let all_ids = match self.store.list_account_ids().await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!("{} failed to list accounts: {e}", self.profile.name);
                return ActionOutcome::Failed;
            },
        };
        let eligible: Vec<AgentId> = all_ids
            .into_iter()
            .filter(|id| !excluded.contains(id))
            .collect();

        let Some(target) = eligible.choose(rng) else {
            tracing::debug!("{} has no more users to connect with", self.profile.name);
            return ActionOutcome::Skipped;
        };

        let edge = ConnectionEdge::pending(self.profile.id.clone(), target.clone(), Utc::now());
        if let Err(e) = self.store.insert_edge(edge).await {
            tracing::error!("{} failed to send connection request: {e}", self.profile.name);
            return ActionOutcome::Failed;
        }

        tracing::info!("{} sent a connection request to {target}", self.profile.name);
        ActionOutcome::Performed(ActionKind::ConnectRequest)
    }

    /// Accept a uniformly chosen pending inbound connection request.
    pub async fn accept_connection_request(
        &mut self,
        rng: &mut (impl Rng + Send),
    ) -> ActionOutcome {
        let pending = match self.store.pending_edges_to(&self.profile.id).await {
            Ok(edges) => edges,
            Err(e) => {
                tracing::error!("{} failed to list pending requests: {e}", self.profile.name);
                return ActionOutcome::Failed;
            },
        };

        let Some(request) = pending.choose(rng) else {
            tracing::debug!("{} has no pending connection requests", self.profile.name);
            return ActionOutcome::Skipped;
        };

        if let Err(e) = self.store.accept_edge(&request.id).await {
            tracing::error!("{} failed to accept request: {e}", self.profile.name);
            return ActionOutcome::Failed;
        }

        tracing::info!(
            "{} accepted a connection request from {}",
            self.profile.name,
            request.from
        );
        ActionOutcome::Performed(ActionKind::ConnectAccept)
    }
}
