//! Persistence layer abstraction.
//!
//! The simulation core never talks to a database directly; it issues
//! narrow find/insert/update operations against the [`Store`] trait,
//! scoped to single documents or simple equality/membership filters.
//! No transactions span collections.
//!
//! [`MemoryStore`] is the in-process implementation used by the binary
//! and the test suite; a real document-database driver would implement
//! the same trait.

mod documents;
mod memory;

pub use documents::{
    Account, AgentId, Comment, CommentId, ConnectionEdge, EdgeId, EdgeStatus, Education,
    Experience, Post, PostId, Skill,
};
pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::error::Result;

/// Document store contract used by the action engine.
///
/// Implementations must treat each method as a single-document (or
/// single-filter) operation; callers never rely on cross-collection
/// atomicity.
#[async_trait]
pub trait Store: Send + Sync {
    // --- accounts ---

    /// Insert a new account document.
    async fn insert_account(&self, account: Account) -> Result<()>;

    /// Fetch one account by id.
    async fn get_account(&self, id: &AgentId) -> Result<Option<Account>>;

    /// All accounts created by the simulator (`sim-` sub marker).
    async fn list_simulated_accounts(&self) -> Result<Vec<Account>>;

    /// All account ids, simulated or not.
    async fn list_account_ids(&self) -> Result<Vec<AgentId>>;

    /// Display names of all simulated accounts (exclusion-list input).
    async fn list_simulated_names(&self) -> Result<Vec<String>>;

    // --- posts ---

    /// Insert a new post document.
    async fn insert_post(&self, post: Post) -> Result<()>;

    /// Posts not authored by `author`, newest first.
    async fn list_posts_excluding(&self, author: &AgentId) -> Result<Vec<Post>>;

    /// Most recent posts by `author`, newest first, up to `limit`.
    async fn recent_posts_by(&self, author: &AgentId, limit: usize) -> Result<Vec<Post>>;

    /// Increment a post's like counter.
    async fn increment_likes(&self, post: &PostId) -> Result<()>;

    /// Increment a post's comment counter.
    async fn increment_comments(&self, post: &PostId) -> Result<()>;

    /// Fetch one post by id.
    async fn get_post(&self, id: &PostId) -> Result<Option<Post>>;

    // --- comments ---

    /// Insert a new comment document.
    async fn insert_comment(&self, comment: Comment) -> Result<()>;

    /// Comments on a post, oldest first.
    async fn comments_for(&self, post: &PostId) -> Result<Vec<Comment>>;

    // --- connection edges ---

    /// Insert a new edge document.
    async fn insert_edge(&self, edge: ConnectionEdge) -> Result<()>;

    /// Edges with `user` as either endpoint, any status.
    async fn edges_touching(&self, user: &AgentId) -> Result<Vec<ConnectionEdge>>;

    /// Pending edges whose `to` endpoint is `user`.
    async fn pending_edges_to(&self, user: &AgentId) -> Result<Vec<ConnectionEdge>>;

    /// Transition an edge from pending to accepted.
    async fn accept_edge(&self, id: &EdgeId) -> Result<()>;

    // --- profile sub-entities ---

    /// Insert a work-experience entry.
    async fn insert_experience(&self, entry: Experience) -> Result<()>;

    /// Insert a skill entry.
    async fn insert_skill(&self, entry: Skill) -> Result<()>;

    /// Insert an education entry.
    async fn insert_education(&self, entry: Education) -> Result<()>;
}
