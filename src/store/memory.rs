//! In-process document store.
//!
//! Collections are plain maps behind a `tokio::sync::RwLock`. The tick
//! loop performs one action at a time, so contention only comes from
//! background enrichment tasks, which write to disjoint records.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::documents::{
    Account, AgentId, Comment, ConnectionEdge, EdgeId, EdgeStatus, Education, Experience, Post,
    PostId, Skill,
};
use super::Store;
use crate::error::{Result, SimError};

#[derive(Default)]
struct Collections {
    accounts: HashMap<AgentId, Account>,
    posts: HashMap<PostId, Post>,
    comments: Vec<Comment>,
    edges: HashMap<EdgeId, ConnectionEdge>,
    experiences: Vec<Experience>,
    skills: Vec<Skill>,
    education: Vec<Education>,
}

/// In-memory [`Store`] implementation.
#[derive(Default, Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<Collections>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of posts currently stored (test/diagnostic helper).
    pub async fn post_count(&self) -> usize {
        self.inner.read().await.posts.len()
    }

    /// Number of comments currently stored (test/diagnostic helper).
    pub async fn comment_count(&self) -> usize {
        self.inner.read().await.comments.len()
    }

    /// Snapshot of all edges (test/diagnostic helper).
    pub async fn all_edges(&self) -> Vec<ConnectionEdge> {
        self.inner.read().await.edges.values().cloned().collect()
    }

    /// Number of experience entries (test/diagnostic helper).
    pub async fn experience_count(&self) -> usize {
        self.inner.read().await.experiences.len()
    }

    /// Number of skill entries (test/diagnostic helper).
    pub async fn skill_count(&self) -> usize {
        self.inner.read().await.skills.len()
    }

    /// Number of education entries (test/diagnostic helper).
    pub async fn education_count(&self) -> usize {
        self.inner.read().await.education.len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_account(&self, account: Account) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.accounts.insert(account.id.clone(), account);
        Ok(())
    }

    async fn get_account(&self, id: &AgentId) -> Result<Option<Account>> {
        Ok(self.inner.read().await.accounts.get(id).cloned())
    }

    async fn list_simulated_accounts(&self) -> Result<Vec<Account>> {
        let inner = self.inner.read().await;
        let mut accounts: Vec<Account> = inner
            .accounts
            .values()
            .filter(|a| a.is_simulated())
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(accounts)
    }

    async fn list_account_ids(&self) -> Result<Vec<AgentId>> {
        Ok(self.inner.read().await.accounts.keys().cloned().collect())
    }

    async fn list_simulated_names(&self) -> Result<Vec<String>> {
        let inner = self.inner.read().await;
        Ok(inner
            .accounts
            .values()
            .filter(|a| a.is_simulated())
            .map(|a| a.name.clone())
            .collect())
    }

    async fn insert_post(&self, post: Post) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.posts.insert(post.id.clone(), post);
        Ok(())
    }

    async fn list_posts_excluding(&self, author: &AgentId) -> Result<Vec<Post>> {
        let inner = self.inner.read().await;
        let mut posts: Vec<Post> = inner
            .posts
            .values()
            .filter(|p| &p.author != author)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn recent_posts_by(&self, author: &AgentId, limit: usize) -> Result<Vec<Post>> {
        let inner = self.inner.read().await;
        let mut posts: Vec<Post> = inner
            .posts
            .values()
            .filter(|p| &p.author == author)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts.truncate(limit);
        Ok(posts)
    }

    async fn increment_likes(&self, post: &PostId) -> Result<()> {
        let mut inner = self.inner.write().await;
        let doc = inner
            .posts
            .get_mut(post)
            .ok_or_else(|| SimError::NotFound(format!("post {post}")))?;
        doc.likes += 1;
        doc.updated_at = Utc::now();
        Ok(())
    }

    async fn increment_comments(&self, post: &PostId) -> Result<()> {
        let mut inner = self.inner.write().await;
        let doc = inner
            .posts
            .get_mut(post)
            .ok_or_else(|| SimError::NotFound(format!("post {post}")))?;
        doc.comments += 1;
        doc.updated_at = Utc::now();
        Ok(())
    }

    async fn get_post(&self, id: &PostId) -> Result<Option<Post>> {
        Ok(self.inner.read().await.posts.get(id).cloned())
    }

    async fn insert_comment(&self, comment: Comment) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.comments.push(comment);
        Ok(())
    }

    async fn comments_for(&self, post: &PostId) -> Result<Vec<Comment>> {
        let inner = self.inner.read().await;
        let mut comments: Vec<Comment> = inner
            .comments
            .iter()
            .filter(|c| &c.post == post)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }

    async fn insert_edge(&self, edge: ConnectionEdge) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.edges.insert(edge.id.clone(), edge);
        Ok(())
    }

    async fn edges_touching(&self, user: &AgentId) -> Result<Vec<ConnectionEdge>> {
        let inner = self.inner.read().await;
        Ok(inner
            .edges
            .values()
            .filter(|e| e.touches(user))
            .cloned()
            .collect())
    }

    async fn pending_edges_to(&self, user: &AgentId) -> Result<Vec<ConnectionEdge>> {
        let inner = self.inner.read().await;
        Ok(inner
            .edges
            .values()
            .filter(|e| &e.to == user && e.status == EdgeStatus::Pending)
            .cloned()
            .collect())
    }

    async fn accept_edge(&self, id: &EdgeId) -> Result<()> {
        let mut inner = self.inner.write().await;
        let edge = inner
            .edges
            .get_mut(id)
            .ok_or_else(|| SimError::NotFound("connection edge".to_string()))?;
        edge.status = EdgeStatus::Accepted;
        edge.updated_at = Utc::now();
        Ok(())
    }

    async fn insert_experience(&self, entry: Experience) -> Result<()> {
        self.inner.write().await.experiences.push(entry);
        Ok(())
    }

    async fn insert_skill(&self, entry: Skill) -> Result<()> {
        self.inner.write().await.skills.push(entry);
        Ok(())
    }

    async fn insert_education(&self, entry: Education) -> Result<()> {
        self.inner.write().await.education.push(entry);
        Ok(())
    }
}
