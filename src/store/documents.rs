//! Document types for the persistence collections.
//!
//! These mirror a document-oriented store: each struct is one document,
//! keyed by an opaque id, with `created_at`/`updated_at` timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque identifier for a simulated account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(pub String);

impl AgentId {
    /// Generate a fresh random id.
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Borrow the raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier for a post document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostId(pub String);

impl PostId {
    /// Generate a fresh random id.
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier for a comment document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommentId(pub String);

impl CommentId {
    /// Generate a fresh random id.
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

/// Opaque identifier for a connection edge document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub String);

impl EdgeId {
    /// Generate a fresh random id.
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

/// A simulated account profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Account id
    pub id: AgentId,
    /// Subject marker; simulated accounts carry a `sim-` prefix
    pub sub: String,
    /// Login-style handle derived from the display name
    pub username: String,
    /// Display name
    pub name: String,
    /// Professional headline
    pub title: String,
    /// Short bio
    pub bio: String,
    /// Avatar image URL
    pub avatar_url: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Whether this account was created by the simulator.
    pub fn is_simulated(&self) -> bool {
        self.sub.starts_with("sim-")
    }
}

/// A feed post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Post id
    pub id: PostId,
    /// Author account id
    pub author: AgentId,
    /// Post body
    pub content: String,
    /// Like counter
    pub likes: u64,
    /// Comment counter
    pub comments: u64,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Build a new post authored now.
    pub fn new(author: AgentId, content: String, now: DateTime<Utc>) -> Self {
        Self {
            id: PostId::random(),
            author,
            content,
            likes: 0,
            comments: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Age of the post at `now`, in fractional hours. Clamped to zero for
    /// posts stamped in the future (clock skew between writers).
    pub fn age_hours(&self, now: DateTime<Utc>) -> f64 {
        let secs = (now - self.created_at).num_milliseconds() as f64 / 1000.0;
        (secs / 3600.0).max(0.0)
    }
}

/// A comment on a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Comment id
    pub id: CommentId,
    /// Parent post id
    pub post: PostId,
    /// Author account id
    pub author: AgentId,
    /// Comment body
    pub content: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Build a new comment authored now.
    pub fn new(post: PostId, author: AgentId, content: String, now: DateTime<Utc>) -> Self {
        Self {
            id: CommentId::random(),
            post,
            author,
            content,
            created_at: now,
        }
    }
}

/// Connection edge status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStatus {
    /// Request sent, not yet accepted
    Pending,
    /// Request accepted by the `to` party
    Accepted,
}

/// A connection between two accounts.
///
/// At most one pending-or-accepted edge may exist per unordered
/// `(from, to)` pair; candidate filtering in the agent enforces this
/// before insertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionEdge {
    /// Edge id
    pub id: EdgeId,
    /// Requesting account
    pub from: AgentId,
    /// Receiving account
    pub to: AgentId,
    /// Current status
    pub status: EdgeStatus,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
}

impl ConnectionEdge {
    /// Build a new pending edge.
    pub fn pending(from: AgentId, to: AgentId, now: DateTime<Utc>) -> Self {
        Self {
            id: EdgeId::random(),
            from,
            to,
            status: EdgeStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the edge touches the given account (either direction).
    pub fn touches(&self, id: &AgentId) -> bool {
        &self.from == id || &self.to == id
    }

    /// The account on the other end of the edge, if `id` is an endpoint.
    pub fn other_end(&self, id: &AgentId) -> Option<&AgentId> {
        if &self.from == id {
            Some(&self.to)
        } else if &self.to == id {
            Some(&self.from)
        } else {
            None
        }
    }
}

/// A work-experience profile entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experience {
    /// Owning account id
    pub user: AgentId,
    /// Job title
    pub title: String,
    /// Company name
    pub company: String,
    /// City, country
    pub location: String,
    /// Start date
    pub start_date: DateTime<Utc>,
    /// End date, `None` while current
    pub end_date: Option<DateTime<Utc>>,
    /// Whether this is the current role
    pub current: bool,
    /// Role description
    pub description: String,
    /// Full-time, Part-time, Contract, ...
    pub employment_type: String,
    /// Industry sector
    pub industry: String,
}

/// A skill profile entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    /// Owning account id
    pub user: AgentId,
    /// Skill name
    pub name: String,
    /// Category (tools, languages, soft skills, ...)
    pub category: String,
    /// Endorsement count
    pub endorsements: u32,
}

/// An education profile entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Education {
    /// Owning account id
    pub user: AgentId,
    /// Institution name
    pub school: String,
    /// Degree type
    pub degree: String,
    /// Field of study
    pub field_of_study: String,
    /// Start date
    pub start_date: DateTime<Utc>,
    /// End date, `None` while current
    pub end_date: Option<DateTime<Utc>>,
    /// Whether currently enrolled
    pub current: bool,
    /// Optional grade or GPA
    pub grade: Option<String>,
    /// Optional extracurricular activities
    pub activities: Option<String>,
    /// Optional free-form description
    pub description: Option<String>,
}
