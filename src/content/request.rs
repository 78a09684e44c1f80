//! Content request and result types.
//!
//! Every generator invocation is described by a [`ContentRequest`] and
//! yields exactly one [`ContentResult`]. The expected response shape is
//! an explicit [`ShapeDescriptor`] per request kind rather than ad hoc
//! key checks, so validation failures are reported uniformly and the
//! retry loop stays shape-agnostic.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use crate::error::{Result, SimError};

/// Kinds of content the pipeline can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// Free-text feed post
    Post,
    /// Free-text comment on a post
    Comment,
    /// Account profile (name, title, bio)
    Profile,
    /// Work-experience entries
    Experience,
    /// Skill entries
    Skill,
    /// Education entries
    Education,
}

impl ContentKind {
    /// Expected response shape for this kind.
    pub fn shape(self) -> ShapeDescriptor {
        match self {
            Self::Post | Self::Comment => ShapeDescriptor {
                expects_array: false,
                min_items: 0,
                required_keys: &["content"],
                date_keys: &[],
                free_text_key: Some("content"),
            },
            Self::Profile => ShapeDescriptor {
                expects_array: false,
                min_items: 0,
                required_keys: &["name", "title", "bio"],
                date_keys: &[],
                free_text_key: None,
            },
            Self::Experience => ShapeDescriptor {
                expects_array: true,
                min_items: 1,
                required_keys: &[
                    "title",
                    "company",
                    "location",
                    "startDate",
                    "current",
                    "description",
                    "employmentType",
                    "industry",
                ],
                date_keys: &["startDate"],
                free_text_key: None,
            },
            Self::Skill => ShapeDescriptor {
                expects_array: true,
                min_items: 3,
                required_keys: &["name", "category"],
                date_keys: &[],
                free_text_key: None,
            },
            Self::Education => ShapeDescriptor {
                expects_array: true,
                min_items: 1,
                required_keys: &["school", "degree", "fieldOfStudy", "startDate", "current"],
                date_keys: &["startDate"],
                free_text_key: None,
            },
        }
    }

    /// Token budget for the generator call.
    pub fn max_tokens(self) -> u32 {
        match self {
            Self::Post => 100,
            Self::Comment => 50,
            Self::Profile => 150,
            Self::Experience | Self::Education => 300,
            Self::Skill => 200,
        }
    }

    /// Whether this kind benefits from a "do not repeat" exclusion list
    /// (kinds that invent people, companies, or schools).
    pub fn uses_exclusions(self) -> bool {
        matches!(self, Self::Profile | Self::Experience | Self::Education)
    }
}

/// Declarative description of the JSON shape expected back from the
/// generator for one [`ContentKind`].
#[derive(Debug, Clone, Copy)]
pub struct ShapeDescriptor {
    /// Top-level value must be an array
    pub expects_array: bool,
    /// Minimum array cardinality (when `expects_array`)
    pub min_items: usize,
    /// Keys every object must carry
    pub required_keys: &'static [&'static str],
    /// Keys holding ISO-8601 dates; malformed dates are validation failures
    pub date_keys: &'static [&'static str],
    /// Single free-text field, for post/comment shapes
    pub free_text_key: Option<&'static str>,
}

impl ShapeDescriptor {
    /// Validate a parsed generator response against this shape.
    pub fn validate(&self, value: &Value) -> Result<()> {
        if self.expects_array {
            let items = value.as_array().ok_or_else(|| {
                SimError::InvalidResponse("expected a JSON array".to_string())
            })?;
            if items.len() < self.min_items {
                return Err(SimError::InvalidResponse(format!(
                    "expected at least {} items, got {}",
                    self.min_items,
                    items.len()
                )));
            }
            for item in items {
                self.validate_object(item)?;
            }
        } else {
            self.validate_object(value)?;
        }
        Ok(())
    }

    fn validate_object(&self, value: &Value) -> Result<()> {
        let obj = value.as_object().ok_or_else(|| {
            SimError::InvalidResponse("expected a JSON object".to_string())
        })?;

        for key in self.required_keys {
            if !obj.contains_key(*key) {
                return Err(SimError::InvalidResponse(format!("missing key {key}")));
            }
        }

        for key in self.date_keys {
            let field = obj.get(*key).and_then(Value::as_str).ok_or_else(|| {
                SimError::InvalidResponse(format!("date field {key} is not a string"))
            })?;
            parse_iso_date(field)?;
        }

        // Nullable end dates still must parse when present
        if let Some(end) = obj.get("endDate") {
            if let Some(s) = end.as_str() {
                parse_iso_date(s)?;
            } else if !end.is_null() {
                return Err(SimError::InvalidResponse(
                    "endDate must be a date string or null".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Parse an ISO-8601 date or datetime string into a UTC timestamp.
///
/// Accepts `YYYY-MM-DD` (midnight UTC) and full RFC 3339 timestamps.
pub fn parse_iso_date(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(|| {
            SimError::InvalidResponse(format!("invalid date {s}"))
        })?;
        return Ok(DateTime::from_naive_utc_and_offset(midnight, Utc));
    }
    let parsed = DateTime::parse_from_rfc3339(s)?;
    Ok(parsed.with_timezone(&Utc))
}

/// An immutable description of one content-generation invocation.
#[derive(Debug, Clone)]
pub struct ContentRequest {
    /// What to produce
    pub kind: ContentKind,
    /// Context fields embedded in the prompt (agent name, title, target
    /// post content, ...)
    pub context: HashMap<String, String>,
    /// Previously generated names the prompt should steer away from
    pub exclusions: Vec<String>,
    /// Generator attempts before falling back
    pub max_retries: u32,
}

impl ContentRequest {
    /// Default number of generator attempts.
    pub const DEFAULT_RETRIES: u32 = 3;

    /// Create a request with empty context and default retries.
    pub fn new(kind: ContentKind) -> Self {
        Self {
            kind,
            context: HashMap::new(),
            exclusions: Vec::new(),
            max_retries: Self::DEFAULT_RETRIES,
        }
    }

    /// Attach a context field.
    pub fn with_context(mut self, key: &str, value: impl Into<String>) -> Self {
        self.context.insert(key.to_string(), value.into());
        self
    }

    /// Attach a "do not repeat" exclusion list.
    pub fn with_exclusions(mut self, exclusions: Vec<String>) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Override the retry budget.
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Context field lookup with an empty-string default.
    pub fn context_field(&self, key: &str) -> &str {
        self.context.get(key).map(String::as_str).unwrap_or("")
    }
}

/// The outcome of one [`ContentRequest`].
///
/// The pipeline is total: every request yields either generator output
/// that passed shape validation, or deterministically synthesized
/// fallback content. Callers never branch on pipeline failure.
#[derive(Debug, Clone)]
pub enum ContentResult {
    /// Generator output that passed shape validation
    Validated(Value),
    /// Deterministically synthesized substitute content
    Fallback(Value),
}

impl ContentResult {
    /// The carried value, regardless of provenance.
    pub fn value(&self) -> &Value {
        match self {
            Self::Validated(v) | Self::Fallback(v) => v,
        }
    }

    /// Consume into the carried value.
    pub fn into_value(self) -> Value {
        match self {
            Self::Validated(v) | Self::Fallback(v) => v,
        }
    }

    /// Whether this result came from the fallback branch.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    /// The free-text body for post/comment shapes.
    pub fn text(&self) -> Option<&str> {
        self.value().get("content").and_then(Value::as_str)
    }

    /// Consume into the free-text body, with a neutral default if the
    /// value carries no `content` field (cannot happen for text kinds
    /// produced by the pipeline).
    pub fn into_text(self) -> String {
        match self.value().get("content").and_then(Value::as_str) {
            Some(text) => text.to_string(),
            None => "Shared an update with the network.".to_string(),
        }
    }
}
