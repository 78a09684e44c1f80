//! Structured content generation.
//!
//! This module turns a [`ContentRequest`] into validated text via the
//! unreliable external generator, with retry and deterministic fallback:
//!
//! ```text
//!  render prompt ──> generate ──> strip fences ──> parse ──> validate
//!       ^                                                       │
//!       └────────────── retry (fixed backoff) <───── failure ───┘
//!                             │
//!                 retries exhausted
//!                             v
//!                  deterministic fallback
//! ```
//!
//! The pipeline is total: [`ContentPipeline::produce`] always yields a
//! [`ContentResult`], so a stalled or hostile generator can never stall
//! a simulation tick.

mod extract;
mod fallback;
mod pipeline;
mod prompts;
mod request;

pub use extract::{extract_free_text, strip_code_fences, MIN_TEXT_LEN};
pub use pipeline::{ContentPipeline, DEFAULT_BACKOFF};
pub use request::{parse_iso_date, ContentKind, ContentRequest, ContentResult, ShapeDescriptor};
