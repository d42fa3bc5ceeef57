//! # wp-ai
//!
//! Generative model access for Waypoint.
//!
//! - [`GenerativeModel`]: the text-in, text-out seam, implemented by
//!   [`GeminiClient`] and [`DisabledModel`]
//! - [`resilient`]: rate-limit retry with backoff, then a caller-supplied
//!   fallback, returning a tagged [`Outcome`]
//! - [`analysis`]: career analysis prompt, response parsing, and the
//!   rule-based fallback analysis
//! - [`chat`]: context snapshot, history window, and assistant replies

pub mod analysis;
pub mod chat;
pub mod error;
pub mod gemini;
mod http;
pub mod model;
pub mod resilient;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use analysis::AnalysisGenerator;
pub use chat::ChatResponder;
pub use error::AiError;
pub use gemini::GeminiClient;
pub use model::{ConfiguredModel, DisabledModel, GenerativeModel};
pub use resilient::{Outcome, RetryPolicy};
