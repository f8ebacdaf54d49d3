//! Resilient multi-backend chat completion routing.
//!
//! A [`ChatRouter`] walks tiers of backends until one serves the
//! request: a load-balanced primary pool, then a fallback pool, then an
//! optional direct backend. Transient faults are retried on the same
//! backend with exponential backoff; permanent faults escalate
//! immediately. Both blocking and streaming execution are supported,
//! and each outcome carries token counts and monetary cost.
//!
//! ```no_run
//! use std::sync::Arc;
//! use vasari_core::{ChatMessage, ChatRequest};
//! use vasari_router::{ChatRouter, RouterConfig, StaticCostResolver, StaticDriverResolver};
//!
//! # async fn run() -> vasari_error::VasariResult<()> {
//! let config = RouterConfig {
//!     backends: vec!["groq".to_string()],
//!     fallback_backends: vec!["openai".to_string()],
//!     ..Default::default()
//! };
//! let router = ChatRouter::new(
//!     config,
//!     Arc::new(StaticDriverResolver::new()),
//!     Arc::new(StaticCostResolver::new()),
//! )?;
//! let outcome = router
//!     .execute(&ChatRequest::new(vec![ChatMessage::user("Hi!")]))
//!     .await;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod classifier;
mod config;
mod dedupe;
mod ordering;
mod outcome;
mod registry;
mod resolver;
mod router;
mod sequencer;

pub use classifier::DefaultFaultClassifier;
pub use config::{RouterConfig, RouterConfigBuilder};
pub use dedupe::DuplicateToolCallFilter;
pub use outcome::{CompletionOutcome, StreamUpdate};
pub use registry::{CostRegistry, DriverRegistry};
pub use resolver::{StaticCostResolver, StaticDriverResolver};
pub use router::ChatRouter;
pub use sequencer::{Attempt, Phase};
