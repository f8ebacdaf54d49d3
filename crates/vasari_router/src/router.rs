//! The chat router.

use crate::classifier::DefaultFaultClassifier;
use crate::config::RouterConfig;
use crate::dedupe::DuplicateToolCallFilter;
use crate::ordering;
use crate::outcome::{CompletionOutcome, StreamUpdate};
use crate::registry::{CostRegistry, DriverRegistry};
use crate::sequencer::{Attempt, AttemptSequencer, FallbackPool};
use async_stream::stream;
use futures_util::{Stream, StreamExt};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::pin::Pin;
use std::sync::atomic::AtomicUsize;
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument, warn};
use vasari_core::{ChatRequest, RetryPolicy};
use vasari_error::{RouterError, RouterErrorKind, VasariError, VasariResult};
use vasari_interface::{
    ChatBackend, CostTableResolver, DriverResolver, FaultClassifier, FinishReason, StreamChunk,
    ToolCallDedup,
};

/// Orchestrates chat completion across tiers of backends.
///
/// A request walks the primary pool (ordered per the configured load
/// balancing mode), then the fallback pool, then an optional direct
/// backend. Each backend gets up to `max_attempts_per_backend` tries
/// with exponential backoff on transient faults; non-transient faults
/// escalate to the next backend immediately.
///
/// The router is cheap to share: wrap it in an `Arc` and call it from
/// as many tasks as needed. Backend handles and cost tables are
/// resolved lazily and cached for the router's lifetime.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use vasari_core::{ChatMessage, ChatRequest, LoadBalancingMode};
/// use vasari_router::{ChatRouter, RouterConfig, StaticCostResolver, StaticDriverResolver};
///
/// # async fn run() -> vasari_error::VasariResult<()> {
/// // Register live backend clients here.
/// let drivers = StaticDriverResolver::new();
/// let config = RouterConfig {
///     backends: vec!["groq".to_string(), "openai".to_string()],
///     load_balancing: LoadBalancingMode::RoundRobin,
///     ..Default::default()
/// };
/// let router = ChatRouter::new(config, Arc::new(drivers), Arc::new(StaticCostResolver::new()))?;
///
/// let request = ChatRequest::new(vec![ChatMessage::user("Hello!")]);
/// let outcome = router.execute(&request).await;
/// println!("{} (cost {})", outcome.message.content, outcome.cost);
/// # Ok(())
/// # }
/// ```
pub struct ChatRouter {
    config: RouterConfig,
    policy: RetryPolicy,
    drivers: DriverRegistry,
    costs: CostRegistry,
    classifier: Box<dyn FaultClassifier>,
    dedupe: Box<dyn ToolCallDedup>,
    direct: Option<(String, Arc<dyn ChatBackend>)>,
    primary_counter: AtomicUsize,
    fallback_counter: AtomicUsize,
    rng: Mutex<StdRng>,
}

impl ChatRouter {
    /// Creates a router over the given resolvers.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid.
    pub fn new(
        config: RouterConfig,
        drivers: Arc<dyn DriverResolver>,
        costs: Arc<dyn CostTableResolver>,
    ) -> VasariResult<Self> {
        config.validate()?;
        let policy = config.retry_policy();
        Ok(Self {
            config,
            policy,
            drivers: DriverRegistry::new(drivers),
            costs: CostRegistry::new(costs),
            classifier: Box::new(DefaultFaultClassifier),
            dedupe: Box::new(DuplicateToolCallFilter),
            direct: None,
            primary_counter: AtomicUsize::new(0),
            fallback_counter: AtomicUsize::new(0),
            rng: Mutex::new(StdRng::from_entropy()),
        })
    }

    /// Replaces the default fault classifier.
    #[must_use]
    pub fn with_classifier(mut self, classifier: impl FaultClassifier + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    /// Replaces the default tool call deduplication.
    #[must_use]
    pub fn with_dedupe(mut self, dedupe: impl ToolCallDedup + 'static) -> Self {
        self.dedupe = Box::new(dedupe);
        self
    }

    /// Sets the direct backend, used only when both pools are empty.
    #[must_use]
    pub fn with_direct_backend(
        mut self,
        name: impl Into<String>,
        driver: Arc<dyn ChatBackend>,
    ) -> Self {
        self.direct = Some((name.into(), driver));
        self
    }

    /// The currency costs are reported in: taken from the first
    /// configured backend that has a pricing table, else "USD".
    pub fn currency(&self) -> String {
        self.config
            .backends
            .iter()
            .chain(self.config.fallback_backends.iter())
            .chain(self.direct.iter().map(|(name, _)| name))
            .find_map(|name| self.costs.get(name))
            .map(|table| table.currency)
            .unwrap_or_else(|| "USD".to_string())
    }

    fn sequencer(&self) -> AttemptSequencer<'_> {
        let primary = ordering::reorder(
            self.config.load_balancing,
            &self.config.backends,
            &self.primary_counter,
            &self.rng,
        );
        AttemptSequencer::new(
            &self.drivers,
            &self.costs,
            primary,
            FallbackPool {
                names: &self.config.fallback_backends,
                mode: self.config.fallback_balancing,
                counter: &self.fallback_counter,
                rng: &self.rng,
            },
            self.direct.clone(),
            self.policy.max_attempts,
        )
    }

    /// Waits out the backoff window if the fault is transient and the
    /// backend has attempts left, otherwise abandons the backend.
    async fn back_off_or_skip(
        &self,
        sequencer: &mut AttemptSequencer<'_>,
        attempt: &Attempt,
        error: &VasariError,
    ) {
        if self.classifier.is_transient(error) && attempt.attempt < attempt.max_attempts {
            let delay = self.policy.delay_for_attempt(attempt.attempt);
            debug!(
                backend = %attempt.backend,
                attempt = attempt.attempt,
                delay_ms = delay.as_millis() as u64,
                "Transient fault, backing off"
            );
            tokio::time::sleep(delay).await;
        } else {
            sequencer.skip_backend();
        }
    }

    /// Issues a chat completion, failing over until a backend succeeds.
    ///
    /// Never returns `Err`: total exhaustion is reported in-band as a
    /// [`CompletionOutcome`] whose message carries the last error text,
    /// so a chat surface always has something to render.
    #[instrument(skip(self, req), fields(messages = req.messages.len()))]
    pub async fn execute(&self, req: &ChatRequest) -> CompletionOutcome {
        let mut sequencer = self.sequencer();
        let mut attempts_made = 0u32;
        let mut last_error: Option<String> = None;

        while let Some(attempt) = sequencer.next() {
            attempts_made += 1;
            debug!(
                backend = %attempt.backend,
                phase = %attempt.phase,
                attempt = attempt.attempt,
                "Dispatching completion attempt"
            );
            match attempt.driver.complete(req).await {
                Ok(response) => {
                    let response = self.dedupe.dedupe(response);
                    let usage = response.usage;
                    let cost = attempt
                        .cost_table
                        .as_ref()
                        .map(|table| table.cost(usage.input_tokens, usage.output_tokens))
                        .unwrap_or(0.0);
                    debug!(
                        backend = %attempt.backend,
                        total_tokens = usage.total(),
                        cost,
                        "Completion succeeded"
                    );
                    return CompletionOutcome {
                        message: response.message,
                        cost,
                        input_tokens: usage.input_tokens,
                        output_tokens: usage.output_tokens,
                        cached_input_tokens: usage.cached_input_tokens,
                        backend: attempt.backend,
                    };
                }
                Err(error) => {
                    warn!(
                        backend = %attempt.backend,
                        phase = %attempt.phase,
                        attempt = attempt.attempt,
                        %error,
                        "Completion attempt failed"
                    );
                    last_error = Some(error.to_string());
                    self.back_off_or_skip(&mut sequencer, &attempt, &error).await;
                }
            }
        }

        let kind = match last_error {
            Some(last_error) => RouterErrorKind::AllAttemptsFailed {
                attempts: attempts_made,
                last_error,
            },
            None => RouterErrorKind::NoBackendsConfigured,
        };
        warn!(attempts = attempts_made, "Every backend exhausted");
        CompletionOutcome::failure(kind.to_string())
    }

    /// Issues a streaming chat completion, failing over until a backend
    /// streams to completion.
    ///
    /// Chunks are forwarded as they arrive; the update that carries the
    /// finish reason also carries the attempt's token counts and cost.
    /// Backends that close their stream without an explicit finish get
    /// a synthesized completion update. If every backend fails before
    /// any output was forwarded the stream yields a single `Err`; if
    /// output had already been forwarded it yields one terminal update
    /// with `is_error` set instead, since partial output cannot be
    /// retracted. Dropping the stream cancels the call.
    pub fn execute_stream(
        &self,
        req: ChatRequest,
    ) -> Pin<Box<dyn Stream<Item = VasariResult<StreamUpdate>> + Send + '_>> {
        Box::pin(stream! {
            let mut sequencer = self.sequencer();
            let mut attempts_made = 0u32;
            let mut last_error: Option<String> = None;
            let mut forwarded_any = false;

            while let Some(attempt) = sequencer.next() {
                attempts_made += 1;
                debug!(
                    backend = %attempt.backend,
                    phase = %attempt.phase,
                    attempt = attempt.attempt,
                    "Dispatching streaming attempt"
                );
                let mut inner = match attempt.driver.complete_stream(&req).await {
                    Ok(inner) => inner,
                    Err(error) => {
                        warn!(
                            backend = %attempt.backend,
                            attempt = attempt.attempt,
                            %error,
                            "Failed to open stream"
                        );
                        last_error = Some(error.to_string());
                        self.back_off_or_skip(&mut sequencer, &attempt, &error).await;
                        continue;
                    }
                };

                loop {
                    match inner.next().await {
                        Some(Ok(chunk)) => {
                            if chunk.is_final() {
                                let usage = chunk.usage.unwrap_or_default();
                                let cost = attempt
                                    .cost_table
                                    .as_ref()
                                    .map(|table| {
                                        table.cost(usage.input_tokens, usage.output_tokens)
                                    })
                                    .unwrap_or(0.0);
                                debug!(
                                    backend = %attempt.backend,
                                    total_tokens = usage.total(),
                                    cost,
                                    "Stream completed"
                                );
                                yield Ok(StreamUpdate::completion(
                                    chunk,
                                    &attempt.backend,
                                    cost,
                                    usage.input_tokens,
                                    usage.output_tokens,
                                ));
                                return;
                            }
                            forwarded_any = true;
                            yield Ok(StreamUpdate::delta(chunk, &attempt.backend));
                        }
                        Some(Err(error)) => {
                            warn!(
                                backend = %attempt.backend,
                                attempt = attempt.attempt,
                                %error,
                                "Stream interrupted"
                            );
                            last_error = Some(error.to_string());
                            self.back_off_or_skip(&mut sequencer, &attempt, &error).await;
                            break;
                        }
                        None => {
                            // Stream closed without a finish signal.
                            debug!(backend = %attempt.backend, "Synthesizing completion");
                            let chunk = StreamChunk {
                                finish_reason: Some(FinishReason::Other),
                                ..Default::default()
                            };
                            yield Ok(StreamUpdate::completion(chunk, &attempt.backend, 0.0, 0, 0));
                            return;
                        }
                    }
                }
            }

            warn!(attempts = attempts_made, "Every backend exhausted");
            let kind = match last_error {
                Some(last_error) => RouterErrorKind::AllAttemptsFailed {
                    attempts: attempts_made,
                    last_error,
                },
                None => RouterErrorKind::NoBackendsConfigured,
            };
            if forwarded_any {
                yield Ok(StreamUpdate::exhausted(kind.to_string()));
            } else {
                yield Err(RouterError::new(kind).into());
            }
        })
    }

    /// The configuration this router was built with.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }
}
