//! Lazy attempt sequencing across backend tiers.

use crate::ordering;
use crate::registry::{CostRegistry, DriverRegistry};
use rand::rngs::StdRng;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tracing::warn;
use vasari_core::{CostTable, LoadBalancingMode};
use vasari_interface::ChatBackend;

/// The tier a given attempt belongs to. Tiers are tried strictly in
/// order and never re-entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum Phase {
    /// Primary pool, ordered by the configured load balancing mode
    LoadBalanced,
    /// Secondary pool, used only after the primary pool is exhausted
    Fallback,
    /// Single ambient backend, used only when no pools are configured
    Direct,
}

/// One attempt against one backend. Ephemeral: produced lazily, one at
/// a time, and discarded after the executor acts on it.
#[derive(Clone)]
pub struct Attempt {
    /// Name of the backend being attempted
    pub backend: String,
    /// Live handle for issuing the request
    pub driver: Arc<dyn ChatBackend>,
    /// Pricing for this backend, if configured
    pub cost_table: Option<CostTable>,
    /// Tier this attempt belongs to
    pub phase: Phase,
    /// 1-based attempt number on this backend
    pub attempt: u32,
    /// Attempts allowed on this backend before escalation
    pub max_attempts: u32,
}

/// Reorder inputs for the fallback pool, applied lazily when (and only
/// when) the primary pool is exhausted, so the fallback round-robin
/// cursor does not advance on calls the fallback never serves.
pub(crate) struct FallbackPool<'a> {
    pub names: &'a [String],
    pub mode: LoadBalancingMode,
    pub counter: &'a AtomicUsize,
    pub rng: &'a Mutex<StdRng>,
}

struct Current {
    name: String,
    driver: Arc<dyn ChatBackend>,
    cost_table: Option<CostTable>,
}

enum State {
    Pool,
    Direct,
    Done,
}

/// Produces the ordered sequence of [`Attempt`]s for one router call.
///
/// An explicit state machine rather than a generator: `next` yields
/// attempts phase by phase, resolving each backend handle at its first
/// attempt and skipping backends that fail to resolve without consuming
/// any attempts.
pub(crate) struct AttemptSequencer<'a> {
    drivers: &'a DriverRegistry,
    costs: &'a CostRegistry,
    direct: Option<(String, Arc<dyn ChatBackend>)>,
    max_attempts: u32,
    state: State,
    pool_phase: Phase,
    names: Vec<String>,
    idx: usize,
    attempt: u32,
    current: Option<Current>,
    fallback: Option<FallbackPool<'a>>,
}

impl<'a> AttemptSequencer<'a> {
    pub(crate) fn new(
        drivers: &'a DriverRegistry,
        costs: &'a CostRegistry,
        primary: Vec<String>,
        fallback: FallbackPool<'a>,
        direct: Option<(String, Arc<dyn ChatBackend>)>,
        max_attempts: u32,
    ) -> Self {
        let no_pools = primary.is_empty() && fallback.names.is_empty();
        let mut sequencer = Self {
            drivers,
            costs,
            direct,
            max_attempts,
            state: if no_pools { State::Direct } else { State::Pool },
            pool_phase: Phase::LoadBalanced,
            names: primary,
            idx: 0,
            attempt: 1,
            current: None,
            fallback: if fallback.names.is_empty() {
                None
            } else {
                Some(fallback)
            },
        };
        if matches!(sequencer.state, State::Pool) && sequencer.names.is_empty() {
            sequencer.enter_fallback();
        }
        sequencer
    }

    /// Abandon the remaining attempts on the current backend so the next
    /// pull advances to the next backend (or phase). Called by executors
    /// after a non-transient failure.
    pub(crate) fn skip_backend(&mut self) {
        self.current = None;
    }

    /// Yields the next attempt, or `None` when every phase is exhausted.
    pub(crate) fn next(&mut self) -> Option<Attempt> {
        loop {
            match self.state {
                State::Pool => {
                    if let Some(current) = &self.current {
                        if self.attempt <= self.max_attempts {
                            let attempt = Attempt {
                                backend: current.name.clone(),
                                driver: current.driver.clone(),
                                cost_table: current.cost_table.clone(),
                                phase: self.pool_phase,
                                attempt: self.attempt,
                                max_attempts: self.max_attempts,
                            };
                            self.attempt += 1;
                            return Some(attempt);
                        }
                        self.current = None;
                    }
                    if self.idx >= self.names.len() {
                        match self.pool_phase {
                            Phase::LoadBalanced => self.enter_fallback(),
                            _ => self.state = State::Done,
                        }
                        continue;
                    }
                    let name = self.names[self.idx].clone();
                    self.idx += 1;
                    match self.drivers.get(&name) {
                        Ok(driver) => {
                            let cost_table = self.costs.get(&name);
                            self.current = Some(Current {
                                name,
                                driver,
                                cost_table,
                            });
                            self.attempt = 1;
                        }
                        Err(error) => {
                            warn!(
                                backend = %name,
                                phase = %self.pool_phase,
                                %error,
                                "Skipping unresolvable backend"
                            );
                        }
                    }
                }
                State::Direct => {
                    self.state = State::Done;
                    if let Some((name, driver)) = self.direct.take() {
                        let cost_table = self.costs.get(&name);
                        return Some(Attempt {
                            backend: name,
                            driver,
                            cost_table,
                            phase: Phase::Direct,
                            attempt: 1,
                            max_attempts: 1,
                        });
                    }
                }
                State::Done => return None,
            }
        }
    }

    fn enter_fallback(&mut self) {
        match self.fallback.take() {
            Some(pool) => {
                self.pool_phase = Phase::Fallback;
                self.names = ordering::reorder(pool.mode, pool.names, pool.counter, pool.rng);
                self.idx = 0;
            }
            None => self.state = State::Done,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{StaticCostResolver, StaticDriverResolver};
    use async_trait::async_trait;
    use rand::SeedableRng;
    use vasari_core::{ChatMessage, ChatRequest, ChatResponse, TokenUsage};
    use vasari_error::VasariResult;
    use vasari_interface::{ChunkStream, Streaming, VasariDriver};

    struct StubDriver;

    #[async_trait]
    impl VasariDriver for StubDriver {
        async fn complete(&self, _req: &ChatRequest) -> VasariResult<ChatResponse> {
            Ok(ChatResponse {
                message: ChatMessage::assistant("ok"),
                usage: TokenUsage::default(),
            })
        }

        fn provider_name(&self) -> &'static str {
            "stub"
        }

        fn model_name(&self) -> &str {
            "stub"
        }
    }

    #[async_trait]
    impl Streaming for StubDriver {
        async fn complete_stream(&self, _req: &ChatRequest) -> VasariResult<ChunkStream> {
            Ok(Box::pin(futures_util::stream::empty()))
        }
    }

    struct Fixture {
        drivers: DriverRegistry,
        costs: CostRegistry,
        counter: AtomicUsize,
        rng: Mutex<StdRng>,
    }

    fn fixture(known: &[&str]) -> Fixture {
        let mut resolver = StaticDriverResolver::default();
        for name in known {
            resolver.insert(*name, Arc::new(StubDriver));
        }
        Fixture {
            drivers: DriverRegistry::new(Arc::new(resolver)),
            costs: CostRegistry::new(Arc::new(StaticCostResolver::default())),
            counter: AtomicUsize::new(0),
            rng: Mutex::new(StdRng::seed_from_u64(7)),
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn drain(mut sequencer: AttemptSequencer<'_>) -> Vec<(String, Phase, u32)> {
        let mut out = Vec::new();
        while let Some(a) = sequencer.next() {
            out.push((a.backend, a.phase, a.attempt));
        }
        out
    }

    #[test]
    fn yields_max_attempts_per_backend_in_order() {
        let fx = fixture(&["a", "b"]);
        let fallback_names = names(&[]);
        let sequencer = AttemptSequencer::new(
            &fx.drivers,
            &fx.costs,
            names(&["a", "b"]),
            FallbackPool {
                names: &fallback_names,
                mode: LoadBalancingMode::Sequential,
                counter: &fx.counter,
                rng: &fx.rng,
            },
            None,
            2,
        );
        let attempts = drain(sequencer);
        assert_eq!(
            attempts,
            vec![
                ("a".to_string(), Phase::LoadBalanced, 1),
                ("a".to_string(), Phase::LoadBalanced, 2),
                ("b".to_string(), Phase::LoadBalanced, 1),
                ("b".to_string(), Phase::LoadBalanced, 2),
            ]
        );
    }

    #[test]
    fn unresolvable_backend_skipped_without_aborting_phase() {
        let fx = fixture(&["a", "c"]);
        let fallback_names = names(&[]);
        let sequencer = AttemptSequencer::new(
            &fx.drivers,
            &fx.costs,
            names(&["a", "ghost", "c"]),
            FallbackPool {
                names: &fallback_names,
                mode: LoadBalancingMode::Sequential,
                counter: &fx.counter,
                rng: &fx.rng,
            },
            None,
            1,
        );
        let attempts = drain(sequencer);
        assert_eq!(
            attempts,
            vec![
                ("a".to_string(), Phase::LoadBalanced, 1),
                ("c".to_string(), Phase::LoadBalanced, 1),
            ]
        );
    }

    #[test]
    fn fallback_phase_follows_primary() {
        let fx = fixture(&["a", "z"]);
        let fallback_names = names(&["z"]);
        let sequencer = AttemptSequencer::new(
            &fx.drivers,
            &fx.costs,
            names(&["a"]),
            FallbackPool {
                names: &fallback_names,
                mode: LoadBalancingMode::Sequential,
                counter: &fx.counter,
                rng: &fx.rng,
            },
            None,
            1,
        );
        let attempts = drain(sequencer);
        assert_eq!(
            attempts,
            vec![
                ("a".to_string(), Phase::LoadBalanced, 1),
                ("z".to_string(), Phase::Fallback, 1),
            ]
        );
    }

    #[test]
    fn empty_primary_starts_in_fallback() {
        let fx = fixture(&["z"]);
        let fallback_names = names(&["z"]);
        let sequencer = AttemptSequencer::new(
            &fx.drivers,
            &fx.costs,
            Vec::new(),
            FallbackPool {
                names: &fallback_names,
                mode: LoadBalancingMode::Sequential,
                counter: &fx.counter,
                rng: &fx.rng,
            },
            None,
            3,
        );
        let attempts = drain(sequencer);
        assert_eq!(attempts.len(), 3);
        assert!(attempts.iter().all(|(n, p, _)| n == "z" && *p == Phase::Fallback));
    }

    #[test]
    fn direct_only_when_no_pools_configured() {
        let fx = fixture(&[]);
        let fallback_names = names(&[]);
        let sequencer = AttemptSequencer::new(
            &fx.drivers,
            &fx.costs,
            Vec::new(),
            FallbackPool {
                names: &fallback_names,
                mode: LoadBalancingMode::Sequential,
                counter: &fx.counter,
                rng: &fx.rng,
            },
            Some(("ambient".to_string(), Arc::new(StubDriver))),
            5,
        );
        let attempts = drain(sequencer);
        assert_eq!(attempts, vec![("ambient".to_string(), Phase::Direct, 1)]);
    }

    #[test]
    fn no_pools_and_no_direct_yields_nothing() {
        let fx = fixture(&[]);
        let fallback_names = names(&[]);
        let sequencer = AttemptSequencer::new(
            &fx.drivers,
            &fx.costs,
            Vec::new(),
            FallbackPool {
                names: &fallback_names,
                mode: LoadBalancingMode::Sequential,
                counter: &fx.counter,
                rng: &fx.rng,
            },
            None,
            1,
        );
        assert!(drain(sequencer).is_empty());
    }

    #[test]
    fn skip_backend_abandons_remaining_attempts() {
        let fx = fixture(&["a", "b"]);
        let fallback_names = names(&[]);
        let mut sequencer = AttemptSequencer::new(
            &fx.drivers,
            &fx.costs,
            names(&["a", "b"]),
            FallbackPool {
                names: &fallback_names,
                mode: LoadBalancingMode::Sequential,
                counter: &fx.counter,
                rng: &fx.rng,
            },
            None,
            3,
        );
        let first = sequencer.next().unwrap();
        assert_eq!(first.backend, "a");
        sequencer.skip_backend();
        let second = sequencer.next().unwrap();
        assert_eq!(second.backend, "b");
        assert_eq!(second.attempt, 1);
    }
}
