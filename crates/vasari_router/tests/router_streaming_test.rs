//! Failover behavior of the streaming executor.

mod test_utils;

use futures_util::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use test_utils::{MockBackend, cost_table, delta, finish, request, usage};
use vasari_error::{BackendErrorKind, VasariResult};
use vasari_router::{
    ChatRouter, RouterConfig, StaticCostResolver, StaticDriverResolver, StreamUpdate,
};

fn router_over(
    backends: Vec<(&str, Arc<MockBackend>)>,
    config: RouterConfig,
) -> anyhow::Result<ChatRouter> {
    let mut resolver = StaticDriverResolver::new();
    for (name, backend) in backends {
        resolver.insert(name, backend);
    }
    Ok(ChatRouter::new(
        config,
        Arc::new(resolver),
        Arc::new(StaticCostResolver::new()),
    )?)
}

async fn collect(router: &ChatRouter) -> Vec<VasariResult<StreamUpdate>> {
    router.execute_stream(request()).collect().await
}

#[tokio::test(start_paused = true)]
async fn explicit_finish_carries_usage_and_cost() -> anyhow::Result<()> {
    let backend = Arc::new(MockBackend::new("a").stream_with(vec![
        delta("Hel"),
        delta("lo"),
        finish(Some(usage(1000, 2000))),
    ]));
    let mut drivers = StaticDriverResolver::new();
    drivers.insert("a", backend);
    let costs = StaticCostResolver::new().with("a", cost_table(0.01, 0.02));
    let config = RouterConfig {
        backends: vec!["a".to_string()],
        ..Default::default()
    };
    let router = ChatRouter::new(config, Arc::new(drivers), Arc::new(costs))?;

    let updates: Vec<StreamUpdate> = collect(&router)
        .await
        .into_iter()
        .collect::<VasariResult<_>>()?;

    assert_eq!(updates.len(), 3);
    assert_eq!(updates[0].chunk.delta, "Hel");
    assert!(!updates[0].is_complete);
    assert_eq!(updates[0].cost, 0.0);
    assert!(updates[2].is_complete);
    assert!((updates[2].cost - 0.05).abs() < 1e-12);
    assert_eq!(updates[2].input_tokens, 1000);
    assert_eq!(updates[2].output_tokens, 2000);
    assert!(updates.iter().all(|u| u.backend == "a"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn silent_stream_end_synthesizes_completion() -> anyhow::Result<()> {
    let backend =
        Arc::new(MockBackend::new("a").stream_with(vec![delta("Hel"), delta("lo")]));
    let config = RouterConfig {
        backends: vec!["a".to_string()],
        ..Default::default()
    };
    let router = router_over(vec![("a", backend)], config)?;

    let updates: Vec<StreamUpdate> = collect(&router)
        .await
        .into_iter()
        .collect::<VasariResult<_>>()?;

    // Two forwarded chunks plus exactly one synthesized completion.
    assert_eq!(updates.len(), 3);
    let last = &updates[2];
    assert!(last.is_complete);
    assert!(last.chunk.delta.is_empty());
    assert_eq!(last.cost, 0.0);
    assert_eq!(last.input_tokens, 0);
    assert_eq!(last.output_tokens, 0);
    assert_eq!(updates.iter().filter(|u| u.is_complete).count(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn mid_stream_error_fails_over_without_retracting_output() -> anyhow::Result<()> {
    let flaky = Arc::new(MockBackend::new("a").stream_with(vec![
        delta("par"),
        Err(BackendErrorKind::Stream("connection reset".to_string())),
    ]));
    let steady = Arc::new(
        MockBackend::new("b").stream_with(vec![delta("ok"), finish(Some(usage(5, 5)))]),
    );
    let config = RouterConfig {
        backends: vec!["a".to_string(), "b".to_string()],
        max_attempts_per_backend: 1,
        ..Default::default()
    };
    let router = router_over(vec![("a", flaky.clone()), ("b", steady.clone())], config)?;

    let updates: Vec<StreamUpdate> = collect(&router)
        .await
        .into_iter()
        .collect::<VasariResult<_>>()?;

    assert_eq!(updates.len(), 3);
    assert_eq!(updates[0].backend, "a");
    assert_eq!(updates[0].chunk.delta, "par");
    assert_eq!(updates[1].backend, "b");
    assert_eq!(updates[1].chunk.delta, "ok");
    assert!(updates[2].is_complete);
    assert_eq!(updates[2].backend, "b");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn transient_open_failure_retries_with_backoff() -> anyhow::Result<()> {
    let backend = Arc::new(
        MockBackend::new("a")
            .fail_stream_open(BackendErrorKind::RateLimited("429".to_string()))
            .stream_with(vec![delta("ok"), finish(None)]),
    );
    let config = RouterConfig {
        backends: vec!["a".to_string()],
        max_attempts_per_backend: 2,
        base_delay_ms: 100,
        ..Default::default()
    };
    let router = router_over(vec![("a", backend.clone())], config)?;

    let updates: Vec<StreamUpdate> = collect(&router)
        .await
        .into_iter()
        .collect::<VasariResult<_>>()?;

    assert!(updates.last().unwrap().is_complete);
    assert_eq!(backend.call_count(), 2);
    let times = backend.call_times();
    assert_eq!(times[1] - times[0], Duration::from_millis(100));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn exhaustion_before_any_output_is_an_error() -> anyhow::Result<()> {
    let backend = Arc::new(
        MockBackend::new("a").fail_stream_open(BackendErrorKind::Auth("bad key".to_string())),
    );
    let config = RouterConfig {
        backends: vec!["a".to_string()],
        max_attempts_per_backend: 3,
        ..Default::default()
    };
    let router = router_over(vec![("a", backend.clone())], config)?;

    let mut items = collect(&router).await;

    assert_eq!(items.len(), 1);
    let error = items.remove(0).unwrap_err();
    assert!(error.to_string().contains("attempts failed"));
    assert!(error.to_string().contains("bad key"));
    assert_eq!(backend.call_count(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn exhaustion_after_partial_output_reported_in_band() -> anyhow::Result<()> {
    let backend = Arc::new(MockBackend::new("a").stream_with(vec![
        delta("par"),
        Err(BackendErrorKind::Stream("connection reset".to_string())),
    ]));
    let config = RouterConfig {
        backends: vec!["a".to_string()],
        max_attempts_per_backend: 1,
        ..Default::default()
    };
    let router = router_over(vec![("a", backend)], config)?;

    let updates: Vec<StreamUpdate> = collect(&router)
        .await
        .into_iter()
        .collect::<VasariResult<_>>()?;

    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0].chunk.delta, "par");
    let terminal = &updates[1];
    assert!(terminal.is_error);
    assert!(!terminal.is_complete);
    assert!(
        terminal
            .error_message
            .as_deref()
            .unwrap()
            .contains("connection reset")
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn dropping_the_stream_abandons_remaining_attempts() -> anyhow::Result<()> {
    let backend = Arc::new(MockBackend::new("a").stream_with(vec![
        delta("one"),
        delta("two"),
        finish(None),
    ]));
    let config = RouterConfig {
        backends: vec!["a".to_string()],
        ..Default::default()
    };
    let router = router_over(vec![("a", backend.clone())], config)?;

    {
        let mut stream = router.execute_stream(request());
        let first = stream.next().await.unwrap()?;
        assert_eq!(first.chunk.delta, "one");
        // Dropped here with two items unread.
    }

    assert_eq!(backend.call_count(), 1);
    Ok(())
}
