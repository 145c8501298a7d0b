// tests/property_test.rs

//! Property-based tests for the dispatcher's aggregation invariants.

mod common;

use cacheflush::core::dispatcher::Dispatcher;
use cacheflush::core::errors::FlushError;
use cacheflush::core::template::{InvalidationPolicy, Mode};
use common::{Behavior, MockTransport, endpoints};
use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;

fn hosts(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("cache{i}")).collect()
}

fn run_invalidate(
    host_names: &[String],
    transport: Arc<MockTransport>,
    path: &str,
    mode: Option<Mode>,
) -> Result<cacheflush::core::outcome::BatchResult, FlushError> {
    let refs: Vec<&str> = host_names.iter().map(|s| s.as_str()).collect();
    let dispatcher = Dispatcher::new(
        endpoints(&refs),
        InvalidationPolicy::default(),
        Mode::Refresh,
        Duration::from_secs(2),
        transport,
    )
    .unwrap();
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    rt.block_on(dispatcher.invalidate(path, mode))
}

proptest! {
    /// Every valid request yields exactly one outcome per configured endpoint,
    /// in configuration order, regardless of per-endpoint results.
    #[test]
    fn prop_one_outcome_per_endpoint(
        suffix in "[a-z0-9/._-]{0,40}",
        n in 1usize..6,
        failing in proptest::collection::vec(any::<bool>(), 5),
    ) {
        let path = format!("/{suffix}");
        let host_names = hosts(n);
        let mut transport = MockTransport::ok();
        for (i, host) in host_names.iter().enumerate() {
            if failing[i % failing.len()] {
                transport = transport.behavior(host, Behavior::Refuse);
            }
        }
        let transport = Arc::new(transport);

        let batch = run_invalidate(&host_names, transport.clone(), &path, None).unwrap();

        prop_assert_eq!(batch.outcomes.len(), n);
        for (outcome, host) in batch.outcomes.iter().zip(&host_names) {
            prop_assert_eq!(&outcome.endpoint.host, host);
        }
        let expect_all = batch.outcomes.iter().all(|o| o.succeeded);
        prop_assert_eq!(batch.all_succeeded, expect_all);
        prop_assert_eq!(transport.calls().len(), n);
    }

    /// Paths without a leading slash never reach the transport.
    #[test]
    fn prop_relative_paths_rejected(
        path in "[a-z0-9][a-z0-9/._-]{0,20}",
        n in 1usize..4,
    ) {
        let host_names = hosts(n);
        let transport = Arc::new(MockTransport::ok());

        let result = run_invalidate(&host_names, transport.clone(), &path, None);

        prop_assert!(matches!(result, Err(FlushError::InvalidArgument(_))));
        prop_assert!(transport.calls().is_empty());
    }
}
