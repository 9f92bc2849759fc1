//! Factory registry tests
//!
//! Test Categories:
//! 1. Registration and lookup
//! 2. Name validation
//! 3. Concurrent registration

use std::sync::{Arc, Barrier};
use std::thread;

use canned_query::config::EngineConfig;
use canned_query::query::{
    CannedQueryFactory, FactoryRegistry, FnQueryFactory, QueryParameters, SortSpec,
};
use canned_query::registry::{RegistryError, DEFAULT_NAME_PATTERN};
use serde_json::{json, Value};

fn registry() -> FactoryRegistry<Value> {
    FactoryRegistry::new(DEFAULT_NAME_PATTERN).unwrap()
}

fn factory(name: &str, docs: Vec<Value>) -> Arc<dyn CannedQueryFactory<Value>> {
    FnQueryFactory::new(name, move |_: Option<&()>| Ok(docs.clone()))
        .with_property_sorting()
        .into_shared()
}

// =============================================================================
// REGISTRATION AND LOOKUP
// =============================================================================

/// Test: a registered factory is found by name and creates working queries.
#[test]
fn test_lookup_creates_query() {
    let registry = registry();
    registry
        .register_factory(factory("cq.getChildren", vec![json!({"n": 2}), json!({"n": 1})]))
        .unwrap();

    let found = registry.lookup("cq.getChildren").unwrap();
    assert_eq!(found.name(), "cq.getChildren");

    let params = QueryParameters::without_argument().with_sort(SortSpec::asc("n"));
    let results = registry
        .create("cq.getChildren", params)
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(results.page().unwrap(), &[json!({"n": 1}), json!({"n": 2})]);
}

/// Test: lookup of an unknown name returns nothing.
#[test]
fn test_lookup_unknown() {
    let registry = registry();
    assert!(registry.lookup("cq.missing").is_none());
    assert!(registry
        .create("cq.missing", QueryParameters::without_argument())
        .is_none());
}

/// Test: a second factory under a taken name is rejected and the first stays.
#[test]
fn test_duplicate_name_rejected() {
    let registry = registry();
    registry
        .register_factory(factory("cq.docs", vec![json!("first")]))
        .unwrap();

    let err = registry
        .register_factory(factory("cq.docs", vec![json!("second")]))
        .unwrap_err();
    assert_eq!(err, RegistryError::DuplicateName("cq.docs".into()));
    assert_eq!(err.code(), "CQ_DUPLICATE_NAME");

    let results = registry
        .create("cq.docs", QueryParameters::without_argument())
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(results.page().unwrap(), &[json!("first")]);
}

/// Test: registering the same instance twice is accepted.
#[test]
fn test_same_factory_reregistered() {
    let registry = registry();
    let shared = factory("cq.docs", vec![]);
    registry.register_factory(shared.clone()).unwrap();
    registry.register_factory(shared).unwrap();
    assert_eq!(registry.names(), vec!["cq.docs"]);
}

// =============================================================================
// NAME VALIDATION
// =============================================================================

/// Test: names outside the dotted namespace are rejected without registering.
#[test]
fn test_invalid_name_rejected() {
    let registry = registry();
    for name in ["getChildren", "", "cq.", ".cq", "cq get"] {
        let err = registry.register_factory(factory(name, vec![])).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidName { .. }), "{}", name);
    }
    assert!(registry.is_empty());
}

/// Test: the configured pattern governs registration.
#[test]
fn test_pattern_from_config() {
    let config = EngineConfig::from_json(r#"{"name_pattern": "cq\\.[a-z]+"}"#).unwrap();
    let registry: FactoryRegistry<Value> = FactoryRegistry::from_config(&config).unwrap();

    assert!(registry.register_factory(factory("cq.docs", vec![])).is_ok());
    assert!(registry
        .register_factory(factory("cq.getChildren", vec![]))
        .is_err());
}

// =============================================================================
// CONCURRENT REGISTRATION
// =============================================================================

/// Test: racing registrations of one name produce exactly one success.
#[test]
fn test_concurrent_registration_single_winner() {
    const THREADS: usize = 8;

    for _ in 0..20 {
        let registry = Arc::new(registry());
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|i| {
                let registry = Arc::clone(&registry);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    let candidate = factory("cq.race", vec![json!(i)]);
                    barrier.wait();
                    registry.register_factory(candidate)
                })
            })
            .collect();

        let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let wins = outcomes.iter().filter(|r| r.is_ok()).count();
        let duplicates = outcomes
            .iter()
            .filter(|r| matches!(r, Err(RegistryError::DuplicateName(_))))
            .count();

        assert_eq!(wins, 1);
        assert_eq!(duplicates, THREADS - 1);
        assert_eq!(registry.len(), 1);
    }
}

/// Test: lookups run concurrently with each other.
#[test]
fn test_concurrent_lookups() {
    let registry = Arc::new(registry());
    registry
        .register_factory(factory("cq.shared", vec![json!(1), json!(2)]))
        .unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                (0..100)
                    .map(|_| {
                        registry
                            .create("cq.shared", QueryParameters::without_argument())
                            .unwrap()
                            .run()
                            .unwrap()
                            .paged_result_count()
                    })
                    .sum::<u32>()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 200);
    }
}
