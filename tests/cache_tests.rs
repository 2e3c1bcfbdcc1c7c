// tests/cache_tests.rs

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use quill_lang::{
    CompiledStatement, EngineConfig, MappingObserver, NameObserver, NoopObserver, QueryCache,
    QueryEngine, QueryError,
};

fn noop() -> Arc<dyn NameObserver> {
    Arc::new(NoopObserver)
}

fn compiled(text: &str) -> CompiledStatement {
    QueryEngine::new(EngineConfig::without_cache())
        .compile(text)
        .map(|s| (*s).clone())
        .unwrap()
}

#[test]
fn test_same_text_returns_same_arc() {
    let engine = QueryEngine::default();
    let first = engine.compile("select * from God where age > 10").unwrap();
    let second = engine.compile("select * from God where age > 10").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(engine.cache().unwrap().len(), 1);
}

#[test]
fn test_text_is_the_key() {
    let engine = QueryEngine::default();
    let a = engine.compile("get 1").unwrap();
    let b = engine.compile("get  1").unwrap();
    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(a, b);
    assert_eq!(engine.cache().unwrap().len(), 2);
}

#[test]
fn test_clones_share_the_cache() {
    let engine = QueryEngine::default();
    let clone = engine.clone();
    let a = engine.compile("get 1").unwrap();
    let b = clone.compile("get 1").unwrap();
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn test_observers_do_not_share_entries() {
    let cache = QueryCache::new(16);
    let plain = noop();
    let renaming: Arc<dyn NameObserver> = Arc::new(MappingObserver::new().entity("God", "gods"));

    let a = cache
        .get_or_compile("select * from God", &plain, || Ok(compiled("select * from God")))
        .unwrap();
    let b = cache
        .get_or_compile("select * from God", &renaming, || Ok(compiled("select * from gods")))
        .unwrap();
    assert_eq!(a.as_select().unwrap().entity(), "God");
    assert_eq!(b.as_select().unwrap().entity(), "gods");
    assert_eq!(cache.len(), 2);
    assert!(cache.get("select * from God", &plain).is_some());
}

#[test]
fn test_errors_are_not_cached() {
    let cache = QueryCache::new(16);
    let observer = noop();
    let calls = AtomicUsize::new(0);

    for _ in 0..2 {
        let result = cache.get_or_compile("get convert(1, planet)", &observer, || {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(QueryError::UnsupportedConstruct("conversion to `planet`".to_string()))
        });
        assert!(result.is_err());
    }
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(cache.is_empty());
}

#[test]
fn test_engine_does_not_cache_failures() {
    let engine = QueryEngine::default();
    assert!(engine.compile("select * from God where age in ()").is_err());
    assert!(engine.compile("select * from God where age = @age").is_err());
    assert!(engine.compile("selec * from God").is_err());
    assert!(engine.cache().unwrap().is_empty());
}

#[test]
fn test_prepared_queries_bypass_the_cache() {
    let engine = QueryEngine::default();
    engine.prepare("select * from God where age = @age").unwrap();
    engine.prepare("select * from God").unwrap();
    assert!(engine.cache().unwrap().is_empty());
}

#[test]
fn test_full_cache_still_compiles() {
    let engine = QueryEngine::new(EngineConfig {
        cache_enabled: true,
        cache_capacity: 2,
    });
    engine.compile("get 1").unwrap();
    engine.compile("get 2").unwrap();
    let third = engine.compile("get 3").unwrap();
    let again = engine.compile("get 3").unwrap();

    let cache = engine.cache().unwrap();
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.capacity(), 2);
    assert!(!Arc::ptr_eq(&third, &again));
    assert_eq!(third, again);

    // existing entries are still served
    let first = engine.compile("get 1").unwrap();
    assert!(Arc::ptr_eq(&first, &engine.compile("get 1").unwrap()));
}

#[test]
fn test_disabled_cache() {
    let engine = QueryEngine::new(EngineConfig::without_cache());
    assert!(engine.cache().is_none());
    let a = engine.compile("get 1").unwrap();
    let b = engine.compile("get 1").unwrap();
    assert!(!Arc::ptr_eq(&a, &b));
}

#[test]
fn test_clear() {
    let engine = QueryEngine::default();
    engine.compile("get 1").unwrap();
    engine.cache().unwrap().clear();
    assert!(engine.cache().unwrap().is_empty());
}

#[test]
fn test_concurrent_population_leaves_one_entry_per_key() {
    const THREADS: usize = 16;
    let engine = QueryEngine::default();
    let texts = ["select * from God", "get \"sun\", \"moon\"", "delete from God where age > 3"];

    let results: Vec<Vec<Arc<CompiledStatement>>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let engine = engine.clone();
                scope.spawn(move || {
                    texts
                        .iter()
                        .map(|text| engine.compile(text).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let cache = engine.cache().unwrap();
    assert_eq!(cache.len(), texts.len());
    for (i, text) in texts.iter().enumerate() {
        let stored = cache.get(text, engine.observer()).unwrap();
        for per_thread in &results {
            assert!(Arc::ptr_eq(&per_thread[i], &stored), "thread saw a different `{text}`");
        }
    }
}

#[test]
fn test_concurrent_compile_closure_races() {
    const THREADS: usize = 8;
    let cache = QueryCache::new(4);
    let observer = noop();
    let compiles = AtomicUsize::new(0);

    let results: Vec<Arc<CompiledStatement>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(|| {
                    cache
                        .get_or_compile("get 1", &observer, || {
                            compiles.fetch_add(1, Ordering::SeqCst);
                            Ok(compiled("get 1"))
                        })
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(compiles.load(Ordering::SeqCst) >= 1);
    assert_eq!(cache.len(), 1);
    assert!(results.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
}
